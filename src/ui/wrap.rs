//! Word wrapping for message bodies.
//!
//! Bodies are split on whitespace and packed greedily into lines no wider
//! than the configured width. Words longer than the width keep a line of
//! their own rather than being broken.

use unicode_width::UnicodeWidthStr;

/// Columns reserved for the timestamp, badges and sender name.
pub const RESERVED_COLUMNS: u16 = 20;

/// Configuration for text wrapping behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapConfig {
    /// Maximum width for text lines
    pub width: usize,
}

impl WrapConfig {
    pub fn new(width: usize) -> Self {
        Self { width }
    }

    /// Width derived from the current terminal, or `None` when the size is
    /// unknown (not a TTY) and bodies should stay unwrapped.
    pub fn for_terminal() -> Option<Self> {
        let (columns, _rows) = ratatui::crossterm::terminal::size().ok()?;
        Self::from_columns(columns)
    }

    pub fn from_columns(columns: u16) -> Option<Self> {
        let width = columns.saturating_sub(RESERVED_COLUMNS);
        (width > 0).then(|| Self::new(width as usize))
    }
}

pub fn wrap_words(text: &str, config: &WrapConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);
        if !current.is_empty() && current_width + 1 + word_width > config.width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
