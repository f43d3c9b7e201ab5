//! Encode styled ratatui lines as ANSI escape sequences for plain stdout.

use crate::utils::color::{quantize_style, ColorDepth};
use ratatui::crossterm::style::{
    Attribute, Attributes, Color as TermColor, ContentStyle, StyledContent,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use std::fmt::Write as _;

pub fn line_to_ansi(line: &Line<'_>, depth: ColorDepth) -> String {
    let mut out = String::new();
    for span in &line.spans {
        let style = line.style.patch(span.style);
        if depth == ColorDepth::Plain || style == Style::default() {
            out.push_str(&span.content);
            continue;
        }
        let styled = StyledContent::new(content_style(quantize_style(style, depth)), &span.content);
        // Writing into a String cannot fail.
        let _ = write!(out, "{styled}");
    }
    out
}

fn content_style(style: Style) -> ContentStyle {
    let mut attributes = Attributes::default();
    let modifiers = style.add_modifier;
    for (modifier, attribute) in [
        (Modifier::BOLD, Attribute::Bold),
        (Modifier::DIM, Attribute::Dim),
        (Modifier::ITALIC, Attribute::Italic),
        (Modifier::UNDERLINED, Attribute::Underlined),
        (Modifier::REVERSED, Attribute::Reverse),
    ] {
        if modifiers.contains(modifier) {
            attributes.set(attribute);
        }
    }

    ContentStyle {
        foreground_color: style.fg.map(term_color),
        background_color: style.bg.map(term_color),
        underline_color: None,
        attributes,
    }
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}
