//! Badge styling table.
//!
//! Twitch attaches badges such as `moderator` or `subscriber/12` to every
//! chat sender. The table maps the base badge name to a small Nerd Font glyph
//! and a pair of colors. It is built once at startup and only read afterwards.

use std::collections::HashMap;

/// Foreground used when a badge does not specify one.
pub const DEFAULT_BADGE_FOREGROUND: &str = "#FFF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStyle {
    pub name: &'static str,
    pub background: &'static str,
    pub foreground: Option<&'static str>,
    pub icon: &'static str,
}

impl BadgeStyle {
    pub fn foreground(&self) -> &'static str {
        self.foreground.unwrap_or(DEFAULT_BADGE_FOREGROUND)
    }
}

const BUILTIN_BADGES: &[BadgeStyle] = &[
    BadgeStyle {
        name: "premium",
        background: "#ADD8E6",
        foreground: Some("#FFA500"),
        icon: "\u{edeb} ",
    },
    BadgeStyle {
        name: "subscriber",
        background: "#32CD32",
        foreground: Some("#FFF"),
        icon: "\u{f005} ",
    },
    BadgeStyle {
        name: "sub-gift-leader",
        background: "#FF69B4",
        foreground: Some("#FFF"),
        icon: "\u{edeb} ",
    },
    BadgeStyle {
        name: "moderator",
        background: "#0000FF",
        foreground: None,
        icon: "\u{f04e5} ",
    },
    BadgeStyle {
        name: "hype-train",
        background: "#FFA500",
        foreground: None,
        icon: "\u{e3c3} ",
    },
    BadgeStyle {
        name: "subtember-2024",
        background: "#800080",
        foreground: Some("#F7820F"),
        icon: "\u{f0bbf} ",
    },
    BadgeStyle {
        name: "partner",
        background: "#D776FF",
        foreground: None,
        icon: "\u{ebe9} ",
    },
    BadgeStyle {
        name: "twitch-recap-2023",
        background: "#9146FF",
        foreground: None,
        icon: "\u{f004} ",
    },
    BadgeStyle {
        name: "glitchcon2020",
        background: "#F0ABFC",
        foreground: None,
        icon: "\u{1f996}",
    },
    BadgeStyle {
        name: "vip",
        background: "#DB2777",
        foreground: None,
        icon: "\u{f0b8a} ",
    },
    BadgeStyle {
        name: "broadcaster",
        background: "#DC2626",
        foreground: None,
        icon: "\u{f03d} ",
    },
    BadgeStyle {
        name: "cheer",
        background: "#ffd700",
        foreground: None,
        icon: "\u{e28e} ",
    },
];

#[derive(Debug, Clone)]
pub struct BadgeTable {
    styles: HashMap<&'static str, BadgeStyle>,
}

impl BadgeTable {
    pub fn builtin() -> Self {
        Self::from_styles(BUILTIN_BADGES.iter().cloned())
    }

    pub fn from_styles(styles: impl IntoIterator<Item = BadgeStyle>) -> Self {
        Self {
            styles: styles.into_iter().map(|style| (style.name, style)).collect(),
        }
    }

    /// Look up a badge by its id. Tiered ids like `sub-gift-leader/3`
    /// resolve by the part before the first `/`.
    pub fn lookup(&self, badge_id: &str) -> Option<&BadgeStyle> {
        let base = badge_id.split('/').next().unwrap_or(badge_id);
        self.styles.get(base)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for BadgeTable {
    fn default() -> Self {
        Self::builtin()
    }
}
