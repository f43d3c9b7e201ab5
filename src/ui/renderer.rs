//! Turns a [`ChatEvent`] into one styled terminal line.
//!
//! Layout: ` [HH:MM:SS] <badges><name>: <body> ` where the timestamp is
//! optional, every known badge with a positive level gets a colored glyph
//! followed by a one-column margin, the name is bold in the sender's color
//! and the body is padded by one column on each side. First-time chatters get
//! a bold accent body.

use crate::core::badges::BadgeTable;
use crate::core::config::RunnerConfig;
use crate::core::event::ChatEvent;
use crate::ui::ansi::line_to_ansi;
use crate::ui::wrap::{wrap_words, WrapConfig};
use crate::utils::color::{parse_hex_color, ColorDepth};
use chrono::{Local, NaiveTime};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

pub const DEFAULT_NAME_COLOR: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const FIRST_MESSAGE_ACCENT: Color = Color::Rgb(0xD9, 0x46, 0xEF);
const TIMESTAMP_FORMAT: &str = "%H:%M:%S";

/// Display flags fixed for the renderer's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderConfig {
    pub show_timestamp: bool,
    pub log_to_file: bool,
}

impl From<&RunnerConfig> for RenderConfig {
    fn from(runner: &RunnerConfig) -> Self {
        Self {
            show_timestamp: runner.timestamps,
            log_to_file: runner.log_messages,
        }
    }
}

pub struct MessageRenderer<'a> {
    badges: &'a BadgeTable,
    config: RenderConfig,
    wrap: Option<WrapConfig>,
    depth: ColorDepth,
    name_style: Style,
    body_style: Style,
}

impl<'a> MessageRenderer<'a> {
    pub fn new(badges: &'a BadgeTable, config: RenderConfig) -> Self {
        Self {
            badges,
            config,
            wrap: None,
            depth: ColorDepth::Truecolor,
            name_style: Style::default().add_modifier(Modifier::BOLD),
            body_style: Style::default(),
        }
    }

    pub fn with_wrap(mut self, wrap: Option<WrapConfig>) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_color_depth(mut self, depth: ColorDepth) -> Self {
        self.depth = depth;
        self
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// Styled line stamped with the current local time.
    pub fn render_line(&self, event: &ChatEvent) -> Line<'static> {
        self.render_line_at(event, Local::now().time())
    }

    pub fn render_line_at(&self, event: &ChatEvent, now: NaiveTime) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        if let Some(timestamp) = self.timestamp(now) {
            spans.push(Span::raw(timestamp));
        }
        spans.extend(self.badge_spans(event));
        spans.push(Span::styled(
            event.display_name.clone(),
            self.name_style.fg(sender_color(event)),
        ));
        spans.push(Span::raw(":"));
        spans.push(Span::styled(
            self.padded_body(&event.message),
            self.body_style(event.first_message),
        ));
        Line::from(spans)
    }

    /// Terminal-ready text for one event, including the trailing blank line.
    pub fn render(&self, event: &ChatEvent) -> String {
        self.encode(&self.render_line(event))
    }

    pub fn render_at(&self, event: &ChatEvent, now: NaiveTime) -> String {
        self.encode(&self.render_line_at(event, now))
    }

    fn encode(&self, line: &Line<'_>) -> String {
        let mut out = line_to_ansi(line, self.depth);
        out.push_str("\n\n");
        out
    }

    fn timestamp(&self, now: NaiveTime) -> Option<String> {
        self.config
            .show_timestamp
            .then(|| format!("[{}] ", now.format(TIMESTAMP_FORMAT)))
    }

    fn badge_spans(&self, event: &ChatEvent) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for (badge_id, level) in event.badges.iter() {
            if level <= 0 {
                continue;
            }
            let Some(badge) = self.badges.lookup(badge_id) else {
                continue;
            };

            let mut text = badge.icon.to_string();
            if level > 1 {
                text.push_str(&level.to_string());
            }

            let mut style = Style::default();
            if let Some(bg) = parse_hex_color(badge.background) {
                style = style.bg(bg);
            }
            if let Some(fg) = parse_hex_color(badge.foreground()) {
                style = style.fg(fg);
            }
            spans.push(Span::styled(text, style));
            spans.push(Span::raw(" "));
        }
        spans
    }

    /// Derived per call; the base style is never modified.
    fn body_style(&self, first_message: bool) -> Style {
        if first_message {
            self.body_style
                .fg(FIRST_MESSAGE_ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            self.body_style
        }
    }

    /// Bodies that already fit are kept verbatim, whitespace included.
    fn padded_body(&self, body: &str) -> String {
        let text = match &self.wrap {
            Some(wrap) if UnicodeWidthStr::width(body) > wrap.width => {
                let lines = wrap_words(body, wrap);
                if lines.is_empty() {
                    body.to_string()
                } else {
                    lines.join("\n ")
                }
            }
            _ => body.to_string(),
        };
        format!(" {text} ")
    }
}

fn sender_color(event: &ChatEvent) -> Color {
    event
        .color
        .as_deref()
        .filter(|color| !color.trim().is_empty())
        .and_then(parse_hex_color)
        .unwrap_or(DEFAULT_NAME_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 5, 9).unwrap()
    }

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    fn span_with<'l>(line: &'l Line<'_>, content: &str) -> &'l Span<'l> {
        line.spans
            .iter()
            .find(|span| span.content == content)
            .unwrap_or_else(|| panic!("no span {content:?} in {line:?}"))
    }

    fn is_clock_prefix(text: &str) -> bool {
        let bytes = text.as_bytes();
        bytes.len() >= 10
            && bytes[0] == b'['
            && bytes[3] == b':'
            && bytes[6] == b':'
            && bytes[9] == b']'
            && [1, 2, 4, 5, 7, 8]
                .iter()
                .all(|&i| bytes[i].is_ascii_digit())
    }

    #[test]
    fn bob_example_renders_icon_white_bold_name_and_padded_body() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let event = ChatEvent::new("Bob", "hi")
            .with_color("")
            .with_badge("subscriber", 1);

        let line = renderer.render_line_at(&event, noon());
        let icon = table.lookup("subscriber").unwrap().icon;

        assert_eq!(text_of(&line), format!(" {icon} Bob: hi "));
        let name = span_with(&line, "Bob");
        assert_eq!(name.style.fg, Some(DEFAULT_NAME_COLOR));
        assert!(name.style.add_modifier.contains(Modifier::BOLD));
        let badge = span_with(&line, icon);
        assert_eq!(badge.style.bg, Some(Color::Rgb(0x32, 0xCD, 0x32)));
        assert_eq!(badge.style.fg, Some(Color::Rgb(0xFF, 0xFF, 0xFF)));
        assert!(!text_of(&line).contains('['));
    }

    #[test]
    fn badges_at_level_zero_or_below_are_hidden() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let event = ChatEvent::new("Ann", "yo")
            .with_badge("moderator", 0)
            .with_badge("vip", -3);

        let text = text_of(&renderer.render_line_at(&event, noon()));
        assert_eq!(text, " Ann: yo ");
    }

    #[test]
    fn unknown_badges_are_skipped() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let event = ChatEvent::new("Ann", "yo").with_badge("made-up-badge", 5);

        let line = renderer.render_line_at(&event, noon());
        assert_eq!(text_of(&line), " Ann: yo ");
    }

    #[test]
    fn tiered_badge_uses_prefix_style_and_shows_level() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let event = ChatEvent::new("Ann", "yo").with_badge("sub-gift-leader/3", 3);

        let line = renderer.render_line_at(&event, noon());
        let icon = table.lookup("sub-gift-leader").unwrap().icon;
        let badge = span_with(&line, &format!("{icon}3"));
        assert_eq!(badge.style.bg, Some(Color::Rgb(0xFF, 0x69, 0xB4)));
    }

    #[test]
    fn badges_keep_server_order() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let event = ChatEvent::new("Ann", "yo")
            .with_badge("vip", 1)
            .with_badge("moderator", 1);

        let text = text_of(&renderer.render_line_at(&event, noon()));
        let vip = text.find(table.lookup("vip").unwrap().icon).unwrap();
        let moderator = text.find(table.lookup("moderator").unwrap().icon).unwrap();
        assert!(vip < moderator);
    }

    #[test]
    fn timestamp_prefix_only_when_enabled() {
        let table = BadgeTable::builtin();
        let event = ChatEvent::new("Ann", "yo");

        let off = MessageRenderer::new(&table, RenderConfig::default());
        assert_eq!(text_of(&off.render_line(&event)), " Ann: yo ");

        let on = MessageRenderer::new(
            &table,
            RenderConfig {
                show_timestamp: true,
                log_to_file: false,
            },
        );
        let fixed = text_of(&on.render_line_at(&event, noon()));
        assert_eq!(fixed, " [12:05:09] Ann: yo ");

        let live = text_of(&on.render_line(&event));
        assert!(is_clock_prefix(&live[1..]), "unexpected prefix in {live:?}");
        assert_eq!(&live[11..], " Ann: yo ");
    }

    #[test]
    fn sender_color_is_used_when_valid() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let colored = ChatEvent::new("Ann", "yo").with_color("#1E90FF");
        let garbage = ChatEvent::new("Ann", "yo").with_color("not-a-color");
        let missing = ChatEvent::new("Ann", "yo");

        let name_fg = |event: &ChatEvent| {
            let line = renderer.render_line_at(event, noon());
            span_with(&line, "Ann").style.fg
        };
        assert_eq!(name_fg(&colored), Some(Color::Rgb(0x1E, 0x90, 0xFF)));
        assert_eq!(name_fg(&garbage), Some(DEFAULT_NAME_COLOR));
        assert_eq!(name_fg(&missing), Some(DEFAULT_NAME_COLOR));
    }

    #[test]
    fn first_message_emphasis_does_not_leak() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default());
        let first = ChatEvent::new("New", "hello").first_message(true);
        let regular = ChatEvent::new("Old", "hello");

        let before = renderer.render_line_at(&regular, noon());
        let emphasized = renderer.render_line_at(&first, noon());
        let after = renderer.render_line_at(&regular, noon());

        let body = |line: &Line<'_>| span_with(line, " hello ").style;
        assert_eq!(body(&emphasized).fg, Some(FIRST_MESSAGE_ACCENT));
        assert!(body(&emphasized).add_modifier.contains(Modifier::BOLD));
        assert_ne!(body(&emphasized), body(&before));
        assert_eq!(body(&before), body(&after));
        assert_eq!(body(&after), Style::default());
    }

    #[test]
    fn render_appends_blank_line() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default())
            .with_color_depth(ColorDepth::Plain);
        let event = ChatEvent::new("Bob", "hi").with_badge("broadcaster", 1);

        let out = renderer.render_at(&event, noon());
        let icon = table.lookup("broadcaster").unwrap().icon;
        assert_eq!(out, format!(" {icon} Bob: hi \n\n"));
    }

    #[test]
    fn long_bodies_wrap_with_indent() {
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(&table, RenderConfig::default())
            .with_wrap(Some(WrapConfig::new(10)));
        let event = ChatEvent::new("Ann", "the quick brown fox jumps");

        let text = text_of(&renderer.render_line_at(&event, noon()));
        assert_eq!(text, " Ann: the quick\n brown fox\n jumps ");
    }

    #[test]
    fn fitting_bodies_keep_their_spacing_when_wrapping() {
        let table = BadgeTable::builtin();
        let event = ChatEvent::new("A", "a   b");
        let wrapped = MessageRenderer::new(&table, RenderConfig::default())
            .with_wrap(Some(WrapConfig::new(40)));
        let unwrapped = MessageRenderer::new(&table, RenderConfig::default());

        let wrapped = text_of(&wrapped.render_line_at(&event, noon()));
        let unwrapped = text_of(&unwrapped.render_line_at(&event, noon()));
        assert_eq!(wrapped, " A: a   b ");
        assert_eq!(wrapped, unwrapped);
    }

    #[test]
    fn render_config_follows_runner_flags() {
        let runner = RunnerConfig {
            timestamps: true,
            log_messages: true,
        };
        assert_eq!(
            RenderConfig::from(&runner),
            RenderConfig {
                show_timestamp: true,
                log_to_file: true,
            }
        );
    }
}
