use crate::core::event::ChatEvent;
use crate::twitch::ChatHandler;
use crate::ui::renderer::MessageRenderer;
use crate::utils::logging::MessageLog;
use std::io::Write;
use tracing::warn;

/// Renders every event to `out` and, when enabled, appends it to the log.
pub struct ChatPrinter<'a, W: Write> {
    renderer: MessageRenderer<'a>,
    log: Option<MessageLog>,
    out: W,
}

impl<'a, W: Write> ChatPrinter<'a, W> {
    pub fn new(renderer: MessageRenderer<'a>, log: Option<MessageLog>, out: W) -> Self {
        Self { renderer, log, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChatHandler for ChatPrinter<'_, W> {
    fn handle(&mut self, event: ChatEvent) {
        if let Some(log) = &self.log {
            log.record(&event);
        }
        let text = self.renderer.render(&event);
        if let Err(err) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
        {
            warn!("Failed to write message to terminal: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::badges::BadgeTable;
    use crate::ui::renderer::RenderConfig;
    use crate::utils::color::ColorDepth;
    use crate::utils::logging::CHAT_LOG_FILE;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn prints_each_event_followed_by_blank_line() {
        let table = BadgeTable::builtin();
        let renderer =
            MessageRenderer::new(&table, RenderConfig::default()).with_color_depth(ColorDepth::Plain);
        let mut printer = ChatPrinter::new(renderer, None, Vec::new());

        printer.handle(ChatEvent::new("Bob", "hi"));
        printer.handle(ChatEvent::new("Ann", "yo"));

        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, " Bob: hi \n\n Ann: yo \n\n");
    }

    #[test]
    fn logs_when_enabled() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(CHAT_LOG_FILE);
        let table = BadgeTable::builtin();
        let renderer = MessageRenderer::new(
            &table,
            RenderConfig {
                show_timestamp: false,
                log_to_file: true,
            },
        )
        .with_color_depth(ColorDepth::Plain);
        let mut printer = ChatPrinter::new(renderer, Some(MessageLog::new(&path)), Vec::new());

        printer.handle(ChatEvent::new("Bob", "hi"));

        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 1);
        assert!(!printer.into_inner().is_empty());
    }

    #[test]
    fn log_failure_does_not_block_rendering() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let table = BadgeTable::builtin();
        let renderer =
            MessageRenderer::new(&table, RenderConfig::default()).with_color_depth(ColorDepth::Plain);
        let broken_log = MessageLog::new(temp_dir.path());
        let mut printer = ChatPrinter::new(renderer, Some(broken_log), Vec::new());

        printer.handle(ChatEvent::new("Bob", "hi"));

        let out = String::from_utf8(printer.into_inner()).unwrap();
        assert_eq!(out, " Bob: hi \n\n");
    }
}
