use crate::core::event::ChatEvent;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Chat log written to the working directory when `runner.log_messages` is on.
pub const CHAT_LOG_FILE: &str = "chat.log.jsonl";

/// Route diagnostics to stderr so they never interleave with chat on stdout.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Append-only newline-delimited JSON log of received messages.
pub struct MessageLog {
    file_path: PathBuf,
}

impl MessageLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn in_working_dir() -> Self {
        Self::new(CHAT_LOG_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Best effort: failures are reported and swallowed.
    pub fn record(&self, event: &ChatEvent) {
        if let Err(err) = self.append(event) {
            warn!(
                path = %self.file_path.display(),
                "Error writing message to log: {err}"
            );
        }
    }

    pub fn append(&self, event: &ChatEvent) -> Result<(), Box<dyn std::error::Error>> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        file.write_all(&line)?;
        file.flush()?;
        Ok(())
    }
}
