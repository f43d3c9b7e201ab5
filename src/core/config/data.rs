use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: i64 = 8080;
pub const DEFAULT_APP_NAME: &str = "gtc";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Reserved for a local callback server; not used by the viewer.
    pub port: i64,
    pub app_name: String,
    pub twitch: TwitchConfig,
    pub runner: RunnerConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TwitchConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Channel joined when none is given on the command line
    pub channel: String,
    /// App access token obtained at runtime; never written to disk
    #[serde(skip)]
    pub auth_token: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RunnerConfig {
    /// Prefix every message with the local `[HH:MM:SS]` time
    pub timestamps: bool,
    /// Append every received message to the chat log file
    pub log_messages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            app_name: DEFAULT_APP_NAME.to_string(),
            twitch: TwitchConfig::default(),
            runner: RunnerConfig::default(),
        }
    }
}

impl Config {
    /// The configured channel, if one is set to something other than blanks.
    pub fn channel(&self) -> Option<&str> {
        let channel = self.twitch.channel.trim();
        (!channel.is_empty()).then_some(channel)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.config/gtc/config.yaml` → `~/.config/gtc/config.yaml`
/// - Windows: `C:\\Users\\user\\AppData\\Roaming\\gtc\\config\\config.yaml` is left as-is
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
