pub mod data;
pub mod io;

pub use data::{path_display, Config, RunnerConfig, TwitchConfig};
pub use io::{ConfigError, ConfigStore};
