use crate::core::config::data::{path_display, Config};
use directories::ProjectDirs;
use serde_yaml::{Mapping, Value};
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Errors that can occur when loading or updating the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// No per-user configuration directory could be determined.
    NoConfigDir,

    /// Failed to create the directory holding the configuration file.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write the configuration file back to disk.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid YAML for the configuration shape.
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The in-memory document could not be encoded as YAML.
    Serialize { source: serde_yaml::Error },

    /// A dotted key with an empty segment, e.g. `twitch..channel`.
    InvalidKey { key: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Failed to determine config directory"),
            ConfigError::CreateDir { path, source } => write!(
                f,
                "Failed to create config directory {}: {}",
                path_display(path),
                source
            ),
            ConfigError::Read { path, source } => write!(
                f,
                "Failed to read config at {}: {}",
                path_display(path),
                source
            ),
            ConfigError::Write { path, source } => write!(
                f,
                "Failed to write config at {}: {}",
                path_display(path),
                source
            ),
            ConfigError::Parse { path, source } => write!(
                f,
                "Failed to parse config at {}: {}",
                path_display(path),
                source
            ),
            ConfigError::Serialize { source } => write!(f, "Failed to encode config: {source}"),
            ConfigError::InvalidKey { key } => write!(f, "Invalid config key: '{key}'"),
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::CreateDir { source, .. }
            | ConfigError::Read { source, .. }
            | ConfigError::Write { source, .. } => Some(source),
            ConfigError::Parse { source, .. } | ConfigError::Serialize { source } => Some(source),
            ConfigError::NoConfigDir | ConfigError::InvalidKey { .. } => None,
        }
    }
}

/// The settings file on disk.
///
/// Every update is a full read-modify-write-reload cycle: the file is read
/// fresh, one dotted key is replaced, the whole document is persisted
/// atomically and then parsed again into the caller's [`Config`].
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/gtc/config.yaml` on Linux, the platform equivalent elsewhere.
    pub fn default_location() -> Result<Self, ConfigError> {
        let dirs = ProjectDirs::from("", "", "gtc").ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the default configuration if the file is missing. Returns
    /// whether a file was created.
    pub fn ensure_exists(&self) -> Result<bool, ConfigError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.write_document(&to_document(&Config::default())?)?;
        debug!(path = %path_display(&self.path), "default config created");
        Ok(true)
    }

    /// Read the configuration, writing the defaults first on a fresh install.
    pub fn load(&self) -> Result<Config, ConfigError> {
        self.ensure_exists()?;
        self.read_config()
    }

    /// Set `key` (dotted, e.g. `twitch.channel`) to `value` and reload
    /// `config` from the rewritten file.
    pub fn update(
        &self,
        config: &mut Config,
        key: &str,
        value: impl Into<Value>,
    ) -> Result<(), ConfigError> {
        let mut document = self.read_document()?;
        set_dotted_key(&mut document, key, value.into())?;
        self.write_document(&document)?;
        debug!(key, path = %path_display(&self.path), "config updated");

        let auth_token = config.twitch.auth_token.take();
        *config = self.load()?;
        config.twitch.auth_token = auth_token;
        Ok(())
    }

    fn read_to_string(&self) -> Result<String, ConfigError> {
        fs::read_to_string(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })
    }

    fn read_config(&self) -> Result<Config, ConfigError> {
        let contents = self.read_to_string()?;
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn read_document(&self) -> Result<Value, ConfigError> {
        if !self.path.exists() {
            return to_document(&Config::default());
        }
        let contents = self.read_to_string()?;
        if contents.trim().is_empty() {
            return Ok(Value::Mapping(Mapping::new()));
        }
        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, document: &Value) -> Result<(), ConfigError> {
        let contents =
            serde_yaml::to_string(document).map_err(|source| ConfigError::Serialize { source })?;
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let parent = self
            .path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(|source| ConfigError::CreateDir {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;
        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_err)?;
        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(&self.path)
            .map_err(|err| write_err(err.error))?;
        Ok(())
    }
}

fn to_document(config: &Config) -> Result<Value, ConfigError> {
    serde_yaml::to_value(config).map_err(|source| ConfigError::Serialize { source })
}

fn ensure_mapping(value: &mut Value) -> &mut Mapping {
    if !value.is_mapping() {
        *value = Value::Mapping(Mapping::new());
    }
    match value {
        Value::Mapping(map) => map,
        _ => unreachable!("value was just replaced with a mapping"),
    }
}

/// Replace the value at a dotted path, creating (or overwriting non-mapping)
/// intermediate nodes along the way.
pub(crate) fn set_dotted_key(
    document: &mut Value,
    key: &str,
    value: Value,
) -> Result<(), ConfigError> {
    let segments: Vec<&str> = key.split('.').map(str::trim).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    }
    let Some((last, parents)) = segments.split_last() else {
        return Err(ConfigError::InvalidKey {
            key: key.to_string(),
        });
    };

    let mut current = document;
    for segment in parents {
        current = ensure_mapping(current)
            .entry(Value::String(segment.to_string()))
            .or_insert(Value::Null);
    }
    ensure_mapping(current).insert(Value::String(last.to_string()), value);
    Ok(())
}
