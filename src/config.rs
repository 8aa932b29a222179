//! User settings loaded from a TOML file.
//!
//! Settings live at `<config dir>/timecard/config.toml`. A missing default
//! file yields [`Settings::default`]; an explicitly requested file must exist.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Directory name used below the platform config and data directories.
pub const APP_DIR: &str = "timecard";
/// File name of the settings file.
pub const CONFIG_FILE: &str = "config.toml";

/// Errors raised while locating or reading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform has no config directory.
    #[error("cannot determine the config directory")]
    NoConfigDir,
    /// A platform directory is not valid UTF-8.
    #[error("path is not valid UTF-8: {0}")]
    NonUtf8Path(PathBuf),
    /// The settings file could not be read.
    #[error("failed to read config at {path}: {source}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The settings file is not valid TOML for [`Settings`].
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        /// File that was parsed.
        path: Utf8PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },
}

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding the tracker document.
    pub data_dir: Utf8PathBuf,
    /// Program name shown in usage messages.
    pub program_name: String,
    /// Label stamped as creator and owner of new tasks.
    pub owner: String,
    /// Log filter used when `TIMECARD_LOG` is unset.
    pub log_level: String,
    /// Project selected when none has been chosen.
    pub default_project: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            program_name: APP_DIR.to_owned(),
            owner: default_owner(),
            log_level: "warn".to_owned(),
            default_project: "inbox".to_owned(),
        }
    }
}

impl Settings {
    /// Returns the default settings path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the platform config directory is unknown
    /// or not UTF-8.
    pub fn default_path() -> Result<Utf8PathBuf, ConfigError> {
        let platform_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        let config_dir =
            Utf8PathBuf::from_path_buf(platform_dir).map_err(ConfigError::NonUtf8Path)?;
        Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads settings from `path`, or from the default path when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when an explicitly given file is missing.
    pub fn load(explicit_path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit_path {
            Some(explicit) => (explicit.to_owned(), true),
            None => (Self::default_path()?, false),
        };
        match read_file(&path) {
            Ok(raw) => {
                tracing::debug!(%path, "loaded settings");
                Self::from_toml(&raw).map_err(|source| ConfigError::Parse { path, source })
            }
            Err(source) if source.kind() == io::ErrorKind::NotFound && !required => {
                tracing::debug!(%path, "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    /// Parses settings from TOML text. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns the parse error for malformed text or unknown keys.
    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Replaces the data directory.
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<Utf8PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}

fn read_file(path: &Utf8Path) -> io::Result<String> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "config path has no file name"))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read_to_string(file_name)
}

fn default_data_dir() -> Utf8PathBuf {
    dirs::data_dir()
        .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map_or_else(|| Utf8PathBuf::from(".timecard"), |dir| dir.join(APP_DIR))
}

fn default_owner() -> String {
    std::env::var("USER")
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| "me".to_owned())
}
