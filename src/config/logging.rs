//! `[logging]` section
//!
//! Values are checked at load time: an unknown level or rotation is a config
//! error, not something discovered after the subscriber is already installed.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl LogRotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// Resolved logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Lowercase level name accepted by `EnvFilter` (`off`, `error` .. `trace`)
    pub level: String,
    /// Also write JSON logs to `file_dir`
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    /// File name stem; rotated files get a date suffix
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO.to_string().to_lowercase(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
            file_rotation: LogRotation::default(),
            file_prefix: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// `[logging]` as written in the config file
#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<PathBuf>,
    pub file_rotation: Option<LogRotation>,
    pub file_prefix: Option<String>,
}

/// Normalize a level name, rejecting anything `EnvFilter` would not accept
fn parse_level(raw: &str) -> Result<String> {
    match raw.trim().parse::<LevelFilter>() {
        Ok(level) => Ok(level.to_string().to_lowercase()),
        Err(_) => bail!(
            "Unknown logging level \"{}\" (expected off, error, warn, info, debug or trace)",
            raw
        ),
    }
}

impl LoggingConfig {
    pub fn from_file(file: Option<FileLogging>) -> Result<Self> {
        let Some(file) = file else {
            return Ok(Self::default());
        };
        let mut config = Self::default();

        if let Some(level) = file.level {
            config.level = parse_level(&level)?;
        }
        if let Some(prefix) = file.file_prefix {
            if prefix.trim().is_empty() {
                bail!("logging.file_prefix must not be empty");
            }
            config.file_prefix = prefix;
        }
        config.file_enabled = file.file_enabled.unwrap_or(config.file_enabled);
        config.file_dir = file.file_dir.unwrap_or(config.file_dir);
        config.file_rotation = file.file_rotation.unwrap_or(config.file_rotation);

        Ok(config)
    }
}
