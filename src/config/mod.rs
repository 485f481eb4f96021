//! Configuration for the tabbed chat client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/tabbed-chat/config.toml)
//! 3. Built-in defaults (lowest priority)
//!
//! Command-line flags are applied on top by `cli`.

use crate::actors::TokenEntry;
use crate::channel::Channel;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod commands;
mod logging;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use commands::{CommandsConfig, FileCommands};
pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_VIEWER: &str = "player";
const DEFAULT_CHANNEL_BUFFER: usize = 1000;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// User id of the person looking at the chat
    pub viewer_id: String,

    /// Game master: sees every whisper
    pub privileged: bool,

    /// Tab selected when the chat opens
    pub initial_tab: Channel,

    /// Capacity of the signal and render channels
    pub channel_buffer: usize,

    /// JSONL transcript of host signals to replay
    pub transcript: Option<PathBuf>,

    /// Demo mode: generate a scripted session instead of reading a transcript
    pub demo_mode: bool,

    /// Inline command prefixes
    pub commands: CommandsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Tokens used to resolve character names until the host sends its own
    pub roster: Vec<TokenEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            viewer_id: DEFAULT_VIEWER.to_string(),
            privileged: false,
            initial_tab: Channel::default(),
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            transcript: None,
            demo_mode: false,
            commands: CommandsConfig::default(),
            logging: LoggingConfig::default(),
            roster: Vec::new(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub viewer_id: Option<String>,
    pub privileged: Option<bool>,
    pub initial_tab: Option<String>,
    pub channel_buffer: Option<usize>,
    pub transcript: Option<String>,

    /// Optional [commands] section
    pub commands: Option<FileCommands>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [[roster]] entries
    pub roster: Option<Vec<TokenEntry>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/tabbed-chat/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("tabbed-chat").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// A config file that exists but cannot be read or parsed is an error.
    fn load_file_config() -> Result<FileConfig> {
        let Some(path) = Self::config_path() else {
            return Ok(FileConfig::default());
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => {
                Err(e).with_context(|| format!("Cannot read config file {}", path.display()))
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn load() -> Result<Self> {
        let file = Self::load_file_config()?;
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed config file with environment lookups
    pub(crate) fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();

        // Viewer: env > file > default
        let viewer_id = env("TABBED_CHAT_VIEWER")
            .or(file.viewer_id)
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(defaults.viewer_id);

        // GM flag: env > file > default
        let privileged = env("TABBED_CHAT_GM")
            .map(|v| is_truthy(&v))
            .or(file.privileged)
            .unwrap_or(defaults.privileged);

        // Demo mode: env only (runtime flag)
        let demo_mode = env("TABBED_CHAT_DEMO")
            .map(|v| is_truthy(&v))
            .unwrap_or(false);

        // Transcript: env > file
        let transcript = env("TABBED_CHAT_TRANSCRIPT")
            .or(file.transcript)
            .map(PathBuf::from);

        let initial_tab = match file.initial_tab {
            Some(name) => match Channel::parse(&name) {
                Some(channel) => channel,
                None => bail!(
                    "Unknown initial_tab \"{}\" (expected world, ooc, game or messages)",
                    name
                ),
            },
            None => defaults.initial_tab,
        };

        let channel_buffer = file
            .channel_buffer
            .filter(|n| *n > 0)
            .unwrap_or(defaults.channel_buffer);

        Ok(Self {
            viewer_id,
            privileged,
            initial_tab,
            channel_buffer,
            transcript,
            demo_mode,
            commands: CommandsConfig::from_file(file.commands),
            logging: LoggingConfig::from_file(file.logging)?,
            roster: file.roster.unwrap_or_default(),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
