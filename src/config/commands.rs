//! Inline command prefixes

use crate::classifier::{GLOBAL_PREFIX, OOC_PREFIX};
use serde::Deserialize;

/// Prefixes of the `/b` and `/g` commands
///
/// A prefix includes its trailing space; "/b" alone never matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandsConfig {
    /// Out of character, shown under the author's character name
    pub ooc_prefix: String,
    /// Out of character, shown under the author's own name
    pub global_prefix: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            ooc_prefix: OOC_PREFIX.to_string(),
            global_prefix: GLOBAL_PREFIX.to_string(),
        }
    }
}

/// Command prefixes as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileCommands {
    pub ooc_prefix: Option<String>,
    pub global_prefix: Option<String>,
}

impl CommandsConfig {
    /// Create from file config with defaults
    ///
    /// Blank prefixes would match every message, so they fall back to the default.
    pub fn from_file(file: Option<FileCommands>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            ooc_prefix: non_blank(file.ooc_prefix).unwrap_or(defaults.ooc_prefix),
            global_prefix: non_blank(file.global_prefix).unwrap_or(defaults.global_prefix),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
