//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

/// Quote a string as a TOML basic string
fn quoted(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}

impl Config {
    /// Serialize roster to `[[roster]]` entries
    pub(super) fn roster_to_toml(&self) -> String {
        if self.roster.is_empty() {
            // Show an example when no roster is configured
            return r#"
# [[roster]]
# actor = "Aria"
# owners = ["player"]
# player_owned = true    # false for GM-only actors
"#
            .to_string();
        }

        let mut output = String::from("\n");
        for token in &self.roster {
            let owners: Vec<String> = token.owners.iter().map(|o| quoted(o.as_str())).collect();
            output.push_str("[[roster]]\n");
            output.push_str(&format!("actor = {}\n", quoted(&token.actor)));
            output.push_str(&format!("owners = [{}]\n", owners.join(", ")));
            output.push_str(&format!("player_owned = {}\n", token.player_owned));
            output.push('\n');
        }
        output
    }

    /// Serialize config to TOML format
    pub fn to_toml(&self) -> String {
        let transcript = match &self.transcript {
            Some(path) => format!("transcript = {}", quoted(&path.display().to_string())),
            None => "# transcript = \"session.jsonl\"".to_string(),
        };

        format!(
            r#"# tabbed-chat configuration

# User id of the viewer (TABBED_CHAT_VIEWER overrides)
viewer_id = {viewer}

# Game master sees every whisper (TABBED_CHAT_GM overrides)
privileged = {privileged}

# Tab selected at startup: world, ooc, game, messages
initial_tab = "{tab}"

# Capacity of the signal and render channels
channel_buffer = {buffer}

# JSONL transcript of host signals (TABBED_CHAT_TRANSCRIPT overrides)
{transcript}

# Inline commands (prefix includes the trailing space)
[commands]
ooc_prefix = {ooc}
global_prefix = {global}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = {log_level}
# JSON file logging (in addition to stderr)
file_enabled = {log_file_enabled}
file_dir = {log_file_dir}
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = {log_file_prefix}

# Character names used until the host sends scene tokens
{roster}"#,
            viewer = quoted(&self.viewer_id),
            privileged = self.privileged,
            tab = self.initial_tab.as_str(),
            buffer = self.channel_buffer,
            transcript = transcript,
            ooc = quoted(&self.commands.ooc_prefix),
            global = quoted(&self.commands.global_prefix),
            log_level = quoted(&self.logging.level),
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = quoted(&self.logging.file_dir.display().to_string()),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = quoted(&self.logging.file_prefix),
            roster = self.roster_to_toml(),
        )
    }
}
