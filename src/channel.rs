//! Chat channels ("tabs")
//!
//! Every event lands in exactly one channel. Three of them are partitioned per
//! scene; `Messages` is the single global channel and carries restricted
//! (whisper-like) visibility.

use serde::{Deserialize, Serialize};

/// Routing destination for a tagged event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// In-character chatter, shown with the speaker's character name
    #[default]
    World,
    /// Out-of-character talk, including `/b` and `/g` commands
    #[serde(rename = "ooc", alias = "out_of_character")]
    OutOfCharacter,
    /// Dice rolls and other game mechanics
    Game,
    /// Whispers. Global, not partitioned by scene
    Messages,
}

impl Channel {
    /// All channels in tab order
    pub const ALL: [Channel; 4] = [
        Channel::World,
        Channel::OutOfCharacter,
        Channel::Game,
        Channel::Messages,
    ];

    /// Channels whose history is partitioned per scene
    pub const SCENE_SCOPED: [Channel; 3] =
        [Channel::World, Channel::OutOfCharacter, Channel::Game];

    /// Whether this channel ignores the scene scope
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Messages)
    }

    /// Stable lowercase name used in config and transcripts
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::World => "world",
            Self::OutOfCharacter => "ooc",
            Self::Game => "game",
            Self::Messages => "messages",
        }
    }

    /// Tab label
    pub fn label(&self) -> &'static str {
        match self {
            Self::World => "WORLD",
            Self::OutOfCharacter => "OOC",
            Self::Game => "GAME",
            Self::Messages => "MESSAGES",
        }
    }

    /// Parse a channel name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "world" => Some(Self::World),
            "ooc" | "out_of_character" => Some(Self::OutOfCharacter),
            "game" => Some(Self::Game),
            "messages" => Some(Self::Messages),
            _ => None,
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_messages_is_global() {
        for channel in Channel::ALL {
            assert_eq!(channel.is_global(), channel == Channel::Messages);
        }
        assert!(!Channel::SCENE_SCOPED.contains(&Channel::Messages));
    }

    #[test]
    fn test_parse_accepts_names_and_aliases() {
        assert_eq!(Channel::parse("World"), Some(Channel::World));
        assert_eq!(Channel::parse("ooc"), Some(Channel::OutOfCharacter));
        assert_eq!(
            Channel::parse("out_of_character"),
            Some(Channel::OutOfCharacter)
        );
        assert_eq!(Channel::parse(" MESSAGES "), Some(Channel::Messages));
        assert_eq!(Channel::parse("lobby"), None);
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&Channel::OutOfCharacter).unwrap();
        assert_eq!(json, "\"ooc\"");
        let parsed: Channel = serde_json::from_str("\"game\"").unwrap();
        assert_eq!(parsed, Channel::Game);
    }
}
