//! Inline chat commands (`/b`, `/g`)
//!
//! A command is a literal prefix at the start of the trimmed message text. When one
//! matches, it overrides the kind-based routing and rewrites the display fields.
//!
//! # Ordering
//!
//! Rules are checked in registration order and the first match wins. The default
//! set registers `/b` before `/g`.

use crate::actors::ActorDirectory;
use crate::channel::Channel;
use crate::config::CommandsConfig;
use crate::events::Author;

/// Default prefix of the out-of-character-as-character command
pub const OOC_PREFIX: &str = "/b ";

/// Default prefix of the global out-of-character command
pub const GLOBAL_PREFIX: &str = "/g ";

/// Display fields produced by a matching command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub channel: Channel,
    pub display_name: String,
    pub display_content: String,
}

/// A single prefix command
///
/// `strip` is the predicate, `rewrite` the transform. Both are pure.
pub trait CommandRule: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Literal prefix, including the trailing space
    fn prefix(&self) -> &str;

    /// Text after the prefix, if `content` (already trimmed) starts with it
    fn strip<'a>(&self, content: &'a str) -> Option<&'a str> {
        content.strip_prefix(self.prefix())
    }

    /// Build the display fields for the text following the prefix
    fn rewrite(&self, body: &str, author: &Author, actors: &dyn ActorDirectory) -> Rewrite;
}

/// `/b <text>`: out of character, shown under the author's character name
#[derive(Debug, Clone)]
pub struct OocCommand {
    prefix: String,
}

impl OocCommand {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for OocCommand {
    fn default() -> Self {
        Self::new(OOC_PREFIX)
    }
}

impl CommandRule for OocCommand {
    fn name(&self) -> &'static str {
        "ooc"
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn rewrite(&self, body: &str, author: &Author, actors: &dyn ActorDirectory) -> Rewrite {
        Rewrite {
            channel: Channel::OutOfCharacter,
            display_name: format!("[OOC] {}", actors.resolve_actor_name(author)),
            display_content: body.to_string(),
        }
    }
}

/// `/g <text>`: out of character, shown under the user's own name
#[derive(Debug, Clone)]
pub struct GlobalCommand {
    prefix: String,
}

impl GlobalCommand {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for GlobalCommand {
    fn default() -> Self {
        Self::new(GLOBAL_PREFIX)
    }
}

impl CommandRule for GlobalCommand {
    fn name(&self) -> &'static str {
        "global"
    }

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn rewrite(&self, body: &str, author: &Author, _actors: &dyn ActorDirectory) -> Rewrite {
        Rewrite {
            channel: Channel::OutOfCharacter,
            display_name: format!("[Global] {}", author.display_name),
            display_content: body.to_string(),
        }
    }
}

/// Ordered list of command rules
pub struct CommandSet {
    rules: Vec<Box<dyn CommandRule>>,
}

impl CommandSet {
    /// A set with no commands (kind dispatch only)
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Build the standard `/b`, `/g` set with configured prefixes
    pub fn from_config(config: &CommandsConfig) -> Self {
        let mut set = Self::empty();
        set.register(OocCommand::new(config.ooc_prefix.clone()));
        set.register(GlobalCommand::new(config.global_prefix.clone()));
        set
    }

    /// Append a rule. Rules are checked in registration order
    pub fn register(&mut self, rule: impl CommandRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// First rule matching the trimmed `content`, with the text after its prefix
    ///
    /// Empty content never matches.
    pub fn detect<'a>(&self, content: &'a str) -> Option<(&dyn CommandRule, &'a str)> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.rules
            .iter()
            .find_map(|rule| rule.strip(trimmed).map(|body| (rule.as_ref(), body)))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Names of registered rules, in order
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl Default for CommandSet {
    fn default() -> Self {
        Self::from_config(&CommandsConfig::default())
    }
}

impl std::fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSet")
            .field("rules", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::{Roster, TokenEntry};

    #[test]
    fn test_default_order() {
        assert_eq!(CommandSet::default().names(), vec!["ooc", "global"]);
    }

    #[test]
    fn test_detect_strips_prefix_after_trim() {
        let set = CommandSet::default();
        let (rule, body) = set.detect("   /b hello there  ").unwrap();
        assert_eq!(rule.name(), "ooc");
        assert_eq!(body, "hello there");
    }

    #[test]
    fn test_detect_requires_exact_prefix() {
        let set = CommandSet::default();
        assert!(set.detect("/bfoo").is_none());
        assert!(set.detect("/b").is_none());
        assert!(set.detect("/b   ").is_none()); // trims down to "/b"
        assert!(set.detect("/G hello").is_none());
        assert!(set.detect("say /b hello").is_none());
        assert!(set.detect("").is_none());
    }

    #[test]
    fn test_detect_keeps_inner_whitespace() {
        let set = CommandSet::default();
        let (_, body) = set.detect("/g   spaced").unwrap();
        assert_eq!(body, "  spaced");
    }

    #[test]
    fn test_ooc_rewrite_uses_character_name() {
        let roster = Roster::new(vec![TokenEntry::new("Aria", ["u1"])]);
        let rewrite = OocCommand::default().rewrite("brb", &Author::new("u1", "Alice"), &roster);

        assert_eq!(rewrite.channel, Channel::OutOfCharacter);
        assert_eq!(rewrite.display_name, "[OOC] Aria");
        assert_eq!(rewrite.display_content, "brb");
    }

    #[test]
    fn test_global_rewrite_ignores_character_name() {
        let roster = Roster::new(vec![TokenEntry::new("Aria", ["u1"])]);
        let rewrite =
            GlobalCommand::default().rewrite("hi all", &Author::new("u1", "Alice"), &roster);

        assert_eq!(rewrite.display_name, "[Global] Alice");
        assert_eq!(rewrite.display_content, "hi all");
    }

    #[test]
    fn test_configured_prefixes() {
        let config = CommandsConfig {
            ooc_prefix: "!ooc ".to_string(),
            global_prefix: "!all ".to_string(),
        };
        let set = CommandSet::from_config(&config);

        assert!(set.detect("/b hello").is_none());
        let (rule, body) = set.detect("!all hello").unwrap();
        assert_eq!(rule.name(), "global");
        assert_eq!(body, "hello");
    }

    #[test]
    fn test_empty_set_never_matches() {
        let set = CommandSet::empty();
        assert!(set.is_empty());
        assert!(set.detect("/b hello").is_none());
    }
}
