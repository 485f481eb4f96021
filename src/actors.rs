//! Character-name lookup for authors
//!
//! In-character and `/b` messages are displayed under the name of the character
//! the author plays. The host owns that knowledge (tokens, actors, permissions),
//! so the classifier only sees it through [`ActorDirectory`].

use crate::events::{Author, UserId};
use serde::Deserialize;

/// Lookup of the character a user currently plays
pub trait ActorDirectory {
    /// Name of the first player-owned character `user` owns, if any
    fn owned_character(&self, user: &UserId) -> Option<String>;

    /// Character name for `author`, falling back to the author's display name
    fn resolve_actor_name(&self, author: &Author) -> String {
        self.owned_character(&author.id)
            .unwrap_or_else(|| author.display_name.clone())
    }
}

/// Directory that knows no characters: every author resolves to their own name
#[derive(Debug, Clone, Copy, Default)]
pub struct NoActors;

impl ActorDirectory for NoActors {
    fn owned_character(&self, _user: &UserId) -> Option<String> {
        None
    }
}

/// A token placed in the current scene
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenEntry {
    /// Name of the actor behind the token
    pub actor: String,

    /// Whether any player (non-GM) owns the actor
    #[serde(default = "default_player_owned")]
    pub player_owned: bool,

    /// Users with owner permission on the actor
    #[serde(default)]
    pub owners: Vec<UserId>,
}

fn default_player_owned() -> bool {
    true
}

impl TokenEntry {
    pub fn new<I, S>(actor: impl Into<String>, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            actor: actor.into(),
            player_owned: true,
            owners: owners.into_iter().map(UserId::new).collect(),
        }
    }

    fn is_owned_by(&self, user: &UserId) -> bool {
        self.player_owned && self.owners.contains(user)
    }
}

/// Ordered list of tokens; the first matching token wins
#[derive(Debug, Clone, Default)]
pub struct Roster {
    tokens: Vec<TokenEntry>,
}

impl Roster {
    pub fn new(tokens: Vec<TokenEntry>) -> Self {
        Self { tokens }
    }

    /// Replace the token list (e.g. when the scene changes)
    pub fn replace(&mut self, tokens: Vec<TokenEntry>) {
        self.tokens = tokens;
    }

    pub fn tokens(&self) -> &[TokenEntry] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl ActorDirectory for Roster {
    fn owned_character(&self, user: &UserId) -> Option<String> {
        self.tokens
            .iter()
            .find(|token| token.is_owned_by(user))
            .map(|token| token.actor.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_actors_falls_back_to_display_name() {
        let author = Author::new("u1", "Alice");
        assert_eq!(NoActors.resolve_actor_name(&author), "Alice");
    }

    #[test]
    fn test_roster_first_owned_token_wins() {
        let roster = Roster::new(vec![
            TokenEntry::new("Goblin", Vec::<String>::new()),
            TokenEntry::new("Aria", ["u1"]),
            TokenEntry::new("Aria's Familiar", ["u1"]),
        ]);

        let author = Author::new("u1", "Alice");
        assert_eq!(roster.resolve_actor_name(&author), "Aria");
    }

    #[test]
    fn test_roster_skips_tokens_without_player_owner() {
        let mut npc = TokenEntry::new("Dragon", ["gm"]);
        npc.player_owned = false;
        let roster = Roster::new(vec![npc]);

        let author = Author::new("gm", "Game Master");
        assert_eq!(roster.resolve_actor_name(&author), "Game Master");
    }

    #[test]
    fn test_roster_replace() {
        let mut roster = Roster::new(vec![TokenEntry::new("Aria", ["u1"])]);
        roster.replace(vec![TokenEntry::new("Bran", ["u1"])]);
        assert_eq!(
            roster.owned_character(&UserId::new("u1")),
            Some("Bran".to_string())
        );
    }
}
