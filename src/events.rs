// Events that flow from the host feed through the classifier into the store
//
// RawEvent is what the host hands us. TaggedEvent is the classified, display-ready
// form: it carries the raw event plus the channel and rewritten display fields.
// Using plain data types here keeps classification independent of whatever surface
// ends up rendering the chat.

use crate::channel::Channel;
use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Host user identity
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scene identifier partitioning the scene-scoped channels
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeKey(pub String);

impl ScopeKey {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declared message kind, as set by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Dice roll
    Roll,
    /// Private message with an explicit recipient list
    Whisper,
    /// Spoken as the author's character
    InCharacter,
    /// Explicitly out of character (written by the pre-send hook)
    OutOfCharacter,
    /// Anything else the host emits
    #[default]
    #[serde(other)]
    Other,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roll => "roll",
            Self::Whisper => "whisper",
            Self::InCharacter => "in_character",
            Self::OutOfCharacter => "out_of_character",
            Self::Other => "other",
        }
    }
}

/// Who sent a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub display_name: String,
}

impl Author {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            display_name: display_name.into(),
        }
    }
}

/// A chat event as delivered by the host feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    /// Host message id
    #[serde(default = "generate_id")]
    pub id: String,

    /// When the host created the message
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub kind: MessageKind,

    pub author: Author,

    /// Free text, may be empty
    #[serde(default)]
    pub content: String,

    /// Addressed viewers, only meaningful for whispers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<BTreeSet<UserId>>,
}

impl RawEvent {
    /// Create an event with a fresh id and the current time
    pub fn new(kind: MessageKind, author: Author, content: impl Into<String>) -> Self {
        Self {
            id: generate_id(),
            timestamp: Utc::now(),
            kind,
            author,
            content: content.into(),
            recipients: None,
        }
    }

    /// Create a whisper addressed to `recipients`
    pub fn whisper<I, S>(author: Author, content: impl Into<String>, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut event = Self::new(MessageKind::Whisper, author, content);
        event.recipients = Some(recipients.into_iter().map(UserId::new).collect());
        event
    }

    /// Whether `user` is on the recipient list (absent list = nobody)
    pub fn is_addressed_to(&self, user: &UserId) -> bool {
        self.recipients
            .as_ref()
            .is_some_and(|recipients| recipients.contains(user))
    }

    /// Check the event at the ingestion boundary
    ///
    /// Rejects events without an author id. Recipient lists on anything other
    /// than a whisper are dropped.
    pub fn validated(mut self) -> Result<Self> {
        if self.author.id.as_str().trim().is_empty() {
            bail!("event {} has no author id", self.id);
        }

        if self.kind != MessageKind::Whisper && self.recipients.is_some() {
            tracing::debug!(
                event_id = %self.id,
                kind = self.kind.as_str(),
                "Dropping recipient list from non-whisper event"
            );
            self.recipients = None;
        }

        Ok(self)
    }
}

/// A classified event, ready for storage and display
///
/// Only the classifier builds these; the fields are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedEvent {
    raw: RawEvent,
    channel: Channel,
    display_name: String,
    display_content: String,
}

impl TaggedEvent {
    pub(crate) fn new(
        raw: RawEvent,
        channel: Channel,
        display_name: String,
        display_content: String,
    ) -> Self {
        Self {
            raw,
            channel,
            display_name,
            display_content,
        }
    }

    pub fn raw(&self) -> &RawEvent {
        &self.raw
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn display_content(&self) -> &str {
        &self.display_content
    }

    pub fn author(&self) -> &Author {
        &self.raw.author
    }
}

/// Helper to generate unique ids for events created locally (demo, tests)
pub fn generate_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let count = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", Utc::now().timestamp_millis(), count)
}
