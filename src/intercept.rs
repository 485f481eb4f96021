// Pre-send interception
//
// Runs on outgoing chat text before the host turns it into a message. If the text
// starts with a command prefix, the declared kind is switched to out-of-character
// so the host's own bookkeeping agrees with where the message will be routed.
//
// The content is left untouched here. Display rewriting (prefix stripping, name
// labels) happens in the classifier when the message comes back through the feed.

use crate::classifier::CommandSet;
use crate::events::{Author, MessageKind, RawEvent, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Chat text about to be submitted to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub content: String,
    /// Whisper targets chosen in the host's chat box
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipients: Option<BTreeSet<UserId>>,
}

impl OutgoingMessage {
    pub fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            recipients: None,
        }
    }

    /// Address the message to `recipients`
    pub fn with_recipients<I, S>(mut self, recipients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recipients = Some(recipients.into_iter().map(UserId::new).collect());
        self
    }

    /// Turn the (possibly retagged) message into a feed event
    ///
    /// Recipients are carried over as-is; ingestion validation drops them if a
    /// command retagged the whisper.
    pub fn into_raw_event(self, author: Author) -> RawEvent {
        let mut event = RawEvent::new(self.kind, author, self.content);
        event.recipients = self.recipients;
        event
    }
}

/// What the interceptor did to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterceptResult {
    /// No command prefix, kind unchanged
    Unchanged,
    /// Kind switched to out-of-character
    Retagged {
        command: &'static str,
        previous: MessageKind,
    },
}

/// Retag `message` as out-of-character if it starts with a command prefix
pub fn intercept(message: &mut OutgoingMessage, commands: &CommandSet) -> InterceptResult {
    let Some((rule, _)) = commands.detect(&message.content) else {
        return InterceptResult::Unchanged;
    };

    let previous = message.kind;
    message.kind = MessageKind::OutOfCharacter;

    tracing::debug!(
        command = rule.name(),
        previous = previous.as_str(),
        "Outgoing message retagged as out-of-character"
    );

    InterceptResult::Retagged {
        command: rule.name(),
        previous,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_retags_kind_but_keeps_content() {
        let commands = CommandSet::default();
        let mut message = OutgoingMessage::new(MessageKind::InCharacter, "/b brb");

        let result = intercept(&mut message, &commands);

        assert_eq!(
            result,
            InterceptResult::Retagged {
                command: "ooc",
                previous: MessageKind::InCharacter
            }
        );
        assert_eq!(message.kind, MessageKind::OutOfCharacter);
        assert_eq!(message.content, "/b brb");
    }

    #[test]
    fn test_global_command_retags() {
        let commands = CommandSet::default();
        let mut message = OutgoingMessage::new(MessageKind::Other, "  /g hello all");

        assert!(matches!(
            intercept(&mut message, &commands),
            InterceptResult::Retagged { command: "global", .. }
        ));
        assert_eq!(message.kind, MessageKind::OutOfCharacter);
    }

    #[test]
    fn test_plain_text_is_untouched() {
        let commands = CommandSet::default();
        for content in ["", "hello", "/bfoo", "/b"] {
            let mut message = OutgoingMessage::new(MessageKind::InCharacter, content);
            assert_eq!(intercept(&mut message, &commands), InterceptResult::Unchanged);
            assert_eq!(message.kind, MessageKind::InCharacter);
        }
    }

    #[test]
    fn test_into_raw_event() {
        let message = OutgoingMessage::new(MessageKind::OutOfCharacter, "/b hi");
        let raw = message.into_raw_event(Author::new("u1", "Alice"));
        assert_eq!(raw.kind, MessageKind::OutOfCharacter);
        assert_eq!(raw.content, "/b hi");
        assert!(raw.recipients.is_none());
    }

    #[test]
    fn test_into_raw_event_keeps_whisper_recipients() {
        let message: OutgoingMessage = serde_json::from_str(
            r#"{"kind": "whisper", "content": "meet me", "recipients": ["u2"]}"#,
        )
        .unwrap();
        assert_eq!(
            message,
            OutgoingMessage::new(MessageKind::Whisper, "meet me").with_recipients(["u2"])
        );

        let raw = message.into_raw_event(Author::new("u1", "Alice"));
        assert_eq!(raw.kind, MessageKind::Whisper);
        assert!(raw.is_addressed_to(&UserId::new("u2")));
    }
}
