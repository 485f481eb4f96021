//! Event classification: raw host event -> channel, display fields, visibility
//!
//! # Rules
//!
//! ```text
//! RawEvent → [CommandRule₁, CommandRule₂, ...] → first match wins
//!          ↘ no match → kind dispatch (roll/whisper/in-character/other)
//! ```
//!
//! Commands are checked before the declared kind, so `/b` on top of a roll or
//! a whisper still lands in the out-of-character tab.
//!
//! Classification is pure: the same event, viewer and actor directory always
//! produce the same result. It never fails; anything unrecognised falls back
//! to the out-of-character tab.

mod commands;
mod visibility;

pub use commands::{
    CommandRule, CommandSet, GlobalCommand, OocCommand, Rewrite, GLOBAL_PREFIX, OOC_PREFIX,
};
pub use visibility::{can_view, is_visible};

use crate::actors::ActorDirectory;
use crate::channel::Channel;
use crate::events::{MessageKind, RawEvent, TaggedEvent};
use crate::viewer::ViewerContext;

/// Result of classifying one event for one viewer
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub event: TaggedEvent,
    /// Show immediately in the viewer's selected tab
    pub visible: bool,
}

/// Maps raw events to channels and display fields
#[derive(Debug, Default)]
pub struct Classifier {
    commands: CommandSet,
}

impl Classifier {
    pub fn new(commands: CommandSet) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &CommandSet {
        &self.commands
    }

    /// Classify `raw` and evaluate its visibility for `viewer`
    pub fn classify(
        &self,
        raw: RawEvent,
        viewer: &ViewerContext,
        actors: &dyn ActorDirectory,
    ) -> Classification {
        let event = self.tag(raw, actors);
        let visible = is_visible(&event, viewer);

        tracing::trace!(
            event_id = %event.raw().id,
            channel = %event.channel(),
            visible,
            "Classified event"
        );

        Classification { event, visible }
    }

    /// Assign channel and display fields, independent of any viewer
    pub fn tag(&self, raw: RawEvent, actors: &dyn ActorDirectory) -> TaggedEvent {
        let Rewrite {
            channel,
            display_name,
            display_content,
        } = match self.commands.detect(&raw.content) {
            Some((rule, body)) => {
                tracing::trace!(event_id = %raw.id, command = rule.name(), "Command matched");
                rule.rewrite(body, &raw.author, actors)
            }
            None => dispatch_kind(&raw, actors),
        };

        TaggedEvent::new(raw, channel, display_name, display_content)
    }
}

/// Kind-based routing for events without a command prefix
fn dispatch_kind(raw: &RawEvent, actors: &dyn ActorDirectory) -> Rewrite {
    let (channel, display_name) = match raw.kind {
        MessageKind::Roll => (Channel::Game, raw.author.display_name.clone()),
        MessageKind::Whisper => (Channel::Messages, raw.author.display_name.clone()),
        MessageKind::InCharacter => (Channel::World, actors.resolve_actor_name(&raw.author)),
        MessageKind::OutOfCharacter | MessageKind::Other => {
            (Channel::OutOfCharacter, raw.author.display_name.clone())
        }
    };

    Rewrite {
        channel,
        display_name,
        display_content: raw.content.clone(),
    }
}
