//! Chat router: classifier + scoped store + viewer context
//!
//! One router per viewing client, owned by whoever drives the feed. Every event
//! is classified, stored under the active scene (or globally), and reported back
//! with a visibility verdict for the current viewer.

use crate::actors::{Roster, TokenEntry};
use crate::channel::Channel;
use crate::classifier::{can_view, Classifier, CommandSet};
use crate::config::Config;
use crate::events::{RawEvent, ScopeKey, TaggedEvent};
use crate::intercept::{self, InterceptResult, OutgoingMessage};
use crate::store::{InsertOutcome, ScopedStore};
use crate::viewer::ViewerContext;

/// Result of routing one event
#[derive(Debug, Clone, PartialEq)]
pub struct Delivery {
    pub event: TaggedEvent,
    /// Show immediately in the selected tab
    pub visible: bool,
    /// Where the event was stored
    pub stored: InsertOutcome,
}

/// Routes chat events into tabs and keeps their history
#[derive(Debug)]
pub struct ChatRouter {
    classifier: Classifier,
    store: ScopedStore,
    viewer: ViewerContext,
    roster: Roster,
    scope: Option<ScopeKey>,
}

impl ChatRouter {
    pub fn new(classifier: Classifier, viewer: ViewerContext, roster: Roster) -> Self {
        Self {
            classifier,
            store: ScopedStore::new(),
            viewer,
            roster,
            scope: None,
        }
    }

    /// Build a router from configuration
    pub fn from_config(config: &Config) -> Self {
        let classifier = Classifier::new(CommandSet::from_config(&config.commands));
        let viewer = ViewerContext::new(config.viewer_id.clone(), config.privileged)
            .with_active_channel(config.initial_tab);
        let roster = Roster::new(config.roster.clone());
        Self::new(classifier, viewer, roster)
    }

    /// Classify, store and judge visibility of one event
    pub fn ingest(&mut self, raw: RawEvent) -> Delivery {
        let classification = self.classifier.classify(raw, &self.viewer, &self.roster);
        let event = classification.event;
        let stored = self.store.insert(self.scope.as_ref(), event.clone());

        match &stored {
            InsertOutcome::DroppedNoScope => {
                tracing::warn!(
                    event_id = %event.raw().id,
                    channel = %event.channel(),
                    "No active scene, event not kept in history"
                );
            }
            outcome => {
                tracing::debug!(
                    event_id = %event.raw().id,
                    channel = %event.channel(),
                    visible = classification.visible,
                    outcome = ?outcome,
                    "Event routed"
                );
            }
        }

        Delivery {
            event,
            visible: classification.visible,
            stored,
        }
    }

    /// Switch the active scene. History of other scenes is kept
    pub fn change_scope(&mut self, scope: Option<ScopeKey>) {
        if let Some(scope) = &scope {
            if self.store.ensure_scope(scope) {
                tracing::debug!(scope = %scope, "Initialized scene history");
            }
        }

        tracing::info!(
            from = ?self.scope.as_ref().map(ScopeKey::as_str),
            to = ?scope.as_ref().map(ScopeKey::as_str),
            "Active scene changed"
        );
        self.scope = scope;
    }

    /// Replace the tokens used to resolve character names
    pub fn set_roster(&mut self, tokens: Vec<TokenEntry>) {
        tracing::debug!(tokens = tokens.len(), "Roster updated");
        self.roster.replace(tokens);
    }

    /// Select a tab. Returns true if the selection changed
    pub fn select_channel(&mut self, channel: Channel) -> bool {
        let changed = self.viewer.select(channel);
        if changed {
            tracing::debug!(tab = %channel, "Tab selected");
        }
        changed
    }

    /// Retag an outgoing message before the host creates it
    pub fn pre_send(&self, message: &mut OutgoingMessage) -> InterceptResult {
        intercept::intercept(message, self.classifier.commands())
    }

    /// Stored history of `channel` for the active scene
    pub fn fetch(&self, channel: Channel) -> &[TaggedEvent] {
        self.store.fetch(self.scope.as_ref(), channel)
    }

    /// Events of the selected tab this viewer is allowed to see
    pub fn visible_history(&self) -> Vec<&TaggedEvent> {
        self.fetch(self.viewer.active_channel)
            .iter()
            .filter(|event| can_view(event, &self.viewer))
            .collect()
    }

    pub fn active_scope(&self) -> Option<&ScopeKey> {
        self.scope.as_ref()
    }

    pub fn active_channel(&self) -> Channel {
        self.viewer.active_channel
    }

    pub fn viewer(&self) -> &ViewerContext {
        &self.viewer
    }

    pub fn store(&self) -> &ScopedStore {
        &self.store
    }
}
