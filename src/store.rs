// Scoped chat history
//
// Display-oriented copies of every classified event, kept for the lifetime of the
// process so a viewer can switch scenes and tabs without losing anything.
//
// Layout:
// - Scene-scoped channels (world, ooc, game): one sequence per channel per scene
// - Global channel (messages): a single sequence shared by all scenes
//
// Sequences are append-only and keep arrival order. There is no eviction; the
// host's own message log remains the source of truth.

use crate::channel::Channel;
use crate::events::{ScopeKey, TaggedEvent};
use std::collections::HashMap;

// ─────────────────────────────────────────────────────────────────────────────
// Scene History
// ─────────────────────────────────────────────────────────────────────────────

/// The three scene-scoped sequences of one scene
#[derive(Debug, Clone, Default)]
pub struct SceneHistory {
    world: Vec<TaggedEvent>,
    ooc: Vec<TaggedEvent>,
    game: Vec<TaggedEvent>,
}

impl SceneHistory {
    /// Sequence for a scene-scoped channel (`None` for the global channel)
    pub fn channel(&self, channel: Channel) -> Option<&[TaggedEvent]> {
        match channel {
            Channel::World => Some(&self.world),
            Channel::OutOfCharacter => Some(&self.ooc),
            Channel::Game => Some(&self.game),
            Channel::Messages => None,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> Option<&mut Vec<TaggedEvent>> {
        match channel {
            Channel::World => Some(&mut self.world),
            Channel::OutOfCharacter => Some(&mut self.ooc),
            Channel::Game => Some(&mut self.game),
            Channel::Messages => None,
        }
    }

    /// Total events across the three channels
    pub fn len(&self) -> usize {
        self.world.len() + self.ooc.len() + self.game.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Insert Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Where an inserted event ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Appended to the global sequence
    Global,
    /// Appended to a scene's sequence
    Scene(ScopeKey),
    /// Scene-scoped event arrived while no scene was active; not stored
    DroppedNoScope,
}

impl InsertOutcome {
    pub fn is_stored(&self) -> bool {
        !matches!(self, Self::DroppedNoScope)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Scoped Store
// ─────────────────────────────────────────────────────────────────────────────

/// History keyed by scene, plus the global channel
#[derive(Debug, Default)]
pub struct ScopedStore {
    scenes: HashMap<ScopeKey, SceneHistory>,
    global: Vec<TaggedEvent>,
}

impl ScopedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` under `scope` and its channel
    ///
    /// Global events ignore the scope. Scene-scoped events without a scope are
    /// dropped and reported as [`InsertOutcome::DroppedNoScope`].
    pub fn insert(&mut self, scope: Option<&ScopeKey>, event: TaggedEvent) -> InsertOutcome {
        let channel = event.channel();

        if channel.is_global() {
            self.global.push(event);
            return InsertOutcome::Global;
        }

        let Some(scope) = scope else {
            return InsertOutcome::DroppedNoScope;
        };

        let history = self.scenes.entry(scope.clone()).or_default();
        if let Some(sequence) = history.channel_mut(channel) {
            sequence.push(event);
        }
        InsertOutcome::Scene(scope.clone())
    }

    /// Events of `channel` in arrival order
    ///
    /// Unknown or absent scopes yield an empty slice.
    pub fn fetch(&self, scope: Option<&ScopeKey>, channel: Channel) -> &[TaggedEvent] {
        if channel.is_global() {
            return &self.global;
        }

        scope
            .and_then(|scope| self.scenes.get(scope))
            .and_then(|history| history.channel(channel))
            .unwrap_or(&[])
    }

    /// Make sure `scope` has its three sequences, leaving existing content alone
    ///
    /// Returns true if the scope was new.
    pub fn ensure_scope(&mut self, scope: &ScopeKey) -> bool {
        if self.scenes.contains_key(scope) {
            return false;
        }
        self.scenes.insert(scope.clone(), SceneHistory::default());
        true
    }

    /// History of one scene
    pub fn scene(&self, scope: &ScopeKey) -> Option<&SceneHistory> {
        self.scenes.get(scope)
    }

    /// Known scene keys
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeKey> {
        self.scenes.keys()
    }

    /// Total stored events, global included
    pub fn len(&self) -> usize {
        self.global.len() + self.scenes.values().map(SceneHistory::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
