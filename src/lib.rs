// Tabbed chat - routes virtual tabletop chat into tabs
//
// Every chat event is classified into one of four tabs (WORLD, OOC, GAME,
// MESSAGES), stored per scene (MESSAGES is global), and shown only when it
// belongs to the selected tab and the viewer may read it.
//
// Architecture:
// - Classifier: commands first, then the declared message kind
// - ScopedStore: per-scene history plus the global whisper list
// - ChatRouter: classifier + store + viewer, one per viewing client
// - ChatHost: maps host signals (ready, scene change, tab click, ...) to router calls
// - Feed: drives a ChatHost from an mpsc channel of signals
// - Sources: transcript replay (JSONL) and the scripted demo

pub mod actors;
pub mod channel;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod demo;
pub mod events;
pub mod feed;
pub mod host;
pub mod intercept;
pub mod logging;
pub mod render;
pub mod router;
pub mod store;
pub mod transcript;
pub mod viewer;

pub use channel::Channel;
pub use config::Config;
pub use events::{Author, MessageKind, RawEvent, ScopeKey, TaggedEvent, UserId};
pub use host::{ChatHost, HostSignal, RenderUpdate};
pub use router::{ChatRouter, Delivery};
