// Host boundary: signals in, render updates out
//
// The host (the virtual tabletop) drives everything through a small set of signals.
// ChatHost turns each one into a router call and tells the renderer what to draw.
//
// Lifecycle:
// - Before `Ready`: no router exists, traffic is ignored
// - `Ready`: router created for the configured viewer, first scene activated
// - `Shutdown`: router dropped, later traffic ignored again

use crate::actors::TokenEntry;
use crate::channel::Channel;
use crate::classifier::can_view;
use crate::config::Config;
use crate::events::{Author, RawEvent, ScopeKey, TaggedEvent};
use crate::intercept::{InterceptResult, OutgoingMessage};
use crate::router::ChatRouter;
use crate::store::InsertOutcome;
use serde::Deserialize;

/// Signal from the host application
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostSignal {
    /// Host finished loading; the router can be created
    Ready {
        #[serde(default)]
        scene: Option<ScopeKey>,
        #[serde(default)]
        tokens: Option<Vec<TokenEntry>>,
    },

    /// Active scene changed (or none is active)
    SceneChanged {
        #[serde(default)]
        scene: Option<ScopeKey>,
        /// Tokens of the new scene, if the host sent them
        #[serde(default)]
        tokens: Option<Vec<TokenEntry>>,
    },

    /// Viewer clicked a tab
    TabSelected { tab: Channel },

    /// A chat message was created
    Message { event: RawEvent },

    /// The viewer is about to send chat text
    PreSend {
        author: Author,
        message: OutgoingMessage,
    },

    /// Host is going away
    Shutdown,
}

impl HostSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::SceneChanged { .. } => "scene_changed",
            Self::TabSelected { .. } => "tab_selected",
            Self::Message { .. } => "message",
            Self::PreSend { .. } => "pre_send",
            Self::Shutdown => "shutdown",
        }
    }
}

/// What the renderer should do after a signal
#[derive(Debug, Clone, PartialEq)]
pub enum RenderUpdate {
    /// Nothing to draw (router not ready, or event rejected)
    Ignored,

    /// Replace the visible list with the selected tab's history
    Redraw {
        tab: Channel,
        scene: Option<ScopeKey>,
        events: Vec<TaggedEvent>,
    },

    /// Append a new event to the visible list
    Append { event: TaggedEvent },

    /// Event stored (or dropped) but not shown in the selected tab
    Hidden {
        event_id: String,
        channel: Channel,
        stored: InsertOutcome,
        /// Whether the viewer may read it once its tab is selected
        readable: bool,
    },

    /// Router torn down
    Closed,
}

/// Owns the router for one viewing client
#[derive(Debug)]
pub struct ChatHost {
    config: Config,
    router: Option<ChatRouter>,
}

impl ChatHost {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            router: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.router.is_some()
    }

    pub fn router(&self) -> Option<&ChatRouter> {
        self.router.as_ref()
    }

    /// Handle one host signal
    pub fn handle(&mut self, signal: HostSignal) -> RenderUpdate {
        let name = signal.name();

        match signal {
            HostSignal::Ready { scene, tokens } => self.ready(scene, tokens),
            HostSignal::Shutdown => self.shutdown(),
            signal => {
                let Some(router) = self.router.as_mut() else {
                    tracing::trace!(signal = name, "Router not ready, signal ignored");
                    return RenderUpdate::Ignored;
                };
                Self::dispatch(router, signal)
            }
        }
    }

    fn ready(&mut self, scene: Option<ScopeKey>, tokens: Option<Vec<TokenEntry>>) -> RenderUpdate {
        if self.router.is_some() {
            tracing::debug!("Ready received twice, keeping existing history");
        } else {
            tracing::info!(
                viewer = %self.config.viewer_id,
                privileged = self.config.privileged,
                "Tabbed chat ready"
            );
        }
        let router = self
            .router
            .get_or_insert_with(|| ChatRouter::from_config(&self.config));

        if let Some(tokens) = tokens {
            router.set_roster(tokens);
        }
        router.change_scope(scene);
        redraw(router)
    }

    fn shutdown(&mut self) -> RenderUpdate {
        if let Some(router) = self.router.take() {
            tracing::info!(
                stored_events = router.store().len(),
                "Tabbed chat shut down"
            );
        }
        RenderUpdate::Closed
    }

    fn dispatch(router: &mut ChatRouter, signal: HostSignal) -> RenderUpdate {
        match signal {
            HostSignal::SceneChanged { scene, tokens } => {
                if let Some(tokens) = tokens {
                    router.set_roster(tokens);
                }
                router.change_scope(scene);
                redraw(router)
            }
            HostSignal::TabSelected { tab } => {
                router.select_channel(tab);
                redraw(router)
            }
            HostSignal::Message { event } => ingest(router, event),
            HostSignal::PreSend {
                author,
                mut message,
            } => {
                if let InterceptResult::Retagged { command, .. } = router.pre_send(&mut message) {
                    tracing::trace!(command, "Pre-send retag applied");
                }
                ingest(router, message.into_raw_event(author))
            }
            // Handled before dispatch
            HostSignal::Ready { .. } | HostSignal::Shutdown => RenderUpdate::Ignored,
        }
    }
}

fn ingest(router: &mut ChatRouter, event: RawEvent) -> RenderUpdate {
    let event = match event.validated() {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected malformed chat event");
            return RenderUpdate::Ignored;
        }
    };

    let delivery = router.ingest(event);
    if delivery.visible {
        RenderUpdate::Append {
            event: delivery.event,
        }
    } else {
        RenderUpdate::Hidden {
            event_id: delivery.event.raw().id.clone(),
            channel: delivery.event.channel(),
            readable: can_view(&delivery.event, router.viewer()),
            stored: delivery.stored,
        }
    }
}

fn redraw(router: &ChatRouter) -> RenderUpdate {
    RenderUpdate::Redraw {
        tab: router.active_channel(),
        scene: router.active_scope().cloned(),
        events: router.visible_history().into_iter().cloned().collect(),
    }
}
