// Feed runner - drives a ChatHost from a stream of host signals
//
// Signals arrive on an mpsc channel (from a transcript replay or the demo
// generator). Each one is handled in order and the resulting render update is
// forwarded to the renderer. The runner stops when:
// - the signal channel closes (source finished)
// - the shutdown oneshot fires (Ctrl+C)
// - the renderer hangs up
//
// In every case a still-ready host is shut down so the renderer sees `Closed`.

use crate::host::{ChatHost, HostSignal, RenderUpdate};
use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

/// Counters reported when the feed stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub signals: usize,
    pub appended: usize,
    pub hidden: usize,
    pub ignored: usize,
}

impl FeedStats {
    fn record(&mut self, update: &RenderUpdate) {
        self.signals += 1;
        match update {
            RenderUpdate::Append { .. } => self.appended += 1,
            RenderUpdate::Hidden { .. } => self.hidden += 1,
            RenderUpdate::Ignored => self.ignored += 1,
            RenderUpdate::Redraw { .. } | RenderUpdate::Closed => {}
        }
    }
}

/// Connects a signal source to a renderer through one ChatHost
pub struct ChatFeed {
    host: ChatHost,
    signal_rx: mpsc::Receiver<HostSignal>,
    render_tx: mpsc::Sender<RenderUpdate>,
    stats: FeedStats,
}

impl ChatFeed {
    pub fn new(
        host: ChatHost,
        signal_rx: mpsc::Receiver<HostSignal>,
        render_tx: mpsc::Sender<RenderUpdate>,
    ) -> Self {
        Self {
            host,
            signal_rx,
            render_tx,
            stats: FeedStats::default(),
        }
    }

    /// Run until the source closes, shutdown fires or the renderer goes away
    ///
    /// Returns the host and counters so callers can inspect the final state.
    pub async fn run(
        mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> Result<(ChatHost, FeedStats)> {
        tracing::debug!("Feed started");

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    tracing::info!("Shutdown requested, stopping feed");
                    break;
                }
                signal = self.signal_rx.recv() => {
                    let Some(signal) = signal else {
                        tracing::debug!("Signal source closed");
                        break;
                    };

                    let update = self.host.handle(signal);
                    self.stats.record(&update);

                    if matches!(update, RenderUpdate::Ignored) {
                        continue;
                    }
                    if self.render_tx.send(update).await.is_err() {
                        tracing::debug!("Renderer closed, stopping feed");
                        break;
                    }
                }
            }
        }

        if self.host.is_ready() {
            let update = self.host.handle(HostSignal::Shutdown);
            // Renderer may already be gone
            let _ = self.render_tx.send(update).await;
        }

        tracing::info!(
            signals = self.stats.signals,
            appended = self.stats.appended,
            hidden = self.stats.hidden,
            ignored = self.stats.ignored,
            "Feed stopped"
        );
        Ok((self.host, self.stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::config::Config;
    use crate::events::{Author, MessageKind, RawEvent, ScopeKey};

    fn ready() -> HostSignal {
        HostSignal::Ready {
            scene: Some(ScopeKey::new("s1")),
            tokens: None,
        }
    }

    fn say(content: &str) -> HostSignal {
        HostSignal::Message {
            event: RawEvent::new(MessageKind::InCharacter, Author::new("u1", "Alice"), content),
        }
    }

    async fn drain(mut rx: mpsc::Receiver<RenderUpdate>) -> Vec<RenderUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }
        updates
    }

    #[tokio::test]
    async fn test_feed_forwards_updates_in_order() {
        let (signal_tx, signal_rx) = mpsc::channel(16);
        let (render_tx, render_rx) = mpsc::channel(16);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        signal_tx.send(say("too early")).await.unwrap();
        signal_tx.send(ready()).await.unwrap();
        signal_tx.send(say("one")).await.unwrap();
        signal_tx.send(say("two")).await.unwrap();
        drop(signal_tx);

        let feed = ChatFeed::new(ChatHost::new(Config::default()), signal_rx, render_tx);
        let (host, stats) = feed.run(shutdown_rx).await.unwrap();
        let updates = drain(render_rx).await;

        assert_eq!(updates.len(), 4, "ignored signal is not forwarded");
        assert!(matches!(updates[0], RenderUpdate::Redraw { tab: Channel::World, .. }));
        assert!(matches!(&updates[1], RenderUpdate::Append { event } if event.display_content() == "one"));
        assert!(matches!(&updates[2], RenderUpdate::Append { event } if event.display_content() == "two"));
        assert_eq!(updates[3], RenderUpdate::Closed);

        assert_eq!(
            stats,
            FeedStats {
                signals: 4,
                appended: 2,
                hidden: 0,
                ignored: 1
            }
        );
        assert!(!host.is_ready());
    }

    #[tokio::test]
    async fn test_feed_stops_on_shutdown() {
        let (signal_tx, signal_rx) = mpsc::channel(16);
        let (render_tx, mut render_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        signal_tx.send(ready()).await.unwrap();

        let feed = ChatFeed::new(ChatHost::new(Config::default()), signal_rx, render_tx);
        let handle = tokio::spawn(feed.run(shutdown_rx));

        // Wait for the ready redraw, then stop while the source stays open
        assert!(matches!(
            render_rx.recv().await,
            Some(RenderUpdate::Redraw { .. })
        ));
        shutdown_tx.send(()).unwrap();

        let (host, _) = handle.await.unwrap().unwrap();
        assert!(!host.is_ready());
        assert_eq!(render_rx.recv().await, Some(RenderUpdate::Closed));
        drop(signal_tx);
    }

    #[tokio::test]
    async fn test_feed_without_ready_sends_nothing() {
        let (signal_tx, signal_rx) = mpsc::channel(4);
        let (render_tx, render_rx) = mpsc::channel(4);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        signal_tx.send(say("nobody home")).await.unwrap();
        drop(signal_tx);

        let feed = ChatFeed::new(ChatHost::new(Config::default()), signal_rx, render_tx);
        let (_, stats) = feed.run(shutdown_rx).await.unwrap();

        assert!(drain(render_rx).await.is_empty());
        assert_eq!(stats.ignored, 1);
    }
}
