// Terminal renderer - prints the selected tab as plain lines
//
// Consumes RenderUpdates from the feed:
// - Redraw prints a tab bar and the full visible history of the selected tab
// - Append prints one line
// - Hidden bumps the unread counter of the event's tab, if a redraw of that
//   tab would show it (kept in history and readable by this viewer)
// - Closed ends the loop
//
// Unread counters are shown in the tab bar, e.g. `[WORLD]  OOC  GAME (2)  MESSAGES`.

use crate::channel::Channel;
use crate::events::{ScopeKey, TaggedEvent};
use crate::host::RenderUpdate;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Write;
use tokio::sync::mpsc;

/// Format a tagged event as a single chat line
pub fn format_event_line(event: &TaggedEvent) -> String {
    let marker = match event.channel() {
        Channel::Messages => " (whisper)",
        _ => "",
    };
    format!(
        "[{}] {}{}: {}",
        event.raw().timestamp.format("%H:%M:%S"),
        event.display_name(),
        marker,
        event.display_content()
    )
}

/// Writes render updates to any `Write` sink (stdout in the binary)
pub struct TerminalRenderer<W: Write> {
    out: W,
    active: Channel,
    unread: HashMap<Channel, usize>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            active: Channel::default(),
            unread: HashMap::new(),
        }
    }

    /// Unread count of a tab
    pub fn unread(&self, channel: Channel) -> usize {
        self.unread.get(&channel).copied().unwrap_or(0)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn tab_bar(&self) -> String {
        Channel::ALL
            .iter()
            .map(|&channel| {
                let label = if channel == self.active {
                    format!("[{}]", channel.label())
                } else {
                    channel.label().to_string()
                };
                match self.unread(channel) {
                    0 => label,
                    n => format!("{} ({})", label, n),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    /// Apply one update. Returns false once the chat is closed
    pub fn apply(&mut self, update: &RenderUpdate) -> Result<bool> {
        match update {
            RenderUpdate::Redraw { tab, scene, events } => {
                self.active = *tab;
                self.unread.remove(tab);
                self.redraw(scene.as_ref(), events)?;
            }
            RenderUpdate::Append { event } => {
                writeln!(self.out, "{}", format_event_line(event))
                    .context("Failed to write chat line")?;
            }
            RenderUpdate::Hidden {
                channel,
                stored,
                readable,
                ..
            } => {
                if stored.is_stored() && *readable {
                    *self.unread.entry(*channel).or_insert(0) += 1;
                }
            }
            RenderUpdate::Closed => {
                writeln!(self.out, "── chat closed ──").context("Failed to write chat line")?;
                self.out.flush().context("Failed to flush output")?;
                return Ok(false);
            }
            RenderUpdate::Ignored => {}
        }

        self.out.flush().context("Failed to flush output")?;
        Ok(true)
    }

    fn redraw(&mut self, scene: Option<&ScopeKey>, events: &[TaggedEvent]) -> Result<()> {
        let scene = scene.map(ScopeKey::as_str).unwrap_or("no scene");
        writeln!(self.out).context("Failed to write tab bar")?;
        writeln!(self.out, "{}    ({})", self.tab_bar(), scene).context("Failed to write tab bar")?;

        if events.is_empty() {
            writeln!(self.out, "  (no messages)").context("Failed to write chat line")?;
        }
        for event in events {
            writeln!(self.out, "{}", format_event_line(event)).context("Failed to write chat line")?;
        }
        Ok(())
    }

    /// Render updates until the chat closes or the feed goes away
    pub async fn run(mut self, mut render_rx: mpsc::Receiver<RenderUpdate>) -> Result<W> {
        while let Some(update) = render_rx.recv().await {
            if !self.apply(&update)? {
                break;
            }
        }
        Ok(self.out)
    }
}
