// Transcript source - replays host signals from a JSON Lines file
//
// One signal per line, tagged by `type`:
//   {"type": "ready", "scene": "tavern"}
//   {"type": "message", "event": {"kind": "in_character", "author": {...}, "content": "Hail!"}}
//   {"type": "tab_selected", "tab": "ooc"}
//
// Blank lines and lines starting with `#` are skipped. A malformed line is
// logged and skipped so one bad entry doesn't abort a whole session replay.

use crate::host::HostSignal;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Parse a single transcript line
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<HostSignal>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let signal = serde_json::from_str(line).context("Invalid host signal")?;
    Ok(Some(signal))
}

/// Parse a whole transcript, skipping lines that don't parse
pub fn parse_transcript(contents: &str) -> Vec<HostSignal> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match parse_line(line) {
            Ok(signal) => signal,
            Err(e) => {
                tracing::warn!(line = index + 1, error = %format!("{:#}", e), "Skipping transcript line");
                None
            }
        })
        .collect()
}

/// Read and parse a transcript file
pub async fn read_transcript(path: &Path) -> Result<Vec<HostSignal>> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read transcript {}", path.display()))?;
    Ok(parse_transcript(&contents))
}

/// Send every signal of a transcript to `tx`, pausing `delay` between signals
///
/// Stops early on shutdown or when the receiver is dropped. Returns the number
/// of signals sent.
pub async fn replay(
    path: &Path,
    tx: mpsc::Sender<HostSignal>,
    delay: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> Result<usize> {
    let signals = read_transcript(path).await?;
    tracing::info!(
        path = %path.display(),
        signals = signals.len(),
        "Replaying transcript"
    );

    let mut sent = 0;
    for signal in signals {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }
        if tx.send(signal).await.is_err() {
            break;
        }
        sent += 1;

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Ok(sent)
}
