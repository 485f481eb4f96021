// Tabbed chat - terminal client
//
// Wires a signal source (transcript replay or demo script) to a ChatHost and
// prints the selected tab to stdout. Logs go to stderr (and optionally JSON files).
//
// Tasks:
// - Source: sends HostSignals into an mpsc channel
// - Feed: handles signals, forwards RenderUpdates
// - Renderer: prints updates (runs in the main task)

use anyhow::{bail, Result};
use std::time::Duration;
use tabbed_chat::config::Config;
use tabbed_chat::feed::ChatFeed;
use tabbed_chat::render::TerminalRenderer;
use tabbed_chat::{cli, demo, logging, transcript, ChatHost};
use tokio::sync::{mpsc, oneshot};

/// Pause between replayed transcript signals
const REPLAY_DELAY: Duration = Duration::from_millis(150);

#[tokio::main]
async fn main() -> Result<()> {
    // Handle config subcommands first; they exit early
    let Some(run_args) = cli::handle_cli()? else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::load()?;
    run_args.apply(&mut config);

    // Guard must live until exit so file logs flush
    let _file_guard = logging::init(&config.logging)?;

    tracing::info!(
        viewer = %config.viewer_id,
        privileged = config.privileged,
        tab = %config.initial_tab,
        demo = config.demo_mode,
        "Starting tabbed chat"
    );

    // Bounded channels: a slow terminal applies backpressure to the source
    let (signal_tx, signal_rx) = mpsc::channel(config.channel_buffer);
    let (render_tx, render_rx) = mpsc::channel(config.channel_buffer);

    // One shutdown signal per task
    let (source_shutdown_tx, source_shutdown_rx) = oneshot::channel();
    let (feed_shutdown_tx, feed_shutdown_rx) = oneshot::channel();

    let source_handle = if config.demo_mode {
        tracing::info!("Running in DEMO MODE - playing scripted session");
        tokio::spawn(async move {
            demo::run_demo(signal_tx, source_shutdown_rx).await;
            Ok::<(), anyhow::Error>(())
        })
    } else if let Some(path) = config.transcript.clone() {
        tokio::spawn(async move {
            let sent =
                transcript::replay(&path, signal_tx, REPLAY_DELAY, source_shutdown_rx).await?;
            tracing::debug!(sent, "Transcript replay finished");
            Ok::<(), anyhow::Error>(())
        })
    } else {
        bail!("Nothing to show: pass --transcript FILE or --demo (or set TABBED_CHAT_TRANSCRIPT)");
    };

    let feed = ChatFeed::new(ChatHost::new(config.clone()), signal_rx, render_tx);
    let feed_handle = tokio::spawn(feed.run(feed_shutdown_rx));

    // Render in the main task until the chat closes or Ctrl+C
    let renderer = TerminalRenderer::new(std::io::stdout());
    tokio::select! {
        result = renderer.run(render_rx) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
        }
    }

    tracing::info!("Shutting down...");

    // Receivers may already be gone
    let _ = source_shutdown_tx.send(());
    let _ = feed_shutdown_tx.send(());

    let source_result = source_handle.await?;
    let (_, stats) = feed_handle.await??;
    tracing::debug!(signals = stats.signals, "Feed joined");

    if let Err(e) = source_result {
        tracing::error!("Signal source failed: {:#}", e);
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
