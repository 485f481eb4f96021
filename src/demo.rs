// Demo mode: scripted table session to showcase the tabbed chat
//
// The script plays a short evening at the tavern as seen by the default viewer
// ("player", who plays Aria). It exercises every routing path:
// - In-character speech shown under character names
// - Dice rolls landing in the GAME tab
// - `/b` and `/g` out-of-character commands
// - Whispers, including one the viewer is not allowed to read
// - A scene change and return, with history kept per scene
//
// Run with: TABBED_CHAT_DEMO=1 cargo run --release

use crate::actors::TokenEntry;
use crate::channel::Channel;
use crate::events::{Author, MessageKind, RawEvent, ScopeKey};
use crate::host::HostSignal;
use crate::intercept::OutgoingMessage;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::oneshot;
use tokio::time::sleep;

/// Viewer id the script is written for
pub const DEMO_VIEWER_ID: &str = "player";

fn player() -> Author {
    Author::new(DEMO_VIEWER_ID, "Sam")
}

fn friend() -> Author {
    Author::new("u2", "Jo")
}

fn gm() -> Author {
    Author::new("gm", "Game Master")
}

fn tavern_tokens() -> Vec<TokenEntry> {
    let mut innkeeper = TokenEntry::new("Innkeeper", ["gm"]);
    innkeeper.player_owned = false;
    vec![
        TokenEntry::new("Aria", [DEMO_VIEWER_ID]),
        TokenEntry::new("Bran", ["u2"]),
        innkeeper,
    ]
}

fn say(author: Author, kind: MessageKind, content: &str) -> HostSignal {
    HostSignal::Message {
        event: RawEvent::new(kind, author, content),
    }
}

fn whisper(author: Author, content: &str, to: &[&str]) -> HostSignal {
    HostSignal::Message {
        event: RawEvent::whisper(author, content, to.iter().copied()),
    }
}

fn tab(channel: Channel) -> HostSignal {
    HostSignal::TabSelected { tab: channel }
}

fn scene(key: &str, tokens: Vec<TokenEntry>) -> HostSignal {
    HostSignal::SceneChanged {
        scene: Some(ScopeKey::new(key)),
        tokens: Some(tokens),
    }
}

/// The scripted session, with a pause (ms) after each signal
pub fn generate_demo_sequence() -> Vec<(HostSignal, u64)> {
    use MessageKind::*;

    vec![
        // === Arrival ===
        (
            HostSignal::Ready {
                scene: Some(ScopeKey::new("tavern")),
                tokens: Some(tavern_tokens()),
            },
            600,
        ),
        (say(gm(), Other, "The Prancing Pony is loud tonight."), 500),
        (say(player(), InCharacter, "Innkeeper! Two ales, please."), 700),
        (say(friend(), InCharacter, "Make it three, I'm parched."), 700),
        (say(player(), Roll, "Persuasion: 1d20 + 4 = 17"), 400),
        // Roll was hidden on WORLD, look at it
        (tab(Channel::Game), 900),
        (say(friend(), Roll, "Perception: 1d20 + 2 = 9"), 600),
        // === Out of character chatter ===
        (tab(Channel::OutOfCharacter), 500),
        (
            HostSignal::PreSend {
                author: player(),
                message: OutgoingMessage::new(InCharacter, "/b brb, grabbing snacks"),
            },
            600,
        ),
        (say(friend(), InCharacter, "/g anyone else hear thunder?"), 600),
        (say(gm(), OutOfCharacter, "Ten minute break after this scene."), 700),
        // === Whispers ===
        (whisper(gm(), "You notice a hooded figure by the fire.", &[DEMO_VIEWER_ID]), 400),
        (tab(Channel::Messages), 900),
        // Not addressed to the viewer: stored, but hidden even on this tab
        (whisper(gm(), "Bran's purse feels lighter.", &["u2"]), 400),
        (whisper(player(), "Keep an eye on the hooded one.", &["u2"]), 600),
        // === On the road ===
        (tab(Channel::World), 400),
        (scene("road", vec![TokenEntry::new("Aria", [DEMO_VIEWER_ID])]), 700),
        (say(player(), InCharacter, "The road is quiet. Too quiet."), 700),
        (say(gm(), Other, "Wolves howl in the distance."), 700),
        // === Back to the tavern, history intact ===
        (scene("tavern", tavern_tokens()), 900),
        (say(friend(), InCharacter, "Back already?"), 600),
        (HostSignal::Shutdown, 0),
    ]
}

/// Send the scripted session, stopping early on shutdown
pub async fn run_demo(tx: mpsc::Sender<HostSignal>, mut shutdown_rx: oneshot::Receiver<()>) {
    // Initial delay so the startup logs settle
    sleep(Duration::from_millis(300)).await;

    for (signal, delay_ms) in generate_demo_sequence() {
        if shutdown_rx.try_recv().is_ok() {
            return;
        }
        if tx.send(signal).await.is_err() {
            break;
        }

        tokio::select! {
            _ = sleep(Duration::from_millis(delay_ms)) => {}
            _ = &mut shutdown_rx => return,
        }
    }

    tracing::info!("Demo session finished");
}
