//! End-to-end routing scenarios through the public API

use tabbed_chat::actors::{NoActors, Roster, TokenEntry};
use tabbed_chat::classifier::Classifier;
use tabbed_chat::store::{InsertOutcome, ScopedStore};
use tabbed_chat::viewer::ViewerContext;
use tabbed_chat::{
    Author, Channel, ChatHost, ChatRouter, Config, HostSignal, MessageKind, RawEvent,
    RenderUpdate, ScopeKey, TaggedEvent,
};

const ALL_KINDS: [MessageKind; 4] = [
    MessageKind::Roll,
    MessageKind::Whisper,
    MessageKind::InCharacter,
    MessageKind::Other,
];

fn alice(kind: MessageKind, content: &str) -> RawEvent {
    RawEvent::new(kind, Author::new("u1", "Alice"), content)
}

fn roster() -> Roster {
    Roster::new(vec![TokenEntry::new("Aria", ["u1"])])
}

fn tag(kind: MessageKind, content: &str) -> TaggedEvent {
    Classifier::default().tag(alice(kind, content), &NoActors)
}

fn contents(events: &[TaggedEvent]) -> Vec<&str> {
    events.iter().map(|e| e.display_content()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Classification
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn in_character_goes_to_world_under_character_name() {
    let classifier = Classifier::default();
    let viewer = ViewerContext::new("u2", false);

    for (directory, expected) in [(roster(), "Aria"), (Roster::default(), "Alice")] {
        let result = classifier.classify(
            alice(MessageKind::InCharacter, "Well met."),
            &viewer,
            &directory,
        );
        assert_eq!(result.event.channel(), Channel::World);
        assert_eq!(result.event.display_name(), expected);
        assert_eq!(result.event.display_content(), "Well met.");
        assert!(result.visible);
    }
}

#[test]
fn ooc_command_wins_over_every_kind() {
    let classifier = Classifier::default();
    let viewer = ViewerContext::new("u1", false);

    for kind in ALL_KINDS {
        let result = classifier.classify(alice(kind, "/b hello"), &viewer, &roster());
        assert_eq!(
            result.event.channel(),
            Channel::OutOfCharacter,
            "kind {:?} should be overridden by /b",
            kind
        );
        assert_eq!(result.event.display_content(), "hello");
        assert!(result.event.display_name().starts_with("[OOC] "));
        assert_eq!(result.event.display_name(), "[OOC] Aria");
    }
}

#[test]
fn global_command_uses_own_name() {
    let result = Classifier::default().classify(
        alice(MessageKind::InCharacter, "/g hello"),
        &ViewerContext::new("u1", false),
        &roster(),
    );
    assert_eq!(result.event.channel(), Channel::OutOfCharacter);
    assert_eq!(result.event.display_content(), "hello");
    assert_eq!(result.event.display_name(), "[Global] Alice");
}

#[test]
fn classification_is_idempotent() {
    let classifier = Classifier::default();
    let viewer = ViewerContext::new("u1", false).with_active_channel(Channel::Game);
    let raw = alice(MessageKind::Roll, "1d20 = 14");

    let first = classifier.classify(raw.clone(), &viewer, &roster());
    let second = classifier.classify(raw, &viewer, &roster());
    assert_eq!(first, second);
    assert!(first.visible);
}

#[test]
fn whisper_visibility_by_viewer() {
    let classifier = Classifier::default();
    let whisper = RawEvent::whisper(Author::new("U1", "Alice"), "meet me", ["U2"]);

    let cases = [
        (ViewerContext::new("U3", false), false),
        (ViewerContext::new("U2", false), true),
        (ViewerContext::new("U1", false), true),
        (ViewerContext::new("anyone", true), true),
    ];

    for (viewer, expected) in cases {
        let viewer = viewer.with_active_channel(Channel::Messages);
        let result = classifier.classify(whisper.clone(), &viewer, &NoActors);
        assert_eq!(result.event.channel(), Channel::Messages);
        assert_eq!(
            result.visible, expected,
            "viewer {} (privileged: {})",
            viewer.viewer_id, viewer.is_privileged
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn scene_history_survives_scene_switch() {
    let mut router = ChatRouter::from_config(&Config::default());
    let s1 = ScopeKey::new("S1");

    router.change_scope(Some(s1.clone()));
    let stored = router.ingest(alice(MessageKind::Roll, "E")).stored;
    assert_eq!(stored, InsertOutcome::Scene(s1.clone()));

    router.change_scope(Some(ScopeKey::new("S2")));
    assert!(router.fetch(Channel::Game).is_empty());
    router.ingest(alice(MessageKind::Roll, "other scene"));

    router.change_scope(Some(s1));
    assert_eq!(contents(router.fetch(Channel::Game)), vec!["E"]);
}

#[test]
fn messages_channel_ignores_scope() {
    let mut store = ScopedStore::new();
    let s1 = ScopeKey::new("S1");
    let whisper = Classifier::default().tag(
        RawEvent::whisper(Author::new("u1", "Alice"), "psst", ["u2"]),
        &NoActors,
    );

    assert_eq!(store.insert(Some(&s1), whisper), InsertOutcome::Global);

    for scope in [Some(&s1), Some(&ScopeKey::new("S9")), None] {
        assert_eq!(contents(store.fetch(scope, Channel::Messages)), vec!["psst"]);
    }
}

#[test]
fn insert_without_scene_is_dropped() {
    let mut store = ScopedStore::new();
    let s0 = ScopeKey::new("S0");
    store.insert(Some(&s0), tag(MessageKind::InCharacter, "kept"));

    let outcome = store.insert(None, tag(MessageKind::InCharacter, "lost"));
    assert_eq!(outcome, InsertOutcome::DroppedNoScope);
    assert!(!outcome.is_stored());

    assert_eq!(contents(store.fetch(Some(&s0), Channel::World)), vec!["kept"]);

    let s1 = ScopeKey::new("S1");
    store.ensure_scope(&s1);
    for channel in Channel::ALL {
        assert!(
            !contents(store.fetch(Some(&s1), channel)).contains(&"lost"),
            "dropped event resurfaced in {}",
            channel
        );
    }
}

#[test]
fn fetch_preserves_insertion_order() {
    let mut store = ScopedStore::new();
    let scope = ScopeKey::new("S1");
    for content in ["E1", "E2", "E3"] {
        store.insert(Some(&scope), tag(MessageKind::Other, content));
    }

    assert_eq!(
        contents(store.fetch(Some(&scope), Channel::OutOfCharacter)),
        vec!["E1", "E2", "E3"]
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Host lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn host_session_from_json_signals() {
    let lines = [
        r#"{"type": "message", "event": {"kind": "in_character", "author": {"id": "u1", "display_name": "Alice"}, "content": "before ready"}}"#,
        r#"{"type": "ready", "scene": "S1", "tokens": [{"actor": "Aria", "owners": ["u1"]}]}"#,
        r#"{"type": "pre_send", "author": {"id": "u1", "display_name": "Alice"}, "message": {"kind": "in_character", "content": "/b one sec"}}"#,
        r#"{"type": "tab_selected", "tab": "ooc"}"#,
    ];

    let mut host = ChatHost::new(Config {
        viewer_id: "u1".to_string(),
        ..Config::default()
    });
    let updates: Vec<RenderUpdate> = lines
        .iter()
        .map(|line| host.handle(serde_json::from_str::<HostSignal>(line).unwrap()))
        .collect();

    assert_eq!(updates[0], RenderUpdate::Ignored);
    assert!(matches!(updates[2], RenderUpdate::Hidden { channel: Channel::OutOfCharacter, .. }));

    match &updates[3] {
        RenderUpdate::Redraw { tab, scene, events } => {
            assert_eq!(*tab, Channel::OutOfCharacter);
            assert_eq!(scene.as_ref(), Some(&ScopeKey::new("S1")));
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].display_name(), "[OOC] Aria");
            assert_eq!(events[0].display_content(), "one sec");
            assert_eq!(events[0].raw().kind, MessageKind::OutOfCharacter);
        }
        other => panic!("Expected Redraw, got {:?}", other),
    }
}
