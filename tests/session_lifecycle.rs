//! Integration tests for transcript persistence and session rotation
//!
//! Exercises the complete lifecycle: appending messages, rotating the
//! transcript into the archive, bound enforcement, and title derivation.

use confidant::message::ChatMessage;
use confidant::session::{PersistencePolicy, SessionManager, DEFAULT_MAX_ARCHIVED};
use confidant::store::TranscriptStore;
use tempfile::TempDir;

fn new_session(dir: &TempDir) -> SessionManager {
    let store = TranscriptStore::open(dir.path().join("chat.db")).expect("open failed");
    SessionManager::new(store)
}

#[test]
fn test_append_order_is_call_order() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    for i in 0..20 {
        let message = if i % 2 == 0 {
            ChatMessage::user(format!("msg {}", i))
        } else {
            ChatMessage::assistant(format!("msg {}", i))
        };
        session.append(&message).expect("append failed");
    }

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 20);
    for (i, message) in transcript.iter().enumerate() {
        assert_eq!(message.content, format!("msg {}", i));
    }
}

#[test]
fn test_placeholder_never_persisted() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    session
        .append(&ChatMessage::user("before"))
        .expect("append failed");
    session
        .append(&ChatMessage::placeholder("Thinking..."))
        .expect("append failed");
    session
        .append(&ChatMessage::assistant("after"))
        .expect("append failed");

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript.iter().all(|m| !m.is_placeholder()));
}

#[test]
fn test_transcript_survives_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let db_path = dir.path().join("chat.db");

    {
        let store = TranscriptStore::open(&db_path).expect("open failed");
        let session = SessionManager::new(store);
        session
            .append(&ChatMessage::user("durable"))
            .expect("append failed");
    }

    let store = TranscriptStore::open(&db_path).expect("reopen failed");
    let session = SessionManager::new(store);
    assert_eq!(session.message_count(), 1);
    assert_eq!(session.transcript()[0].content, "durable");
}

#[test]
fn test_archive_bound_at_default_limit() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    for i in 0..(DEFAULT_MAX_ARCHIVED + 5) {
        session
            .append(&ChatMessage::user(format!("chat {}", i)))
            .expect("append failed");
        session.archive_current().expect("archive failed");
    }

    assert_eq!(session.history().len(), DEFAULT_MAX_ARCHIVED);
}

#[test]
fn test_fifo_eviction_with_known_ids() {
    let dir = TempDir::new().expect("tempdir");
    let store = TranscriptStore::open(dir.path().join("chat.db")).expect("open failed");
    let session = SessionManager::with_options(store, 5, PersistencePolicy::BestEffort);

    let mut ids = Vec::new();
    for i in 0..5 {
        session
            .append(&ChatMessage::user(format!("filler {}", i)))
            .expect("append failed");
        let archived = session
            .archive_current()
            .expect("archive failed")
            .expect("expected session");
        ids.push(archived.id);
    }

    // One more rotation evicts exactly the oldest entry
    session
        .append(&ChatMessage::user("newest"))
        .expect("append failed");
    let newest = session
        .archive_current()
        .expect("archive failed")
        .expect("expected session");

    let history_ids: Vec<String> = session.history().iter().map(|s| s.id.clone()).collect();
    let mut expected: Vec<String> = ids[1..].to_vec();
    expected.push(newest.id);
    assert_eq!(history_ids, expected);
}

#[test]
fn test_archived_sessions_are_immutable_snapshots() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    session
        .append(&ChatMessage::user("snapshot me"))
        .expect("append failed");
    session.archive_current().expect("archive failed");

    // Later transcript activity must not leak into the archived session
    session
        .append(&ChatMessage::user("later message"))
        .expect("append failed");

    let history = session.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message_count(), 1);
    assert_eq!(history[0].messages[0].content, "snapshot me");
}

#[test]
fn test_archiving_empty_transcript_changes_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    session
        .append(&ChatMessage::user("only conversation"))
        .expect("append failed");
    session.archive_current().expect("archive failed");

    let before = session.history().len();
    let archived = session.archive_current().expect("archive failed");

    assert!(archived.is_none());
    assert_eq!(session.history().len(), before);
    assert!(session.transcript().is_empty());
}

#[test]
fn test_user_texts_most_recent_first() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    session.append(&ChatMessage::user("a")).expect("append");
    session.append(&ChatMessage::assistant("b")).expect("append");
    session.append(&ChatMessage::user("c")).expect("append");

    assert_eq!(session.user_texts(), vec!["c", "a"]);
}

#[test]
fn test_title_cases_end_to_end() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    // Whitespace-only user message
    session.append(&ChatMessage::user("  ")).expect("append");
    let archived = session.archive_current().expect("archive").unwrap();
    assert_eq!(archived.title, "new conversation");

    // Assistant-only transcript
    session
        .append(&ChatMessage::assistant("hi"))
        .expect("append");
    let archived = session.archive_current().expect("archive").unwrap();
    assert_eq!(archived.title, "new conversation");

    // Short user message kept verbatim
    session
        .append(&ChatMessage::user("Hello there"))
        .expect("append");
    let archived = session.archive_current().expect("archive").unwrap();
    assert_eq!(archived.title, "Hello there");

    // Long user message truncated at 20 characters
    let long = "This is a message that is definitely over twenty characters";
    session.append(&ChatMessage::user(long)).expect("append");
    let archived = session.archive_current().expect("archive").unwrap();
    let expected: String = long.chars().take(20).collect();
    assert_eq!(archived.title, format!("{}...", expected));
}

#[test]
fn test_clear_all_resets_everything() {
    let dir = TempDir::new().expect("tempdir");
    let session = new_session(&dir);

    session.append(&ChatMessage::user("one")).expect("append");
    session.archive_current().expect("archive");
    session.append(&ChatMessage::user("two")).expect("append");

    session.clear_all().expect("clear failed");

    assert_eq!(session.message_count(), 0);
    assert!(session.history().is_empty());
    assert!(session.user_texts().is_empty());
}
