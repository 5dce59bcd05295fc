//! Integration tests for persisted state: storage file, auth gate, and
//! session identifier lifecycle.

use opera_kb_app::{
    do_login, do_logout, is_authenticated, ChatSession, Storage, ACCESS_PASSWORD, AUTH_KEY,
    SESSION_KEY,
};
use opera_kb_client::ChatClient;
use predicates::prelude::*;

fn temp_storage(dir: &tempfile::TempDir) -> Storage {
    Storage::new(dir.path().join("state.json"))
}

#[test]
fn storage_set_get_remove_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);

    assert_eq!(storage.get("missing"), None);
    storage.set("key", "value").expect("set should succeed");
    assert_eq!(storage.get("key").as_deref(), Some("value"));
    storage.remove("key").expect("remove should succeed");
    assert_eq!(storage.get("key"), None);
}

#[test]
fn storage_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    let storage = Storage::new(&path);

    storage.set("k", "v").expect("set should succeed");
    let pred = predicates::path::exists();
    assert!(pred.eval(&path), "state file should exist after set");
}

#[test]
fn storage_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    Storage::new(&path).set("k", "v").unwrap();
    let reopened = Storage::new(&path);
    assert_eq!(reopened.get("k").as_deref(), Some("v"));
}

/// State path resolves to `~/.opera-kb/state.json` using the current
/// platform's home dir. We override the HOME env var to a temp dir to
/// verify the resolution.
#[test]
fn default_path_uses_home_directory() {
    let dir = tempfile::tempdir().unwrap();

    // Override HOME (Unix) / USERPROFILE (Windows) temporarily.
    let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let original = std::env::var(key).ok();

    std::env::set_var(key, dir.path());
    let path = Storage::default_path();
    // Restore.
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }

    let path = path.expect("should resolve a state path");
    let expected = dir.path().join(".opera-kb").join("state.json");
    assert_eq!(path, expected);
}

#[test]
fn login_with_correct_password_persists_flag() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);

    assert!(!is_authenticated(&storage));
    let accepted = do_login(&storage, ACCESS_PASSWORD).expect("login should succeed");
    assert!(accepted);
    assert!(is_authenticated(&storage));
    assert_eq!(storage.get(AUTH_KEY).as_deref(), Some("true"));
}

#[test]
fn login_with_wrong_password_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);

    let accepted = do_login(&storage, "wrong").expect("login call should not error");
    assert!(!accepted);
    assert!(!is_authenticated(&storage));
}

#[test]
fn logout_clears_auth_flag() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);

    do_login(&storage, ACCESS_PASSWORD).unwrap();
    do_logout(&storage).expect("logout should succeed");
    assert!(!is_authenticated(&storage));
}

#[test]
fn resume_creates_and_persists_a_uuid_session() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);

    let session = ChatSession::resume(ChatClient::new("http://127.0.0.1:1"), &storage)
        .expect("resume should succeed");

    // UUID-shaped and persisted under the fixed key.
    uuid::Uuid::parse_str(session.session_id()).expect("session id should be a uuid");
    assert_eq!(
        storage.get(SESSION_KEY).as_deref(),
        Some(session.session_id())
    );
    assert!(session.history().is_empty());
}

#[test]
fn resume_reuses_the_persisted_session() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);
    storage.set(SESSION_KEY, "11111111-2222-3333-4444-555555555555").unwrap();

    let session = ChatSession::resume(ChatClient::new("http://127.0.0.1:1"), &storage)
        .expect("resume should succeed");
    assert_eq!(
        session.session_id(),
        "11111111-2222-3333-4444-555555555555"
    );
}

#[test]
fn reset_rotates_the_session_and_clears_history() {
    let dir = tempfile::tempdir().unwrap();
    let storage = temp_storage(&dir);

    let mut session = ChatSession::resume(ChatClient::new("http://127.0.0.1:1"), &storage)
        .expect("resume should succeed");
    let old_id = session.session_id().to_string();

    session.reset(&storage).expect("reset should succeed");

    assert_ne!(session.session_id(), old_id);
    assert!(session.history().is_empty());
    assert_eq!(
        storage.get(SESSION_KEY).as_deref(),
        Some(session.session_id())
    );
}
