use std::collections::BTreeSet;
use std::sync::Arc;

use super::*;

fn user() -> User {
    User {
        id: 7,
        name: "Ana".to_owned(),
        email: "ana@example.com".to_owned(),
        phone: None,
        avatar_url: None,
        bio: None,
        roles: BTreeSet::from(["ROLE_USER".to_owned()]),
        active: None,
        created_at: None,
        updated_at: None,
    }
}

fn memory_credentials() -> (Arc<MemoryStore>, CredentialStore) {
    let store = Arc::new(MemoryStore::new());
    let creds = CredentialStore::new(store.clone());
    (store, creds)
}

// =============================================================
// MemoryStore
// =============================================================

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    store.set_many(&[("a", "1".to_owned()), ("b", "2".to_owned())]).unwrap();
    assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    store.remove_many(&["a", "missing"]).unwrap();
    assert!(store.get("a").unwrap().is_none());
    assert_eq!(store.len(), 1);
}

// =============================================================
// CredentialStore
// =============================================================

#[test]
fn credentials_empty_store_loads_none() {
    let (_, creds) = memory_credentials();
    assert!(creds.load().unwrap().is_none());
}

#[test]
fn credentials_save_then_load_returns_same_pair() {
    let (store, creds) = memory_credentials();
    let pair = Credentials { token: "T".to_owned(), user: user() };
    creds.save(&pair).unwrap();

    assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("T"));
    assert_eq!(creds.load().unwrap(), Some(pair));
}

#[test]
fn credentials_token_without_user_is_incomplete() {
    let (store, creds) = memory_credentials();
    store.insert_raw(TOKEN_KEY, "T");
    assert!(matches!(creds.load(), Err(StorageError::Incomplete(USER_KEY))));
}

#[test]
fn credentials_user_without_token_is_incomplete() {
    let (store, creds) = memory_credentials();
    store.insert_raw(USER_KEY, &serde_json::to_string(&user()).unwrap());
    assert!(matches!(creds.load(), Err(StorageError::Incomplete(TOKEN_KEY))));
}

#[test]
fn credentials_corrupt_user_is_json_error() {
    let (store, creds) = memory_credentials();
    store.insert_raw(TOKEN_KEY, "T");
    store.insert_raw(USER_KEY, "{not json");
    assert!(matches!(creds.load(), Err(StorageError::Json(_))));
}

#[test]
fn credentials_clear_removes_both_keys() {
    let (store, creds) = memory_credentials();
    creds.save(&Credentials { token: "T".to_owned(), user: user() }).unwrap();
    assert!(creds.has_any());
    creds.clear().unwrap();
    assert!(store.is_empty());
    assert!(!creds.has_any());
}

// =============================================================
// FileStore
// =============================================================

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let first = CredentialStore::new(Arc::new(FileStore::new(&path)));
    first.save(&Credentials { token: "T".to_owned(), user: user() }).unwrap();

    let second = CredentialStore::new(Arc::new(FileStore::new(&path)));
    let loaded = second.load().unwrap().unwrap();
    assert_eq!(loaded.token, "T");
    assert_eq!(loaded.user.email, "ana@example.com");
}

#[test]
fn file_store_clear_removes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let creds = CredentialStore::new(Arc::new(FileStore::new(&path)));
    creds.save(&Credentials { token: "T".to_owned(), user: user() }).unwrap();
    assert!(path.exists());

    creds.clear().unwrap();
    assert!(!path.exists());
}

#[test]
fn file_store_missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("absent.json"));
    assert!(store.get(TOKEN_KEY).unwrap().is_none());
}

#[test]
fn file_store_corrupt_file_errors_on_read_but_clears() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "garbage").unwrap();
    let store = FileStore::new(&path);

    assert!(store.get(TOKEN_KEY).is_err());
    store.remove_many(&[TOKEN_KEY, USER_KEY]).unwrap();
    assert!(!path.exists());
}
