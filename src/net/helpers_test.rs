//! Shared fixtures for the client and service tests.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::http::ApiClient;
use super::types::User;
use crate::config::ClientConfig;
use crate::state::session::SessionStore;
use crate::util::nav::RecordingNavigator;
use crate::util::notify::RecordingNotifier;
use crate::util::storage::{Credentials, MemoryStore};

/// Client wired to recording sinks and an in-memory session.
pub struct Harness {
    pub api: ApiClient,
    pub storage: Arc<MemoryStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

#[must_use]
pub fn harness(url: &str) -> Harness {
    let storage = Arc::new(MemoryStore::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let navigator = Arc::new(RecordingNavigator::new());
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.initialize();
    let api = ApiClient::builder(ClientConfig::for_url(url))
        .session(session)
        .notifier(notifier.clone())
        .navigator(navigator.clone())
        .build()
        .expect("client should build");
    Harness { api, storage, notifier, navigator }
}

#[must_use]
pub fn sample_user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_owned(),
        email: "a@b.com".to_owned(),
        phone: None,
        avatar_url: None,
        bio: None,
        roles: BTreeSet::new(),
        active: None,
        created_at: None,
        updated_at: None,
    }
}

/// Put a session in place without going through the login endpoint.
pub fn sign_in(api: &ApiClient, token: &str, user: User) {
    api.session()
        .establish(Credentials { token: token.to_owned(), user })
        .expect("memory storage should not fail");
}
