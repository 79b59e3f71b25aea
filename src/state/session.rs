//! The single live session and its persisted mirror.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is the source of truth for who is logged in. It is created
//! once at startup, shared through `Arc`, and observed through a `watch`
//! channel. The HTTP interceptor tears it down on 401; `Auth` drives every
//! other transition.
//!
//! DESIGN
//! ======
//! Token and user live together in `Option<Credentials>`, so a half session
//! cannot exist in memory. Every memory change happens inside the watch
//! sender's modify closure together with the matching storage write, which
//! keeps the two in step and serializes concurrent teardowns.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tokio::sync::watch;

use crate::net::types::{User, UserPatch};
use crate::util::storage::{CredentialStore, Credentials, KeyValueStore, StorageError};

/// Observable session snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    credentials: Option<Credentials>,
    loading: bool,
}

impl SessionState {
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

pub struct SessionStore {
    state: watch::Sender<SessionState>,
    persisted: CredentialStore,
}

impl SessionStore {
    /// New store in the startup state: unauthenticated and loading until
    /// [`SessionStore::initialize`] runs.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let (state, _) = watch::channel(SessionState { credentials: None, loading: true });
        Self { state, persisted: CredentialStore::new(storage) }
    }

    /// Restore the persisted session. Unreadable or partial records are
    /// wiped. Always clears the loading flag. Returns whether a session was
    /// restored.
    pub fn initialize(&self) -> bool {
        let restored = match self.persisted.load() {
            Ok(restored) => restored,
            Err(e) => {
                tracing::warn!(error = %e, "persisted session unusable; clearing");
                if let Err(e) = self.persisted.clear() {
                    tracing::error!(error = %e, "failed to clear persisted session");
                }
                None
            }
        };
        let authenticated = restored.is_some();
        if let Some(creds) = &restored {
            tracing::info!(user_id = creds.user.id, "session restored");
        }
        self.state.send_modify(|state| {
            state.credentials = restored;
            state.loading = false;
        });
        authenticated
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Bearer token as persisted; what the request interceptor attaches.
    #[must_use]
    pub fn persisted_token(&self) -> Option<String> {
        self.persisted.token().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read persisted token");
            None
        })
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.loading != loading;
            state.loading = loading;
            changed
        });
    }

    /// Store a fresh session in storage and memory and clear loading.
    ///
    /// # Errors
    ///
    /// Returns the storage error if persisting fails; both storage and
    /// memory are left cleared in that case.
    pub fn establish(&self, credentials: Credentials) -> Result<(), StorageError> {
        let mut outcome = Ok(());
        self.state.send_modify(|state| {
            state.loading = false;
            match self.persisted.save(&credentials) {
                Ok(()) => state.credentials = Some(credentials),
                Err(e) => {
                    if let Err(clear) = self.persisted.clear() {
                        tracing::error!(error = %clear, "failed to clear partial session");
                    }
                    state.credentials = None;
                    outcome = Err(e);
                }
            }
        });
        outcome
    }

    /// Clear storage and memory. Returns whether anything was there, so a
    /// burst of concurrent 401s reports the teardown once.
    pub fn teardown(&self) -> bool {
        let mut existed = false;
        self.state.send_if_modified(|state| {
            existed = state.credentials.is_some() || self.persisted.has_any();
            if let Err(e) = self.persisted.clear() {
                tracing::error!(error = %e, "failed to clear persisted session");
            }
            let changed = state.credentials.is_some() || state.loading;
            state.credentials = None;
            state.loading = false;
            changed
        });
        existed
    }

    /// Overwrite the cached user. No-op without a session.
    pub fn replace_user(&self, user: User) -> bool {
        self.update_user(|current| *current = user)
    }

    /// Shallow-merge into the cached user. No-op without a session.
    pub fn merge_user(&self, patch: &UserPatch) -> bool {
        self.update_user(|current| current.apply(patch))
    }

    fn update_user(&self, apply: impl FnOnce(&mut User)) -> bool {
        self.state.send_if_modified(|state| {
            let Some(creds) = state.credentials.as_mut() else {
                return false;
            };
            apply(&mut creds.user);
            if let Err(e) = self.persisted.save_user(&creds.user) {
                tracing::error!(error = %e, user_id = creds.user.id, "failed to persist updated user");
            }
            true
        })
    }
}
