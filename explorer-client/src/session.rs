//! The persisted authentication state of one running client.
//!
//! A [`SessionStore`] is created once at startup and handed to everything
//! that needs to know who is signed in. Clones share state. Every mutation
//! is written through to the backing [`SessionStorage`] before it returns,
//! so a restart immediately afterwards observes the new state.

use crate::storage::{SessionStorage, StorageError};
use shared::models::{Session, UserRecord};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

struct State {
    session: Option<Session>,
    generation: u64,
}

struct Inner {
    storage: Arc<dyn SessionStorage>,
    key: String,
    state: Mutex<State>,
}

/// Shared handle to the current session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Open the store over `storage`, rehydrating from the record under `key`.
    pub fn open(storage: Arc<dyn SessionStorage>, key: impl Into<String>) -> Self {
        let store = Self {
            inner: Arc::new(Inner {
                storage,
                key: key.into(),
                state: Mutex::new(State {
                    session: None,
                    generation: 0,
                }),
            }),
        };
        let restored = store.load();
        if restored.is_some() {
            tracing::debug!(key = %store.inner.key, "restored persisted session");
        }
        store.state().session = restored;
        store
    }

    /// Storage key of the persisted record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Read the persisted record.
    ///
    /// Missing, unreadable or malformed records all yield `None`; corrupt
    /// contents are logged and otherwise ignored.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let raw = match self.inner.storage.read(&self.inner.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "session storage unreadable, treating as logged out");
                return None;
            }
        };

        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(err) => {
                tracing::warn!(error = %err, "discarding malformed session record");
                None
            }
        }
    }

    /// Install `session` as the current session, replacing any other.
    ///
    /// # Errors
    /// Returns an error if the session could not be persisted; the in-memory
    /// state is left unchanged in that case.
    pub fn login(&self, session: Session) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&session)?;
        let mut state = self.state();
        self.inner.storage.write(&self.inner.key, &encoded)?;
        state.session = Some(session);
        state.generation += 1;
        Ok(())
    }

    /// Clear the session and its persisted record. Safe to call repeatedly.
    ///
    /// # Errors
    /// Returns an error if the persisted record could not be removed.
    pub fn logout(&self) -> Result<(), StorageError> {
        let mut state = self.state();
        self.inner.storage.remove(&self.inner.key)?;
        if state.session.take().is_some() {
            state.generation += 1;
        }
        Ok(())
    }

    /// Clear the session only if it is still the one current at `generation`.
    ///
    /// Returns whether the session was torn down. A later login, or a logout
    /// that already happened, leaves the store untouched.
    ///
    /// # Errors
    /// Returns an error if the persisted record could not be removed.
    pub fn logout_if_current(&self, generation: u64) -> Result<bool, StorageError> {
        let mut state = self.state();
        if state.generation != generation || state.session.is_none() {
            return Ok(false);
        }
        self.inner.storage.remove(&self.inner.key)?;
        state.session = None;
        state.generation += 1;
        Ok(true)
    }

    /// Merge `patch` into the current user record, keeping the token.
    ///
    /// Returns `false` without touching storage when nobody is signed in.
    ///
    /// # Errors
    /// Returns an error if the updated session could not be persisted.
    pub fn set_user(&self, patch: UserRecord) -> Result<bool, StorageError> {
        let mut state = self.state();
        let Some(current) = state.session.as_ref() else {
            return Ok(false);
        };

        let mut updated = current.clone();
        updated.user.merge(patch);
        let encoded = serde_json::to_string(&updated)?;
        self.inner.storage.write(&self.inner.key, &encoded)?;
        state.session = Some(updated);
        Ok(true)
    }

    /// Snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.state().session.clone()
    }

    /// Current bearer token, if a session exists.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    /// Current user record, if a session exists.
    #[must_use]
    pub fn user(&self) -> Option<UserRecord> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.user.clone())
    }

    /// Role of the signed-in user; `None` when logged out.
    #[must_use]
    pub fn role(&self) -> Option<String> {
        self.state()
            .session
            .as_ref()
            .map(|session| session.role().to_string())
    }

    /// Whether a usable token is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state()
            .session
            .as_ref()
            .is_some_and(Session::has_usable_token)
    }

    /// Counter bumped whenever a session is installed or torn down.
    ///
    /// Capture it before awaiting a request and compare afterwards to drop
    /// results that arrive after the user changed.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state().generation
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("SessionStore")
            .field("key", &self.inner.key)
            .field("logged_in", &state.session.is_some())
            .field("generation", &state.generation)
            .finish_non_exhaustive()
    }
}
