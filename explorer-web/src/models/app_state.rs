use client::SessionStore;
use shared::models::UserRecord;
use yewdux::{Context, Store};

/// View of the session the components render from.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppState {
    pub logged_in: bool,
    pub user: Option<UserRecord>,
    pub role: Option<String>,
}

impl AppState {
    /// Snapshot `session` for rendering.
    pub fn from_store(session: &SessionStore) -> Self {
        Self {
            logged_in: session.is_logged_in(),
            user: session.user(),
            role: session.role(),
        }
    }
}

impl Store for AppState {
    fn new(_cx: &Context) -> Self {
        Self::from_store(crate::api::gateway().session())
    }

    fn should_notify(&self, old: &Self) -> bool {
        self != old
    }
}
