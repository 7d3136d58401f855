//! Command implementations for the Content Explorer CLI.

pub mod completion;
pub mod history;
pub mod search;
pub mod session;

use anyhow::{Result, bail};
use client::{ApiGateway, AuthSignal, FileStorage, SessionStore};
use futures::channel::mpsc::UnboundedReceiver;
use shared::config::ClientConfig;
use std::path::PathBuf;
use std::sync::Arc;

/// Overrides the directory the session record is kept in.
pub const SESSION_DIR_ENV: &str = "EXPLORER_SESSION_DIR";

/// Everything a command needs: the gateway and where the session lives.
pub struct AppContext {
    pub gateway: ApiGateway,
    pub storage: FileStorage,
}

impl AppContext {
    /// Open the persisted session and build a gateway around it.
    pub fn open(config: &ClientConfig) -> Self {
        let storage = FileStorage::new(session_dir());
        let session = SessionStore::open(Arc::new(storage.clone()), config.storage_key.clone());
        Self {
            gateway: ApiGateway::new(config, session),
            storage,
        }
    }

    pub fn session(&self) -> &SessionStore {
        self.gateway.session()
    }

    /// File holding the session record.
    pub fn session_path(&self) -> PathBuf {
        self.storage.path_for(self.session().key())
    }

    /// Fail unless a usable session is stored.
    pub fn require_session(&self) -> Result<()> {
        if !self.session().is_logged_in() {
            bail!("no active session found; run `explorer login` first");
        }
        Ok(())
    }
}

pub fn session_dir() -> PathBuf {
    std::env::var_os(SESSION_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map_or_else(FileStorage::default_dir, PathBuf::from)
}

/// Print every auth signal raised while the command ran.
pub fn report_signals(signals: &mut UnboundedReceiver<AuthSignal>) {
    while let Ok(Some(signal)) = signals.try_next() {
        tracing::debug!(redirect_to = signal.redirect_to(), "forced logout");
        eprintln!("session expired; run `explorer login` ({})", signal.message());
    }
}
