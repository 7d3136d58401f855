use crate::storage::BrowserStorage;
use client::{ApiGateway, SessionStore};
use shared::config::ClientConfig;
use std::cell::OnceCell;
use std::sync::Arc;

thread_local! {
    static SHARED_GATEWAY: OnceCell<ApiGateway> = const { OnceCell::new() };
}

fn build() -> ApiGateway {
    let config = ClientConfig::for_browser();
    let session = SessionStore::open(Arc::new(BrowserStorage), config.storage_key.clone());
    ApiGateway::new(&config, session)
}

/// The gateway shared by every component of the page.
pub fn gateway() -> ApiGateway {
    SHARED_GATEWAY.with(|cell| cell.get_or_init(build).clone())
}

/// Whether the session is still the one that was current at `generation`.
///
/// Results of requests started before a login or logout are dropped.
pub fn is_current(generation: u64) -> bool {
    gateway().session().generation() == generation
}
