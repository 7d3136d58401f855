//! Client-side core of the Content Explorer: the persisted session, the API
//! gateway that every front end talks through, and history export.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod error;
pub mod export;
pub mod session;
pub mod signal;
pub mod storage;


pub use api::ApiGateway;
pub use error::ApiError;
pub use session::SessionStore;
pub use signal::AuthSignal;
pub use storage::{MemoryStorage, SessionStorage, StorageError};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
