//! `localStorage` backend for the session record.

use client::{SessionStorage, StorageError};
use gloo_storage::{LocalStorage, Storage};

/// Session storage backed by the browser's `localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStorage;

fn unavailable(operation: &str, err: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("localStorage {operation} failed: {err:?}"))
}

impl SessionStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        LocalStorage::raw()
            .get_item(key)
            .map_err(|err| unavailable("read", &err))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| unavailable("write", &err))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        LocalStorage::raw()
            .remove_item(key)
            .map_err(|err| unavailable("remove", &err))
    }
}
