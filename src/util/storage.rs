//! Persistent key-value storage for the session credential.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only the credential survives a reload. In the browser this is
//! `localStorage`; elsewhere an in-memory map stands in.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.set(key, value);
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Log a failed storage mutation; the credential in memory and the one in
/// storage have diverged when this returns `false`.
#[cfg_attr(not(feature = "csr"), allow(dead_code))]
pub(crate) fn checked_write<E: std::fmt::Debug>(action: &str, key: &str, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::warn!("storage {action} of {key} failed: {err:?}");
            false
        }
    }
}

/// `window.localStorage`. Operations are no-ops when storage is unavailable
/// (private mode, sandboxed iframe); failed writes are logged.
#[cfg(feature = "csr")]
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStore;

#[cfg(feature = "csr")]
impl LocalStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

#[cfg(feature = "csr")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        let Some(storage) = Self::storage() else {
            return;
        };
        checked_write("write", key, storage.set_item(key, value));
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            checked_write("removal", key, storage.remove_item(key));
        }
    }
}
