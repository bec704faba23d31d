//! Persistent key-value storage for credentials.
//!
//! Two entries survive reloads: the bearer token and the serialized session.
//! The browser backs this with `localStorage`, the CLI with a JSON file, and
//! tests with [`MemoryStore`].

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Key holding the bearer token string.
pub const TOKEN_KEY: &str = "jwtToken";

/// Key holding the JSON-serialized session.
pub const SESSION_KEY: &str = "currentUser";

/// String key-value store with best-effort writes.
///
/// Methods take `&self`; implementations share the underlying storage the
/// way `localStorage` is shared by every handle in a page.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
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

/// Persisted bearer token, ignoring blank values.
pub fn load_token<S: KeyValueStore + ?Sized>(store: &S) -> Option<String> {
    store.get(TOKEN_KEY).filter(|token| !token.trim().is_empty())
}

/// Remove both credential entries.
pub fn clear_credentials<S: KeyValueStore + ?Sized>(store: &S) {
    store.remove(TOKEN_KEY);
    store.remove(SESSION_KEY);
}
