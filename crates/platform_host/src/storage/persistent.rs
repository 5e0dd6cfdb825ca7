//! Persistent key/value storage contracts and in-memory adapters.
//!
//! Values are opaque strings stored per exact key. A missing key is reported through [`NotFound`],
//! which callers treat as an ordinary outcome rather than a fault.

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use serde::Serialize;

/// Marker returned when a key has no stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NotFound;

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key not found")
    }
}

impl std::error::Error for NotFound {}

/// Host service for string values persisted across process restarts.
pub trait PersistentStore {
    /// Reads the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] when no value is stored under `key`.
    fn read_persistent(&self, key: &str) -> Result<String, NotFound>;

    /// Overwrites the value stored under `key`.
    ///
    /// Backend failures are not reported to the caller.
    fn write_persistent(&self, key: &str, value: &str);

    /// Removes the value stored under `key`, if any.
    fn remove_persistent(&self, key: &str);
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets. Every read reports [`NotFound`].
pub struct NoopPersistentStore;

impl PersistentStore for NoopPersistentStore {
    fn read_persistent(&self, _key: &str) -> Result<String, NotFound> {
        Err(NotFound)
    }

    fn write_persistent(&self, _key: &str, _value: &str) {}

    fn remove_persistent(&self, _key: &str) {}
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same backing map.
pub struct MemoryPersistentStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryPersistentStore {
    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::default();
        {
            let mut inner = store.inner.borrow_mut();
            for (key, value) in entries {
                inner.insert(key.into(), value.into());
            }
        }
        store
    }

    /// Returns a sorted snapshot of every stored key.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }
}

impl PersistentStore for MemoryPersistentStore {
    fn read_persistent(&self, key: &str) -> Result<String, NotFound> {
        self.inner.borrow().get(key).cloned().ok_or(NotFound)
    }

    fn write_persistent(&self, key: &str, value: &str) {
        self.inner
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_persistent(&self, key: &str) {
        self.inner.borrow_mut().remove(key);
    }
}

/// Serializes `value` as compact JSON and writes it under `key`. Returns the number of bytes
/// written.
///
/// # Errors
///
/// Returns the serializer error when `value` cannot be encoded; nothing is written then.
pub fn write_persistent_json<S: PersistentStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<usize, serde_json::Error> {
    let raw = serde_json::to_string(value)?;
    store.write_persistent(key, &raw);
    Ok(raw.len())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Serialize)]
    struct Stored {
        done: bool,
    }

    #[test]
    fn memory_store_round_trip_overwrite_and_remove() {
        let store = MemoryPersistentStore::default();
        let store_obj: &dyn PersistentStore = &store;

        store_obj.write_persistent("data", "{\"k\":1}");
        assert_eq!(store_obj.read_persistent("data"), Ok("{\"k\":1}".to_string()));

        store_obj.write_persistent("data", "{\"k\":2}");
        assert_eq!(store_obj.read_persistent("data"), Ok("{\"k\":2}".to_string()));

        store_obj.remove_persistent("data");
        assert_eq!(store_obj.read_persistent("data"), Err(NotFound));
    }

    #[test]
    fn absent_key_is_not_found_not_empty_string() {
        let store = MemoryPersistentStore::with_entries([("other", "")]);
        assert_eq!(store.read_persistent("data"), Err(NotFound));
        assert_eq!(store.read_persistent("other"), Ok(String::new()));
    }

    #[test]
    fn clones_share_backing_map() {
        let store = MemoryPersistentStore::default();
        let clone = store.clone();
        clone.write_persistent("checklists", "[]");
        assert_eq!(store.keys(), vec!["checklists".to_string()]);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn json_writer_stores_compact_text_and_reports_length() {
        let store = MemoryPersistentStore::default();
        let bytes = write_persistent_json(&store, "flag", &Stored { done: true }).expect("write");
        assert_eq!(store.read_persistent("flag"), Ok("{\"done\":true}".to_string()));
        assert_eq!(bytes, 13);
    }

    #[test]
    fn json_writer_leaves_store_untouched_on_encode_failure() {
        let store = MemoryPersistentStore::with_entries([("flag", "old")]);
        let mut bad_keys = BTreeMap::new();
        bad_keys.insert((1, 2), true);

        assert!(write_persistent_json(&store, "flag", &bad_keys).is_err());
        assert_eq!(store.read_persistent("flag"), Ok("old".to_string()));
    }

    #[test]
    fn noop_store_never_finds_anything() {
        let store = NoopPersistentStore;
        store.write_persistent("data", "x");
        assert_eq!(store.read_persistent("data"), Err(NotFound));
        store.remove_persistent("data");
    }
}
