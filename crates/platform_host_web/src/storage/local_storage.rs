//! `localStorage`-backed persistent store implementation.
//!
//! The browser API is synchronous, so this adapter maps one-to-one onto
//! [`platform_host::PersistentStore`] without any futures in between.

use leptos::logging;
use platform_host::{NotFound, PersistentStore};

#[derive(Debug, Clone, Copy, Default)]
/// Persistent store backed by `window.localStorage`.
pub struct WebPersistentStore;

impl WebPersistentStore {
    /// Loads the raw string stored under `key`.
    ///
    /// Returns `None` when the key is absent or localStorage is unavailable.
    pub fn load_raw(self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    /// Saves a raw string under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the write fails (for example when the
    /// quota is exceeded).
    pub fn save_raw(self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()
                .ok_or_else(|| "localStorage unavailable".to_string())?
                .set_item(key, value)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    /// Deletes `key` from localStorage.
    ///
    /// # Errors
    ///
    /// Returns an error when localStorage is unavailable or the delete fails.
    pub fn delete_raw(self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()
                .ok_or_else(|| "localStorage unavailable".to_string())?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

impl PersistentStore for WebPersistentStore {
    fn read_persistent(&self, key: &str) -> Result<String, NotFound> {
        self.load_raw(key).ok_or(NotFound)
    }

    fn write_persistent(&self, key: &str, value: &str) {
        if let Err(err) = self.save_raw(key, value) {
            logging::warn!("persistent write for `{key}` dropped: {err}");
        }
    }

    fn remove_persistent(&self, key: &str) {
        if let Err(err) = self.delete_raw(key) {
            logging::warn!("persistent remove for `{key}` dropped: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
