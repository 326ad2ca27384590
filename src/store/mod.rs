//! Durable key-value persistence.
//!
//! The resolver and watchlist persist through the [`KeyValueStore`] trait,
//! the crate's stand-in for the dashboard's browser-local storage. Two keys
//! are used: [`CURRENT_STOCK_KEY`] holds the single last-resolved quote and
//! [`WATCHLIST_KEY`] holds the full watchlist as a JSON array. There is no
//! schema versioning; unreadable data degrades to absence.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use log::warn;

use crate::errors::QuoteError;

/// Store key for the last-resolved quote (JSON-serialized `Quote`).
pub const CURRENT_STOCK_KEY: &str = "currentStock";

/// Store key for the watchlist (JSON array of `WatchlistEntry`).
pub const WATCHLIST_KEY: &str = "stockWatchlist";

/// String key-value persistence sink.
///
/// `get` returns `None` for missing keys; corrupt values are a caller
/// concern (callers parse, log, and degrade to absence). `set` may fail on
/// durable backends, but callers treat that as a logged warning, never a
/// fatal fault.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError>;
    fn remove(&self, key: &str);
}

/// Volatile in-memory store. Used in tests and by embedders that handle
/// durability themselves.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| {
            warn!("Memory store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock_values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError> {
        self.lock_values()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.lock_values().remove(key);
    }
}

/// File-backed store: one JSON object mapping keys to string values,
/// rewritten whole on every mutation.
///
/// An unreadable or unparseable backing file is logged and treated as empty;
/// the next successful `set` overwrites it.
pub struct FileStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading any existing contents.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<HashMap<String, String>>(&text) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "Store file {} is corrupt ({}), starting empty",
                        path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn lock_values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| {
            warn!("File store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn flush(&self, values: &HashMap<String, String>) -> Result<(), QuoteError> {
        let text = serde_json::to_string_pretty(values).map_err(|e| QuoteError::Store {
            message: format!("serialize store: {}", e),
        })?;
        fs::write(&self.path, text).map_err(|e| QuoteError::Store {
            message: format!("write {}: {}", self.path.display(), e),
        })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock_values().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), QuoteError> {
        let mut values = self.lock_values();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) {
        let mut values = self.lock_values();
        if values.remove(key).is_some() {
            if let Err(e) = self.flush(&values) {
                warn!("Failed to persist removal of '{}': {}", key, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_store_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!(
            "brightflow-store-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryStore::new();
        assert!(store.get("currentStock").is_none());

        store.set("currentStock", "{\"symbol\":\"AAPL\"}").unwrap();
        assert_eq!(
            store.get("currentStock").as_deref(),
            Some("{\"symbol\":\"AAPL\"}")
        );

        store.remove("currentStock");
        assert!(store.get("currentStock").is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_store_path("roundtrip");
        let _ = fs::remove_file(&path);

        {
            let store = FileStore::open(&path);
            store.set("stockWatchlist", "[]").unwrap();
            store.set("currentStock", "{}").unwrap();
        }

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("stockWatchlist").as_deref(), Some("[]"));
        assert_eq!(reopened.get("currentStock").as_deref(), Some("{}"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let path = temp_store_path("corrupt");
        fs::write(&path, "not json at all {{{").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get("currentStock").is_none());

        // A set after corruption overwrites the bad file
        store.set("currentStock", "{}").unwrap();
        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("currentStock").as_deref(), Some("{}"));

        let _ = fs::remove_file(&path);
    }
}
