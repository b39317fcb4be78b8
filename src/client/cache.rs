use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    sync::RwLock,
};

use dashmap::DashMap;
use tracing::warn;

/// On-device key/value store backing the façade's fallback tier.
///
/// Implementations are injected into the façade rather than reached
/// through a global. Reads cannot fail: an absent key is `None`, and
/// implementations swallow their own I/O problems, so the façade's
/// fallback path never has a second failure mode.
pub trait CacheStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;
    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: String);
    /// Remove `key` and its value.
    fn remove(&self, key: &str);
}

/// Volatile [`CacheStore`] living for the process lifetime.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, String>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn put(&self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// [`CacheStore`] persisted as a single JSON object on disk, surviving
/// process restarts the way browser local storage does.
pub struct FileCacheStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileCacheStore {
    /// Open the store at `path`, loading whatever was persisted there. A
    /// missing file starts empty; an unreadable or unparsable file is
    /// logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<BTreeMap<String, String>>(&contents) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse cache file; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read cache file; starting empty"
                );
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn persist(&self, entries: &BTreeMap<String, String>) {
        match serde_json::to_string_pretty(entries) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    warn!(
                        path = %self.path.display(),
                        error = %err,
                        "failed to persist cache file"
                    );
                }
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to encode cache file");
            }
        }
    }
}

impl CacheStore for FileCacheStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(entries) => entries.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn put(&self, key: &str, value: String) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), value);
            self.persist(&entries);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            if entries.remove(key).is_some() {
                self.persist(&entries);
            }
        }
    }
}
