//! Durable persistence for the session's token pair and user snapshot

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::auth::User;
use crate::token::TokenPair;

const TOKENS_KEY: &str = "tokens";
const USER_KEY: &str = "user";

/// String key-value storage, the shape of browser cookie storage
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-process storage; the default backend and the one used in tests
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}

/// Storage backed by a single JSON file, for native embedders that want the
/// session to survive restarts.
///
/// A file that is missing or fails to parse starts the store empty; storage
/// problems never surface to the session layer.
pub struct FileStorage {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) {
        match serde_json::to_string(entries) {
            Ok(raw) => {
                if let Err(err) = fs::write(&self.path, raw) {
                    tracing::warn!(path = %self.path.display(), %err, "failed to persist session storage");
                }
            }
            Err(err) => tracing::warn!(%err, "failed to serialize session storage"),
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.flush(&entries);
    }
}

/// Persists the serialized user and token pair under two keys that share one
/// logical lifetime: they are always written together and cleared together.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
    prefix: String,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>, prefix: &str) -> Self {
        Self {
            storage,
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}.{}", self.prefix, suffix)
    }

    /// Serialize and write both records. Serialization happens before either
    /// write so callers never observe one key without the other.
    pub fn save(&self, tokens: &TokenPair, user: &User) {
        let (Ok(tokens_json), Ok(user_json)) =
            (serde_json::to_string(tokens), serde_json::to_string(user))
        else {
            return;
        };

        self.storage.set(&self.key(TOKENS_KEY), &tokens_json);
        self.storage.set(&self.key(USER_KEY), &user_json);
    }

    /// Load both records if present and parseable. Malformed or partial data
    /// is treated as an absent session, never as an error.
    pub fn load(&self) -> Option<(TokenPair, User)> {
        let tokens = self.storage.get(&self.key(TOKENS_KEY))?;
        let user = self.storage.get(&self.key(USER_KEY))?;

        let tokens = serde_json::from_str(&tokens).ok()?;
        let user = serde_json::from_str(&user).ok()?;
        Some((tokens, user))
    }

    /// Remove both records. Clearing an already-empty store is a no-op.
    pub fn clear(&self) {
        self.storage.remove(&self.key(TOKENS_KEY));
        self.storage.remove(&self.key(USER_KEY));
    }
}
