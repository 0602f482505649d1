use crate::errors::StoreResult;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

pub const FOLDERS_KEY: &str = "ocean_notes__folders";
pub const NOTES_KEY: &str = "ocean_notes__notes";
pub const SELECTED_FOLDER_KEY: &str = "ocean_notes__selectedFolder";
pub const SELECTED_NOTE_KEY: &str = "ocean_notes__selectedNote";

/// Synchronous string-keyed key-value medium the store persists through.
pub trait BackingStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// Ephemeral backing store; doubles as the test stand-in for the durable one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BackingStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Decodes a persisted collection payload. Missing or malformed JSON yields
/// an empty collection; the parse failure is swallowed on purpose so a
/// corrupt entry never blocks hydration.
pub(crate) fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Vec<T> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(error) => {
            tracing::warn!(key, error = %error, "discarding malformed persisted collection");
            Vec::new()
        }
    }
}
