//! Storage port for player records.
//!
//! The engine only needs string reads and whole-value writes keyed by
//! player. [`MemoryStore`] backs tests and local play; a host can plug in
//! browser storage, a KV service or a database row by implementing
//! [`KeyValueStore`].

use std::collections::HashMap;

use lucky_types::PlayerId;

/// Namespace of the current record key.
pub const RECORD_NAMESPACE: &str = "lucky_agent_local_pack_economy_v1";

/// Namespace of the pre-pack record key, read once as a migration fallback.
pub const LEGACY_RECORD_NAMESPACE: &str = "lucky_agent_local_economy_v1";

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store refused the operation.
    #[error("store unavailable for {key}: {reason}")]
    Unavailable {
        /// Key being accessed.
        key: String,
        /// Backend message.
        reason: String,
    },
}

/// Minimal string store keyed by record key.
pub trait KeyValueStore {
    /// Read the value at `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value at `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Record key of `player`.
pub fn record_key(player: PlayerId) -> String {
    format!("{RECORD_NAMESPACE}:{player}")
}

/// Legacy record key of `player`.
pub fn legacy_record_key(player: PlayerId) -> String {
    format!("{LEGACY_RECORD_NAMESPACE}:{player}")
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw value at `key`, for inspection.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn keys_are_namespaced() {
        let player = PlayerId(Uuid::nil());
        assert_eq!(
            record_key(player),
            "lucky_agent_local_pack_economy_v1:00000000-0000-0000-0000-000000000000"
        );
        assert!(legacy_record_key(player).starts_with("lucky_agent_local_economy_v1:"));
    }

    #[test]
    fn memory_store_round_trip() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        assert!(matches!(store.read("a"), Ok(None)));
        assert!(store.write("a", "1".to_owned()).is_ok());
        assert!(store.write("a", "2".to_owned()).is_ok());
        assert_eq!(store.get("a"), Some("2"));
        assert_eq!(store.len(), 1);
    }
}
