//! # cricketchat-store
//!
//! Key-value persistence for the chat client. Two namespaces live in the
//! same store:
//!
//! - the auth session, under the fixed key [`AUTH_KEY`]
//! - the message history of each session identity, under [`message_key`]
//!
//! `get` never fails: a missing, unreadable or corrupt record is reported as
//! absent and logged. `set` replaces the whole value, `remove` is idempotent.

use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod file;
pub mod memory;
pub mod typed;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use typed::{AuthStore, MessageStore};

/// Key of the serialized auth session
pub const AUTH_KEY: &str = "cricket-auth";

/// Prefix of the per-identity message history keys
pub const MESSAGES_KEY_PREFIX: &str = "cricket-chat-messages:";

/// Key holding the message history of one session identity
pub fn message_key(identity: &cricketchat_types::SessionIdentity) -> String {
    format!("{}{}", MESSAGES_KEY_PREFIX, identity.as_str())
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable string-to-string storage, modelled on a browser's local storage
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` when missing or unreadable
    fn get(&self, key: &str) -> Option<String>;

    /// Replace the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`; deleting a missing key succeeds
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and decode a JSON record. Corrupt records are logged and treated as absent.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Ignoring malformed record under '{}': {}", key, e);
            None
        }
    }
}

/// Encode `value` as JSON and store it under `key`
pub fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricketchat_types::SessionIdentity;

    #[test]
    fn test_message_keys_are_scoped_by_identity() {
        let a = message_key(&SessionIdentity::new("user-1"));
        let b = message_key(&SessionIdentity::new("user-2"));
        assert_ne!(a, b);
        assert!(a.starts_with(MESSAGES_KEY_PREFIX));
        assert_ne!(a, AUTH_KEY);
    }

    #[test]
    fn test_read_json_treats_corruption_as_absent() {
        let store = MemoryStore::new();
        store.set("broken", "{not json").unwrap();
        let value: Option<Vec<String>> = read_json(&store, "broken");
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        write_json(&store, "list", &vec!["a", "b"]).unwrap();
        let value: Option<Vec<String>> = read_json(&store, "list");
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));
    }
}
