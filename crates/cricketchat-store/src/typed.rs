use std::sync::Arc;

use cricketchat_types::{AuthState, Message, SessionIdentity};

use crate::{message_key, read_json, write_json, KeyValueStore, StoreError, AUTH_KEY};

/// The auth session namespace: a single record under [`AUTH_KEY`]
#[derive(Clone)]
pub struct AuthStore {
    store: Arc<dyn KeyValueStore>,
}

impl AuthStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<AuthState> {
        read_json(self.store.as_ref(), AUTH_KEY)
    }

    pub fn set(&self, auth: &AuthState) -> Result<(), StoreError> {
        write_json(self.store.as_ref(), AUTH_KEY, auth)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(AUTH_KEY)
    }

    /// Current bearer token, read from storage on every call
    pub fn bearer_token(&self) -> Option<String> {
        self.get()
            .map(|auth| auth.access_token)
            .filter(|token| !token.is_empty())
    }
}

/// The per-identity message history namespace
#[derive(Clone)]
pub struct MessageStore {
    store: Arc<dyn KeyValueStore>,
}

impl MessageStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saved messages for `identity`, or `None` when absent or corrupt
    pub fn load(&self, identity: &SessionIdentity) -> Option<Vec<Message>> {
        read_json(self.store.as_ref(), &message_key(identity))
    }

    /// Persist the full list. An empty list is never written, so a previously
    /// saved history cannot be clobbered by a transient empty state.
    /// Returns whether anything was written.
    pub fn save(&self, identity: &SessionIdentity, messages: &[Message]) -> Result<bool, StoreError> {
        if messages.is_empty() {
            return Ok(false);
        }
        write_json(self.store.as_ref(), &message_key(identity), messages)?;
        Ok(true)
    }

    pub fn remove(&self, identity: &SessionIdentity) -> Result<(), StoreError> {
        self.store.remove(&message_key(identity))
    }
}
