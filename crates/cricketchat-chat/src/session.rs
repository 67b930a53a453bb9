use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use cricketchat_api::ChatBackend;
use cricketchat_store::MessageStore;
use cricketchat_types::{
    HistoryEntry, Message, SessionIdentity, DEFAULT_HISTORY_LIMIT, TRANSPORT_FAILURE_MESSAGE,
};

use crate::classify::classify_response;
use crate::ids::MessageIdGenerator;

/// Result of [`SessionManager::submit`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The reply (answer, table, or conversational error) that was appended
    Replied(Message),
    /// Nothing left after trimming; nothing appended, no request made
    EmptyInput,
    /// A request is already outstanding; nothing appended, no request made
    Busy,
    /// The conversation was cleared while the request was in flight and
    /// the reply was dropped
    Discarded,
}

/// Point-in-time copy of the session state, for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub messages: Vec<Message>,
    pub is_loading: bool,
    pub show_history: bool,
    pub history: Vec<HistoryEntry>,
}

struct SessionState {
    messages: Vec<Message>,
    is_loading: bool,
    show_history: bool,
    history: Vec<HistoryEntry>,
    ids: MessageIdGenerator,
    // Bumped by clear_memory; replies started under an older epoch are dropped
    epoch: u64,
}

struct Inner {
    identity: SessionIdentity,
    backend: Arc<dyn ChatBackend>,
    store: MessageStore,
    history_limit: usize,
    state: Mutex<SessionState>,
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mirror the full list to storage. Empty lists are never written.
    fn persist(&self, messages: &[Message]) {
        if let Err(e) = self.store.save(&self.identity, messages) {
            log::error!("Failed to persist conversation for {}: {}", self.identity, e);
        }
    }
}

/// Clears `is_loading` if a submit unwinds or is dropped before it finishes
struct LoadingGuard<'a> {
    inner: &'a Inner,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(inner: &'a Inner) -> Self {
        Self { inner, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.state().is_loading = false;
        }
    }
}

/// Owns the live conversation of one session identity.
///
/// Cloning yields another handle to the same session. State is only locked
/// for short synchronous sections, never across a network call, so a second
/// `submit` issued while one is in flight sees `is_loading` and is rejected.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    pub fn new(identity: SessionIdentity, backend: Arc<dyn ChatBackend>, store: MessageStore) -> Self {
        Self::with_history_limit(identity, backend, store, DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(
        identity: SessionIdentity,
        backend: Arc<dyn ChatBackend>,
        store: MessageStore,
        history_limit: usize,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                identity,
                backend,
                store,
                history_limit,
                state: Mutex::new(SessionState {
                    messages: Vec::new(),
                    is_loading: false,
                    show_history: false,
                    history: Vec::new(),
                    ids: MessageIdGenerator::new(),
                    epoch: 0,
                }),
            }),
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.inner.identity
    }

    /// Load the saved conversation for this identity. Called once before any
    /// user interaction; a list that is already non-empty is left alone.
    /// A missing or corrupt record starts an empty conversation, and saved
    /// table messages whose table is missing or ragged are dropped.
    /// Returns the number of messages restored.
    pub fn restore(&self) -> usize {
        let mut state = self.inner.state();
        if !state.messages.is_empty() {
            log::debug!("Conversation already populated, skipping restore");
            return 0;
        }

        let Some(saved) = self.inner.store.load(&self.inner.identity) else {
            return 0;
        };

        let total = saved.len();
        let saved: Vec<Message> = saved
            .into_iter()
            .filter(|message| message.is_well_formed())
            .collect();
        if saved.len() < total {
            log::warn!(
                "Dropped {} saved table messages without a rectangular table for {}",
                total - saved.len(),
                self.inner.identity
            );
        }

        for message in &saved {
            state.ids.observe(&message.id);
        }
        let count = saved.len();
        state.messages = saved;
        log::info!("Restored {} messages for {}", count, self.inner.identity);
        count
    }

    /// Ask a question.
    ///
    /// The user's turn is appended before the request is sent. Whatever
    /// happens to the request, exactly one assistant turn follows it and
    /// `is_loading` is released; transport failures become a generic error
    /// turn instead of an `Err`.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let question = text.trim();
        if question.is_empty() {
            return SubmitOutcome::EmptyInput;
        }

        let inner = self.inner.as_ref();
        let epoch = {
            let mut state = inner.state();
            if state.is_loading {
                log::debug!("Ignoring submit while a question is outstanding");
                return SubmitOutcome::Busy;
            }
            let id = state.ids.next_id();
            state
                .messages
                .push(Message::user(id, question).with_timestamp(Utc::now()));
            inner.persist(&state.messages);
            state.is_loading = true;
            state.epoch
        };
        let mut guard = LoadingGuard::new(inner);

        let result = inner.backend.ask(&inner.identity, question).await;

        let mut state = inner.state();
        state.is_loading = false;
        guard.disarm();

        if state.epoch != epoch {
            log::info!("Conversation was cleared, dropping reply to '{}'", question);
            return SubmitOutcome::Discarded;
        }

        let id = state.ids.next_id();
        let reply = match result {
            Ok(response) => classify_response(id, response),
            Err(e) => {
                log::error!("Question failed for {}: {}", inner.identity, e);
                Message::assistant_text(id, TRANSPORT_FAILURE_MESSAGE)
            }
        }
        .with_timestamp(Utc::now());

        state.messages.push(reply.clone());
        inner.persist(&state.messages);
        SubmitOutcome::Replied(reply)
    }

    /// Show or hide the history panel. Opening it fetches the latest entries
    /// once; closing it keeps the cached entries and makes no request.
    /// A failed fetch is logged and leaves the cached entries in place.
    /// Returns whether the panel is now visible.
    pub async fn toggle_history(&self) -> bool {
        let inner = self.inner.as_ref();
        let epoch = {
            let mut state = inner.state();
            state.show_history = !state.show_history;
            if !state.show_history {
                return false;
            }
            state.epoch
        };

        match inner.backend.history(&inner.identity, inner.history_limit).await {
            Ok(entries) => {
                let mut state = inner.state();
                if state.epoch == epoch {
                    log::debug!("Loaded {} history entries", entries.len());
                    state.history = entries;
                } else {
                    log::info!("Conversation was cleared, dropping fetched history");
                }
            }
            Err(e) => log::error!("Failed to load history for {}: {}", inner.identity, e),
        }
        true
    }

    /// Erase the conversation on the server and locally. The local reset
    /// happens whether or not the server call succeeds.
    pub async fn clear_memory(&self) {
        let inner = self.inner.as_ref();
        if let Err(e) = inner.backend.clear_memory(&inner.identity).await {
            log::error!("Failed to clear server memory for {}: {}", inner.identity, e);
        }

        let mut state = inner.state();
        state.messages.clear();
        state.history.clear();
        state.epoch += 1;
        if let Err(e) = inner.store.remove(&inner.identity) {
            log::error!("Failed to remove saved conversation for {}: {}", inner.identity, e);
        }
        log::info!("Cleared conversation memory for {}", inner.identity);
    }

    pub fn messages(&self) -> Vec<Message> {
        self.inner.state().messages.clone()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.inner.state().history.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state().is_loading
    }

    pub fn show_history(&self) -> bool {
        self.inner.state().show_history
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.state();
        SessionSnapshot {
            messages: state.messages.clone(),
            is_loading: state.is_loading,
            show_history: state.show_history,
            history: state.history.clone(),
        }
    }
}
