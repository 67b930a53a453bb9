use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cricketchat_api::{ApiError, ChatBackend};
use cricketchat_chat::SessionManager;
use cricketchat_store::{MemoryStore, MessageStore};
use cricketchat_types::{AskResponse, HistoryEntry, MessageFormat, SessionIdentity};
use serde_json::Value;
use tokio::sync::Notify;

/// Scripted backend: replays queued ask results and counts every call
#[derive(Default)]
pub struct FakeBackend {
    ask_replies: Mutex<VecDeque<Result<AskResponse, ApiError>>>,
    history_replies: Mutex<VecDeque<Result<Vec<HistoryEntry>, ApiError>>>,
    clear_fails: bool,
    panic_on_ask: bool,
    gate: Option<Arc<Notify>>,
    pub questions: Mutex<Vec<(String, String)>>,
    ask_calls: AtomicUsize,
    history_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every ask waits for one `notify_one` on `gate` before answering
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn failing_clear(mut self) -> Self {
        self.clear_fails = true;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panic_on_ask = true;
        self
    }

    pub fn reply(self, reply: Result<AskResponse, ApiError>) -> Self {
        self.ask_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn history_reply(self, reply: Result<Vec<HistoryEntry>, ApiError>) -> Self {
        self.history_replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn ask_calls(&self) -> usize {
        self.ask_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatBackend for FakeBackend {
    async fn ask(&self, identity: &SessionIdentity, question: &str) -> Result<AskResponse, ApiError> {
        self.ask_calls.fetch_add(1, Ordering::SeqCst);
        self.questions
            .lock()
            .unwrap()
            .push((identity.to_string(), question.to_string()));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.panic_on_ask {
            panic!("backend exploded");
        }
        self.ask_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(AskResponse::text("default answer")))
    }

    async fn history(&self, _identity: &SessionIdentity, _limit: usize) -> Result<Vec<HistoryEntry>, ApiError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.history_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn clear_memory(&self, _identity: &SessionIdentity) -> Result<(), ApiError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.clear_fails {
            Err(ApiError::Rejected(Some("memory service down".to_string())))
        } else {
            Ok(())
        }
    }
}

/// An error standing in for "no usable response arrived"
#[allow(dead_code)]
pub fn broken_response() -> ApiError {
    ApiError::Decode(serde_json::from_str::<Value>("<html>").unwrap_err())
}

#[allow(dead_code)]
pub fn entry(id: &str, question: &str, answer: &str) -> HistoryEntry {
    HistoryEntry {
        id: id.to_string(),
        question: question.to_string(),
        answer: Value::String(answer.to_string()),
        format: MessageFormat::Text,
        timestamp: None,
    }
}

#[allow(dead_code)]
pub fn manager_with(
    backend: Arc<FakeBackend>,
    backing: Arc<MemoryStore>,
    identity: &str,
) -> SessionManager {
    SessionManager::new(
        SessionIdentity::new(identity),
        backend,
        MessageStore::new(backing),
    )
}
