//! Core types and structures for cricketchat
//!
//! This crate provides the conversation data model shared by every other
//! cricketchat crate: chat messages, server-side history entries and the
//! authenticated session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod wire;

pub use wire::{AskRequest, AskResponse, ClearMemoryResponse, Credentials, HistoryResponse};

// ============================================================================
// Constants
// ============================================================================

/// Default base URL of the question-answering API
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Number of history entries fetched when the history panel opens
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Content of an assistant message that carries a table
pub const TABLE_INTRO: &str = "Here are the results:";

/// Used when the server reports failure without a message
pub const APP_FAILURE_FALLBACK: &str = "Sorry, I could not process your question.";

/// Used when the request never produced a usable response
pub const TRANSPORT_FAILURE_MESSAGE: &str =
    "Sorry, there was an error processing your question. Please try again.";

/// Used when a successful answer is an empty result set
pub const EMPTY_RESULT_MESSAGE: &str = "No results found.";

// ============================================================================
// Message Types
// ============================================================================

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// How the content of a message should be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    #[default]
    Text,
    Table,
}

impl MessageFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageFormat::Text => "text",
            MessageFormat::Table => "table",
        }
    }
}

/// Tabular answer payload. Cells are JSON scalars and may be null.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl TableData {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    /// Every row has exactly one cell per column
    pub fn is_rectangular(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.columns.len())
    }
}

/// A single turn in the live conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    // Older records stored the role under `type`
    #[serde(alias = "type")]
    pub role: Role,
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub content: String,
    #[serde(default)]
    pub format: MessageFormat,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub table: Option<TableData>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
            format: MessageFormat::Text,
            table: None,
            timestamp: None,
        }
    }

    pub fn assistant_text(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: content.into(),
            format: MessageFormat::Text,
            table: None,
            timestamp: None,
        }
    }

    pub fn assistant_table(id: impl Into<String>, table: TableData) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: TABLE_INTRO.to_string(),
            format: MessageFormat::Table,
            table: Some(table),
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn is_table(&self) -> bool {
        self.format == MessageFormat::Table
    }

    /// A table message must carry a rectangular table; text messages always pass
    pub fn is_well_formed(&self) -> bool {
        match self.format {
            MessageFormat::Text => true,
            MessageFormat::Table => self
                .table
                .as_ref()
                .map(TableData::is_rectangular)
                .unwrap_or(false),
        }
    }
}

// ============================================================================
// Server History
// ============================================================================

/// A persisted question/answer pair returned by the history endpoint.
/// Read-only on the client and never mixed into the live message list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub format: MessageFormat,
    #[serde(deserialize_with = "deserialize_lenient_timestamp", default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    /// Answer as display text; structured answers are shown as compact JSON
    pub fn answer_text(&self) -> String {
        match &self.answer {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// Session Identity
// ============================================================================

/// Stable string scoping a user's local history key and server-side memory.
/// Either the authenticated user id or a generated anonymous id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionIdentity(String);

impl SessionIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Auth Session
// ============================================================================

/// The signed-in user as reported by the auth endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(deserialize_with = "deserialize_string_or_number")]
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

/// Bearer credential plus the user it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub access_token: String,
    pub user: AuthUser,
}

impl AuthState {
    pub fn display_name(&self) -> &str {
        self.user
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.user.email)
    }
}

// ============================================================================
// Serde Helpers
// ============================================================================

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// Identifiers arrive as strings from some backends and as integers from others
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number identifier, got {}",
            other
        ))),
    }
}

/// Display hints outside the known set are ignored rather than failing the whole reply
pub fn deserialize_lenient_format<'de, D>(deserializer: D) -> Result<Option<MessageFormat>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| serde_json::from_value(value).ok()))
}

/// Unparseable timestamps are dropped rather than failing the whole entry
pub fn deserialize_lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))),
        Value::Number(n) => Ok(n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis)),
        _ => Ok(None),
    }
}
