//! Request and response bodies of the question-answering API

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{HistoryEntry, MessageFormat};

/// Body of the ask endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Response of the ask endpoint.
///
/// `data` is either the literal answer text or an array of flat records
/// (one object per row). `success: false` is an expected conversational
/// outcome, not a transport error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(
        skip_serializing_if = "Option::is_none",
        default,
        deserialize_with = "crate::deserialize_lenient_format"
    )]
    pub format: Option<MessageFormat>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl AskResponse {
    pub fn text(answer: impl Into<String>) -> Self {
        Self {
            success: true,
            format: Some(MessageFormat::Text),
            data: Some(Value::String(answer.into())),
            message: None,
        }
    }

    pub fn table(records: Value) -> Self {
        Self {
            success: true,
            format: Some(MessageFormat::Table),
            data: Some(records),
            message: None,
        }
    }

    pub fn failure(message: Option<String>) -> Self {
        Self {
            success: false,
            format: None,
            data: None,
            message,
        }
    }
}

/// Response of the history endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

/// Acknowledgement of the clear-memory endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClearMemoryResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

/// Login and signup body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
}

impl Credentials {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
        }
    }

    pub fn signup(
        email: impl Into<String>,
        password: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }
}
