//! # cricketchat-api
//!
//! HTTP access to the cricket question-answering service.
//!
//! - [`ApiClient`] wraps every outbound call and attaches the stored bearer
//!   token when one exists. It never retries and hands errors back unmodified.
//! - [`ChatBackend`] is the seam the conversation manager talks to; tests
//!   substitute a scripted implementation.
//! - [`AuthService`] runs the login, signup and logout flows and keeps the
//!   auth session in the local store.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cricketchat_api::ApiClient;
//! use cricketchat_store::{AuthStore, MemoryStore};
//! use cricketchat_types::SessionIdentity;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cricketchat_api::ApiError> {
//!     let auth = AuthStore::new(Arc::new(MemoryStore::new()));
//!     let client = ApiClient::new("http://localhost:3001", auth);
//!     let answer = client
//!         .ask(&SessionIdentity::new("anon-1"), "Who has the most runs in Test cricket?")
//!         .await?;
//!     println!("{:?}", answer.data);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use cricketchat_types::{AskResponse, HistoryEntry, SessionIdentity};

pub mod auth;
pub mod client;
pub mod error;

pub use auth::AuthService;
pub use client::ApiClient;
pub use error::ApiError;

/// Operations the conversation manager needs from the backend
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Ask a question. `Ok` carries application-level failures (`success: false`);
    /// `Err` means no usable response arrived.
    async fn ask(&self, identity: &SessionIdentity, question: &str) -> Result<AskResponse, ApiError>;

    /// Most recent persisted question/answer pairs, newest last as the server orders them
    async fn history(&self, identity: &SessionIdentity, limit: usize) -> Result<Vec<HistoryEntry>, ApiError>;

    /// Drop the server-side conversation memory for `identity`
    async fn clear_memory(&self, identity: &SessionIdentity) -> Result<(), ApiError>;
}
