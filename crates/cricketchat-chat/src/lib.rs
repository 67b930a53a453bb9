//! Conversation session management for the cricket statistics chat client.
//!
//! [`SessionManager`] owns the live message list for one session identity.
//! It appends the user's turn immediately, asks the backend, and appends the
//! classified reply (text, table, or a conversational error). Every change to
//! the list is mirrored to the local [`MessageStore`](cricketchat_store::MessageStore).
//!
//! [`IdentityResolver`] decides which identity the session runs under: the
//! signed-in user's id, or a generated anonymous id.

pub mod classify;
pub mod identity;
pub mod ids;
pub mod session;

pub use classify::{classify_response, table_from_records, SCALAR_COLUMN};
pub use identity::{anonymous_identity, IdentityResolver, IdentitySource, ResolvedIdentity};
pub use ids::MessageIdGenerator;
pub use session::{SessionManager, SessionSnapshot, SubmitOutcome};
