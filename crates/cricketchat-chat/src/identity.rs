use std::sync::OnceLock;

use chrono::Utc;
use uuid::Uuid;

use cricketchat_store::AuthStore;
use cricketchat_types::SessionIdentity;

/// Where a session identity came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The signed-in user's id; stable across restarts
    Authenticated,
    /// Generated for this process only; history is not recoverable later
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub identity: SessionIdentity,
    pub source: IdentitySource,
}

impl ResolvedIdentity {
    pub fn is_anonymous(&self) -> bool {
        self.source == IdentitySource::Anonymous
    }
}

/// Resolves the identity a session runs under. A stored auth session wins;
/// otherwise one anonymous id is generated and reused for the lifetime of
/// this resolver. The anonymous id is never persisted.
pub struct IdentityResolver {
    auth: AuthStore,
    anonymous: OnceLock<SessionIdentity>,
}

impl IdentityResolver {
    pub fn new(auth: AuthStore) -> Self {
        Self {
            auth,
            anonymous: OnceLock::new(),
        }
    }

    pub fn resolve(&self) -> ResolvedIdentity {
        if let Some(auth) = self.auth.get() {
            if !auth.user.id.is_empty() {
                return ResolvedIdentity {
                    identity: SessionIdentity::new(auth.user.id),
                    source: IdentitySource::Authenticated,
                };
            }
            log::warn!("Stored auth session has no user id, continuing anonymously");
        }

        let identity = self.anonymous.get_or_init(anonymous_identity).clone();
        ResolvedIdentity {
            identity,
            source: IdentitySource::Anonymous,
        }
    }
}

/// Fresh anonymous identity: `anon-<millis>-<random>`. The random part keeps
/// sessions opened in the same millisecond apart.
pub fn anonymous_identity() -> SessionIdentity {
    let random = Uuid::new_v4().simple().to_string();
    SessionIdentity::new(format!(
        "anon-{}-{}",
        Utc::now().timestamp_millis(),
        &random[..12]
    ))
}
