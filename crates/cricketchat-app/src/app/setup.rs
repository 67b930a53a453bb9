use anyhow::{bail, Context, Result};
use std::sync::Arc;

use cricketchat_api::{ApiClient, AuthService};
use cricketchat_chat::{IdentityResolver, ResolvedIdentity, SessionManager};
use cricketchat_logging::TranscriptLogger;
use cricketchat_store::{AuthStore, FileStore, KeyValueStore, MemoryStore, MessageStore};

use crate::cli::Cli;
use crate::config::ClientConfig;

/// Shown when a command needs a session but nobody is logged in
pub const LOGIN_REQUIRED: &str =
    "You are not logged in. Run `cricketchat login` (or `cricketchat signup`), or pass --anonymous.";

/// Everything a command needs, wired from one [`ClientConfig`]
pub struct AppContext {
    pub config: ClientConfig,
    pub store: Arc<dyn KeyValueStore>,
    /// Conversations of anonymous identities; never written to disk
    pub anonymous_store: Arc<dyn KeyValueStore>,
    pub client: ApiClient,
    pub auth: AuthService,
    pub resolver: IdentityResolver,
}

/// Set up application context from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppContext> {
    let config = ClientConfig::from_cli(cli)?;
    setup_from_config(config)
}

pub fn setup_from_config(config: ClientConfig) -> Result<AppContext> {
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.store_dir()));
    let auth_store = AuthStore::new(store.clone());
    let client = ApiClient::with_timeout(&config.api_url, auth_store.clone(), config.timeout)
        .context("Failed to build HTTP client")?;

    log::debug!(
        "API {} with store at {}",
        config.api_url,
        config.store_dir().display()
    );

    Ok(AppContext {
        auth: AuthService::new(client.clone()),
        resolver: IdentityResolver::new(auth_store),
        client,
        store,
        anonymous_store: Arc::new(MemoryStore::new()),
        config,
    })
}

impl AppContext {
    /// Refuse to continue without a stored session unless anonymous use was asked for
    pub fn require_login(&self) -> Result<()> {
        if !self.config.anonymous && !self.auth.is_authenticated() {
            bail!(LOGIN_REQUIRED);
        }
        Ok(())
    }

    /// Resolve the identity and open its session with the saved conversation restored
    pub fn open_session(&self) -> Result<(SessionManager, ResolvedIdentity)> {
        self.require_login()?;
        let resolved = self.resolver.resolve();
        // Anonymous history lives only as long as the process
        let backing = if resolved.is_anonymous() {
            self.anonymous_store.clone()
        } else {
            self.store.clone()
        };
        let session = SessionManager::with_history_limit(
            resolved.identity.clone(),
            Arc::new(self.client.clone()),
            MessageStore::new(backing),
            self.config.history_limit,
        );
        session.restore();
        Ok((session, resolved))
    }

    /// Transcript logger when `--transcript` is set. Failing to open it only
    /// disables transcripts.
    pub async fn open_transcript(&self) -> Option<TranscriptLogger> {
        if !self.config.transcript {
            return None;
        }
        match TranscriptLogger::new(&self.config.data_dir).await {
            Ok(logger) => {
                log::info!("Writing transcript to {}", logger.path().display());
                Some(logger)
            }
            Err(e) => {
                eprintln!("Transcript disabled: {}", e);
                None
            }
        }
    }
}
