use anyhow::{anyhow, bail, Result};

use cricketchat_api::auth::{LOGIN_FAILED, SIGNUP_FAILED};
use cricketchat_chat::SubmitOutcome;
use cricketchat_types::{AuthState, HistoryEntry, Message, SessionIdentity};

use super::setup::AppContext;

/// Ask one question through the persisted session and return the reply
pub async fn ask(ctx: &AppContext, question: &str) -> Result<Message> {
    let (session, resolved) = ctx.open_session()?;
    let mut transcript = ctx.open_transcript().await;

    match session.submit(question).await {
        SubmitOutcome::Replied(reply) => {
            if let Some(logger) = transcript.as_mut() {
                for message in session.messages().iter().rev().take(2).rev() {
                    logger.log(resolved.identity.as_str(), message).await;
                }
            }
            Ok(reply)
        }
        SubmitOutcome::EmptyInput => bail!("Question is empty"),
        SubmitOutcome::Busy => bail!("Another question is still being answered"),
        SubmitOutcome::Discarded => bail!("The conversation was cleared before the answer arrived"),
    }
}

/// Fetch recent server-side history; `limit` defaults to the configured one
pub async fn history(ctx: &AppContext, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
    ctx.require_login()?;
    let identity = ctx.resolver.resolve().identity;
    let limit = limit.unwrap_or(ctx.config.history_limit).max(1);
    Ok(ctx.client.history(&identity, limit).await?)
}

/// Erase server memory and the locally saved conversation
pub async fn clear_memory(ctx: &AppContext) -> Result<SessionIdentity> {
    let (session, resolved) = ctx.open_session()?;
    session.clear_memory().await;
    Ok(resolved.identity)
}

pub async fn login(ctx: &AppContext, email: &str, password: &str) -> Result<AuthState> {
    ctx.auth
        .login(email, password)
        .await
        .map_err(|e| {
            log::debug!("Login failed: {}", e);
            anyhow!(e.user_message(LOGIN_FAILED))
        })
}

pub async fn signup(
    ctx: &AppContext,
    email: &str,
    password: &str,
    name: Option<String>,
) -> Result<AuthState> {
    ctx.auth
        .signup(email, password, name)
        .await
        .map_err(|e| {
            log::debug!("Signup failed: {}", e);
            anyhow!(e.user_message(SIGNUP_FAILED))
        })
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.auth.logout()?;
    Ok(())
}

/// One-line description of who commands run as
pub fn whoami(ctx: &AppContext) -> String {
    match ctx.auth.current() {
        Some(auth) => format!(
            "Logged in as {} <{}> (id {})",
            auth.display_name(),
            auth.user.email,
            auth.user.id
        ),
        None => "Not logged in".to_string(),
    }
}

/// Use `value` when given, otherwise ask for it on the terminal
pub fn prompt_if_missing(value: Option<String>, label: &str) -> Result<String> {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        return Ok(value);
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let answer = rl.readline(&format!("{}: ", label))?;
    let answer = answer.trim().to_string();
    if answer.is_empty() {
        bail!("{} is required", label);
    }
    Ok(answer)
}
