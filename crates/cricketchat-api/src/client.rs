use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;

use cricketchat_store::AuthStore;
use cricketchat_types::{
    AskRequest, AskResponse, AuthState, ClearMemoryResponse, Credentials, HistoryEntry,
    HistoryResponse, SessionIdentity,
};

use crate::error::{extract_message, ApiError};
use crate::ChatBackend;

/// HTTP client for the question-answering API with bearer-token injection
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    auth: AuthStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, auth: AuthStore) -> Self {
        Self::with_http_client(base_url, auth, reqwest::Client::new())
    }

    /// Client whose requests give up after `timeout`; a timeout is a transport failure
    pub fn with_timeout(
        base_url: impl Into<String>,
        auth: AuthStore,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(base_url, auth, http))
    }

    pub fn with_http_client(base_url: impl Into<String>, auth: AuthStore, http: reqwest::Client) -> Self {
        // Ensure base_url doesn't end with a slash
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http,
            auth,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_store(&self) -> &AuthStore {
        &self.auth
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request. The token is read from storage now, never cached.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        log::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match self.auth.bearer_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::debug!("Request failed with {}: {}", status, body);
            return Err(ApiError::Status {
                status,
                message: extract_message(&body),
            });
        }

        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn ask(&self, identity: &SessionIdentity, question: &str) -> Result<AskResponse, ApiError> {
        let builder = self
            .request(Method::POST, "/cricket/ask")
            .query(&[("userId", identity.as_str())])
            .json(&AskRequest {
                question: question.to_string(),
            });
        self.send_json(builder).await
    }

    pub async fn history(&self, identity: &SessionIdentity, limit: usize) -> Result<Vec<HistoryEntry>, ApiError> {
        let limit = limit.to_string();
        let builder = self
            .request(Method::GET, "/cricket/history")
            .query(&[("userId", identity.as_str()), ("limit", limit.as_str())]);
        let response: HistoryResponse = self.send_json(builder).await?;
        if !response.success {
            return Err(ApiError::Rejected(response.message));
        }
        Ok(response.data)
    }

    pub async fn clear_memory(&self, identity: &SessionIdentity) -> Result<ClearMemoryResponse, ApiError> {
        let builder = self
            .request(Method::DELETE, "/cricket/memory")
            .query(&[("userId", identity.as_str())]);
        let response = self.send(builder).await?;
        // Acknowledgement bodies vary; an empty or non-JSON 2xx still counts
        Ok(serde_json::from_str(&response).unwrap_or_default())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthState, ApiError> {
        let builder = self.request(Method::POST, "/auth/login").json(credentials);
        self.send_json(builder).await
    }

    pub async fn signup(&self, credentials: &Credentials) -> Result<AuthState, ApiError> {
        let builder = self.request(Method::POST, "/auth/signup").json(credentials);
        self.send_json(builder).await
    }
}

#[async_trait]
impl ChatBackend for ApiClient {
    async fn ask(&self, identity: &SessionIdentity, question: &str) -> Result<AskResponse, ApiError> {
        ApiClient::ask(self, identity, question).await
    }

    async fn history(&self, identity: &SessionIdentity, limit: usize) -> Result<Vec<HistoryEntry>, ApiError> {
        ApiClient::history(self, identity, limit).await
    }

    async fn clear_memory(&self, identity: &SessionIdentity) -> Result<(), ApiError> {
        let ack = ApiClient::clear_memory(self, identity).await?;
        if ack.success == Some(false) {
            return Err(ApiError::Rejected(ack.message));
        }
        Ok(())
    }
}
