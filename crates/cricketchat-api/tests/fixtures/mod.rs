use std::sync::Arc;

use cricketchat_api::ApiClient;
use cricketchat_store::{AuthStore, MemoryStore};
use cricketchat_types::{AuthState, AuthUser};
use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock cricket API server for client contract tests
pub struct CricketMockServer {
    server: MockServer,
}

#[allow(dead_code)]
impl CricketMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Mock the ask endpoint with an arbitrary JSON body
    pub async fn mock_ask(&self, user_id: &str, question: &str, body: Value) {
        Mock::given(method("POST"))
            .and(path("/cricket/ask"))
            .and(query_param("userId", user_id))
            .and(body_json(json!({ "question": question })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_history(&self, user_id: &str, limit: usize, entries: Value) {
        Mock::given(method("GET"))
            .and(path("/cricket/history"))
            .and(query_param("userId", user_id))
            .and(query_param("limit", limit.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "success": true, "data": entries })),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn mock_clear_memory(&self, user_id: &str, status: u16) {
        Mock::given(method("DELETE"))
            .and(path("/cricket/memory"))
            .and(query_param("userId", user_id))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "success": status < 400 })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_auth_success(&self, route: &str, auth: &AuthState) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(201).set_body_json(auth))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_auth_failure(&self, route: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Authorization headers of every request received so far
    pub async fn authorization_headers(&self) -> Vec<Option<String>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|req| {
                req.headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

pub fn sample_auth(token: &str) -> AuthState {
    AuthState {
        access_token: token.to_string(),
        user: AuthUser {
            id: "user-7".to_string(),
            email: "fan@example.com".to_string(),
            name: Some("Cricket Fan".to_string()),
        },
    }
}

pub fn client_for(uri: &str) -> (ApiClient, Arc<MemoryStore>) {
    let backing = Arc::new(MemoryStore::new());
    let client = ApiClient::new(uri, AuthStore::new(backing.clone()));
    (client, backing)
}
