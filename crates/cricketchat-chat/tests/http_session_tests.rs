use std::sync::Arc;

use cricketchat_api::ApiClient;
use cricketchat_chat::{IdentityResolver, IdentitySource, SessionManager, SubmitOutcome};
use cricketchat_store::{AuthStore, FileStore, KeyValueStore, MemoryStore, MessageStore};
use cricketchat_types::{
    AuthState, AuthUser, MessageFormat, SessionIdentity, TRANSPORT_FAILURE_MESSAGE,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_over(base_url: &str, backing: Arc<dyn KeyValueStore>) -> SessionManager {
    let auth = AuthStore::new(backing.clone());
    let identity = IdentityResolver::new(auth.clone()).resolve().identity;
    let client = ApiClient::new(base_url, auth);
    SessionManager::new(identity, Arc::new(client), MessageStore::new(backing))
}

#[tokio::test]
async fn test_authenticated_session_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cricket/ask"))
        .and(query_param("userId", "user-7"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "format": "table",
            "data": [
                {"player": "SR Tendulkar", "runs": 15921},
                {"player": "RT Ponting", "runs": 13378}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    AuthStore::new(backing.clone())
        .set(&AuthState {
            access_token: "tok".into(),
            user: AuthUser {
                id: "user-7".into(),
                email: "fan@example.com".into(),
                name: None,
            },
        })
        .unwrap();

    let resolved = IdentityResolver::new(AuthStore::new(backing.clone())).resolve();
    assert_eq!(resolved.source, IdentitySource::Authenticated);

    let manager = session_over(&server.uri(), backing);
    let SubmitOutcome::Replied(reply) = manager.submit("Who has the most Test runs?").await else {
        panic!("expected a reply");
    };

    assert_eq!(reply.format, MessageFormat::Table);
    let table = reply.table.unwrap();
    assert_eq!(table.columns, vec!["player", "runs"]);
    assert_eq!(table.rows[0], vec![json!("SR Tendulkar"), json!(15921)]);
}

#[tokio::test]
async fn test_connection_refused_becomes_error_turn() {
    let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let manager = session_over("http://127.0.0.1:1", backing);

    manager.submit("Anyone there?").await;

    let messages = manager.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, TRANSPORT_FAILURE_MESSAGE);
    assert!(!manager.is_loading());
}

#[tokio::test]
async fn test_server_error_status_becomes_error_turn() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cricket/ask"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"success": false, "message": "db down"})))
        .mount(&server)
        .await;

    let manager = session_over(&server.uri(), Arc::new(MemoryStore::new()));
    manager.submit("q").await;
    assert_eq!(manager.messages()[1].content, TRANSPORT_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_clear_memory_over_http_with_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cricket/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": "42 runs"})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/cricket/memory"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let backing: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(dir.path()));
    let manager = session_over(&server.uri(), backing.clone());

    manager.submit("How many?").await;
    assert_eq!(MessageStore::new(backing.clone()).load(manager.identity()).map(|m| m.len()), Some(2));

    manager.clear_memory().await;
    assert!(manager.messages().is_empty());
    assert!(MessageStore::new(backing).load(manager.identity()).is_none());
}

#[tokio::test]
async fn test_history_panel_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cricket/history"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1, "question": "Most sixes?", "answer": "Chris Gayle", "format": "text", "timestamp": "2024-06-01T12:00:00Z"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let backing: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let client = ApiClient::new(server.uri(), AuthStore::new(backing.clone()));
    let manager = SessionManager::with_history_limit(
        SessionIdentity::new("anon-1"),
        Arc::new(client),
        MessageStore::new(backing),
        5,
    );

    assert!(manager.toggle_history().await);
    assert!(!manager.toggle_history().await);
    assert!(manager.toggle_history().await);
    assert_eq!(manager.history()[0].answer_text(), "Chris Gayle");
}
