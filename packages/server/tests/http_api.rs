//! HTTP API integration tests.
//!
//! Tests for REST API endpoints (health check, user table, live connections).

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_users_endpoint() {
    // テスト項目: /api/users エンドポイントが登録ユーザーを ID 順に返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/users", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        serde_json::json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"},
        ])
    );
}

#[tokio::test]
async fn test_connections_endpoint() {
    // テスト項目: /api/connections エンドポイントが接続中のクライアントを返す
    // given (前提条件):
    let server = TestServer::start().await;
    let _bob = server.connect(2).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/connections", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let connections = body.as_array().expect("Response should be an array");
    assert_eq!(connections.len(), 1);
    assert_eq!(connections[0]["user_id"], 2);
    assert!(connections[0]["connection_id"].is_string());
    assert!(connections[0]["connected_at"].is_string());
}
