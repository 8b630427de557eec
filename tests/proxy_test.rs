//! Tests for the reverse-proxied users-service endpoints.

use std::time::Duration;

use reqwest::StatusCode;

mod common;

use common::{client, closed_port, sign_token, spawn_gateway, start_upstream, test_config, StubBackend};

#[tokio::test]
async fn test_register_is_forwarded_verbatim() {
    let (upstream, captured) = start_upstream(201, r#"{"status":"registered"}"#).await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let res = client()
        .post(gw.url("/register?source=web"))
        .json(&serde_json::json!({"login": "alice", "password": "pw", "email": "a@example.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.text().await.unwrap(), r#"{"status":"registered"}"#);

    let seen = captured.lock().unwrap().clone();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].head.starts_with("post /register?source=web http/1.1"), "{}", seen[0].head);
    assert!(seen[0].head.contains(&format!("host: {upstream}")), "{}", seen[0].head);
    assert!(seen[0].body.contains("\"login\":\"alice\""));
    assert_eq!(stub.call_count(), 0);
}

#[tokio::test]
async fn test_client_identity_headers_are_not_trusted() {
    let (upstream, captured) = start_upstream(200, r#""ok""#).await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let res = client()
        .post(gw.url("/login"))
        .header("Login", "admin")
        .header("UserID", "1")
        .json(&serde_json::json!({"login": "alice", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let seen = captured.lock().unwrap().clone();
    assert!(!seen[0].head.contains("login: admin"), "{}", seen[0].head);
    assert!(!seen[0].head.contains("userid:"), "{}", seen[0].head);
}

#[tokio::test]
async fn test_user_info_forwards_caller_identity() {
    let (upstream, captured) = start_upstream(200, r#"{"login":"alice"}"#).await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let res = client()
        .get(gw.url("/get_user_info"))
        .header("Authorization", sign_token("alice", "s3cret", 42))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"login":"alice"}"#);

    let seen = captured.lock().unwrap().clone();
    let head = &seen[0].head;
    assert!(head.contains("login: alice"), "{head}");
    assert!(head.contains("password: s3cret"), "{head}");
    assert!(head.contains("userid: 42"), "{head}");
}

#[tokio::test]
async fn test_user_info_requires_token() {
    let (upstream, captured) = start_upstream(200, r#""ok""#).await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let res = client()
        .put(gw.url("/update_user_info"))
        .header("Authorization", "Bearer garbage")
        .json(&serde_json::json!({"email": "new@example.com"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<String>().await.unwrap(), "token is invalid");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_down_is_502() {
    let upstream = closed_port().await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let res = client()
        .post(gw.url("/login"))
        .json(&serde_json::json!({"login": "alice", "password": "pw"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_proxied_wrong_method_is_405() {
    let (upstream, captured) = start_upstream(200, r#""ok""#).await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let res = client().get(gw.url("/register")).send().await.unwrap();

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(captured.lock().unwrap().is_empty());
}
