//! Shutdown behaviour of a running gateway.

use std::time::Duration;

use reqwest::StatusCode;

mod common;

use common::{client, spawn_gateway, start_delayed_upstream, test_config, StubBackend};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_shutdown_drains_in_flight_request_then_refuses_new_ones() {
    let (upstream, captured) = start_delayed_upstream(200, r#""ok""#, Duration::from_millis(300)).await;
    let stub = StubBackend::new();
    let gw = spawn_gateway(test_config(&upstream.to_string()), stub.backends()).await;

    let login = gw.url("/login");
    let in_flight = tokio::spawn(async move {
        client()
            .post(login)
            .json(&serde_json::json!({"login": "alice", "password": "pw"}))
            .send()
            .await
    });

    // Wait until the upstream holds the request, then shut down.
    tokio::time::timeout(Duration::from_secs(2), async {
        while captured.lock().unwrap().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    gw.shutdown();

    let res = in_flight.await.unwrap().unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#""ok""#);

    let refused = client().post(gw.url("/login")).send().await;
    assert!(refused.is_err(), "gateway still accepting after shutdown");
}
