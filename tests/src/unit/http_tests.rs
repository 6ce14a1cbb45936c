use super::test_client;
use inkweave_core::projects::ProjectUpdate;
use inkweave_core::ApiError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn success_unwraps_the_response_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/projects")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!([
                {"id": "p1", "title": "Ashes of the North", "status": "writing"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let (client, notifier) = test_client(&server);
    let projects = client.projects().list().await.expect("projects");

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title, "Ashes of the North");
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn every_status_maps_to_its_canned_message() {
    let cases = [
        (400, "bad request"),
        (401, "unauthorized, please sign in"),
        (403, "you do not have permission to do that"),
        (404, "the requested resource does not exist"),
        (422, "request validation failed"),
        (500, "internal server error"),
        (503, "service temporarily unavailable, please retry later"),
    ];
    for (status, expected) in cases {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/projects")
            .with_status(status)
            .with_body("{}")
            .create_async()
            .await;

        let (client, notifier) = test_client(&server);
        let err = client.projects().list().await.unwrap_err();

        assert_eq!(err.status(), Some(status as u16), "status {status}");
        assert_eq!(err.user_message(), expected, "status {status}");
        // The transient notification fires exactly once per failure.
        assert_eq!(notifier.messages(), vec![expected.to_string()]);
    }
}

#[tokio::test]
async fn backend_detail_is_surfaced_when_present() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/projects/missing")
        .with_status(404)
        .with_body(serde_json::json!({"detail": "project does not exist"}).to_string())
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let err = client.projects().get("missing").await.unwrap_err();
    assert_eq!(err.user_message(), "project does not exist");
}

#[tokio::test]
async fn validation_failures_keep_the_field_errors() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("PUT", "/projects/p1")
        .with_status(422)
        .with_body(
            serde_json::json!({
                "detail": "validation failed",
                "errors": [{"loc": ["body", "title"], "msg": "field required"}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let err = client
        .projects()
        .update("p1", &ProjectUpdate::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, errors, .. } => {
            assert_eq!(status, 422);
            assert_eq!(errors.len(), 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unauthorized_fires_the_session_expiry_hook() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/auth/user")
        .with_status(401)
        .with_body("{}")
        .create_async()
        .await;

    let expired = Arc::new(AtomicUsize::new(0));
    let observed = expired.clone();
    let config = inkweave_core::ClientConfig::new(server.url()).expect("config");
    let client = inkweave_core::ApiClient::new(config)
        .expect("client")
        .on_session_expired(move || {
            observed.fetch_add(1, Ordering::SeqCst);
        });

    let err = client.auth().current_user().await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(expired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn other_failures_leave_the_session_hook_alone() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/auth/user")
        .with_status(500)
        .with_body("{}")
        .create_async()
        .await;

    let expired = Arc::new(AtomicUsize::new(0));
    let observed = expired.clone();
    let config = inkweave_core::ClientConfig::new(server.url()).expect("config");
    let client = inkweave_core::ApiClient::new(config)
        .expect("client")
        .on_session_expired(move || {
            observed.fetch_add(1, Ordering::SeqCst);
        });

    client.auth().current_user().await.unwrap_err();
    assert_eq!(expired.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // Nothing listens on this port.
    let config = inkweave_core::ClientConfig::new("http://127.0.0.1:9/api").expect("config");
    let client = inkweave_core::ApiClient::new(config).expect("client");
    let err = client.projects().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(
        err.user_message(),
        "network error, please check your connection"
    );
}

#[tokio::test]
async fn export_streams_bytes_to_disk() {
    let mut server = mockito::Server::new_async().await;
    let body = "Chapter One\n\nThe rain kept falling.";
    let _mock = server
        .mock("GET", "/projects/p1/export")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body(body)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("export.txt");
    let written = client.projects().export("p1", &out).await.expect("export");

    assert_eq!(written, body.len() as u64);
    assert_eq!(std::fs::read_to_string(&out).expect("read"), body);
}
