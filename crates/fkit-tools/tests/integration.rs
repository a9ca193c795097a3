//! Integration tests for the fkit HTTP servers and clients

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use fkit_tools::{
    client,
    cluster::ClusterClient,
    routes::{directory_router, echo_router, extension_router, webhook_router},
    server, ToolsConfig, ToolsError,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

const BODY_LIMIT: usize = 1024 * 1024;

/// Helper to get response body as bytes
async fn body_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, BODY_LIMIT).await.unwrap().to_vec()
}

/// Serve `app` on an ephemeral loopback port and return its base URL
async fn spawn_server(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve_listener(app, listener));
    format!("http://{}", addr)
}

mod extension {
    use super::*;

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("extension.crx"), b"Cr24\x03\x00\x00\x00").unwrap();
        std::fs::write(dir.path().join("updates.xml"), b"<gupdate/>").unwrap();
        dir
    }

    #[tokio::test]
    async fn crx_gets_extension_content_type() {
        let dir = fixture();
        let response = extension_router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/extension.crx")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/x-chrome-extension"
        );
        assert_eq!(body_bytes(response.into_body()).await, b"Cr24\x03\x00\x00\x00");
    }

    #[tokio::test]
    async fn other_files_keep_inferred_content_type() {
        let dir = fixture();
        let response = extension_router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/updates.xml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.contains("xml"), "got {}", content_type);
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let dir = fixture();
        let response = extension_router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/missing.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

mod directory {
    use super::*;

    #[tokio::test]
    async fn serves_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("pkgs")).unwrap();
        std::fs::write(dir.path().join("pkgs").join("orbit.txt"), b"orbit").unwrap();

        let response = directory_router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/pkgs/orbit.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response.into_body()).await, b"orbit");
    }

    #[tokio::test]
    async fn does_not_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let response = directory_router(dir.path())
            .oneshot(
                Request::builder()
                    .uri("/../etc/passwd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(response.status(), StatusCode::OK);
    }
}

mod echo {
    use super::*;

    #[tokio::test]
    async fn echoes_full_request() {
        let response = echo_router(BODY_LIMIT)
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/fleet/orbit/config?x=1")
                    .header(header::HOST, "localhost:4648")
                    .header("x-fleet-test", "yes")
                    .body(Body::from("hello"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = String::from_utf8(body_bytes(response.into_body()).await).unwrap();

        assert!(body.starts_with("PUT /api/v1/fleet/orbit/config?x=1 HTTP/1.1\r\n"));
        assert!(body.contains("Host: localhost:4648\r\n"));
        assert!(body.contains("x-fleet-test: yes\r\n"));
        assert!(body.ends_with("\r\n\r\nhello"));
    }

    #[tokio::test]
    async fn rejects_oversized_body() {
        let response = echo_router(4)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .body(Body::from("too large"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}

mod webhook {
    use super::*;

    #[tokio::test]
    async fn accepts_json() {
        let response = webhook_router(BODY_LIMIT)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"event":"host_enrolled","host_id":7}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_non_json_with_error_body() {
        let response = webhook_router(BODY_LIMIT)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .body(Body::from("event=host_enrolled"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&body_bytes(response.into_body()).await).unwrap();
        assert_eq!(body["type"], "general_bad_json");
        assert_eq!(body["code"], 400);
    }
}

mod api_client {
    use super::*;
    use axum::http::HeaderMap;

    async fn whoami(headers: HeaderMap) -> (StatusCode, String) {
        match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            Some("Bearer s3cret") => (StatusCode::OK, r#"{"user":"admin"}"#.to_string()),
            _ => (StatusCode::UNAUTHORIZED, "denied".to_string()),
        }
    }

    async fn base_url() -> String {
        spawn_server(Router::new().route("/api/v1/fleet/me", get(whoami))).await
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let base = base_url().await;
        let http = client::http_client(&ToolsConfig::default()).unwrap();

        let body = client::api_get(&http, &format!("{}/api/v1/fleet/me", base), "s3cret")
            .await
            .unwrap();

        assert_eq!(&body[..], br#"{"user":"admin"}"#);
    }

    #[tokio::test]
    async fn non_success_is_an_error() {
        let base = base_url().await;
        let http = client::http_client(&ToolsConfig::default()).unwrap();

        let err = client::api_get(&http, &format!("{}/api/v1/fleet/me", base), "wrong")
            .await
            .unwrap_err();

        match err {
            ToolsError::Upstream { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "denied");
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}

mod cluster {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, Json};
    use serde_json::json;

    async fn namespace(Path(name): Path<String>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
        if headers.get(header::AUTHORIZATION).map(|v| v.as_bytes()) != Some(&b"Bearer sa-token"[..]) {
            return (StatusCode::FORBIDDEN, Json(json!({"kind": "Status"})));
        }
        (
            StatusCode::OK,
            Json(json!({
                "kind": "Namespace",
                "metadata": {"name": name, "uid": "0d3c7a52-5c1e-4f55-a7f0-6a2f0b1c9e44"}
            })),
        )
    }

    #[tokio::test]
    async fn prints_kube_system_uid() {
        let base = spawn_server(
            Router::new().route("/api/v1/namespaces/{name}", get(namespace)),
        )
        .await;

        let client =
            ClusterClient::new(&ToolsConfig::default(), base, "sa-token\n", None).unwrap();

        assert_eq!(
            client.cluster_uuid().await.unwrap(),
            "0d3c7a52-5c1e-4f55-a7f0-6a2f0b1c9e44"
        );
    }

    #[tokio::test]
    async fn forbidden_is_an_error() {
        let base = spawn_server(
            Router::new().route("/api/v1/namespaces/{name}", get(namespace)),
        )
        .await;

        let client = ClusterClient::new(&ToolsConfig::default(), base, "other", None).unwrap();

        assert!(matches!(
            client.cluster_uuid().await,
            Err(ToolsError::Upstream { status: 403, .. })
        ));
    }
}
