use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use inspecta_api::config::ServerConfig;
use inspecta_api::router::build_app_router;
use inspecta_api::state::AppState;

/// Build a test `ServerConfig` rooted at the given directory.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        inspections_root: root.to_path_buf(),
        request_timeout_secs: 30,
    }
}

/// Build the full application router with all middleware layers, serving
/// the given directory.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(root: &Path) -> Router {
    let config = test_config(root);
    let state = AppState {
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response<axum::body::Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body into raw bytes.
pub async fn body_bytes(response: Response<axum::body::Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body into a UTF-8 string.
pub async fn body_string(response: Response<axum::body::Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
