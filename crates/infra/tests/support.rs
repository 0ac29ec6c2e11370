//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Once;
use std::time::Duration;

use erpbridge_domain::AdapterConfig;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Config pointing at the mock server with user `a` / password `b`.
pub fn config_for(server: &MockServer, retry_count: u32) -> AdapterConfig {
    AdapterConfig::new(server.uri(), "a", "b")
        .expect("mock server URI should be a valid base URL")
        .with_retry(retry_count, Duration::ZERO)
        .with_timeout(Duration::from_secs(5))
}

/// Login endpoint that always issues `access` with refresh token `r-<access>`.
pub async fn mount_login(server: &MockServer, access: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "refreshToken": format!("r-{access}"),
        })))
        .mount(server)
        .await;
}

/// Number of requests the server received on `request_path`.
pub async fn hits(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
