//! Integration tests for configuration files driving a live adapter
//!
//! **Coverage:**
//! - A JSON or TOML file yields a working adapter against a mock ERP
//! - Validation failures name every missing field

#[path = "support.rs"]
mod support;

use std::time::Duration;

use erpbridge_core::CapabilityAdapter;
use erpbridge_domain::BridgeError;
use erpbridge_infra::config::{load_from_file, read_settings};
use erpbridge_infra::MoquiAdapter;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use support::{init_tracing, mount_login};

#[tokio::test]
async fn toml_file_configures_working_adapter() {
    init_tracing();
    let server = MockServer::start().await;
    mount_login(&server, "a1").await;
    Mock::given(method("GET"))
        .and(path("/entities/Party/P1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "partyId": "P1" })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("erpbridge.toml");
    std::fs::write(
        &file,
        format!(
            r#"
baseUrl = "{}"
timeout = 4000
retryCount = 0
retryDelay = 0

[credentials]
username = "a"
password = "b"
"#,
            server.uri()
        ),
    )
    .unwrap();

    let config = load_from_file(Some(file)).unwrap();
    assert_eq!(config.timeout, Duration::from_millis(4000));
    assert_eq!(config.max_attempts(), 1);

    let adapter = MoquiAdapter::new(config).unwrap();
    let result = adapter.execute("moqui.Party.get", &json!({ "id": "P1" })).await;
    assert_eq!(result.data, Some(json!({ "partyId": "P1" })));
}

#[test]
fn json_file_with_gaps_reports_every_missing_field() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("erpbridge.json");
    std::fs::write(&file, r#"{ "credentials": { "password": "b" } }"#).unwrap();

    let settings = read_settings(Some(file.clone())).unwrap();
    assert_eq!(settings.missing_fields(), vec!["baseUrl", "credentials.username"]);

    let err = load_from_file(Some(file)).unwrap_err();
    assert_eq!(err.code(), "CONFIG_MISSING_FIELDS");
    assert!(matches!(err, BridgeError::ConfigValidation { ref missing } if missing.len() == 2));
}

#[test]
fn non_http_base_url_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("erpbridge.json");
    std::fs::write(
        &file,
        r#"{ "baseUrl": "ftp://erp.local", "credentials": { "username": "a", "password": "b" } }"#,
    )
    .unwrap();

    let err = load_from_file(Some(file)).unwrap_err();
    assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("ftp")));
}
