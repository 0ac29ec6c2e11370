//! Remote response envelope
//!
//! The remote system answers with either
//! `{ "success": true, "data": ..., "meta": ... }` or
//! `{ "success": false, "error": { "code", "message", "details" } }`.
//! Transports synthesize the same shape for local failures (timeouts,
//! authentication, ...), so callers only ever see one envelope.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::BridgeError;

/// Error block of a failed remote response.
///
/// Fields are kept exactly as the remote sent them: `code` may be a string or
/// a number, `message` may be absent, and an explicit `details: null` stays
/// `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    pub code: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl FailureDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: Value::String(code.into()), message: Some(message.into()), details: None }
    }

    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Code as text: strings verbatim, anything else as its JSON form.
    pub fn code_text(&self) -> String {
        match &self.code {
            Value::String(code) => code.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&BridgeError> for FailureDetail {
    fn from(err: &BridgeError) -> Self {
        let detail = Self::new(err.code(), err.to_string());
        match err {
            BridgeError::ConfigValidation { missing } => {
                detail.with_details(serde_json::json!({ "missing": missing }))
            }
            _ => detail,
        }
    }
}

/// A field that is present deserializes to `Some`, even when it is `null`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Raw response shape of the remote business system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub success: bool,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureDetail>,
}

impl RemoteResponse {
    pub fn success(data: Option<Value>, meta: Option<Value>) -> Self {
        Self { success: true, data, meta, error: None }
    }

    pub fn failure(error: FailureDetail) -> Self {
        Self { success: false, data: None, meta: None, error: Some(error) }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Failure code, if this is a failure carrying a string code.
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().and_then(|e| e.code.as_str())
    }
}

impl From<BridgeError> for RemoteResponse {
    fn from(err: BridgeError) -> Self {
        Self::failure(FailureDetail::from(&err))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_success_envelope() {
        let response: RemoteResponse = serde_json::from_value(json!({
            "success": true,
            "data": [{ "orderId": "7" }],
            "meta": { "total": 1 }
        }))
        .unwrap();

        assert!(response.is_success());
        assert_eq!(response.data, Some(json!([{ "orderId": "7" }])));
        assert_eq!(response.meta, Some(json!({ "total": 1 })));
        assert!(response.error.is_none());
    }

    #[test]
    fn parses_failure_envelope_with_numeric_code() {
        let response: RemoteResponse = serde_json::from_value(json!({
            "success": false,
            "error": { "code": 409, "message": "conflict", "details": { "field": "orderId" } }
        }))
        .unwrap();

        assert!(!response.is_success());
        let error = response.error.unwrap();
        assert_eq!(error.code, json!(409));
        assert_eq!(error.code_text(), "409");
        assert_eq!(error.details, Some(json!({ "field": "orderId" })));
    }

    #[test]
    fn error_block_survives_unchanged() {
        let raw = json!({
            "success": false,
            "error": { "code": 409, "details": null }
        });

        let response: RemoteResponse = serde_json::from_value(raw.clone()).unwrap();
        let error = response.error.as_ref().unwrap();
        assert!(error.message.is_none());
        assert_eq!(error.details, Some(Value::Null));

        assert_eq!(serde_json::to_value(&response).unwrap(), raw);
    }

    #[test]
    fn bridge_errors_become_failures_with_stable_codes() {
        let response = RemoteResponse::from(BridgeError::Auth("login rejected".into()));

        assert!(!response.is_success());
        assert_eq!(response.error_code(), Some("AUTH_FAILED"));
        assert!(response.data.is_none());
    }

    #[test]
    fn validation_failures_carry_missing_fields_as_details() {
        let err = BridgeError::ConfigValidation { missing: vec!["baseUrl".into()] };
        let detail = FailureDetail::from(&err);

        assert_eq!(detail.details, Some(json!({ "missing": ["baseUrl"] })));
    }
}
