//! Conversions from external infrastructure errors into domain errors.

use erpbridge_domain::BridgeError;
use reqwest::Error as HttpError;
use serde_json::Error as JsonError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub BridgeError);

impl From<InfraError> for BridgeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<BridgeError> for InfraError {
    fn from(value: BridgeError) -> Self {
        InfraError(value)
    }
}

trait IntoBridgeError {
    fn into_bridge(self) -> BridgeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for HttpError {
    fn into_bridge(self) -> BridgeError {
        let url = self.url().map(|u| u.to_string()).unwrap_or_else(|| "<unknown url>".into());

        if self.is_timeout() {
            return BridgeError::Timeout(format!("HTTP request to {url} timed out"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return BridgeError::Network(format!("HTTP connection to {url} failed: {self}"));
        }

        if self.is_builder() {
            return BridgeError::Internal(format!("failed to build HTTP request: {self}"));
        }

        if self.is_decode() || self.is_body() {
            return BridgeError::InvalidResponse(format!("failed to read response body: {self}"));
        }

        BridgeError::Network(format!("HTTP request to {url} failed: {self}"))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → BridgeError */
/* -------------------------------------------------------------------------- */

impl IntoBridgeError for JsonError {
    fn into_bridge(self) -> BridgeError {
        BridgeError::InvalidResponse(format!("response is not valid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_bridge())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
