//! Error types used throughout erpbridge

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for erpbridge
///
/// Internal fallible steps return this type. The public transport and router
/// operations never hand it to callers directly; they fold it into a
/// [`RemoteResponse`](crate::RemoteResponse) or
/// [`ExecutionResult`](crate::ExecutionResult) via [`BridgeError::code`].
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration is missing required fields: {}", .missing.join(", "))]
    ConfigValidation { missing: Vec<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid capability reference: {0}")]
    InvalidReference(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Client disposed")]
    Disposed,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BridgeError {
    /// Stable failure code reported in result envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_INVALID",
            Self::ConfigValidation { .. } => "CONFIG_MISSING_FIELDS",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Auth(_) => "AUTH_FAILED",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::InvalidInput(_) => "MISSING_ID",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Cancelled => "CANCELLED",
            Self::Disposed => "CLIENT_DISPOSED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the HTTP client may repeat a failed attempt under its retry
    /// budget. Server errors (5xx) are retried by status, not through here.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Result type alias for erpbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;
