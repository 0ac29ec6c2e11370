//! Canonical execution result
//!
//! Every call through an adapter ends in an [`ExecutionResult`], whatever the
//! remote system or the failure mode. The `status` field is derived from the
//! remote `success` flag and from nothing else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::impl_wire_name_conversions;
use crate::types::response::{FailureDetail, RemoteResponse};

/// Outcome of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failed,
}

impl_wire_name_conversions!(ExecutionStatus {
    Success => "success",
    Failed => "failed",
});

/// Uniform success/failure envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub handler_id: String,
    pub binding_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<FailureDetail>,
}

impl ExecutionResult {
    /// Map a remote response onto the canonical envelope.
    ///
    /// Success keeps `data`/`meta`; failure keeps the error block. A failure
    /// without an error block gets a generic `REMOTE_ERROR` so callers can
    /// always read a code.
    pub fn from_remote(
        handler_id: impl Into<String>,
        binding_ref: impl Into<String>,
        response: RemoteResponse,
    ) -> Self {
        let handler_id = handler_id.into();
        let binding_ref = binding_ref.into();

        if response.success {
            return Self {
                status: ExecutionStatus::Success,
                handler_id,
                binding_ref,
                data: response.data,
                meta: response.meta,
                error: None,
            };
        }

        let error = response.error.unwrap_or_else(|| {
            FailureDetail::new("REMOTE_ERROR", "remote reported failure without error details")
        });

        Self::failed(handler_id, binding_ref, error)
    }

    /// Failed result that never reached the remote system.
    pub fn failed(
        handler_id: impl Into<String>,
        binding_ref: impl Into<String>,
        error: FailureDetail,
    ) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            handler_id: handler_id.into(),
            binding_ref: binding_ref.into(),
            data: None,
            meta: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Outcome of a readiness probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub passed: bool,
    pub reason: String,
}

impl Readiness {
    pub fn passed(reason: impl Into<String>) -> Self {
        Self { passed: true, reason: reason.into() }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self { passed: false, reason: reason.into() }
    }
}
