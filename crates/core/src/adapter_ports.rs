//! Dispatcher-facing adapter port
//!
//! The dispatcher that picks an adapter for a capability reference lives
//! outside this workspace. It only needs these four calls, so new adapters can
//! be registered without touching it.

use async_trait::async_trait;
use erpbridge_domain::{ExecutionResult, Readiness};
use serde_json::Value;

/// Contract between the dispatcher and one protocol adapter.
#[async_trait]
pub trait CapabilityAdapter: Send + Sync {
    /// Identifier reported as `handler_id` in every result.
    fn handler_id(&self) -> &str;

    /// Whether this adapter claims the reference at all.
    fn matches(&self, reference: &str) -> bool;

    /// Execute a reference with the caller's payload. Never fails; failures
    /// are carried in the returned result.
    async fn execute(&self, reference: &str, payload: &Value) -> ExecutionResult;

    /// Pre-flight check against the given raw configuration document.
    async fn readiness(&self, config: &Value) -> Readiness;
}
