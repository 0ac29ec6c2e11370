//! Generic capability router

use erpbridge_domain::constants::MOQUI_HANDLER_ID;
use erpbridge_domain::{ExecutionResult, FailureDetail, OperationDescriptor};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::routing::grammar;
use crate::routing::http_call::to_http_call;
use crate::routing::ports::{RequestOptions, Transport};

/// Routes capability references to a [`Transport`].
///
/// Holds no state besides the transport and its handler id, so one router can
/// serve any number of concurrent executions.
pub struct AdapterRouter<T> {
    transport: T,
    handler_id: String,
}

impl<T: Transport> AdapterRouter<T> {
    pub fn new(transport: T) -> Self {
        Self::with_handler_id(transport, MOQUI_HANDLER_ID)
    }

    pub fn with_handler_id(transport: T, handler_id: impl Into<String>) -> Self {
        Self { transport, handler_id: handler_id.into() }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn handler_id(&self) -> &str {
        &self.handler_id
    }

    pub fn parse_reference(&self, reference: &str) -> Option<OperationDescriptor> {
        grammar::parse_reference(reference)
    }

    pub fn matches(&self, reference: &str) -> bool {
        grammar::matches(reference)
    }

    /// Execute a reference. Never fails; see [`execute_with`](Self::execute_with).
    pub async fn execute(&self, reference: &str, payload: &Value) -> ExecutionResult {
        self.execute_with(reference, payload, None).await
    }

    /// Execute a reference, optionally under a cancellation token.
    ///
    /// Unparseable references and payloads missing a required id fail locally
    /// without touching the transport.
    #[instrument(skip(self, payload, cancellation), fields(handler_id = %self.handler_id))]
    pub async fn execute_with(
        &self,
        reference: &str,
        payload: &Value,
        cancellation: Option<CancellationToken>,
    ) -> ExecutionResult {
        let Some(descriptor) = grammar::parse_reference(reference) else {
            warn!("capability reference does not match any known pattern");
            return ExecutionResult::failed(
                self.handler_id.as_str(),
                reference,
                FailureDetail::new(
                    "INVALID_REFERENCE",
                    format!("`{reference}` is not a recognized capability reference"),
                ),
            );
        };

        let call = match to_http_call(&descriptor, payload) {
            Ok(call) => call,
            Err(err) => {
                warn!(error = %err, "payload cannot be mapped to a remote call");
                return ExecutionResult::failed(
                    self.handler_id.as_str(),
                    reference,
                    FailureDetail::from(&err),
                );
            }
        };

        debug!(method = %call.method, path = %call.path(), "dispatching capability");

        let mut options = RequestOptions::new().with_body(call.body).with_query(call.query);
        options.cancellation = cancellation;

        let response = self.transport.request(call.method, &call.segments, options).await;
        ExecutionResult::from_remote(self.handler_id.as_str(), reference, response)
    }
}
