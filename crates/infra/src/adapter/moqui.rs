//! Moqui capability adapter
//!
//! Wires the generic [`AdapterRouter`] to a real [`TransportClient`] and adds
//! the readiness probe the dispatcher runs before routing work here.
//!
//! # Usage
//!
//! ```no_run
//! use erpbridge_core::CapabilityAdapter;
//! use erpbridge_domain::{AdapterConfig, Result};
//! use erpbridge_infra::MoquiAdapter;
//! use serde_json::json;
//!
//! # async fn example() -> Result<()> {
//! let config = AdapterConfig::new("https://erp.example.com/rest/s1", "alice", "secret")?;
//! let adapter = MoquiAdapter::new(config)?;
//!
//! if adapter.matches("moqui.OrderHeader.get") {
//!     let result = adapter.execute("moqui.OrderHeader.get", &json!({ "id": "7" })).await;
//!     println!("{}", serde_json::to_string(&result).unwrap_or_default());
//! }
//!
//! adapter.shutdown().await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use erpbridge_core::{AdapterRouter, CapabilityAdapter};
use erpbridge_domain::{AdapterConfig, AdapterSettings, ExecutionResult, Readiness, Result};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::transport::TransportClient;

/// Adapter for Moqui-style ERP systems.
pub struct MoquiAdapter {
    router: AdapterRouter<Arc<TransportClient>>,
}

impl MoquiAdapter {
    /// Build an adapter with its own transport. No network I/O.
    ///
    /// # Errors
    /// Returns `BridgeError` if the HTTP client cannot be built.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        Ok(Self::from_transport(Arc::new(TransportClient::new(config)?)))
    }

    /// Build an adapter over an existing, possibly shared, transport.
    pub fn from_transport(transport: Arc<TransportClient>) -> Self {
        Self { router: AdapterRouter::new(transport) }
    }

    pub fn router(&self) -> &AdapterRouter<Arc<TransportClient>> {
        &self.router
    }

    pub fn transport(&self) -> &Arc<TransportClient> {
        self.router.transport()
    }

    /// Execute under a cancellation token.
    pub async fn execute_with(
        &self,
        reference: &str,
        payload: &Value,
        cancellation: CancellationToken,
    ) -> ExecutionResult {
        self.router.execute_with(reference, payload, Some(cancellation)).await
    }

    /// Log out and dispose the transport.
    pub async fn shutdown(&self) {
        self.transport().dispose().await;
    }
}

#[async_trait]
impl CapabilityAdapter for MoquiAdapter {
    fn handler_id(&self) -> &str {
        self.router.handler_id()
    }

    fn matches(&self, reference: &str) -> bool {
        self.router.matches(reference)
    }

    async fn execute(&self, reference: &str, payload: &Value) -> ExecutionResult {
        self.router.execute(reference, payload).await
    }

    async fn readiness(&self, config: &Value) -> Readiness {
        probe_readiness(config).await
    }
}

/// Check that `config` is complete and its credentials are accepted.
///
/// Uses a throwaway transport: one login, then dispose. No business call is
/// made and no existing session is touched.
#[instrument(skip(config))]
pub async fn probe_readiness(config: &Value) -> Readiness {
    let settings: AdapterSettings = match serde_json::from_value(config.clone()) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(error = %err, "readiness: configuration is not readable");
            return Readiness::failed(format!("Configuration is not readable: {err}"));
        }
    };

    let config = match settings.validate() {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "readiness: configuration rejected");
            return Readiness::failed(err.to_string());
        }
    };

    let base_url = config.base_url.clone();
    let transport = match TransportClient::new(config) {
        Ok(transport) => transport,
        Err(err) => return Readiness::failed(err.to_string()),
    };

    let login = transport.login().await;
    transport.dispose().await;

    if login.is_success() {
        info!(%base_url, "readiness: login succeeded");
        return Readiness::passed(format!("Authenticated against {base_url}"));
    }

    let detail = login
        .error
        .map(|e| format!("{}: {}", e.code_text(), e.message.unwrap_or_default()))
        .unwrap_or_else(|| "login failed".to_string());
    warn!(%base_url, %detail, "readiness: login failed");
    Readiness::failed(format!("Login to {base_url} failed ({detail})"))
}
