//! Transport port
//!
//! The router never talks HTTP itself. Anything that can send a call to the
//! remote system and hand back a [`RemoteResponse`] can sit behind it.

use std::sync::Arc;

use async_trait::async_trait;
use erpbridge_domain::RemoteResponse;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::routing::http_call::HttpMethod;

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    /// Cancelling the token abandons in-flight attempts and pending retry
    /// delays; the request then resolves to a `CANCELLED` failure.
    pub cancellation: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, body: Option<Value>) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// Authenticated request channel to the remote system.
///
/// Implementations must never fail with an error: every outcome, including
/// network and authentication problems, is a [`RemoteResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send one logical request. `segments` are unencoded path segments
    /// relative to the base URL.
    async fn request(
        &self,
        method: HttpMethod,
        segments: &[String],
        options: RequestOptions,
    ) -> RemoteResponse;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(
        &self,
        method: HttpMethod,
        segments: &[String],
        options: RequestOptions,
    ) -> RemoteResponse {
        (**self).request(method, segments, options).await
    }
}
