use std::time::Duration;

use erpbridge_domain::BridgeError;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder, Response};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::InfraError;

/// HTTP client with a bounded, fixed-delay retry policy.
///
/// Connection failures, timeouts and 5xx responses are retried until
/// `max_attempts` is spent. Every other response is handed back on the first
/// attempt.
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    max_attempts: usize,
    retry_delay: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Create a request builder using the underlying reqwest client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Execute the provided request builder with retry semantics.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BridgeError> {
        self.send_cancellable(builder, None).await
    }

    /// Like [`send`](Self::send), but gives up with [`BridgeError::Cancelled`]
    /// as soon as `cancellation` fires, including during a retry delay.
    pub async fn send_cancellable(
        &self,
        builder: RequestBuilder,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Response, BridgeError> {
        let attempts = self.max_attempts.max(1);

        for attempt in 1..=attempts {
            let cloned_builder = builder.try_clone().ok_or_else(|| {
                BridgeError::Internal(
                    "request body cannot be cloned; buffer the body to enable retries".into(),
                )
            })?;

            let request =
                cloned_builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

            let method = request.method().clone();
            let url = request.url().clone();
            debug!(attempt, %method, %url, "sending HTTP request");

            match cancelled_or(cancellation, self.client.execute(request)).await? {
                Ok(response) => {
                    let status = response.status();
                    debug!(attempt, %method, %url, %status, "received HTTP response");

                    if status.is_server_error() && attempt < attempts {
                        warn!(attempt, %method, %url, %status, "server error, retrying");
                        self.pause(cancellation).await?;
                        continue;
                    }

                    return Ok(response);
                }
                Err(err) => {
                    let err = BridgeError::from(InfraError::from(err));
                    debug!(attempt, %method, %url, error = %err, "HTTP request failed");

                    if attempt < attempts && err.is_retryable() {
                        warn!(attempt, %method, %url, error = %err, "transient failure, retrying");
                        self.pause(cancellation).await?;
                        continue;
                    }

                    return Err(err);
                }
            }
        }

        Err(BridgeError::Internal(
            "http client exhausted retries without producing a result".into(),
        ))
    }

    async fn pause(&self, cancellation: Option<&CancellationToken>) -> Result<(), BridgeError> {
        if self.retry_delay.is_zero() {
            return Ok(());
        }
        cancelled_or(cancellation, tokio::time::sleep(self.retry_delay)).await
    }
}

/// Race `future` against the token; a fired token wins.
async fn cancelled_or<F>(
    cancellation: Option<&CancellationToken>,
    future: F,
) -> Result<F::Output, BridgeError>
where
    F: std::future::Future,
{
    match cancellation {
        Some(token) => tokio::select! {
            biased;
            () = token.cancelled() => Err(BridgeError::Cancelled),
            output = future => Ok(output),
        },
        None => Ok(future.await),
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    max_attempts: usize,
    retry_delay: Duration,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            user_agent: None,
            default_headers: None,
        }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure the total number of attempts (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Fixed pause between attempts.
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    pub fn build(self) -> Result<HttpClient, BridgeError> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        let client = builder.build().map_err(|err| BridgeError::from(InfraError::from(err)))?;

        Ok(HttpClient {
            client,
            max_attempts: self.max_attempts.max(1),
            retry_delay: self.retry_delay,
        })
    }
}
