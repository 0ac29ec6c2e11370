//! Authenticated transport to one remote endpoint.
//!
//! ## Request algorithm
//! 1. Log in if no session is held (single-flight).
//! 2. Send with the retry policy of [`HttpClient`]: connection failures,
//!    timeouts and 5xx are retried `retry_count` times with a fixed delay.
//! 3. A 401 starts session recovery: one refresh, then one fresh login, each
//!    followed by one retry. A 401 after the login attempt is `AUTH_FAILED`.
//! 4. Any other status is returned as-is.
//!
//! Concurrent callers that hit a 401 on the same session generation share a
//! single recovery: the first one through the gate refreshes, the others see
//! the generation moved and adopt its outcome.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use erpbridge_core::{HttpMethod, RequestOptions, Transport};
use erpbridge_domain::constants::{
    AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_REFRESH_PATH, CORRELATION_ID_HEADER,
};
use erpbridge_domain::{
    AdapterConfig, BridgeError, FailureDetail, RemoteResponse, Result, TokenPair,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response, StatusCode};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;
use uuid::Uuid;

use crate::errors::InfraError;
use crate::http::HttpClient;
use crate::transport::auth::{parse_token_body, LoginRequest, RefreshRequest};
use crate::transport::session::{SessionSnapshot, SessionStore};

const USER_AGENT: &str = concat!("erpbridge/", env!("CARGO_PKG_VERSION"));

/// Recovery step taken after a 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recovery {
    Refresh,
    Login,
}

/// One authenticated session to one remote endpoint.
///
/// Shared through `Arc`; every method takes `&self`.
pub struct TransportClient {
    config: AdapterConfig,
    http: HttpClient,
    session: SessionStore,
    disposed: AtomicBool,
}

impl TransportClient {
    /// Build a client for a validated configuration. No network I/O.
    ///
    /// # Errors
    /// Returns `BridgeError` if the underlying HTTP client cannot be built.
    pub fn new(config: AdapterConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .max_attempts(config.max_attempts() as usize)
            .retry_delay(config.retry_delay)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { config, http, session: SessionStore::new(), disposed: AtomicBool::new(false) })
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Exchange credentials for a token pair.
    ///
    /// On failure the client holds no session.
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn login(&self) -> RemoteResponse {
        if self.is_disposed() {
            return BridgeError::Disposed.into();
        }

        let _gate = self.session.gate().await;
        match self.login_locked().await {
            Ok(_) => RemoteResponse::success(None, None),
            Err(err) => err.into(),
        }
    }

    /// Trade the refresh token for a new pair. On failure the old pair is
    /// discarded.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> bool {
        if self.is_disposed() {
            return false;
        }

        let _gate = self.session.gate().await;
        self.refresh_locked().await.is_ok()
    }

    /// End the remote session and forget the tokens.
    ///
    /// Local state is cleared even if the remote call fails. Without a
    /// session nothing is sent.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let _gate = self.session.gate().await;
        let Some(tokens) = self.session.clear().await else {
            debug!("no session to log out");
            return;
        };

        let outcome = match self.endpoint(&split_path(AUTH_LOGOUT_PATH), &[]) {
            Ok(url) => {
                let builder =
                    self.http.request(Method::POST, url).header(AUTHORIZATION, tokens.bearer());
                self.http.send(builder).await.map(|response| response.status())
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(status) if status.is_success() => info!("logged out"),
            Ok(status) => warn!(%status, "remote logout rejected; local session cleared"),
            Err(err) => warn!(error = %err, "remote logout failed; local session cleared"),
        }
    }

    /// Log out and refuse further requests. Safe to call repeatedly.
    pub async fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        self.logout().await;
    }

    /// Send one logical request. Never fails; every error becomes a failure
    /// response.
    #[instrument(
        skip(self, segments, options),
        fields(%method, path = %display_path(segments), correlation_id = tracing::field::Empty)
    )]
    pub async fn request(
        &self,
        method: HttpMethod,
        segments: &[String],
        options: RequestOptions,
    ) -> RemoteResponse {
        if self.is_disposed() {
            return BridgeError::Disposed.into();
        }

        let correlation_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("correlation_id", correlation_id.as_str());

        match self.request_inner(method, segments, &options, &correlation_id).await {
            Ok(response) => response,
            Err(err) => {
                warn!(code = err.code(), error = %err, "request failed");
                err.into()
            }
        }
    }

    async fn request_inner(
        &self,
        method: HttpMethod,
        segments: &[String],
        options: &RequestOptions,
        correlation_id: &str,
    ) -> Result<RemoteResponse> {
        let url = self.endpoint(segments, &options.query)?;
        let cancellation = options.cancellation.as_ref();
        let mut session = self.ensure_session().await?;
        let mut attempted: Vec<Recovery> = Vec::with_capacity(2);

        loop {
            let tokens = session.tokens.as_ref().ok_or_else(|| {
                BridgeError::Auth("session was invalidated by another caller".into())
            })?;

            let response = self
                .send_authorized(
                    method,
                    &url,
                    options.body.as_ref(),
                    tokens,
                    correlation_id,
                    cancellation,
                )
                .await?;

            if response.status() != StatusCode::UNAUTHORIZED {
                return into_remote(response).await;
            }

            if attempted.contains(&Recovery::Login) {
                return Err(BridgeError::Auth(
                    "remote rejected the session after re-authentication".into(),
                ));
            }

            let step = if attempted.contains(&Recovery::Refresh) {
                Recovery::Login
            } else {
                Recovery::Refresh
            };
            warn!(?step, "session rejected, recovering");
            session = self.recover(session.generation, step, &mut attempted).await?;
        }
    }

    /// Tokens to use for the first attempt, logging in if needed.
    async fn ensure_session(&self) -> Result<SessionSnapshot> {
        let snapshot = self.session.snapshot().await;
        if snapshot.tokens.is_some() {
            return Ok(snapshot);
        }

        let _gate = self.session.gate().await;
        let snapshot = self.session.snapshot().await;
        if snapshot.tokens.is_some() {
            return Ok(snapshot);
        }

        self.login_locked().await
    }

    /// Single-flight session recovery after a 401 on `stale_generation`.
    async fn recover(
        &self,
        stale_generation: u64,
        step: Recovery,
        attempted: &mut Vec<Recovery>,
    ) -> Result<SessionSnapshot> {
        let _gate = self.session.gate().await;
        self.ensure_live()?;
        attempted.push(step);

        let current = self.session.snapshot().await;
        if current.generation != stale_generation {
            debug!("session already recovered by another caller");
            return match current.tokens {
                Some(_) => Ok(current),
                None => Err(BridgeError::Auth("concurrent session recovery failed".into())),
            };
        }

        if step == Recovery::Refresh {
            match self.refresh_locked().await {
                Ok(snapshot) => return Ok(snapshot),
                Err(BridgeError::Disposed) => return Err(BridgeError::Disposed),
                Err(err) => {
                    warn!(error = %err, "token refresh failed, logging in again");
                    attempted.push(Recovery::Login);
                }
            }
        }

        self.login_locked().await
    }

    /// Caller must hold the gate.
    async fn login_locked(&self) -> Result<SessionSnapshot> {
        self.ensure_live()?;
        let url = self.endpoint(&split_path(AUTH_LOGIN_PATH), &[])?;
        let body = LoginRequest::from(&self.config.credentials);

        let result = self.exchange_tokens(url, &body).await;
        match result.and_then(|tokens| self.ensure_live().map(|()| tokens)) {
            Ok(tokens) => {
                info!("login succeeded");
                Ok(self.session.replace(tokens).await)
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "login failed");
                self.session.clear().await;
                Err(err)
            }
        }
    }

    /// Caller must hold the gate.
    async fn refresh_locked(&self) -> Result<SessionSnapshot> {
        self.ensure_live()?;
        let Some(refresh_token) = self.session.refresh_token().await else {
            self.session.clear().await;
            return Err(BridgeError::Auth("no refresh token held".into()));
        };

        let url = self.endpoint(&split_path(AUTH_REFRESH_PATH), &[])?;
        let body = RefreshRequest { refresh_token: &refresh_token };

        let result = self.exchange_tokens(url, &body).await;
        match result.and_then(|tokens| self.ensure_live().map(|()| tokens)) {
            Ok(tokens) => {
                info!("token refresh succeeded");
                Ok(self.session.replace(tokens).await)
            }
            Err(err) => {
                warn!(code = err.code(), error = %err, "token refresh failed");
                self.session.clear().await;
                Err(err)
            }
        }
    }

    /// Tokens must never be stored once `dispose` has started.
    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(BridgeError::Disposed);
        }
        Ok(())
    }

    async fn exchange_tokens<B>(&self, url: Url, body: &B) -> Result<TokenPair>
    where
        B: serde::Serialize + Sync,
    {
        let response = self.http.send(self.http.request(Method::POST, url).json(body)).await?;
        let status = response.status();
        let text = response.text().await.map_err(|e| BridgeError::from(InfraError::from(e)))?;

        if !status.is_success() {
            return Err(BridgeError::Auth(format!(
                "authentication endpoint answered {status}: {}",
                failure_message(status, &text)
            )));
        }

        parse_token_body(&text)
    }

    async fn send_authorized(
        &self,
        method: HttpMethod,
        url: &Url,
        body: Option<&Value>,
        tokens: &TokenPair,
        correlation_id: &str,
        cancellation: Option<&CancellationToken>,
    ) -> Result<Response> {
        let mut builder = self
            .http
            .request(to_reqwest_method(method), url.clone())
            .header(AUTHORIZATION, tokens.bearer())
            .header(CORRELATION_ID_HEADER, correlation_id);

        if let Some(body) = body {
            builder = builder.json(body);
        }

        self.http.send_cancellable(builder, cancellation).await
    }

    /// Append `segments` to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[String], query: &[(String, String)]) -> Result<Url> {
        let mut url = self.config.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                BridgeError::Config(format!(
                    "base URL cannot carry a path: {}",
                    self.config.base_url
                ))
            })?;
            path.pop_if_empty().extend(segments);
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[async_trait]
impl Transport for TransportClient {
    async fn request(
        &self,
        method: HttpMethod,
        segments: &[String],
        options: RequestOptions,
    ) -> RemoteResponse {
        TransportClient::request(self, method, segments, options).await
    }
}

impl std::fmt::Debug for TransportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect()
}

fn display_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}

/// Normalize a business response into the remote envelope.
async fn into_remote(response: Response) -> Result<RemoteResponse> {
    let status = response.status();
    let text = response.text().await.map_err(|e| BridgeError::from(InfraError::from(e)))?;

    if status.is_success() {
        parse_success_body(&text)
    } else {
        Ok(parse_failure_body(status, &text))
    }
}

fn parse_success_body(text: &str) -> Result<RemoteResponse> {
    if text.trim().is_empty() {
        return Ok(RemoteResponse::success(None, None));
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| BridgeError::from(InfraError::from(e)))?;
    if value.get("success").is_some_and(Value::is_boolean) {
        return serde_json::from_value(value).map_err(|e| {
            BridgeError::InvalidResponse(format!("malformed response envelope: {e}"))
        });
    }

    Ok(RemoteResponse::success(Some(value), None))
}

fn parse_failure_body(status: StatusCode, text: &str) -> RemoteResponse {
    if let Ok(envelope) = serde_json::from_str::<RemoteResponse>(text) {
        if !envelope.success && envelope.error.is_some() {
            return envelope;
        }
    }

    RemoteResponse::failure(
        FailureDetail::new(format!("HTTP_{}", status.as_u16()), failure_message(status, text))
            .with_details(json!({ "status": status.as_u16() })),
    )
}

fn failure_message(status: StatusCode, text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_json, header, header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config_for(server: &MockServer) -> AdapterConfig {
        AdapterConfig::new(server.uri(), "a", "b")
            .unwrap()
            .with_retry(0, Duration::ZERO)
            .with_timeout(Duration::from_secs(5))
    }

    async fn mount_login(server: &MockServer, access: &str) {
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(json!({ "username": "a", "password": "b" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "accessToken": access, "refreshToken": "r1" })),
            )
            .mount(server)
            .await;
    }

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn logs_in_lazily_and_sends_bearer_token() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("GET"))
            .and(path("/entities/OrderHeader"))
            .and(header("authorization", "Bearer a1"))
            .and(header("accept", "application/json"))
            .and(header_exists("x-correlation-id"))
            .and(query_param("statusId", "OPEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": [{ "orderId": "7" }],
                "meta": { "total": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        assert!(!client.is_authenticated().await);

        let options =
            RequestOptions::new().with_query(vec![("statusId".into(), "OPEN".into())]);
        let response =
            client.request(HttpMethod::Get, &segments(&["entities", "OrderHeader"]), options).await;

        assert!(response.is_success());
        assert_eq!(response.data, Some(json!([{ "orderId": "7" }])));
        assert_eq!(response.meta, Some(json!({ "total": 1 })));
        assert!(client.is_authenticated().await);
    }

    #[tokio::test]
    async fn wraps_plain_bodies_and_handles_empty_ones() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("GET"))
            .and(path("/screens"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(["OrderEntry"])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/entities/OrderHeader/7"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();

        let catalog =
            client.request(HttpMethod::Get, &segments(&["screens"]), RequestOptions::new()).await;
        assert_eq!(catalog, RemoteResponse::success(Some(json!(["OrderEntry"])), None));

        let deleted = client
            .request(
                HttpMethod::Delete,
                &segments(&["entities", "OrderHeader", "7"]),
                RequestOptions::new(),
            )
            .await;
        assert_eq!(deleted, RemoteResponse::success(None, None));
    }

    #[tokio::test]
    async fn non_json_success_body_is_invalid_response() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("GET"))
            .and(path("/screens"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        let response =
            client.request(HttpMethod::Get, &segments(&["screens"]), RequestOptions::new()).await;

        assert_eq!(response.error_code(), Some("INVALID_RESPONSE"));
    }

    #[tokio::test]
    async fn client_errors_keep_remote_envelope_or_get_http_code() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("POST"))
            .and(path("/entities/OrderHeader"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "success": false,
                "error": {
                    "code": "E_DUPLICATE",
                    "message": "order exists",
                    "details": { "id": "7" }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/entities/OrderHeader/8"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();

        let duplicate = client
            .request(
                HttpMethod::Post,
                &segments(&["entities", "OrderHeader"]),
                RequestOptions::new().with_body(Some(json!({ "orderId": "7" }))),
            )
            .await;
        let error = duplicate.error.unwrap();
        assert_eq!(error.code, "E_DUPLICATE");
        assert_eq!(error.details, Some(json!({ "id": "7" })));

        let missing = client
            .request(
                HttpMethod::Get,
                &segments(&["entities", "OrderHeader", "8"]),
                RequestOptions::new(),
            )
            .await;
        let error = missing.error.unwrap();
        assert_eq!(error.code, "HTTP_404");
        assert_eq!(error.message.as_deref(), Some("Not Found"));
        assert_eq!(error.details, Some(json!({ "status": 404 })));
    }

    #[tokio::test]
    async fn reserved_characters_in_segments_are_encoded() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("POST"))
            .and(path("/services/mantle.order.OrderServices.place%23Order"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        let response = client
            .request(
                HttpMethod::Post,
                &segments(&["services", "mantle.order.OrderServices.place#Order"]),
                RequestOptions::new(),
            )
            .await;

        assert!(response.is_success());
    }

    #[tokio::test]
    async fn base_url_path_prefix_is_kept() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/s1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "accessToken": "a1" })))
            .expect(1)
            .mount(&server)
            .await;

        let config = AdapterConfig::new(format!("{}/rest/s1/", server.uri()), "a", "b")
            .unwrap()
            .with_retry(0, Duration::ZERO);
        let client = TransportClient::new(config).unwrap();

        assert!(client.login().await.is_success());
    }

    #[tokio::test]
    async fn failed_login_leaves_client_unauthenticated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(403).set_body_string("locked"))
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        let response = client.login().await;

        assert_eq!(response.error_code(), Some("AUTH_FAILED"));
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn refresh_without_session_fails_quietly() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        assert!(!client.refresh_token().await);
    }

    #[tokio::test]
    async fn failed_refresh_discards_tokens() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({ "refreshToken": "r1" })))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        assert!(client.login().await.is_success());

        assert!(!client.refresh_token().await);
        assert!(!client.is_authenticated().await);
    }

    #[tokio::test]
    async fn logout_clears_locally_even_when_remote_fails() {
        let server = MockServer::start().await;
        mount_login(&server, "a1").await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .and(header("authorization", "Bearer a1"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        assert!(client.login().await.is_success());

        client.logout().await;
        assert!(!client.is_authenticated().await);

        // second logout has no session and sends nothing
        client.logout().await;
    }

    #[tokio::test]
    async fn dispose_is_idempotent_and_blocks_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = TransportClient::new(config_for(&server)).unwrap();
        client.dispose().await;
        client.dispose().await;

        assert!(client.is_disposed());
        let response =
            client.request(HttpMethod::Get, &segments(&["screens"]), RequestOptions::new()).await;
        assert_eq!(response.error_code(), Some("CLIENT_DISPOSED"));
        assert_eq!(client.login().await.error_code(), Some("CLIENT_DISPOSED"));
    }

    #[tokio::test]
    async fn dispose_during_pending_login_leaves_no_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "accessToken": "a1", "refreshToken": "r1" }))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = std::sync::Arc::new(TransportClient::new(config_for(&server)).unwrap());
        let spawn_request = |client: std::sync::Arc<TransportClient>| {
            tokio::spawn(async move {
                let path = segments(&["screens"]);
                client.request(HttpMethod::Get, &path, RequestOptions::new()).await
            })
        };

        let in_flight = spawn_request(client.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;
        let queued = spawn_request(client.clone());
        tokio::time::sleep(Duration::from_millis(50)).await;

        client.dispose().await;

        assert_eq!(in_flight.await.unwrap().error_code(), Some("CLIENT_DISPOSED"));
        assert_eq!(queued.await.unwrap().error_code(), Some("CLIENT_DISPOSED"));
        assert!(!client.is_authenticated().await);
    }

    #[test]
    fn debug_output_hides_credentials() {
        let config = AdapterConfig::new("http://erp.local", "alice", "hunter2").unwrap();
        let client = TransportClient::new(config).unwrap();

        let rendered = format!("{client:?}");
        assert!(rendered.contains("erp.local"));
        assert!(!rendered.contains("hunter2"));
    }
}
