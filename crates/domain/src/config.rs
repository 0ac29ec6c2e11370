//! Adapter configuration
//!
//! Two shapes exist on purpose:
//! - [`AdapterSettings`] mirrors the JSON/TOML document. Every field is
//!   optional so that a loader can deserialize partial input and report all
//!   problems at once.
//! - [`AdapterConfig`] is the validated form consumed by the transport, with
//!   defaults applied and the base URL parsed.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY_MS, DEFAULT_TIMEOUT_MS};
use crate::errors::{BridgeError, Result};

/// Field names reported by validation, in reporting order.
pub const FIELD_BASE_URL: &str = "baseUrl";
pub const FIELD_USERNAME: &str = "credentials.username";
pub const FIELD_PASSWORD: &str = "credentials.password";

/// Unvalidated adapter settings as found in a configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdapterSettings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub credentials: Option<CredentialSettings>,
    /// Per-request timeout in milliseconds.
    #[serde(default)]
    pub timeout: Option<u64>,
    #[serde(default)]
    pub retry_count: Option<u32>,
    /// Fixed delay between retries in milliseconds.
    #[serde(default)]
    pub retry_delay: Option<u64>,
}

/// Unvalidated credential block.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSettings {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for CredentialSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSettings")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AdapterSettings {
    /// Names of every required field that is absent or blank.
    ///
    /// The order is fixed: `baseUrl`, `credentials.username`,
    /// `credentials.password`.
    pub fn missing_fields(&self) -> Vec<String> {
        let credentials = self.credentials.as_ref();
        let checks = [
            (FIELD_BASE_URL, self.base_url.as_deref()),
            (FIELD_USERNAME, credentials.and_then(|c| c.username.as_deref())),
            (FIELD_PASSWORD, credentials.and_then(|c| c.password.as_deref())),
        ];

        checks
            .iter()
            .filter(|(_, value)| is_blank(*value))
            .map(|(name, _)| (*name).to_string())
            .collect()
    }

    /// Validate and apply defaults.
    ///
    /// # Errors
    /// - [`BridgeError::ConfigValidation`] listing every missing field
    /// - [`BridgeError::Config`] when `baseUrl` is not an absolute http(s) URL
    ///   or `timeout` is zero
    pub fn validate(&self) -> Result<AdapterConfig> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(BridgeError::ConfigValidation { missing });
        }

        let raw_url = self.base_url.as_deref().unwrap_or_default().trim();
        let base_url = parse_base_url(raw_url)?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout == 0 {
            return Err(BridgeError::Config("timeout must be greater than 0 ms".into()));
        }

        let credentials = self.credentials.clone().unwrap_or_default();

        Ok(AdapterConfig {
            base_url,
            credentials: Credentials {
                username: credentials.username.unwrap_or_default(),
                password: credentials.password.unwrap_or_default(),
            },
            timeout: Duration::from_millis(timeout),
            retry_count: self.retry_count.unwrap_or(DEFAULT_RETRY_COUNT),
            retry_delay: Duration::from_millis(self.retry_delay.unwrap_or(DEFAULT_RETRY_DELAY_MS)),
        })
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| BridgeError::Config(format!("Invalid baseUrl '{raw}': {e}")))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(BridgeError::Config(format!(
            "Invalid baseUrl '{raw}': unsupported scheme '{other}'"
        ))),
    }
}

/// Username/password pair exchanged at the login endpoint.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated connection settings for one remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub base_url: Url,
    pub credentials: Credentials,
    pub timeout: Duration,
    /// Additional attempts after the first one for retryable failures.
    pub retry_count: u32,
    pub retry_delay: Duration,
}

impl AdapterConfig {
    /// Build a config with default timeout and retry policy.
    ///
    /// # Errors
    /// Same as [`AdapterSettings::validate`].
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        AdapterSettings {
            base_url: Some(base_url.into()),
            credentials: Some(CredentialSettings {
                username: Some(username.into()),
                password: Some(password.into()),
            }),
            ..AdapterSettings::default()
        }
        .validate()
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry_count: u32, retry_delay: Duration) -> Self {
        self.retry_count = retry_count;
        self.retry_delay = retry_delay;
        self
    }

    /// Total attempts a retryable call may make.
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }
}
