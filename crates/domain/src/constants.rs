//! Adapter constants
//!
//! Centralized location for defaults and fixed remote paths.

// Configuration defaults
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_RETRY_COUNT: u32 = 2;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

// Authentication endpoints, rooted at the configured base URL
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";
pub const AUTH_LOGOUT_PATH: &str = "/auth/logout";

// Capability reference prefixes claimed by the Moqui adapter
pub const MOQUI_PREFIX: &str = "moqui.";
pub const SPEC_ERP_PREFIX: &str = "spec.erp.";

/// Handler identifier reported in every execution result.
pub const MOQUI_HANDLER_ID: &str = "moqui";

/// Header carrying the per-call correlation id.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";
