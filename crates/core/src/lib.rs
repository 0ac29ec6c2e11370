//! # erpbridge Core
//!
//! Pure routing logic layer - no network code.
//!
//! This crate contains:
//! - The capability reference grammar and prefix matcher
//! - The operation-to-HTTP mapping
//! - Port interfaces (traits) for transports and adapters
//! - The generic `AdapterRouter` that ties them together
//!
//! ## Architecture Principles
//! - Only depends on `erpbridge-domain`
//! - No HTTP client, no configuration files
//! - All I/O through the [`Transport`] port
//! - Pure, testable business logic

pub mod adapter_ports;
pub mod routing;

// Re-export specific items to avoid ambiguity
pub use adapter_ports::CapabilityAdapter;
pub use routing::grammar::{matches, parse_reference};
pub use routing::http_call::{to_http_call, HttpCall, HttpMethod};
pub use routing::ports::{RequestOptions, Transport};
pub use routing::router::AdapterRouter;
