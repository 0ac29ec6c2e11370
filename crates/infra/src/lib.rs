//! # erpbridge Infrastructure
//!
//! I/O implementations of the core ports.
//!
//! This crate contains:
//! - The retrying HTTP client (reqwest)
//! - The session-aware `TransportClient`
//! - The Moqui capability adapter and its readiness probe
//! - Configuration loading from files and the environment
//!
//! ## Architecture
//! - Implements traits defined in `erpbridge-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod adapter;
pub mod config;
pub mod errors;
pub mod http;
pub mod transport;

// Re-export commonly used items
pub use adapter::{probe_readiness, MoquiAdapter};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use transport::TransportClient;
