//! # erpbridge Domain
//!
//! Data types shared by every erpbridge layer.
//!
//! This crate contains:
//! - Adapter configuration (raw settings, validated config, defaults)
//! - Operation descriptors produced from capability references
//! - Remote response and execution result envelopes
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other erpbridge crates
//! - Only external dependencies allowed
//! - No I/O: pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
