//! Session-aware transport to the remote business system.

mod auth;
pub mod client;
mod session;

pub use client::TransportClient;
