//! Capability routing
//!
//! Turns a capability reference into an HTTP call, hands it to a
//! [`Transport`](ports::Transport), and normalizes the answer.

pub mod grammar;
pub mod http_call;
pub mod ports;
pub mod router;
