//! Domain types and models
//!
//! - [`operation`]: parsed capability references
//! - [`response`]: the remote system's native envelope
//! - [`execution`]: the canonical result handed back to callers
//! - [`session`]: authentication tokens held by a transport

pub mod execution;
pub mod operation;
pub mod response;
pub mod session;

pub use execution::{ExecutionResult, ExecutionStatus, Readiness};
pub use operation::{InvokeMode, Operation, OperationDescriptor, ReferenceKind};
pub use response::{FailureDetail, RemoteResponse};
pub use session::TokenPair;
