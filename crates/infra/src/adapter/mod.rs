//! Concrete capability adapters.

pub mod moqui;

pub use moqui::{probe_readiness, MoquiAdapter};
