//! Reverb Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod echo;

pub use adapters::{ReqwestTransport, USER_AGENT};
pub use echo::EchoTransport;
