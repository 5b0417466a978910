//! Reverb - httpbin contract harness
//!
//! Wires the layers together: builds the httpbin contract suite from
//! the domain types and exposes it for the binary and for tests.

pub mod httpbin;

pub use httpbin::{DEFAULT_BASE_URL, MAX_RESPONSE_TIME_MS, contract_suite};
