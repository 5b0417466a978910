//! Reverb Domain - Core business types
//!
//! This crate defines the domain model for the Reverb HTTP contract
//! checker. All types here are pure Rust with no I/O dependencies:
//! request specifications, response records, checks, and the scenarios
//! and suites that group them.

pub mod check;
pub mod error;
pub mod request;
pub mod response;
pub mod suite;

pub use check::{Assertion, Check, CheckOutcome, ScenarioReport};
pub use error::{DomainError, DomainResult};
pub use request::{
    DEFAULT_TIMEOUT_MS, Header, Headers, HttpMethod, QueryParam, QueryParams, RequestBody,
    RequestSpec, RequestSpecBuilder,
};
pub use response::{ResponseBody, ResponseRecord, StatusCode};
pub use suite::{Scenario, Suite};
