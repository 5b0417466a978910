//! Reverb Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - The execute use case and fail-fast handling
//! - The check evaluation engine
//! - Scenario and suite orchestration

pub mod evaluate;
pub mod execute;
pub mod ports;
pub mod run;

pub use evaluate::CheckRunner;
pub use execute::{ExecuteError, ExecuteRequest, ExecuteResult};
pub use ports::{Transport, TransportError};
pub use run::{ScenarioOutcome, ScenarioRun, ScenarioRunner, SuiteRun};
