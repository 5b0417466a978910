//! Scenarios and suites.
//!
//! A scenario pairs one request specification with the checks to run
//! against its response. A suite is an explicit, ordered list of
//! scenarios; composition is by value, not by chaining callbacks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::check::{Assertion, Check};
use crate::request::RequestSpec;

fn generate_id() -> Uuid {
    Uuid::now_v7()
}

/// One request and the checks to run against its response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: Uuid,
    /// Scenario name, used as the report heading.
    pub name: String,
    /// The request to execute.
    pub request: RequestSpec,
    /// Checks evaluated in declaration order.
    #[serde(default)]
    pub checks: Vec<Check>,
}

impl Scenario {
    /// Creates a scenario with no checks.
    #[must_use]
    pub fn new(name: impl Into<String>, request: RequestSpec) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            request,
            checks: Vec::new(),
        }
    }

    /// Adds a check (builder pattern).
    #[must_use]
    pub fn with_check(mut self, label: impl Into<String>, assertion: Assertion) -> Self {
        self.checks.push(Check::new(label, assertion));
        self
    }

    /// Returns the number of checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true if the scenario has no checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// An ordered collection of scenarios run as one unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Suite {
    /// Unique identifier.
    #[serde(default = "generate_id")]
    pub id: Uuid,
    /// Suite name.
    pub name: String,
    /// Scenarios in execution order.
    #[serde(default)]
    pub scenarios: Vec<Scenario>,
}

impl Suite {
    /// Creates an empty suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            scenarios: Vec::new(),
        }
    }

    /// Adds a scenario.
    pub fn add(&mut self, scenario: Scenario) {
        self.scenarios.push(scenario);
    }

    /// Adds a scenario (builder pattern).
    #[must_use]
    pub fn with_scenario(mut self, scenario: Scenario) -> Self {
        self.scenarios.push(scenario);
        self
    }

    /// Returns the number of scenarios.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Returns true if the suite has no scenarios.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scenario_builder() {
        let request = RequestSpec::get("https://httpbin.org/get").build().unwrap();
        let scenario = Scenario::new("GET request", request)
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "duration stays within budget",
                Assertion::DurationWithin { max_ms: 1000 },
            );

        assert_eq!(scenario.name, "GET request");
        assert_eq!(scenario.len(), 2);
        assert_eq!(scenario.checks[0].label, "response code should be 200");
    }

    #[test]
    fn test_suite_composition_keeps_order() {
        let request = RequestSpec::get("https://httpbin.org/get").build().unwrap();
        let suite = Suite::new("httpbin contract")
            .with_scenario(Scenario::new("first", request.clone()))
            .with_scenario(Scenario::new("second", request));

        assert_eq!(suite.len(), 2);
        let names: Vec<_> = suite.scenarios.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_scenario_ids_are_unique() {
        let request = RequestSpec::get("https://httpbin.org/get").build().unwrap();
        let a = Scenario::new("a", request.clone());
        let b = Scenario::new("b", request);
        assert_ne!(a.id, b.id);
    }
}
