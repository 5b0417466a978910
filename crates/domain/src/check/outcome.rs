//! Check evaluation outcomes.

use serde::{Deserialize, Serialize};

use super::{Assertion, Check};

/// The recorded result of evaluating one check against a record.
///
/// Failures are outcomes, not errors. A failed check carries a message
/// describing the mismatch; evaluation itself does not abort.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckOutcome {
    /// Label of the check that was evaluated.
    pub label: String,
    /// The assertion that was evaluated.
    pub assertion: Assertion,
    /// Whether the assertion held.
    pub passed: bool,
    /// Actual value found, for display.
    pub actual: Option<String>,
    /// Mismatch message when the assertion did not hold.
    pub message: Option<String>,
}

impl CheckOutcome {
    /// Creates a passed outcome.
    #[must_use]
    pub fn pass(check: &Check) -> Self {
        Self {
            label: check.label.clone(),
            assertion: check.assertion.clone(),
            passed: true,
            actual: None,
            message: None,
        }
    }

    /// Creates a passed outcome recording the observed value.
    #[must_use]
    pub fn pass_with_value(check: &Check, actual: impl Into<String>) -> Self {
        Self {
            label: check.label.clone(),
            assertion: check.assertion.clone(),
            passed: true,
            actual: Some(actual.into()),
            message: None,
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn fail(check: &Check, message: impl Into<String>) -> Self {
        Self {
            label: check.label.clone(),
            assertion: check.assertion.clone(),
            passed: false,
            actual: None,
            message: Some(message.into()),
        }
    }

    /// Creates a failed outcome recording the observed value.
    #[must_use]
    pub fn fail_with_value(
        check: &Check,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            label: check.label.clone(),
            assertion: check.assertion.clone(),
            passed: false,
            actual: Some(actual.into()),
            message: Some(message.into()),
        }
    }
}

/// Aggregated outcomes for one scenario's checks.
///
/// Reports carry no wall-clock data of their own, so evaluating the
/// same record twice produces equal reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioReport {
    /// Name of the scenario the checks belong to.
    pub scenario: String,
    /// Individual outcomes, in check declaration order.
    pub outcomes: Vec<CheckOutcome>,
    /// Total number of checks.
    pub total: usize,
    /// Number of passed checks.
    pub passed: usize,
    /// Number of failed checks.
    pub failed: usize,
}

impl ScenarioReport {
    /// Creates a report from outcomes, computing the counters.
    #[must_use]
    pub fn new(scenario: impl Into<String>, outcomes: Vec<CheckOutcome>) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed).count();
        let failed = total - passed;

        Self {
            scenario: scenario.into(),
            outcomes,
            total,
            passed,
            failed,
        }
    }

    /// Check if every check passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Get pass rate as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// Iterates over the failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status_check() -> Check {
        Check::new(
            "response code should be 200",
            Assertion::StatusEquals { expected: 200 },
        )
    }

    #[test]
    fn test_outcome_constructors() {
        let check = status_check();

        let outcome = CheckOutcome::pass(&check);
        assert!(outcome.passed);
        assert_eq!(outcome.label, "response code should be 200");
        assert_eq!(outcome.message, None);

        let outcome = CheckOutcome::fail_with_value(&check, "404", "expected 200, got 404");
        assert!(!outcome.passed);
        assert_eq!(outcome.actual.as_deref(), Some("404"));
        assert_eq!(outcome.message.as_deref(), Some("expected 200, got 404"));
    }

    #[test]
    fn test_report_counters() {
        let check = status_check();
        let outcomes = vec![
            CheckOutcome::pass(&check),
            CheckOutcome::fail(&check, "expected 200, got 500"),
            CheckOutcome::pass(&check),
        ];

        let report = ScenarioReport::new("GET request", outcomes);
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert!(!report.all_passed());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_empty_report_passes() {
        let report = ScenarioReport::new("no checks", vec![]);
        assert!(report.all_passed());
        assert_eq!(report.pass_rate(), 100.0);
    }

    #[test]
    fn test_pass_rate() {
        let check = status_check();
        let report = ScenarioReport::new(
            "half",
            vec![
                CheckOutcome::pass(&check),
                CheckOutcome::fail(&check, "nope"),
            ],
        );
        assert_eq!(report.pass_rate(), 50.0);
    }
}
