//! Checks and their outcomes.

mod assertion;
mod outcome;

pub use assertion::Assertion;
pub use outcome::{CheckOutcome, ScenarioReport};

use serde::{Deserialize, Serialize};

/// A labeled assertion.
///
/// The label is the sentence shown in reports; the assertion is the
/// predicate that backs it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Check {
    /// Human-readable statement of what is being verified.
    pub label: String,
    /// The predicate to evaluate.
    pub assertion: Assertion,
}

impl Check {
    /// Creates a new check.
    #[must_use]
    pub fn new(label: impl Into<String>, assertion: Assertion) -> Self {
        Self {
            label: label.into(),
            assertion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_check_new() {
        let check = Check::new(
            "response code should be 404",
            Assertion::StatusEquals { expected: 404 },
        );
        assert_eq!(check.label, "response code should be 404");
        assert_eq!(check.assertion, Assertion::StatusEquals { expected: 404 });
    }
}
