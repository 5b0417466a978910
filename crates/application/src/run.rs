//! Scenario and suite orchestration
//!
//! Drives a suite end to end: execute each scenario's request, hand the
//! record to the check runner, and collect timestamped results. Suites
//! run their scenarios strictly in order, one request in flight at a
//! time.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reverb_domain::{ResponseRecord, Scenario, ScenarioReport, Suite};

use crate::evaluate::CheckRunner;
use crate::execute::ExecuteRequest;
use crate::ports::Transport;

/// How a scenario's execution ended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScenarioOutcome {
    /// The exchange completed and the checks were evaluated.
    Completed {
        /// The observed response.
        record: Box<ResponseRecord>,
        /// Outcomes of the scenario's checks.
        report: ScenarioReport,
    },
    /// Execution failed before checks could run.
    Failed {
        /// Description of the failure.
        error: String,
        /// The response observed before failing, when one exists.
        /// Fail-fast rejections keep their record; transport errors
        /// have none.
        record: Option<Box<ResponseRecord>>,
    },
}

/// The timestamped result of running one scenario.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioRun {
    /// Name of the scenario.
    pub scenario: String,
    /// When execution started.
    pub executed_at: DateTime<Utc>,
    /// How it ended.
    pub outcome: ScenarioOutcome,
}

impl ScenarioRun {
    /// Returns true if execution completed and every check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        match &self.outcome {
            ScenarioOutcome::Completed { report, .. } => report.all_passed(),
            ScenarioOutcome::Failed { .. } => false,
        }
    }

    /// Returns the check report, when execution completed.
    #[must_use]
    pub const fn report(&self) -> Option<&ScenarioReport> {
        match &self.outcome {
            ScenarioOutcome::Completed { report, .. } => Some(report),
            ScenarioOutcome::Failed { .. } => None,
        }
    }
}

/// The result of running a whole suite.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuiteRun {
    /// Name of the suite.
    pub suite: String,
    /// When the suite started.
    pub started_at: DateTime<Utc>,
    /// Per-scenario results, in suite order.
    pub scenarios: Vec<ScenarioRun>,
}

impl SuiteRun {
    /// Creates a suite run result.
    #[must_use]
    pub fn new(
        suite: impl Into<String>,
        started_at: DateTime<Utc>,
        scenarios: Vec<ScenarioRun>,
    ) -> Self {
        Self {
            suite: suite.into(),
            started_at,
            scenarios,
        }
    }

    /// Returns true if every scenario completed with all checks passing.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.scenarios.iter().all(ScenarioRun::passed)
    }

    /// Total number of checks evaluated across all scenarios.
    #[must_use]
    pub fn total_checks(&self) -> usize {
        self.scenarios
            .iter()
            .filter_map(ScenarioRun::report)
            .map(|r| r.total)
            .sum()
    }

    /// Number of checks that passed across all scenarios.
    #[must_use]
    pub fn passed_checks(&self) -> usize {
        self.scenarios
            .iter()
            .filter_map(ScenarioRun::report)
            .map(|r| r.passed)
            .sum()
    }

    /// Number of checks that failed across all scenarios.
    #[must_use]
    pub fn failed_checks(&self) -> usize {
        self.scenarios
            .iter()
            .filter_map(ScenarioRun::report)
            .map(|r| r.failed)
            .sum()
    }

    /// Iterates over scenarios that did not fully pass.
    pub fn failures(&self) -> impl Iterator<Item = &ScenarioRun> {
        self.scenarios.iter().filter(|run| !run.passed())
    }
}

/// Runs scenarios: execution followed by evaluation.
pub struct ScenarioRunner<T: Transport> {
    executor: ExecuteRequest<T>,
    checker: CheckRunner,
}

impl<T: Transport> ScenarioRunner<T> {
    /// Creates a runner over the given transport.
    pub const fn new(transport: Arc<T>) -> Self {
        Self {
            executor: ExecuteRequest::new(transport),
            checker: CheckRunner::new(),
        }
    }

    /// Runs one scenario: execute the request, then evaluate its checks.
    ///
    /// Execution failures do not panic and do not abort the caller's
    /// loop; they come back as a [`ScenarioOutcome::Failed`].
    pub async fn run_scenario(&self, scenario: &Scenario) -> ScenarioRun {
        let executed_at = Utc::now();

        let outcome = match self.executor.execute(&scenario.request).await {
            Ok(record) => {
                let report = self.checker.run(scenario, &record);
                ScenarioOutcome::Completed {
                    record: Box::new(record),
                    report,
                }
            }
            Err(error) => ScenarioOutcome::Failed {
                record: error.failed_record().cloned().map(Box::new),
                error: error.to_string(),
            },
        };

        ScenarioRun {
            scenario: scenario.name.clone(),
            executed_at,
            outcome,
        }
    }

    /// Runs every scenario of the suite, in order.
    pub async fn run_suite(&self, suite: &Suite) -> SuiteRun {
        let started_at = Utc::now();
        let mut runs = Vec::with_capacity(suite.scenarios.len());

        for scenario in &suite.scenarios {
            runs.push(self.run_scenario(scenario).await);
        }

        SuiteRun::new(suite.name.clone(), started_at, runs)
    }
}
