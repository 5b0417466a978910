//! Reverb harness - Main Entry Point
//!
//! Builds the httpbin contract suite, runs it over the configured
//! transport, and reports every check through tracing.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use reverb::httpbin;
use reverb_application::{ScenarioOutcome, ScenarioRunner, SuiteRun, Transport};
use reverb_domain::{DEFAULT_TIMEOUT_MS, ResponseBody, Suite};
use reverb_infrastructure::{EchoTransport, ReqwestTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Get configuration from environment
    let base: Url = std::env::var("REVERB_BASE_URL")
        .unwrap_or_else(|_| httpbin::DEFAULT_BASE_URL.to_string())
        .parse()?;
    let timeout_ms = match std::env::var("REVERB_TIMEOUT_MS") {
        Ok(raw) => raw.parse::<u64>()?,
        Err(_) => DEFAULT_TIMEOUT_MS,
    };
    let offline = std::env::var("REVERB_OFFLINE")
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let suite = httpbin::contract_suite(&base, timeout_ms)?;

    tracing::info!(
        "Starting Reverb v{} against {} ({} scenarios, offline: {})",
        env!("CARGO_PKG_VERSION"),
        base,
        suite.len(),
        offline,
    );

    let run = if offline {
        run_suite(EchoTransport::new(), &suite).await
    } else {
        run_suite(ReqwestTransport::new()?, &suite).await
    };

    report(&run);

    if run.all_passed() {
        Ok(())
    } else {
        let failed = run.failures().count();
        Err(format!("{failed} of {} scenarios failed", run.scenarios.len()).into())
    }
}

async fn run_suite<T: Transport>(transport: T, suite: &Suite) -> SuiteRun {
    ScenarioRunner::new(Arc::new(transport)).run_suite(suite).await
}

fn report(run: &SuiteRun) {
    for scenario in &run.scenarios {
        match &scenario.outcome {
            ScenarioOutcome::Completed { record, report } => {
                tracing::debug!(
                    scenario = %scenario.scenario,
                    status = record.status,
                    duration_ms = record.duration_ms(),
                    body = %body_preview(&record.body),
                    "response"
                );
                for outcome in &report.outcomes {
                    if outcome.passed {
                        tracing::info!(
                            scenario = %scenario.scenario,
                            check = %outcome.label,
                            "passed"
                        );
                    } else {
                        tracing::error!(
                            scenario = %scenario.scenario,
                            check = %outcome.label,
                            detail = outcome.message.as_deref().unwrap_or("assertion failed"),
                            "failed"
                        );
                    }
                }
            }
            ScenarioOutcome::Failed { error, .. } => {
                tracing::error!(scenario = %scenario.scenario, %error, "execution failed");
            }
        }
    }

    tracing::info!(
        "Suite '{}' finished: {}/{} checks passed",
        run.suite,
        run.passed_checks(),
        run.total_checks(),
    );
}

/// Renders the response payload for debug logging, truncated.
fn body_preview(body: &ResponseBody) -> String {
    const MAX: usize = 200;
    let text = body.to_text_lossy();
    if text.chars().count() <= MAX {
        text
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_body_preview_renders_json_compact() {
        let body = ResponseBody::json(json!({"args": {"q": "x"}}));
        assert_eq!(body_preview(&body), r#"{"args":{"q":"x"}}"#);
    }

    #[test]
    fn test_body_preview_truncates_long_payloads() {
        let body = ResponseBody::text("x".repeat(500));
        let preview = body_preview(&body);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }
}
