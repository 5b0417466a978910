//! Check evaluation engine
//!
//! Evaluates a scenario's checks against a completed response record.
//! Evaluation is pure: it reads the record, never re-runs the request,
//! and always walks every check in declaration order. A check that
//! cannot be evaluated (bad regex, non-JSON body) becomes a failed
//! outcome rather than an error.

use regex::Regex;

use reverb_domain::{Assertion, Check, CheckOutcome, ResponseRecord, Scenario, ScenarioReport};

/// Evaluates checks against response records.
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckRunner;

impl CheckRunner {
    /// Creates a new check runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs every check of the scenario against the record.
    ///
    /// Outcomes come back in check declaration order, one per check,
    /// and a failure never stops the remaining checks from running.
    #[must_use]
    pub fn run(&self, scenario: &Scenario, record: &ResponseRecord) -> ScenarioReport {
        let outcomes = scenario
            .checks
            .iter()
            .map(|check| self.run_check(check, record))
            .collect();
        ScenarioReport::new(scenario.name.clone(), outcomes)
    }

    /// Runs a single check against the record.
    #[must_use]
    pub fn run_check(&self, check: &Check, record: &ResponseRecord) -> CheckOutcome {
        match &check.assertion {
            Assertion::StatusEquals { expected } => check_status_equals(check, record, *expected),
            Assertion::StatusInRange { min, max } => {
                check_status_in_range(check, record, *min, *max)
            }
            Assertion::DurationWithin { max_ms } => check_duration_within(check, record, *max_ms),
            Assertion::HeaderExists { name, expected } => {
                check_header_exists(check, record, name, expected.as_deref())
            }
            Assertion::HeaderMatches { name, pattern } => {
                check_header_matches(check, record, name, pattern)
            }
            Assertion::RequestHeaderEquals { name, expected } => {
                check_request_header_equals(check, record, name, expected)
            }
            Assertion::ContentTypeContains { expected } => {
                check_content_type_contains(check, record, expected)
            }
            Assertion::BodyContains { text, ignore_case } => {
                check_body_contains(check, record, text, *ignore_case)
            }
            Assertion::BodyMatches { pattern } => check_body_matches(check, record, pattern),
            Assertion::JsonBodyAt { path, expected } => {
                check_json_body_at(check, record, path, expected.as_ref())
            }
        }
    }
}

fn check_status_equals(check: &Check, record: &ResponseRecord, expected: u16) -> CheckOutcome {
    let actual = record.status;
    if actual == expected {
        CheckOutcome::pass_with_value(check, actual.to_string())
    } else {
        CheckOutcome::fail_with_value(
            check,
            actual.to_string(),
            format!("expected status {expected}, got {actual}"),
        )
    }
}

fn check_status_in_range(
    check: &Check,
    record: &ResponseRecord,
    min: u16,
    max: u16,
) -> CheckOutcome {
    let actual = record.status;
    if actual >= min && actual <= max {
        CheckOutcome::pass_with_value(check, actual.to_string())
    } else {
        CheckOutcome::fail_with_value(
            check,
            actual.to_string(),
            format!("expected status in {min}-{max}, got {actual}"),
        )
    }
}

fn check_duration_within(check: &Check, record: &ResponseRecord, max_ms: u64) -> CheckOutcome {
    let actual_ms = record.duration_ms();
    if actual_ms <= max_ms {
        CheckOutcome::pass_with_value(check, format!("{actual_ms}ms"))
    } else {
        CheckOutcome::fail_with_value(
            check,
            format!("{actual_ms}ms"),
            format!("response took {actual_ms}ms, expected <= {max_ms}ms"),
        )
    }
}

fn check_header_exists(
    check: &Check,
    record: &ResponseRecord,
    name: &str,
    expected: Option<&str>,
) -> CheckOutcome {
    match record.header(name) {
        Some(actual) => match expected {
            Some(expected) if actual != expected => CheckOutcome::fail_with_value(
                check,
                actual,
                format!("header '{name}' is '{actual}', expected '{expected}'"),
            ),
            _ => CheckOutcome::pass_with_value(check, actual),
        },
        None => CheckOutcome::fail(check, format!("header '{name}' not found")),
    }
}

fn check_header_matches(
    check: &Check,
    record: &ResponseRecord,
    name: &str,
    pattern: &str,
) -> CheckOutcome {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            return CheckOutcome::fail(check, format!("invalid regex pattern '{pattern}': {e}"));
        }
    };
    match record.header(name) {
        Some(actual) if regex.is_match(actual) => CheckOutcome::pass_with_value(check, actual),
        Some(actual) => CheckOutcome::fail_with_value(
            check,
            actual,
            format!("header '{name}' value '{actual}' does not match /{pattern}/"),
        ),
        None => CheckOutcome::fail(check, format!("header '{name}' not found")),
    }
}

fn check_request_header_equals(
    check: &Check,
    record: &ResponseRecord,
    name: &str,
    expected: &str,
) -> CheckOutcome {
    match record.request_header(name) {
        Some(actual) if actual == expected => CheckOutcome::pass_with_value(check, actual),
        Some(actual) => CheckOutcome::fail_with_value(
            check,
            actual,
            format!("sent header '{name}' is '{actual}', expected '{expected}'"),
        ),
        None => CheckOutcome::fail(check, format!("header '{name}' was not sent")),
    }
}

fn check_content_type_contains(
    check: &Check,
    record: &ResponseRecord,
    expected: &str,
) -> CheckOutcome {
    match record.content_type() {
        Some(actual) if actual.contains(expected) => CheckOutcome::pass_with_value(check, actual),
        Some(actual) => CheckOutcome::fail_with_value(
            check,
            actual,
            format!("Content-Type '{actual}' does not contain '{expected}'"),
        ),
        None => CheckOutcome::fail(check, "no Content-Type header present"),
    }
}

fn check_body_contains(
    check: &Check,
    record: &ResponseRecord,
    text: &str,
    ignore_case: bool,
) -> CheckOutcome {
    let body = record.body.to_text_lossy();
    let contains = if ignore_case {
        body.to_lowercase().contains(&text.to_lowercase())
    } else {
        body.contains(text)
    };

    if contains {
        CheckOutcome::pass(check)
    } else {
        CheckOutcome::fail_with_value(
            check,
            preview(&body),
            format!("body does not contain '{text}'"),
        )
    }
}

fn check_body_matches(check: &Check, record: &ResponseRecord, pattern: &str) -> CheckOutcome {
    let regex = match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            return CheckOutcome::fail(check, format!("invalid regex pattern '{pattern}': {e}"));
        }
    };
    let body = record.body.to_text_lossy();
    if regex.is_match(&body) {
        CheckOutcome::pass(check)
    } else {
        CheckOutcome::fail_with_value(
            check,
            preview(&body),
            format!("body does not match /{pattern}/"),
        )
    }
}

fn check_json_body_at(
    check: &Check,
    record: &ResponseRecord,
    path: &str,
    expected: Option<&serde_json::Value>,
) -> CheckOutcome {
    let parsed;
    let json = match record.body.as_json() {
        Some(value) => value,
        // Tolerate JSON served under a non-JSON content type.
        None => match serde_json::from_str::<serde_json::Value>(&record.body.to_text_lossy()) {
            Ok(value) => {
                parsed = value;
                &parsed
            }
            Err(e) => return CheckOutcome::fail(check, format!("body is not JSON: {e}")),
        },
    };

    match lookup_json_path(json, path) {
        Ok(Some(value)) => match expected {
            Some(expected) if value != expected => CheckOutcome::fail_with_value(
                check,
                value.to_string(),
                format!("JSON path '{path}' is {value}, expected {expected}"),
            ),
            _ => CheckOutcome::pass_with_value(check, value.to_string()),
        },
        Ok(None) => CheckOutcome::fail(check, format!("JSON path '{path}' not found")),
        Err(e) => CheckOutcome::fail(check, format!("invalid JSON path '{path}': {e}")),
    }
}

/// Truncates long body text for failure messages.
fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 100;
    if text.chars().count() > MAX_CHARS {
        let cut: String = text.chars().take(MAX_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Resolves a dotted path expression against a JSON value.
///
/// Supports `$`, `$.field`, `$.field.nested`, and array indexing such
/// as `$.items[0].id`. Returns `Ok(None)` when the path walks off the
/// document, and `Err` when the expression itself is malformed.
fn lookup_json_path<'a>(
    root: &'a serde_json::Value,
    path: &str,
) -> Result<Option<&'a serde_json::Value>, String> {
    let Some(rest) = path.trim().strip_prefix('$') else {
        return Err("path must start with '$'".to_string());
    };
    if rest.is_empty() {
        return Ok(Some(root));
    }
    let rest = rest.strip_prefix('.').unwrap_or(rest);

    let mut current = root;
    for segment in rest.split('.') {
        if segment.is_empty() {
            return Err("empty path segment".to_string());
        }
        let (name, indices) = parse_segment(segment)?;
        if !name.is_empty() {
            match current.get(name) {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
        for index in indices {
            match current.get(index) {
                Some(value) => current = value,
                None => return Ok(None),
            }
        }
    }
    Ok(Some(current))
}

/// Splits a segment like `items[0][1]` into its name and indices.
fn parse_segment(segment: &str) -> Result<(&str, Vec<usize>), String> {
    let Some(start) = segment.find('[') else {
        return Ok((segment, Vec::new()));
    };

    let name = &segment[..start];
    let mut indices = Vec::new();
    let mut rest = &segment[start..];
    while let Some(stripped) = rest.strip_prefix('[') {
        let Some(end) = stripped.find(']') else {
            return Err(format!("unclosed '[' in segment '{segment}'"));
        };
        let index = stripped[..end]
            .parse::<usize>()
            .map_err(|_| format!("invalid array index '{}'", &stripped[..end]))?;
        indices.push(index);
        rest = &stripped[end + 1..];
    }
    if !rest.is_empty() {
        return Err(format!("unexpected characters after ']' in segment '{segment}'"));
    }
    Ok((name, indices))
}
