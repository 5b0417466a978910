//! The httpbin contract suite.
//!
//! Scenarios covering the echo endpoints of <https://httpbin.org>:
//! status codes, response times, sent-header reflection, query and
//! JSON payload echoing, and binary content negotiation.

use serde_json::json;
use url::Url;

use reverb_domain::{Assertion, DomainError, DomainResult, RequestSpec, Scenario, Suite};

/// Base URL of the public httpbin deployment.
pub const DEFAULT_BASE_URL: &str = "https://httpbin.org";

/// Response time ceiling applied across the suite, in milliseconds.
pub const MAX_RESPONSE_TIME_MS: u64 = 1_000;

/// User agent sent by the custom user agent scenario.
const FIREFOX_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X x.y; rv:42.0) Gecko/20100101 Firefox/42.0";

fn endpoint(base: &Url, path: &str) -> DomainResult<Url> {
    base.join(path)
        .map_err(|e| DomainError::InvalidUrl(format!("'{base}' + '{path}': {e}")))
}

/// Builds the httpbin contract suite against the given base URL.
///
/// Endpoint paths are joined onto `base`, so pointing the suite at a
/// local deployment only takes a different base. Every request carries
/// the same `timeout_ms` budget; the response time ceiling the checks
/// assert is fixed at [`MAX_RESPONSE_TIME_MS`].
///
/// # Errors
///
/// Returns an error if `base` cannot absorb one of the endpoint paths
/// or a built request fails validation.
pub fn contract_suite(base: &Url, timeout_ms: u64) -> DomainResult<Suite> {
    let get = endpoint(base, "get")?;
    let post = endpoint(base, "post")?;
    let delete = endpoint(base, "delete")?;
    let image = endpoint(base, "image/jpeg")?;
    let missing = endpoint(base, "ge")?;
    let headers = endpoint(base, "headers")?;

    let suite = Suite::new("httpbin contract")
        .with_scenario(
            Scenario::new(
                "GET /get responds",
                RequestSpec::get(get.as_str())
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "DELETE /delete responds",
                RequestSpec::delete(delete.as_str())
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "POST /post responds",
                RequestSpec::post(post.as_str())
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "GET /image/jpeg negotiates a JPEG",
                RequestSpec::get(image.as_str())
                    .header("accept", "image/jpeg")
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "accept header went out as image/jpeg",
                Assertion::RequestHeaderEquals {
                    name: "accept".to_string(),
                    expected: "image/jpeg".to_string(),
                },
            )
            .with_check(
                "content type is a JPEG image",
                Assertion::ContentTypeContains {
                    expected: "image/jpeg".to_string(),
                },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "GET /ge is unknown",
                RequestSpec::get(missing.as_str())
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 404",
                Assertion::StatusEquals { expected: 404 },
            ),
        )
        .with_scenario(
            Scenario::new(
                "GET /post rejects the method",
                RequestSpec::get(post.as_str())
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 405",
                Assertion::StatusEquals { expected: 405 },
            ),
        )
        .with_scenario(
            Scenario::new(
                "GET /get echoes query arguments",
                RequestSpec::get(get.as_str())
                    .query("query", "Movie title")
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "query argument comes back decoded",
                Assertion::JsonBodyAt {
                    path: "$.args.query".to_string(),
                    expected: Some(json!("Movie title")),
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "POST /post echoes a JSON payload",
                RequestSpec::post(post.as_str())
                    .json(json!({
                        "title": "title",
                        "message": "message content",
                    }))
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "payload is parsed as JSON",
                Assertion::JsonBodyAt {
                    path: "$.json".to_string(),
                    expected: None,
                },
            )
            .with_check(
                "message field round-trips",
                Assertion::JsonBodyAt {
                    path: "$.json.message".to_string(),
                    expected: Some(json!("message content")),
                },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "GET /headers reflects the content type sent",
                RequestSpec::get(headers.as_str())
                    .header("Content-Type", "application/json;charset=utf-8")
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "content type header went out unchanged",
                Assertion::RequestHeaderEquals {
                    name: "content-type".to_string(),
                    expected: "application/json;charset=utf-8".to_string(),
                },
            )
            .with_check(
                "echo envelope shows the content type",
                Assertion::JsonBodyAt {
                    path: "$.headers.Content-Type".to_string(),
                    expected: Some(json!("application/json;charset=utf-8")),
                },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        )
        .with_scenario(
            Scenario::new(
                "GET /get carries a custom user agent",
                RequestSpec::get(get.as_str())
                    .header("user-agent", FIREFOX_AGENT)
                    .timeout_ms(timeout_ms)
                    .build()?,
            )
            .with_check(
                "response code should be 200",
                Assertion::StatusEquals { expected: 200 },
            )
            .with_check(
                "user agent went out unchanged",
                Assertion::RequestHeaderEquals {
                    name: "user-agent".to_string(),
                    expected: FIREFOX_AGENT.to_string(),
                },
            )
            .with_check(
                "response arrives within a second",
                Assertion::DurationWithin {
                    max_ms: MAX_RESPONSE_TIME_MS,
                },
            ),
        );

    Ok(suite)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reverb_domain::DEFAULT_TIMEOUT_MS;

    fn suite() -> Suite {
        let base: Url = DEFAULT_BASE_URL.parse().unwrap();
        contract_suite(&base, DEFAULT_TIMEOUT_MS).unwrap()
    }

    #[test]
    fn test_suite_shape() {
        let suite = suite();
        assert_eq!(suite.name, "httpbin contract");
        assert_eq!(suite.len(), 10);
        assert!(suite.scenarios.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn test_scenario_names_are_unique() {
        let suite = suite();
        let mut names: Vec<_> = suite.scenarios.iter().map(|s| s.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), suite.len());
    }

    #[test]
    fn test_timeout_applies_to_every_request() {
        let base: Url = DEFAULT_BASE_URL.parse().unwrap();
        let suite = contract_suite(&base, 5_000).unwrap();
        assert!(suite.scenarios.iter().all(|s| s.request.timeout_ms == 5_000));
    }

    #[test]
    fn test_base_url_is_respected() {
        let base: Url = "http://localhost:8080".parse().unwrap();
        let suite = contract_suite(&base, DEFAULT_TIMEOUT_MS).unwrap();
        assert!(
            suite
                .scenarios
                .iter()
                .all(|s| s.request.url.as_str().starts_with("http://localhost:8080/"))
        );
    }

    #[test]
    fn test_image_scenario_negotiates_content() {
        let suite = suite();
        let image = suite
            .scenarios
            .iter()
            .find(|s| s.request.url.path() == "/image/jpeg")
            .unwrap();
        assert_eq!(image.request.headers.get("accept"), Some("image/jpeg"));
        assert_eq!(image.len(), 4);
    }

    #[test]
    fn test_header_echo_scenarios_check_status_and_duration() {
        let suite = suite();
        let content_type = suite
            .scenarios
            .iter()
            .find(|s| s.request.url.path() == "/headers")
            .unwrap();
        let labels: Vec<_> = content_type
            .checks
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "response code should be 200",
                "content type header went out unchanged",
                "echo envelope shows the content type",
                "response arrives within a second",
            ]
        );

        let agent = suite
            .scenarios
            .iter()
            .find(|s| s.name == "GET /get carries a custom user agent")
            .unwrap();
        assert_eq!(agent.len(), 3);
        assert!(
            agent
                .checks
                .iter()
                .any(|c| c.label == "response arrives within a second")
        );
    }
}
