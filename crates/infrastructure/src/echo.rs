//! In-process echo transport modeled on httpbin.
//!
//! `EchoTransport` answers the same routes the public httpbin service
//! exposes, without touching the network. A suite exercised against it
//! sees the same envelopes it would get from `https://httpbin.org`,
//! which keeps scenario tests hermetic and fast.

use std::collections::HashMap;
use std::future::{self, Future};
use std::time::Duration;

use serde_json::map::Entry;
use serde_json::{Map, Value, json};
use url::Url;

use reverb_application::ports::{Transport, TransportError};
use reverb_domain::{HttpMethod, RequestBody, RequestSpec, ResponseBody, ResponseRecord};

use crate::adapters::USER_AGENT;

/// Origin address reported in echo envelopes.
const ORIGIN: &str = "127.0.0.1";

/// Simulated latency reported when none is configured.
const DEFAULT_LATENCY: Duration = Duration::from_millis(5);

/// Minimal JFIF payload served by `/image/jpeg`.
const JPEG_BYTES: &[u8] = &[
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0x00, 0x00, 0xFF, 0xD9,
];

const JSON_TYPE: &str = "application/json";
const HTML_TYPE: &str = "text/html; charset=utf-8";

/// Transport that serves httpbin-style responses from memory.
///
/// Latency is reported on the record rather than slept, so tests stay
/// instant while duration assertions still see a realistic value. A
/// configured latency above the spec's timeout produces the same
/// timeout error a slow server would.
#[derive(Debug, Clone)]
pub struct EchoTransport {
    latency: Duration,
}

impl Default for EchoTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoTransport {
    /// Creates an echo transport with the default reported latency.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }

    /// Sets the latency reported on every response.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    fn respond(&self, spec: &RequestSpec) -> Result<ResponseRecord, TransportError> {
        let latency_ms = u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX);
        if latency_ms > spec.timeout_ms {
            return Err(TransportError::Timeout {
                timeout_ms: spec.timeout_ms,
            });
        }

        let url = spec.url_with_query();
        let request_headers = effective_request_headers(spec);

        let (status, content_type, body) = match (url.path(), spec.method) {
            ("/get", HttpMethod::Get) => {
                (200, JSON_TYPE, query_envelope(&url, &request_headers))
            }
            ("/post", HttpMethod::Post)
            | ("/put", HttpMethod::Put)
            | ("/patch", HttpMethod::Patch)
            | ("/delete", HttpMethod::Delete) => {
                (200, JSON_TYPE, body_envelope(spec, &url, &request_headers))
            }
            ("/headers", HttpMethod::Get) => {
                (200, JSON_TYPE, headers_envelope(&url, &request_headers))
            }
            ("/image/jpeg", HttpMethod::Get) => {
                (200, "image/jpeg", ResponseBody::bytes(JPEG_BYTES.to_vec()))
            }
            ("/get" | "/post" | "/put" | "/patch" | "/delete" | "/headers" | "/image/jpeg", _) => {
                (405, HTML_TYPE, html_error(405))
            }
            _ => (404, HTML_TYPE, html_error(404)),
        };

        let headers = response_headers(content_type, body_length(&body));
        Ok(ResponseRecord::new(
            status,
            self.latency,
            headers,
            request_headers.into_iter().collect(),
            body,
        ))
    }
}

impl Transport for EchoTransport {
    fn send(
        &self,
        spec: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseRecord, TransportError>> + Send {
        future::ready(self.respond(spec))
    }
}

/// Headers the exchange would put on the wire, with lowercase names.
///
/// Adds the payload's `Content-Type` and the default `User-Agent` when
/// the spec does not set them, mirroring the reqwest adapter.
fn effective_request_headers(spec: &RequestSpec) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = spec
        .headers
        .iter()
        .map(|h| (h.name.to_lowercase(), h.value.clone()))
        .collect();

    if let Some(content_type) = spec.body.content_type() {
        if !headers.iter().any(|(name, _)| name == "content-type") {
            headers.push(("content-type".to_string(), content_type.to_string()));
        }
    }
    if !headers.iter().any(|(name, _)| name == "user-agent") {
        headers.push(("user-agent".to_string(), USER_AGENT.to_string()));
    }
    headers
}

/// Envelope for `/get`: query arguments, headers, origin and URL.
fn query_envelope(url: &Url, request_headers: &[(String, String)]) -> ResponseBody {
    ResponseBody::json(json!({
        "args": args_map(url),
        "headers": echoed_headers(url, request_headers),
        "origin": ORIGIN,
        "url": url.to_string(),
    }))
}

/// Envelope for the body-carrying routes, with data, form and json fields.
fn body_envelope(
    spec: &RequestSpec,
    url: &Url,
    request_headers: &[(String, String)],
) -> ResponseBody {
    let (data, form, json_field) = match &spec.body {
        RequestBody::None => (String::new(), Map::new(), Value::Null),
        RequestBody::Json { value } => (value.to_string(), Map::new(), value.clone()),
        RequestBody::Text { content } => (content.clone(), Map::new(), Value::Null),
        RequestBody::Form { fields } => {
            let mut form = Map::new();
            for (key, value) in fields {
                form.insert(key.clone(), Value::String(value.clone()));
            }
            (String::new(), form, Value::Null)
        }
    };

    ResponseBody::json(json!({
        "args": args_map(url),
        "data": data,
        "files": {},
        "form": form,
        "headers": echoed_headers(url, request_headers),
        "json": json_field,
        "origin": ORIGIN,
        "url": url.to_string(),
    }))
}

fn headers_envelope(url: &Url, request_headers: &[(String, String)]) -> ResponseBody {
    ResponseBody::json(json!({
        "headers": echoed_headers(url, request_headers),
    }))
}

/// Query arguments as httpbin reports them. A repeated key collapses
/// into an array of its values.
fn args_map(url: &Url) -> Value {
    let mut args = Map::new();
    for (key, value) in url.query_pairs() {
        let value = Value::String(value.into_owned());
        match args.entry(key.into_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(items) => items.push(value),
                existing => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
            },
        }
    }
    Value::Object(args)
}

/// Header map as the echo envelope shows it: Title-Case names plus the
/// `Host` derived from the URL.
fn echoed_headers(url: &Url, request_headers: &[(String, String)]) -> Value {
    let mut headers = Map::new();
    headers.insert(
        "Host".to_string(),
        Value::String(url.host_str().unwrap_or("unknown").to_string()),
    );
    for (name, value) in request_headers {
        headers.insert(title_case(name), Value::String(value.clone()));
    }
    Value::Object(headers)
}

/// Rewrites a lowercase header name into Title-Case, so "user-agent"
/// becomes "User-Agent".
fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_ascii_uppercase().to_string() + chars.as_str()
            })
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn response_headers(content_type: &str, body_len: usize) -> HashMap<String, String> {
    HashMap::from([
        ("content-type".to_string(), content_type.to_string()),
        ("content-length".to_string(), body_len.to_string()),
        ("server".to_string(), "gunicorn/19.9.0".to_string()),
        ("access-control-allow-origin".to_string(), "*".to_string()),
        ("access-control-allow-credentials".to_string(), "true".to_string()),
    ])
}

fn body_length(body: &ResponseBody) -> usize {
    match body {
        ResponseBody::Empty => 0,
        ResponseBody::Json { value } => value.to_string().len(),
        ResponseBody::Text { text } => text.len(),
        ResponseBody::Bytes { data } => data.len(),
    }
}

fn html_error(status: u16) -> ResponseBody {
    let (title, heading, message) = match status {
        404 => (
            "404 Not Found",
            "Not Found",
            "The requested URL was not found on the server. If you entered the URL manually please check your spelling and try again.",
        ),
        _ => (
            "405 Method Not Allowed",
            "Method Not Allowed",
            "The method is not allowed for the requested URL.",
        ),
    };
    ResponseBody::text(format!(
        "<!DOCTYPE HTML PUBLIC \"-//W3C//DTD HTML 3.2 Final//EN\">\n<title>{title}</title>\n<h1>{heading}</h1>\n<p>{message}</p>\n"
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reverb_domain::RequestSpec;
    use serde_json::json;

    fn respond(spec: &RequestSpec) -> ResponseRecord {
        EchoTransport::new().respond(spec).unwrap()
    }

    #[test]
    fn test_get_echoes_query_arguments() {
        let spec = RequestSpec::get("https://httpbin.org/get")
            .query("query", "Movie title")
            .build()
            .unwrap();

        let record = respond(&spec);
        assert_eq!(record.status, 200);
        assert_eq!(record.content_type(), Some("application/json"));

        let envelope = record.body.as_json().unwrap();
        assert_eq!(
            envelope.pointer("/args/query"),
            Some(&json!("Movie title"))
        );
        assert_eq!(
            envelope.pointer("/headers/Host"),
            Some(&json!("httpbin.org"))
        );
        assert_eq!(envelope.pointer("/origin"), Some(&json!("127.0.0.1")));
    }

    #[test]
    fn test_repeated_query_key_becomes_array() {
        let spec = RequestSpec::get("https://httpbin.org/get")
            .query("tag", "one")
            .query("tag", "two")
            .build()
            .unwrap();

        let envelope = respond(&spec).body.as_json().cloned().unwrap();
        assert_eq!(envelope.pointer("/args/tag"), Some(&json!(["one", "two"])));
    }

    #[test]
    fn test_post_echoes_json_payload() {
        let payload = json!({"title": "title", "message": "message content"});
        let spec = RequestSpec::post("https://httpbin.org/post")
            .json(payload.clone())
            .build()
            .unwrap();

        let record = respond(&spec);
        assert_eq!(record.status, 200);

        let envelope = record.body.as_json().unwrap();
        assert_eq!(envelope.pointer("/json"), Some(&payload));
        assert_eq!(
            envelope.pointer("/headers/Content-Type"),
            Some(&json!("application/json"))
        );
        assert_eq!(
            record.request_header("content-type"),
            Some("application/json")
        );
    }

    #[test]
    fn test_form_payload_lands_in_form_field() {
        let spec = RequestSpec::post("https://httpbin.org/post")
            .body(RequestBody::form(vec![(
                "name".to_string(),
                "reverb".to_string(),
            )]))
            .build()
            .unwrap();

        let envelope = respond(&spec).body.as_json().cloned().unwrap();
        assert_eq!(envelope.pointer("/form/name"), Some(&json!("reverb")));
        assert_eq!(envelope.pointer("/json"), Some(&Value::Null));
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        let spec = RequestSpec::get("https://httpbin.org/ge").build().unwrap();

        let record = respond(&spec);
        assert_eq!(record.status, 404);
        assert_eq!(record.content_type(), Some("text/html; charset=utf-8"));
        let text = record.body.as_text().unwrap();
        assert!(text.contains("404 Not Found"));
    }

    #[test]
    fn test_method_mismatch_is_not_allowed() {
        let spec = RequestSpec::get("https://httpbin.org/post").build().unwrap();

        let record = respond(&spec);
        assert_eq!(record.status, 405);
        assert!(record.body.as_text().unwrap().contains("Method Not Allowed"));
    }

    #[test]
    fn test_image_route_serves_jpeg_bytes() {
        let spec = RequestSpec::get("https://httpbin.org/image/jpeg")
            .header("accept", "image/jpeg")
            .build()
            .unwrap();

        let record = respond(&spec);
        assert_eq!(record.content_type(), Some("image/jpeg"));
        let data = record.body.as_bytes().unwrap();
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
        assert_eq!(record.request_header("accept"), Some("image/jpeg"));
    }

    #[test]
    fn test_headers_route_returns_only_headers() {
        let spec = RequestSpec::get("https://httpbin.org/headers")
            .header("Content-Type", "application/json;charset=utf-8")
            .build()
            .unwrap();

        let envelope = respond(&spec).body.as_json().cloned().unwrap();
        let object = envelope.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(
            envelope.pointer("/headers/Content-Type"),
            Some(&json!("application/json;charset=utf-8"))
        );
    }

    #[test]
    fn test_default_user_agent_is_reported() {
        let spec = RequestSpec::get("https://httpbin.org/get").build().unwrap();

        let record = respond(&spec);
        assert_eq!(record.request_header("user-agent"), Some(USER_AGENT));
    }

    #[test]
    fn test_latency_above_timeout_times_out() {
        let transport = EchoTransport::new().with_latency(Duration::from_millis(50));
        let spec = RequestSpec::get("https://httpbin.org/get")
            .timeout_ms(10)
            .build()
            .unwrap();

        let result = transport.respond(&spec);
        assert_eq!(
            result,
            Err(TransportError::Timeout { timeout_ms: 10 })
        );
    }

    #[test]
    fn test_latency_equal_to_timeout_succeeds() {
        let transport = EchoTransport::new().with_latency(Duration::from_millis(10));
        let spec = RequestSpec::get("https://httpbin.org/get")
            .timeout_ms(10)
            .build()
            .unwrap();

        let record = transport.respond(&spec).unwrap();
        assert_eq!(record.duration_ms(), 10);
    }

    #[tokio::test]
    async fn test_send_resolves_the_routed_response() {
        let transport = EchoTransport::new();
        let spec = RequestSpec::get("https://httpbin.org/get")
            .query("q", "async")
            .build()
            .unwrap();

        let record = transport.send(&spec).await.unwrap();
        assert_eq!(record.status, 200);
        let envelope = record.body.as_json().unwrap();
        assert_eq!(envelope.pointer("/args/q"), Some(&json!("async")));
    }
}
