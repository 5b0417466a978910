//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `Transport` port using the reqwest
//! library. It handles all real HTTP communication, records the headers
//! that actually went out on the wire, and decodes response bodies by
//! their declared content type.

use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;

use reqwest::{Client, Method};
use tracing::debug;

use reverb_application::ports::{Transport, TransportError};
use reverb_domain::{HttpMethod, RequestBody, RequestSpec, ResponseBody, ResponseRecord};

/// User agent sent when the spec does not set one.
pub const USER_AGENT: &str = concat!("reverb/", env!("CARGO_PKG_VERSION"));

/// Redirect limit for a single exchange.
const MAX_REDIRECTS: usize = 10;

/// HTTP transport backed by `reqwest::Client`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a new transport with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    /// - User-Agent: "reverb/<version>"
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;

        Ok(Self { client })
    }

    /// Creates a transport over a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Applies the spec's payload to the request builder.
    ///
    /// Form fields are url-encoded here; the matching content type is
    /// set by the caller from the payload kind.
    fn apply_body(
        builder: reqwest::RequestBuilder,
        body: &RequestBody,
    ) -> Result<reqwest::RequestBuilder, TransportError> {
        match body {
            RequestBody::None => Ok(builder),
            RequestBody::Json { value } => Ok(builder.json(value)),
            RequestBody::Text { content } => Ok(builder.body(content.clone())),
            RequestBody::Form { fields } => {
                let encoded = serde_urlencoded::to_string(fields).map_err(|e| {
                    TransportError::Body(format!("failed to encode form body: {e}"))
                })?;
                Ok(builder.body(encoded))
            }
        }
    }

    /// Maps reqwest errors to `TransportError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout { timeout_ms };
        }

        let message = error.to_string();
        let lowered = message.to_lowercase();

        if error.is_connect() {
            if lowered.contains("dns") || lowered.contains("resolve") {
                return TransportError::Dns {
                    host: error_host(error),
                    message,
                };
            }
            if lowered.contains("refused") {
                return TransportError::ConnectionRefused {
                    host: error_host(error),
                    port: error.url().and_then(url::Url::port_or_known_default).unwrap_or(80),
                };
            }
            if lowered.contains("tls") || lowered.contains("certificate") {
                return TransportError::Tls(message);
            }
            return TransportError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return TransportError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        TransportError::Other(message)
    }
}

/// Host named by a reqwest error, when the URL is known.
fn error_host(error: &reqwest::Error) -> String {
    error
        .url()
        .and_then(url::Url::host_str)
        .unwrap_or("unknown")
        .to_string()
}

/// Flattens a reqwest header map into the record representation.
fn to_header_map(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
        .collect()
}

/// Snapshot of the headers a built request will put on the wire.
///
/// The client merges its default `User-Agent` at send time, so a
/// missing one is filled in here to keep the record accurate.
fn captured_request_headers(request: &reqwest::Request) -> HashMap<String, String> {
    let mut headers = to_header_map(request.headers());
    if !headers.keys().any(|k| k.eq_ignore_ascii_case("user-agent")) {
        headers.insert("user-agent".to_string(), USER_AGENT.to_string());
    }
    headers
}

/// Decodes response bytes by their declared content type.
///
/// JSON content types parse into a structured value, text-like types
/// decode lossily, and everything else stays raw bytes. A body that
/// claims JSON but does not parse falls back to text.
fn classify_body(content_type: Option<&str>, bytes: &[u8]) -> ResponseBody {
    if bytes.is_empty() {
        return ResponseBody::Empty;
    }

    let Some(mime) = content_type.and_then(|ct| ct.parse::<mime::Mime>().ok()) else {
        return match std::str::from_utf8(bytes) {
            Ok(text) => ResponseBody::text(text),
            Err(_) => ResponseBody::bytes(bytes.to_vec()),
        };
    };

    if is_json(&mime) {
        if let Ok(value) = serde_json::from_slice(bytes) {
            return ResponseBody::json(value);
        }
    }
    if is_text_like(&mime) {
        return ResponseBody::text(String::from_utf8_lossy(bytes).into_owned());
    }
    ResponseBody::bytes(bytes.to_vec())
}

fn is_json(mime: &mime::Mime) -> bool {
    (mime.type_() == mime::APPLICATION && mime.subtype() == mime::JSON)
        || mime.suffix() == Some(mime::JSON)
}

fn is_text_like(mime: &mime::Mime) -> bool {
    mime.type_() == mime::TEXT
        || mime.subtype() == mime::XML
        || mime.suffix() == Some(mime::XML)
        || is_json(mime)
}

impl Transport for ReqwestTransport {
    fn send(
        &self,
        spec: &RequestSpec,
    ) -> impl Future<Output = Result<ResponseRecord, TransportError>> + Send {
        async move {
            let url = spec.url_with_query();
            debug!(method = %spec.method, url = %url, "sending request");

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(spec.method), url)
                .timeout(spec.timeout());

            for header in &spec.headers {
                builder = builder.header(&header.name, &header.value);
            }

            // Content-Type from the payload kind, unless the spec set one.
            if let Some(content_type) = spec.body.content_type() {
                if !spec.headers.contains("content-type") {
                    builder = builder.header("Content-Type", content_type);
                }
            }

            builder = Self::apply_body(builder, &spec.body)?;

            let request = builder.build().map_err(|e| {
                if e.is_builder() {
                    TransportError::InvalidUrl(e.to_string())
                } else {
                    TransportError::Other(e.to_string())
                }
            })?;
            let request_headers = captured_request_headers(&request);

            let started = Instant::now();
            let response = self
                .client
                .execute(request)
                .await
                .map_err(|e| Self::map_error(&e, spec.timeout_ms))?;

            let status = response.status().as_u16();
            let headers = to_header_map(response.headers());

            // The timeout budget covers the body read as well.
            let bytes = response.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout {
                        timeout_ms: spec.timeout_ms,
                    }
                } else {
                    TransportError::Body(format!("failed to read body: {e}"))
                }
            })?;
            let duration = started.elapsed();

            debug!(status, duration_ms = duration.as_millis() as u64, "response received");

            let content_type = headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .map(|(_, v)| v.as_str());
            let body = classify_body(content_type, &bytes);

            Ok(ResponseRecord::new(
                status,
                duration,
                headers,
                request_headers,
                body,
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
        assert_eq!(
            ReqwestTransport::to_reqwest_method(HttpMethod::Patch),
            Method::PATCH
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestTransport::new().is_ok());
    }

    #[test]
    fn test_classify_json_body() {
        let body = classify_body(Some("application/json"), br#"{"ok": true}"#);
        assert_eq!(body, ResponseBody::json(json!({"ok": true})));
    }

    #[test]
    fn test_classify_json_suffix() {
        let body = classify_body(Some("application/problem+json"), br#"{"title": "x"}"#);
        assert_eq!(body, ResponseBody::json(json!({"title": "x"})));
    }

    #[test]
    fn test_classify_declared_json_that_does_not_parse() {
        let body = classify_body(Some("application/json"), b"not json at all");
        assert_eq!(body, ResponseBody::text("not json at all"));
    }

    #[test]
    fn test_classify_text_and_html() {
        assert_eq!(
            classify_body(Some("text/html; charset=utf-8"), b"<html></html>"),
            ResponseBody::text("<html></html>")
        );
        assert_eq!(
            classify_body(Some("application/xml"), b"<root/>"),
            ResponseBody::text("<root/>")
        );
    }

    #[test]
    fn test_classify_binary() {
        let jpeg_prefix = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(
            classify_body(Some("image/jpeg"), &jpeg_prefix),
            ResponseBody::bytes(jpeg_prefix.to_vec())
        );
    }

    #[test]
    fn test_classify_empty_and_untyped() {
        assert_eq!(classify_body(Some("application/json"), b""), ResponseBody::Empty);
        assert_eq!(classify_body(None, b"plain"), ResponseBody::text("plain"));
        assert_eq!(
            classify_body(None, &[0xFF, 0xFE, 0x00]),
            ResponseBody::bytes(vec![0xFF, 0xFE, 0x00])
        );
    }

    #[test]
    fn test_captured_request_headers_add_default_user_agent() {
        let request = Client::new()
            .get("https://httpbin.org/get")
            .header("Accept", "image/jpeg")
            .build()
            .unwrap();

        let headers = captured_request_headers(&request);
        assert_eq!(headers.get("accept").map(String::as_str), Some("image/jpeg"));
        assert_eq!(
            headers.get("user-agent").map(String::as_str),
            Some(USER_AGENT)
        );
    }

    #[test]
    fn test_captured_request_headers_keep_explicit_user_agent() {
        let firefox =
            "Mozilla/5.0 (Macintosh; Intel Mac OS X x.y; rv:42.0) Gecko/20100101 Firefox/42.0";
        let request = Client::new()
            .get("https://httpbin.org/get")
            .header("user-agent", firefox)
            .build()
            .unwrap();

        let headers = captured_request_headers(&request);
        assert_eq!(headers.get("user-agent").map(String::as_str), Some(firefox));
    }

    #[test]
    fn test_apply_body_encodes_form_pairs() {
        let fields = vec![
            ("name".to_string(), "echo chamber".to_string()),
            ("mode".to_string(), "offline".to_string()),
        ];
        let builder = Client::new().post("https://httpbin.org/post");
        let request = ReqwestTransport::apply_body(builder, &RequestBody::form(fields))
            .unwrap()
            .build()
            .unwrap();

        let body = request.body().and_then(reqwest::Body::as_bytes).unwrap();
        assert_eq!(body, b"name=echo+chamber&mode=offline");
    }
}
