//! Raw HTTP responses as seen by the bulk controller.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Status code, headers and UTF-8 body of a completed HTTP exchange.
///
/// Non-2xx statuses are not turned into errors here: the asynchronous Bulk
/// API reports failures as XML documents in the body, which callers parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    status: u16,
    headers: HashMap<String, String>,
    body: String,
}

impl RawResponse {
    /// Create a response. Header names are normalized to lowercase.
    pub fn new(status: u16, headers: HashMap<String, String>, body: impl Into<String>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Get the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns true if the response status is successful (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Response body.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Consume the response, returning the body.
    pub fn into_body(self) -> String {
        self.body
    }

    /// Body text safe to embed in error messages and logs.
    pub fn sanitized_body(&self) -> String {
        sanitize_error_message(&self.body)
    }
}

static TOKEN_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"00[A-Za-z0-9]{13,}[!][A-Za-z0-9_.]+").expect("valid token pattern")
});

static SESSION_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"sid=[A-Za-z0-9]{20,}").expect("valid session pattern")
});

/// Sanitize an error message to prevent exposing sensitive data.
///
/// Redacts anything shaped like an access token or session id and truncates
/// messages longer than 500 characters.
pub fn sanitize_error_message(message: &str) -> String {
    const MAX_LENGTH: usize = 500;

    let sanitized = TOKEN_PATTERN.replace_all(message, "[REDACTED_TOKEN]");
    let mut sanitized = SESSION_PATTERN
        .replace_all(&sanitized, "sid=[REDACTED]")
        .to_string();

    if sanitized.len() > MAX_LENGTH {
        let mut cut = MAX_LENGTH;
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str("...[truncated]");
    }

    sanitized
}
