//! HTTP request building with Salesforce-specific headers.

use std::collections::HashMap;

/// Session header used by the asynchronous (XML/CSV) Bulk API.
pub const SESSION_HEADER: &str = "X-SFDC-Session";

/// Header asking the service to split a query into primary-key chunks.
pub const PK_CHUNKING_HEADER: &str = "Sforce-Enable-PKChunking";

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
        }
    }

    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
        }
    }
}

/// Builder for HTTP requests with Salesforce-specific options.
///
/// Header values are kept out of the `Debug` output since one of them is
/// normally the session credential.
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) body: Option<String>,
}

impl std::fmt::Debug for RequestBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RequestBuilder")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &names)
            .field("body_len", &self.body.as_ref().map(String::len))
            .finish()
    }
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Request method.
    pub fn method(&self) -> RequestMethod {
        self.method
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Look up a header value by exact name.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Request body, if one was set.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Authenticate with a session id via the `X-SFDC-Session` header.
    pub fn sfdc_session(self, session_id: impl Into<String>) -> Self {
        self.header(SESSION_HEADER, session_id)
    }

    /// Set the `Sforce-Enable-PKChunking` header for query jobs.
    pub fn pk_chunking(self, chunk_size: u32) -> Self {
        self.header(PK_CHUNKING_HEADER, format!("chunkSize={}", chunk_size))
    }

    /// Set CSV body (batch data and query statements).
    pub fn csv(mut self, data: impl Into<String>) -> Self {
        self.body = Some(data.into());
        self.headers
            .insert("Content-Type".to_string(), "text/csv; charset=UTF-8".to_string());
        self
    }

    /// Set XML body (job lifecycle documents).
    pub fn xml(mut self, data: impl Into<String>) -> Self {
        self.body = Some(data.into());
        self.headers.insert(
            "Content-Type".to_string(),
            "application/xml; charset=UTF-8".to_string(),
        );
        self
    }
}
