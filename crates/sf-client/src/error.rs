//! Error types for sf-client.
//!
//! A non-2xx reply is not an error at this layer; it comes back as a
//! [`RawResponse`](crate::RawResponse) so API clients can read the service's
//! exception document.

pub type Result<T> = std::result::Result<T, Error>;

/// A request that did not produce a complete response.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    pub kind: ErrorKind,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if the request never reached the service or timed out.
    pub fn is_connectivity(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout | ErrorKind::Connection(_))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be built from the configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The response body could not be read or decoded as text.
    #[error("Response body error: {0}")]
    Body(String),

    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else if err.is_body() || err.is_decode() {
            ErrorKind::Body(err.to_string())
        } else {
            ErrorKind::Request(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(ErrorKind::InvalidUrl(err.to_string()), err)
    }
}
