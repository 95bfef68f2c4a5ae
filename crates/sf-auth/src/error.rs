//! Error types for sf-auth. Messages never include session ids.

pub type Result<T> = std::result::Result<T, Error>;

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
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The session descriptor cannot be used, e.g. an empty session id.
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// None of the accepted environment variables is set; holds the
    /// preferred name.
    #[error("Environment variable not set: {0}")]
    EnvVar(String),
}
