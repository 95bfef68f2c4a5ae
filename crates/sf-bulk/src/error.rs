//! Error types for sf-bulk.

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

    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Operation '{0}' not supported; choose one of: insert, update, delete, query")]
    UnsupportedOperation(String),
    #[error("Batch has {records} records but at most {max} are allowed; split the data into multiple batches")]
    BatchTooLarge { records: usize, max: usize },
    #[error("Invalid batch input: {0}")]
    InvalidBatchInput(String),
    #[error("Job creation failed: {0}")]
    JobCreationFailed(String),
    #[error("Job creation failed with status {status} and no exception message")]
    UnknownCreationFailure { status: u16 },
    #[error("Batch submission failed: {0}")]
    BatchSubmissionFailed(String),
    #[error("Job close failed: {0}")]
    JobCloseFailed(String),
    #[error("Malformed batch status: {0}")]
    MalformedStatus(String),
    #[error("Result decoding error: {0}")]
    ResultDecoding(String),
    /// Nothing to fetch: the job has no batches, or a query's submission
    /// batch finished without producing any chunk batches.
    #[error("No result batches: {0}")]
    NoResultBatches(String),
    #[error("Session has no instance identifier and no base URL is configured")]
    MissingInstance,
    #[error("API error: {0}")]
    Api(String),
    #[error("Client error: {0}")]
    Client(String),
    #[error("Auth error: {0}")]
    Auth(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("XML error: {0}")]
    Xml(String),
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        Error { kind: ErrorKind::Client(err.to_string()), source: Some(Box::new(err)) }
    }
}

impl From<busbar_sf_auth::Error> for Error {
    fn from(err: busbar_sf_auth::Error) -> Self {
        Error { kind: ErrorKind::Auth(err.to_string()), source: Some(Box::new(err)) }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error { kind: ErrorKind::Csv(err.to_string()), source: Some(Box::new(err)) }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error { kind: ErrorKind::Io(err.to_string()), source: Some(Box::new(err)) }
    }
}
