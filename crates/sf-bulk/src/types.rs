//! Types for the asynchronous Bulk API.

use std::fmt;
use std::str::FromStr;

use busbar_sf_auth::Session;
use serde::Serialize;

use crate::error::{Error, ErrorKind, Result};

/// XML namespace of the job lifecycle documents.
pub const ASYNC_API_NAMESPACE: &str = "http://www.force.com/2009/06/asyncapi/dataload";

/// Maximum number of records a single batch may carry.
pub const MAX_BATCH_RECORDS: usize = 10_000;

/// Default number of records per chunk for PK-chunked query jobs.
pub const DEFAULT_CHUNK_SIZE: u32 = 1000;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Bulk operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Insert new records
    Insert,
    /// Update existing records
    Update,
    /// Delete records
    Delete,
    /// Query records
    Query,
}

impl Operation {
    /// Every supported operation.
    pub const ALL: [Operation; 4] = [
        Operation::Insert,
        Operation::Update,
        Operation::Delete,
        Operation::Query,
    ];

    /// Get the API string for this operation.
    pub fn api_name(&self) -> &'static str {
        match self {
            Operation::Insert => "insert",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Query => "query",
        }
    }

    /// Check if this is a query operation.
    pub fn is_query(&self) -> bool {
        matches!(self, Operation::Query)
    }
}

impl FromStr for Operation {
    type Err = Error;

    /// Parse an operation name, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.api_name() == lowered)
            .ok_or_else(|| Error::new(ErrorKind::UnsupportedOperation(s.to_string())))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_name())
    }
}

/// Lifecycle state of a batch as reported by the service.
///
/// Only `Completed` and `Failed` are terminal; states this client does not
/// know about are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchState {
    Queued,
    InProgress,
    Completed,
    Failed,
    /// Set on the original batch of a PK-chunked query.
    NotProcessed,
    Other(String),
}

impl BatchState {
    /// Map the service's state string.
    pub fn from_api(value: &str) -> Self {
        match value {
            "Queued" => BatchState::Queued,
            "InProgress" => BatchState::InProgress,
            "Completed" => BatchState::Completed,
            "Failed" => BatchState::Failed,
            "Not Processed" | "NotProcessed" => BatchState::NotProcessed,
            other => BatchState::Other(other.to_string()),
        }
    }

    /// State string as the service spells it.
    pub fn as_str(&self) -> &str {
        match self {
            BatchState::Queued => "Queued",
            BatchState::InProgress => "InProgress",
            BatchState::Completed => "Completed",
            BatchState::Failed => "Failed",
            BatchState::NotProcessed => "Not Processed",
            BatchState::Other(s) => s,
        }
    }

    /// Check if the batch will not be processed any further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::Completed | BatchState::Failed)
    }
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status record of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInfo {
    /// Batch ID, unique within the job
    pub id: String,
    /// Current state
    pub state: BatchState,
    /// Human-readable state message (empty when the service sends none)
    pub state_message: String,
    /// Records processed so far
    pub records_processed: u64,
}

/// An open (or closed) job on the service.
///
/// A job does not track its batches; the service is the source of truth
/// and is asked for them on every status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: String,
    operation: Operation,
    object: String,
    session: Session,
}

impl Job {
    pub(crate) fn new(
        id: impl Into<String>,
        operation: Operation,
        object: impl Into<String>,
        session: Session,
    ) -> Self {
        Self {
            id: id.into(),
            operation,
            object: object.into(),
            session,
        }
    }

    /// Re-attach to a job created earlier, e.g. by another process.
    pub fn resume(
        id: impl Into<String>,
        operation: Operation,
        object: impl Into<String>,
        session: Session,
    ) -> Self {
        Self::new(id, operation, object, session)
    }

    /// Job ID assigned by the service.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Operation fixed at creation.
    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Target SObject type.
    pub fn object(&self) -> &str {
        &self.object
    }

    /// Session the job was created with; used when no other is given.
    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.id, self.operation, self.object)
    }
}

// =============================================================================
// Request Types
// =============================================================================

/// Concurrency mode requested for query jobs.
const PARALLEL: &str = "Parallel";

/// Job creation document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    /// Operation type
    pub operation: String,
    /// SObject API name
    pub object: String,
    /// Concurrency mode (query jobs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concurrency_mode: Option<String>,
    /// Content type
    pub content_type: String,
}

impl CreateJobRequest {
    /// Create a new job request. Query jobs run in parallel mode.
    pub fn new(operation: Operation, object: impl Into<String>) -> Self {
        Self {
            xmlns: ASYNC_API_NAMESPACE,
            operation: operation.api_name().to_string(),
            object: object.into(),
            concurrency_mode: operation.is_query().then(|| PARALLEL.to_string()),
            content_type: "CSV".to_string(),
        }
    }

    /// Render the XML document.
    pub fn to_xml(&self) -> Result<String> {
        to_document("jobInfo", self)
    }
}

/// Job state transition document.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateJobStateRequest {
    #[serde(rename = "@xmlns")]
    xmlns: &'static str,
    /// Target state
    pub state: String,
}

impl UpdateJobStateRequest {
    /// Close the job: no more batches will be added.
    pub fn close() -> Self {
        Self {
            xmlns: ASYNC_API_NAMESPACE,
            state: "Closed".to_string(),
        }
    }

    /// Render the XML document.
    pub fn to_xml(&self) -> Result<String> {
        to_document("jobInfo", self)
    }
}

fn to_document<T: Serialize>(root: &str, value: &T) -> Result<String> {
    let body = quick_xml::se::to_string_with_root(root, value)
        .map_err(|e| Error::with_source(ErrorKind::Xml(e.to_string()), e))?;
    Ok(format!("{}\n{}", XML_DECLARATION, body))
}
