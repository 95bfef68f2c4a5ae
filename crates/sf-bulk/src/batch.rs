//! Batch inputs and the checks they pass before anything is sent.

use std::path::{Path, PathBuf};

use crate::dataset::{Dataset, TabularCodec};
use crate::error::{Error, ErrorKind, Result};
use crate::types::{Operation, MAX_BATCH_RECORDS};

const ACCEPTED_INPUTS: &str =
    "provide a Dataset, the path to a .csv file, or a SOQL statement for a query job";

/// Data for one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchInput {
    /// Rows to encode as CSV.
    Dataset(Dataset),
    /// A CSV file on disk, header row first.
    CsvFile(PathBuf),
    /// A SOQL statement; only valid for query jobs.
    Query(String),
}

impl BatchInput {
    /// Resolve a string by inspection: an existing `.csv` file becomes
    /// [`BatchInput::CsvFile`], anything else [`BatchInput::Query`].
    pub fn infer(text: impl Into<String>) -> Self {
        let text = text.into();
        let path = Path::new(&text);
        if path.is_file() && has_csv_extension(path) {
            BatchInput::CsvFile(PathBuf::from(text))
        } else {
            BatchInput::Query(text)
        }
    }
}

impl From<Dataset> for BatchInput {
    fn from(dataset: Dataset) -> Self {
        BatchInput::Dataset(dataset)
    }
}

/// A batch body ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBatch {
    /// Request body.
    pub payload: String,
    /// Data records in the payload; `None` for query statements.
    pub record_count: Option<usize>,
}

/// Check a batch against the job's operation and turn it into a payload.
///
/// Runs entirely locally: an oversized or misplaced input never reaches the
/// service.
pub fn validate_batch<C: TabularCodec + ?Sized>(
    input: &BatchInput,
    operation: Operation,
    codec: &C,
) -> Result<ValidatedBatch> {
    match input {
        BatchInput::Dataset(dataset) => {
            check_size(dataset.len())?;
            Ok(ValidatedBatch {
                payload: codec.encode(dataset)?,
                record_count: Some(dataset.len()),
            })
        }
        BatchInput::CsvFile(path) => {
            if !has_csv_extension(path) || !path.is_file() {
                return Err(Error::new(ErrorKind::InvalidBatchInput(format!(
                    "{} is not a .csv file; {}",
                    path.display(),
                    ACCEPTED_INPUTS
                ))));
            }
            let payload = std::fs::read_to_string(path)?;
            let records = payload.split('\n').count().saturating_sub(1);
            check_size(records)?;
            Ok(ValidatedBatch {
                payload,
                record_count: Some(records),
            })
        }
        BatchInput::Query(soql) if operation.is_query() => Ok(ValidatedBatch {
            payload: soql.clone(),
            record_count: None,
        }),
        BatchInput::Query(_) => Err(Error::new(ErrorKind::InvalidBatchInput(format!(
            "raw text is only accepted by query jobs, this is a {} job; {}",
            operation, ACCEPTED_INPUTS
        )))),
    }
}

fn check_size(records: usize) -> Result<()> {
    if records > MAX_BATCH_RECORDS {
        return Err(Error::new(ErrorKind::BatchTooLarge {
            records,
            max: MAX_BATCH_RECORDS,
        }));
    }
    Ok(())
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
