//! Parsing of service replies: batch status lists, result lists and
//! exception documents.

use serde::Deserialize;

use crate::error::{Error, ErrorKind, Result};
use crate::types::{BatchInfo, BatchState};

/// One `<batchInfo>` fragment. Every field is optional here so a missing
/// one can be reported with its position.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBatchInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    state_message: Option<String>,
    #[serde(default)]
    number_records_processed: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BatchInfoList {
    #[serde(rename = "batchInfo", default)]
    batch_info: Vec<RawBatchInfo>,
}

#[derive(Debug, Deserialize)]
struct ResultList {
    #[serde(rename = "result", default)]
    result: Vec<String>,
}

/// Fields shared by `<jobInfo>`, `<batchInfo>` and `<error>` replies.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ServiceReply {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub exception_code: Option<String>,
    #[serde(default)]
    pub exception_message: Option<String>,
}

impl ServiceReply {
    /// Parse any reply document. Bodies that are not XML yield `None`.
    pub(crate) fn parse(body: &str) -> Option<Self> {
        quick_xml::de::from_str(body).ok()
    }

    /// The non-empty exception message, if the reply is an error document.
    pub(crate) fn exception(&self) -> Option<&str> {
        self.exception_message
            .as_deref()
            .map(str::trim)
            .filter(|msg| !msg.is_empty())
    }
}

/// Exception message carried by a reply body, if any.
pub(crate) fn service_exception(body: &str) -> Option<String> {
    ServiceReply::parse(body).and_then(|reply| reply.exception().map(str::to_string))
}

/// Parse a `<batchInfoList>` document into status records, in document order.
pub fn parse_batch_list(xml: &str) -> Result<Vec<BatchInfo>> {
    let list: BatchInfoList = quick_xml::de::from_str(xml).map_err(|e| {
        Error::with_source(
            ErrorKind::MalformedStatus(format!("unreadable batch list: {}", e)),
            e,
        )
    })?;

    list.batch_info
        .into_iter()
        .enumerate()
        .map(|(index, raw)| to_batch_info(raw, index + 1))
        .collect()
}

/// Parse a single `<batchInfo>` document.
pub fn parse_batch_info(xml: &str) -> Result<BatchInfo> {
    let raw: RawBatchInfo = quick_xml::de::from_str(xml).map_err(|e| {
        Error::with_source(
            ErrorKind::MalformedStatus(format!("unreadable batch info: {}", e)),
            e,
        )
    })?;
    to_batch_info(raw, 1)
}

/// Result-set ids listed in a `<result-list>` document.
pub fn parse_result_list(xml: &str) -> Result<Vec<String>> {
    let list: ResultList = quick_xml::de::from_str(xml).map_err(|e| {
        Error::with_source(
            ErrorKind::ResultDecoding(format!("unreadable result list: {}", e)),
            e,
        )
    })?;

    Ok(list
        .result
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

fn to_batch_info(raw: RawBatchInfo, position: usize) -> Result<BatchInfo> {
    let missing = |field: &str| {
        Error::new(ErrorKind::MalformedStatus(format!(
            "batch #{} is missing <{}>",
            position, field
        )))
    };

    let id = required(raw.id).ok_or_else(|| missing("id"))?;
    let state = required(raw.state).ok_or_else(|| missing("state"))?;
    let processed =
        required(raw.number_records_processed).ok_or_else(|| missing("numberRecordsProcessed"))?;

    let records_processed = processed.parse::<u64>().map_err(|e| {
        Error::with_source(
            ErrorKind::MalformedStatus(format!(
                "batch {} has non-numeric numberRecordsProcessed '{}'",
                id, processed
            )),
            e,
        )
    })?;

    Ok(BatchInfo {
        id,
        state: BatchState::from_api(&state),
        state_message: raw.state_message.unwrap_or_default(),
        records_processed,
    })
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
