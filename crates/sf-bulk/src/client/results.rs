//! Completion-gated result collection.

use tracing::{debug, info, instrument};

use busbar_sf_auth::Session;
use busbar_sf_client::{RawResponse, RequestMethod, Transport};

use super::BulkJobClient;
use crate::dataset::{Dataset, TabularCodec};
use crate::error::{Error, ErrorKind, Result};
use crate::status::{parse_result_list, service_exception};
use crate::types::{BatchInfo, Job};

/// Outcome of a single [`BulkJobClient::fetch_results`] attempt.
///
/// `NotReady` is a normal polling outcome, not a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every evaluated batch reached a terminal state; results are combined
    /// in batch order.
    Ready {
        batches: Vec<BatchInfo>,
        data: Dataset,
    },
    /// At least one evaluated batch is still queued or in progress.
    NotReady { batches: Vec<BatchInfo> },
}

impl FetchOutcome {
    /// Returns true if the results were collected.
    pub fn is_ready(&self) -> bool {
        matches!(self, FetchOutcome::Ready { .. })
    }

    /// Status records from the check that produced this outcome, including
    /// the query submission record.
    pub fn batches(&self) -> &[BatchInfo] {
        match self {
            FetchOutcome::Ready { batches, .. } | FetchOutcome::NotReady { batches } => batches,
        }
    }

    /// The combined dataset, if ready.
    pub fn data(&self) -> Option<&Dataset> {
        match self {
            FetchOutcome::Ready { data, .. } => Some(data),
            FetchOutcome::NotReady { .. } => None,
        }
    }

    /// Take the combined dataset, if ready.
    pub fn into_data(self) -> Option<Dataset> {
        match self {
            FetchOutcome::Ready { data, .. } => Some(data),
            FetchOutcome::NotReady { .. } => None,
        }
    }
}

/// Batches that carry data. The first record of a query job is the
/// submission batch itself.
pub(crate) fn data_batches<'a>(job: &Job, batches: &'a [BatchInfo]) -> &'a [BatchInfo] {
    if job.operation().is_query() {
        batches.get(1..).unwrap_or_default()
    } else {
        batches
    }
}

impl<T: Transport, C: TabularCodec> BulkJobClient<T, C> {
    /// Check the job once and, if every data batch is `Completed` or
    /// `Failed`, download and combine their results.
    ///
    /// A query job whose submission batch is still pending and has no chunk
    /// batches yet is `NotReady`. A job with nothing to fetch (no batches at
    /// all, or a finished query submission without chunks) is an error.
    ///
    /// Makes no result downloads when returning [`FetchOutcome::NotReady`].
    /// Failed batches are decoded like any other; inspect the returned
    /// status records to tell them apart.
    #[instrument(skip(self, job, session), fields(job_id = %job.id()))]
    pub async fn fetch_results(&self, job: &Job, session: Option<&Session>) -> Result<FetchOutcome> {
        let session = session.unwrap_or(job.session());
        let batches = self.get_status(job, Some(session)).await?;

        let evaluated = data_batches(job, &batches);
        if evaluated.is_empty() {
            return match batches.first() {
                Some(submission) if !submission.state.is_terminal() => {
                    debug!(batch_id = %submission.id, state = %submission.state, "Waiting for chunk batches");
                    Ok(FetchOutcome::NotReady { batches })
                }
                Some(submission) => Err(Error::new(ErrorKind::NoResultBatches(format!(
                    "query batch {} is {} and produced no chunk batches{}",
                    submission.id,
                    submission.state,
                    if submission.state_message.is_empty() {
                        String::new()
                    } else {
                        format!(": {}", submission.state_message)
                    }
                )))),
                None => Err(Error::new(ErrorKind::NoResultBatches(format!(
                    "job {} has no batches",
                    job.id()
                )))),
            };
        }

        if let Some(pending) = evaluated.iter().find(|b| !b.state.is_terminal()) {
            debug!(batch_id = %pending.id, state = %pending.state, "Results not ready");
            return Ok(FetchOutcome::NotReady { batches });
        }

        let mut parts = Vec::with_capacity(evaluated.len());
        for batch in evaluated {
            parts.push(self.get_batch_result(job, &batch.id, Some(session)).await?);
        }

        let data = Dataset::concat(parts);
        info!(
            batches = evaluated.len(),
            rows = data.len(),
            "Results collected"
        );
        Ok(FetchOutcome::Ready { batches, data })
    }

    /// Download and decode the result of one batch, whatever its state.
    ///
    /// Query batches take two requests: the result list, then the first
    /// result set it names.
    #[instrument(skip(self, job, session), fields(job_id = %job.id()))]
    pub async fn get_batch_result(
        &self,
        job: &Job,
        batch_id: &str,
        session: Option<&Session>,
    ) -> Result<Dataset> {
        let session = session.unwrap_or(job.session());
        let url = self.job_url(session, &[job.id(), "batch", batch_id, "result"])?;
        let response = self.send(RequestMethod::Get, url, session, |req| req).await?;
        let mut body = checked_body(response, batch_id)?;

        if job.operation().is_query() {
            let result_id = parse_result_list(&body)?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    Error::new(ErrorKind::ResultDecoding(format!(
                        "batch {} lists no result set",
                        batch_id
                    )))
                })?;
            debug!(batch_id, result_id = %result_id, "Fetching query result set");

            let url = self.job_url(
                session,
                &[job.id(), "batch", batch_id, "result", &result_id],
            )?;
            let response = self.send(RequestMethod::Get, url, session, |req| req).await?;
            body = checked_body(response, batch_id)?;
        }

        self.codec.decode(&body).map_err(|e| {
            Error::with_source(
                ErrorKind::ResultDecoding(format!("batch {}: {}", batch_id, e)),
                e,
            )
        })
    }
}

fn checked_body(response: RawResponse, batch_id: &str) -> Result<String> {
    if let Some(message) = service_exception(response.body()) {
        return Err(Error::new(ErrorKind::Api(message)));
    }
    if !response.is_success() {
        return Err(Error::new(ErrorKind::Api(format!(
            "Failed to get result of batch {}: status {}: {}",
            batch_id,
            response.status(),
            response.sanitized_body()
        ))));
    }
    Ok(response.into_body())
}
