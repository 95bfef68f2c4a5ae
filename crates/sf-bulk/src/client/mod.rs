//! Asynchronous Bulk API client.
//!
//! Drives the job lifecycle: create a job, add batches, ask for batch
//! status, collect results and close the job. Every call is one round trip;
//! polling cadence is left to the caller.

mod results;

pub use results::FetchOutcome;

use tracing::{debug, info, instrument, warn};

use busbar_sf_auth::{Session, SERVICE_DOMAIN};
use busbar_sf_client::{
    ClientConfig, RawResponse, RequestBuilder, RequestMethod, SfHttpClient, Transport,
    DEFAULT_API_VERSION,
};

use crate::batch::{validate_batch, BatchInput};
use crate::dataset::{CsvCodec, TabularCodec};
use crate::error::{Error, ErrorKind, Result};
use crate::status::{parse_batch_info, parse_batch_list, service_exception, ServiceReply};
use crate::types::*;

/// Client for the asynchronous (XML/CSV) Bulk API.
///
/// Holds no job state of its own: jobs and sessions are passed into each
/// call, and the service is asked for batch state every time.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_auth::Session;
/// use busbar_sf_bulk::{BatchInput, BulkJobClient, FetchOutcome};
///
/// let session = Session::new(server_url, session_id);
/// let client = BulkJobClient::new()?;
///
/// let job = client.create_job("query", "Account", &session, Some(50_000)).await?;
/// client
///     .add_batch(&job, &BatchInput::Query("SELECT Id FROM Account".into()), None)
///     .await?;
///
/// loop {
///     match client.fetch_results(&job, None).await? {
///         FetchOutcome::Ready { data, .. } => break println!("{} rows", data.len()),
///         FetchOutcome::NotReady { .. } => tokio::time::sleep(poll_interval).await,
///     }
/// }
/// client.close_job(&job, None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BulkJobClient<T = SfHttpClient, C = CsvCodec> {
    transport: T,
    codec: C,
    api_version: String,
    service_domain: String,
    base_url: Option<String>,
    default_chunk_size: u32,
}

impl BulkJobClient {
    /// Create a new client over the default HTTP stack.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom HTTP configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_transport(SfHttpClient::new(config)?))
    }
}

impl<T: Transport> BulkJobClient<T> {
    /// Create a client over any transport.
    pub fn from_transport(transport: T) -> Self {
        Self {
            transport,
            codec: CsvCodec,
            api_version: DEFAULT_API_VERSION.to_string(),
            service_domain: SERVICE_DOMAIN.to_string(),
            base_url: None,
            default_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl<T: Transport, C: TabularCodec> BulkJobClient<T, C> {
    /// Swap the tabular codec used for batch payloads and results.
    pub fn with_codec<C2: TabularCodec>(self, codec: C2) -> BulkJobClient<T, C2> {
        BulkJobClient {
            transport: self.transport,
            codec,
            api_version: self.api_version,
            service_domain: self.service_domain,
            base_url: self.base_url,
            default_chunk_size: self.default_chunk_size,
        }
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the domain instance hosts live under.
    pub fn with_service_domain(mut self, domain: impl Into<String>) -> Self {
        self.service_domain = domain.into();
        self
    }

    /// Send every request to this host instead of the session's instance.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_string());
        self
    }

    /// Set the chunk size used by query jobs when none is given.
    pub fn with_default_chunk_size(mut self, chunk_size: u32) -> Self {
        self.default_chunk_size = chunk_size;
        self
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the default query chunk size.
    pub fn default_chunk_size(&self) -> u32 {
        self.default_chunk_size
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build `<host>/services/async/<version>/job[/<segment>...]`.
    pub(crate) fn job_url(&self, session: &Session, segments: &[&str]) -> Result<String> {
        let host = match &self.base_url {
            Some(url) => url.clone(),
            None => session
                .instance_url(&self.service_domain)
                .ok_or_else(|| Error::new(ErrorKind::MissingInstance))?,
        };

        let mut url = format!("{}/services/async/{}/job", host, self.api_version);
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        Ok(url)
    }

    pub(crate) async fn send(
        &self,
        method: RequestMethod,
        url: String,
        session: &Session,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<RawResponse> {
        let request = build(RequestBuilder::new(method, url).sfdc_session(session.session_id()));
        Ok(self.transport.send(request).await?)
    }

    // =========================================================================
    // Job Operations
    // =========================================================================

    /// Create a job from an operation name (case-insensitive).
    ///
    /// Unknown operations fail before any request is made. `chunk_size`
    /// only applies to query jobs and defaults to
    /// [`default_chunk_size`](Self::default_chunk_size).
    #[instrument(skip(self, session))]
    pub async fn create_job(
        &self,
        operation: &str,
        object: &str,
        session: &Session,
        chunk_size: Option<u32>,
    ) -> Result<Job> {
        let operation: Operation = operation.parse()?;
        self.open_job(operation, object, session, chunk_size).await
    }

    /// Create a job for a typed operation.
    #[instrument(skip(self, session))]
    pub async fn open_job(
        &self,
        operation: Operation,
        object: &str,
        session: &Session,
        chunk_size: Option<u32>,
    ) -> Result<Job> {
        let document = CreateJobRequest::new(operation, object).to_xml()?;
        let url = self.job_url(session, &[])?;
        let chunk_size = chunk_size.unwrap_or(self.default_chunk_size);

        let response = self
            .send(RequestMethod::Post, url, session, |req| {
                let req = req.xml(document);
                if operation.is_query() {
                    req.pk_chunking(chunk_size)
                } else {
                    req
                }
            })
            .await?;

        let reply = ServiceReply::parse(response.body()).unwrap_or_default();
        if let Some(id) = reply.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            info!(job_id = id, %operation, object, "Job created");
            return Ok(Job::new(id, operation, object, session.clone()));
        }

        warn!(status = response.status(), "Job creation rejected");
        match reply.exception() {
            Some(message) => Err(Error::new(ErrorKind::JobCreationFailed(message.to_string()))),
            None => Err(Error::new(ErrorKind::UnknownCreationFailure {
                status: response.status(),
            })),
        }
    }

    /// Validate a batch and add it to the job.
    ///
    /// The new batch's id is not returned; it shows up in
    /// [`get_status`](Self::get_status).
    #[instrument(skip(self, job, batch, session), fields(job_id = %job.id()))]
    pub async fn add_batch(
        &self,
        job: &Job,
        batch: &BatchInput,
        session: Option<&Session>,
    ) -> Result<()> {
        let session = session.unwrap_or(job.session());
        let validated = validate_batch(batch, job.operation(), &self.codec)?;
        let url = self.job_url(session, &[job.id(), "batch"])?;

        let response = self
            .send(RequestMethod::Post, url, session, |req| {
                req.csv(validated.payload)
            })
            .await?;

        if let Some(message) = service_exception(response.body()) {
            return Err(Error::new(ErrorKind::BatchSubmissionFailed(message)));
        }
        if !response.is_success() {
            return Err(Error::new(ErrorKind::BatchSubmissionFailed(format!(
                "status {}: {}",
                response.status(),
                response.sanitized_body()
            ))));
        }

        match parse_batch_info(response.body()) {
            Ok(info) => debug!(batch_id = %info.id, records = ?validated.record_count, "Batch added"),
            Err(_) => debug!(records = ?validated.record_count, "Batch added"),
        }
        Ok(())
    }

    /// Close the job so the service accepts no more batches.
    ///
    /// Batches still in flight are not checked; closing early is the
    /// caller's call.
    #[instrument(skip(self, job, session), fields(job_id = %job.id()))]
    pub async fn close_job(&self, job: &Job, session: Option<&Session>) -> Result<()> {
        let session = session.unwrap_or(job.session());
        let document = UpdateJobStateRequest::close().to_xml()?;
        let url = self.job_url(session, &[job.id()])?;

        let response = self
            .send(RequestMethod::Post, url, session, |req| req.xml(document))
            .await?;

        if let Some(message) = service_exception(response.body()) {
            return Err(Error::new(ErrorKind::JobCloseFailed(message)));
        }
        if !response.is_success() {
            return Err(Error::new(ErrorKind::JobCloseFailed(format!(
                "status {}: {}",
                response.status(),
                response.sanitized_body()
            ))));
        }

        info!("Job closed");
        Ok(())
    }

    /// Status of every batch in the job, in the order the service lists them.
    #[instrument(skip(self, job, session), fields(job_id = %job.id()))]
    pub async fn get_status(&self, job: &Job, session: Option<&Session>) -> Result<Vec<BatchInfo>> {
        let session = session.unwrap_or(job.session());
        let url = self.job_url(session, &[job.id(), "batch"])?;

        let response = self
            .send(RequestMethod::Get, url, session, |req| req)
            .await?;

        if let Some(message) = service_exception(response.body()) {
            return Err(Error::new(ErrorKind::Api(message)));
        }
        if !response.is_success() {
            return Err(Error::new(ErrorKind::Api(format!(
                "Failed to get batch status: status {}: {}",
                response.status(),
                response.sanitized_body()
            ))));
        }

        let batches = parse_batch_list(response.body())?;
        debug!(batches = batches.len(), "Batch status received");
        Ok(batches)
    }
}
