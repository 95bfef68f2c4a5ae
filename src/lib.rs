//! # busbar-sf-async
//!
//! A client library for the Salesforce asynchronous (XML/CSV) Bulk API.
//!
//! Open a job, add batches, poll batch status and collect results once every
//! batch has finished. Polling cadence and backoff stay with the caller.
//!
//! ## Security
//!
//! - Session ids are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **busbar-sf-client** - HTTP transport: request builder, reqwest client, the `Transport` seam
//! - **busbar-sf-auth** - Session descriptor and the `Authenticator` interface
//! - **busbar-sf-bulk** - Job lifecycle: create, add batches, status, results, close
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_async::{Authenticator, BatchInput, BulkJobClient, FetchOutcome, SessionAuthenticator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionAuthenticator::from_env()?.authenticate().await?;
//!     let client = BulkJobClient::new()?;
//!
//!     let job = client.create_job("query", "Account", &session, Some(10_000)).await?;
//!     client
//!         .add_batch(&job, &BatchInput::Query("SELECT Id, Name FROM Account".into()), None)
//!         .await?;
//!
//!     let accounts = loop {
//!         match client.fetch_results(&job, None).await? {
//!             FetchOutcome::Ready { data, .. } => break data,
//!             FetchOutcome::NotReady { .. } => {
//!                 tokio::time::sleep(std::time::Duration::from_secs(10)).await
//!             }
//!         }
//!     };
//!     client.close_job(&job, None).await?;
//!
//!     println!("{} accounts", accounts.len());
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use busbar_sf_auth as auth;
#[cfg(feature = "bulk")]
pub use busbar_sf_bulk as bulk;
#[cfg(feature = "client")]
pub use busbar_sf_client as client;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use busbar_sf_auth::{Authenticator, Session, SessionAuthenticator};
#[cfg(feature = "bulk")]
pub use busbar_sf_bulk::{BatchInput, BulkJobClient, Dataset, FetchOutcome, Job, Operation};
#[cfg(feature = "client")]
pub use busbar_sf_client::{ClientConfig, SfHttpClient};
