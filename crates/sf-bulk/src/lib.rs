//! # busbar-sf-bulk
//!
//! Salesforce asynchronous (XML/CSV) Bulk API client.
//!
//! ## Features
//!
//! - **Jobs** - Insert, Update, Delete and PK-chunked Query jobs
//! - **Batch Validation** - Size and input checks before anything is sent
//! - **Status Polling** - One status round trip per call; the caller owns the loop
//! - **Result Collection** - Gated on terminal batch states, query result sets included
//! - **CSV Support** - Native CSV data handling
//!
//! ## Example - Bulk Insert
//!
//! ```rust,ignore
//! use busbar_sf_auth::{Authenticator, SessionAuthenticator};
//! use busbar_sf_bulk::{BatchInput, BulkJobClient, Dataset, FetchOutcome};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = SessionAuthenticator::from_env()?.authenticate().await?;
//!     let client = BulkJobClient::new()?;
//!
//!     let job = client.create_job("insert", "Account", &session, None).await?;
//!
//!     let mut accounts = Dataset::new(["Name", "Industry"]);
//!     accounts.push_row(vec!["Acme Corp".into(), "Technology".into()])?;
//!     client.add_batch(&job, &BatchInput::Dataset(accounts), None).await?;
//!
//!     let results = loop {
//!         match client.fetch_results(&job, None).await? {
//!             FetchOutcome::Ready { data, .. } => break data,
//!             FetchOutcome::NotReady { .. } => {
//!                 tokio::time::sleep(std::time::Duration::from_secs(5)).await
//!             }
//!         }
//!     };
//!     client.close_job(&job, None).await?;
//!
//!     println!("{:?}", results.column("Success"));
//!     Ok(())
//! }
//! ```

mod batch;
mod client;
mod dataset;
mod error;
mod status;
mod types;

pub use batch::{validate_batch, BatchInput, ValidatedBatch};
pub use client::{BulkJobClient, FetchOutcome};
pub use dataset::{CsvCodec, Dataset, TabularCodec};
pub use error::{Error, ErrorKind, Result};
pub use status::{parse_batch_info, parse_batch_list, parse_result_list};
pub use types::*;
