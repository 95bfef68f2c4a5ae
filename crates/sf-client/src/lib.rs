//! # sf-client
//!
//! HTTP transport for the Salesforce asynchronous (XML/CSV) APIs.
//!
//! This crate provides:
//! - A request builder with the `X-SFDC-Session` and PK-chunking headers
//! - A reqwest-backed client with compression and connection pooling
//! - The [`Transport`] trait that API clients are generic over
//! - Raw responses that keep the status and body of failed calls
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::{SfHttpClient, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_client::Error> {
//!     let client = SfHttpClient::default_client()?;
//!
//!     let request = client
//!         .get("https://na1.salesforce.com/services/async/47.0/job/750xx/batch")
//!         .sfdc_session("00Dxx!session");
//!     let response = client.send(request).await?;
//!
//!     println!("{} {}", response.status(), response.body());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod transport;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod, PK_CHUNKING_HEADER, SESSION_HEADER};
pub use response::{sanitize_error_message, RawResponse};
pub use transport::Transport;

/// Default version of the asynchronous Bulk API.
pub const DEFAULT_API_VERSION: &str = "47.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-async/", env!("CARGO_PKG_VERSION"));
