//! # sf-auth
//!
//! Session context for the Salesforce asynchronous Bulk API.
//!
//! ## Security
//!
//! - Session ids are redacted in Debug output
//! - Tracing never records credential values
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_auth::{Authenticator, SessionAuthenticator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), busbar_sf_auth::Error> {
//!     // SF_SERVER_URL / SF_SESSION_ID
//!     let session = SessionAuthenticator::from_env()?.authenticate().await?;
//!     println!("instance: {:?}", session.instance());
//!     Ok(())
//! }
//! ```

mod authenticator;
mod error;
mod session;

pub use authenticator::{Authenticator, SessionAuthenticator};
pub use error::{Error, ErrorKind, Result};
pub use session::{Session, SERVICE_DOMAIN};
