//! Authenticator trait and implementations.

use std::future::Future;

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::session::Session;

/// Produces an active [`Session`].
///
/// The bulk controller only needs the resulting session; how it was
/// obtained (SOAP login, OAuth, an existing CLI session) is up to the
/// implementation.
pub trait Authenticator: Send + Sync {
    /// Establish (or hand out) a session.
    fn authenticate(&self) -> impl Future<Output = Result<Session>> + Send;
}

/// Authenticator over a session that was already issued elsewhere.
///
/// The session id is redacted in Debug output.
#[derive(Clone)]
pub struct SessionAuthenticator {
    server_url: String,
    session_id: String,
}

impl std::fmt::Debug for SessionAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAuthenticator")
            .field("server_url", &self.server_url)
            .field("session_id", &"[REDACTED]")
            .finish()
    }
}

impl SessionAuthenticator {
    /// Wrap a server URL and session id.
    pub fn new(server_url: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            session_id: session_id.into(),
        }
    }

    /// Load the session from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_SERVER_URL` or `SALESFORCE_SERVER_URL`
    /// - `SF_SESSION_ID` or `SALESFORCE_SESSION_ID`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |primary: &str, fallback: &str| {
            lookup(primary)
                .or_else(|| lookup(fallback))
                .filter(|value| !value.is_empty())
                .ok_or_else(|| Error::new(ErrorKind::EnvVar(primary.to_string())))
        };

        let server_url = read("SF_SERVER_URL", "SALESFORCE_SERVER_URL")?;
        let session_id = read("SF_SESSION_ID", "SALESFORCE_SESSION_ID")?;

        Ok(Self::new(server_url, session_id))
    }

    /// The configured server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

impl Authenticator for SessionAuthenticator {
    async fn authenticate(&self) -> Result<Session> {
        if self.session_id.is_empty() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "session id is empty".to_string(),
            )));
        }

        let session = Session::new(&self.server_url, &self.session_id);
        debug!(instance = ?session.instance(), "Session established");
        Ok(session)
    }
}
