//! Authenticated session context.

use std::sync::LazyLock;

/// Domain that instance hosts live under.
pub const SERVICE_DOMAIN: &str = "salesforce.com";

static HOST_PATTERN: LazyLock<regex_lite::Regex> = LazyLock::new(|| {
    regex_lite::Regex::new(r"^https?://([^/:?#]+)").expect("valid host pattern")
});

/// An active session: the server endpoint returned at login, the instance
/// identifier derived from it and the session credential.
///
/// Immutable once constructed, so one session can be shared read-only by
/// any number of concurrent operations. The session id is redacted in
/// Debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    server_url: String,
    session_id: String,
    host: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("server_url", &self.server_url)
            .field("session_id", &"[REDACTED]")
            .field("instance", &self.instance())
            .finish()
    }
}

impl Session {
    /// Create a session from a server endpoint and a session id.
    ///
    /// The instance identifier is the part of the endpoint host in front of
    /// the service domain, e.g. `na1` in `https://na1.salesforce.com/...`.
    /// An endpoint that does not match leaves it unset; calls that need an
    /// instance host fail later instead.
    pub fn new(server_url: impl Into<String>, session_id: impl Into<String>) -> Self {
        let server_url = server_url.into();
        let host = HOST_PATTERN
            .captures(&server_url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase());

        Self {
            server_url,
            session_id: session_id.into(),
            host,
        }
    }

    /// The endpoint the session was issued for.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// The session credential.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// The short instance identifier under [`SERVICE_DOMAIN`] (e.g. `na1`,
    /// `acme.my`), if derivable.
    pub fn instance(&self) -> Option<&str> {
        self.instance_in(SERVICE_DOMAIN)
    }

    /// The instance identifier under another service domain, e.g. `na1`
    /// for `https://na1.example-gov.com` and `example-gov.com`.
    pub fn instance_in(&self, domain: &str) -> Option<&str> {
        let domain = domain.trim_matches('.');
        if domain.is_empty() || !domain.is_ascii() {
            return None;
        }
        let host = self.host.as_deref().filter(|h| h.is_ascii())?;
        let split = host.len().checked_sub(domain.len() + 1)?;
        let (instance, suffix) = host.split_at(split);
        (suffix.starts_with('.')
            && suffix[1..].eq_ignore_ascii_case(domain)
            && !instance.is_empty())
        .then_some(instance)
    }

    /// `https://<instance>.<domain>`, if the endpoint lives under `domain`.
    pub fn instance_url(&self, domain: &str) -> Option<String> {
        self.instance_in(domain)
            .map(|instance| format!("https://{}.{}", instance, domain.trim_matches('.')))
    }
}
