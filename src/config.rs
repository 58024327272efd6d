//! Configuration options for the AquaFlow client

use std::time::Duration;

/// Configuration options for the AquaFlow client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout applied to every API call.
    ///
    /// A timeout surfaces as a network error; it is never classified as a
    /// cancellation.
    pub request_timeout: Duration,

    /// Whether the session (token + user) is persisted to the local store
    pub persist_session: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(5),
            persist_session: true,
        }
    }
}

impl ClientOptions {
    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, value: Duration) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }
}
