//! Configuration options for the portal client

use std::time::Duration;

/// Configuration options for the portal client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Value sent in the `X-Client-Info` header
    pub client_info: String,

    /// Prefix for the two session storage keys
    pub storage_prefix: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            client_info: format!("member-portal-rust/{}", env!("CARGO_PKG_VERSION")),
            storage_prefix: "portal.session".to_string(),
        }
    }
}

impl ClientOptions {
    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the `X-Client-Info` header value
    pub fn with_client_info(mut self, value: &str) -> Self {
        self.client_info = value.to_string();
        self
    }

    /// Set the session storage key prefix
    pub fn with_storage_prefix(mut self, value: &str) -> Self {
        self.storage_prefix = value.to_string();
        self
    }
}
