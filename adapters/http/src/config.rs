//! Configuration types for the HTTP graph source

use serde::{Deserialize, Serialize};

/// Configuration for fetching graphs over HTTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSourceConfig {
    /// Accept header sent with every request
    pub accept: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent header
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            accept: "text/turtle, application/n-triples;q=0.9".to_string(),
            timeout_secs: 30,
            user_agent: format!("wrangle/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSourceConfig {
    /// Set the Accept header
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}
