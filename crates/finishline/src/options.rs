// ABOUTME: Client configuration: acceptance threshold, fetch settings, registry override.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances.

use std::collections::HashMap;
use std::time::Duration;

use crate::classify::DEFAULT_THRESHOLD;
use crate::client::Client;
use crate::registry::FormatRegistry;

/// Configuration options for the batch client.
pub struct Options {
    /// Acceptance threshold applied to the winning confidence.
    pub threshold: f64,
    /// Bounded wait per page fetch; past it the page counts as failed.
    pub timeout: Duration,
    pub user_agent: String,
    /// Maximum pages fetched and processed concurrently.
    pub concurrency: usize,
    pub headers: HashMap<String, String>,
    pub http_client: Option<reqwest::Client>,
    /// Format registry override; defaults to the built-in formats.
    pub registry: Option<FormatRegistry>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            timeout: Duration::from_secs(10),
            user_agent: "finishline/0.1".to_string(),
            concurrency: 4,
            headers: HashMap::new(),
            http_client: None,
            registry: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the acceptance threshold.
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.opts.threshold = threshold;
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the worker-pool bound for batch processing.
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.opts.concurrency = concurrency;
        self
    }

    /// Add a custom header to all requests.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.opts.headers.insert(key.into(), value.into());
        self
    }

    /// Use a custom HTTP client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Replace the built-in format registry.
    pub fn registry(mut self, registry: FormatRegistry) -> Self {
        self.opts.registry = Some(registry);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Client {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
