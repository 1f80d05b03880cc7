// ABOUTME: Batch client: fetches result pages and runs them through the pipeline.
// ABOUTME: Bounded-concurrency processing with per-page failure isolation.

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::options::{ClientBuilder, Options};
use crate::pipeline::{process_page, Accumulator, PageOutput};
use crate::registry::FormatRegistry;
use crate::resource::{fetch, FetchOptions};
use crate::schema::PageSource;

/// The batch client tying retrieval to the classification pipeline.
///
/// Pages are isolated: one page's fetch or parse trouble becomes its own
/// failed record and never aborts the rest of the batch.
pub struct Client {
    http: reqwest::Client,
    registry: FormatRegistry,
    threshold: f64,
    concurrency: usize,
    fetch_opts: FetchOptions,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Self {
        let http = opts.http_client.clone().unwrap_or_else(|| {
            reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .expect("failed to build HTTP client")
        });
        Self {
            http,
            registry: opts.registry.unwrap_or_else(FormatRegistry::builtin),
            threshold: opts.threshold,
            concurrency: opts.concurrency.max(1),
            fetch_opts: FetchOptions {
                headers: opts.headers,
            },
        }
    }

    /// Process already-retrieved HTML for the given source URL. No network
    /// I/O; useful for offline files and tests.
    pub fn process_html(&self, html: &str, url: &str) -> PageOutput {
        let source = PageSource::from_url(url);
        process_page(&self.registry, self.threshold, html, &source)
    }

    /// Fetch one page and process it. Retrieval failure becomes a failed
    /// record for this page only.
    pub async fn process_url(&self, url: &str) -> PageOutput {
        let source = PageSource::from_url(url);
        match fetch(&self.http, url, &self.fetch_opts).await {
            Ok(page) => {
                let html = page.text();
                process_page(&self.registry, self.threshold, &html, &source)
            }
            Err(err) => {
                warn!(source = %source.id, error = %err, "fetch failed");
                PageOutput::failed(&source, err.to_string())
            }
        }
    }

    /// Process a batch of URLs across a bounded pool of concurrent
    /// workers. Page outputs are sorted by source id before merging, so
    /// the accumulated tables are deterministic regardless of completion
    /// order.
    pub async fn run(&self, urls: &[String]) -> Accumulator {
        let mut pages: Vec<PageOutput> = stream::iter(urls)
            .map(|url| self.process_url(url))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        pages.sort_by(|a, b| a.record.source_id.cmp(&b.record.source_id));

        let mut results = Accumulator::default();
        for page in pages {
            results.merge(page);
        }
        results
    }
}
