// ABOUTME: Library entry point for finishline, a race-results format classifier and extractor.
// ABOUTME: Re-exports the public API: Client, builder, registry, pipeline, and schema types.

//! finishline - classify and extract athletic race results from HTML.
//!
//! Result pages arrive in several mutually incompatible publishing
//! templates. Each known template ("format") pairs a confidence detector
//! with an extractor; the classifier runs every detector, picks the
//! best-scoring format, and above the acceptance threshold the paired
//! extractor emits normalized result rows plus one audit record per page.
//!
//! # Example
//!
//! ```
//! use finishline::{classify, FormatRegistry, DEFAULT_THRESHOLD};
//!
//! let registry = FormatRegistry::builtin();
//! let outcome = classify(&registry, "<html><body></body></html>", DEFAULT_THRESHOLD);
//! assert!(outcome.winning_format.is_none());
//! assert!(!outcome.accepted);
//! ```

pub mod classify;
pub mod client;
pub mod detect;
pub mod error;
pub mod export;
pub mod extract;
pub mod options;
pub mod pipeline;
pub mod registry;
pub mod resource;
pub mod schema;

pub use crate::classify::{classify, Classification, DEFAULT_THRESHOLD};
pub use crate::client::Client;
pub use crate::detect::{Detect, DetectionResult};
pub use crate::error::{ErrorCode, ScrapeError};
pub use crate::extract::{Extract, Extraction};
pub use crate::options::{ClientBuilder, Options};
pub use crate::pipeline::{process_page, Accumulator, PageOutput};
pub use crate::registry::FormatRegistry;
pub use crate::schema::{
    Format, IndividualRow, Outcome, PageSource, ProcessingRecord, TeamRow,
};
