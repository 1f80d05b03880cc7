// ABOUTME: Per-page pipeline: classify, dispatch to the winning extractor, record the outcome.
// ABOUTME: Accumulator merges page outputs only at defined synchronization points.

use serde::Serialize;
use tracing::{debug, info};

use crate::classify::classify;
use crate::registry::FormatRegistry;
use crate::schema::{
    IndividualRow, Outcome, PageSource, ProcessingRecord, TeamRow,
};

/// Everything produced from one page: rows plus the audit record.
#[derive(Debug, Clone)]
pub struct PageOutput {
    pub individual: Vec<IndividualRow>,
    pub team: Vec<TeamRow>,
    pub record: ProcessingRecord,
}

impl PageOutput {
    /// Row-free output carrying just a record.
    pub fn empty(record: ProcessingRecord) -> Self {
        Self {
            individual: Vec::new(),
            team: Vec::new(),
            record,
        }
    }

    /// Output for a page whose retrieval or processing failed.
    pub fn failed(source: &PageSource, error: impl Into<String>) -> Self {
        Self::empty(ProcessingRecord::failed(source, error))
    }
}

/// Classifies one page and, when a format is accepted, runs its extractor.
///
/// Never fails: a page below the threshold yields zero rows and a skipped
/// record with the observed confidence kept for diagnostics.
pub fn process_page(
    registry: &FormatRegistry,
    threshold: f64,
    html: &str,
    source: &PageSource,
) -> PageOutput {
    let classification = classify(registry, html, threshold);
    debug!(source = %source.id, scores = ?classification.scores, "classified");

    let winner = classification
        .winning_format
        .filter(|_| classification.accepted)
        .and_then(|format| registry.extractor_for(format).map(|ex| (format, ex)));

    let Some((format, extractor)) = winner else {
        info!(
            source = %source.id,
            confidence = classification.confidence,
            "skipped: low confidence"
        );
        return PageOutput::empty(ProcessingRecord::skipped(
            source,
            classification.winning_format,
            classification.confidence,
        ));
    };

    let extraction = extractor.extract(html);
    info!(
        source = %source.id,
        %format,
        rows = extraction.row_count(),
        dropped = extraction.dropped_rows,
        "extracted"
    );
    PageOutput {
        record: ProcessingRecord::extracted(
            source,
            format,
            classification.confidence,
            extraction.row_count(),
            extraction.dropped_rows,
        ),
        individual: extraction.individual,
        team: extraction.team,
    }
}

/// Append-only accumulation of batch output. Owned by the batch caller and
/// populated only through `merge`, never shared raw across workers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Accumulator {
    pub individual: Vec<IndividualRow>,
    pub team: Vec<TeamRow>,
    pub records: Vec<ProcessingRecord>,
}

impl Accumulator {
    /// Folds one page's output into the shared tables.
    pub fn merge(&mut self, page: PageOutput) {
        self.individual.extend(page.individual);
        self.team.extend(page.team);
        self.records.push(page.record);
    }

    /// Number of pages whose processing failed outright.
    pub fn failure_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == Outcome::Failed)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::DEFAULT_THRESHOLD;
    use pretty_assertions::assert_eq;

    fn source() -> PageSource {
        PageSource::from_url("https://example.com/results/101/")
    }

    #[test]
    fn unmatched_page_is_skipped_with_zero_rows() {
        let registry = FormatRegistry::builtin();
        let output = process_page(
            &registry,
            DEFAULT_THRESHOLD,
            "<html><body><p>nothing here</p></body></html>",
            &source(),
        );
        assert!(output.individual.is_empty());
        assert!(output.team.is_empty());
        assert_eq!(output.record.outcome, Outcome::Skipped);
        assert_eq!(output.record.format, None);
        assert_eq!(output.record.confidence, 0.0);
        assert_eq!(output.record.outcome.to_string(), "skipped: low confidence");
    }

    #[test]
    fn accepted_page_dispatches_to_winning_extractor() {
        let registry = FormatRegistry::builtin();
        let html = r#"<div id="meetResultsBody">
            <pre>Pl Athlete Yr Team Time
1 John Smith 11 Lincoln High 16:32.1</pre></div>"#;
        let output = process_page(&registry, DEFAULT_THRESHOLD, html, &source());
        assert_eq!(output.record.outcome, Outcome::Extracted);
        assert_eq!(output.record.format, Some(crate::schema::Format::PreBlock));
        assert_eq!(output.record.row_count, 1);
        assert_eq!(output.individual.len(), 1);
    }

    #[test]
    fn merge_accumulates_rows_and_records() {
        let mut acc = Accumulator::default();
        acc.merge(PageOutput::failed(&source(), "fetch error"));

        let registry = FormatRegistry::builtin();
        let html = r#"<div id="meetResultsBody">
            <pre>Pl Athlete Yr Team Time
1 John Smith 11 Lincoln High 16:32.1</pre></div>"#;
        acc.merge(process_page(&registry, DEFAULT_THRESHOLD, html, &source()));

        assert_eq!(acc.records.len(), 2);
        assert_eq!(acc.individual.len(), 1);
        assert_eq!(acc.failure_count(), 1);
    }
}
