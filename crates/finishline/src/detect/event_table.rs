// ABOUTME: Detector for the legacy eventTable format: a class-marked table with known header labels.
// ABOUTME: Evidence: pro-rated fraction of expected header labels, plus a link-free table body.

use scraper::{ElementRef, Html, Selector};

use super::{Detect, WEAK_WEIGHT};

/// Header labels expected in the legacy table, after normalization.
pub(crate) const EXPECTED_LABELS: [&str; 7] =
    ["place", "athlete", "grade", "team", "avg mile", "finish", "points"];

/// Combined weight of the pro-rated header evidence. This format has no
/// separate binary strong marker; the matched fraction carries both the
/// strong and secondary tiers.
const HEADER_WEIGHT: f64 = 0.9;

/// Lowercases and strips punctuation so "Avg. Mile" matches "avg mile".
pub(crate) fn normalize_label(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized text of the header-row cells of a table, in column order.
pub(crate) fn header_labels(table: &ElementRef) -> Vec<String> {
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td, th").unwrap();
    table
        .select(&row_sel)
        .next()
        .map(|row| {
            row.select(&cell_sel)
                .map(|cell| normalize_label(&cell.text().collect::<String>()))
                .collect()
        })
        .unwrap_or_default()
}

/// Detector for pages that publish results in a `table.eventTable`.
pub struct EventTableDetector;

impl Detect for EventTableDetector {
    fn confidence(&self, html: &str) -> f64 {
        let doc = Html::parse_document(html);
        let table_sel = Selector::parse("table.eventTable").unwrap();
        let Some(table) = doc.select(&table_sel).next() else {
            return 0.0;
        };

        let labels = header_labels(&table);
        let matched = EXPECTED_LABELS
            .iter()
            .filter(|expected| labels.iter().any(|label| label == *expected))
            .count();
        let mut score = HEADER_WEIGHT * matched as f64 / EXPECTED_LABELS.len() as f64;

        // Corroborating shape: legacy bodies carry plain text, no inline
        // links attached to result cells.
        let row_sel = Selector::parse("tr").unwrap();
        let link_sel = Selector::parse("a").unwrap();
        let body_links = table
            .select(&row_sel)
            .skip(1)
            .flat_map(|row| row.select(&link_sel))
            .count();
        if body_links == 0 {
            score += WEAK_WEIGHT;
        }

        score.min(1.0)
    }
}
