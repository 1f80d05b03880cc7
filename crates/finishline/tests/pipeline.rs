// ABOUTME: Integration tests for the classification and extraction pipeline.
// ABOUTME: Covers the format scenarios, threshold gating, and purity properties.

use pretty_assertions::assert_eq;

use finishline::{
    classify, process_page, Detect, Extract, Extraction, Format, FormatRegistry, Outcome,
    PageSource, DEFAULT_THRESHOLD,
};

const PRE_BLOCK_PAGE: &str = r#"<html><body>
<div id="meetResultsBody">
<pre>Pl Athlete Yr Team Time
1 John Smith 11 Lincoln High 16:32.1</pre>
</div>
</body></html>"#;

const PRE_BLOCK_WITH_TABLE: &str = r#"<html><body>
<div id="meetResultsBody">
<pre>Pl Athlete Yr Team Time
1 John Smith 11 Lincoln High 16:32.1</pre>
<table><tr><td>1</td></tr></table>
</div>
</body></html>"#;

const EVENT_TABLE_PAGE: &str = r#"<html><body>
<table class="eventTable">
<tr><th>Place</th><th>Athlete</th><th>Grade</th><th>Team</th>
    <th>Avg. Mile</th><th>Finish</th><th>Points</th></tr>
<tr><td>1</td><td>Jane Doe</td><td>12</td><td>Central</td>
    <td>5:20</td><td>16:40.2</td><td>10</td></tr>
<tr><td>2</td><td>May Roe</td><td>11</td><td>North</td>
    <td>5:25</td><td>16:55.0</td><td>8</td></tr>
</table>
</body></html>"#;

const UNMATCHED_PAGE: &str = "<html><body><h1>Meet cancelled</h1></body></html>";

fn source() -> PageSource {
    PageSource::from_url("https://example.com/results/314/")
}

#[test]
fn scenario_pre_block_page_classifies_and_extracts() {
    let registry = FormatRegistry::builtin();

    let outcome = classify(&registry, PRE_BLOCK_PAGE, DEFAULT_THRESHOLD);
    assert_eq!(outcome.winning_format, Some(Format::PreBlock));
    assert_eq!(outcome.confidence, 1.0);
    assert!(outcome.accepted);

    let output = process_page(&registry, DEFAULT_THRESHOLD, PRE_BLOCK_PAGE, &source());
    assert_eq!(output.individual.len(), 1);
    let row = &output.individual[0];
    assert_eq!(row.place, 1);
    assert_eq!(row.athlete, "John Smith");
    assert_eq!(row.grade, Some(11));
    assert_eq!(row.team, "Lincoln High");
    assert_eq!(row.finish, "16:32.1");
    assert_eq!(row.video, None);
    assert_eq!(row.point, None);
}

#[test]
fn scenario_table_inside_pre_container_vetoes_pre_block() {
    let registry = FormatRegistry::builtin();
    let outcome = classify(&registry, PRE_BLOCK_WITH_TABLE, DEFAULT_THRESHOLD);
    let pre_block_score = outcome
        .scores
        .iter()
        .find(|s| s.format == Format::PreBlock)
        .unwrap()
        .confidence;
    assert_eq!(pre_block_score, 0.0);
}

#[test]
fn scenario_event_table_page_classifies_and_extracts() {
    let registry = FormatRegistry::builtin();

    let outcome = classify(&registry, EVENT_TABLE_PAGE, DEFAULT_THRESHOLD);
    assert_eq!(outcome.winning_format, Some(Format::LegacyEventTable));
    assert_eq!(outcome.confidence, 1.0);

    let output = process_page(&registry, DEFAULT_THRESHOLD, EVENT_TABLE_PAGE, &source());
    // Row count equals the number of body rows.
    assert_eq!(output.individual.len(), 2);
    assert_eq!(output.record.row_count, 2);
    assert_eq!(output.record.dropped_rows, 0);
}

#[test]
fn scenario_unmatched_page_is_skipped() {
    let registry = FormatRegistry::builtin();

    let outcome = classify(&registry, UNMATCHED_PAGE, DEFAULT_THRESHOLD);
    assert_eq!(outcome.winning_format, None);
    assert!(!outcome.accepted);
    for score in &outcome.scores {
        assert_eq!(score.confidence, 0.0);
    }

    let output = process_page(&registry, DEFAULT_THRESHOLD, UNMATCHED_PAGE, &source());
    assert_eq!(output.individual.len(), 0);
    assert_eq!(output.team.len(), 0);
    assert_eq!(output.record.outcome, Outcome::Skipped);
    assert_eq!(output.record.outcome.to_string(), "skipped: low confidence");
}

#[test]
fn detector_scores_stay_in_unit_interval() {
    let registry = FormatRegistry::builtin();
    for page in [
        PRE_BLOCK_PAGE,
        PRE_BLOCK_WITH_TABLE,
        EVENT_TABLE_PAGE,
        UNMATCHED_PAGE,
        "",
        "<pre>1 2 3</pre>",
    ] {
        for entry in registry.entries() {
            let score = entry.detector.confidence(page);
            assert!((0.0..=1.0).contains(&score), "{} scored {}", entry.format, score);
        }
    }
}

#[test]
fn detectors_and_extractors_are_idempotent() {
    let registry = FormatRegistry::builtin();
    for entry in registry.entries() {
        assert_eq!(
            entry.detector.confidence(PRE_BLOCK_PAGE),
            entry.detector.confidence(PRE_BLOCK_PAGE)
        );
        assert_eq!(
            entry.extractor.extract(EVENT_TABLE_PAGE).individual,
            entry.extractor.extract(EVENT_TABLE_PAGE).individual
        );
    }
}

#[test]
fn every_emitted_row_has_all_canonical_fields() {
    let registry = FormatRegistry::builtin();
    for page in [PRE_BLOCK_PAGE, EVENT_TABLE_PAGE] {
        let output = process_page(&registry, DEFAULT_THRESHOLD, page, &source());
        for row in &output.individual {
            let value = serde_json::to_value(row).unwrap();
            let obj = value.as_object().unwrap();
            for column in finishline::schema::INDIVIDUAL_COLUMNS {
                assert!(obj.contains_key(column), "missing {}", column);
            }
        }
    }
}

/// Fixed-score detector used to probe the threshold and tie-break rules.
struct Fixed(f64);

impl Detect for Fixed {
    fn confidence(&self, _html: &str) -> f64 {
        self.0
    }
}

/// Extractor emitting one marker row so dispatch can be observed.
struct Marker(&'static str);

impl Extract for Marker {
    fn extract(&self, _html: &str) -> Extraction {
        let mut extraction = Extraction::default();
        extraction.individual.push(finishline::IndividualRow {
            place: 1,
            athlete: self.0.to_string(),
            ..Default::default()
        });
        extraction
    }
}

#[test]
fn threshold_boundary_accepts_exactly_at_threshold() {
    let mut registry = FormatRegistry::new();
    registry.register(Format::PreBlock, Box::new(Fixed(0.7)), Box::new(Marker("at")));
    let output = process_page(&registry, DEFAULT_THRESHOLD, "", &source());
    assert_eq!(output.record.outcome, Outcome::Extracted);
    assert_eq!(output.individual[0].athlete, "at");

    let mut registry = FormatRegistry::new();
    registry.register(
        Format::PreBlock,
        Box::new(Fixed(0.6999)),
        Box::new(Marker("below")),
    );
    let output = process_page(&registry, DEFAULT_THRESHOLD, "", &source());
    assert_eq!(output.record.outcome, Outcome::Skipped);
    assert!(output.individual.is_empty());
    // The observed confidence is recorded for diagnostics.
    assert!((output.record.confidence - 0.6999).abs() < 1e-12);
}

#[test]
fn equal_scores_dispatch_to_earlier_registration() {
    let mut registry = FormatRegistry::new();
    registry.register(
        Format::LegacyEventTable,
        Box::new(Fixed(0.8)),
        Box::new(Marker("first")),
    );
    registry.register(
        Format::PreBlock,
        Box::new(Fixed(0.8)),
        Box::new(Marker("second")),
    );

    let output = process_page(&registry, DEFAULT_THRESHOLD, "", &source());
    assert_eq!(output.record.format, Some(Format::LegacyEventTable));
    assert_eq!(output.individual[0].athlete, "first");
}

#[test]
fn registering_a_new_format_needs_no_classifier_changes() {
    let mut registry = FormatRegistry::builtin();
    registry.register(
        Format::LegacyEventTable,
        Box::new(Fixed(0.0)),
        Box::new(Marker("extra")),
    );
    assert_eq!(registry.len(), 3);

    // The built-in formats still win their own pages.
    let outcome = classify(&registry, PRE_BLOCK_PAGE, DEFAULT_THRESHOLD);
    assert_eq!(outcome.winning_format, Some(Format::PreBlock));
}
