// ABOUTME: Detector for the <pre>-based format hosted in a meetResultsBody container.
// ABOUTME: Evidence: header tokens inside one <pre>, pre-without-table shape, no team-scores text.

use aho_corasick::AhoCorasick;
use dom_query::{Document, Matcher};
use once_cell::sync::Lazy;

use super::{evidence_score, Detect, SECONDARY_TENTHS, STRONG_TENTHS, WEAK_TENTHS};

/// Column-header abbreviations that must all appear inside one `<pre>`.
const REQUIRED_TOKENS: [&str; 5] = ["pl", "athlete", "yr", "team", "time"];

static CONTAINER: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("#meetResultsBody, .meetResultsBody").unwrap());
static CONTAINER_PRE: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("#meetResultsBody pre, .meetResultsBody pre").unwrap());
static CONTAINER_TABLE: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("#meetResultsBody table, .meetResultsBody table").unwrap());
static TOKEN_SCAN: Lazy<AhoCorasick> = Lazy::new(|| AhoCorasick::new(REQUIRED_TOKENS).unwrap());

/// Detector for pages that publish results as preformatted text inside a
/// `meetResultsBody` element.
pub struct PreBlockDetector;

impl Detect for PreBlockDetector {
    fn confidence(&self, html: &str) -> f64 {
        let doc = Document::from(html);
        if doc.select_matcher(&CONTAINER).iter().next().is_none() {
            return 0.0;
        }

        let pre_texts: Vec<String> = doc
            .select_matcher(&CONTAINER_PRE)
            .iter()
            .map(|el| el.text().to_lowercase())
            .collect();
        let has_table = doc
            .select_matcher(&CONTAINER_TABLE)
            .iter()
            .next()
            .is_some();

        // Structural precondition: <pre> blocks present, tabular markup
        // absent. Failing it vetoes the page outright.
        if pre_texts.is_empty() || has_table {
            return 0.0;
        }
        let mut tenths = SECONDARY_TENTHS;

        // Format-defining header line, counted once even if it recurs.
        if pre_texts.iter().any(|text| has_all_tokens(text)) {
            tenths += STRONG_TENTHS;
        }

        // No team-scores sub-section, which would indicate a different
        // sub-type of the preformatted layout.
        if !pre_texts.iter().any(|text| text.contains("team scores")) {
            tenths += WEAK_TENTHS;
        }

        evidence_score(tenths)
    }
}

/// Substring check for every required token, overlapping matches allowed.
fn has_all_tokens(text: &str) -> bool {
    let mut seen = [false; REQUIRED_TOKENS.len()];
    for m in TOKEN_SCAN.find_overlapping_iter(text) {
        seen[m.pattern().as_usize()] = true;
    }
    seen.iter().all(|s| *s)
}
