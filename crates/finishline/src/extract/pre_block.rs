// ABOUTME: Extractor for the <pre>-based format: line-oriented positional parsing.
// ABOUTME: Keeps lines that open with a place number and match the fixed row pattern.

use dom_query::{Document, Matcher};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{title_case, Extract, Extraction};
use crate::schema::IndividualRow;

static CONTAINER_PRE: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("#meetResultsBody pre, .meetResultsBody pre").unwrap());

// <place> <athlete> [<grade>] <team> <finish>, anchored on a m:ss.t time.
// Best-effort: column-aligned sources with no grade still parse because the
// grade slot absorbs one of the padding spaces.
static ROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)\s+(.+?)\s+(\d+)?\s+(.+?)\s+(\d{1,2}:\d{2}\.\d)").unwrap());
static PLACE_LINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*\d+").unwrap());

/// Extractor for preformatted result listings. Emits individual rows only;
/// this format never publishes a team table.
pub struct PreBlockExtractor;

impl Extract for PreBlockExtractor {
    fn extract(&self, html: &str) -> Extraction {
        let doc = Document::from(html);
        // First <pre> inside the results container; absent means empty
        // results, not an error.
        let Some(pre) = doc.select_matcher(&CONTAINER_PRE).iter().next() else {
            return Extraction::default();
        };

        let text = pre.text().to_string();
        let mut out = Extraction::default();
        for line in text.lines().filter(|line| PLACE_LINE_RE.is_match(line)) {
            match parse_line(line) {
                Some(row) => out.individual.push(row),
                None => out.dropped_rows += 1,
            }
        }
        out
    }
}

fn parse_line(line: &str) -> Option<IndividualRow> {
    let caps = ROW_RE.captures(line)?;
    let place = caps[1].parse().ok()?;
    let grade = caps.get(3).and_then(|g| g.as_str().parse().ok());
    Some(IndividualRow {
        place,
        video: None,
        athlete: title_case(caps[2].trim()),
        grade,
        team: caps[4].trim().to_string(),
        finish: caps[5].to_string(),
        point: None,
        links: Default::default(),
    })
}
