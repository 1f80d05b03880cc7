// ABOUTME: Extractor for legacy eventTable pages: header-mapped cell reads per body row.
// ABOUTME: Classifies each table as individual or team and preserves in-cell hyperlinks.

use std::collections::BTreeMap;

use scraper::{ElementRef, Html, Selector};

use super::{Extract, Extraction};
use crate::detect::event_table::header_labels;
use crate::schema::{IndividualRow, TeamRow};

/// Normalized labels an individual results table may carry.
const INDIVIDUAL_LABELS: [&str; 9] = [
    "place", "video", "athlete", "grade", "team", "avg mile", "finish", "point", "points",
];

/// Normalized labels a team results table may carry.
const TEAM_LABELS: [&str; 7] = ["place", "team", "tsteam", "point", "points", "wind", "heat"];

#[derive(Debug, Clone, Copy, PartialEq)]
enum TableKind {
    Individual,
    Team,
}

/// Individual takes precedence: a minimal {place, team, point} header set
/// is ambiguous and historically read as an individual table. Tables with
/// unrecognized headers return None and are skipped whole.
fn table_kind(headers: &[String]) -> Option<TableKind> {
    if headers.iter().all(|h| INDIVIDUAL_LABELS.contains(&h.as_str())) {
        Some(TableKind::Individual)
    } else if headers.iter().all(|h| TEAM_LABELS.contains(&h.as_str())) {
        Some(TableKind::Team)
    } else {
        None
    }
}

/// One body cell: its text plus the first hyperlink target, if any.
struct Cell {
    text: String,
    href: Option<String>,
}

fn read_cells(row: &ElementRef) -> Vec<Cell> {
    let cell_sel = Selector::parse("td, th").unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();
    row.select(&cell_sel)
        .map(|cell| Cell {
            text: cell
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            href: cell
                .select(&link_sel)
                .next()
                .and_then(|a| a.value().attr("href"))
                .map(str::to_string),
        })
        .collect()
}

/// `<column>_url` link map for one row, keyed by the normalized header
/// label with spaces underscored.
fn link_map(headers: &[String], cells: &[Cell]) -> BTreeMap<String, String> {
    headers
        .iter()
        .zip(cells)
        .filter_map(|(header, cell)| {
            cell.href
                .as_ref()
                .map(|href| (format!("{}_url", header.replace(' ', "_")), href.clone()))
        })
        .collect()
}

fn field<'a>(headers: &[String], cells: &'a [Cell], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .position(|h| h == name)
        .and_then(|idx| cells.get(idx))
        .map(|cell| cell.text.as_str())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

fn individual_row(headers: &[String], cells: &[Cell]) -> Option<IndividualRow> {
    let place = field(headers, cells, "place")?.parse().ok()?;
    Some(IndividualRow {
        place,
        video: non_empty(field(headers, cells, "video")),
        athlete: field(headers, cells, "athlete").unwrap_or_default().to_string(),
        grade: field(headers, cells, "grade").and_then(|g| g.parse().ok()),
        team: field(headers, cells, "team").unwrap_or_default().to_string(),
        finish: field(headers, cells, "finish").unwrap_or_default().to_string(),
        point: field(headers, cells, "points")
            .or_else(|| field(headers, cells, "point"))
            .and_then(|p| p.parse().ok()),
        links: link_map(headers, cells),
    })
}

fn team_row(headers: &[String], cells: &[Cell]) -> Option<TeamRow> {
    let place = field(headers, cells, "place")?.parse().ok()?;
    let team = field(headers, cells, "team").or_else(|| field(headers, cells, "tsteam"));
    Some(TeamRow {
        place,
        team: team.unwrap_or_default().to_string(),
        point: field(headers, cells, "points")
            .or_else(|| field(headers, cells, "point"))
            .and_then(|p| p.parse().ok()),
        wind: non_empty(field(headers, cells, "wind")),
        heat: non_empty(field(headers, cells, "heat")),
        links: link_map(headers, cells),
    })
}

/// Extractor for legacy `table.eventTable` pages. Reads every matching
/// table in the page and routes its rows by the header set.
pub struct EventTableExtractor;

impl Extract for EventTableExtractor {
    fn extract(&self, html: &str) -> Extraction {
        let doc = Html::parse_document(html);
        let table_sel = Selector::parse("table.eventTable").unwrap();
        let row_sel = Selector::parse("tr").unwrap();

        let mut out = Extraction::default();
        for table in doc.select(&table_sel) {
            let headers = header_labels(&table);
            if headers.is_empty() {
                continue;
            }
            let Some(kind) = table_kind(&headers) else {
                continue;
            };

            for row in table.select(&row_sel).skip(1) {
                let cells = read_cells(&row);
                // A cell count disagreeing with the header count means a
                // malformed or spanning row; drop it.
                if cells.len() != headers.len() {
                    out.dropped_rows += 1;
                    continue;
                }
                let parsed = match kind {
                    TableKind::Individual => individual_row(&headers, &cells)
                        .map(|row| out.individual.push(row))
                        .is_some(),
                    TableKind::Team => team_row(&headers, &cells)
                        .map(|row| out.team.push(row))
                        .is_some(),
                };
                if !parsed {
                    out.dropped_rows += 1;
                }
            }
        }
        out
    }
}
