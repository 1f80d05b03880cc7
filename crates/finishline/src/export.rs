// ABOUTME: CSV rendering of the accumulated output tables with fixed column order.
// ABOUTME: Minimal writer: fields are quoted only when they need it, quotes doubled.

use std::io::{self, Write};

use crate::schema::{
    IndividualRow, ProcessingRecord, TeamRow, INDIVIDUAL_COLUMNS, RECORD_COLUMNS, TEAM_COLUMNS,
};

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String]) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first {
            write!(w, ",")?;
        } else {
            first = false;
        }
        if needs_quotes(cell) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn table<'a, I>(columns: &[&str], rows: I) -> String
where
    I: Iterator<Item = Vec<String>>,
{
    let mut buf: Vec<u8> = Vec::new();
    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let _ = write_row(&mut buf, &header);
    for row in rows {
        let _ = write_row(&mut buf, &row);
    }
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(&e.into_bytes()).into_owned(),
    }
}

/// Individual results as CSV, canonical column order.
pub fn individual_csv(rows: &[IndividualRow]) -> String {
    table(
        &INDIVIDUAL_COLUMNS,
        rows.iter().map(|r| {
            vec![
                r.place.to_string(),
                opt(&r.video),
                r.athlete.clone(),
                opt(&r.grade),
                r.team.clone(),
                r.finish.clone(),
                opt(&r.point),
            ]
        }),
    )
}

/// Team results as CSV, canonical column order.
pub fn team_csv(rows: &[TeamRow]) -> String {
    table(
        &TEAM_COLUMNS,
        rows.iter().map(|r| {
            vec![
                r.place.to_string(),
                r.team.clone(),
                opt(&r.point),
                opt(&r.wind),
                opt(&r.heat),
            ]
        }),
    )
}

/// Processing records as CSV, canonical column order.
pub fn records_csv(records: &[ProcessingRecord]) -> String {
    table(
        &RECORD_COLUMNS,
        records.iter().map(|r| {
            vec![
                r.source_id.clone(),
                r.source_url.clone(),
                r.outcome.to_string(),
                opt(&r.format),
                r.confidence.to_string(),
                r.row_count.to_string(),
                r.dropped_rows.to_string(),
                opt(&r.error),
                r.processed_at.to_rfc3339(),
            ]
        }),
    )
}
