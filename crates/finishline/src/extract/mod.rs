// ABOUTME: Per-format extractors converting classified pages into canonical rows.
// ABOUTME: Defines the Extract trait and the Extraction bundle they all return.

//! Per-format extractors.
//!
//! Extraction is total: structurally absent content (no container, no
//! `<pre>`, no matching table) yields an empty `Extraction`, never an
//! error. Rows that only partially match the expected shape are dropped
//! silently and surfaced in the aggregate `dropped_rows` count.

pub mod event_table;
pub mod pre_block;

use crate::schema::{IndividualRow, TeamRow};

/// Rows pulled from one page, plus the count of best-effort parse drops.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub individual: Vec<IndividualRow>,
    pub team: Vec<TeamRow>,
    pub dropped_rows: usize,
}

impl Extraction {
    /// Total number of emitted rows across both tables.
    pub fn row_count(&self) -> usize {
        self.individual.len() + self.team.len()
    }
}

/// Converts a page of a known format into normalized rows.
pub trait Extract: Send + Sync {
    fn extract(&self, html: &str) -> Extraction;
}

/// Title-cases a name. Capitalization restarts after any non-alphabetic
/// character, so hyphenated and apostrophed names come out as
/// "Mary-Jane O'Neil", not "Mary-jane O'neil".
pub(crate) fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}
