// ABOUTME: Format detectors scoring how likely a page uses each publishing template.
// ABOUTME: Defines the Detect trait, DetectionResult, and the shared evidence weights.

//! Per-format confidence detectors.
//!
//! Every detector follows the same evidence-accumulation shape:
//! a missing results container is a hard veto (score 0.0), format-defining
//! markers add the strong weight once, structural shape adds the secondary
//! weight (or vetoes outright when the shape is a precondition), and a
//! corroborating signal adds the weak weight. The sum is clamped to 1.0.

pub mod event_table;
pub mod pre_block;

use serde::Serialize;

use crate::schema::Format;

/// Weight of the format-defining marker evidence in tenths, counted once.
pub const STRONG_TENTHS: u32 = 6;
/// Weight of the structural-shape evidence in tenths.
pub const SECONDARY_TENTHS: u32 = 3;
/// Weight of the corroborating signal in tenths.
pub const WEAK_TENTHS: u32 = 1;

/// The corroborating-signal weight as a fraction, for detectors that mix
/// it with evidence that is not tier-shaped.
pub const WEAK_WEIGHT: f64 = WEAK_TENTHS as f64 / 10.0;

/// Converts accumulated evidence tenths into a confidence in [0, 1].
/// Tiered detectors accumulate in integers and divide once: summing the
/// tier weights as floats leaves a full match just below 1.0.
pub fn evidence_score(tenths: u32) -> f64 {
    tenths.min(10) as f64 / 10.0
}

/// Estimates the likelihood that a page uses a given format.
///
/// Implementations are pure: same HTML in, same score out, no side effects
/// and no dependency on any other detector's output.
pub trait Detect: Send + Sync {
    /// Scores the page in [0, 1]. A missing results container yields 0.0.
    fn confidence(&self, html: &str) -> f64;
}

/// One detector's verdict for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionResult {
    pub format: Format,
    pub confidence: f64,
}

impl DetectionResult {
    /// Clamps the confidence into [0, 1]; never negative, capped at 1.0.
    pub fn new(format: Format, confidence: f64) -> Self {
        Self {
            format,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}
