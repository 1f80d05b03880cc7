// ABOUTME: Classifier: runs every registered detector and picks the winning format.
// ABOUTME: Applies the acceptance threshold and the fixed registration-order tie-break.

use serde::Serialize;

use crate::detect::DetectionResult;
use crate::registry::FormatRegistry;
use crate::schema::Format;

/// Default acceptance threshold for the winning confidence. Tunable via
/// `ClientBuilder::threshold`; never per-format.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Outcome of classifying one page.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Best-scoring format, or None when every detector scored zero.
    pub winning_format: Option<Format>,
    pub confidence: f64,
    /// True only when the winning confidence reaches the threshold.
    pub accepted: bool,
    /// Per-detector scores in registration order, for diagnostics.
    pub scores: Vec<DetectionResult>,
}

/// Scores `html` against every registered detector and selects the best.
///
/// Detectors run in registration order; equal top confidences resolve to
/// the earlier registration (strict-greater replacement). Acceptance is
/// `confidence >= threshold`: a page scoring exactly the threshold is
/// accepted.
pub fn classify(registry: &FormatRegistry, html: &str, threshold: f64) -> Classification {
    let scores: Vec<DetectionResult> = registry
        .entries()
        .iter()
        .map(|entry| DetectionResult::new(entry.format, entry.detector.confidence(html)))
        .collect();

    let mut winner: Option<DetectionResult> = None;
    for result in &scores {
        let better = match winner {
            Some(best) => result.confidence > best.confidence,
            None => result.confidence > 0.0,
        };
        if better {
            winner = Some(*result);
        }
    }

    let confidence = winner.map(|w| w.confidence).unwrap_or(0.0);
    Classification {
        winning_format: winner.map(|w| w.format),
        confidence,
        accepted: winner.is_some() && confidence >= threshold,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Detect;
    use crate::extract::{Extract, Extraction};
    use pretty_assertions::assert_eq;

    /// Detector returning a fixed score regardless of input.
    struct Fixed(f64);

    impl Detect for Fixed {
        fn confidence(&self, _html: &str) -> f64 {
            self.0
        }
    }

    struct NoopExtractor;

    impl Extract for NoopExtractor {
        fn extract(&self, _html: &str) -> Extraction {
            Extraction::default()
        }
    }

    fn stub_registry(scores: &[(Format, f64)]) -> FormatRegistry {
        let mut registry = FormatRegistry::new();
        for (format, score) in scores {
            registry.register(*format, Box::new(Fixed(*score)), Box::new(NoopExtractor));
        }
        registry
    }

    #[test]
    fn picks_highest_scoring_format() {
        let registry = stub_registry(&[
            (Format::PreBlock, 0.4),
            (Format::LegacyEventTable, 0.9),
        ]);
        let outcome = classify(&registry, "", DEFAULT_THRESHOLD);
        assert_eq!(outcome.winning_format, Some(Format::LegacyEventTable));
        assert!(outcome.accepted);
        assert_eq!(outcome.confidence, 0.9);
    }

    #[test]
    fn all_zero_scores_mean_no_winner() {
        let registry = stub_registry(&[
            (Format::PreBlock, 0.0),
            (Format::LegacyEventTable, 0.0),
        ]);
        let outcome = classify(&registry, "", DEFAULT_THRESHOLD);
        assert_eq!(outcome.winning_format, None);
        assert!(!outcome.accepted);
        assert_eq!(outcome.confidence, 0.0);
    }

    #[test]
    fn empty_registry_means_no_winner() {
        let registry = FormatRegistry::new();
        let outcome = classify(&registry, "", DEFAULT_THRESHOLD);
        assert_eq!(outcome.winning_format, None);
        assert!(!outcome.accepted);
        assert!(outcome.scores.is_empty());
    }

    #[test]
    fn ties_resolve_to_earlier_registration() {
        let registry = stub_registry(&[
            (Format::LegacyEventTable, 0.8),
            (Format::PreBlock, 0.8),
        ]);
        let outcome = classify(&registry, "", DEFAULT_THRESHOLD);
        assert_eq!(outcome.winning_format, Some(Format::LegacyEventTable));
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let at = stub_registry(&[(Format::PreBlock, 0.7)]);
        assert!(classify(&at, "", DEFAULT_THRESHOLD).accepted);

        let below = stub_registry(&[(Format::PreBlock, 0.6999)]);
        let outcome = classify(&below, "", DEFAULT_THRESHOLD);
        assert!(!outcome.accepted);
        // The nominal winner is still reported for diagnostics.
        assert_eq!(outcome.winning_format, Some(Format::PreBlock));
    }

    #[test]
    fn out_of_range_detector_scores_are_clamped() {
        let registry = stub_registry(&[(Format::PreBlock, 3.0)]);
        let outcome = classify(&registry, "", DEFAULT_THRESHOLD);
        assert_eq!(outcome.confidence, 1.0);

        let registry = stub_registry(&[(Format::PreBlock, -1.0)]);
        let outcome = classify(&registry, "", DEFAULT_THRESHOLD);
        assert_eq!(outcome.winning_format, None);
    }
}
