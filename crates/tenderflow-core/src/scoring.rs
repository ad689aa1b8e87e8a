//! Distance-to-score rescaling and strategic bid assessment.

use serde::{Deserialize, Serialize};

/// Distance at or beyond which a candidate scores zero. The similarity
/// backend's distances are assumed roughly bounded to [0, 1.5] for
/// meaningful scores; anything outside saturates rather than erroring.
const DISTANCE_CEILING: f32 = 1.5;

/// Linear rescale of a similarity distance to a [0, 100] match score.
///
/// distance 0 → 100, distance ≥ 1.5 → 0, negative distances clamp to 100.
pub fn score_from_distance(distance: f32) -> u8 {
    if !distance.is_finite() {
        return 0;
    }
    let score = (DISTANCE_CEILING - distance) / DISTANCE_CEILING * 100.0;
    score.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinProbability {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    High,
}

/// Aggregate assessment of a full line-item set. A pure function of the
/// per-item match scores; fully reproducible for a given set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicAnalysis {
    /// Mean per-item match score, rounded to one decimal.
    pub overall_capability_score: f64,
    pub win_probability: WinProbability,
    pub executive_summary: String,
    pub risk_assessment: RiskLevel,
}

impl StrategicAnalysis {
    /// Assess win probability and risk from per-item match scores.
    ///
    /// The denominator is `max(1, count)` so an empty extraction yields a
    /// zero score instead of a division by zero.
    pub fn assess(match_scores: &[u8]) -> Self {
        let total: u32 = match_scores.iter().map(|&s| u32::from(s)).sum();
        let avg = f64::from(total) / match_scores.len().max(1) as f64;

        let (win_probability, executive_summary) = if avg > 75.0 {
            (
                WinProbability::High,
                "Strong portfolio fit. We have exact specs for most items.",
            )
        } else if avg > 40.0 {
            (
                WinProbability::Medium,
                "Partial fit. Some customization or third-party sourcing required.",
            )
        } else {
            (
                WinProbability::Low,
                "High risk. Multiple items matched poorly or require new interaction.",
            )
        };

        let risk_assessment = if avg > 60.0 {
            RiskLevel::Low
        } else {
            RiskLevel::High
        };

        Self {
            overall_capability_score: (avg * 10.0).round() / 10.0,
            win_probability,
            executive_summary: executive_summary.to_string(),
            risk_assessment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_zero_scores_full() {
        assert_eq!(score_from_distance(0.0), 100);
    }

    #[test]
    fn reference_distance_scores_93() {
        // round((1.5 - 0.1) / 1.5 * 100) = 93
        assert_eq!(score_from_distance(0.1), 93);
    }

    #[test]
    fn out_of_range_distances_saturate() {
        assert_eq!(score_from_distance(1.5), 0);
        assert_eq!(score_from_distance(3.7), 0);
        assert_eq!(score_from_distance(-1.0), 100);
        assert_eq!(score_from_distance(f32::NAN), 0);
        assert_eq!(score_from_distance(f32::INFINITY), 0);
    }

    #[test]
    fn high_scores_map_to_high_probability_low_risk() {
        let analysis = StrategicAnalysis::assess(&[90, 85, 80]);
        assert_eq!(analysis.win_probability, WinProbability::High);
        assert_eq!(analysis.risk_assessment, RiskLevel::Low);
        assert_eq!(analysis.overall_capability_score, 85.0);
    }

    #[test]
    fn mid_scores_map_to_medium() {
        let analysis = StrategicAnalysis::assess(&[50, 60]);
        assert_eq!(analysis.win_probability, WinProbability::Medium);
        // avg 55 is below the 60 risk floor.
        assert_eq!(analysis.risk_assessment, RiskLevel::High);
    }

    #[test]
    fn boundary_75_is_medium() {
        let analysis = StrategicAnalysis::assess(&[75]);
        assert_eq!(analysis.win_probability, WinProbability::Medium);
    }

    #[test]
    fn low_scores_map_to_low() {
        let analysis = StrategicAnalysis::assess(&[10, 20, 0]);
        assert_eq!(analysis.win_probability, WinProbability::Low);
        assert_eq!(analysis.risk_assessment, RiskLevel::High);
    }

    #[test]
    fn empty_scores_do_not_divide_by_zero() {
        let analysis = StrategicAnalysis::assess(&[]);
        assert_eq!(analysis.overall_capability_score, 0.0);
        assert_eq!(analysis.win_probability, WinProbability::Low);
        assert_eq!(analysis.risk_assessment, RiskLevel::High);
    }

    #[test]
    fn capability_score_rounds_to_one_decimal() {
        // avg of [93, 92, 90] = 91.666... → 91.7
        let analysis = StrategicAnalysis::assess(&[93, 92, 90]);
        assert_eq!(analysis.overall_capability_score, 91.7);
    }
}
