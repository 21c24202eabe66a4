//! Qualitative interpretation of the four cognitive dimensions.
//!
//! Heuristic threshold bands over raw metrics, intended for user-facing
//! feedback. For inhibition, vigilance and stability a *low* level is the
//! good outcome (low error rate, low variance); for engagement it is the
//! other way around.

use serde::{Deserialize, Serialize};

use crate::types::{CognitiveDimension, DimensionFeedback, DimensionLevel, RawMetrics};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightThresholds {
    /// Commission error rate bands (inhibition).
    pub inhibition_low: f64,
    pub inhibition_high: f64,
    /// Omission error rate bands (vigilance).
    pub vigilance_low: f64,
    pub vigilance_high: f64,
    /// Go RT standard deviation bands in ms (stability).
    pub stability_low_ms: f64,
    pub stability_high_ms: f64,
    /// Valid-trial ratio bands (engagement).
    pub engagement_low: f64,
    pub engagement_high: f64,
    /// Minimum total sessions before insights are shown at all.
    pub min_sessions: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            inhibition_low: 0.10,
            inhibition_high: 0.30,
            vigilance_low: 0.05,
            vigilance_high: 0.20,
            stability_low_ms: 80.0,
            stability_high_ms: 180.0,
            engagement_low: 0.90,
            engagement_high: 0.98,
            min_sessions: 5,
        }
    }
}

/// Interpret all four dimensions from raw metrics.
pub fn interpret_dimensions(
    raw: &RawMetrics,
    thresholds: &InsightThresholds,
) -> Vec<DimensionFeedback> {
    vec![
        interpret_inhibition(raw.commission_error_rate, thresholds),
        interpret_vigilance(raw.omission_error_rate, thresholds),
        interpret_stability(raw.go_rt_sd, thresholds),
        interpret_engagement(raw.valid_trial_ratio, thresholds),
    ]
}

/// Gated interpretation: `None` until the user has enough total sessions for
/// the feedback to mean anything.
pub fn session_insights(
    raw: &RawMetrics,
    total_sessions: usize,
    thresholds: &InsightThresholds,
) -> Option<Vec<DimensionFeedback>> {
    if total_sessions < thresholds.min_sessions {
        return None;
    }
    Some(interpret_dimensions(raw, thresholds))
}

fn interpret_inhibition(rate: f64, t: &InsightThresholds) -> DimensionFeedback {
    let (level, summary) = if rate <= t.inhibition_low {
        (
            DimensionLevel::Low,
            "Stop signals were recognized reliably; impulse control was strong.",
        )
    } else if rate > t.inhibition_high {
        (
            DimensionLevel::High,
            "Responses frequently slipped through on stop signals, suggesting an impulsive response tendency.",
        )
    } else {
        (
            DimensionLevel::Medium,
            "Impulse control was in the middle range; occasional slips at this pace are normal.",
        )
    };
    DimensionFeedback {
        dimension: CognitiveDimension::Inhibition,
        level,
        summary: summary.to_string(),
    }
}

fn interpret_vigilance(rate: f64, t: &InsightThresholds) -> DimensionFeedback {
    let (level, summary) = if rate <= t.vigilance_low {
        (
            DimensionLevel::Low,
            "Nearly every target was answered in time; sustained attention held up well.",
        )
    } else if rate > t.vigilance_high {
        (
            DimensionLevel::High,
            "Several targets went unanswered, which can indicate fading concentration or high cognitive load.",
        )
    } else {
        (
            DimensionLevel::Medium,
            "Attention was mostly stable with a few lapses, a normal pattern over longer runs.",
        )
    };
    DimensionFeedback {
        dimension: CognitiveDimension::Vigilance,
        level,
        summary: summary.to_string(),
    }
}

fn interpret_stability(sd: f64, t: &InsightThresholds) -> DimensionFeedback {
    let (level, summary) = if sd <= t.stability_low_ms {
        (
            DimensionLevel::Low,
            "Reaction times were very even, pointing to consistent focus throughout the run.",
        )
    } else if sd > t.stability_high_ms {
        (
            DimensionLevel::High,
            "Reaction times fluctuated markedly, which can indicate shifting attention or external distraction.",
        )
    } else {
        (
            DimensionLevel::Medium,
            "Reaction times showed moderate variation, as expected over repeated trials.",
        )
    };
    DimensionFeedback {
        dimension: CognitiveDimension::Stability,
        level,
        summary: summary.to_string(),
    }
}

fn interpret_engagement(ratio: f64, t: &InsightThresholds) -> DimensionFeedback {
    let (level, summary) = if ratio >= t.engagement_high {
        (
            DimensionLevel::High,
            "Almost every trial was technically usable, a sign of careful, engaged testing.",
        )
    } else if ratio <= t.engagement_low {
        (
            DimensionLevel::Low,
            "Several trials were technically unusable, which can point to interruptions or device issues.",
        )
    } else {
        (
            DimensionLevel::Medium,
            "Most trials were usable; occasional interruptions are normal.",
        )
    };
    DimensionFeedback {
        dimension: CognitiveDimension::Engagement,
        level,
        summary: summary.to_string(),
    }
}
