//! Shared data model for the scoring and forecasting pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Trial data ====================

/// One stimulus presentation. Created by the generator (digit + no-go flag),
/// mutated exactly once by the interaction layer (response + reaction time),
/// then consumed by the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    /// Position in the sequence (0-based).
    pub index: usize,
    /// Stimulus digit (1-9).
    pub digit: u8,
    /// Whether withholding the response is the correct action.
    pub is_no_go: bool,
    /// Whether the user responded.
    pub responded: bool,
    /// Reaction time in milliseconds, if a response was registered.
    pub reaction_time_ms: Option<f64>,
    /// False when the trial is technically compromised (e.g. app backgrounded).
    pub is_valid: bool,
}

impl Trial {
    pub fn new(index: usize, digit: u8, is_no_go: bool) -> Self {
        Self {
            index,
            digit,
            is_no_go,
            responded: false,
            reaction_time_ms: None,
            is_valid: true,
        }
    }

    /// Correct means: responded on Go, withheld on No-Go.
    pub fn is_correct(&self) -> bool {
        if self.is_no_go {
            !self.responded
        } else {
            self.responded
        }
    }
}

// ==================== Aggregated metrics ====================

/// Per-session aggregate derived from a finalized trial sequence.
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetrics {
    pub n_valid: usize,
    pub n_go: usize,
    pub n_no_go: usize,
    /// Fraction of valid No-Go trials where the user nonetheless responded.
    pub commission_error_rate: f64,
    /// Fraction of valid Go trials where the user failed to respond.
    pub omission_error_rate: f64,
    /// Mean reaction time over valid, correct Go trials (ms). 0 when none.
    pub mean_go_rt: f64,
    /// Sample standard deviation (n-1) of the same reaction times (ms).
    pub go_rt_sd: f64,
    /// Valid trials divided by the protocol's total trial count.
    pub valid_trial_ratio: f64,
}

// ==================== Score results ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubScores {
    pub accuracy_score: f64,
    pub speed_score: f64,
    pub consistency_score: f64,
    pub discipline_score: f64,
}

impl SubScores {
    pub fn min(&self) -> f64 {
        self.accuracy_score
            .min(self.speed_score)
            .min(self.consistency_score)
            .min(self.discipline_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Composite score, clamped to [0, 100], one decimal place.
    pub brain_score: f64,
    #[serde(flatten)]
    pub sub_scores: SubScores,
    pub raw_metrics: RawMetrics,
}

// ==================== Validity ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// Protocol/technical quality: too many compromised trials.
    LowValidRatio,
    /// Spam pattern: very fast responses combined with a high error rate.
    TooManyUltrafast,
    /// Both flags fired; downstream must not guess a single cause.
    Mixed,
}

impl InvalidReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LowValidRatio => "low_valid_ratio",
            Self::TooManyUltrafast => "too_many_ultrafast",
            Self::Mixed => "mixed",
        }
    }
}

/// Business outcome, not a computation failure. An invalid session still
/// reports its computed score; the caller decides whether to persist it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<InvalidReason>,
}

// ==================== Session history ====================

/// One persisted session as read back from the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Composite score, 0-100.
    pub score: f64,
    pub timestamp: DateTime<Utc>,
}

// ==================== Baseline ====================

/// One of 24 hourly baseline entries. Recomputed from history on every
/// request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselinePoint {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Fixed circadian reference value for this hour.
    pub circadian_value: f64,
    /// User-derived value for this hour's bin, when observed data exists.
    pub user_value: Option<f64>,
    pub has_user_data: bool,
}

impl BaselinePoint {
    /// The expected score for this hour: user estimate where available,
    /// circadian value otherwise.
    pub fn expected(&self) -> f64 {
        self.user_value.unwrap_or(self.circadian_value)
    }
}

// ==================== Forecast ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaySegment {
    Morning,
    Forenoon,
    Midday,
    Afternoon,
    Evening,
}

impl DaySegment {
    /// Segment for an hour of day, with wraparound normalization.
    pub fn for_hour(hour: i32) -> Self {
        let h = ((hour % 24) + 24) % 24;
        match h {
            6..=9 => Self::Morning,
            10..=11 => Self::Forenoon,
            12..=15 => Self::Midday,
            16..=19 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Forenoon => "forenoon",
            Self::Midday => "midday",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastLabel {
    Focused,
    Stable,
    Fragile,
    Scattered,
}

impl ForecastLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focused => "focused",
            Self::Stable => "stable",
            Self::Fragile => "fragile",
            Self::Scattered => "scattered",
        }
    }
}

/// Qualitative indicator of how much historical evidence backs a forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastEvidence {
    pub level: ConfidenceLevel,
    /// Total sessions within the lookback window.
    pub test_count: usize,
}

/// Ephemeral result of a forecast query, computed per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    /// Point forecast for "right now" (0-100), if computable.
    pub forecast_now: Option<f64>,
    pub label: Option<ForecastLabel>,
    pub confidence: ConfidenceLevel,
    pub current_segment: DaySegment,
    /// Baseline value at the current hour, for comparison.
    pub typical_at_this_time: Option<f64>,
    pub evidence: ForecastEvidence,
}

// ==================== Daily aggregation ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyScore {
    pub date: chrono::NaiveDate,
    /// Mean of the day's session scores, rounded to a whole number.
    pub daily_score: f64,
    pub test_count: usize,
    pub first_test_at: DateTime<Utc>,
    pub last_test_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub seven_day_avg_daily_score: Option<f64>,
    pub best_daily_score: Option<f64>,
    pub worst_daily_score: Option<f64>,
    pub active_days: usize,
}

/// One of today's sessions compared against the user baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDeviation {
    pub timestamp: DateTime<Utc>,
    pub hour: u32,
    pub score: f64,
    pub baseline_at_hour: f64,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayDeviations {
    pub tests: Vec<TestDeviation>,
    pub average_delta: Option<f64>,
}

// ==================== Cognitive insights ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognitiveDimension {
    Inhibition,
    Vigilance,
    Stability,
    Engagement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFeedback {
    pub dimension: CognitiveDimension,
    pub level: DimensionLevel,
    pub summary: String,
}
