//! Session validity assessment.
//!
//! Validity is a business outcome, not a computation failure: an invalid
//! session still carries its computed score, and the caller decides whether
//! to persist it or exclude it from aggregates.

use crate::config::ScorePolicy;
use crate::types::{InvalidReason, RawMetrics, ValidityResult};

/// Assess session validity from raw metrics. Two independent flags: a
/// protocol-quality flag (too few valid trials) and a spam flag (very fast
/// mean RT combined with a high error rate). When both fire the reason is
/// [`InvalidReason::Mixed`] so downstream never guesses a single cause.
pub fn assess_validity(raw: &RawMetrics, policy: &ScorePolicy) -> ValidityResult {
    let low_ratio = raw.valid_trial_ratio < policy.min_valid_trial_ratio;

    // A mean RT of 0 (no correct Go responses at all) counts as ultrafast:
    // a session without usable responses must not pass as valid.
    let combined_error_rate = (raw.commission_error_rate + raw.omission_error_rate) / 2.0;
    let ultrafast = raw.mean_go_rt < policy.ultrafast_rt_ms
        && combined_error_rate > policy.ultrafast_error_rate;

    let reason = match (low_ratio, ultrafast) {
        (true, true) => Some(InvalidReason::Mixed),
        (true, false) => Some(InvalidReason::LowValidRatio),
        (false, true) => Some(InvalidReason::TooManyUltrafast),
        (false, false) => None,
    };

    ValidityResult {
        is_valid: reason.is_none(),
        reason,
    }
}
