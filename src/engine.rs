//! Session scoring facade: aggregator, score calculator and validity
//! assessor in one call.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProtocolConfig, ScorePolicy};
use crate::error::EngineError;
use crate::metrics::compute_raw_metrics;
use crate::scoring::calculate_score;
use crate::types::{ScoreResult, Trial, ValidityResult};
use crate::validity::assess_validity;

/// Everything downstream needs after a finished session. An invalid session
/// still carries its computed score; excluding it from history and baselines
/// is the caller's decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutcome {
    pub score: ScoreResult,
    pub validity: ValidityResult,
}

/// Score a finalized trial sequence.
pub fn score_session(
    trials: &[Trial],
    config: &ProtocolConfig,
    policy: &ScorePolicy,
) -> Result<SessionOutcome, EngineError> {
    let raw = compute_raw_metrics(trials, config)?;
    let score = calculate_score(&raw, policy);
    let validity = assess_validity(&raw, policy);

    debug!(
        brain_score = score.brain_score,
        is_valid = validity.is_valid,
        version = ?policy.version,
        "session scored"
    );

    Ok(SessionOutcome { score, validity })
}
