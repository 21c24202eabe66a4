//! Reduction of a finalized trial sequence into summary statistics.

use crate::config::ProtocolConfig;
use crate::error::EngineError;
use crate::types::{RawMetrics, Trial};

/// Compute per-session raw metrics from a finalized trial list.
///
/// Pure function. Fails fast on a trial count that does not match the
/// protocol; every rate defaults to 0 when its denominator is 0.
pub fn compute_raw_metrics(
    trials: &[Trial],
    config: &ProtocolConfig,
) -> Result<RawMetrics, EngineError> {
    if trials.len() != config.total_trials {
        return Err(EngineError::TrialCountMismatch {
            expected: config.total_trials,
            actual: trials.len(),
        });
    }

    let valid: Vec<&Trial> = trials.iter().filter(|t| t.is_valid).collect();
    let n_valid = valid.len();
    let valid_trial_ratio = n_valid as f64 / config.total_trials as f64;

    let go: Vec<&&Trial> = valid.iter().filter(|t| !t.is_no_go).collect();
    let no_go: Vec<&&Trial> = valid.iter().filter(|t| t.is_no_go).collect();
    let n_go = go.len();
    let n_no_go = no_go.len();

    let commission_errors = no_go.iter().filter(|t| t.responded).count();
    let commission_error_rate = if n_no_go > 0 {
        commission_errors as f64 / n_no_go as f64
    } else {
        0.0
    };

    let omission_errors = go.iter().filter(|t| !t.responded).count();
    let omission_error_rate = if n_go > 0 {
        omission_errors as f64 / n_go as f64
    } else {
        0.0
    };

    // Reaction time statistics over valid, correct Go trials only.
    let rts: Vec<f64> = go
        .iter()
        .filter(|t| t.is_correct())
        .filter_map(|t| t.reaction_time_ms)
        .collect();

    let mean_go_rt = if rts.is_empty() {
        0.0
    } else {
        rts.iter().sum::<f64>() / rts.len() as f64
    };

    let go_rt_sd = if rts.len() > 1 {
        let variance = rts
            .iter()
            .map(|rt| (rt - mean_go_rt).powi(2))
            .sum::<f64>()
            / (rts.len() - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    Ok(RawMetrics {
        n_valid,
        n_go,
        n_no_go,
        commission_error_rate,
        omission_error_rate,
        mean_go_rt,
        go_rt_sd,
        valid_trial_ratio,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trial(index: usize, is_no_go: bool, responded: bool, rt: Option<f64>) -> Trial {
        Trial {
            index,
            digit: if is_no_go { 3 } else { 5 },
            is_no_go,
            responded,
            reaction_time_ms: rt,
            is_valid: true,
        }
    }

    fn tiny_protocol(total: usize) -> ProtocolConfig {
        ProtocolConfig {
            total_trials: total,
            ..ProtocolConfig::default()
        }
    }

    #[test]
    fn hand_constructed_metrics_match_manual_computation() {
        // 6 Go (1 omission), 2 No-Go (1 commission).
        let trials = vec![
            trial(0, false, true, Some(500.0)),
            trial(1, false, true, Some(600.0)),
            trial(2, true, true, Some(250.0)), // commission error
            trial(3, false, false, None),      // omission error
            trial(4, false, true, Some(550.0)),
            trial(5, true, false, None),
            trial(6, false, true, Some(450.0)),
            trial(7, false, true, Some(400.0)),
        ];
        let raw = compute_raw_metrics(&trials, &tiny_protocol(8)).unwrap();

        assert_eq!(raw.n_valid, 8);
        assert_eq!(raw.n_go, 6);
        assert_eq!(raw.n_no_go, 2);
        assert!((raw.commission_error_rate - 0.5).abs() < 1e-12);
        assert!((raw.omission_error_rate - 1.0 / 6.0).abs() < 1e-12);
        assert!((raw.valid_trial_ratio - 1.0).abs() < 1e-12);

        // RTs over correct Go trials: 500, 600, 550, 450, 400.
        assert!((raw.mean_go_rt - 500.0).abs() < 1e-9);
        // Sample SD with n-1 = 4: variance = (0 + 10000 + 2500 + 2500 + 10000) / 4.
        let expected_sd = (25000.0f64 / 4.0).sqrt();
        assert!((raw.go_rt_sd - expected_sd).abs() < 1e-9);
    }

    #[test]
    fn invalid_trials_are_excluded_and_lower_the_ratio() {
        let mut trials = vec![
            trial(0, false, true, Some(500.0)),
            trial(1, false, true, Some(700.0)),
            trial(2, true, false, None),
            trial(3, false, false, None),
        ];
        trials[3].is_valid = false;

        let raw = compute_raw_metrics(&trials, &tiny_protocol(4)).unwrap();
        assert_eq!(raw.n_valid, 3);
        assert!((raw.valid_trial_ratio - 0.75).abs() < 1e-12);
        // The omission on the invalid trial does not count.
        assert_eq!(raw.omission_error_rate, 0.0);
    }

    #[test]
    fn zero_denominators_yield_zero_rates() {
        // All trials invalid: every denominator collapses.
        let mut trials = vec![trial(0, false, false, None), trial(1, true, false, None)];
        for t in &mut trials {
            t.is_valid = false;
        }
        let raw = compute_raw_metrics(&trials, &tiny_protocol(2)).unwrap();
        assert_eq!(raw.commission_error_rate, 0.0);
        assert_eq!(raw.omission_error_rate, 0.0);
        assert_eq!(raw.mean_go_rt, 0.0);
        assert_eq!(raw.go_rt_sd, 0.0);
        assert_eq!(raw.valid_trial_ratio, 0.0);
    }

    #[test]
    fn single_reaction_time_has_zero_sd() {
        let trials = vec![trial(0, false, true, Some(480.0)), trial(1, true, false, None)];
        let raw = compute_raw_metrics(&trials, &tiny_protocol(2)).unwrap();
        assert_eq!(raw.mean_go_rt, 480.0);
        assert_eq!(raw.go_rt_sd, 0.0);
    }

    #[test]
    fn wrong_trial_count_fails_fast() {
        let trials = vec![trial(0, false, true, Some(500.0))];
        let err = compute_raw_metrics(&trials, &tiny_protocol(60)).unwrap_err();
        assert!(matches!(
            err,
            EngineError::TrialCountMismatch {
                expected: 60,
                actual: 1
            }
        ));
    }
}
