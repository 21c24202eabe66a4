//! End-to-end scoring tests over hand-built 90-trial sessions.

use brainscore::{score_session, InvalidReason, ProtocolConfig, ScorePolicy, Trial};

/// A realistic mid-good block session:
/// - 10 no-go trials, 2 commission errors
/// - 80 go trials, 4 technically invalid, 5 omissions
/// - 71 correct go responses, mean RT 550 ms, sample SD exactly 90 ms
fn mid_good_session() -> Vec<Trial> {
    let mut trials = Vec::with_capacity(90);

    for i in 0..10 {
        let mut t = Trial::new(i, 3, true);
        if i < 2 {
            t.responded = true;
            t.reaction_time_ms = Some(260.0);
        }
        trials.push(t);
    }

    let mut rts = Vec::with_capacity(71);
    for _ in 0..35 {
        rts.push(460.0);
        rts.push(640.0);
    }
    rts.push(550.0);

    let mut rt_iter = rts.into_iter();
    for i in 10..90 {
        let mut t = Trial::new(i, 5, false);
        if i < 14 {
            t.is_valid = false; // 4 compromised trials
        } else if i < 19 {
            // 5 omissions: valid go trials without a response
        } else {
            t.responded = true;
            t.reaction_time_ms = rt_iter.next();
        }
        trials.push(t);
    }

    trials
}

#[test]
fn ninety_trial_session_scores_deterministically() {
    let config = ProtocolConfig::block();
    let policy = ScorePolicy::default();
    let trials = mid_good_session();

    let outcome = score_session(&trials, &config, &policy).unwrap();
    let raw = &outcome.score.raw_metrics;

    assert_eq!(raw.n_valid, 86);
    assert_eq!(raw.n_go, 76);
    assert_eq!(raw.n_no_go, 10);
    assert!((raw.commission_error_rate - 0.2).abs() < 1e-12);
    assert!((raw.omission_error_rate - 5.0 / 76.0).abs() < 1e-12);
    assert!((raw.mean_go_rt - 550.0).abs() < 1e-9);
    assert!((raw.go_rt_sd - 90.0).abs() < 1e-9);
    assert!((raw.valid_trial_ratio - 86.0 / 90.0).abs() < 1e-12);

    // Sub-scores from the v1.1 constants:
    // accuracy: (1 - 0.7*5/76 - 0.3*0.2)^1.3 * 100 = 86.44 → 86
    // speed: 550 on the 300→600 ramp = 93.33
    // consistency: 90 on the 80→250 ramp = 96.47
    // discipline: 0.9556 ≥ 0.95 → 100
    assert_eq!(outcome.score.sub_scores.accuracy_score, 86.0);
    assert_eq!(outcome.score.sub_scores.speed_score, 93.3);
    assert_eq!(outcome.score.sub_scores.consistency_score, 96.5);
    assert_eq!(outcome.score.sub_scores.discipline_score, 100.0);

    // Composite blends the unrounded sub-score values:
    // 0.6 * weighted mean (92.5843) + 0.4 * min (86) = 89.9506 → 90.0.
    assert_eq!(outcome.score.brain_score, 90.0);
    assert!(outcome.validity.is_valid);
}

#[test]
fn scoring_is_byte_for_byte_reproducible() {
    let config = ProtocolConfig::block();
    let policy = ScorePolicy::default();
    let trials = mid_good_session();

    let a = score_session(&trials, &config, &policy).unwrap();
    let b = score_session(&trials, &config, &policy).unwrap();
    assert_eq!(a, b);

    let json_a = serde_json::to_string(&a).unwrap();
    let json_b = serde_json::to_string(&b).unwrap();
    assert_eq!(json_a, json_b);
}

#[test]
fn outcome_serializes_camel_case() {
    let config = ProtocolConfig::block();
    let policy = ScorePolicy::default();
    let outcome = score_session(&mid_good_session(), &config, &policy).unwrap();

    let json = serde_json::to_string(&outcome).unwrap();
    assert!(json.contains("\"brainScore\""));
    assert!(json.contains("\"accuracyScore\""));
    assert!(json.contains("\"rawMetrics\""));
    assert!(json.contains("\"isValid\""));
    // Valid sessions omit the reason entirely.
    assert!(!json.contains("\"reason\""));
}

#[test]
fn spam_session_is_flagged_and_floored() {
    let config = ProtocolConfig::block();
    let policy = ScorePolicy::default();

    // Button-mashing: every trial answered at 200 ms, no-go trials included.
    let mut trials = Vec::with_capacity(90);
    for i in 0..90 {
        let is_no_go = i < 10;
        let mut t = Trial::new(i, if is_no_go { 3 } else { 5 }, is_no_go);
        t.responded = true;
        t.reaction_time_ms = Some(200.0);
        trials.push(t);
    }

    let outcome = score_session(&trials, &config, &policy).unwrap();
    assert!(!outcome.validity.is_valid);
    assert_eq!(
        outcome.validity.reason,
        Some(InvalidReason::TooManyUltrafast)
    );
    // The score still exists for display.
    assert!(outcome.score.brain_score <= 100.0);
}

#[test]
fn formula_versions_diverge_on_the_same_session() {
    let config = ProtocolConfig::block();
    let trials = mid_good_session();

    let v1 = score_session(&trials, &config, &ScorePolicy::v1())
        .unwrap()
        .score
        .brain_score;
    let v1_1 = score_session(&trials, &config, &ScorePolicy::v1_1())
        .unwrap()
        .score
        .brain_score;
    assert_ne!(v1, v1_1);
}
