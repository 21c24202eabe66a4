//! Trial sequence generation under combinatorial constraints.
//!
//! Both protocol variants use the same two-phase strategy: a bounded random
//! search for a constraint-satisfying placement, then a deterministic
//! constructive fallback. The fallback is the correctness guarantee, not an
//! optimization; generation must always terminate with a valid sequence.

use rand::seq::index::sample;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{ProtocolConfig, ProtocolVariant};
use crate::error::EngineError;
use crate::types::Trial;

/// Attempt budget for the random placement phase (continuous variant).
const MAX_PLACEMENT_ATTEMPTS: usize = 200;

/// Attempt budget for reshuffling a single block (block variant).
const MAX_BLOCK_SHUFFLES: usize = 50;

/// Generate one session's trial sequence for the configured protocol.
pub fn generate_trials<R: Rng + ?Sized>(
    config: &ProtocolConfig,
    rng: &mut R,
) -> Result<Vec<Trial>, EngineError> {
    match config.variant {
        ProtocolVariant::Continuous => generate_continuous(config, rng),
        ProtocolVariant::Block => generate_block_based(config, rng),
    }
}

// ==================== Continuous variant ====================

fn generate_continuous<R: Rng + ?Sized>(
    config: &ProtocolConfig,
    rng: &mut R,
) -> Result<Vec<Trial>, EngineError> {
    if config.no_go_count_min > config.no_go_count_max {
        return Err(EngineError::UnsatisfiableProtocol(format!(
            "no-go count range {}..={} is empty",
            config.no_go_count_min, config.no_go_count_max
        )));
    }

    let allowed = allowed_positions(config)?;
    let count = if config.no_go_count_min == config.no_go_count_max {
        config.no_go_count_min
    } else {
        rng.gen_range(config.no_go_count_min..=config.no_go_count_max)
    };

    // Satisfiable by construction: `count` non-adjacent slots need a span of
    // 2*count - 1 positions.
    if allowed.len() + 1 < 2 * count {
        return Err(EngineError::UnsatisfiableProtocol(format!(
            "{} allowed positions cannot hold {} non-adjacent no-go trials",
            allowed.len(),
            count
        )));
    }

    let positions = place_no_go_positions(&allowed, count, rng);

    let mut trials = Vec::with_capacity(config.total_trials);
    for index in 0..config.total_trials {
        if positions.binary_search(&index).is_ok() {
            trials.push(Trial::new(index, config.no_go_digit, true));
        } else {
            let digit = config.go_digits[rng.gen_range(0..config.go_digits.len())];
            trials.push(Trial::new(index, digit, false));
        }
    }
    Ok(trials)
}

fn allowed_positions(config: &ProtocolConfig) -> Result<Vec<usize>, EngineError> {
    let edge = config.edge_exclusion;
    if config.total_trials <= 2 * edge {
        return Err(EngineError::UnsatisfiableProtocol(format!(
            "edge exclusion of {} leaves no positions in {} trials",
            edge, config.total_trials
        )));
    }
    Ok((edge..config.total_trials - edge).collect())
}

/// Random placement with rejection on adjacency, falling back to a greedy
/// walk once the attempt budget is exhausted.
fn place_no_go_positions<R: Rng + ?Sized>(
    allowed: &[usize],
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let mut picks: Vec<usize> = sample(rng, allowed.len(), count)
            .into_iter()
            .map(|i| allowed[i])
            .collect();
        picks.sort_unstable();
        if picks.windows(2).all(|w| w[1] - w[0] >= 2) {
            return picks;
        }
    }
    greedy_no_go_positions(allowed, count)
}

/// Deterministic fallback: walk forward through the allowed span, spacing
/// picks evenly and always at least two slots apart. Cannot fail once the
/// satisfiability check in the caller has passed.
fn greedy_no_go_positions(allowed: &[usize], count: usize) -> Vec<usize> {
    let first = allowed[0];
    let last = allowed[allowed.len() - 1];
    let span = last - first;
    let stride = if count > 1 { (span / count).max(2) } else { 2 };

    let mut positions = Vec::with_capacity(count);
    let mut pos = first;
    for _ in 0..count {
        positions.push(pos);
        pos += stride;
    }
    positions
}

// ==================== Block variant ====================

fn generate_block_based<R: Rng + ?Sized>(
    config: &ProtocolConfig,
    rng: &mut R,
) -> Result<Vec<Trial>, EngineError> {
    if config.trials_per_block < 3 {
        return Err(EngineError::UnsatisfiableProtocol(
            "a block needs at least 3 trials to keep the no-go off both edges".into(),
        ));
    }
    if !config.stimulus_digits.contains(&config.no_go_digit) {
        return Err(EngineError::UnsatisfiableProtocol(format!(
            "no-go digit {} is not in the stimulus set",
            config.no_go_digit
        )));
    }

    let mut trials = Vec::with_capacity(config.blocks * config.trials_per_block);
    for block in 0..config.blocks {
        let digits = shuffle_block(config, rng);
        for (pos, &digit) in digits.iter().enumerate() {
            let index = block * config.trials_per_block + pos;
            trials.push(Trial::new(index, digit, digit == config.no_go_digit));
        }
    }
    Ok(trials)
}

/// Shuffle the digit set until the no-go digit is off the block edges, with
/// a deterministic swap into the block middle as the fallback.
fn shuffle_block<R: Rng + ?Sized>(config: &ProtocolConfig, rng: &mut R) -> Vec<u8> {
    let last = config.trials_per_block - 1;
    let mut digits = config.stimulus_digits.clone();

    for _ in 0..MAX_BLOCK_SHUFFLES {
        digits.shuffle(rng);
        if let Some(pos) = digits.iter().position(|&d| d == config.no_go_digit) {
            if pos != 0 && pos != last {
                return digits;
            }
        }
    }

    // The middle slot is always legal for blocks of 3 or more trials.
    if let Some(pos) = digits.iter().position(|&d| d == config.no_go_digit) {
        digits.swap(pos, config.trials_per_block / 2);
    }
    digits
}

// ==================== Validation ====================

/// Check a generated sequence against the protocol constraints. Returns a
/// list of human-readable violations; empty means valid. Testing and
/// debugging aid.
pub fn validate_sequence(trials: &[Trial], config: &ProtocolConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if trials.len() != config.total_trials {
        errors.push(format!(
            "expected {} trials, got {}",
            config.total_trials,
            trials.len()
        ));
        return errors;
    }

    for trial in trials {
        let expected_no_go = trial.digit == config.no_go_digit;
        if trial.is_no_go != expected_no_go {
            errors.push(format!(
                "trial {}: no-go flag {} does not match digit {}",
                trial.index, trial.is_no_go, trial.digit
            ));
        }
        if !trial.is_no_go && !config.go_digits.contains(&trial.digit) {
            errors.push(format!(
                "trial {}: digit {} is not in the go palette",
                trial.index, trial.digit
            ));
        }
    }

    match config.variant {
        ProtocolVariant::Continuous => validate_continuous(trials, config, &mut errors),
        ProtocolVariant::Block => validate_blocks(trials, config, &mut errors),
    }

    errors
}

fn validate_continuous(trials: &[Trial], config: &ProtocolConfig, errors: &mut Vec<String>) {
    let no_go_positions: Vec<usize> = trials
        .iter()
        .filter(|t| t.is_no_go)
        .map(|t| t.index)
        .collect();

    let count = no_go_positions.len();
    if count < config.no_go_count_min || count > config.no_go_count_max {
        errors.push(format!(
            "no-go count {} outside [{}, {}]",
            count, config.no_go_count_min, config.no_go_count_max
        ));
    }

    for w in no_go_positions.windows(2) {
        if w[1] - w[0] < 2 {
            errors.push(format!("adjacent no-go trials at {} and {}", w[0], w[1]));
        }
    }

    let edge = config.edge_exclusion;
    for &pos in &no_go_positions {
        if pos < edge || pos >= config.total_trials - edge {
            errors.push(format!("no-go at forbidden edge position {pos}"));
        }
    }
}

fn validate_blocks(trials: &[Trial], config: &ProtocolConfig, errors: &mut Vec<String>) {
    for block in 0..config.blocks {
        let start = block * config.trials_per_block;
        let block_trials = &trials[start..start + config.trials_per_block];

        let mut digits: Vec<u8> = block_trials.iter().map(|t| t.digit).collect();
        digits.sort_unstable();
        let mut expected = config.stimulus_digits.clone();
        expected.sort_unstable();
        if digits != expected {
            errors.push(format!("block {block}: digits are not a permutation"));
        }

        let no_go_offsets: Vec<usize> = block_trials
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_no_go)
            .map(|(i, _)| i)
            .collect();
        if no_go_offsets.len() != 1 {
            errors.push(format!(
                "block {block}: expected 1 no-go, got {}",
                no_go_offsets.len()
            ));
        } else {
            let pos = no_go_offsets[0];
            if pos == 0 || pos == config.trials_per_block - 1 {
                errors.push(format!("block {block}: no-go at edge position {pos}"));
            }
        }
    }
}
