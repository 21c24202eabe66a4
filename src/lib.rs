//! # brainscore - sustained-attention scoring and forecasting engine
//!
//! Pure-Rust core for a SART-variant attention test:
//!
//! - **Generation** - constrained-random trial sequences with a
//!   deterministic fallback placement
//! - **Scoring** - raw metrics to a versioned 0-100 composite score
//! - **Forecasting** - expected score for "right now" from sparse session
//!   history blended with a fixed circadian curve
//!
//! No I/O of its own: the crate consumes a snapshot of session records and
//! returns plain values. Persistence and presentation live outside; the
//! [`store`] module defines the collaborator seam and a fallback-degrading
//! service on top of it.
//!
//! ## Module structure
//!
//! - [`config`] - protocol definitions and versioned scoring policy
//! - [`types`] - shared data model
//! - [`error`] - failure taxonomy
//! - [`generator`] - trial sequence generation
//! - [`metrics`] - trial list to raw metrics
//! - [`scoring`] - composite score calculation
//! - [`validity`] - session validity assessment
//! - [`circadian`] - fixed 24-hour reference curve
//! - [`baseline`] - per-user baseline estimation
//! - [`forecast`] - point forecast with label and confidence
//! - [`history`] - daily aggregation and deviation statistics
//! - [`insights`] - qualitative cognitive-dimension feedback
//! - [`store`] - storage collaborator boundary
//! - [`engine`] - session scoring facade
//!
//! ## Example
//!
//! ```rust
//! use brainscore::{generate_trials, score_session, ProtocolConfig, ScorePolicy};
//! use rand::thread_rng;
//!
//! let protocol = ProtocolConfig::default();
//! let policy = ScorePolicy::default();
//!
//! let trials = generate_trials(&protocol, &mut thread_rng())?;
//! // ... the interaction layer fills in responses and reaction times ...
//! let outcome = score_session(&trials, &protocol, &policy)?;
//! println!("score: {}", outcome.score.brain_score);
//! # Ok::<(), brainscore::EngineError>(())
//! ```

pub mod baseline;
pub mod circadian;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod generator;
pub mod history;
pub mod insights;
pub mod metrics;
pub mod scoring;
pub mod store;
pub mod types;
pub mod validity;

pub use types::*;

pub use config::{
    BaselineParams, BlendWeights, FloorRule, ForecastParams, FormulaVersion, ProtocolConfig,
    ProtocolVariant, ScorePolicy,
};

pub use error::{EngineError, StoreError};

pub use generator::{generate_trials, validate_sequence};

pub use metrics::compute_raw_metrics;

pub use scoring::calculate_score;

pub use validity::assess_validity;

pub use engine::{score_session, SessionOutcome};

pub use circadian::{circadian_for_hour, circadian_for_time, circadian_points, CIRCADIAN_TABLE};

pub use baseline::user_baseline;

pub use forecast::{forecast_now, label_for_score};

pub use history::{aggregate_daily_scores, today_deviations, weekly_stats};

pub use insights::{interpret_dimensions, session_insights, InsightThresholds};

pub use store::{parse_session_rows, ForecastService, MemoryStore, SessionStore};
