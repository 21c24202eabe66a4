//! Storage collaborator boundary.
//!
//! The core stays pure over history snapshots; this module owns the seam to
//! whatever persists sessions. A fetch failure is never fatal: the service
//! logs it and degrades to the circadian fallback, so a storage outage costs
//! personalization, not availability.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use tracing::{debug, warn};

use crate::baseline::user_baseline;
use crate::circadian::circadian_points;
use crate::config::{BaselineParams, ForecastParams};
use crate::error::{EngineError, StoreError};
use crate::forecast::forecast_now;
use crate::history::today_deviations;
use crate::types::{BaselinePoint, ForecastResult, SessionRecord, TodayDeviations};

/// Read access to persisted sessions. Implementations return records with
/// `timestamp >= since`, order unspecified.
pub trait SessionStore {
    fn fetch_sessions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, StoreError>;
}

/// In-memory store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    sessions: HashMap<String, Vec<SessionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, user_id: &str, record: SessionRecord) {
        self.sessions
            .entry(user_id.to_string())
            .or_default()
            .push(record);
    }
}

impl SessionStore for MemoryStore {
    fn fetch_sessions(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SessionRecord>, StoreError> {
        Ok(self
            .sessions
            .get(user_id)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.timestamp >= since)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Parse raw (score, RFC 3339 timestamp) rows into session records, failing
/// fast on the first malformed row.
pub fn parse_session_rows(rows: &[(f64, String)]) -> Result<Vec<SessionRecord>, EngineError> {
    rows.iter()
        .map(|(score, raw_ts)| {
            if !score.is_finite() || !(0.0..=100.0).contains(score) {
                return Err(EngineError::MalformedHistory(format!(
                    "score {score} outside 0-100"
                )));
            }
            let timestamp = DateTime::parse_from_rfc3339(raw_ts)
                .map_err(|e| {
                    EngineError::MalformedHistory(format!("bad timestamp {raw_ts:?}: {e}"))
                })?
                .with_timezone(&Utc);
            Ok(SessionRecord {
                score: *score,
                timestamp,
            })
        })
        .collect()
}

/// Wires a [`SessionStore`] to the baseline and forecast computations.
pub struct ForecastService<S> {
    store: S,
    baseline_params: BaselineParams,
    forecast_params: ForecastParams,
}

impl<S: SessionStore> ForecastService<S> {
    pub fn new(store: S) -> Self {
        Self::with_params(store, BaselineParams::default(), ForecastParams::default())
    }

    pub fn with_params(
        store: S,
        baseline_params: BaselineParams,
        forecast_params: ForecastParams,
    ) -> Self {
        Self {
            store,
            baseline_params,
            forecast_params,
        }
    }

    fn fetch_window(&self, user_id: &str, now: DateTime<Utc>) -> Option<Vec<SessionRecord>> {
        let since = now - Duration::days(self.baseline_params.lookback_days);
        match self.store.fetch_sessions(user_id, since) {
            Ok(sessions) => {
                debug!(user_id, count = sessions.len(), "loaded session history");
                Some(sessions)
            }
            Err(err) => {
                warn!(user_id, error = %err, "session fetch failed, degrading to circadian fallback");
                None
            }
        }
    }

    /// The 24-hour baseline for a user, circadian-only when storage is down.
    pub fn baseline(&self, user_id: &str, now: DateTime<Utc>) -> Vec<BaselinePoint> {
        match self.fetch_window(user_id, now) {
            Some(sessions) => user_baseline(&sessions, now, &self.baseline_params),
            None => circadian_points(),
        }
    }

    /// The forecast for `now`, computed over an empty snapshot when storage
    /// is down (pure circadian value, low confidence).
    pub fn forecast(&self, user_id: &str, now: DateTime<Utc>) -> ForecastResult {
        let sessions = self.fetch_window(user_id, now).unwrap_or_default();
        forecast_now(&sessions, now, &self.baseline_params, &self.forecast_params)
    }

    /// Today's sessions compared against the user baseline.
    pub fn today_deviations(&self, user_id: &str, now: DateTime<Utc>) -> TodayDeviations {
        let baseline = self.baseline(user_id, now);
        let start_of_today = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let sessions = match self.store.fetch_sessions(user_id, start_of_today) {
            Ok(sessions) => sessions,
            Err(err) => {
                warn!(user_id, error = %err, "session fetch failed, reporting no deviations");
                Vec::new()
            }
        };
        today_deviations(&sessions, &baseline, now)
    }
}
