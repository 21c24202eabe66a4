//! Integration tests for the store-backed forecast pipeline.

use chrono::{DateTime, Duration, TimeZone, Utc};

use brainscore::{
    ConfidenceLevel, ForecastService, MemoryStore, SessionRecord, CIRCADIAN_TABLE,
};

fn at(d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, h, mi, 0).unwrap()
}

fn store_with(user_id: &str, sessions: &[(f64, DateTime<Utc>)]) -> MemoryStore {
    let mut store = MemoryStore::new();
    for &(score, timestamp) in sessions {
        store.insert(user_id, SessionRecord { score, timestamp });
    }
    store
}

#[test]
fn new_user_sees_the_circadian_curve() {
    let service = ForecastService::new(MemoryStore::new());
    let now = at(10, 14, 0);

    let baseline = service.baseline("newcomer", now);
    for (hour, point) in baseline.iter().enumerate() {
        assert_eq!(point.expected(), CIRCADIAN_TABLE[hour]);
        assert!(!point.has_user_data);
    }

    let forecast = service.forecast("newcomer", now);
    assert_eq!(forecast.forecast_now, Some(CIRCADIAN_TABLE[14]));
    assert_eq!(forecast.confidence, ConfidenceLevel::Low);
}

#[test]
fn fresh_measurement_drives_the_dashboard_value() {
    let now = at(10, 14, 30);
    let mut sessions: Vec<(f64, DateTime<Utc>)> = (1..=6)
        .map(|d| (68.0, at(d, 9, 0)))
        .collect();
    sessions.push((91.0, now - Duration::minutes(2)));

    let service = ForecastService::new(store_with("u1", &sessions));
    let forecast = service.forecast("u1", now);
    let value = forecast.forecast_now.unwrap();
    assert!(
        (value - 91.0).abs() <= 2.0,
        "dashboard value {value} should match the just-measured 91"
    );
}

#[test]
fn history_personalizes_the_baseline_without_todays_tests() {
    let now = at(20, 14, 0);
    // 16 prior-day morning sessions around 62: stable phase.
    let sessions: Vec<(f64, DateTime<Utc>)> = (1..=16)
        .map(|d| (62.0, at(d, 8, 30)))
        .collect();
    let service = ForecastService::new(store_with("u1", &sessions));

    let baseline = service.baseline("u1", now);
    assert!(baseline[8].has_user_data);
    assert!(baseline[9].has_user_data);
    // Personalized value sits between the user's level and the curve.
    let v = baseline[8].expected();
    assert!(v > 60.0 && v < 70.0, "unexpected baseline {v}");
    // Untested evening hours stay circadian.
    assert!(!baseline[22].has_user_data);
}

#[test]
fn today_deviations_compare_against_the_personal_baseline() {
    let now = at(10, 18, 0);
    let mut sessions: Vec<(f64, DateTime<Utc>)> = (1..=3)
        .map(|d| (70.0, at(d, 10, 0)))
        .collect();
    // Two tests today.
    sessions.push((82.0, at(10, 10, 15)));
    sessions.push((64.0, at(10, 14, 30)));

    let service = ForecastService::new(store_with("u1", &sessions));
    let deviations = service.today_deviations("u1", now);

    assert_eq!(deviations.tests.len(), 2);
    assert_eq!(deviations.tests[0].score, 82.0);
    assert_eq!(deviations.tests[0].hour, 10);
    let baseline = service.baseline("u1", now);
    assert_eq!(
        deviations.tests[0].delta,
        82.0 - baseline[10].expected()
    );
    assert!(deviations.average_delta.is_some());
}
