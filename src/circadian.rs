//! Fixed circadian performance curve.
//!
//! A universal 24-value reference for expected cognitive performance by hour
//! of day: nightly trough at 03:00, morning rise from 06:00, peak window
//! 10:00-12:00, a post-lunch dip at 14:00, a second plateau until 16:00 and
//! an evening decline. The values are policy constants and are never adjusted
//! at runtime; personalization happens in the baseline estimator on top of
//! this curve.

use crate::types::BaselinePoint;

/// Expected performance (0-100) per hour of day, index = hour.
pub const CIRCADIAN_TABLE: [f64; 24] = [
    38.0, 36.0, 35.0, 35.0, 36.0, 38.0, // 00:00-05:00, trough at 03:00
    40.0, 50.0, 60.0, 70.0, // 06:00-09:00, morning rise
    80.0, 80.0, 80.0, // 10:00-12:00, peak window
    78.0, 75.0, // 13:00-14:00, post-lunch dip
    80.0, 80.0, 78.0, 75.0, 70.0, // 15:00-19:00, second plateau and decline
    65.0, 60.0, 50.0, 42.0, // 20:00-23:00, evening
];

/// Circadian value for an hour of day, normalizing hours outside 0-23.
pub fn circadian_for_hour(hour: i32) -> f64 {
    let h = ((hour % 24) + 24) % 24;
    CIRCADIAN_TABLE[h as usize]
}

/// Circadian value for an arbitrary time of day, linearly interpolated
/// between the surrounding whole hours and rounded to a whole number.
pub fn circadian_for_time(hour: i32, minute: u32) -> f64 {
    let current = circadian_for_hour(hour);
    if minute == 0 {
        return current;
    }
    let next = circadian_for_hour(hour + 1);
    let fraction = f64::from(minute.min(59)) / 60.0;
    (current + (next - current) * fraction).round()
}

/// The pure-fallback baseline: 24 points carrying only the circadian value,
/// used whenever no usable user history exists.
pub fn circadian_points() -> Vec<BaselinePoint> {
    (0..24)
        .map(|hour| BaselinePoint {
            hour,
            circadian_value: CIRCADIAN_TABLE[hour as usize],
            user_value: None,
            has_user_data: false,
        })
        .collect()
}
