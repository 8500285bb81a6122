//! Minute-of-day arithmetic for schedule placement.
//!
//! All times are plain `"HH:MM"` strings and all math is done in whole
//! minutes since midnight. Parsing is deliberately forgiving: anything
//! that does not yield two numeric components maps to `0` rather than
//! an error, so a malformed proposal degrades to midnight instead of
//! aborting the plan.

/// Parses an `"HH:MM"` string into minutes since midnight.
///
/// Returns `0` for anything unparseable, including missing components,
/// so callers never have to handle a failure path.
pub fn time_to_minutes(time: &str) -> i64 {
    let mut parts = time.split(':');
    let hours = parts.next().and_then(|part| part.trim().parse::<i64>().ok());
    let minutes = parts.next().and_then(|part| part.trim().parse::<i64>().ok());
    match (hours, minutes) {
        (Some(hours), Some(minutes)) => hours.saturating_mul(60).saturating_add(minutes),
        _ => 0,
    }
}

/// Formats minutes since midnight as `"HH:MM"`, wrapping onto the
/// 24-hour clock. Negative values wrap backwards from midnight, so
/// `-30` renders as `"23:30"`.
pub fn minutes_to_time(minutes: i64) -> String {
    let hours = minutes.div_euclid(60).rem_euclid(24);
    let mins = minutes.rem_euclid(60);
    format!("{hours:02}:{mins:02}")
}

/// Wraps a minute offset onto the 24-hour clock face.
///
/// Equivalent to `time_to_minutes(&minutes_to_time(minutes))` without
/// the string round trip. Probe candidates that run past midnight land
/// on the next clock day, e.g. `23:00 + 120` becomes `01:00`.
pub fn normalize_minutes(minutes: i64) -> i64 {
    minutes.div_euclid(60).rem_euclid(24) * 60 + minutes.rem_euclid(60)
}

/// Reports whether two half-open intervals `[start, start + duration)`
/// intersect. An interval with zero or negative duration is empty and
/// never overlaps anything.
pub fn overlaps(start_a: i64, duration_a: i64, start_b: i64, duration_b: i64) -> bool {
    if duration_a <= 0 || duration_b <= 0 {
        return false;
    }
    start_a < start_b.saturating_add(duration_b) && start_b < start_a.saturating_add(duration_a)
}
