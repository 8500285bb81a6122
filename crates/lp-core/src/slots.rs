//! Conflict detection and alternative-slot probing within a day.

use crate::clock::{normalize_minutes, overlaps, time_to_minutes};
use crate::event::Event;

/// Events already on the day that would collide with a candidate slot.
pub fn find_conflicts(events: &[Event], start_minutes: i64, duration_minutes: i64) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| {
            overlaps(
                start_minutes,
                duration_minutes,
                event.start_minutes(),
                event.duration_minutes,
            )
        })
        .collect()
}

/// Probes offsets from `base_minutes` in order and returns the first
/// conflict-free slot, wrapped onto the 24-hour clock. `None` when
/// every probe collides.
pub fn find_alternative_slot(
    events: &[Event],
    base_minutes: i64,
    duration_minutes: i64,
    probes: &[i64],
) -> Option<i64> {
    for &offset in probes {
        let candidate = normalize_minutes(base_minutes.saturating_add(offset));
        if find_conflicts(events, candidate, duration_minutes).is_empty() {
            return Some(candidate);
        }
    }
    None
}

/// Convenience wrapper for clock-time inputs, used by tests and by
/// callers that still hold the `"HH:MM"` string.
pub fn find_conflicts_at<'a>(
    events: &'a [Event],
    start_time: &str,
    duration_minutes: i64,
) -> Vec<&'a Event> {
    find_conflicts(events, time_to_minutes(start_time), duration_minutes)
}
