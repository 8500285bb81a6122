//! The placement engine: distributes proposals across the active days
//! of a week and resolves slot conflicts.
//!
//! Placement is deterministic and total. Tasks are dealt round-robin
//! across the active days in proposal order, meals land on whichever
//! day their proposal addresses, and every collision is either moved
//! to the first free probe offset or left in place when the probes are
//! exhausted. Nothing here returns an error; malformed input degrades
//! to defaults.

use serde::Serialize;

use crate::clock::{minutes_to_time, time_to_minutes};
use crate::event::{Event, EventType, Schedule};
use crate::proposals::{MealDayProposal, MealProposal, TaskProposal};
use crate::slots::{find_alternative_slot, find_conflicts};
use crate::week::{Weekday, active_days, block_start, suggest_default_start};

/// Probe offsets, in minutes, tried when a task's preferred slot is
/// taken. Tasks only ever move later.
pub const TASK_PROBES: [i64; 5] = [60, 120, 180, 240, 300];

/// Probe offsets for meals, alternating after and before the preferred
/// slot so dinner does not drift into the night.
pub const MEAL_PROBES: [i64; 4] = [30, -30, 60, -60];

/// A fully placed week.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementResult {
    pub schedule: Schedule,
    pub conflicts_resolved: usize,
    pub total_events: usize,
}

/// Places task and meal proposals onto a schedule covering
/// `plan_duration_days` days (clamped to one week).
///
/// Tasks are distributed round-robin: with `n` tasks over `d` days
/// every day receives `n / d` tasks and the first `n % d` days one
/// extra, consumed strictly in proposal order. Meal days resolve their
/// target day themselves and degrade to the first active day when the
/// addressing is unusable.
pub fn build_schedule(
    tasks: &[TaskProposal],
    meal_days: &[MealDayProposal],
    plan_duration_days: i64,
) -> PlacementResult {
    let days = active_days(plan_duration_days);
    let mut schedule = Schedule::for_days(days);
    let mut conflicts_resolved = 0usize;

    tracing::debug!(
        tasks = tasks.len(),
        meal_days = meal_days.len(),
        days = days.len(),
        "placing proposals"
    );

    if !tasks.is_empty() {
        let per_day = tasks.len() / days.len();
        let remainder = tasks.len() % days.len();
        let mut queue = tasks.iter();
        for (position, &day) in days.iter().enumerate() {
            let quota = per_day + usize::from(position < remainder);
            for task in queue.by_ref().take(quota) {
                place_task(&mut schedule, &mut conflicts_resolved, day, task);
            }
        }
    }

    for meal_day in meal_days {
        let day = resolve_meal_day(meal_day, days);
        for meal in &meal_day.meals {
            place_meal(&mut schedule, &mut conflicts_resolved, day, meal);
        }
    }

    schedule.sort_events();
    let total_events = schedule.total_events();
    tracing::debug!(total_events, conflicts_resolved, "schedule built");

    PlacementResult {
        schedule,
        conflicts_resolved,
        total_events,
    }
}

fn place_task(
    schedule: &mut Schedule,
    conflicts_resolved: &mut usize,
    day: Weekday,
    task: &TaskProposal,
) {
    let block = task.preferred_time_block.as_str();
    let start_time = match block_start(block) {
        Some(start) => start.to_string(),
        None => suggest_default_start(day, block),
    };
    let start_time = settle(
        schedule,
        conflicts_resolved,
        day,
        start_time,
        task.duration_minutes,
        &TASK_PROBES,
    );
    schedule.push(Event {
        title: task.title.clone(),
        start_time,
        duration_minutes: task.duration_minutes,
        day,
        kind: EventType::Task,
    });
}

fn place_meal(
    schedule: &mut Schedule,
    conflicts_resolved: &mut usize,
    day: Weekday,
    meal: &MealProposal,
) {
    let kind = meal.kind.as_str();
    let start_time = block_start(kind).unwrap_or("19:00").to_string();
    let duration_minutes = match meal.duration_minutes {
        Some(0) | None => 30,
        Some(minutes) => minutes,
    };
    let start_time = settle(
        schedule,
        conflicts_resolved,
        day,
        start_time,
        duration_minutes,
        &MEAL_PROBES,
    );
    schedule.push(Event {
        title: format!("{} ({kind})", meal.name),
        start_time,
        duration_minutes,
        day,
        kind: EventType::Meal,
    });
}

/// Resolves the requested slot against what is already on the day.
///
/// A clean slot is kept as-is. A colliding slot moves to the first
/// free probe offset and counts one resolved conflict; when every
/// probe is taken the event stays at the requested time and every
/// event it collides with counts as an unresolved conflict.
fn settle(
    schedule: &Schedule,
    conflicts_resolved: &mut usize,
    day: Weekday,
    start_time: String,
    duration_minutes: i64,
    probes: &[i64],
) -> String {
    let start_minutes = time_to_minutes(&start_time);
    let events = schedule.events(day);
    let conflicts = find_conflicts(events, start_minutes, duration_minutes);
    if conflicts.is_empty() {
        return start_time;
    }
    match find_alternative_slot(events, start_minutes, duration_minutes, probes) {
        Some(slot) => {
            *conflicts_resolved += 1;
            minutes_to_time(slot)
        }
        None => {
            *conflicts_resolved += conflicts.len();
            start_time
        }
    }
}

fn resolve_meal_day(meal_day: &MealDayProposal, days: &[Weekday]) -> Weekday {
    let explicit = meal_day
        .day
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| meal_day.day_name.as_deref().filter(|name| !name.is_empty()));
    if let Some(name) = explicit {
        if let Ok(day) = name.parse::<Weekday>() {
            if days.contains(&day) {
                return day;
            }
        }
    }
    if let Some(index) = meal_day.day_index {
        if index >= 1 {
            if let Some(&day) = usize::try_from(index).ok().and_then(|i| days.get(i - 1)) {
                return day;
            }
        }
    }
    days.first().copied().unwrap_or(Weekday::Monday)
}
