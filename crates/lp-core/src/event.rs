//! Scheduled events and the per-day schedule they live in.

use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::clock::time_to_minutes;
use crate::week::Weekday;

/// What kind of entry an event is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Task,
    Meal,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Task => "task",
            Self::Meal => "meal",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "task" => Ok(Self::Task),
            "meal" => Ok(Self::Meal),
            _ => Err(UnknownEventType(s.to_string())),
        }
    }
}

impl Serialize for EventType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for EventType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single placed entry on the weekly schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start_time: String,
    pub duration_minutes: i64,
    pub day: Weekday,
    #[serde(rename = "type")]
    pub kind: EventType,
}

impl Event {
    /// Start of the event in minutes since midnight. Malformed start
    /// times sort as midnight.
    pub fn start_minutes(&self) -> i64 {
        time_to_minutes(&self.start_time)
    }
}

/// A week's worth of placed events, keyed by active day.
///
/// Days are fixed at construction and keep their Monday-first order;
/// a plan covering three days serializes as exactly three keys even
/// when some of them hold no events.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schedule {
    days: Vec<(Weekday, Vec<Event>)>,
}

impl Schedule {
    /// An empty schedule covering the given days, in the given order.
    pub fn for_days(days: &[Weekday]) -> Self {
        Self {
            days: days.iter().map(|&day| (day, Vec::new())).collect(),
        }
    }

    /// The days this schedule covers, in order.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        self.days.iter().map(|(day, _)| *day)
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Events placed on `day`, empty when the day is not covered.
    pub fn events(&self, day: Weekday) -> &[Event] {
        self.days
            .iter()
            .find(|(d, _)| *d == day)
            .map_or(&[], |(_, events)| events.as_slice())
    }

    /// Adds an event to its day. Events addressed at a day outside the
    /// covered range are dropped.
    pub fn push(&mut self, event: Event) {
        if let Some((_, events)) = self.days.iter_mut().find(|(d, _)| *d == event.day) {
            events.push(event);
        }
    }

    /// Stable-sorts each day's events by start time, so same-minute
    /// events keep their placement order.
    pub fn sort_events(&mut self) {
        for (_, events) in &mut self.days {
            events.sort_by_key(Event::start_minutes);
        }
    }

    pub fn total_events(&self) -> usize {
        self.days.iter().map(|(_, events)| events.len()).sum()
    }

    pub fn has_events(&self) -> bool {
        self.days.iter().any(|(_, events)| !events.is_empty())
    }

    /// How many placed events are of the given kind.
    pub fn count_kind(&self, kind: EventType) -> usize {
        self.days
            .iter()
            .flat_map(|(_, events)| events)
            .filter(|event| event.kind == kind)
            .count()
    }

    /// Iterates days in order with their placed events.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &[Event])> {
        self.days
            .iter()
            .map(|(day, events)| (*day, events.as_slice()))
    }
}

impl Serialize for Schedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.days.len()))?;
        for (day, events) in &self.days {
            map.serialize_entry(day.as_str(), events)?;
        }
        map.end()
    }
}
