//! The Monday-first week and default start-time suggestions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar weekday. Plans always start on Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Monday-first week ordering used for every plan.
pub static WEEK: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

impl Weekday {
    /// The capitalized English name, as used in schedule output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Zero-based position within the Monday-first week.
    pub fn index(self) -> usize {
        WEEK.iter().position(|&day| day == self).unwrap_or(0)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weekday: {0}")]
pub struct UnknownWeekday(pub String);

impl FromStr for Weekday {
    type Err = UnknownWeekday;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monday" => Ok(Self::Monday),
            "tuesday" => Ok(Self::Tuesday),
            "wednesday" => Ok(Self::Wednesday),
            "thursday" => Ok(Self::Thursday),
            "friday" => Ok(Self::Friday),
            "saturday" => Ok(Self::Saturday),
            "sunday" => Ok(Self::Sunday),
            _ => Err(UnknownWeekday(s.to_string())),
        }
    }
}

impl Serialize for Weekday {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Weekday {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The leading slice of the week covered by a plan.
///
/// Durations are clamped to one through seven days, so a ten-day
/// request still yields a single week and a zero or negative request
/// yields Monday alone.
pub fn active_days(plan_duration_days: i64) -> &'static [Weekday] {
    let len = usize::try_from(plan_duration_days.clamp(1, 7)).unwrap_or(1);
    &WEEK[..len]
}

/// The canonical start time for a named block of the day, if the label
/// is one of the six known blocks.
pub fn block_start(label: &str) -> Option<&'static str> {
    match label {
        "morning" => Some("09:00"),
        "afternoon" => Some("14:00"),
        "evening" => Some("18:00"),
        "breakfast" => Some("08:00"),
        "lunch" => Some("12:30"),
        "dinner" => Some("19:00"),
        _ => None,
    }
}

/// Suggests a start time for an event on `day`.
///
/// A preference that already looks like a clock time (contains `':'`)
/// is passed through untouched and a known block label maps through
/// [`block_start`]. Anything else falls back to a day-dependent hour
/// that cycles 09:00, 11:00, 13:00 across the week so unlabelled
/// events do not all pile onto the same slot.
pub fn suggest_default_start(day: Weekday, preferred: &str) -> String {
    if !preferred.is_empty() {
        if preferred.contains(':') {
            return preferred.to_string();
        }
        if let Some(start) = block_start(preferred) {
            return start.to_string();
        }
    }
    let base_hour = 9 + (day.index() % 3) * 2;
    format!("{base_hour:02}:00")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_is_monday_first() {
        assert_eq!(WEEK[0], Weekday::Monday);
        assert_eq!(WEEK[6], Weekday::Sunday);
        assert_eq!(Weekday::Monday.index(), 0);
        assert_eq!(Weekday::Sunday.index(), 6);
    }

    #[test]
    fn parses_any_case() {
        assert_eq!("monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("WEDNESDAY".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert_eq!(" Friday ".parse::<Weekday>().unwrap(), Weekday::Friday);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "Funday".parse::<Weekday>().unwrap_err();
        assert_eq!(err.to_string(), "unknown weekday: Funday");
    }

    #[test]
    fn serializes_as_capitalized_name() {
        let json = serde_json::to_string(&Weekday::Tuesday).unwrap();
        assert_eq!(json, "\"Tuesday\"");
        let day: Weekday = serde_json::from_str("\"Tuesday\"").unwrap();
        assert_eq!(day, Weekday::Tuesday);
    }

    #[test]
    fn active_days_clamps_to_one_week() {
        assert_eq!(active_days(10).len(), 7);
        assert_eq!(active_days(7).len(), 7);
        assert_eq!(active_days(3), &WEEK[..3]);
    }

    #[test]
    fn active_days_never_empty() {
        assert_eq!(active_days(0), &[Weekday::Monday]);
        assert_eq!(active_days(-5), &[Weekday::Monday]);
    }

    #[test]
    fn block_table_is_fixed() {
        assert_eq!(block_start("morning"), Some("09:00"));
        assert_eq!(block_start("afternoon"), Some("14:00"));
        assert_eq!(block_start("evening"), Some("18:00"));
        assert_eq!(block_start("breakfast"), Some("08:00"));
        assert_eq!(block_start("lunch"), Some("12:30"));
        assert_eq!(block_start("dinner"), Some("19:00"));
        assert_eq!(block_start("night"), None);
    }

    #[test]
    fn explicit_clock_time_passes_through() {
        assert_eq!(suggest_default_start(Weekday::Monday, "7:15"), "7:15");
    }

    #[test]
    fn known_label_maps_to_block_start() {
        assert_eq!(suggest_default_start(Weekday::Sunday, "lunch"), "12:30");
    }

    #[test]
    fn unknown_label_cycles_by_day() {
        assert_eq!(suggest_default_start(Weekday::Monday, "whenever"), "09:00");
        assert_eq!(suggest_default_start(Weekday::Tuesday, "whenever"), "11:00");
        assert_eq!(suggest_default_start(Weekday::Wednesday, "whenever"), "13:00");
        assert_eq!(suggest_default_start(Weekday::Thursday, "whenever"), "09:00");
    }

    #[test]
    fn empty_label_uses_day_heuristic() {
        assert_eq!(suggest_default_start(Weekday::Tuesday, ""), "11:00");
    }
}
