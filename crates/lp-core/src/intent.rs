//! Goal and constraint extraction from free-form planning requests.
//!
//! The extractor is a keyword heuristic, not a parser. It exists so a
//! plan can always be produced offline; a language model may replace
//! its output entirely, in which case these rules are never consulted.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pre-compiled regex for budget amounts like `$120`, `₹1500` or
/// `rs. 500`, matched against lowercased text.
static BUDGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\$|₹|rs\.?)\s?(\d+(?:\.\d+)?)").unwrap());

/// Pre-compiled regex for plan durations like `5 days` or `2 weeks`.
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*(day|days|week|weeks)").unwrap());

/// Constraints carried alongside the goals of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    #[serde(
        default,
        alias = "dietary",
        alias = "diet_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub diet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_budget: Option<f64>,
}

/// What the user asked for, in structured form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub constraints: Constraints,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(default = "default_plan_days", alias = "plan_days")]
    pub plan_duration_days: i64,
}

fn default_plan_days() -> i64 {
    7
}

impl Default for Intent {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            constraints: Constraints::default(),
            priorities: Vec::new(),
            plan_duration_days: default_plan_days(),
        }
    }
}

impl Intent {
    /// The plan length the schedule should cover. Zero means
    /// unspecified and falls back to a full week.
    pub fn effective_plan_days(&self) -> i64 {
        if self.plan_duration_days == 0 {
            7
        } else {
            self.plan_duration_days
        }
    }
}

/// Extracts goals, constraints and plan length from a request using
/// keyword rules. Never fails; an unrecognizable request yields the
/// default goal set and a one-week plan.
pub fn extract_intent(text: &str) -> Intent {
    let text = text.to_lowercase();

    let mut goals = Vec::new();
    if contains_any(&text, &["work", "office", "project"]) {
        goals.push("work".to_string());
    }
    if contains_any(&text, &["cook", "meal"]) {
        goals.push("meals".to_string());
    }
    if contains_any(&text, &["exercise", "workout", "gym"]) {
        goals.push("exercise".to_string());
    }
    if contains_any(&text, &["grocery", "shopping", "groceries"]) {
        goals.push("shopping".to_string());
    }
    if contains_any(&text, &["task", "todo"]) {
        goals.push("tasks".to_string());
    }
    if goals.is_empty() {
        goals = vec![
            "work".to_string(),
            "meals".to_string(),
            "exercise".to_string(),
        ];
    }

    let mut constraints = Constraints::default();
    for diet in ["vegetarian", "vegan", "keto"] {
        if text.contains(diet) {
            constraints.diet = Some(diet.to_string());
            break;
        }
    }
    if let Some(caps) = BUDGET_RE.captures(&text) {
        constraints.max_budget = caps[2].parse().ok();
    }

    let plan_duration_days = DURATION_RE
        .captures(&text)
        .and_then(|caps| {
            let n: i64 = caps[1].parse().ok()?;
            if caps[2].starts_with("week") {
                Some(n.saturating_mul(7).max(7))
            } else {
                Some(n)
            }
        })
        .unwrap_or(7);

    let mut priorities = Vec::new();
    if text.contains("priorit") {
        for candidate in ["meals", "work", "exercise"] {
            if text.contains(candidate) {
                priorities.push(candidate.to_string());
            }
        }
    }
    if priorities.is_empty() {
        priorities = vec![
            "meals".to_string(),
            "work".to_string(),
            "exercise".to_string(),
        ];
    }

    tracing::debug!(
        goals = ?goals,
        days = plan_duration_days,
        "extracted intent heuristically"
    );

    Intent {
        goals,
        constraints,
        priorities,
        plan_duration_days,
    }
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_goal_keywords() {
        let intent = extract_intent("Plan my work week with gym sessions and grocery runs");
        assert_eq!(intent.goals, ["work", "exercise", "shopping"]);
    }

    #[test]
    fn meal_keywords_map_to_meals_goal() {
        let intent = extract_intent("I want to cook more this week");
        assert_eq!(intent.goals, ["meals"]);
    }

    #[test]
    fn unrecognized_text_gets_default_goals() {
        let intent = extract_intent("just vibes");
        assert_eq!(intent.goals, ["work", "meals", "exercise"]);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let intent = extract_intent("WORK on my PROJECT");
        assert_eq!(intent.goals, ["work"]);
    }

    #[test]
    fn first_diet_keyword_wins() {
        let intent = extract_intent("vegetarian meals, maybe vegan later");
        assert_eq!(intent.constraints.diet.as_deref(), Some("vegetarian"));

        let vegan = extract_intent("strictly vegan meals");
        assert_eq!(vegan.constraints.diet.as_deref(), Some("vegan"));

        let keto = extract_intent("keto meals");
        assert_eq!(keto.constraints.diet.as_deref(), Some("keto"));
    }

    #[test]
    fn extracts_dollar_budget() {
        let intent = extract_intent("groceries under $120 please");
        assert_eq!(intent.constraints.max_budget, Some(120.0));
    }

    #[test]
    fn extracts_decimal_and_rupee_budgets() {
        assert_eq!(
            extract_intent("keep it below $99.50").constraints.max_budget,
            Some(99.5)
        );
        assert_eq!(
            extract_intent("budget ₹1500 for food").constraints.max_budget,
            Some(1500.0)
        );
        assert_eq!(
            extract_intent("roughly Rs. 500 a week").constraints.max_budget,
            Some(500.0)
        );
    }

    #[test]
    fn missing_budget_stays_unset() {
        assert_eq!(extract_intent("plan my week").constraints.max_budget, None);
    }

    #[test]
    fn extracts_day_durations() {
        assert_eq!(extract_intent("plan 5 days").plan_duration_days, 5);
        assert_eq!(extract_intent("plan 10 days").plan_duration_days, 10);
    }

    #[test]
    fn week_durations_scale_and_floor_at_seven() {
        assert_eq!(extract_intent("plan 2 weeks").plan_duration_days, 14);
        assert_eq!(extract_intent("plan 1 week").plan_duration_days, 7);
    }

    #[test]
    fn missing_duration_defaults_to_a_week() {
        assert_eq!(extract_intent("plan my meals").plan_duration_days, 7);
    }

    #[test]
    fn priority_keywords_narrow_the_list() {
        let spoken = extract_intent("prioritize work and meals");
        assert_eq!(spoken.priorities, ["meals", "work"]);
    }

    #[test]
    fn priorities_default_without_the_keyword() {
        let silent = extract_intent("work and meals");
        assert_eq!(silent.priorities, ["meals", "work", "exercise"]);

        let plain = extract_intent("plan meals for 3 days");
        assert_eq!(plain.priorities, ["meals", "work", "exercise"]);
    }

    #[test]
    fn vague_priorities_get_the_default_order() {
        let intent = extract_intent("please prioritise things");
        assert_eq!(intent.priorities, ["meals", "work", "exercise"]);
    }

    #[test]
    fn zero_days_means_a_week() {
        let intent = Intent {
            plan_duration_days: 0,
            ..Intent::default()
        };
        assert_eq!(intent.effective_plan_days(), 7);
    }

    #[test]
    fn intent_accepts_alias_keys() {
        let intent: Intent = serde_json::from_str(
            r#"{"goals":["work"],"plan_days":3,"constraints":{"dietary":"vegan"}}"#,
        )
        .unwrap();
        assert_eq!(intent.plan_duration_days, 3);
        assert_eq!(intent.constraints.diet.as_deref(), Some("vegan"));
    }
}
