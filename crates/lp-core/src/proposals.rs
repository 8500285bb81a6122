//! Proposal inputs consumed by the placement engine.
//!
//! Proposals arrive as loosely shaped JSON, either from a language
//! model or from the built-in generators. Every field carries a serde
//! default so a sparse object still deserializes, and the payload
//! wrappers absorb the handful of envelope shapes seen in the wild.
//! Anything that fails to match resolves to an empty list instead of
//! an error.

use serde::{Deserialize, Serialize};

fn default_task_title() -> String {
    "Task".to_string()
}

fn default_task_duration() -> i64 {
    60
}

fn default_priority() -> String {
    "medium".to_string()
}

fn default_time_block() -> String {
    "morning".to_string()
}

/// A task suggestion waiting to be placed on the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskProposal {
    #[serde(default = "default_task_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_task_duration")]
    pub duration_minutes: i64,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default = "default_time_block")]
    pub preferred_time_block: String,
}

impl Default for TaskProposal {
    fn default() -> Self {
        Self {
            title: default_task_title(),
            description: String::new(),
            duration_minutes: default_task_duration(),
            priority: default_priority(),
            preferred_time_block: default_time_block(),
        }
    }
}

fn default_meal_kind() -> String {
    "dinner".to_string()
}

fn default_meal_name() -> String {
    "Meal".to_string()
}

/// One ingredient of a proposed meal.
///
/// Meal payloads carry ingredients either as bare strings or as
/// objects with a name and quantity; both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ingredient {
    Name(String),
    Detailed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ingredient: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default = "default_quantity")]
        quantity: f64,
    },
}

fn default_quantity() -> f64 {
    1.0
}

impl Ingredient {
    /// The ingredient name, preferring the `ingredient` key over
    /// `name`. Empty strings count as missing.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::Detailed {
                ingredient, name, ..
            } => ingredient
                .as_deref()
                .filter(|s| !s.is_empty())
                .or_else(|| name.as_deref().filter(|s| !s.is_empty())),
        }
    }
}

impl From<&str> for Ingredient {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

/// A single proposed meal within a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealProposal {
    #[serde(rename = "type", default = "default_meal_kind")]
    pub kind: String,
    #[serde(default = "default_meal_name")]
    pub name: String,
    #[serde(default)]
    pub recipe_id: String,
    #[serde(default)]
    pub calories: i64,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl Default for MealProposal {
    fn default() -> Self {
        Self {
            kind: default_meal_kind(),
            name: default_meal_name(),
            recipe_id: String::new(),
            calories: 0,
            ingredients: Vec::new(),
            duration_minutes: None,
        }
    }
}

/// One day of a proposed meal plan.
///
/// The day may be addressed three ways: a `day` name, a `day_name`,
/// or a one-based `day_index`. The placement engine resolves whichever
/// is present, in that order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MealDayProposal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_index: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<String>,
    #[serde(default)]
    pub meals: Vec<MealProposal>,
    #[serde(default)]
    pub total_calories: i64,
}

/// The envelope shapes a task payload may arrive in.
///
/// Resolved once at the boundary with [`TaskPayload::into_tasks`];
/// everything downstream works with a plain `Vec<TaskProposal>`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TaskPayload {
    Wrapped { tasks: Vec<TaskProposal> },
    Bare(Vec<TaskProposal>),
    Other(serde_json::Value),
}

impl TaskPayload {
    /// The proposed tasks, or an empty list for any unrecognized shape.
    pub fn into_tasks(self) -> Vec<TaskProposal> {
        match self {
            Self::Wrapped { tasks } => tasks,
            Self::Bare(tasks) => tasks,
            Self::Other(_) => Vec::new(),
        }
    }
}

/// The envelope shapes a meal payload may arrive in.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MealPayload {
    Wrapped { meal_plan: Vec<MealDayProposal> },
    Days { days: Vec<MealDayProposal> },
    Bare(Vec<MealDayProposal>),
    Other(serde_json::Value),
}

impl MealPayload {
    /// The proposed meal days, or an empty list for any unrecognized
    /// shape.
    pub fn into_days(self) -> Vec<MealDayProposal> {
        match self {
            Self::Wrapped { meal_plan } => meal_plan,
            Self::Days { days } => days,
            Self::Bare(days) => days,
            Self::Other(_) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_task_fills_defaults() {
        let task: TaskProposal = serde_json::from_str("{}").unwrap();
        assert_eq!(task.title, "Task");
        assert_eq!(task.description, "");
        assert_eq!(task.duration_minutes, 60);
        assert_eq!(task.priority, "medium");
        assert_eq!(task.preferred_time_block, "morning");
    }

    #[test]
    fn sparse_meal_fills_defaults() {
        let meal: MealProposal = serde_json::from_str("{}").unwrap();
        assert_eq!(meal.kind, "dinner");
        assert_eq!(meal.name, "Meal");
        assert_eq!(meal.duration_minutes, None);
    }

    #[test]
    fn meal_kind_reads_type_key() {
        let meal: MealProposal = serde_json::from_str(r#"{"type":"breakfast"}"#).unwrap();
        assert_eq!(meal.kind, "breakfast");
    }

    #[test]
    fn ingredient_accepts_both_shapes() {
        let bare: Ingredient = serde_json::from_str("\"oats\"").unwrap();
        assert_eq!(bare.name(), Some("oats"));

        let detailed: Ingredient =
            serde_json::from_str(r#"{"ingredient":"milk","quantity":2}"#).unwrap();
        assert_eq!(detailed.name(), Some("milk"));

        let named: Ingredient = serde_json::from_str(r#"{"name":"rice"}"#).unwrap();
        assert_eq!(named.name(), Some("rice"));
    }

    #[test]
    fn ingredient_prefers_ingredient_key_over_name() {
        let both: Ingredient =
            serde_json::from_str(r#"{"ingredient":"milk","name":"oat milk"}"#).unwrap();
        assert_eq!(both.name(), Some("milk"));

        let empty_primary: Ingredient =
            serde_json::from_str(r#"{"ingredient":"","name":"rice"}"#).unwrap();
        assert_eq!(empty_primary.name(), Some("rice"));
    }

    #[test]
    fn nameless_ingredient_is_skippable() {
        let anonymous: Ingredient = serde_json::from_str(r#"{"quantity":3}"#).unwrap();
        assert_eq!(anonymous.name(), None);
    }

    #[test]
    fn task_payload_unwraps_envelope() {
        let wrapped: TaskPayload =
            serde_json::from_str(r#"{"tasks":[{"title":"Write"}]}"#).unwrap();
        let tasks = wrapped.into_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write");
    }

    #[test]
    fn task_payload_accepts_bare_list() {
        let bare: TaskPayload = serde_json::from_str(r#"[{"title":"Read"}]"#).unwrap();
        assert_eq!(bare.into_tasks()[0].title, "Read");
    }

    #[test]
    fn task_payload_garbage_is_empty() {
        let garbage: TaskPayload = serde_json::from_str(r#"{"tasks":"oops"}"#).unwrap();
        assert!(garbage.into_tasks().is_empty());

        let scalar: TaskPayload = serde_json::from_str("42").unwrap();
        assert!(scalar.into_tasks().is_empty());
    }

    #[test]
    fn meal_payload_accepts_all_envelopes() {
        let wrapped: MealPayload =
            serde_json::from_str(r#"{"meal_plan":[{"day_index":1}]}"#).unwrap();
        assert_eq!(wrapped.into_days().len(), 1);

        let days: MealPayload = serde_json::from_str(r#"{"days":[{"day_index":1}]}"#).unwrap();
        assert_eq!(days.into_days().len(), 1);

        let bare: MealPayload = serde_json::from_str(r#"[{"day_index":1}]"#).unwrap();
        assert_eq!(bare.into_days().len(), 1);

        let garbage: MealPayload = serde_json::from_str(r#"{"meal_plan":{}}"#).unwrap();
        assert!(garbage.into_days().is_empty());
    }
}
