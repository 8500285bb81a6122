//! The built-in task catalog used when no language model is available.

use crate::proposals::TaskProposal;

fn row(
    title: &str,
    description: &str,
    duration_minutes: i64,
    priority: &str,
    block: &str,
) -> TaskProposal {
    TaskProposal {
        title: title.to_string(),
        description: description.to_string(),
        duration_minutes,
        priority: priority.to_string(),
        preferred_time_block: block.to_string(),
    }
}

/// Builds a task list from the goal keywords alone.
///
/// Each recognized goal contributes its catalog rows; goals without
/// rows contribute nothing, and a request with no recognized goals at
/// all falls back to a small planning-plus-movement baseline. The rows
/// are then cycled up to `max(3, min(2 * rows, 2 * plan_days))` tasks
/// so longer plans get more repetitions of the same catalog.
pub fn fallback_tasks(goals: &[String], plan_days: i64) -> Vec<TaskProposal> {
    let mut base = Vec::new();
    for goal in goals {
        match goal.trim().to_lowercase().as_str() {
            "work" => {
                base.push(row(
                    "Work Session",
                    "Focused work time",
                    90,
                    "high",
                    "morning",
                ));
                base.push(row(
                    "Emails & Planning",
                    "Daily admin",
                    30,
                    "medium",
                    "afternoon",
                ));
            }
            "exercise" => {
                base.push(row(
                    "Workout",
                    "30-minute fitness routine",
                    30,
                    "high",
                    "morning",
                ));
                base.push(row("Stretch", "10-minute stretch", 10, "low", "evening"));
            }
            "cooking" => {
                base.push(row(
                    "Meal Prep",
                    "Prepare ingredients for meals",
                    45,
                    "medium",
                    "afternoon",
                ));
            }
            "grocery" => {
                base.push(row(
                    "Grocery Shopping",
                    "Buy weekly groceries",
                    60,
                    "medium",
                    "evening",
                ));
            }
            "study" => {
                base.push(row(
                    "Learning Block",
                    "Skill learning session",
                    60,
                    "medium",
                    "morning",
                ));
            }
            _ => {}
        }
    }

    if base.is_empty() {
        base.push(row(
            "Plan & Prioritise",
            "Organize the week's priorities",
            30,
            "medium",
            "morning",
        ));
        base.push(row("Quick Workout", "Short exercise", 20, "medium", "morning"));
    }

    let day_cap = usize::try_from(plan_days.saturating_mul(2)).unwrap_or(0);
    let target = (base.len() * 2).min(day_cap).max(3);
    (0..target).map(|i| base[i % base.len()].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goals(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn work_goal_contributes_its_rows() {
        let tasks = fallback_tasks(&goals(&["work"]), 7);
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].title, "Work Session");
        assert_eq!(tasks[0].duration_minutes, 90);
        assert_eq!(tasks[0].priority, "high");
        assert_eq!(tasks[0].preferred_time_block, "morning");
        assert_eq!(tasks[1].title, "Emails & Planning");
        assert_eq!(tasks[1].duration_minutes, 30);
    }

    #[test]
    fn rows_cycle_when_quota_exceeds_catalog() {
        let tasks = fallback_tasks(&goals(&["work"]), 7);
        assert_eq!(tasks[2].title, "Work Session");
        assert_eq!(tasks[3].title, "Emails & Planning");
    }

    #[test]
    fn unmatched_goals_fall_back_to_baseline() {
        let tasks = fallback_tasks(&goals(&["meals", "shopping"]), 7);
        assert_eq!(tasks[0].title, "Plan & Prioritise");
        assert_eq!(tasks[1].title, "Quick Workout");
    }

    #[test]
    fn no_goals_fall_back_to_baseline() {
        let tasks = fallback_tasks(&[], 7);
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].title, "Plan & Prioritise");
    }

    #[test]
    fn goal_keys_are_case_and_whitespace_insensitive() {
        let tasks = fallback_tasks(&goals(&[" Work ", "EXERCISE"]), 7);
        assert_eq!(tasks[0].title, "Work Session");
        assert_eq!(tasks[2].title, "Workout");
        assert_eq!(tasks[3].title, "Stretch");
    }

    #[test]
    fn short_plans_still_get_three_tasks() {
        let tasks = fallback_tasks(&goals(&["work", "exercise"]), 1);
        assert_eq!(tasks.len(), 3);
    }

    #[test]
    fn long_plans_cap_at_twice_the_catalog() {
        let tasks = fallback_tasks(&goals(&["work", "exercise"]), 30);
        assert_eq!(tasks.len(), 8);
    }

    #[test]
    fn nonpositive_plan_days_keep_the_minimum() {
        assert_eq!(fallback_tasks(&goals(&["work"]), 0).len(), 3);
        assert_eq!(fallback_tasks(&goals(&["work"]), -3).len(), 3);
    }

    #[test]
    fn combined_goals_preserve_request_order() {
        let tasks = fallback_tasks(&goals(&["exercise", "work"]), 7);
        assert_eq!(tasks[0].title, "Workout");
        assert_eq!(tasks[2].title, "Work Session");
    }
}
