//! Deterministic plan scoring.

use serde::{Deserialize, Serialize};

use crate::budget::round2;
use crate::plan::Plan;

/// Quality metrics for an assembled plan.
///
/// `overall_score` is on a 0 to 100 scale; the component scores are
/// fractions. The weighting is fixed: goal satisfaction counts half,
/// structural compliance 30% and budget compliance 20%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub goal_satisfaction_score: f64,
    pub constraint_compliance: f64,
    pub budget_compliance: f64,
    pub budget_deviation: f64,
    pub issues: Vec<String>,
    pub overall_score: f64,
}

/// Scores a plan. A goal counts as satisfied when its lowercased text
/// appears in any task title or meal name.
pub fn evaluate_plan(plan: &Plan) -> Evaluation {
    let mut hits = 0usize;
    for goal in &plan.goals {
        let goal = goal.to_lowercase();
        let task_match = plan
            .tasks
            .iter()
            .any(|task| task.title.to_lowercase().contains(&goal));
        let meal_match = plan
            .meals
            .iter()
            .flat_map(|day| &day.meals)
            .any(|meal| meal.name.to_lowercase().contains(&goal));
        if task_match || meal_match {
            hits += 1;
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let goal_satisfaction_score = if plan.goals.is_empty() {
        0.5
    } else {
        hits as f64 / plan.goals.len() as f64
    }
    .clamp(0.0, 1.0);

    // A zero limit means no limit, same as the budget check.
    let limit = plan.constraints.max_budget.filter(|limit| *limit != 0.0);
    let (budget_deviation, budget_compliance) = match limit {
        Some(limit) => {
            let deviation = (plan.budget.total - limit).max(0.0);
            let compliance = if deviation <= 0.0 {
                1.0
            } else {
                (1.0 - (deviation / limit).min(1.0)).max(0.0)
            };
            (deviation, compliance)
        }
        None => (0.0, 1.0),
    };

    let mut issues = Vec::new();
    if plan.meals.is_empty() {
        issues.push("no meals".to_string());
    }
    if !plan.schedule.has_events() {
        issues.push("no events".to_string());
    }
    let constraint_compliance = match issues.len() {
        0 => 1.0,
        1 => 0.7,
        _ => 0.4,
    };

    let overall = (goal_satisfaction_score * 0.5
        + constraint_compliance * 0.3
        + budget_compliance * 0.2)
        .clamp(0.0, 1.0);

    Evaluation {
        goal_satisfaction_score,
        constraint_compliance,
        budget_compliance,
        budget_deviation,
        issues,
        overall_score: round2(overall * 100.0),
    }
}
