//! Canonical plan assembly and review.

use serde::Serialize;

use crate::budget::BudgetSummary;
use crate::evaluate::{Evaluation, evaluate_plan};
use crate::event::Schedule;
use crate::intent::{Constraints, Intent};
use crate::placement::PlacementResult;
use crate::proposals::{MealDayProposal, TaskProposal};

/// Roll-up counters recorded alongside the plan body.
#[derive(Debug, Clone, Serialize)]
pub struct PlanMetadata {
    pub total_tasks: usize,
    pub total_meals: usize,
    pub budget_total: f64,
    pub schedule_events: usize,
}

/// The canonical merged plan: everything the pipeline produced, in one
/// serializable shape.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub goals: Vec<String>,
    pub constraints: Constraints,
    pub priorities: Vec<String>,
    pub plan_duration_days: i64,
    pub tasks: Vec<TaskProposal>,
    pub meals: Vec<MealDayProposal>,
    pub budget: BudgetSummary,
    pub schedule: Schedule,
    pub metadata: PlanMetadata,
}

/// A plan together with its score and review notes.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewedPlan {
    pub plan: Plan,
    pub score: f64,
    pub evaluation: Evaluation,
    pub recommendations: Vec<String>,
}

/// Merges the pipeline outputs into the canonical plan shape.
///
/// The intent's requested duration is recorded as-is, even when the
/// schedule was clamped to a shorter range.
pub fn assemble_plan(
    intent: &Intent,
    tasks: Vec<TaskProposal>,
    meals: Vec<MealDayProposal>,
    budget: BudgetSummary,
    placement: PlacementResult,
) -> Plan {
    let metadata = PlanMetadata {
        total_tasks: tasks.len(),
        total_meals: meals.iter().map(|day| day.meals.len()).sum(),
        budget_total: budget.total,
        schedule_events: placement.total_events,
    };
    Plan {
        goals: intent.goals.clone(),
        constraints: intent.constraints.clone(),
        priorities: intent.priorities.clone(),
        plan_duration_days: intent.plan_duration_days,
        tasks,
        meals,
        budget,
        schedule: placement.schedule,
        metadata,
    }
}

/// Scores the plan and attaches deterministic recommendations.
pub fn review_plan(plan: Plan) -> ReviewedPlan {
    let evaluation = evaluate_plan(&plan);
    let recommendations = recommendations_for(&evaluation);
    tracing::debug!(score = evaluation.overall_score, "plan reviewed");
    ReviewedPlan {
        score: evaluation.overall_score,
        plan,
        evaluation,
        recommendations,
    }
}

/// Review notes derived from an evaluation, worst problems first.
pub fn recommendations_for(evaluation: &Evaluation) -> Vec<String> {
    let mut recommendations = Vec::new();
    if evaluation.budget_deviation > 0.0 {
        recommendations.push(format!(
            "Budget is exceeded by ${:.2}. Consider reducing grocery or meal costs.",
            evaluation.budget_deviation
        ));
    }
    if evaluation.constraint_compliance < 0.8 && !evaluation.issues.is_empty() {
        let shown = evaluation
            .issues
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        recommendations.push(format!("Constraint issues detected: {shown}"));
    }
    if evaluation.goal_satisfaction_score < 0.7 {
        recommendations.push(
            "Not all goals are satisfied. Add more focused tasks or meals aligned with goals."
                .to_string(),
        );
    }
    if recommendations.is_empty() {
        recommendations.push("Plan is strong — no major issues detected!".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::budget::estimate_budget;
    use crate::catalog::fallback_tasks;
    use crate::meals::fallback_meal_plan;
    use crate::placement::build_schedule;

    fn reviewed(goals: &[&str], max_budget: Option<f64>, days: i64) -> ReviewedPlan {
        let intent = Intent {
            goals: goals.iter().map(ToString::to_string).collect(),
            constraints: Constraints {
                diet: None,
                max_budget,
            },
            priorities: Vec::new(),
            plan_duration_days: days,
        };
        let tasks = fallback_tasks(&intent.goals, days);
        let meals = fallback_meal_plan(None, days);
        let budget = estimate_budget(&meals, max_budget);
        let placement = build_schedule(&tasks, &meals, days);
        review_plan(assemble_plan(&intent, tasks, meals, budget, placement))
    }

    #[test]
    fn metadata_counts_the_plan_body() {
        let reviewed = reviewed(&["work"], None, 3);
        let plan = &reviewed.plan;
        assert_eq!(plan.metadata.total_tasks, plan.tasks.len());
        let meal_count: usize = plan.meals.iter().map(|day| day.meals.len()).sum();
        assert_eq!(plan.metadata.total_meals, meal_count);
        assert!((plan.metadata.budget_total - plan.budget.total).abs() < 1e-9);
        assert_eq!(plan.metadata.schedule_events, plan.schedule.total_events());
    }

    #[test]
    fn requested_duration_is_recorded_unclamped() {
        let reviewed = reviewed(&["work"], None, 10);
        assert_eq!(reviewed.plan.plan_duration_days, 10);
        assert_eq!(reviewed.plan.schedule.day_count(), 7);
    }

    #[test]
    fn strong_plan_gets_the_strong_note() {
        let reviewed = reviewed(&["work"], None, 3);
        assert_eq!(
            reviewed.recommendations,
            ["Plan is strong — no major issues detected!"]
        );
        assert!((reviewed.score - reviewed.evaluation.overall_score).abs() < 1e-9);
    }

    #[test]
    fn budget_overrun_is_called_out_with_the_amount() {
        let reviewed = reviewed(&["work"], Some(30.0), 3);
        assert_eq!(
            reviewed.recommendations[0],
            "Budget is exceeded by $12.90. Consider reducing grocery or meal costs."
        );
    }

    #[test]
    fn unmet_goals_are_called_out() {
        let reviewed = reviewed(&["skydiving"], None, 3);
        assert_eq!(
            reviewed.recommendations,
            ["Not all goals are satisfied. Add more focused tasks or meals aligned with goals."]
        );
    }

    #[test]
    fn structural_issues_list_at_most_three() {
        let mut plan = reviewed(&["work"], None, 2).plan;
        plan.meals.clear();
        plan.schedule = Schedule::for_days(crate::week::active_days(2));
        let reviewed = review_plan(plan);
        assert!(
            reviewed
                .recommendations
                .contains(&"Constraint issues detected: no meals, no events".to_string()),
            "got {:?}",
            reviewed.recommendations
        );
    }
}
