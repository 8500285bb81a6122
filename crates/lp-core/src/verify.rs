//! Final plan verification and the reproducibility signature.
//!
//! Verification is glass-box: every check records what it expected,
//! what it saw and whether it passed, so a failing plan can be
//! explained without re-running the pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::evaluate::evaluate_plan;
use crate::event::EventType;
use crate::plan::Plan;

/// One recorded check of the validation trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationCheck {
    pub check: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

/// The outcome of verifying a plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub is_valid: bool,
    pub constraints_satisfied: bool,
    pub budget_within_limits: bool,
    pub meals_scheduled: bool,
    pub tasks_scheduled: bool,
    pub validation_trace: Vec<ValidationCheck>,
    pub reproducibility_signature: String,
    pub verification_summary: String,
}

/// First sixteen hex digits of the SHA-256 of the plan's canonical
/// JSON. Canonical means sorted object keys, which serde_json's
/// default map representation already guarantees.
pub fn plan_signature(plan: &Plan) -> String {
    let canonical = serde_json::to_value(plan)
        .map_or_else(|_| "null".to_string(), |value| value.to_string());
    let mut signature = hex::encode(Sha256::digest(canonical.as_bytes()));
    signature.truncate(16);
    signature
}

fn mark(passed: bool) -> &'static str {
    if passed { "✓" } else { "✗" }
}

/// Runs the four validation checks and signs the plan.
///
/// A zero or missing budget limit counts as no limit and always
/// passes. The plan is valid only when every check passes.
pub fn verify_plan(plan: &Plan) -> VerificationResult {
    let mut validation_trace = Vec::with_capacity(4);

    let limit = plan.constraints.max_budget.filter(|limit| *limit != 0.0);
    let actual_budget = plan.budget.total;
    let budget_within_limits = limit.is_none_or(|limit| actual_budget <= limit);
    validation_trace.push(ValidationCheck {
        check: "budget_limit".to_string(),
        expected: limit.map_or_else(|| "No limit".to_string(), |limit| format!("≤ ${limit}")),
        actual: format!("${actual_budget:.2}"),
        passed: budget_within_limits,
    });

    let meal_events = plan.schedule.count_kind(EventType::Meal);
    let meals_scheduled = meal_events > 0;
    validation_trace.push(ValidationCheck {
        check: "meals_scheduled".to_string(),
        expected: "> 0 meals".to_string(),
        actual: format!("{meal_events} meals"),
        passed: meals_scheduled,
    });

    let task_events = plan.schedule.count_kind(EventType::Task);
    let tasks_scheduled = task_events > 0;
    validation_trace.push(ValidationCheck {
        check: "tasks_scheduled".to_string(),
        expected: "> 0 tasks".to_string(),
        actual: format!("{task_events} tasks"),
        passed: tasks_scheduled,
    });

    let compliance = evaluate_plan(plan).constraint_compliance;
    let constraints_satisfied = compliance >= 0.8;
    validation_trace.push(ValidationCheck {
        check: "constraint_compliance".to_string(),
        expected: "≥ 0.8".to_string(),
        actual: format!("{compliance:.2}"),
        passed: constraints_satisfied,
    });

    let is_valid =
        constraints_satisfied && budget_within_limits && meals_scheduled && tasks_scheduled;
    let reproducibility_signature = plan_signature(plan);

    let limit_display =
        limit.map_or_else(|| "$N/A".to_string(), |limit| format!("${limit}"));
    let verification_summary = [
        "Plan Verification Summary:".to_string(),
        format!(
            "- Budget: {}   (${actual_budget:.2} / {limit_display})",
            mark(budget_within_limits)
        ),
        format!(
            "- Meals Scheduled: {}   ({meal_events} meals)",
            mark(meals_scheduled)
        ),
        format!(
            "- Tasks Scheduled: {}   ({task_events} tasks)",
            mark(tasks_scheduled)
        ),
        format!(
            "- Constraints: {}   (compliance: {:.2}%)",
            mark(constraints_satisfied),
            compliance * 100.0
        ),
        format!("- Overall: {}", if is_valid { "VALID" } else { "INVALID" }),
        format!("- Signature: {reproducibility_signature}"),
    ]
    .join("\n");

    tracing::debug!(is_valid, signature = %reproducibility_signature, "plan verified");

    VerificationResult {
        is_valid,
        constraints_satisfied,
        budget_within_limits,
        meals_scheduled,
        tasks_scheduled,
        validation_trace,
        reproducibility_signature,
        verification_summary,
    }
}
