//! The planning pipeline.
//!
//! Stages run in a fixed order: intent first, then tasks and meals in
//! parallel, then budget, schedule, review and verification. Every
//! stage appends to the session log and to the outcome's trace.

use anyhow::Result;
use lp_core::{
    Evaluation, Plan, VerificationResult, assemble_plan, build_schedule, estimate_budget,
    review_plan, verify_plan,
};
use lp_db::TaskStore;
use serde::Serialize;
use serde_json::{Value, json};

use crate::generator::Generator;
use crate::session_log::SessionLog;

/// One pipeline stage with a short human-readable note.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEntry {
    pub stage: &'static str,
    pub detail: String,
}

/// Everything one planning run produced.
#[derive(Debug, Serialize)]
pub struct PlanOutcome {
    pub session_id: String,
    pub user_input: String,
    pub plan: Plan,
    pub verification: VerificationResult,
    pub evaluation: Evaluation,
    pub recommendations: Vec<String>,
    pub score: f64,
    pub trace: Vec<TraceEntry>,
    pub status: &'static str,
}

/// Runs the full pipeline for one request.
///
/// Task proposals are persisted through `store` on a best-effort basis;
/// a storage failure degrades to a warning. Generation failures abort
/// the run.
pub async fn run(
    generator: &Generator,
    store: Option<&mut TaskStore>,
    log: &SessionLog,
    text: &str,
    days_override: Option<i64>,
) -> Result<PlanOutcome> {
    let mut trace = Vec::new();
    log.record(
        "pipeline",
        "started",
        json!({ "user_input": text, "generator": generator.name() }),
    );

    let mut intent = generator.extract_intent(text).await?;
    if let Some(days) = days_override {
        intent.plan_duration_days = days;
    }
    let plan_days = intent.effective_plan_days();
    trace.push(TraceEntry {
        stage: "intent",
        detail: format!("{} goals over {plan_days} days", intent.goals.len()),
    });
    log.record("intent", "extracted", to_log_value(&intent));

    let (tasks, meals) = tokio::join!(
        generator.propose_tasks(&intent),
        generator.generate_meals(&intent)
    );
    let tasks = tasks?;
    let meals = meals?;
    trace.push(TraceEntry {
        stage: "tasks",
        detail: format!("{} proposals", tasks.len()),
    });
    trace.push(TraceEntry {
        stage: "meals",
        detail: format!("{} day plans", meals.len()),
    });
    log.record("tasks", "proposed", to_log_value(&tasks));
    log.record("meals", "generated", to_log_value(&meals));

    if let Some(store) = store {
        match store.add_tasks(&tasks) {
            Ok(ids) => tracing::debug!(stored = ids.len(), "task proposals saved"),
            Err(err) => tracing::warn!(error = %err, "failed to store task proposals"),
        }
    }

    let budget = estimate_budget(&meals, intent.constraints.max_budget);
    trace.push(TraceEntry {
        stage: "budget",
        detail: format!("total ${:.2}", budget.total),
    });
    log.record("budget", "estimated", to_log_value(&budget));

    let placement = build_schedule(&tasks, &meals, plan_days);
    trace.push(TraceEntry {
        stage: "schedule",
        detail: format!(
            "{} events, {} conflicts resolved",
            placement.total_events, placement.conflicts_resolved
        ),
    });
    log.record(
        "schedule",
        "built",
        json!({
            "total_events": placement.total_events,
            "conflicts_resolved": placement.conflicts_resolved,
        }),
    );

    let plan = assemble_plan(&intent, tasks, meals, budget, placement);
    let reviewed = review_plan(plan);
    trace.push(TraceEntry {
        stage: "review",
        detail: format!("score {:.2}", reviewed.score),
    });
    log.record(
        "review",
        "scored",
        json!({
            "score": reviewed.score,
            "recommendations": reviewed.recommendations,
        }),
    );

    let verification = verify_plan(&reviewed.plan);
    trace.push(TraceEntry {
        stage: "verify",
        detail: format!(
            "{}, signature {}",
            if verification.is_valid { "valid" } else { "invalid" },
            verification.reproducibility_signature
        ),
    });
    log.record(
        "verify",
        "completed",
        json!({
            "is_valid": verification.is_valid,
            "signature": verification.reproducibility_signature,
        }),
    );

    log.record("pipeline", "completed", json!({ "status": "success" }));

    Ok(PlanOutcome {
        session_id: log.session_id().to_string(),
        user_input: text.to_string(),
        plan: reviewed.plan,
        verification,
        evaluation: reviewed.evaluation,
        recommendations: reviewed.recommendations,
        score: reviewed.score,
        trace,
        status: "success",
    })
}

fn to_log_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
