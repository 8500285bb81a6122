//! Plan command: run the pipeline and render the outcome.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::Args;
use lp_core::{EventType, MealDayProposal};
use lp_db::TaskStore;
use uuid::Uuid;

use crate::Config;
use crate::generator::Generator;
use crate::memory::{self, HistoryEntry};
use crate::pipeline::{self, PlanOutcome};
use crate::session_log::SessionLog;

const SHOPPING_PREVIEW: usize = 10;
const TASK_PREVIEW: usize = 5;
const MEAL_DAY_PREVIEW: usize = 3;

#[derive(Debug, Args)]
pub struct PlanArgs {
    /// The planning request, e.g. "plan my week with vegan meals under $60"
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Override the plan length in days
    #[arg(long)]
    pub days: Option<i64>,

    /// Session identifier; a fresh UUID when omitted
    #[arg(long)]
    pub session: Option<String>,

    /// Print the full outcome as JSON
    #[arg(long)]
    pub json: bool,

    /// Skip the remote model even when an API key is configured
    #[arg(long)]
    pub offline: bool,
}

pub fn run<W: Write>(writer: &mut W, args: &PlanArgs, config: &Config) -> Result<()> {
    let request = args.text.join(" ");
    let session_id = args
        .session
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let generator = Generator::from_config(config, args.offline)?;
    tracing::debug!(
        generator = generator.name(),
        %session_id,
        "starting planning run"
    );

    let mut store = open_store(config);
    let log = SessionLog::create(&config.data_dir, session_id);

    let runtime = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
    let outcome = runtime.block_on(pipeline::run(
        &generator,
        store.as_mut(),
        &log,
        &request,
        args.days,
    ))?;

    let entry = HistoryEntry {
        session_id: outcome.session_id.clone(),
        goals: outcome.plan.goals.clone(),
        plan_score: outcome.score,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    if let Err(err) = memory::record_history(&memory::memory_path(&config.data_dir), entry) {
        tracing::warn!(error = %err, "failed to update long-term memory");
    }

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&outcome)?)?;
    } else {
        render(writer, &outcome)?;
    }
    Ok(())
}

/// Opens the task store, degrading to no persistence when unavailable.
fn open_store(config: &Config) -> Option<TaskStore> {
    if let Some(parent) = config.database_path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            tracing::warn!(error = %err, "failed to create database directory");
        }
    }
    match TaskStore::open(&config.database_path) {
        Ok(store) => Some(store),
        Err(err) => {
            tracing::warn!(error = %err, "task store unavailable, proposals will not be saved");
            None
        }
    }
}

fn render<W: Write>(writer: &mut W, outcome: &PlanOutcome) -> Result<()> {
    let plan = &outcome.plan;

    writeln!(writer, "Session {}", outcome.session_id)?;
    writeln!(writer)?;
    writeln!(writer, "Goals: {}", plan.goals.join(", "))?;
    writeln!(writer)?;

    writeln!(writer, "Schedule:")?;
    for day in plan.schedule.days() {
        writeln!(writer, "{day}")?;
        let events = plan.schedule.events(day);
        if events.is_empty() {
            writeln!(writer, "  (nothing scheduled)")?;
        }
        for event in events {
            let marker = if event.kind == EventType::Meal {
                " [meal]"
            } else {
                ""
            };
            writeln!(
                writer,
                "  {}  {} ({} min){marker}",
                event.start_time, event.title, event.duration_minutes
            )?;
        }
    }
    writeln!(writer)?;

    let budget = &plan.budget;
    match plan.constraints.max_budget {
        Some(limit) if budget.within_budget => writeln!(
            writer,
            "Budget: ${:.2} of ${limit:.2} (within limit)",
            budget.total
        )?,
        Some(limit) => writeln!(
            writer,
            "Budget: ${:.2} of ${limit:.2} (over limit)",
            budget.total
        )?,
        None => writeln!(writer, "Budget: ${:.2}", budget.total)?,
    }
    if !budget.shopping_list.is_empty() {
        writeln!(writer, "Shopping list:")?;
        for item in budget.shopping_list.iter().take(SHOPPING_PREVIEW) {
            match budget.item_prices.get(item) {
                Some(price) => writeln!(writer, "- {item} (${price:.2})")?,
                None => writeln!(writer, "- {item}")?,
            }
        }
        if budget.shopping_list.len() > SHOPPING_PREVIEW {
            writeln!(
                writer,
                "... and {} more",
                budget.shopping_list.len() - SHOPPING_PREVIEW
            )?;
        }
    }
    writeln!(writer)?;

    writeln!(writer, "Tasks:")?;
    for task in plan.tasks.iter().take(TASK_PREVIEW) {
        writeln!(
            writer,
            "- {} ({} min, {} priority)",
            task.title, task.duration_minutes, task.priority
        )?;
    }
    if plan.tasks.len() > TASK_PREVIEW {
        writeln!(writer, "... and {} more", plan.tasks.len() - TASK_PREVIEW)?;
    }
    writeln!(writer)?;

    writeln!(writer, "Meals:")?;
    for day_plan in plan.meals.iter().take(MEAL_DAY_PREVIEW) {
        let meals = day_plan
            .meals
            .iter()
            .map(|meal| format!("{} ({}, {} cal)", meal.name, meal.kind, meal.calories))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(writer, "- {}: {meals}", day_label(day_plan))?;
    }
    if plan.meals.len() > MEAL_DAY_PREVIEW {
        writeln!(
            writer,
            "... and {} more days",
            plan.meals.len() - MEAL_DAY_PREVIEW
        )?;
    }
    writeln!(writer)?;

    writeln!(writer, "{}", outcome.verification.verification_summary)?;
    writeln!(writer)?;

    writeln!(writer, "Recommendations:")?;
    for recommendation in &outcome.recommendations {
        writeln!(writer, "- {recommendation}")?;
    }
    writeln!(writer)?;
    writeln!(writer, "Score: {:.2}", outcome.score)?;

    Ok(())
}

fn day_label(day_plan: &MealDayProposal) -> String {
    if let Some(name) = day_plan
        .day_name
        .as_deref()
        .or_else(|| day_plan.day.as_deref())
    {
        return name.to_string();
    }
    match day_plan.day_index {
        Some(index) => format!("Day {index}"),
        None => "Day".to_string(),
    }
}
