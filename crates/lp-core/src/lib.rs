//! Core domain logic for the life planner.
//!
//! This crate contains the fundamental types and logic for:
//! - Intent: extracting goals and constraints from a request
//! - Proposals: the built-in task catalog and meal generator
//! - Placement: distributing proposals over a week and resolving slot
//!   conflicts deterministically
//! - Review: budgeting, scoring and glass-box verification of the
//!   assembled plan

pub mod budget;
pub mod catalog;
pub mod clock;
pub mod evaluate;
pub mod event;
pub mod intent;
pub mod meals;
pub mod placement;
pub mod plan;
pub mod proposals;
pub mod slots;
pub mod verify;
pub mod week;

pub use budget::{BudgetSummary, ShoppingItem, estimate_budget, grocery_list};
pub use catalog::fallback_tasks;
pub use clock::{minutes_to_time, normalize_minutes, overlaps, time_to_minutes};
pub use evaluate::{Evaluation, evaluate_plan};
pub use event::{Event, EventType, Schedule, UnknownEventType};
pub use intent::{Constraints, Intent, extract_intent};
pub use meals::fallback_meal_plan;
pub use placement::{MEAL_PROBES, PlacementResult, TASK_PROBES, build_schedule};
pub use plan::{Plan, PlanMetadata, ReviewedPlan, assemble_plan, recommendations_for, review_plan};
pub use proposals::{
    Ingredient, MealDayProposal, MealPayload, MealProposal, TaskPayload, TaskProposal,
};
pub use slots::{find_alternative_slot, find_conflicts};
pub use verify::{ValidationCheck, VerificationResult, plan_signature, verify_plan};
pub use week::{UnknownWeekday, WEEK, Weekday, active_days, suggest_default_start};
