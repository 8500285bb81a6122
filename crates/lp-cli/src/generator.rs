//! Proposal source selection.

use anyhow::{Context, Result};
use lp_core::{Intent, MealDayProposal, TaskProposal};
use lp_llm::Client;

use crate::config::Config;

/// Where intent, tasks and meals come from. Picked once per run; a
/// remote failure mid-pipeline is an error, not a silent downgrade.
#[derive(Debug)]
pub enum Generator {
    Remote { client: Client, model: String },
    Fallback,
}

impl Generator {
    /// Uses the remote model when an API key is configured, unless
    /// `offline` forces the deterministic path.
    pub fn from_config(config: &Config, offline: bool) -> Result<Self> {
        if offline {
            return Ok(Self::Fallback);
        }
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty());
        match api_key {
            Some(key) => {
                let client = Client::new(key.to_string()).context("failed to build API client")?;
                Ok(Self::Remote {
                    client,
                    model: config.model.clone(),
                })
            }
            None => Ok(Self::Fallback),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "remote",
            Self::Fallback => "fallback",
        }
    }

    pub async fn extract_intent(&self, text: &str) -> Result<Intent> {
        match self {
            Self::Remote { client, model } => client
                .extract_intent(model, text)
                .await
                .context("intent extraction failed"),
            Self::Fallback => Ok(lp_core::extract_intent(text)),
        }
    }

    pub async fn propose_tasks(&self, intent: &Intent) -> Result<Vec<TaskProposal>> {
        let plan_days = intent.effective_plan_days();
        match self {
            Self::Remote { client, model } => client
                .propose_tasks(model, &intent.goals, &intent.constraints, plan_days)
                .await
                .context("task generation failed"),
            Self::Fallback => Ok(lp_core::fallback_tasks(&intent.goals, plan_days)),
        }
    }

    pub async fn generate_meals(&self, intent: &Intent) -> Result<Vec<MealDayProposal>> {
        let plan_days = intent.effective_plan_days();
        match self {
            Self::Remote { client, model } => client
                .generate_meal_plan(model, &intent.goals, &intent.constraints, plan_days)
                .await
                .context("meal planning failed"),
            Self::Fallback => Ok(lp_core::fallback_meal_plan(
                intent.constraints.diet.as_deref(),
                plan_days,
            )),
        }
    }
}
