//! Claude API integration for the life planner.
//!
//! Provides remote generation of structured intents, task proposals, and
//! daily meal plans. Every call demands strict JSON from the model; a
//! fragment extractor recovers the payload when the response wraps it in
//! prose or code fences, and the typed payload shapes from `lp-core`
//! absorb the envelope variations.

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use lp_core::{Constraints, Intent, MealDayProposal, MealPayload, TaskPayload, TaskProposal};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const GENERATION_MAX_TOKENS: u32 = 2000;

const INTENT_TEMPERATURE: f32 = 0.0;
const TASK_TEMPERATURE: f32 = 0.3;
const MEAL_TEMPERATURE: f32 = 0.2;

/// Appended to every prompt so replies parse without post-editing.
const JSON_ONLY_GUARD: &str = "Return ONLY a valid JSON object or array. No extra text.";

const INTENT_SYSTEM_PROMPT: &str = "You are an intent extraction assistant. \
Extract goals (list), constraints (dict), priorities (list) and plan_duration_days (int). \
Return STRICT JSON only with keys: goals, constraints, priorities, plan_duration_days.";

const TASK_SYSTEM_PROMPT: &str = r#"You are a task planning agent.
Return ONLY JSON: an array of task objects:
[
  {
    "title": "...",
    "description": "...",
    "duration_minutes": 30,
    "priority": "low"|"medium"|"high",
    "preferred_time_block": "morning"|"afternoon"|"evening"
  }
]
IMPORTANT: Always return an array."#;

const MEAL_SYSTEM_PROMPT: &str = "You are a meal planner. \
Output STRICT JSON: an array of day plans. \
Each day plan must include: day_index (1..N), day_name, \
meals (array of {type,name,recipe_id,calories,ingredients}), total_calories. \
Return an array only.";

// Greedy, so the slice runs from the first opening brace to the last
// closing one even when the payload itself contains nested JSON.
static JSON_FRAGMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}|\[.*\]").unwrap());

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    /// Extracts a structured intent from free-form text.
    pub async fn extract_intent(&self, model: &str, text: &str) -> Result<Intent, LlmError> {
        let prompt = build_prompt(INTENT_SYSTEM_PROMPT, text);
        let value = self
            .generate_structured(model, prompt, INTENT_TEMPERATURE)
            .await?;
        serde_json::from_value(value).map_err(|err| LlmError::InvalidResponse(err.to_string()))
    }

    /// Proposes tasks for the given goals.
    ///
    /// An unrecognized payload shape yields an empty list rather than an
    /// error, matching the built-in generator's contract.
    pub async fn propose_tasks(
        &self,
        model: &str,
        goals: &[String],
        constraints: &Constraints,
        plan_days: i64,
    ) -> Result<Vec<TaskProposal>, LlmError> {
        let request = format!(
            "Generate up to {} useful tasks for goals: {goals:?}. Constraints: {}. \
             Ensure variety and assign realistic durations and time blocks. \
             Return as a JSON array.",
            plan_days.saturating_mul(2),
            render_constraints(constraints),
        );
        let prompt = build_prompt(TASK_SYSTEM_PROMPT, &request);
        let value = self
            .generate_structured(model, prompt, TASK_TEMPERATURE)
            .await?;
        let payload: TaskPayload = serde_json::from_value(value)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        Ok(payload.into_tasks())
    }

    /// Generates a day-by-day meal plan for the given goals.
    pub async fn generate_meal_plan(
        &self,
        model: &str,
        goals: &[String],
        constraints: &Constraints,
        plan_days: i64,
    ) -> Result<Vec<MealDayProposal>, LlmError> {
        let request = format!(
            "Create {plan_days} day meal plans for goals: {goals:?}. Constraints: {}. \
             Use available recipes if helpful. Return as a JSON array.",
            render_constraints(constraints),
        );
        let prompt = build_prompt(MEAL_SYSTEM_PROMPT, &request);
        let value = self
            .generate_structured(model, prompt, MEAL_TEMPERATURE)
            .await?;
        let value = normalize_meal_value(value);
        let payload: MealPayload = serde_json::from_value(value)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        Ok(normalize_meal_days(payload.into_days()))
    }

    async fn generate_structured(
        &self,
        model: &str,
        prompt: String,
        temperature: f32,
    ) -> Result<Value, LlmError> {
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: GENERATION_MAX_TOKENS,
            temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = extract_text(payload.content)?;
        parse_json_payload(&text)
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let mut pieces = Vec::new();
    for block in blocks {
        let ContentBlock::Text { text } = block;
        pieces.push(text);
    }
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_prompt(system: &str, request: &str) -> String {
    format!("{system}\n{JSON_ONLY_GUARD}\n\n{request}")
        .trim()
        .to_string()
}

fn render_constraints(constraints: &Constraints) -> String {
    serde_json::to_string(constraints).unwrap_or_else(|_| "{}".to_string())
}

/// Parses model output as JSON, recovering the first JSON-looking
/// fragment when the reply carries surrounding prose.
fn parse_json_payload(text: &str) -> Result<Value, LlmError> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }
    if let Some(fragment) = JSON_FRAGMENT_RE.find(trimmed) {
        if let Ok(value) = serde_json::from_str(fragment.as_str()) {
            return Ok(value);
        }
    }
    let mut preview = trimmed.to_string();
    if preview.len() > 120 {
        preview.truncate(120);
    }
    Err(LlmError::InvalidResponse(format!(
        "no JSON payload in: {preview}"
    )))
}

/// Rewrites meal objects so `recipe_id` is always present, preferring
/// an `id` key the model may have used instead. Non-string ids fall
/// back to the placeholder `r?`.
fn normalize_meal_value(mut value: Value) -> Value {
    let days = match &mut value {
        Value::Array(days) => days,
        Value::Object(map) => {
            let nested = if map.contains_key("meal_plan") {
                map.get_mut("meal_plan")
            } else {
                map.get_mut("days")
            };
            match nested {
                Some(Value::Array(days)) => days,
                _ => return value,
            }
        }
        _ => return value,
    };

    for day in days.iter_mut() {
        let Some(meals) = day.get_mut("meals").and_then(Value::as_array_mut) else {
            continue;
        };
        for meal in meals.iter_mut() {
            let Some(object) = meal.as_object_mut() else {
                continue;
            };
            if !object.contains_key("recipe_id") {
                let recipe_id = match object.get("id") {
                    Some(Value::String(id)) => id.clone(),
                    Some(Value::Number(id)) => id.to_string(),
                    _ => "r?".to_string(),
                };
                object.insert("recipe_id".to_string(), Value::String(recipe_id));
            }
            if !object.contains_key("calories") {
                object.insert("calories".to_string(), Value::from(300));
            }
        }
    }
    value
}

/// Fills positional day indexes and recomputes per-day calorie totals.
fn normalize_meal_days(mut days: Vec<MealDayProposal>) -> Vec<MealDayProposal> {
    for (position, day) in days.iter_mut().enumerate() {
        let index = match day.day_index {
            Some(index) if index != 0 => index,
            _ => i64::try_from(position + 1).unwrap_or(i64::MAX),
        };
        day.day_index = Some(index);
        if day.day_name.is_none() && day.day.is_none() {
            day.day_name = Some(format!("Day {index}"));
        }
        day.total_calories = day.meals.iter().map(|meal| meal.calories).sum();
    }
    days
}
