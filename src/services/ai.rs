use crate::models::{FitnessProfile, MealPlan, WorkoutPlan};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Errors that can occur when asking the AI service for a plan
#[derive(Debug, Error)]
pub enum AiClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("AI returned a plan without any {0}")]
    EmptyPlan(&'static str),
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Chat-completion client that asks an LLM for workout and meal plans
///
/// Everything the client needs is passed in at construction; it never
/// reads the process environment.
pub struct AiPlanClient {
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
    client: Client,
}

impl AiPlanClient {
    /// Create a new client with the default sampling parameters
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AiClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AiClientError::ClientBuild)?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            max_tokens: 1000,
            temperature: 0.7,
            client,
        })
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    /// Request a workout plan for a profile
    pub async fn workout_plan(
        &self,
        profile: &FitnessProfile,
    ) -> Result<WorkoutPlan, AiClientError> {
        let content = self.complete(workout_prompt(profile)).await?;
        let plan: WorkoutPlan = parse_plan(&content)?;

        if plan.workouts.is_empty() {
            return Err(AiClientError::EmptyPlan("workouts"));
        }
        Ok(plan)
    }

    /// Request a meal plan for a profile
    pub async fn meal_plan(&self, profile: &FitnessProfile) -> Result<MealPlan, AiClientError> {
        let content = self.complete(meal_prompt(profile)).await?;
        let plan: MealPlan = parse_plan(&content)?;

        if plan.meals.is_empty() {
            return Err(AiClientError::EmptyPlan("meals"));
        }
        Ok(plan)
    }

    async fn complete(&self, prompt: String) -> Result<String, AiClientError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!("Requesting plan from {} (model {})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiClientError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| {
                AiClientError::InvalidResponse(format!("Failed to parse completion: {}", e))
            })?;

        chat.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiClientError::InvalidResponse("Missing choices".into()))
    }
}

fn parse_plan<T>(content: &str) -> Result<T, AiClientError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AiClientError::InvalidResponse(format!("Failed to parse plan: {}", e)))
}

/// Drop a surrounding Markdown code fence (```json ... ```) if present
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Skip the info string ("json") on the opening line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn join_or_none<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let joined = items
        .into_iter()
        .map(|item| item.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        "none".to_string()
    } else {
        joined
    }
}

pub fn workout_prompt(profile: &FitnessProfile) -> String {
    format!(
        "Create a personalized workout plan for someone with the following profile:\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Fitness Goal: {}\n\
         - Activity Level: {}\n\
         - Workout Location: {}\n\
         - Available Equipment: {}\n\
         - Frequency: {} days/week\n\
         - Duration: {} minutes\n\n\
         Respond with JSON only, shaped as {{\"name\", \"description\", \"duration\", \
         \"difficulty\" (beginner|intermediate|advanced), \"workouts\": [{{\"day\", \"focus\", \
         \"duration\", \"exercises\": [{{\"name\", \"sets\", \"reps\", \"rest\"}}], \"intensity\", \
         \"restPeriods\"}}]}} with one entry per training day.",
        profile.age,
        profile.gender.as_str(),
        profile.fitness_goal.as_str(),
        profile.activity_level.as_str(),
        profile.workout_location.as_str(),
        join_or_none(profile.available_equipment.iter().map(|e| e.as_str())),
        profile.workout_frequency,
        profile.workout_duration,
    )
}

pub fn meal_prompt(profile: &FitnessProfile) -> String {
    format!(
        "Create a personalized meal plan for someone with the following profile:\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Fitness Goal: {}\n\
         - Activity Level: {}\n\
         - Current Weight: {} {}\n\
         - Target Weight: {} {}\n\
         - Dietary Preferences: {}\n\
         - Allergies: {}\n\n\
         Provide 7 days with breakfast, lunch, dinner and a snack. Respond with JSON only, \
         shaped as {{\"name\", \"description\", \"duration\", \"totalCalories\", \
         \"macros\": {{\"protein\", \"carbs\", \"fat\"}}, \"meals\": [{{\"day\", \"type\", \"name\", \
         \"calories\", \"protein\", \"carbs\", \"fat\", \"ingredients\", \"instructions\"}}]}}.",
        profile.age,
        profile.gender.as_str(),
        profile.fitness_goal.as_str(),
        profile.activity_level.as_str(),
        profile.current_weight.value,
        profile.current_weight.unit.as_str(),
        profile.target_weight.value,
        profile.target_weight.unit.as_str(),
        join_or_none(profile.dietary_preferences.iter().map(|p| p.as_str())),
        join_or_none(&profile.allergies),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BodyWeight, Equipment, FitnessGoal, Gender, Height};

    fn create_profile() -> FitnessProfile {
        FitnessProfile {
            age: 34,
            gender: Gender::Female,
            height: Height::cm(165.0),
            current_weight: BodyWeight::kg(64.0),
            target_weight: BodyWeight::kg(60.0),
            fitness_goal: FitnessGoal::ImproveEndurance,
            activity_level: Default::default(),
            workout_location: Default::default(),
            available_equipment: vec![Equipment::Dumbbells, Equipment::YogaMat],
            workout_frequency: 5,
            workout_duration: 40,
            dietary_preferences: vec![],
            allergies: vec!["shellfish".to_string()],
        }
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn test_workout_prompt_lists_profile() {
        let prompt = workout_prompt(&create_profile());

        assert!(prompt.contains("- Age: 34"));
        assert!(prompt.contains("- Gender: female"));
        assert!(prompt.contains("- Fitness Goal: improve_endurance"));
        assert!(prompt.contains("- Available Equipment: dumbbells, yoga_mat"));
        assert!(prompt.contains("- Frequency: 5 days/week"));
        assert!(prompt.contains("- Duration: 40 minutes"));
    }

    #[test]
    fn test_meal_prompt_lists_profile() {
        let prompt = meal_prompt(&create_profile());

        assert!(prompt.contains("- Gender: female"));
        assert!(prompt.contains("- Current Weight: 64 kg"));
        assert!(prompt.contains("- Dietary Preferences: none"));
        assert!(prompt.contains("- Allergies: shellfish"));
    }

    #[test]
    fn test_parse_plan_rejects_prose() {
        let result: Result<WorkoutPlan, _> = parse_plan("Here is your plan: day 1 squats");
        assert!(matches!(result, Err(AiClientError::InvalidResponse(_))));
    }
}
