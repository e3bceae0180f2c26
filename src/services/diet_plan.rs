use crate::domain::form::FieldError;
use crate::domain::profile::UserProfile;
use crate::services::ai::{chat_request, first_choice_content, ChatBackend, GatewayReply};
use std::sync::Arc;

pub const SYSTEM_PROMPT: &str = "You are an expert nutritionist. Provide detailed, science-based meal plans. Always use markdown formatting.";

/// Returned as the plan when the gateway answers without any content.
pub const FALLBACK_PLAN: &str = "Unable to generate plan.";

#[derive(Debug, thiserror::Error)]
pub enum DietPlanError {
    #[error("AI_GATEWAY_API_KEY is not configured")]
    NotConfigured,
    #[error("{0}")]
    InvalidProfile(#[from] FieldError),
    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,
    #[error("AI credits exhausted. Please add credits.")]
    QuotaExhausted,
    /// Upstream status and body stay in the server log.
    #[error("Failed to generate diet plan")]
    Upstream,
    #[error("{0}")]
    Unexpected(String),
}

pub struct DietPlanService {
    backend: Arc<dyn ChatBackend>,
    api_key: Option<String>,
    model: String,
}

impl DietPlanService {
    pub fn new(backend: Arc<dyn ChatBackend>, api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            backend,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// One gateway round trip. Nothing is retried or cached.
    pub async fn generate(&self, profile: &UserProfile) -> Result<String, DietPlanError> {
        let api_key = self.api_key.as_deref().ok_or(DietPlanError::NotConfigured)?;
        profile.validate()?;

        let request = chat_request(&self.model, SYSTEM_PROMPT, build_prompt(profile))
            .map_err(|e| DietPlanError::Unexpected(e.to_string()))?;

        tracing::debug!(model = %self.model, "Requesting diet plan from AI gateway");
        let reply = self
            .backend
            .send(api_key, &request)
            .await
            .map_err(|e| DietPlanError::Unexpected(e.to_string()))?;

        classify_reply(reply)
    }
}

fn classify_reply(reply: GatewayReply) -> Result<String, DietPlanError> {
    match reply.status {
        429 => Err(DietPlanError::RateLimited),
        402 => Err(DietPlanError::QuotaExhausted),
        status if !reply.is_success() => {
            tracing::error!("AI gateway error: {} {}", status, reply.body);
            Err(DietPlanError::Upstream)
        }
        _ => {
            let content = first_choice_content(&reply.body)
                .map_err(|e| DietPlanError::Unexpected(e.to_string()))?;
            Ok(content.unwrap_or_else(|| FALLBACK_PLAN.to_string()))
        }
    }
}

pub fn build_prompt(profile: &UserProfile) -> String {
    let meals = profile.meals_per_day;
    format!(
        r#"You are an expert nutritionist and dietitian AI. Create a detailed, personalized daily meal plan for the following person:

Name: {name}
Age: {age}
Gender: {gender}
Height: {height} cm
Weight: {weight} kg
Activity Level: {activity}
Goal: {goal}
Meals per day: {meals}
Dietary Preferences/Restrictions: {preferences}
Health Conditions: {conditions}

Please provide:
1. **Calculated Daily Calorie Target** based on their BMR and activity level
2. **Macro Breakdown** (protein, carbs, fats in grams)
3. **Complete Meal Plan** for {meals} meals with:
   - Meal name and time suggestion
   - Specific foods with portions
   - Calories and macros per meal
4. **Hydration Recommendation**
5. **Important Tips** specific to their goal

Format the response in clean markdown with headers, bullet points, and bold text for key values."#,
        name = profile.name,
        age = profile.age,
        gender = profile.gender,
        height = profile.height,
        weight = profile.weight,
        activity = profile.activity_level.label(),
        goal = profile.goal.label(),
        preferences = profile.dietary_preferences_or_none(),
        conditions = profile.health_conditions_or_none(),
    )
}
