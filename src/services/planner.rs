use crate::core::{generate_meal_plan, generate_workout_plan, GeneratorError};
use crate::models::{FitnessProfile, GeneratedPlan, MealPlan, PlanSource, WorkoutPlan};
use crate::services::ai::AiPlanClient;
use std::sync::Arc;

/// Produces plans, preferring the AI service and falling back to the
/// local generators on any AI failure
///
/// Callers always get a plan unless the profile itself is unusable.
#[derive(Clone, Default)]
pub struct PlanService {
    ai: Option<Arc<AiPlanClient>>,
}

impl PlanService {
    pub fn new(ai: Option<AiPlanClient>) -> Self {
        Self { ai: ai.map(Arc::new) }
    }

    /// Planner that only uses the local generators
    pub fn fallback_only() -> Self {
        Self::default()
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    pub async fn workout_plan(
        &self,
        profile: &FitnessProfile,
    ) -> Result<GeneratedPlan<WorkoutPlan>, GeneratorError> {
        profile.ensure_valid()?;

        if let Some(ai) = &self.ai {
            match ai.workout_plan(profile).await {
                Ok(plan) => {
                    tracing::info!("Generated workout plan with AI service");
                    return Ok(GeneratedPlan { plan, source: PlanSource::Ai });
                }
                Err(e) => {
                    tracing::warn!("AI workout generation failed, using fallback: {}", e);
                }
            }
        } else {
            tracing::debug!("AI client not configured, using fallback workout generator");
        }

        Ok(GeneratedPlan {
            plan: generate_workout_plan(profile)?,
            source: PlanSource::Fallback,
        })
    }

    pub async fn meal_plan(
        &self,
        profile: &FitnessProfile,
    ) -> Result<GeneratedPlan<MealPlan>, GeneratorError> {
        profile.ensure_valid()?;

        if let Some(ai) = &self.ai {
            match ai.meal_plan(profile).await {
                Ok(plan) => {
                    tracing::info!("Generated meal plan with AI service");
                    return Ok(GeneratedPlan { plan, source: PlanSource::Ai });
                }
                Err(e) => {
                    tracing::warn!("AI meal generation failed, using fallback: {}", e);
                }
            }
        } else {
            tracing::debug!("AI client not configured, using fallback meal generator");
        }

        Ok(GeneratedPlan {
            plan: generate_meal_plan(profile)?,
            source: PlanSource::Fallback,
        })
    }
}
