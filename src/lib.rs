//! FitJourney - fitness plan service
//!
//! Generates weekly workout and meal plans from a user's fitness profile,
//! asking an AI chat-completion API first and falling back to local
//! template generators. Also tracks body weight and logged workouts.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{
    calculate_targets, generate_meal_plan, generate_workout_plan, GeneratorError, NutritionTargets,
};
pub use models::{FitnessProfile, MealPlan, WorkoutPlan};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let profile: FitnessProfile = serde_json::from_str(
            r#"{"age":28,"gender":"male","height":{"value":175},"currentWeight":{"value":75},"targetWeight":{"value":70},"fitnessGoal":"lose_weight"}"#,
        )
        .unwrap();

        assert_eq!(calculate_targets(&profile).unwrap().target_calories, 2149);
    }
}
