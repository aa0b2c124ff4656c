// Plan generator exports
pub mod meal;
pub mod nutrition;
pub mod workout;

use thiserror::Error;

use crate::models::ProfileError;

pub use meal::{generate_meal_plan, generate_meal_plan_with_rng, DietFlags, MealCategory};
pub use nutrition::{calculate_targets, NutritionTargets};
pub use workout::{generate_workout_plan, WorkoutCategory};

/// Training week, Monday first
pub const WEEK_DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Errors raised by the local plan generators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    #[error("invalid fitness profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("no candidates available for category {0}")]
    NoCandidates(String),
}

/// "lose weight" -> "Lose weight"
pub(crate) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("gain muscle"), "Gain muscle");
        assert_eq!(capitalize_first(""), "");
    }
}
