use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Problems found when checking a fitness profile before generation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("age must be between {min} and {max}, got {value}")]
    AgeOutOfRange { value: u8, min: u8, max: u8 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("workout frequency must be between 1 and 7 days, got {0}")]
    Frequency(u8),

    #[error("workout duration must be between 15 and 180 minutes, got {0}")]
    Duration(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    LoseWeight,
    GainMuscle,
    MaintainWeight,
    ImproveEndurance,
    #[default]
    GeneralFitness,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::LoseWeight => "lose_weight",
            FitnessGoal::GainMuscle => "gain_muscle",
            FitnessGoal::MaintainWeight => "maintain_weight",
            FitnessGoal::ImproveEndurance => "improve_endurance",
            FitnessGoal::GeneralFitness => "general_fitness",
        }
    }

    /// Human readable form: first underscore becomes a space ("lose weight")
    pub fn phrase(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    #[default]
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutLocation {
    #[default]
    Home,
    Gym,
    Outdoor,
    Hybrid,
}

impl WorkoutLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutLocation::Home => "home",
            WorkoutLocation::Gym => "gym",
            WorkoutLocation::Outdoor => "outdoor",
            WorkoutLocation::Hybrid => "hybrid",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Dumbbells,
    Barbells,
    ResistanceBands,
    PullUpBar,
    Treadmill,
    StationaryBike,
    Kettlebells,
    YogaMat,
    Bench,
    None,
}

impl Equipment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Equipment::Dumbbells => "dumbbells",
            Equipment::Barbells => "barbells",
            Equipment::ResistanceBands => "resistance_bands",
            Equipment::PullUpBar => "pull_up_bar",
            Equipment::Treadmill => "treadmill",
            Equipment::StationaryBike => "stationary_bike",
            Equipment::Kettlebells => "kettlebells",
            Equipment::YogaMat => "yoga_mat",
            Equipment::Bench => "bench",
            Equipment::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    Keto,
    Paleo,
    Mediterranean,
    LowCarb,
    HighProtein,
    None,
}

impl DietaryPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::Keto => "keto",
            DietaryPreference::Paleo => "paleo",
            DietaryPreference::Mediterranean => "mediterranean",
            DietaryPreference::LowCarb => "low_carb",
            DietaryPreference::HighProtein => "high_protein",
            DietaryPreference::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Cm,
    In,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lbs,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeightUnit::Kg => "kg",
            WeightUnit::Lbs => "lbs",
        }
    }
}

const CM_PER_INCH: f64 = 2.54;
const KG_PER_LB: f64 = 0.453_592_37;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Height {
    pub value: f64,
    #[serde(default)]
    pub unit: LengthUnit,
}

impl Height {
    pub fn cm(value: f64) -> Self {
        Self { value, unit: LengthUnit::Cm }
    }

    pub fn in_cm(&self) -> f64 {
        match self.unit {
            LengthUnit::Cm => self.value,
            LengthUnit::In => self.value * CM_PER_INCH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyWeight {
    pub value: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

impl BodyWeight {
    pub fn kg(value: f64) -> Self {
        Self { value, unit: WeightUnit::Kg }
    }

    pub fn in_kg(&self) -> f64 {
        match self.unit {
            WeightUnit::Kg => self.value,
            WeightUnit::Lbs => self.value * KG_PER_LB,
        }
    }
}

fn default_frequency() -> u8 { 3 }
fn default_duration() -> u16 { 60 }

/// Fitness profile collected by the profile wizard
///
/// Read-only input to plan generation. Missing enum fields fall back to
/// the same defaults the signup flow stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitnessProfile {
    pub age: u8,
    pub gender: Gender,
    pub height: Height,
    pub current_weight: BodyWeight,
    pub target_weight: BodyWeight,
    #[serde(default)]
    pub fitness_goal: FitnessGoal,
    #[serde(default)]
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub workout_location: WorkoutLocation,
    #[serde(default)]
    pub available_equipment: Vec<Equipment>,
    #[serde(default = "default_frequency")]
    pub workout_frequency: u8,
    #[serde(default = "default_duration")]
    pub workout_duration: u16,
    #[serde(default)]
    pub dietary_preferences: Vec<DietaryPreference>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

pub const MIN_AGE: u8 = 13;
pub const MAX_AGE: u8 = 100;

impl FitnessProfile {
    /// Reject values the calorie maths cannot work with
    pub fn ensure_valid(&self) -> Result<(), ProfileError> {
        if self.age < MIN_AGE || self.age > MAX_AGE {
            return Err(ProfileError::AgeOutOfRange {
                value: self.age,
                min: MIN_AGE,
                max: MAX_AGE,
            });
        }

        check_measurement("height", self.height.in_cm(), 50.0, 275.0)?;
        check_measurement("currentWeight", self.current_weight.in_kg(), 20.0, 400.0)?;
        check_measurement("targetWeight", self.target_weight.in_kg(), 20.0, 400.0)?;

        if !(1..=7).contains(&self.workout_frequency) {
            return Err(ProfileError::Frequency(self.workout_frequency));
        }
        if !(15..=180).contains(&self.workout_duration) {
            return Err(ProfileError::Duration(self.workout_duration));
        }

        Ok(())
    }

    pub fn has_equipment(&self, equipment: Equipment) -> bool {
        self.available_equipment.contains(&equipment)
    }

    pub fn prefers(&self, preference: DietaryPreference) -> bool {
        self.dietary_preferences.contains(&preference)
    }
}

fn check_measurement(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ProfileError> {
    if !value.is_finite() {
        return Err(ProfileError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(ProfileError::OutOfRange { field, value, min, max });
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u8,
    pub reps: String,
    pub rest: String,
}

/// One training day of a workout plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub day: String,
    pub focus: String,
    pub duration: u16,
    pub exercises: Vec<Exercise>,
    pub intensity: String,
    pub rest_periods: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub difficulty: Difficulty,
    pub workouts: Vec<Workout>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

/// Daily macro targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
}

impl Macros {
    /// Calories implied by the grams (4/4/9 kcal per gram)
    pub fn calories(&self) -> i32 {
        self.protein * 4 + self.carbs * 4 + self.fat * 9
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub day: String,
    #[serde(rename = "type")]
    pub meal_type: MealType,
    pub name: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fat: i32,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub name: String,
    pub description: String,
    pub duration: String,
    pub total_calories: i32,
    pub macros: Macros,
    pub meals: Vec<Meal>,
}

/// Which path produced a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "plan_source", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlanSource {
    Ai,
    Fallback,
}

/// A plan together with the path that produced it
#[derive(Debug, Clone)]
pub struct GeneratedPlan<T> {
    pub plan: T,
    pub source: PlanSource,
}

/// Registered account
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub fitness_profile: Option<FitnessProfile>,
    pub completed_profile: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWorkoutPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub plan: WorkoutPlan,
    pub source: PlanSource,
    pub target_goal: FitnessGoal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub plan: MealPlan,
    pub source: PlanSource,
    pub dietary_restrictions: Vec<DietaryPreference>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight: BodyWeight,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// Kind of session recorded in the workout tracker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggedWorkoutType {
    #[default]
    Strength,
    Cardio,
    Yoga,
    Pilates,
    Sports,
    Other,
}

impl LoggedWorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggedWorkoutType::Strength => "strength",
            LoggedWorkoutType::Cardio => "cardio",
            LoggedWorkoutType::Yoga => "yoga",
            LoggedWorkoutType::Pilates => "pilates",
            LoggedWorkoutType::Sports => "sports",
            LoggedWorkoutType::Other => "other",
        }
    }
}

/// One completed (or planned) session, at most one per user per day
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
    pub workout_type: LoggedWorkoutType,
    pub duration: Option<i32>,
    pub exercises: Vec<String>,
    pub intensity: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_profile() -> FitnessProfile {
        FitnessProfile {
            age: 28,
            gender: Gender::Male,
            height: Height::cm(175.0),
            current_weight: BodyWeight::kg(75.0),
            target_weight: BodyWeight::kg(70.0),
            fitness_goal: FitnessGoal::LoseWeight,
            activity_level: ActivityLevel::ModeratelyActive,
            workout_location: WorkoutLocation::Home,
            available_equipment: vec![Equipment::Dumbbells, Equipment::YogaMat],
            workout_frequency: 4,
            workout_duration: 45,
            dietary_preferences: vec![DietaryPreference::HighProtein],
            allergies: vec![],
        }
    }

    #[test]
    fn test_gender_labels_match_wire_names() {
        for gender in [Gender::Male, Gender::Female, Gender::Other] {
            let wire = serde_json::to_value(gender).unwrap();
            assert_eq!(wire, serde_json::json!(gender.as_str()));
        }
    }

    #[test]
    fn test_has_equipment() {
        let profile = sample_profile();
        assert!(profile.has_equipment(Equipment::Dumbbells));
        assert!(!profile.has_equipment(Equipment::Barbells));
    }

    #[test]
    fn test_profile_defaults_from_json() {
        let json = r#"{
            "age": 30,
            "gender": "female",
            "height": {"value": 165},
            "currentWeight": {"value": 60, "unit": "kg"},
            "targetWeight": {"value": 58}
        }"#;

        let profile: FitnessProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.fitness_goal, FitnessGoal::GeneralFitness);
        assert_eq!(profile.activity_level, ActivityLevel::ModeratelyActive);
        assert_eq!(profile.workout_location, WorkoutLocation::Home);
        assert_eq!(profile.workout_frequency, 3);
        assert_eq!(profile.workout_duration, 60);
        assert_eq!(profile.height.unit, LengthUnit::Cm);
        assert!(profile.ensure_valid().is_ok());
    }

    #[test]
    fn test_unit_conversion() {
        let height = Height { value: 70.0, unit: LengthUnit::In };
        assert!((height.in_cm() - 177.8).abs() < 1e-9);

        let weight = BodyWeight { value: 100.0, unit: WeightUnit::Lbs };
        assert!((weight.in_kg() - 45.359237).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_finite_weight() {
        let mut profile = sample_profile();
        profile.current_weight = BodyWeight::kg(f64::NAN);

        assert_eq!(
            profile.ensure_valid(),
            Err(ProfileError::NotFinite { field: "currentWeight" })
        );
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let mut profile = sample_profile();
        profile.age = 12;
        assert!(matches!(profile.ensure_valid(), Err(ProfileError::AgeOutOfRange { .. })));

        let mut profile = sample_profile();
        profile.workout_frequency = 8;
        assert_eq!(profile.ensure_valid(), Err(ProfileError::Frequency(8)));

        let mut profile = sample_profile();
        profile.workout_duration = 10;
        assert_eq!(profile.ensure_valid(), Err(ProfileError::Duration(10)));
    }

    #[test]
    fn test_goal_phrase() {
        assert_eq!(FitnessGoal::LoseWeight.phrase(), "lose weight");
        assert_eq!(FitnessGoal::ImproveEndurance.phrase(), "improve endurance");
    }

    #[test]
    fn test_macro_calories() {
        let macros = Macros { protein: 188, carbs: 188, fat: 72 };
        assert_eq!(macros.calories(), 2152);
    }
}
