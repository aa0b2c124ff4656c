use crate::core::{capitalize_first, GeneratorError, WEEK_DAYS};
use crate::models::{
    ActivityLevel, Difficulty, Equipment, Exercise, FitnessGoal, FitnessProfile, Workout,
    WorkoutLocation, WorkoutPlan,
};

/// Maximum exercises listed for a single training day
pub const MAX_EXERCISES_PER_DAY: usize = 6;

/// Training category a day is built around
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkoutCategory {
    Cardio,
    Strength,
    Hiit,
    Functional,
}

impl WorkoutCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutCategory::Cardio => "cardio",
            WorkoutCategory::Strength => "strength",
            WorkoutCategory::Hiit => "hiit",
            WorkoutCategory::Functional => "functional",
        }
    }

    /// Display label stored as the day's focus
    pub fn focus(&self) -> &'static str {
        match self {
            WorkoutCategory::Strength => "Strength Training",
            WorkoutCategory::Cardio => "Cardiovascular",
            WorkoutCategory::Hiit => "HIIT",
            WorkoutCategory::Functional => "Functional Training",
        }
    }

    pub fn rest_periods(&self) -> &'static str {
        match self {
            WorkoutCategory::Strength => "60-90 seconds between sets",
            WorkoutCategory::Cardio => "30 seconds between exercises",
            WorkoutCategory::Hiit => "15-30 seconds work, 45-90 seconds rest",
            WorkoutCategory::Functional => "45-60 seconds between exercises",
        }
    }
}

/// Where an exercise list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseSource {
    Bodyweight,
    Dumbbells,
    Gym,
    Outdoor,
}

/// Category mix per goal, in rotation order
///
/// The weights describe the intended mix only. Days are assigned by rotating
/// through the keys in this order, not by sampling on the weights.
pub fn category_weights(goal: FitnessGoal) -> &'static [(WorkoutCategory, f64)] {
    use WorkoutCategory::*;

    match goal {
        FitnessGoal::LoseWeight => &[(Cardio, 0.5), (Strength, 0.3), (Hiit, 0.2)],
        FitnessGoal::GainMuscle => &[(Strength, 0.6), (Cardio, 0.2), (Functional, 0.2)],
        FitnessGoal::ImproveEndurance => &[(Cardio, 0.6), (Hiit, 0.2), (Strength, 0.2)],
        _ => &[(Strength, 0.4), (Cardio, 0.3), (Functional, 0.3)],
    }
}

/// Round-robin category for the nth training day
pub fn category_for_day(goal: FitnessGoal, day_index: usize) -> WorkoutCategory {
    let weights = category_weights(goal);
    weights[day_index % weights.len()].0
}

#[rustfmt::skip]
pub fn exercise_table(category: WorkoutCategory, source: ExerciseSource) -> &'static [&'static str] {
    use ExerciseSource::*;
    use WorkoutCategory::*;

    match (category, source) {
        (Strength, Bodyweight) => &["Push-ups", "Squats", "Lunges", "Plank", "Burpees", "Mountain Climbers"],
        (Strength, Dumbbells) => &["Dumbbell Press", "Dumbbell Rows", "Goblet Squats", "Dumbbell Lunges"],
        (Strength, Gym) => &["Lat Pulldowns", "Leg Press", "Chest Flys", "Cable Rows"],
        (Cardio, Bodyweight) => &["Jumping Jacks", "High Knees", "Butt Kicks", "Running in Place"],
        (Cardio, Outdoor) => &["Jogging", "Hill Sprints", "Stair Climbing"],
        (Hiit, Bodyweight) => &["Burpees", "Jump Squats", "Push-up to T", "Plank Jacks"],
        (Functional, Bodyweight) => &["Bear Crawls", "Crab Walks", "Single Leg Deadlifts"],
        _ => &[],
    }
}

/// Build the exercise list for one day from the built-in tables
pub fn select_exercises(
    category: WorkoutCategory,
    has_dumbbells: bool,
    location: WorkoutLocation,
) -> Result<Vec<Exercise>, GeneratorError> {
    select_exercises_from(category, has_dumbbells, location, exercise_table)
}

/// Build the exercise list for one day from the lists `table` returns
///
/// Bodyweight moves first, then dumbbell, gym and outdoor additions when the
/// profile allows them, truncated in table order.
pub fn select_exercises_from<F>(
    category: WorkoutCategory,
    has_dumbbells: bool,
    location: WorkoutLocation,
    table: F,
) -> Result<Vec<Exercise>, GeneratorError>
where
    F: Fn(WorkoutCategory, ExerciseSource) -> &'static [&'static str],
{
    let mut names: Vec<&'static str> = table(category, ExerciseSource::Bodyweight).to_vec();

    if has_dumbbells {
        names.extend_from_slice(table(category, ExerciseSource::Dumbbells));
    }
    if location == WorkoutLocation::Gym {
        names.extend_from_slice(table(category, ExerciseSource::Gym));
    }
    if location == WorkoutLocation::Outdoor {
        names.extend_from_slice(table(category, ExerciseSource::Outdoor));
    }

    if names.is_empty() {
        return Err(GeneratorError::NoCandidates(category.as_str().to_string()));
    }

    let is_cardio = category == WorkoutCategory::Cardio;

    Ok(names
        .into_iter()
        .take(MAX_EXERCISES_PER_DAY)
        .map(|name| Exercise {
            name: name.to_string(),
            sets: if is_cardio { 1 } else { 3 },
            reps: if is_cardio { "30 seconds" } else { "8-12" }.to_string(),
            rest: if is_cardio { "10s" } else { "60s" }.to_string(),
        })
        .collect())
}

pub fn difficulty_for(level: ActivityLevel) -> Difficulty {
    match level {
        ActivityLevel::Sedentary | ActivityLevel::LightlyActive => Difficulty::Beginner,
        ActivityLevel::ModeratelyActive => Difficulty::Intermediate,
        ActivityLevel::VeryActive | ActivityLevel::ExtremelyActive => Difficulty::Advanced,
    }
}

pub fn intensity_for(level: ActivityLevel) -> &'static str {
    match level {
        ActivityLevel::Sedentary => "low",
        ActivityLevel::LightlyActive => "low-moderate",
        ActivityLevel::ModeratelyActive => "moderate",
        ActivityLevel::VeryActive => "moderate-high",
        ActivityLevel::ExtremelyActive => "high",
    }
}

/// Generate a weekly workout plan without calling any external service
///
/// Deterministic: the same profile always yields the same plan.
pub fn generate_workout_plan(profile: &FitnessProfile) -> Result<WorkoutPlan, GeneratorError> {
    profile.ensure_valid()?;

    let days = usize::from(profile.workout_frequency).min(WEEK_DAYS.len());
    let intensity = intensity_for(profile.activity_level);

    let workouts = WEEK_DAYS
        .iter()
        .take(days)
        .enumerate()
        .map(|(index, day)| {
            let category = category_for_day(profile.fitness_goal, index);
            let exercises = select_exercises(
                category,
                profile.has_equipment(Equipment::Dumbbells),
                profile.workout_location,
            )?;

            Ok(Workout {
                day: (*day).to_string(),
                focus: category.focus().to_string(),
                duration: profile.workout_duration,
                exercises,
                intensity: intensity.to_string(),
                rest_periods: category.rest_periods().to_string(),
            })
        })
        .collect::<Result<Vec<_>, GeneratorError>>()?;

    let goal = profile.fitness_goal.phrase();

    tracing::debug!(
        "Generated fallback workout plan: goal={}, days={}",
        profile.fitness_goal.as_str(),
        workouts.len()
    );

    Ok(WorkoutPlan {
        name: format!("Personalized {} Plan", capitalize_first(&goal)),
        description: format!(
            "A {} day per week plan designed for {} with {} workouts",
            profile.workout_frequency,
            goal,
            profile.workout_location.as_str()
        ),
        duration: format!("{} days/week", profile.workout_frequency),
        difficulty: difficulty_for(profile.activity_level),
        workouts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BodyWeight, Gender, Height};

    fn create_profile(goal: FitnessGoal, frequency: u8) -> FitnessProfile {
        FitnessProfile {
            age: 30,
            gender: Gender::Female,
            height: Height::cm(168.0),
            current_weight: BodyWeight::kg(64.0),
            target_weight: BodyWeight::kg(60.0),
            fitness_goal: goal,
            activity_level: ActivityLevel::LightlyActive,
            workout_location: WorkoutLocation::Home,
            available_equipment: vec![],
            workout_frequency: frequency,
            workout_duration: 45,
            dietary_preferences: vec![],
            allergies: vec![],
        }
    }

    #[test]
    fn test_gain_muscle_rotation() {
        let plan = generate_workout_plan(&create_profile(FitnessGoal::GainMuscle, 4)).unwrap();

        let days: Vec<&str> = plan.workouts.iter().map(|w| w.day.as_str()).collect();
        let focus: Vec<&str> = plan.workouts.iter().map(|w| w.focus.as_str()).collect();

        assert_eq!(days, vec!["Monday", "Tuesday", "Wednesday", "Thursday"]);
        assert_eq!(
            focus,
            vec!["Strength Training", "Cardiovascular", "Functional Training", "Strength Training"]
        );
    }

    #[test]
    fn test_cardio_exercise_parameters() {
        let exercises =
            select_exercises(WorkoutCategory::Cardio, false, WorkoutLocation::Home).unwrap();

        assert_eq!(exercises.len(), 4);
        for exercise in &exercises {
            assert_eq!(exercise.sets, 1);
            assert_eq!(exercise.reps, "30 seconds");
            assert_eq!(exercise.rest, "10s");
        }
    }

    #[test]
    fn test_outdoor_cardio_truncated_in_order() {
        let exercises =
            select_exercises(WorkoutCategory::Cardio, false, WorkoutLocation::Outdoor).unwrap();
        let names: Vec<&str> = exercises.iter().map(|e| e.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Jumping Jacks",
                "High Knees",
                "Butt Kicks",
                "Running in Place",
                "Jogging",
                "Hill Sprints"
            ]
        );
    }

    #[test]
    fn test_strength_with_dumbbells_keeps_bodyweight_first() {
        let exercises = select_exercises(
            WorkoutCategory::Strength,
            true,
            WorkoutLocation::Gym,
        )
        .unwrap();

        assert_eq!(exercises.len(), MAX_EXERCISES_PER_DAY);
        assert_eq!(exercises[0].name, "Push-ups");
        assert_eq!(exercises[5].name, "Mountain Climbers");
        assert_eq!(exercises[0].sets, 3);
        assert_eq!(exercises[0].reps, "8-12");
        assert_eq!(exercises[0].rest, "60s");
    }

    #[test]
    fn test_plan_metadata() {
        let mut profile = create_profile(FitnessGoal::LoseWeight, 3);
        profile.activity_level = ActivityLevel::VeryActive;
        let plan = generate_workout_plan(&profile).unwrap();

        assert_eq!(plan.name, "Personalized Lose weight Plan");
        assert_eq!(
            plan.description,
            "A 3 day per week plan designed for lose weight with home workouts"
        );
        assert_eq!(plan.duration, "3 days/week");
        assert_eq!(plan.difficulty, Difficulty::Advanced);
        assert_eq!(plan.workouts[0].intensity, "moderate-high");
        assert_eq!(plan.workouts[0].rest_periods, "30 seconds between exercises");
        assert_eq!(plan.workouts[0].duration, 45);
    }

    #[test]
    fn test_difficulty_mapping() {
        assert_eq!(difficulty_for(ActivityLevel::Sedentary), Difficulty::Beginner);
        assert_eq!(difficulty_for(ActivityLevel::LightlyActive), Difficulty::Beginner);
        assert_eq!(difficulty_for(ActivityLevel::ModeratelyActive), Difficulty::Intermediate);
        assert_eq!(difficulty_for(ActivityLevel::ExtremelyActive), Difficulty::Advanced);
    }

    #[test]
    fn test_deterministic() {
        let profile = create_profile(FitnessGoal::ImproveEndurance, 7);
        assert_eq!(
            generate_workout_plan(&profile).unwrap(),
            generate_workout_plan(&profile).unwrap()
        );
    }

    #[test]
    fn test_empty_addition_table_is_skipped() {
        assert!(exercise_table(WorkoutCategory::Hiit, ExerciseSource::Gym).is_empty());
        assert!(select_exercises(WorkoutCategory::Hiit, false, WorkoutLocation::Gym).is_ok());
    }

    #[test]
    fn test_empty_tables_have_no_candidates() {
        fn empty(_: WorkoutCategory, _: ExerciseSource) -> &'static [&'static str] {
            &[]
        }

        let err =
            select_exercises_from(WorkoutCategory::Functional, true, WorkoutLocation::Gym, empty)
                .unwrap_err();
        assert!(matches!(err, GeneratorError::NoCandidates(ref c) if c == "functional"));
    }

    #[test]
    fn test_additions_fill_empty_bodyweight_list() {
        fn gym_only(_: WorkoutCategory, source: ExerciseSource) -> &'static [&'static str] {
            match source {
                ExerciseSource::Gym => &["Rowing Machine"],
                _ => &[],
            }
        }

        let exercises =
            select_exercises_from(WorkoutCategory::Hiit, false, WorkoutLocation::Gym, gym_only)
                .unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name, "Rowing Machine");
    }

    #[test]
    fn test_dumbbell_additions_truncated_behind_bodyweight() {
        let mut profile = create_profile(FitnessGoal::GainMuscle, 1);
        profile.available_equipment = vec![Equipment::Dumbbells];
        let with_dumbbells = generate_workout_plan(&profile).unwrap();

        profile.available_equipment.clear();
        let bodyweight_only = generate_workout_plan(&profile).unwrap();

        assert_eq!(with_dumbbells.workouts[0].exercises.len(), MAX_EXERCISES_PER_DAY);
        assert_eq!(with_dumbbells, bodyweight_only);
    }
}
