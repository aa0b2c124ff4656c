// Generator property tests for FitJourney

use fitjourney::core::meal::{meal_names, MealCategory};
use fitjourney::core::nutrition::{activity_multiplier, macro_split};
use fitjourney::core::{
    calculate_targets, generate_meal_plan_with_rng, generate_workout_plan, WEEK_DAYS,
};
use fitjourney::models::{
    ActivityLevel, BodyWeight, DietaryPreference, Equipment, FitnessGoal, FitnessProfile, Gender,
    Height, MealType, WorkoutLocation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const GOALS: [FitnessGoal; 5] = [
    FitnessGoal::LoseWeight,
    FitnessGoal::GainMuscle,
    FitnessGoal::MaintainWeight,
    FitnessGoal::ImproveEndurance,
    FitnessGoal::GeneralFitness,
];

const LEVELS: [ActivityLevel; 5] = [
    ActivityLevel::Sedentary,
    ActivityLevel::LightlyActive,
    ActivityLevel::ModeratelyActive,
    ActivityLevel::VeryActive,
    ActivityLevel::ExtremelyActive,
];

fn create_test_profile(goal: FitnessGoal, level: ActivityLevel) -> FitnessProfile {
    FitnessProfile {
        age: 28,
        gender: Gender::Male,
        height: Height::cm(175.0),
        current_weight: BodyWeight::kg(75.0),
        target_weight: BodyWeight::kg(70.0),
        fitness_goal: goal,
        activity_level: level,
        workout_location: WorkoutLocation::Home,
        available_equipment: vec![],
        workout_frequency: 3,
        workout_duration: 45,
        dietary_preferences: vec![],
        allergies: vec![],
    }
}

/// Straight recomputation of the target calories, kept apart from the library code
fn expected_calories(profile: &FitnessProfile) -> f64 {
    let weight = profile.current_weight.in_kg();
    let height = profile.height.in_cm();
    let age = f64::from(profile.age);
    let bmr = match profile.gender {
        Gender::Male => 10.0 * weight + 6.25 * height - 5.0 * age + 5.0,
        _ => 10.0 * weight + 6.25 * height - 5.0 * age - 161.0,
    };
    let tdee = bmr * activity_multiplier(profile.activity_level);
    match profile.fitness_goal {
        FitnessGoal::LoseWeight => tdee - 500.0,
        FitnessGoal::GainMuscle => tdee + 300.0,
        _ => tdee,
    }
}

#[test]
fn test_reference_scenario_targets() {
    let profile = create_test_profile(FitnessGoal::LoseWeight, ActivityLevel::ModeratelyActive);
    let targets = calculate_targets(&profile).unwrap();

    assert_eq!(targets.target_calories, 2149);
    assert!((targets.macros.calories() - targets.target_calories).abs() <= 3);
}

#[test]
fn test_target_calories_match_recomputation() {
    for goal in GOALS {
        for level in LEVELS {
            for gender in [Gender::Male, Gender::Female, Gender::Other] {
                let bodies = [(16, 55.0, 160.0), (35, 82.5, 181.0), (70, 64.0, 158.5)];
                for (age, weight, height) in bodies {
                    let mut profile = create_test_profile(goal, level);
                    profile.gender = gender;
                    profile.age = age;
                    profile.current_weight = BodyWeight::kg(weight);
                    profile.height = Height::cm(height);

                    let targets = calculate_targets(&profile).unwrap();
                    let expected = expected_calories(&profile);
                    assert!(
                        (f64::from(targets.target_calories) - expected).abs() <= 1.0,
                        "{:?}/{:?}/{:?}: {} vs {}",
                        goal,
                        level,
                        gender,
                        targets.target_calories,
                        expected
                    );
                }
            }
        }
    }
}

#[test]
fn test_macro_calories_track_target() {
    // Each gram figure is rounded on its own, so the sum can drift by at
    // most 2 + 2 + 4.5 kcal from the target.
    for goal in GOALS {
        for level in LEVELS {
            let profile = create_test_profile(goal, level);
            let targets = calculate_targets(&profile).unwrap();
            let drift = f64::from((targets.macros.calories() - targets.target_calories).abs());

            assert!(drift <= 8.5, "{:?}/{:?} drifted by {}", goal, level, drift);
        }
    }
}

#[test]
fn test_macro_split_matches_goal() {
    let split = macro_split(FitnessGoal::GainMuscle);
    assert_eq!((split.protein, split.carbs, split.fat), (0.30, 0.40, 0.30));

    let split = macro_split(FitnessGoal::LoseWeight);
    assert_eq!((split.protein, split.carbs, split.fat), (0.35, 0.35, 0.30));

    let split = macro_split(FitnessGoal::ImproveEndurance);
    assert_eq!((split.protein, split.carbs, split.fat), (0.25, 0.45, 0.30));
}

#[test]
fn test_frequency_sets_training_days() {
    for frequency in 1..=7u8 {
        let mut profile = create_test_profile(FitnessGoal::LoseWeight, ActivityLevel::Sedentary);
        profile.workout_frequency = frequency;

        let plan = generate_workout_plan(&profile).unwrap();
        let days: Vec<&str> = plan.workouts.iter().map(|w| w.day.as_str()).collect();

        assert_eq!(days, WEEK_DAYS[..usize::from(frequency)].to_vec());
        assert_eq!(plan.duration, format!("{} days/week", frequency));
    }
}

#[test]
fn test_every_day_has_bounded_exercises() {
    let locations = [
        WorkoutLocation::Home,
        WorkoutLocation::Gym,
        WorkoutLocation::Outdoor,
        WorkoutLocation::Hybrid,
    ];

    for goal in GOALS {
        for location in locations {
            for equipment in [vec![], vec![Equipment::Dumbbells, Equipment::Bench]] {
                let mut profile = create_test_profile(goal, ActivityLevel::VeryActive);
                profile.workout_frequency = 7;
                profile.workout_location = location;
                profile.available_equipment = equipment;

                let plan = generate_workout_plan(&profile).unwrap();
                for workout in &plan.workouts {
                    assert!(
                        (1..=6).contains(&workout.exercises.len()),
                        "{} has {} exercises",
                        workout.day,
                        workout.exercises.len()
                    );
                }
            }
        }
    }
}

#[test]
fn test_gain_muscle_rotation() {
    let mut profile = create_test_profile(FitnessGoal::GainMuscle, ActivityLevel::ModeratelyActive);
    profile.workout_frequency = 4;

    let plan = generate_workout_plan(&profile).unwrap();
    let focus: Vec<(&str, &str)> = plan
        .workouts
        .iter()
        .map(|w| (w.day.as_str(), w.focus.as_str()))
        .collect();

    assert_eq!(
        focus,
        vec![
            ("Monday", "Strength Training"),
            ("Tuesday", "Cardiovascular"),
            ("Wednesday", "Functional Training"),
            ("Thursday", "Strength Training"),
        ]
    );
}

#[test]
fn test_vegan_meals_come_from_vegan_lists() {
    let mut profile =
        create_test_profile(FitnessGoal::MaintainWeight, ActivityLevel::LightlyActive);
    profile.dietary_preferences = vec![DietaryPreference::Vegan, DietaryPreference::Keto];

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let plan = generate_meal_plan_with_rng(&profile, &mut rng).unwrap();

        assert_eq!(plan.meals.len(), 28);
        for meal in &plan.meals {
            assert!(
                meal_names(meal.meal_type, MealCategory::Vegan).contains(&meal.name.as_str()),
                "{} is not a vegan {:?}",
                meal.name,
                meal.meal_type
            );
            assert!(!meal.ingredients.iter().any(|i| i == "salmon" || i == "chicken breast"));
        }
    }
}

#[test]
fn test_nut_allergy_excludes_nut_meals() {
    for preferences in [
        vec![],
        vec![DietaryPreference::Vegetarian],
        vec![DietaryPreference::Keto],
        vec![DietaryPreference::Vegan],
    ] {
        let mut profile = create_test_profile(FitnessGoal::GainMuscle, ActivityLevel::VeryActive);
        profile.dietary_preferences = preferences;
        profile.allergies = vec!["Peanuts".to_string()];

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let plan = generate_meal_plan_with_rng(&profile, &mut rng).unwrap();

            for meal in &plan.meals {
                let name = meal.name.to_lowercase();
                assert!(!name.contains("nut") && !name.contains("peanut"), "{}", meal.name);
                assert!(!meal.ingredients.iter().any(|i| i.contains("almond")));
            }
        }
    }
}

#[test]
fn test_meal_plan_layout() {
    let profile = create_test_profile(FitnessGoal::LoseWeight, ActivityLevel::ModeratelyActive);
    let mut rng = StdRng::seed_from_u64(42);
    let plan = generate_meal_plan_with_rng(&profile, &mut rng).unwrap();

    assert_eq!(plan.total_calories, 2149);
    assert_eq!(plan.duration, "7 days");
    assert_eq!(plan.name, "Personalized Lose weight Meal Plan");

    let slots = [MealType::Breakfast, MealType::Lunch, MealType::Dinner, MealType::Snack];
    for (index, meal) in plan.meals.iter().enumerate() {
        assert_eq!(meal.day, WEEK_DAYS[index / 4]);
        assert_eq!(meal.meal_type, slots[index % 4]);
    }
}

#[test]
fn test_seeded_meal_plans_repeat() {
    let mut profile = create_test_profile(FitnessGoal::GeneralFitness, ActivityLevel::Sedentary);
    profile.gender = Gender::Female;

    let a = generate_meal_plan_with_rng(&profile, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = generate_meal_plan_with_rng(&profile, &mut StdRng::seed_from_u64(9)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_plans_serialize_camel_case() {
    let profile =
        create_test_profile(FitnessGoal::ImproveEndurance, ActivityLevel::ExtremelyActive);
    let plan = generate_workout_plan(&profile).unwrap();
    let json = serde_json::to_value(&plan).unwrap();

    assert_eq!(json["difficulty"], "advanced");
    assert!(json["workouts"][0].get("restPeriods").is_some());
    assert_eq!(json["workouts"][0]["intensity"], "high");

    let meals = generate_meal_plan_with_rng(&profile, &mut StdRng::seed_from_u64(1)).unwrap();
    let json = serde_json::to_value(&meals).unwrap();
    assert!(json.get("totalCalories").is_some());
    assert_eq!(json["meals"][0]["type"], "breakfast");
}
