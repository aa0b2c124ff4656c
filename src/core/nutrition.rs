use crate::models::{ActivityLevel, FitnessGoal, FitnessProfile, Gender, Macros, ProfileError};

/// Daily energy and macro targets for a profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutritionTargets {
    pub bmr: f64,
    pub tdee: f64,
    pub target_calories: i32,
    pub macros: Macros,
}

/// Share of daily calories per macro, as fractions summing to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSplit {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

const DEFICIT_KCAL: f64 = 500.0;
const SURPLUS_KCAL: f64 = 300.0;

/// Basal metabolic rate, Mifflin-St Jeor
///
/// Only `Gender::Male` gets the +5 offset; every other value uses -161.
#[inline]
pub fn basal_metabolic_rate(weight_kg: f64, height_cm: f64, age: u8, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        _ => base - 161.0,
    }
}

#[inline]
pub fn activity_multiplier(level: ActivityLevel) -> f64 {
    match level {
        ActivityLevel::Sedentary => 1.2,
        ActivityLevel::LightlyActive => 1.375,
        ActivityLevel::ModeratelyActive => 1.55,
        ActivityLevel::VeryActive => 1.725,
        ActivityLevel::ExtremelyActive => 1.9,
    }
}

/// TDEE adjusted for the goal: 500 kcal deficit to lose, 300 surplus to gain
pub fn target_calories(tdee: f64, goal: FitnessGoal) -> i32 {
    let adjusted = match goal {
        FitnessGoal::LoseWeight => tdee - DEFICIT_KCAL,
        FitnessGoal::GainMuscle => tdee + SURPLUS_KCAL,
        _ => tdee,
    };
    adjusted.round() as i32
}

pub fn macro_split(goal: FitnessGoal) -> MacroSplit {
    match goal {
        FitnessGoal::GainMuscle => MacroSplit {
            protein: 0.30,
            carbs: 0.40,
            fat: 0.30,
        },
        FitnessGoal::LoseWeight => MacroSplit {
            protein: 0.35,
            carbs: 0.35,
            fat: 0.30,
        },
        _ => MacroSplit {
            protein: 0.25,
            carbs: 0.45,
            fat: 0.30,
        },
    }
}

pub fn macro_grams(calories: i32, split: MacroSplit) -> Macros {
    let calories = f64::from(calories);
    Macros {
        protein: (calories * split.protein / KCAL_PER_G_PROTEIN).round() as i32,
        carbs: (calories * split.carbs / KCAL_PER_G_CARBS).round() as i32,
        fat: (calories * split.fat / KCAL_PER_G_FAT).round() as i32,
    }
}

/// Calculate calorie and macro targets for a profile
///
/// Weight and height are normalised to kg and cm first. The profile is
/// checked up front so malformed numbers never reach the formula.
pub fn calculate_targets(profile: &FitnessProfile) -> Result<NutritionTargets, ProfileError> {
    profile.ensure_valid()?;

    let bmr = basal_metabolic_rate(
        profile.current_weight.in_kg(),
        profile.height.in_cm(),
        profile.age,
        profile.gender,
    );
    let tdee = bmr * activity_multiplier(profile.activity_level);
    let target_calories = target_calories(tdee, profile.fitness_goal);
    let macros = macro_grams(target_calories, macro_split(profile.fitness_goal));

    Ok(NutritionTargets {
        bmr,
        tdee,
        target_calories,
        macros,
    })
}
