use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::nutrition::{calculate_targets, NutritionTargets};
use crate::core::{capitalize_first, GeneratorError, WEEK_DAYS};
use crate::models::{DietaryPreference, FitnessProfile, Macros, Meal, MealPlan, MealType};

/// Meal slots in serving order with their share of the daily targets
pub const MEAL_SLOTS: [(MealType, f64); 4] = [
    (MealType::Breakfast, 0.25),
    (MealType::Lunch, 0.35),
    (MealType::Dinner, 0.30),
    (MealType::Snack, 0.10),
];

/// Diet-specific name list a meal is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MealCategory {
    Regular,
    Vegetarian,
    Vegan,
    Keto,
}

impl MealCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Regular => "regular",
            MealCategory::Vegetarian => "vegetarian",
            MealCategory::Vegan => "vegan",
            MealCategory::Keto => "keto",
        }
    }
}

/// Dietary flags derived once per plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DietFlags {
    pub vegan: bool,
    pub vegetarian: bool,
    pub keto: bool,
    pub low_carb: bool,
    pub nut_allergy: bool,
}

impl DietFlags {
    pub fn from_profile(profile: &FitnessProfile) -> Self {
        Self {
            vegan: profile.prefers(DietaryPreference::Vegan),
            vegetarian: profile.prefers(DietaryPreference::Vegetarian),
            keto: profile.prefers(DietaryPreference::Keto),
            low_carb: profile.prefers(DietaryPreference::LowCarb),
            nut_allergy: profile.allergies.iter().any(|allergy| mentions_nuts(allergy)),
        }
    }

    /// First matching preference wins: vegan, vegetarian, keto, then regular
    pub fn category(&self) -> MealCategory {
        if self.vegan {
            MealCategory::Vegan
        } else if self.vegetarian {
            MealCategory::Vegetarian
        } else if self.keto {
            MealCategory::Keto
        } else {
            MealCategory::Regular
        }
    }
}

/// Case-insensitive "nut"/"peanut" check used for allergies and meal names
pub fn mentions_nuts(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("nut") || lower.contains("peanut")
}

#[rustfmt::skip]
pub fn meal_names(meal_type: MealType, category: MealCategory) -> &'static [&'static str] {
    use MealCategory::*;
    use MealType::*;

    match (meal_type, category) {
        (Breakfast, Regular) => &["Oatmeal with Berries", "Greek Yogurt Parfait", "Scrambled Eggs with Toast", "Smoothie Bowl"],
        (Breakfast, Vegetarian) => &["Avocado Toast", "Fruit Bowl with Yogurt", "Veggie Omelet", "Chia Pudding"],
        (Breakfast, Vegan) => &["Oatmeal with Plant Milk", "Fruit Smoothie", "Tofu Scramble", "Acai Bowl"],
        (Breakfast, Keto) => &["Keto Scrambled Eggs", "Avocado and Bacon", "Cheese Omelet", "Bulletproof Coffee"],

        (Lunch, Regular) => &["Grilled Chicken Salad", "Turkey Sandwich", "Chicken Rice Bowl", "Tuna Wrap"],
        (Lunch, Vegetarian) => &["Quinoa Salad", "Veggie Burger", "Caprese Sandwich", "Buddha Bowl"],
        (Lunch, Vegan) => &["Lentil Soup", "Veggie Wrap", "Quinoa Buddha Bowl", "Plant-Based Protein Bowl"],
        (Lunch, Keto) => &["Keto Caesar Salad", "Lettuce Wrap Burger", "Zucchini Noodles", "Cauliflower Rice Bowl"],

        (Dinner, Regular) => &["Grilled Salmon with Vegetables", "Chicken Stir Fry", "Beef with Sweet Potato", "Pasta with Meat Sauce"],
        (Dinner, Vegetarian) => &["Vegetable Curry", "Eggplant Parmesan", "Stuffed Bell Peppers", "Vegetarian Chili"],
        (Dinner, Vegan) => &["Lentil Curry", "Vegan Stir Fry", "Chickpea Curry", "Quinoa Stuffed Peppers"],
        (Dinner, Keto) => &["Keto Beef Steak", "Salmon with Asparagus", "Chicken Thighs with Broccoli", "Pork Chops with Cauliflower"],

        (Snack, Regular) => &["Apple with Peanut Butter", "Greek Yogurt", "Trail Mix", "Protein Bar"],
        (Snack, Vegetarian) => &["Hummus with Veggies", "Cheese and Crackers", "Fruit and Nuts", "Yogurt with Granola"],
        (Snack, Vegan) => &["Almond Butter Toast", "Fruit Smoothie", "Vegetable Chips", "Energy Balls"],
        (Snack, Keto) => &["Cheese Cubes", "Avocado", "Keto Fat Bomb", "Macadamia Nuts"],
    }
}

fn candidates<F>(
    names: &F,
    meal_type: MealType,
    category: MealCategory,
    nut_allergy: bool,
) -> Vec<&'static str>
where
    F: Fn(MealType, MealCategory) -> &'static [&'static str],
{
    names(meal_type, category)
        .iter()
        .copied()
        .filter(|name| !nut_allergy || !mentions_nuts(name))
        .collect()
}

/// Draw a meal name for a slot from the built-in tables
pub fn select_meal_name<R: Rng + ?Sized>(
    meal_type: MealType,
    flags: &DietFlags,
    rng: &mut R,
) -> Result<&'static str, GeneratorError> {
    select_from(meal_type, flags, rng, meal_names)
}

/// Draw a meal name for a slot from the lists `names` returns
///
/// When the allergy filter empties the diet's list, the regular list
/// (also filtered) is used instead before giving up.
pub fn select_from<R, F>(
    meal_type: MealType,
    flags: &DietFlags,
    rng: &mut R,
    names: F,
) -> Result<&'static str, GeneratorError>
where
    R: Rng + ?Sized,
    F: Fn(MealType, MealCategory) -> &'static [&'static str],
{
    let category = flags.category();
    let mut options = candidates(&names, meal_type, category, flags.nut_allergy);

    if options.is_empty() && category != MealCategory::Regular {
        tracing::debug!(
            "No {} {:?} options left after allergy filter, widening to regular",
            category.as_str(),
            meal_type
        );
        options = candidates(&names, meal_type, MealCategory::Regular, flags.nut_allergy);
    }

    options
        .choose(rng)
        .copied()
        .ok_or_else(|| GeneratorError::NoCandidates(category.as_str().to_string()))
}

fn base_ingredients(meal_type: MealType) -> &'static [&'static str] {
    match meal_type {
        MealType::Breakfast => &["oats", "berries", "milk", "honey"],
        MealType::Lunch => &["chicken breast", "mixed greens", "quinoa", "vegetables"],
        MealType::Dinner => &["salmon", "broccoli", "sweet potato", "olive oil"],
        MealType::Snack => &["apple", "yogurt", "almonds"],
    }
}

fn vegan_substitute(ingredient: &str) -> &str {
    match ingredient {
        "milk" => "plant milk",
        "yogurt" => "coconut yogurt",
        "honey" => "maple syrup",
        "chicken breast" => "tofu",
        "salmon" => "tempeh",
        other => other,
    }
}

const ANIMAL_PROTEINS: [&str; 2] = ["chicken breast", "salmon"];

/// Ingredient list for a slot adjusted to the diet flags
pub fn meal_ingredients(meal_type: MealType, flags: &DietFlags) -> Vec<String> {
    base_ingredients(meal_type)
        .iter()
        .copied()
        .filter_map(|ingredient| {
            if flags.vegan {
                Some(vegan_substitute(ingredient))
            } else if flags.vegetarian && ANIMAL_PROTEINS.contains(&ingredient) {
                None
            } else {
                Some(ingredient)
            }
        })
        .filter(|ingredient| {
            !flags.nut_allergy || !(ingredient.contains("almond") || ingredient.contains("peanut"))
        })
        .map(str::to_string)
        .collect()
}

fn instructions_for(meal_type: MealType) -> &'static str {
    match meal_type {
        MealType::Snack => "Simple preparation instructions.",
        _ => "Detailed cooking instructions would be provided here.",
    }
}

#[inline]
fn share(total: i32, fraction: f64) -> i32 {
    (f64::from(total) * fraction).round() as i32
}

/// Build the 7 day x 4 slot meal list from precomputed targets
pub fn build_meals<R: Rng + ?Sized>(
    targets: &NutritionTargets,
    flags: &DietFlags,
    rng: &mut R,
) -> Result<Vec<Meal>, GeneratorError> {
    let mut meals = Vec::with_capacity(WEEK_DAYS.len() * MEAL_SLOTS.len());
    let Macros { protein, carbs, fat } = targets.macros;

    for day in WEEK_DAYS {
        for (meal_type, fraction) in MEAL_SLOTS {
            meals.push(Meal {
                day: day.to_string(),
                meal_type,
                name: select_meal_name(meal_type, flags, rng)?.to_string(),
                calories: share(targets.target_calories, fraction),
                protein: share(protein, fraction),
                carbs: share(carbs, fraction),
                fat: share(fat, fraction),
                ingredients: meal_ingredients(meal_type, flags),
                instructions: instructions_for(meal_type).to_string(),
            });
        }
    }

    Ok(meals)
}

/// Generate a weekly meal plan with a caller supplied random source
pub fn generate_meal_plan_with_rng<R: Rng + ?Sized>(
    profile: &FitnessProfile,
    rng: &mut R,
) -> Result<MealPlan, GeneratorError> {
    let targets = calculate_targets(profile)?;
    let flags = DietFlags::from_profile(profile);
    let meals = build_meals(&targets, &flags, rng)?;
    let goal = profile.fitness_goal.phrase();

    tracing::debug!(
        "Generated fallback meal plan: calories={}, category={}, nut_allergy={}",
        targets.target_calories,
        flags.category().as_str(),
        flags.nut_allergy
    );

    Ok(MealPlan {
        name: format!("Personalized {} Meal Plan", capitalize_first(&goal)),
        description: format!(
            "A personalized meal plan with {} daily calories designed for {}",
            targets.target_calories, goal
        ),
        duration: "7 days".to_string(),
        total_calories: targets.target_calories,
        macros: targets.macros,
        meals,
    })
}

/// Generate a weekly meal plan without calling any external service
///
/// Meal names are drawn at random, so repeated calls may differ.
pub fn generate_meal_plan(profile: &FitnessProfile) -> Result<MealPlan, GeneratorError> {
    generate_meal_plan_with_rng(profile, &mut rand::thread_rng())
}
