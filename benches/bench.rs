// Criterion benchmarks for FitJourney

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fitjourney::core::{calculate_targets, generate_meal_plan_with_rng, generate_workout_plan};
use fitjourney::models::{
    ActivityLevel, BodyWeight, DietaryPreference, Equipment, FitnessGoal, FitnessProfile, Gender,
    Height, WorkoutLocation,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn create_profile(frequency: u8) -> FitnessProfile {
    FitnessProfile {
        age: 34,
        gender: Gender::Female,
        height: Height::cm(168.0),
        current_weight: BodyWeight::kg(68.0),
        target_weight: BodyWeight::kg(63.0),
        fitness_goal: FitnessGoal::GainMuscle,
        activity_level: ActivityLevel::VeryActive,
        workout_location: WorkoutLocation::Gym,
        available_equipment: vec![Equipment::Dumbbells, Equipment::Barbells, Equipment::Bench],
        workout_frequency: frequency,
        workout_duration: 60,
        dietary_preferences: vec![DietaryPreference::Vegetarian],
        allergies: vec!["peanuts".to_string()],
    }
}

fn bench_nutrition_targets(c: &mut Criterion) {
    let profile = create_profile(4);
    c.bench_function("calculate_targets", |b| {
        b.iter(|| calculate_targets(black_box(&profile)));
    });
}

fn bench_workout_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("workout_plan");

    for frequency in [1u8, 4, 7].iter() {
        let profile = create_profile(*frequency);
        group.bench_with_input(BenchmarkId::from_parameter(frequency), &profile, |b, profile| {
            b.iter(|| generate_workout_plan(black_box(profile)));
        });
    }

    group.finish();
}

fn bench_meal_plan(c: &mut Criterion) {
    let profile = create_profile(4);
    let mut rng = StdRng::seed_from_u64(7);

    c.bench_function("meal_plan", |b| {
        b.iter(|| generate_meal_plan_with_rng(black_box(&profile), &mut rng));
    });
}

criterion_group!(benches, bench_nutrition_targets, bench_workout_plan, bench_meal_plan);
criterion_main!(benches);
