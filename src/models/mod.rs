// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    ActivityLevel, BodyWeight, DietaryPreference, Difficulty, Equipment, Exercise, FitnessGoal,
    FitnessProfile, Gender, GeneratedPlan, Height, LengthUnit, LoggedWorkoutType, Macros, Meal,
    MealPlan, MealType, PlanSource, ProfileError, StoredMealPlan, StoredWorkoutPlan, User,
    WeightEntry, WeightUnit, Workout, WorkoutLocation, WorkoutLog, WorkoutPlan,
};
pub use requests::{
    LoginRequest, MonthQuery, SignupRequest, WeightEntryQuery, WeightEntryRequest,
    WeightListQuery, WorkoutIdQuery, WorkoutLogRequest, WorkoutLogUpdate,
};
pub use responses::{
    AuthCheckResponse, DataResponse, ErrorResponse, HealthResponse, MessageResponse,
    UserEnvelope, UserResponse,
};
