// Service exports
pub mod ai;
pub mod auth;
pub mod cache;
pub mod planner;
pub mod postgres;

pub use ai::{AiClientError, AiPlanClient};
pub use auth::{AuthError, AuthService, Claims, TOKEN_COOKIE};
pub use cache::{CacheError, PlanCache, PlanKind};
pub use planner::PlanService;
pub use postgres::{NewWorkoutLog, PostgresClient, PostgresError};
