use crate::models::{
    BodyWeight, DietaryPreference, FitnessGoal, FitnessProfile, GeneratedPlan, LoggedWorkoutType,
    MealPlan, PlanSource, StoredMealPlan, StoredWorkoutPlan, User, WeightEntry, WorkoutLog,
    WorkoutLogUpdate, WorkoutPlan,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Invalid stored value: {0}")]
    InvalidData(String),
}

/// Fields of a workout log before it is stored
#[derive(Debug, Clone)]
pub struct NewWorkoutLog {
    pub date: NaiveDate,
    pub workout_type: LoggedWorkoutType,
    pub duration: Option<i32>,
    pub exercises: Vec<String>,
    pub notes: String,
    pub intensity: String,
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, fitness_profile, completed_profile, created_at, updated_at";
const WORKOUT_LOG_COLUMNS: &str =
    "id, user_id, date, completed, workout_type, duration, exercises, intensity, notes, created_at, updated_at";

/// PostgreSQL client for accounts, plans and progress tracking
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect, then run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Wrap an existing pool without running migrations
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    // Users

    /// Insert a new account; a taken email yields `PostgresError::Duplicate`
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, PostgresError> {
        let query = format!(
            "INSERT INTO users (id, name, email, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "email"))?;

        user_from_row(&row)
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_user(&self, user_id: Uuid) -> Result<Option<User>, PostgresError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        let row = sqlx::query(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// Store the fitness profile and mark it completed
    pub async fn update_fitness_profile(
        &self,
        user_id: Uuid,
        profile: &FitnessProfile,
    ) -> Result<Option<User>, PostgresError> {
        let query = format!(
            "UPDATE users
             SET fitness_profile = $2, completed_profile = TRUE, updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(user_id)
            .bind(Json(profile))
            .fetch_optional(&self.pool)
            .await?;

        tracing::debug!("Updated fitness profile for user {}", user_id);

        row.as_ref().map(user_from_row).transpose()
    }

    // Plans

    pub async fn insert_workout_plan(
        &self,
        user_id: Uuid,
        generated: &GeneratedPlan<WorkoutPlan>,
        target_goal: FitnessGoal,
    ) -> Result<StoredWorkoutPlan, PostgresError> {
        let query = r#"
            INSERT INTO workout_plans (id, user_id, plan, source, target_goal)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, plan, source, target_goal, created_at
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(Json(&generated.plan))
            .bind(generated.source)
            .bind(target_goal.as_str())
            .fetch_one(&self.pool)
            .await?;

        workout_plan_from_row(&row)
    }

    /// Most recent workout plan of a user
    pub async fn latest_workout_plan(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StoredWorkoutPlan>, PostgresError> {
        let query = r#"
            SELECT id, user_id, plan, source, target_goal, created_at
            FROM workout_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(workout_plan_from_row).transpose()
    }

    pub async fn insert_meal_plan(
        &self,
        user_id: Uuid,
        generated: &GeneratedPlan<MealPlan>,
        dietary_restrictions: &[DietaryPreference],
    ) -> Result<StoredMealPlan, PostgresError> {
        let query = r#"
            INSERT INTO meal_plans (id, user_id, plan, source, dietary_restrictions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, plan, source, dietary_restrictions, created_at
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(Json(&generated.plan))
            .bind(generated.source)
            .bind(Json(dietary_restrictions))
            .fetch_one(&self.pool)
            .await?;

        meal_plan_from_row(&row)
    }

    /// Most recent meal plan of a user
    pub async fn latest_meal_plan(
        &self,
        user_id: Uuid,
    ) -> Result<Option<StoredMealPlan>, PostgresError> {
        let query = r#"
            SELECT id, user_id, plan, source, dietary_restrictions, created_at
            FROM meal_plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(meal_plan_from_row).transpose()
    }

    // Weight tracking

    pub async fn insert_weight_entry(
        &self,
        user_id: Uuid,
        weight: BodyWeight,
        date: DateTime<Utc>,
        notes: &str,
    ) -> Result<WeightEntry, PostgresError> {
        let query = r#"
            INSERT INTO weight_entries (id, user_id, weight, unit, date, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, weight, unit, date, notes, created_at
        "#;

        let row = sqlx::query(query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(weight.value)
            .bind(weight.unit.as_str())
            .bind(date)
            .bind(notes)
            .fetch_one(&self.pool)
            .await?;

        weight_entry_from_row(&row)
    }

    /// Newest entries first
    pub async fn list_weight_entries(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<WeightEntry>, PostgresError> {
        let query = r#"
            SELECT id, user_id, weight, unit, date, notes, created_at
            FROM weight_entries
            WHERE user_id = $1
            ORDER BY date DESC
            LIMIT $2
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(weight_entry_from_row).collect()
    }

    pub async fn weight_entries_since(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<WeightEntry>, PostgresError> {
        let query = r#"
            SELECT id, user_id, weight, unit, date, notes, created_at
            FROM weight_entries
            WHERE user_id = $1 AND date >= $2
            ORDER BY date DESC
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(weight_entry_from_row).collect()
    }

    /// Delete an entry owned by the user; false when nothing matched
    pub async fn delete_weight_entry(
        &self,
        user_id: Uuid,
        entry_id: Uuid,
    ) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM weight_entries WHERE id = $1 AND user_id = $2")
            .bind(entry_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Workout tracker

    /// Log a workout; a second log on the same day yields `PostgresError::Duplicate`
    pub async fn insert_workout_log(
        &self,
        user_id: Uuid,
        log: &NewWorkoutLog,
    ) -> Result<WorkoutLog, PostgresError> {
        let query = format!(
            "INSERT INTO workout_logs (id, user_id, date, completed, workout_type, duration, exercises, intensity, notes)
             VALUES ($1, $2, $3, TRUE, $4, $5, $6, $7, $8)
             RETURNING {WORKOUT_LOG_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(log.date)
            .bind(log.workout_type.as_str())
            .bind(log.duration)
            .bind(Json(&log.exercises))
            .bind(&log.intensity)
            .bind(&log.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| unique_violation(e, "workout for this date"))?;

        workout_log_from_row(&row)
    }

    /// Logs with `start <= date <= end`, newest first
    pub async fn workout_logs_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<WorkoutLog>, PostgresError> {
        let query = format!(
            "SELECT {WORKOUT_LOG_COLUMNS}
             FROM workout_logs
             WHERE user_id = $1 AND date >= $2 AND date <= $3
             ORDER BY date DESC"
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(workout_log_from_row).collect()
    }

    pub async fn workout_logs_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> Result<Vec<WorkoutLog>, PostgresError> {
        let query = format!(
            "SELECT {WORKOUT_LOG_COLUMNS}
             FROM workout_logs
             WHERE user_id = $1 AND date >= $2
             ORDER BY date DESC"
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(workout_log_from_row).collect()
    }

    /// Apply the present fields of `update`; None when the log does not exist
    pub async fn update_workout_log(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
        update: &WorkoutLogUpdate,
    ) -> Result<Option<WorkoutLog>, PostgresError> {
        let query = format!(
            "UPDATE workout_logs SET
                workout_type = COALESCE($3, workout_type),
                duration = COALESCE($4, duration),
                exercises = COALESCE($5, exercises),
                notes = COALESCE($6, notes),
                intensity = COALESCE($7, intensity),
                completed = COALESCE($8, completed),
                updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING {WORKOUT_LOG_COLUMNS}"
        );

        let row = sqlx::query(&query)
            .bind(workout_id)
            .bind(user_id)
            .bind(update.workout_type.map(|t| t.as_str()))
            .bind(update.duration)
            .bind(update.exercises.as_ref().map(Json))
            .bind(update.notes.as_deref())
            .bind(update.intensity.as_deref())
            .bind(update.completed)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(workout_log_from_row).transpose()
    }

    pub async fn delete_workout_log(
        &self,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> Result<bool, PostgresError> {
        let result = sqlx::query("DELETE FROM workout_logs WHERE id = $1 AND user_id = $2")
            .bind(workout_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn unique_violation(err: sqlx::Error, what: &str) -> PostgresError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            PostgresError::Duplicate(what.to_string())
        }
        _ => PostgresError::SqlxError(err),
    }
}

/// Decode a snake_case/lowercase label stored as TEXT into its enum
fn parse_label<T: DeserializeOwned>(label: String) -> Result<T, PostgresError> {
    serde_json::from_value(serde_json::Value::String(label.clone()))
        .map_err(|_| PostgresError::InvalidData(format!("unknown label '{}'", label)))
}

fn user_from_row(row: &PgRow) -> Result<User, PostgresError> {
    let profile: Option<Json<FitnessProfile>> = row.try_get("fitness_profile")?;

    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        fitness_profile: profile.map(|p| p.0),
        completed_profile: row.try_get("completed_profile")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn workout_plan_from_row(row: &PgRow) -> Result<StoredWorkoutPlan, PostgresError> {
    let plan: Json<WorkoutPlan> = row.try_get("plan")?;
    let source: PlanSource = row.try_get("source")?;

    Ok(StoredWorkoutPlan {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        plan: plan.0,
        source,
        target_goal: parse_label(row.try_get("target_goal")?)?,
        created_at: row.try_get("created_at")?,
    })
}

fn meal_plan_from_row(row: &PgRow) -> Result<StoredMealPlan, PostgresError> {
    let plan: Json<MealPlan> = row.try_get("plan")?;
    let restrictions: Json<Vec<DietaryPreference>> = row.try_get("dietary_restrictions")?;

    Ok(StoredMealPlan {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        plan: plan.0,
        source: row.try_get("source")?,
        dietary_restrictions: restrictions.0,
        created_at: row.try_get("created_at")?,
    })
}

fn weight_entry_from_row(row: &PgRow) -> Result<WeightEntry, PostgresError> {
    Ok(WeightEntry {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        weight: BodyWeight {
            value: row.try_get("weight")?,
            unit: parse_label(row.try_get("unit")?)?,
        },
        date: row.try_get("date")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
    })
}

fn workout_log_from_row(row: &PgRow) -> Result<WorkoutLog, PostgresError> {
    let exercises: Json<Vec<String>> = row.try_get("exercises")?;

    Ok(WorkoutLog {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        date: row.try_get("date")?,
        completed: row.try_get("completed")?,
        workout_type: parse_label(row.try_get("workout_type")?)?,
        duration: row.try_get("duration")?,
        exercises: exercises.0,
        intensity: row.try_get("intensity")?,
        notes: row.try_get("notes")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeightUnit;

    #[test]
    fn test_parse_label() {
        let goal: FitnessGoal = parse_label("gain_muscle".to_string()).unwrap();
        assert_eq!(goal, FitnessGoal::GainMuscle);

        let unit: WeightUnit = parse_label("lbs".to_string()).unwrap();
        assert_eq!(unit, WeightUnit::Lbs);

        let kind: LoggedWorkoutType = parse_label("pilates".to_string()).unwrap();
        assert_eq!(kind, LoggedWorkoutType::Pilates);
    }

    #[test]
    fn test_parse_label_rejects_unknown() {
        let result: Result<FitnessGoal, _> = parse_label("get_huge".to_string());
        assert!(matches!(result, Err(PostgresError::InvalidData(_))));
    }

    #[test]
    fn test_labels_round_trip_through_as_str() {
        for kind in [
            LoggedWorkoutType::Strength,
            LoggedWorkoutType::Cardio,
            LoggedWorkoutType::Yoga,
            LoggedWorkoutType::Pilates,
            LoggedWorkoutType::Sports,
            LoggedWorkoutType::Other,
        ] {
            let parsed: LoggedWorkoutType = parse_label(kind.as_str().to_string()).unwrap();
            assert_eq!(parsed, kind);
        }
    }
}
