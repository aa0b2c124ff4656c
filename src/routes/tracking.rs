use crate::models::requests::parse_date_input;
use crate::models::{
    BodyWeight, DataResponse, MessageResponse, MonthQuery, WeightEntryQuery, WeightEntryRequest,
    WeightListQuery, WorkoutIdQuery, WorkoutLogRequest, WorkoutLogUpdate,
};
use crate::routes::{authenticate, error_response, internal_error, AppState};
use crate::services::{NewWorkoutLog, PostgresError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use validator::Validate;

const DEFAULT_WEIGHT_LIMIT: i64 = 10;
const MAX_WEIGHT_LIMIT: i64 = 100;
const RECENT_DAYS: i64 = 30;
const MIN_WEIGHT_KG: f64 = 20.0;
const MAX_WEIGHT_KG: f64 = 400.0;
const DEFAULT_INTENSITY: &str = "moderate";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/weight")
            .route(web::get().to(list_weight_entries))
            .route(web::post().to(add_weight_entry))
            .route(web::delete().to(delete_weight_entry)),
    )
    .route("/weight/recent", web::get().to(recent_weight_entries))
    .service(
        web::resource("/workout-tracker")
            .route(web::get().to(list_workouts))
            .route(web::post().to(log_workout))
            .route(web::put().to(update_workout))
            .route(web::delete().to(delete_workout)),
    )
    .route("/workout-tracker/recent", web::get().to(recent_workouts));
}

/// First and last day of a calendar month
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

/// GET /api/weight?limit={n}
async fn list_weight_entries(
    state: web::Data<AppState>,
    query: web::Query<WeightListQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let limit = query
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_WEIGHT_LIMIT)
        .min(MAX_WEIGHT_LIMIT);

    match state.db.list_weight_entries(user_id, limit).await {
        Ok(entries) => HttpResponse::Ok().json(DataResponse::new(entries)),
        Err(e) => internal_error("Weight entries fetch failed", e),
    }
}

/// POST /api/weight
async fn add_weight_entry(
    state: web::Data<AppState>,
    req: web::Json<WeightEntryRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let Some(value) = req.weight else {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", "Weight is required");
    };

    let weight = BodyWeight { value, unit: req.unit };
    let kg = weight.in_kg();
    if !kg.is_finite() || !(MIN_WEIGHT_KG..=MAX_WEIGHT_KG).contains(&kg) {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Weight must be between 20 and 400 kg",
        );
    }

    let date = match req.date.as_deref() {
        Some(input) => match parse_date_input(input) {
            Some(date) => date,
            None => {
                return error_response(StatusCode::BAD_REQUEST, "validation_failed", "Invalid date")
            }
        },
        None => Utc::now(),
    };

    let notes = req.notes.as_deref().unwrap_or_default();
    match state.db.insert_weight_entry(user_id, weight, date, notes).await {
        Ok(entry) => HttpResponse::Created().json(DataResponse::with_message(
            "Weight entry added successfully",
            entry,
        )),
        Err(e) => internal_error("Failed to add weight entry", e),
    }
}

/// DELETE /api/weight?entryId={id}
async fn delete_weight_entry(
    state: web::Data<AppState>,
    query: web::Query<WeightEntryQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Some(entry_id) = query.entry_id else {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", "Entry ID is required");
    };

    match state.db.delete_weight_entry(user_id, entry_id).await {
        Ok(true) => {
            HttpResponse::Ok().json(MessageResponse::new("Weight entry deleted successfully"))
        }
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "Entry not found"),
        Err(e) => internal_error("Failed to delete weight entry", e),
    }
}

/// Entries from the last 30 days, newest first
///
/// GET /api/weight/recent
async fn recent_weight_entries(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let since = Utc::now() - Duration::days(RECENT_DAYS);
    match state.db.weight_entries_since(user_id, since).await {
        Ok(entries) => HttpResponse::Ok().json(DataResponse::new(entries)),
        Err(e) => internal_error("Recent weight entries fetch failed", e),
    }
}

/// Workouts logged in a month, the current one unless both year and month are given
///
/// GET /api/workout-tracker?year={y}&month={m}
async fn list_workouts(
    state: web::Data<AppState>,
    query: web::Query<MonthQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let today = Utc::now().date_naive();
    let (year, month) = match (query.year, query.month) {
        (Some(year), Some(month)) => (year, month),
        _ => (today.year(), today.month()),
    };

    let Some((start, end)) = month_bounds(year, month) else {
        return error_response(StatusCode::BAD_REQUEST, "invalid_query", "Invalid year or month");
    };

    match state.db.workout_logs_between(user_id, start, end).await {
        Ok(logs) => HttpResponse::Ok().json(DataResponse::new(logs)),
        Err(e) => internal_error("Workout entries fetch failed", e),
    }
}

/// POST /api/workout-tracker
async fn log_workout(
    state: web::Data<AppState>,
    req: web::Json<WorkoutLogRequest>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let req = req.into_inner();
    let Some(date) = req.date else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Workout date is required",
        );
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let log = NewWorkoutLog {
        date,
        workout_type: req.workout_type.unwrap_or_default(),
        duration: req.duration,
        exercises: req.exercises.unwrap_or_default(),
        notes: req.notes.unwrap_or_default(),
        intensity: req.intensity.unwrap_or_else(|| DEFAULT_INTENSITY.to_string()),
    };

    match state.db.insert_workout_log(user_id, &log).await {
        Ok(logged) => {
            tracing::debug!(
                "User {} logged {} workout on {}",
                user_id,
                logged.workout_type.as_str(),
                date
            );
            HttpResponse::Created()
                .json(DataResponse::with_message("Workout logged successfully", logged))
        }
        Err(PostgresError::Duplicate(_)) => error_response(
            StatusCode::BAD_REQUEST,
            "duplicate_workout",
            "Workout already logged for this date",
        ),
        Err(e) => internal_error("Failed to log workout", e),
    }
}

/// PUT /api/workout-tracker?workoutId={id}
async fn update_workout(
    state: web::Data<AppState>,
    query: web::Query<WorkoutIdQuery>,
    req: web::Json<WorkoutLogUpdate>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Some(workout_id) = query.workout_id else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Workout ID is required",
        );
    };

    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    match state.db.update_workout_log(user_id, workout_id, &req).await {
        Ok(Some(updated)) => {
            HttpResponse::Ok()
                .json(DataResponse::with_message("Workout updated successfully", updated))
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "Workout not found"),
        Err(e) => internal_error("Failed to update workout", e),
    }
}

/// DELETE /api/workout-tracker?workoutId={id}
async fn delete_workout(
    state: web::Data<AppState>,
    query: web::Query<WorkoutIdQuery>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let Some(workout_id) = query.workout_id else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Workout ID is required",
        );
    };

    match state.db.delete_workout_log(user_id, workout_id).await {
        Ok(true) => HttpResponse::Ok().json(MessageResponse::new("Workout deleted successfully")),
        Ok(false) => error_response(StatusCode::NOT_FOUND, "not_found", "Workout not found"),
        Err(e) => internal_error("Failed to delete workout", e),
    }
}

/// GET /api/workout-tracker/recent
async fn recent_workouts(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let since = Utc::now().date_naive() - Duration::days(RECENT_DAYS);
    match state.db.workout_logs_since(user_id, since).await {
        Ok(logs) => HttpResponse::Ok().json(DataResponse::new(logs)),
        Err(e) => internal_error("Recent workout entries fetch failed", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let (start, end) = month_bounds(2023, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2023, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    }

    #[test]
    fn test_month_bounds_rejects_bad_month() {
        assert!(month_bounds(2024, 0).is_none());
        assert!(month_bounds(2024, 13).is_none());
    }
}
