use crate::models::{DataResponse, FitnessProfile};
use crate::routes::{authenticate, authenticate_with, error_response, internal_error, AppState};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/workout-plan/generate", web::post().to(generate_workout_plan))
        .route("/workout-plan/current", web::get().to(current_workout_plan))
        .route("/meal-plan/generate", web::post().to(generate_meal_plan))
        .route("/meal-plan/current", web::get().to(current_meal_plan));
}

/// Load the caller's profile, insisting it has been completed
async fn completed_profile(
    state: &AppState,
    user_id: Uuid,
) -> Result<FitnessProfile, HttpResponse> {
    let user = state
        .db
        .find_user(user_id)
        .await
        .map_err(|e| internal_error("Failed to load user", e))?;

    match user {
        Some(user) if user.completed_profile => user.fitness_profile.ok_or_else(|| {
            error_response(
                StatusCode::BAD_REQUEST,
                "profile_incomplete",
                "Complete fitness profile first",
            )
        }),
        _ => {
            tracing::info!("User {} not found or profile incomplete", user_id);
            Err(error_response(
                StatusCode::BAD_REQUEST,
                "profile_incomplete",
                "Complete fitness profile first",
            ))
        }
    }
}

/// Generate, store and return a new workout plan
///
/// POST /api/workout-plan/generate
async fn generate_workout_plan(
    state: web::Data<AppState>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate_with(&state, &http_req, "No token provided") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let profile = match completed_profile(&state, user_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let generated = match state.planner.workout_plan(&profile).await {
        Ok(generated) => generated,
        Err(e) => return internal_error("Workout plan generation failed", e),
    };

    let stored = match state
        .db
        .insert_workout_plan(user_id, &generated, profile.fitness_goal)
        .await
    {
        Ok(stored) => stored,
        Err(e) => return internal_error("Failed to store workout plan", e),
    };

    tracing::info!(
        "Generated workout plan {} for user {} (source: {:?})",
        stored.id,
        user_id,
        stored.source
    );

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.store_workout_plan(&stored).await {
            tracing::warn!("Failed to cache workout plan: {}", e);
        }
    }

    HttpResponse::Created().json(DataResponse::with_message(
        "Workout plan generated successfully",
        stored,
    ))
}

/// GET /api/workout-plan/current
async fn current_workout_plan(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Some(cache) = &state.cache {
        match cache.workout_plan(&user_id).await {
            Ok(Some(plan)) => return HttpResponse::Ok().json(DataResponse::new(plan)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Workout plan cache lookup failed: {}", e),
        }
    }

    match state.db.latest_workout_plan(user_id).await {
        Ok(Some(plan)) => {
            if let Some(cache) = &state.cache {
                if let Err(e) = cache.store_workout_plan(&plan).await {
                    tracing::warn!("Failed to cache workout plan: {}", e);
                }
            }
            HttpResponse::Ok().json(DataResponse::new(plan))
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "No workout plan found"),
        Err(e) => internal_error("Current workout plan fetch failed", e),
    }
}

/// Generate, store and return a new meal plan
///
/// POST /api/meal-plan/generate
async fn generate_meal_plan(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match authenticate_with(&state, &http_req, "No token provided") {
        Ok(id) => id,
        Err(response) => return response,
    };

    let profile = match completed_profile(&state, user_id).await {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let generated = match state.planner.meal_plan(&profile).await {
        Ok(generated) => generated,
        Err(e) => return internal_error("Meal plan generation failed", e),
    };

    let stored = match state
        .db
        .insert_meal_plan(user_id, &generated, &profile.dietary_preferences)
        .await
    {
        Ok(stored) => stored,
        Err(e) => return internal_error("Failed to store meal plan", e),
    };

    tracing::info!(
        "Generated meal plan {} for user {} (source: {:?}, {} kcal)",
        stored.id,
        user_id,
        stored.source,
        stored.plan.total_calories
    );

    if let Some(cache) = &state.cache {
        if let Err(e) = cache.store_meal_plan(&stored).await {
            tracing::warn!("Failed to cache meal plan: {}", e);
        }
    }

    HttpResponse::Created().json(DataResponse::with_message(
        "Meal plan generated successfully",
        stored,
    ))
}

/// GET /api/meal-plan/current
async fn current_meal_plan(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    if let Some(cache) = &state.cache {
        match cache.meal_plan(&user_id).await {
            Ok(Some(plan)) => return HttpResponse::Ok().json(DataResponse::new(plan)),
            Ok(None) => {}
            Err(e) => tracing::warn!("Meal plan cache lookup failed: {}", e),
        }
    }

    match state.db.latest_meal_plan(user_id).await {
        Ok(Some(plan)) => {
            if let Some(cache) = &state.cache {
                if let Err(e) = cache.store_meal_plan(&plan).await {
                    tracing::warn!("Failed to cache meal plan: {}", e);
                }
            }
            HttpResponse::Ok().json(DataResponse::new(plan))
        }
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "No meal plan found"),
        Err(e) => internal_error("Current meal plan fetch failed", e),
    }
}
