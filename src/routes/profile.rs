use crate::models::{FitnessProfile, UserEnvelope, UserResponse};
use crate::routes::{authenticate, error_response, internal_error, AppState};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/user/fitness-profile", web::post().to(update_fitness_profile));
}

/// Store the caller's fitness profile and mark it complete
///
/// POST /api/user/fitness-profile
async fn update_fitness_profile(
    state: web::Data<AppState>,
    req: web::Json<FitnessProfile>,
    http_req: HttpRequest,
) -> impl Responder {
    let user_id = match authenticate(&state, &http_req) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let mut profile = req.into_inner();
    profile.allergies.retain(|allergy| !allergy.trim().is_empty());

    if let Err(e) = profile.ensure_valid() {
        tracing::info!("Rejected fitness profile for {}: {}", user_id, e);
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", e.to_string());
    }

    match state.db.update_fitness_profile(user_id, &profile).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserEnvelope {
            message: Some("Fitness profile updated successfully".to_string()),
            user: UserResponse::from(user),
        }),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
        Err(e) => internal_error("Fitness profile update failed", e),
    }
}
