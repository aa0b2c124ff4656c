// Route exports
pub mod auth;
pub mod health;
pub mod plans;
pub mod profile;
pub mod tracking;

use crate::models::ErrorResponse;
use crate::services::{AuthError, AuthService, PlanCache, PlanService, PostgresClient, TOKEN_COOKIE};
use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse};
use std::sync::Arc;
use uuid::Uuid;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<PostgresClient>,
    pub cache: Option<Arc<PlanCache>>,
    pub auth: Arc<AuthService>,
    pub planner: Arc<PlanService>,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(health::configure)
            .configure(auth::configure)
            .configure(profile::configure)
            .configure(plans::configure)
            .configure(tracking::configure),
    );
}

/// Build the JSON error body used by every endpoint
pub(crate) fn error_response(
    status: StatusCode,
    error: &str,
    message: impl Into<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code: status.as_u16(),
    })
}

pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error")
}

/// Resolve the caller from the session cookie
///
/// `missing_message` differs between endpoints ("No token provided" vs
/// "Not authenticated").
pub(crate) fn authenticate_with(
    state: &AppState,
    req: &HttpRequest,
    missing_message: &str,
) -> Result<Uuid, HttpResponse> {
    let cookie = req
        .cookie(TOKEN_COOKIE)
        .filter(|cookie| !cookie.value().is_empty())
        .ok_or_else(|| error_response(StatusCode::UNAUTHORIZED, "unauthorized", missing_message))?;

    state.auth.validate_token(cookie.value()).map_err(|e| {
        tracing::debug!("Rejected session token on {}: {}", req.path(), e);
        let message = match e {
            AuthError::TokenExpired => "Token expired",
            _ => "Invalid token",
        };
        error_response(StatusCode::UNAUTHORIZED, "unauthorized", message)
    })
}

pub(crate) fn authenticate(state: &AppState, req: &HttpRequest) -> Result<Uuid, HttpResponse> {
    authenticate_with(state, req, "Not authenticated")
}

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}
