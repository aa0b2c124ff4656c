use crate::models::{
    AuthCheckResponse, LoginRequest, MessageResponse, SignupRequest, UserEnvelope, UserResponse,
};
use crate::routes::{authenticate_with, error_response, internal_error, AppState};
use crate::services::{PostgresError, TOKEN_COOKIE};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use validator::Validate;

const MIN_PASSWORD_LEN: usize = 6;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/signup", web::post().to(signup))
        .route("/auth/login", web::post().to(login))
        .route("/auth/logout", web::post().to(logout))
        .route("/auth/me", web::get().to(me))
        .route("/auth/check", web::get().to(check));
}

/// Create an account and start a session
///
/// POST /api/auth/signup
async fn signup(state: web::Data<AppState>, req: web::Json<SignupRequest>) -> impl Responder {
    let req = req.into_inner();

    if req.has_missing_fields() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "All fields are required",
        );
    }
    if req.password != req.confirm_password {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Passwords do not match",
        );
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Password must be at least 6 characters long",
        );
    }

    let email = req.email.trim().to_lowercase();
    let name = req.name.trim().to_string();
    let normalized = SignupRequest { email: email.clone(), ..req };
    if normalized.validate().is_err() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Please enter a valid email",
        );
    }

    match state.db.find_user_by_email(&email).await {
        Ok(Some(_)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "duplicate_email",
                "User already exists with this email",
            );
        }
        Ok(None) => {}
        Err(e) => return internal_error("Signup lookup failed", e),
    }

    let auth = state.auth.clone();
    let password = normalized.password;
    let password_hash = match web::block(move || auth.hash_password(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => return internal_error("Password hashing failed", e),
        Err(e) => return internal_error("Password hashing task failed", e),
    };

    let user = match state.db.create_user(&name, &email, &password_hash).await {
        Ok(user) => user,
        Err(PostgresError::Duplicate(_)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "duplicate_email",
                "Email already exists",
            );
        }
        Err(e) => return internal_error("Failed to create user", e),
    };

    let token = match state.auth.issue_token(user.id) {
        Ok(token) => token,
        Err(e) => return internal_error("Failed to issue token", e),
    };

    tracing::info!("Created user {}", user.id);

    HttpResponse::Created()
        .cookie(state.auth.session_cookie(token))
        .json(UserEnvelope {
            message: Some("User created successfully".to_string()),
            user: UserResponse::from(user),
        })
}

/// POST /api/auth/login
async fn login(state: web::Data<AppState>, req: web::Json<LoginRequest>) -> impl Responder {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            "Email and password are required",
        );
    }

    let email = req.email.trim().to_lowercase();
    let user = match state.db.find_user_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            );
        }
        Err(e) => return internal_error("Login lookup failed", e),
    };

    let auth = state.auth.clone();
    let password = req.password.clone();
    let hash = user.password_hash.clone();
    match web::block(move || auth.verify_password(&password, &hash)).await {
        Ok(Ok(true)) => {}
        Ok(Ok(false)) => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "Invalid email or password",
            );
        }
        Ok(Err(e)) => return internal_error("Password verification failed", e),
        Err(e) => return internal_error("Password verification task failed", e),
    }

    let token = match state.auth.issue_token(user.id) {
        Ok(token) => token,
        Err(e) => return internal_error("Failed to issue token", e),
    };

    tracing::info!("User {} logged in", user.id);

    HttpResponse::Ok()
        .cookie(state.auth.session_cookie(token))
        .json(UserEnvelope {
            message: Some("Login successful".to_string()),
            user: UserResponse::from(user),
        })
}

/// POST /api/auth/logout
async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(state.auth.clear_cookie())
        .json(MessageResponse::new("Logged out successfully"))
}

/// GET /api/auth/me
async fn me(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let user_id = match authenticate_with(&state, &http_req, "No token provided") {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.db.find_user(user_id).await {
        Ok(Some(user)) => HttpResponse::Ok().json(UserEnvelope {
            message: None,
            user: UserResponse::from(user),
        }),
        Ok(None) => error_response(StatusCode::NOT_FOUND, "not_found", "User not found"),
        Err(e) => internal_error("Failed to load user", e),
    }
}

/// Report whether the session cookie holds a valid token
///
/// GET /api/auth/check
async fn check(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let Some(cookie) = http_req.cookie(TOKEN_COOKIE).filter(|c| !c.value().is_empty()) else {
        return HttpResponse::Unauthorized().json(AuthCheckResponse {
            authenticated: false,
            user_id: None,
            message: Some("No token provided".to_string()),
        });
    };

    match state.auth.validate_token(cookie.value()) {
        Ok(user_id) => HttpResponse::Ok().json(AuthCheckResponse {
            authenticated: true,
            user_id: Some(user_id),
            message: None,
        }),
        Err(_) => HttpResponse::Unauthorized().json(AuthCheckResponse {
            authenticated: false,
            user_id: None,
            message: Some("Invalid token".to_string()),
        }),
    }
}
