use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Name of the session cookie carrying the token
pub const TOKEN_COOKIE: &str = "token";

/// Errors that can occur while issuing or checking credentials
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHashing(#[from] bcrypt::BcryptError),
}

/// Token claims, `sub` is the user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}

/// Password hashing, token signing and session cookies
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
    secure_cookies: bool,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl AuthService {
    pub fn new(secret: &str, token_ttl_days: i64, bcrypt_cost: u32, secure_cookies: bool) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::days(token_ttl_days),
            bcrypt_cost,
            secure_cookies,
        }
    }

    /// Hash a password with bcrypt
    ///
    /// This is CPU bound; handlers call it through `web::block`.
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.bcrypt_cost)?)
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Sign a token for a user
    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + self.token_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            exp: exp.timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::Jwt)
    }

    /// Validate a token and return the user id it was issued for
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?;

        Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)
    }

    /// Session cookie carrying a freshly issued token
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, token)
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::seconds(self.token_ttl.num_seconds()))
            .finish()
    }

    /// Expired cookie that makes the browser drop the session
    pub fn clear_cookie(&self) -> Cookie<'static> {
        Cookie::build(TOKEN_COOKIE, "")
            .path("/")
            .http_only(true)
            .secure(self.secure_cookies)
            .same_site(SameSite::Lax)
            .max_age(CookieDuration::ZERO)
            .finish()
    }
}
