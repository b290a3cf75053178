//! Authentication middleware
//!
//! Identity is established upstream; requests arrive with a signed JWT
//! naming the user. This layer verifies the signature and expiry and
//! injects the authenticated user into request extensions. Role claims
//! are advisory: services re-check roles against the user directory
//! where the role gates behavior.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::CONFIG, error::AppError};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub name: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated user extracted from JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub name: String,
    pub role: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Verify a JWT and extract its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn user_from_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AppError> {
    let claims = verify_token(token, secret)?;

    let id: i64 = claims.sub.parse().map_err(|_| AppError::InvalidToken)?;
    if id <= 0 {
        return Err(AppError::InvalidToken);
    }

    Ok(AuthenticatedUser {
        id,
        name: claims.name,
        role: claims.role,
    })
}

fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Authentication middleware
pub async fn auth_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    let Some(token) = bearer_token(&request) else {
        debug!(path = %path, "Auth failed: missing or malformed Authorization header");
        return Err(AppError::Unauthorized);
    };

    let user = user_from_token(token, &CONFIG.jwt.secret).map_err(|e| {
        debug!(path = %path, error = ?e, "Auth failed: token rejected");
        e
    })?;

    debug!(path = %path, user_id = user.id, role = %user.role, "User authenticated");

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token_for(sub: &str, expires_in_hours: i64) -> String {
        let now = Utc::now();
        let claims = Claims {
            sub: sub.to_string(),
            name: "Ada".to_string(),
            role: "tutor".to_string(),
            exp: (now + Duration::hours(expires_in_hours)).timestamp(),
            iat: now.timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token_yields_user() {
        let user = user_from_token(&token_for("42", 1), SECRET).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, "tutor");
    }

    #[test]
    fn test_expired_token_rejected() {
        let err = user_from_token(&token_for("42", -1), SECRET).unwrap_err();
        assert!(matches!(err, AppError::TokenExpired));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let err = user_from_token(&token_for("42", 1), "other-secret").unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_non_numeric_subject_rejected() {
        let err = user_from_token(&token_for("not-a-number", 1), SECRET).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }

    #[test]
    fn test_non_positive_subject_rejected() {
        let err = user_from_token(&token_for("0", 1), SECRET).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}
