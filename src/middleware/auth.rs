// SPDX-License-Identifier: MIT

//! JWT authentication.
//!
//! Tokens are accepted from the `session_token` cookie first, then the
//! `Authorization: Bearer` header. Expiry lives entirely in the token's `exp`
//! claim; the server keeps no independent expiry state. The user's
//! `login_tokens` list only backs the logout operations.

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "session_token";

/// Session lifetime baked into the token (1 hour).
pub const TOKEN_TTL_SECS: usize = 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user document id, hex)
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Unique token id; two sign-ins in the same second must still yield
    /// distinct tokens for the login-token list
    pub jti: String,
}

/// Authenticated user extracted from a JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ObjectId,
    pub email: String,
    /// The raw token presented, needed for single-device logout
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Try cookie first, then header
        let jar = CookieJar::from_headers(&parts.headers);
        let token = if let Some(cookie) = jar.get(SESSION_COOKIE) {
            cookie.value().to_string()
        } else {
            let auth_header = parts
                .headers
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok());

            match auth_header {
                Some(h) if h.starts_with("Bearer ") => h[7..].to_string(),
                _ => return Err(AppError::Unauthorized),
            }
        };

        let key = DecodingKey::from_secret(&state.config.jwt_signing_key);
        let validation = Validation::new(Algorithm::HS256);

        let token_data =
            decode::<Claims>(&token, &key, &validation).map_err(|_| AppError::InvalidToken)?;

        let user_id = ObjectId::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::InvalidToken)?;

        Ok(AuthUser {
            user_id,
            email: token_data.claims.email,
            token,
        })
    }
}

/// Create a JWT for a user session.
pub fn create_jwt(user_id: &ObjectId, email: &str, signing_key: &[u8]) -> anyhow::Result<String> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: user_id.to_hex(),
        email: email.to_string(),
        iat: now,
        exp: now + TOKEN_TTL_SECS,
        jti: uuid::Uuid::new_v4().to_string(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}
