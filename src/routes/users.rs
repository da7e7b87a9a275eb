// SPDX-License-Identifier: MIT

//! Account lifecycle and session routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::UserDetails;
use crate::repository::users::{NewUser, ProfileChanges};
use crate::response::Envelope;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/signup", post(sign_up))
        .route("/users/signin", post(sign_in))
        .route("/users/logout", get(logout))
        .route("/users/logout-all-devices", get(logout_all_devices))
        .route("/users/update/password", post(update_password))
        .route("/users/get-details/{user_id}", get(get_details))
        .route("/users/get-all-details", get(get_all_details))
        .route("/users/update-details/{user_id}", put(update_details))
}

// ─── Signup / Signin ─────────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct SignUpPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,
    #[serde(default)]
    pub gender: Option<String>,
}

async fn sign_up(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignUpPayload>,
) -> Result<Json<Envelope<UserDetails>>> {
    if let Err(errors) = payload.validate() {
        return Ok(Json(Envelope::failure(validation_msg(&errors))));
    }

    let outcome = state
        .users
        .sign_up(NewUser {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            gender: payload.gender,
        })
        .await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("Signed up successfully.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInPayload {
    #[validate(email(message = "Invalid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

/// Sign-in response; the only envelope that carries a top-level token.
#[derive(Serialize)]
pub struct SignInResponse {
    pub success: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<UserDetails>,
}

async fn sign_in(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SignInPayload>,
) -> Result<Json<SignInResponse>> {
    if let Err(errors) = payload.validate() {
        return Ok(Json(SignInResponse {
            success: false,
            msg: validation_msg(&errors),
            token: None,
            details: None,
        }));
    }

    let outcome = state
        .users
        .sign_in(
            &payload.email,
            &payload.password,
            &state.config.jwt_signing_key,
        )
        .await?;

    Ok(Json(match outcome {
        Ok(signed_in) => SignInResponse {
            success: true,
            msg: "Logged in successfully.".to_string(),
            token: Some(signed_in.token),
            details: Some(signed_in.details),
        },
        Err(failure) => SignInResponse {
            success: false,
            msg: failure.msg,
            token: None,
            details: None,
        },
    }))
}

// ─── Session termination ─────────────────────────────────────

async fn logout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Envelope>> {
    let outcome = state.users.logout(&user.user_id, &user.token).await?;

    Ok(Json(match outcome {
        Ok(()) => Envelope::success("Logged out."),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

async fn logout_all_devices(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Envelope>> {
    let outcome = state.users.logout_all_devices(&user.user_id).await?;

    Ok(Json(match outcome {
        Ok(()) => Envelope::success("Logged out from all devices."),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

// ─── Password & profile ──────────────────────────────────────

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePasswordPayload {
    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub new_password: String,
}

async fn update_password(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(payload): Json<UpdatePasswordPayload>,
) -> Result<Json<Envelope>> {
    if let Err(errors) = payload.validate() {
        return Ok(Json(Envelope::failure(validation_msg(&errors))));
    }

    let outcome = state
        .users
        .update_password(&user.user_id, &payload.new_password)
        .await?;

    Ok(Json(match outcome {
        Ok(()) => Envelope::success("Password updated."),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

async fn get_details(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(user_id): Path<String>,
) -> Result<Json<Envelope<UserDetails>>> {
    let outcome = state.users.get_details(&user_id).await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("User found.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

async fn get_all_details(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Envelope<Vec<UserDetails>>>> {
    let details = state.users.get_all_details().await?;
    Ok(Json(Envelope::ok("Users found.", details)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDetailsPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

async fn update_details(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateDetailsPayload>,
) -> Result<Json<Envelope<UserDetails>>> {
    let outcome = state
        .users
        .update_details(
            &user.user_id,
            &user_id,
            ProfileChanges {
                name: payload.name,
                gender: payload.gender,
            },
        )
        .await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("Updated successfully.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

/// Flatten validator errors into a single message; clients only ever see
/// one `msg` string.
fn validation_msg(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid input.".to_string())
}
