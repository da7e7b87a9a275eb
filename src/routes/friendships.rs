// SPDX-License-Identifier: MIT

//! Friendship routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::UserDetails;
use crate::repository::friendships::RequestAction;
use crate::response::Envelope;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/friendship/get-friends/{user_id}", get(get_friends))
        .route("/friendship/get-pending-requests", get(get_pending_requests))
        .route("/friendship/toggle-friendship/{friend_id}", get(toggle_friendship))
        .route("/friendship/response-to-request/{friend_id}", get(respond_to_request))
}

/// Public listing of a user's accepted friends.
async fn get_friends(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Envelope<Vec<UserDetails>>>> {
    let outcome = state.friendships.get_friends(&user_id).await?;

    Ok(Json(match outcome {
        Ok(friends) => Envelope::ok("Friends found.", friends),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

/// Pending requests addressed to the caller.
async fn get_pending_requests(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Envelope<Vec<UserDetails>>>> {
    let requests = state.friendships.pending_requests(&user.user_id).await?;
    Ok(Json(Envelope::ok("Pending requests found.", requests)))
}

/// Advance the relation with `friend_id` one step
/// (request / cancel / accept / unfriend).
async fn toggle_friendship(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(friend_id): Path<String>,
) -> Result<Json<Envelope>> {
    let outcome = state.friendships.toggle(&user.user_id, &friend_id).await?;

    Ok(Json(match outcome {
        Ok(toggled) => Envelope::success(toggled.msg()),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RespondQuery {
    pub action: RequestAction,
}

/// Accept or reject a pending request from `friend_id`.
async fn respond_to_request(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(friend_id): Path<String>,
    Query(query): Query<RespondQuery>,
) -> Result<Json<Envelope>> {
    let outcome = state
        .friendships
        .respond(&user.user_id, &friend_id, query.action)
        .await?;

    Ok(Json(match outcome {
        Ok(RequestAction::Accept) => Envelope::success("Friend request accepted."),
        Ok(RequestAction::Reject) => Envelope::success("Friend request rejected."),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}
