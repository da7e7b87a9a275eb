// SPDX-License-Identifier: MIT

//! Comment routes.
//!
//! `POST`/`GET` interpret the path id as a post id; `PUT`/`DELETE` as a
//! comment id, matching the original route shape.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::CommentDetails;
use crate::response::Envelope;
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/comments/{id}",
        post(add_comment)
            .get(get_all_comments)
            .put(update_comment)
            .delete(delete_comment),
    )
}

#[derive(Debug, Deserialize)]
pub struct CommentPayload {
    pub body: String,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<Envelope<CommentDetails>>> {
    if payload.body.trim().is_empty() {
        return Ok(Json(Envelope::failure("Comment body is required.")));
    }

    let outcome = state
        .comments
        .add(&user.user_id, &post_id, payload.body)
        .await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("Comment added.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

async fn update_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(comment_id): Path<String>,
    Json(payload): Json<CommentPayload>,
) -> Result<Json<Envelope<CommentDetails>>> {
    if payload.body.trim().is_empty() {
        return Ok(Json(Envelope::failure("Comment body is required.")));
    }

    let outcome = state
        .comments
        .update(&user.user_id, &comment_id, payload.body)
        .await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("Comment updated.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(comment_id): Path<String>,
) -> Result<Json<Envelope>> {
    let outcome = state.comments.delete(&user.user_id, &comment_id).await?;

    Ok(Json(match outcome {
        Ok(()) => Envelope::success("Comment deleted."),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

/// Public comment listing for a post.
async fn get_all_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Envelope<Vec<CommentDetails>>>> {
    let outcome = state.comments.get_all(&post_id).await?;

    Ok(Json(match outcome {
        Ok(comments) => Envelope::ok("Comments found.", comments),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}
