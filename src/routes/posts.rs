// SPDX-License-Identifier: MIT

//! Post routes, including multipart image upload.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::PostDetails;
use crate::response::Envelope;
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::get,
    Json, Router,
};
use std::path::Path as FsPath;
use std::sync::Arc;

/// Upload guardrail; multipart fields beyond this are rejected.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Request body limit for these routes. Axum's default 2MB cap would reject
/// large uploads before the image-size check ever ran; headroom above
/// [`MAX_UPLOAD_BYTES`] covers the multipart framing.
const BODY_LIMIT_BYTES: usize = MAX_UPLOAD_BYTES + 2 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", get(users_posts).post(new_post))
        .route("/posts/all", get(get_all_posts))
        .route(
            "/posts/{post_id}",
            get(get_one_post).put(update_post).delete(delete_post),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

/// Fields parsed out of a post's multipart body.
#[derive(Debug, Default)]
struct PostForm {
    caption: Option<String>,
    image_url: Option<String>,
}

/// Walk the multipart body: `caption` is a text part, `imageUrl` a file part
/// stored under the upload dir with a random filename.
async fn parse_post_form(state: &AppState, mut multipart: Multipart) -> Result<PostForm> {
    let mut form = PostForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        match field.name() {
            Some("caption") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid caption field: {}", e)))?;
                form.caption = Some(text);
            }
            Some("imageUrl") => {
                let extension = field
                    .file_name()
                    .and_then(|name| FsPath::new(name).extension())
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_ascii_lowercase());

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid image field: {}", e)))?;
                if bytes.is_empty() {
                    continue;
                }
                if bytes.len() > MAX_UPLOAD_BYTES {
                    return Err(AppError::BadRequest("Image exceeds 10MB limit.".to_string()));
                }

                let filename = match extension {
                    Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
                    None => uuid::Uuid::new_v4().to_string(),
                };

                let dest = state.config.upload_dir.join(&filename);
                tokio::fs::write(&dest, &bytes)
                    .await
                    .map_err(|e| AppError::Internal(anyhow::anyhow!("Image write failed: {}", e)))?;

                tracing::debug!(file = %filename, size = bytes.len(), "Image stored");
                form.image_url = Some(format!("/uploads/{}", filename));
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Create a post from a multipart form.
async fn new_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<Json<Envelope<PostDetails>>> {
    let form = parse_post_form(&state, multipart).await?;

    let Some(caption) = form.caption.filter(|c| !c.trim().is_empty()) else {
        return Ok(Json(Envelope::failure("Caption is required.")));
    };

    let details = state
        .posts
        .create(&user.user_id, caption, form.image_url)
        .await?;

    Ok(Json(Envelope::ok("Post created.", details)))
}

/// All posts, newest first.
async fn get_all_posts(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<Json<Envelope<Vec<PostDetails>>>> {
    let posts = state.posts.get_all().await?;
    Ok(Json(Envelope::ok("Posts found.", posts)))
}

/// The caller's own posts.
async fn users_posts(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Envelope<Vec<PostDetails>>>> {
    let posts = state.posts.for_user(&user.user_id).await?;
    Ok(Json(Envelope::ok("Posts found.", posts)))
}

/// Single post; the one public post route.
async fn get_one_post(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Envelope<PostDetails>>> {
    let outcome = state.posts.get_one(&post_id).await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("Post found.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

/// Owner-only update via multipart (caption and/or replacement image).
async fn update_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Envelope<PostDetails>>> {
    let form = parse_post_form(&state, multipart).await?;

    let outcome = state
        .posts
        .update(&user.user_id, &post_id, form.caption, form.image_url)
        .await?;

    Ok(Json(match outcome {
        Ok(details) => Envelope::ok("Post updated.", details),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}

/// Owner-only delete; cascades to the post's comments.
async fn delete_post(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(post_id): Path<String>,
) -> Result<Json<Envelope>> {
    let outcome = state.posts.delete(&user.user_id, &post_id).await?;

    Ok(Json(match outcome {
        Ok(()) => Envelope::success("Post deleted."),
        Err(failure) => Envelope::failure(failure.msg),
    }))
}
