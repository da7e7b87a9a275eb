// SPDX-License-Identifier: MIT

//! Post repository.

use crate::db::MongoDb;
use crate::error::AppError;
use crate::models::{Post, PostDetails};
use crate::repository::{db_err, parse_object_id, OpFailure, OpOutcome};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};

#[derive(Clone)]
pub struct PostRepository {
    db: MongoDb,
}

impl PostRepository {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    /// Insert a post owned by `user_id`.
    pub async fn create(
        &self,
        user_id: &ObjectId,
        caption: String,
        image_url: Option<String>,
    ) -> Result<PostDetails, AppError> {
        let post = Post {
            id: ObjectId::new(),
            user_id: *user_id,
            caption,
            image_url,
            created_at: bson::DateTime::now(),
        };

        self.db.posts()?.insert_one(&post).await.map_err(db_err)?;
        tracing::info!(post_id = %post.id, user_id = %user_id, "Post created");

        Ok(PostDetails::from(post))
    }

    /// All posts, newest first.
    pub async fn get_all(&self) -> Result<Vec<PostDetails>, AppError> {
        let cursor = self
            .db
            .posts()?
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(db_err)?;
        let posts: Vec<Post> = cursor.try_collect().await.map_err(db_err)?;
        Ok(posts.into_iter().map(PostDetails::from).collect())
    }

    /// One user's posts, newest first.
    pub async fn for_user(&self, user_id: &ObjectId) -> Result<Vec<PostDetails>, AppError> {
        let cursor = self
            .db
            .posts()?
            .find(doc! { "user_id": *user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(db_err)?;
        let posts: Vec<Post> = cursor.try_collect().await.map_err(db_err)?;
        Ok(posts.into_iter().map(PostDetails::from).collect())
    }

    /// Fetch a single post.
    pub async fn get_one(&self, post_id: &str) -> OpOutcome<PostDetails> {
        let id = match parse_object_id(post_id, "post") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let post = self
            .db
            .posts()?
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;

        Ok(post
            .map(PostDetails::from)
            .ok_or_else(|| OpFailure::not_found("Post not found.")))
    }

    /// Owner-only caption/image update.
    pub async fn update(
        &self,
        caller: &ObjectId,
        post_id: &str,
        caption: Option<String>,
        image_url: Option<String>,
    ) -> OpOutcome<PostDetails> {
        let id = match parse_object_id(post_id, "post") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let Some(post) = self
            .db
            .posts()?
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)?
        else {
            return Ok(Err(OpFailure::not_found("Post not found.")));
        };

        if &post.user_id != caller {
            return Ok(Err(OpFailure::not_owner(
                "You can only update your own posts.",
            )));
        }

        let mut set = bson::Document::new();
        if let Some(caption) = caption {
            set.insert("caption", caption);
        }
        if let Some(image_url) = image_url {
            set.insert("image_url", image_url);
        }
        if set.is_empty() {
            return Ok(Ok(PostDetails::from(post)));
        }

        let updated = self
            .db
            .posts()?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(mongodb::options::ReturnDocument::After)
            .await
            .map_err(db_err)?;

        Ok(updated
            .map(PostDetails::from)
            .ok_or_else(|| OpFailure::not_found("Post not found.")))
    }

    /// Owner-only delete; the post's comments go with it.
    ///
    /// Two independent operations; a crash between them can orphan nothing
    /// worse than already-deleted-post comments, which the second delete
    /// would have removed.
    pub async fn delete(&self, caller: &ObjectId, post_id: &str) -> OpOutcome<()> {
        let id = match parse_object_id(post_id, "post") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let Some(post) = self
            .db
            .posts()?
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)?
        else {
            return Ok(Err(OpFailure::not_found("Post not found.")));
        };

        if &post.user_id != caller {
            return Ok(Err(OpFailure::not_owner(
                "You can only delete your own posts.",
            )));
        }

        self.db
            .posts()?
            .delete_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;

        let removed = self
            .db
            .comments()?
            .delete_many(doc! { "post_id": id })
            .await
            .map_err(db_err)?;

        tracing::info!(
            post_id = %id,
            comments_removed = removed.deleted_count,
            "Post deleted"
        );

        Ok(Ok(()))
    }
}
