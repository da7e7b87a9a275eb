// SPDX-License-Identifier: MIT

//! Comment repository.
//!
//! Ownership is a precondition for every mutation: update and delete first
//! fetch the comment and compare the stored owner against the caller.

use crate::db::MongoDb;
use crate::models::{Comment, CommentDetails};
use crate::repository::{db_err, parse_object_id, OpFailure, OpOutcome};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};

#[derive(Clone)]
pub struct CommentRepository {
    db: MongoDb,
}

impl CommentRepository {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    /// Insert a comment linked to an existing post.
    pub async fn add(
        &self,
        user_id: &ObjectId,
        post_id: &str,
        body: String,
    ) -> OpOutcome<CommentDetails> {
        let post_id = match parse_object_id(post_id, "post") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let post = self
            .db
            .posts()?
            .find_one(doc! { "_id": post_id })
            .await
            .map_err(db_err)?;
        if post.is_none() {
            return Ok(Err(OpFailure::not_found("Post not found.")));
        }

        let comment = Comment {
            id: ObjectId::new(),
            post_id,
            user_id: *user_id,
            body,
            created_at: bson::DateTime::now(),
        };

        self.db
            .comments()?
            .insert_one(&comment)
            .await
            .map_err(db_err)?;

        tracing::debug!(comment_id = %comment.id, post_id = %post_id, "Comment added");

        Ok(Ok(CommentDetails::from(comment)))
    }

    /// Replace the body of a comment the caller owns.
    pub async fn update(
        &self,
        caller: &ObjectId,
        comment_id: &str,
        body: String,
    ) -> OpOutcome<CommentDetails> {
        let id = match parse_object_id(comment_id, "comment") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let Some(comment) = self
            .db
            .comments()?
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)?
        else {
            return Ok(Err(OpFailure::not_found("Comment not found.")));
        };

        if &comment.user_id != caller {
            return Ok(Err(OpFailure::not_owner(
                "You can only edit your own comments.",
            )));
        }

        let updated = self
            .db
            .comments()?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": { "body": body } })
            .return_document(mongodb::options::ReturnDocument::After)
            .await
            .map_err(db_err)?;

        Ok(updated
            .map(CommentDetails::from)
            .ok_or_else(|| OpFailure::not_found("Comment not found.")))
    }

    /// Delete a comment the caller owns. A non-owner attempt is a no-op
    /// failure; the comment stays in place.
    pub async fn delete(&self, caller: &ObjectId, comment_id: &str) -> OpOutcome<()> {
        let id = match parse_object_id(comment_id, "comment") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let Some(comment) = self
            .db
            .comments()?
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)?
        else {
            return Ok(Err(OpFailure::not_found("Comment not found.")));
        };

        if &comment.user_id != caller {
            return Ok(Err(OpFailure::not_owner(
                "You can only delete your own comments.",
            )));
        }

        self.db
            .comments()?
            .delete_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;

        tracing::debug!(comment_id = %id, "Comment deleted");
        Ok(Ok(()))
    }

    /// All comments for a post, oldest first.
    pub async fn get_all(&self, post_id: &str) -> OpOutcome<Vec<CommentDetails>> {
        let post_id = match parse_object_id(post_id, "post") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let cursor = self
            .db
            .comments()?
            .find(doc! { "post_id": post_id })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(db_err)?;
        let comments: Vec<Comment> = cursor.try_collect().await.map_err(db_err)?;

        Ok(Ok(comments.into_iter().map(CommentDetails::from).collect()))
    }
}
