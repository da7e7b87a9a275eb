// SPDX-License-Identifier: MIT

//! Comment model for storage and API.

use crate::time_utils::format_bson_rfc3339;
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Comment document stored in the `comments` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Post this comment is attached to
    pub post_id: ObjectId,
    /// Owning user
    pub user_id: ObjectId,
    /// Comment text
    pub body: String,
    pub created_at: bson::DateTime,
}

/// Wire shape of a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDetails {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub body: String,
    pub created_at: String,
}

impl From<Comment> for CommentDetails {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.to_hex(),
            post_id: comment.post_id.to_hex(),
            user_id: comment.user_id.to_hex(),
            body: comment.body,
            created_at: format_bson_rfc3339(comment.created_at),
        }
    }
}
