// SPDX-License-Identifier: MIT

//! Post model for storage and API.

use crate::time_utils::format_bson_rfc3339;
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Post document stored in the `posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Owning user
    pub user_id: ObjectId,
    /// Post text
    pub caption: String,
    /// Relative URL of the uploaded image, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: bson::DateTime,
}

/// Wire shape of a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetails {
    pub id: String,
    pub user_id: String,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<Post> for PostDetails {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_hex(),
            user_id: post.user_id.to_hex(),
            caption: post.caption,
            image_url: post.image_url,
            created_at: format_bson_rfc3339(post.created_at),
        }
    }
}
