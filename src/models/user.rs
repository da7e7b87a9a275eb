// SPDX-License-Identifier: MIT

//! User model for storage and API.

use crate::time_utils::format_bson_rfc3339;
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// User document stored in the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Display name
    pub name: String,
    /// Email address (unique)
    pub email: String,
    /// Bcrypt password hash; never leaves the repository layer
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Active session tokens, one per signed-in device
    #[serde(default)]
    pub login_tokens: Vec<String>,
    pub created_at: bson::DateTime,
}

/// Wire-safe projection of a user.
///
/// This is the only user shape handlers ever see; `password` and
/// `login_tokens` are stripped here, at the repository boundary, rather than
/// by query-level field exclusion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub created_at: String,
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_hex(),
            name: user.name,
            email: user.email,
            gender: user.gender,
            created_at: format_bson_rfc3339(user.created_at),
        }
    }
}
