// SPDX-License-Identifier: MIT

//! Friendship relation model.
//!
//! A single document represents both a pending friend request and an
//! established friendship; `status` qualifies the relation. Exactly one
//! document exists per user pair, regardless of direction.

use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Relation state between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

/// Friendship document stored in the `friendships` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Friendship {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// User who sent the request
    pub requester_id: ObjectId,
    /// User who received it
    pub recipient_id: ObjectId,
    pub status: FriendshipStatus,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl Friendship {
    /// The other party of the relation, from `user_id`'s point of view.
    pub fn other_party(&self, user_id: &ObjectId) -> ObjectId {
        if &self.requester_id == user_id {
            self.recipient_id
        } else {
            self.requester_id
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_value(FriendshipStatus::Pending).unwrap();
        assert_eq!(json, "pending");
        let json = serde_json::to_value(FriendshipStatus::Accepted).unwrap();
        assert_eq!(json, "accepted");
    }

    #[test]
    fn test_other_party() {
        let a = ObjectId::new();
        let b = ObjectId::new();
        let friendship = Friendship {
            id: ObjectId::new(),
            requester_id: a,
            recipient_id: b,
            status: FriendshipStatus::Pending,
            created_at: bson::DateTime::now(),
            updated_at: bson::DateTime::now(),
        };

        assert_eq!(friendship.other_party(&a), b);
        assert_eq!(friendship.other_party(&b), a);
    }
}
