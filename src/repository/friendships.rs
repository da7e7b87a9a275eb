// SPDX-License-Identifier: MIT

//! Friendship repository.
//!
//! One document per user pair. Toggle walks the relation through its states:
//! none -> pending (request sent), pending-by-caller -> none (cancelled),
//! pending-to-caller -> accepted, accepted -> none (unfriended).

use crate::db::MongoDb;
use crate::error::AppError;
use crate::models::{Friendship, FriendshipStatus, User, UserDetails};
use crate::repository::{db_err, parse_object_id, FailureKind, OpFailure, OpOutcome};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};

/// What a toggle call did to the relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    RequestSent,
    RequestCancelled,
    RequestAccepted,
    Unfriended,
}

impl ToggleOutcome {
    pub fn msg(&self) -> &'static str {
        match self {
            ToggleOutcome::RequestSent => "Friend request sent.",
            ToggleOutcome::RequestCancelled => "Friend request cancelled.",
            ToggleOutcome::RequestAccepted => "Friend request accepted.",
            ToggleOutcome::Unfriended => "Friend removed.",
        }
    }
}

/// Accept or reject a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Accept,
    Reject,
}

#[derive(Clone)]
pub struct FriendshipRepository {
    db: MongoDb,
}

impl FriendshipRepository {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    /// The relation document between two users, in either direction.
    async fn relation(
        &self,
        a: &ObjectId,
        b: &ObjectId,
    ) -> Result<Option<Friendship>, AppError> {
        self.db
            .friendships()?
            .find_one(doc! {
                "$or": [
                    { "requester_id": *a, "recipient_id": *b },
                    { "requester_id": *b, "recipient_id": *a },
                ]
            })
            .await
            .map_err(db_err)
    }

    /// Accepted friends of a user, as wire-safe user projections.
    pub async fn get_friends(&self, user_id: &str) -> OpOutcome<Vec<UserDetails>> {
        let id = match parse_object_id(user_id, "user") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let cursor = self
            .db
            .friendships()?
            .find(doc! {
                "status": "accepted",
                "$or": [ { "requester_id": id }, { "recipient_id": id } ],
            })
            .await
            .map_err(db_err)?;
        let relations: Vec<Friendship> = cursor.try_collect().await.map_err(db_err)?;

        let friend_ids: Vec<ObjectId> = relations.iter().map(|f| f.other_party(&id)).collect();
        if friend_ids.is_empty() {
            return Ok(Ok(Vec::new()));
        }

        let cursor = self
            .db
            .users()?
            .find(doc! { "_id": { "$in": friend_ids } })
            .await
            .map_err(db_err)?;
        let users: Vec<User> = cursor.try_collect().await.map_err(db_err)?;

        Ok(Ok(users.into_iter().map(UserDetails::from).collect()))
    }

    /// Users with a pending request addressed to the caller.
    pub async fn pending_requests(
        &self,
        user_id: &ObjectId,
    ) -> Result<Vec<UserDetails>, AppError> {
        let cursor = self
            .db
            .friendships()?
            .find(doc! { "recipient_id": *user_id, "status": "pending" })
            .await
            .map_err(db_err)?;
        let relations: Vec<Friendship> = cursor.try_collect().await.map_err(db_err)?;

        let requester_ids: Vec<ObjectId> =
            relations.iter().map(|f| f.requester_id).collect();
        if requester_ids.is_empty() {
            return Ok(Vec::new());
        }

        let cursor = self
            .db
            .users()?
            .find(doc! { "_id": { "$in": requester_ids } })
            .await
            .map_err(db_err)?;
        let users: Vec<User> = cursor.try_collect().await.map_err(db_err)?;

        Ok(users.into_iter().map(UserDetails::from).collect())
    }

    /// Advance the relation with `friend_id` one step.
    pub async fn toggle(&self, caller: &ObjectId, friend_id: &str) -> OpOutcome<ToggleOutcome> {
        let friend = match parse_object_id(friend_id, "user") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        if &friend == caller {
            return Ok(Err(OpFailure::new(
                FailureKind::Invalid,
                "You cannot friend yourself.",
            )));
        }

        let exists = self
            .db
            .users()?
            .find_one(doc! { "_id": friend })
            .await
            .map_err(db_err)?;
        if exists.is_none() {
            return Ok(Err(OpFailure::not_found("User not found.")));
        }

        let friendships = self.db.friendships()?;

        let outcome = match self.relation(caller, &friend).await? {
            None => {
                let relation = Friendship {
                    id: ObjectId::new(),
                    requester_id: *caller,
                    recipient_id: friend,
                    status: FriendshipStatus::Pending,
                    created_at: bson::DateTime::now(),
                    updated_at: bson::DateTime::now(),
                };
                friendships.insert_one(&relation).await.map_err(db_err)?;
                ToggleOutcome::RequestSent
            }
            Some(relation) if relation.status == FriendshipStatus::Accepted => {
                friendships
                    .delete_one(doc! { "_id": relation.id })
                    .await
                    .map_err(db_err)?;
                ToggleOutcome::Unfriended
            }
            Some(relation) if relation.requester_id == *caller => {
                friendships
                    .delete_one(doc! { "_id": relation.id })
                    .await
                    .map_err(db_err)?;
                ToggleOutcome::RequestCancelled
            }
            Some(relation) => {
                friendships
                    .update_one(
                        doc! { "_id": relation.id },
                        doc! { "$set": {
                            "status": "accepted",
                            "updated_at": bson::DateTime::now(),
                        } },
                    )
                    .await
                    .map_err(db_err)?;
                ToggleOutcome::RequestAccepted
            }
        };

        tracing::debug!(caller = %caller, friend = %friend, outcome = ?outcome, "Friendship toggled");
        Ok(Ok(outcome))
    }

    /// Respond to a pending request sent by `friend_id` to the caller.
    pub async fn respond(
        &self,
        caller: &ObjectId,
        friend_id: &str,
        action: RequestAction,
    ) -> OpOutcome<RequestAction> {
        let friend = match parse_object_id(friend_id, "user") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let friendships = self.db.friendships()?;

        let Some(request) = friendships
            .find_one(doc! {
                "requester_id": friend,
                "recipient_id": *caller,
                "status": "pending",
            })
            .await
            .map_err(db_err)?
        else {
            return Ok(Err(OpFailure::not_found("No pending request from this user.")));
        };

        match action {
            RequestAction::Accept => {
                friendships
                    .update_one(
                        doc! { "_id": request.id },
                        doc! { "$set": {
                            "status": "accepted",
                            "updated_at": bson::DateTime::now(),
                        } },
                    )
                    .await
                    .map_err(db_err)?;
            }
            RequestAction::Reject => {
                friendships
                    .delete_one(doc! { "_id": request.id })
                    .await
                    .map_err(db_err)?;
            }
        }

        Ok(Ok(action))
    }
}
