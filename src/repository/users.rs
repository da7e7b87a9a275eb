// SPDX-License-Identifier: MIT

//! User repository: account lifecycle and session-token bookkeeping.

use crate::db::MongoDb;
use crate::error::AppError;
use crate::middleware::auth::create_jwt;
use crate::models::{User, UserDetails};
use crate::repository::{db_err, parse_object_id, FailureKind, OpFailure, OpOutcome};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};

/// A freshly validated signup request.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    /// Plaintext; hashed before it ever reaches a document
    pub password: String,
    pub gender: Option<String>,
}

/// Successful sign-in: the issued token plus the signed-in user.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub token: String,
    pub details: UserDetails,
}

/// Profile fields that `update-details` may merge.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub gender: Option<String>,
}

#[derive(Clone)]
pub struct UserRepository {
    db: MongoDb,
}

impl UserRepository {
    pub fn new(db: MongoDb) -> Self {
        Self { db }
    }

    /// Create an account. A duplicate email fails and inserts nothing.
    pub async fn sign_up(&self, new_user: NewUser) -> OpOutcome<UserDetails> {
        let users = self.db.users()?;

        let existing = users
            .find_one(doc! { "email": new_user.email.as_str() })
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Ok(Err(OpFailure::new(
                FailureKind::Duplicate,
                "User already exists.",
            )));
        }

        let hashed = bcrypt::hash(&new_user.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        let user = User {
            id: ObjectId::new(),
            name: new_user.name,
            email: new_user.email,
            password: hashed,
            gender: new_user.gender,
            login_tokens: Vec::new(),
            created_at: bson::DateTime::now(),
        };

        users.insert_one(&user).await.map_err(db_err)?;
        tracing::info!(user_id = %user.id, "User signed up");

        Ok(Ok(UserDetails::from(user)))
    }

    /// Verify credentials, issue a session token, and record it on the user.
    ///
    /// Concurrent sign-ins race only inside MongoDB's atomic `$push`.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        signing_key: &[u8],
    ) -> OpOutcome<SignedIn> {
        let users = self.db.users()?;

        let Some(user) = users
            .find_one(doc! { "email": email })
            .await
            .map_err(db_err)?
        else {
            return Ok(Err(OpFailure::not_found("User not found.")));
        };

        if !bcrypt::verify(password, &user.password).unwrap_or(false) {
            return Ok(Err(OpFailure::new(
                FailureKind::BadCredentials,
                "Incorrect password.",
            )));
        }

        let token = create_jwt(&user.id, &user.email, signing_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

        users
            .update_one(
                doc! { "_id": user.id },
                doc! { "$push": { "login_tokens": token.as_str() } },
            )
            .await
            .map_err(db_err)?;

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(Ok(SignedIn {
            token,
            details: UserDetails::from(user),
        }))
    }

    /// Replace the password hash on the caller's own document.
    pub async fn update_password(
        &self,
        user_id: &ObjectId,
        new_password: &str,
    ) -> OpOutcome<()> {
        let hashed = bcrypt::hash(new_password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        let result = self
            .db
            .users()?
            .update_one(
                doc! { "_id": *user_id },
                doc! { "$set": { "password": hashed } },
            )
            .await
            .map_err(db_err)?;

        if result.matched_count == 0 {
            return Ok(Err(OpFailure::not_found("User not found.")));
        }

        Ok(Ok(()))
    }

    /// Fetch one user as the wire-safe projection.
    pub async fn get_details(&self, user_id: &str) -> OpOutcome<UserDetails> {
        let id = match parse_object_id(user_id, "user") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        let user = self
            .db
            .users()?
            .find_one(doc! { "_id": id })
            .await
            .map_err(db_err)?;

        Ok(user
            .map(UserDetails::from)
            .ok_or_else(|| OpFailure::not_found("User not found.")))
    }

    /// Fetch all users as wire-safe projections.
    pub async fn get_all_details(&self) -> Result<Vec<UserDetails>, AppError> {
        let cursor = self.db.users()?.find(doc! {}).await.map_err(db_err)?;
        let users: Vec<User> = cursor.try_collect().await.map_err(db_err)?;
        Ok(users.into_iter().map(UserDetails::from).collect())
    }

    /// Merge the provided profile fields into the caller's own document.
    ///
    /// Field-wise `$set`, never a whole-document replace.
    pub async fn update_details(
        &self,
        caller: &ObjectId,
        user_id: &str,
        changes: ProfileChanges,
    ) -> OpOutcome<UserDetails> {
        let id = match parse_object_id(user_id, "user") {
            Ok(id) => id,
            Err(f) => return Ok(Err(f)),
        };

        if &id != caller {
            return Ok(Err(OpFailure::not_owner(
                "You can only update your own details.",
            )));
        }

        let mut set = bson::Document::new();
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(gender) = changes.gender {
            set.insert("gender", gender);
        }
        if set.is_empty() {
            return Ok(Err(OpFailure::new(
                FailureKind::Invalid,
                "Nothing to update.",
            )));
        }

        let updated = self
            .db
            .users()?
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(mongodb::options::ReturnDocument::After)
            .await
            .map_err(db_err)?;

        Ok(updated
            .map(UserDetails::from)
            .ok_or_else(|| OpFailure::not_found("User not found.")))
    }

    /// Remove exactly the presented token from the user's session list.
    pub async fn logout(&self, user_id: &ObjectId, token: &str) -> OpOutcome<()> {
        let result = self
            .db
            .users()?
            .update_one(
                doc! { "_id": *user_id },
                doc! { "$pull": { "login_tokens": token } },
            )
            .await
            .map_err(db_err)?;

        if result.modified_count == 0 {
            return Ok(Err(OpFailure::not_found("Token removal failed.")));
        }

        tracing::debug!(user_id = %user_id, "Session token removed");
        Ok(Ok(()))
    }

    /// Clear the session list, signing the user out everywhere.
    pub async fn logout_all_devices(&self, user_id: &ObjectId) -> OpOutcome<()> {
        let result = self
            .db
            .users()?
            .update_one(
                doc! { "_id": *user_id },
                doc! { "$set": { "login_tokens": [] } },
            )
            .await
            .map_err(db_err)?;

        if result.matched_count == 0 {
            return Ok(Err(OpFailure::not_found("User not found.")));
        }

        tracing::debug!(user_id = %user_id, "All session tokens cleared");
        Ok(Ok(()))
    }
}
