// SPDX-License-Identifier: MIT

//! MongoDB client wrapper with typed collection handles.
//!
//! The wrapper is the only place that knows collection names; repositories
//! obtain `Collection<T>` handles from it and never touch raw strings.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Comment, Friendship, Post, User};
use mongodb::{Client, Collection, Database};

/// MongoDB database client.
#[derive(Clone)]
pub struct MongoDb {
    db: Option<Database>,
}

impl MongoDb {
    /// Connect to MongoDB and select the application database.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, AppError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        tracing::info!(database = db_name, "Connected to MongoDB");

        Ok(Self {
            db: Some(client.database(db_name)),
        })
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { db: None }
    }

    /// Helper to get the database or return an error if offline.
    fn database(&self) -> Result<&Database, AppError> {
        self.db
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    pub fn users(&self) -> Result<Collection<User>, AppError> {
        Ok(self.database()?.collection(collections::USERS))
    }

    pub fn posts(&self) -> Result<Collection<Post>, AppError> {
        Ok(self.database()?.collection(collections::POSTS))
    }

    pub fn comments(&self) -> Result<Collection<Comment>, AppError> {
        Ok(self.database()?.collection(collections::COMMENTS))
    }

    pub fn friendships(&self) -> Result<Collection<Friendship>, AppError> {
        Ok(self.database()?.collection(collections::FRIENDSHIPS))
    }
}
