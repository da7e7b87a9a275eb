// SPDX-License-Identifier: MIT

//! Postboard: a small social-networking REST backend.
//!
//! Users, posts, comments, and friendships over MongoDB, with JWT sessions
//! and multipart image upload. Every route is handler -> repository ->
//! document store -> JSON envelope.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod time_utils;

use config::Config;
use db::MongoDb;
use repository::{CommentRepository, FriendshipRepository, PostRepository, UserRepository};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub users: UserRepository,
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub friendships: FriendshipRepository,
}

impl AppState {
    /// Wire the repositories to one database handle.
    pub fn new(config: Config, db: MongoDb) -> Self {
        Self {
            config,
            users: UserRepository::new(db.clone()),
            posts: PostRepository::new(db.clone()),
            comments: CommentRepository::new(db.clone()),
            friendships: FriendshipRepository::new(db),
        }
    }
}
