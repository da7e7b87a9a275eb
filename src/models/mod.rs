// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod comment;
pub mod friendship;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentDetails};
pub use friendship::{Friendship, FriendshipStatus};
pub use post::{Post, PostDetails};
pub use user::{User, UserDetails};
