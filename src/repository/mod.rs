// SPDX-License-Identifier: MIT

//! Persistence-access layer.
//!
//! Each repository method performs one or more sequential MongoDB operations
//! against a single collection and returns an [`OpOutcome`]: infrastructure
//! errors are the outer `Err`, expected domain failures the inner one. The
//! wire envelope flattens both inner variants into `{success, msg}`, so
//! clients cannot distinguish failure kinds; handlers and tests can.

pub mod comments;
pub mod friendships;
pub mod posts;
pub mod users;

pub use comments::CommentRepository;
pub use friendships::FriendshipRepository;
pub use posts::PostRepository;
pub use users::UserRepository;

use crate::error::AppError;
use mongodb::bson::oid::ObjectId;

/// Kind of an expected domain failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    NotOwner,
    Duplicate,
    BadCredentials,
    InvalidId,
    Invalid,
}

/// Expected domain failure, returned as an ordinary `{success: false}` body.
#[derive(Debug, Clone)]
pub struct OpFailure {
    pub kind: FailureKind,
    pub msg: String,
}

impl OpFailure {
    pub fn new(kind: FailureKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(FailureKind::NotFound, msg)
    }

    pub fn not_owner(msg: impl Into<String>) -> Self {
        Self::new(FailureKind::NotOwner, msg)
    }
}

/// Outcome of a repository operation.
pub type OpOutcome<T> = Result<std::result::Result<T, OpFailure>, AppError>;

/// Parse a path-supplied document id.
///
/// A malformed id is a domain failure, not an HTTP error; the original
/// contract reports every bad input the same way.
pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, OpFailure> {
    ObjectId::parse_str(raw)
        .map_err(|_| OpFailure::new(FailureKind::InvalidId, format!("Invalid {} id.", what)))
}

/// Map a driver error into the opaque database error tier.
pub(crate) fn db_err(e: mongodb::error::Error) -> AppError {
    AppError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_valid() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex(), "post").unwrap(), id);
    }

    #[test]
    fn test_parse_object_id_invalid() {
        let err = parse_object_id("not-an-id", "post").unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidId);
        assert_eq!(err.msg, "Invalid post id.");
    }
}
