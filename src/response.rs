// SPDX-License-Identifier: MIT

//! The uniform JSON envelope returned by every endpoint.

use serde::Serialize;

/// Response envelope: `{success, msg, details?}`.
///
/// Expected domain failures ride in this shape with `success: false` and an
/// ordinary 200 status; the HTTP layer only signals authentication and
/// infrastructure errors.
#[derive(Debug, Serialize)]
pub struct Envelope<T = serde_json::Value> {
    pub success: bool,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful operation carrying a payload.
    pub fn ok(msg: impl Into<String>, details: T) -> Self {
        Self {
            success: true,
            msg: msg.into(),
            details: Some(details),
        }
    }

    /// Domain failure; no payload.
    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            msg: msg.into(),
            details: None,
        }
    }
}

impl Envelope<serde_json::Value> {
    /// Successful operation with no payload (logout, deletes).
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            msg: msg.into(),
            details: None,
        }
    }
}
