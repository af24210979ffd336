//! Error handling for the bookmark store
//!
//! Three failure classes, none fatal to the caller:
//! - validation/business-rule rejections, detected before any network call
//! - remote failures, caught at each call site with local state preserved
//! - authentication-precondition failures (no signed-in user)

use thiserror::Error;

use crate::models::MAX_PINNED;

/// Errors surfaced by store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another bookmark already uses the same normalized URL
    #[error("A bookmark with this link already exists.")]
    DuplicateUrl { url: String },

    /// The pin limit would be exceeded
    #[error("You can only pin up to {limit} bookmarks.")]
    PinLimitReached { limit: usize },

    /// No bookmark with this id in the local collection
    #[error("Bookmark not found: {id}")]
    NotFound { id: String },

    /// No signed-in user could be resolved
    #[error("You must be logged in to manage bookmarks.")]
    NotSignedIn,

    /// A remote call failed; local state is left untouched
    #[error(transparent)]
    Remote(#[from] ApiError),
}

impl StoreError {
    /// Reject pinning beyond the global limit
    pub fn pin_limit() -> Self {
        StoreError::PinLimitReached { limit: MAX_PINNED }
    }
}

/// Errors from the remote bookmark API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport-level failure (connection, timeout, decode)
    #[error("Request to the bookmark service failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("Bookmark service returned {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
