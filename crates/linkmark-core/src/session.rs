//! Session resolution and authenticated request headers
//!
//! The bookmark API identifies the caller through an `X-User-Id` header.
//! The signed-in user id is persisted as a single file under the data
//! directory; resolving headers fails fast when no session exists, and
//! callers must abort the attempted operation with a "must be logged in"
//! message rather than proceeding.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::path::PathBuf;

use crate::config::Config;
use crate::error::StoreError;

/// Header carrying the resolved user identity
pub const USER_ID_HEADER: &str = "X-User-Id";

/// Session manager for linkmark
///
/// Reads and writes the persisted user id and produces the header set
/// required by every bookmark-API call.
pub struct Session {
    config: Config,
}

impl Session {
    /// Create a session manager with specific configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Path of the session file (for display purposes)
    pub fn session_path(&self) -> PathBuf {
        self.config.session_path()
    }

    /// Whether a user is currently signed in
    pub fn is_signed_in(&self) -> bool {
        self.current_user().map(|u| u.is_some()).unwrap_or(false)
    }

    /// The signed-in user id, if any
    pub fn current_user(&self) -> Result<Option<String>> {
        let path = self.config.session_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file: {:?}", path))?;
        let user_id = content.trim();

        if user_id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(user_id.to_string()))
        }
    }

    /// Sign in as the given user
    ///
    /// Replaces any existing session. The id must be non-empty and free of
    /// whitespace since it travels in an HTTP header.
    pub fn sign_in(&self, user_id: &str) -> Result<()> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            anyhow::bail!("User id must not be empty");
        }
        if user_id.chars().any(char::is_whitespace) {
            anyhow::bail!("User id must not contain whitespace: '{}'", user_id);
        }

        let path = self.config.session_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
        std::fs::write(&path, user_id)
            .with_context(|| format!("Failed to write session file: {:?}", path))?;
        Ok(())
    }

    /// Sign out, removing the persisted session if present
    pub fn sign_out(&self) -> Result<()> {
        let path = self.config.session_path();
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {:?}", path))?;
        }
        Ok(())
    }

    /// Produce the header set for an authenticated bookmark-API request
    ///
    /// Fails with `StoreError::NotSignedIn` when no user can be resolved.
    pub fn auth_headers(&self) -> Result<HeaderMap, StoreError> {
        let user_id = self
            .current_user()
            .ok()
            .flatten()
            .ok_or(StoreError::NotSignedIn)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&user_id).map_err(|_| StoreError::NotSignedIn)?,
        );
        Ok(headers)
    }
}
