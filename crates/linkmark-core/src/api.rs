//! Remote bookmark API transport
//!
//! HTTP/JSON client for the bookmark service, one resource path per
//! capability. All requests carry the authenticated header set resolved
//! from the session (`Content-Type` plus `X-User-Id`).
//!
//! The `Transport` trait is the seam between the store and the network;
//! tests substitute an in-memory implementation.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{ApiError, StoreError};
use crate::models::{Bookmark, BookmarkDraft, Tag};
use crate::session::Session;

/// Request timeout in seconds
const REQUEST_TIMEOUT: u64 = 10;

/// Remote operations the bookmark store depends on
#[async_trait]
pub trait Transport: Send + Sync {
    /// List bookmarks, optionally filtered by tag names
    async fn list(&self, tags: &[String]) -> Result<Vec<Bookmark>, ApiError>;

    /// List the pinned subset
    async fn list_pinned(&self) -> Result<Vec<Bookmark>, ApiError>;

    /// Create a bookmark; the server assigns id and timestamps
    async fn create(&self, draft: &BookmarkDraft) -> Result<Bookmark, ApiError>;

    /// Full update of an existing bookmark
    async fn update(&self, id: &str, bookmark: &Bookmark) -> Result<Bookmark, ApiError>;

    /// Delete a bookmark
    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// Toggle pin state; returns the updated bookmark
    async fn toggle_pin(&self, id: &str) -> Result<Bookmark, ApiError>;

    /// Increment the view count; returns the updated bookmark
    async fn increment_view(&self, id: &str) -> Result<Bookmark, ApiError>;

    /// Toggle archive state; returns the updated bookmark
    async fn toggle_archive(&self, id: &str) -> Result<Bookmark, ApiError>;

    /// List tags with usage counts as the server sees them
    async fn tags(&self) -> Result<Vec<Tag>, ApiError>;
}

/// HTTP transport against the configured bookmark service
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    headers: HeaderMap,
}

impl HttpTransport {
    /// Build a transport for the configured API and the current session
    ///
    /// Fails with `StoreError::NotSignedIn` when no user can be resolved.
    pub fn new(config: &Config, session: &Session) -> Result<Self, StoreError> {
        let headers = session.auth_headers()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT))
            .build()
            .map_err(ApiError::Http)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            headers,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                path: path.to_string(),
            });
        }
        Ok(response.json().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {}", path);
        let response = self
            .client
            .get(self.endpoint(path))
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::parse(response, path).await
    }

    async fn patch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("PATCH {}", path);
        let response = self
            .client
            .patch(self.endpoint(path))
            .headers(self.headers.clone())
            .send()
            .await?;
        Self::parse(response, path).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn list(&self, tags: &[String]) -> Result<Vec<Bookmark>, ApiError> {
        let path = "/api/bookmarks";
        debug!("GET {}", path);
        let mut request = self
            .client
            .get(self.endpoint(path))
            .headers(self.headers.clone());
        // The query builder percent-encodes tag values
        if !tags.is_empty() {
            request = request.query(&[("tag", tags.join(","))]);
        }
        let response = request.send().await?;
        Self::parse(response, path).await
    }

    async fn list_pinned(&self) -> Result<Vec<Bookmark>, ApiError> {
        self.get_json("/api/bookmarks/pinned").await
    }

    async fn create(&self, draft: &BookmarkDraft) -> Result<Bookmark, ApiError> {
        let path = "/api/bookmarks";
        debug!("POST {}", path);
        let response = self
            .client
            .post(self.endpoint(path))
            .headers(self.headers.clone())
            .json(draft)
            .send()
            .await?;
        Self::parse(response, path).await
    }

    async fn update(&self, id: &str, bookmark: &Bookmark) -> Result<Bookmark, ApiError> {
        let path = format!("/api/bookmarks/{}", id);
        debug!("PUT {}", path);
        let response = self
            .client
            .put(self.endpoint(&path))
            .headers(self.headers.clone())
            .json(bookmark)
            .send()
            .await?;
        Self::parse(response, &path).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/api/bookmarks/{}", id);
        debug!("DELETE {}", path);
        let response = self
            .client
            .delete(self.endpoint(&path))
            .headers(self.headers.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status, path });
        }
        Ok(())
    }

    async fn toggle_pin(&self, id: &str) -> Result<Bookmark, ApiError> {
        self.patch_json(&format!("/api/bookmarks/{}/pin", id)).await
    }

    async fn increment_view(&self, id: &str) -> Result<Bookmark, ApiError> {
        self.patch_json(&format!("/api/bookmarks/{}/view", id)).await
    }

    async fn toggle_archive(&self, id: &str) -> Result<Bookmark, ApiError> {
        self.patch_json(&format!("/api/bookmarks/{}/archive", id))
            .await
    }

    async fn tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.get_json("/api/tags").await
    }
}
