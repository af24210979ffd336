//! Data models for linkmark
//!
//! Defines the core data structures: Bookmark, BookmarkDraft, BookmarkPatch,
//! and Tag. Field names follow the camelCase wire format of the remote
//! bookmark API; older server responses that use `archived`/`pinned` are
//! normalized through serde aliases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of bookmarks that may be pinned at once
pub const MAX_PINNED: usize = 5;

/// A saved bookmark with metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// Opaque identifier assigned by the remote API
    pub id: String,
    /// Display title (often fetched from page metadata)
    pub title: String,
    /// The URL; unique within the collection after normalization
    pub url: String,
    /// Optional free-text description
    #[serde(default)]
    pub description: String,
    /// Icon URL derived from `url` at creation/edit time
    #[serde(default)]
    pub favicon: Option<String>,
    /// Tags for organization, unique by name within a bookmark
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, alias = "pinned")]
    pub is_pinned: bool,
    #[serde(default, alias = "archived")]
    pub is_archived: bool,
    /// Number of times this bookmark has been opened
    #[serde(default)]
    pub view_count: u64,
    /// When this bookmark was last opened; None until first open
    #[serde(default)]
    pub last_visited: Option<DateTime<Utc>>,
    /// When this bookmark was created (server clock)
    pub date_added: DateTime<Utc>,
}

impl Bookmark {
    /// The normalized form of this bookmark's URL (dedup key)
    pub fn normalized_url(&self) -> String {
        normalize_url(&self.url)
    }

    /// Check whether this bookmark carries a tag with the given name
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// Merge a partial update into this bookmark
    ///
    /// When the URL changes and the patch carries no explicit favicon,
    /// the favicon is re-derived from the new URL.
    pub fn apply(&mut self, patch: &BookmarkPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref url) = patch.url {
            self.url = url.clone();
            if patch.favicon.is_none() {
                self.favicon = Some(favicon_for(url));
            }
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(ref favicon) = patch.favicon {
            self.favicon = Some(favicon.clone());
        }
        if let Some(ref tags) = patch.tags {
            self.tags = tags.clone();
        }
    }
}

/// A bookmark draft, sent to the remote API on create
///
/// The server assigns `id` and timestamps and returns the full record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl BookmarkDraft {
    /// Create a new draft for the given URL
    ///
    /// The title defaults to the URL and the favicon is derived from it.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            title: url.clone(),
            favicon: Some(favicon_for(&url)),
            url,
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the title
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Add a tag by name, skipping duplicates
    pub fn add_tag(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.tags.iter().any(|t| t.name == name) {
            self.tags.push(Tag::new(name));
        }
    }
}

/// Partial fields for updating a bookmark
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl BookmarkPatch {
    /// Whether this patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.description.is_none()
            && self.favicon.is_none()
            && self.tags.is_none()
    }
}

/// A tag for organizing bookmarks
///
/// When derived from the collection (see `tags_with_count`), `id` is a
/// positional index recomputed on every derivation. `name` is the only
/// stable key; never persist or diff by `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

impl Tag {
    /// Create a new tag with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            count: None,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Tag {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Normalize a URL for duplicate detection (trimmed, case-insensitive)
pub fn normalize_url(url: &str) -> String {
    url.trim().to_lowercase()
}

/// Derive a favicon URL from a bookmark URL
pub fn favicon_for(url: &str) -> String {
    format!(
        "https://www.google.com/s2/favicons?sz=64&domain_url={}",
        url.trim()
    )
}
