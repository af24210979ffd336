//! Linkmark Core Library
//!
//! This crate provides the core functionality for linkmark, a bookmark
//! manager backed by a remote HTTP/JSON bookmark service.
//!
//! # Architecture
//!
//! - **BookmarkStore**: in-memory source of truth for the bookmark
//!   collection and the current view configuration; mediates all reads
//!   and writes against the remote API and exposes derived views.
//! - **Transport**: the seam to the remote bookmark service; the HTTP
//!   implementation resolves authenticated headers from the session.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let session = Session::with_config(config.clone());
//! let transport = HttpTransport::new(&config, &session)?;
//! let mut store = BookmarkStore::new(transport);
//!
//! store.load_bookmarks().await?;
//! store.toggle_tag("rust");
//! let visible = store.visible_bookmarks();
//! ```
//!
//! # Modules
//!
//! - `store`: the bookmark store (main entry point)
//! - `models`: bookmark, draft, patch, and tag structures
//! - `criteria`: filter and sort configuration
//! - `api`: remote bookmark API transport
//! - `session`: session resolution and authenticated headers
//! - `config`: application configuration
//! - `error`: typed store and API errors

pub mod api;
pub mod config;
pub mod criteria;
pub mod error;
pub mod models;
pub mod session;
pub mod store;

pub use api::{HttpTransport, Transport};
pub use config::Config;
pub use criteria::{SortBy, ViewCriteria};
pub use error::{ApiError, StoreError, StoreResult};
pub use models::{favicon_for, normalize_url, Bookmark, BookmarkDraft, BookmarkPatch, Tag, MAX_PINNED};
pub use session::{Session, USER_ID_HEADER};
pub use store::{BookmarkStore, NoticeLevel, StoreEvent};
