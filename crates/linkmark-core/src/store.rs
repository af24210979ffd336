//! Bookmark store
//!
//! Single source of truth for the bookmark collection and the user's
//! current view configuration. All reads and writes between callers and
//! the remote bookmark API go through here; derived views (filtered,
//! sorted, tag-counted) are exposed as read-only snapshots.
//!
//! ## Failure semantics
//!
//! Remote failures are caught, logged, and surfaced as notices; the
//! collection keeps its pre-call state (the view-count increment is the
//! one documented exception: the optimistic bump is retained on failure).
//! Validation rejections (duplicate URL, pin limit) abort before any
//! network call. Nothing here is fatal; the store stays usable with
//! stale data.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = BookmarkStore::new(transport);
//! let mut events = store.take_events().unwrap();
//!
//! store.load_bookmarks().await?;
//! store.toggle_tag("rust");
//! let visible = store.visible_bookmarks();
//! ```

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::Transport;
use crate::criteria::{SortBy, ViewCriteria};
use crate::error::{StoreError, StoreResult};
use crate::models::{normalize_url, Bookmark, BookmarkDraft, BookmarkPatch, Tag, MAX_PINNED};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Events emitted by the store for observers
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// A user-facing notice (the UI's toasts)
    Notice {
        level: NoticeLevel,
        message: String,
    },
    /// The refresh key was bumped; dependent views should reload
    Refreshed(u64),
}

/// In-memory bookmark store backed by a remote transport
pub struct BookmarkStore<T: Transport> {
    transport: T,
    /// The canonical local collection
    bookmarks: Vec<Bookmark>,
    /// Snapshot of the server's pinned subset
    pinned: Vec<Bookmark>,
    criteria: ViewCriteria,
    /// Monotonic counter bumped when dependent views must reload
    refresh_key: u64,
    event_tx: mpsc::UnboundedSender<StoreEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<StoreEvent>>,
}

impl<T: Transport> BookmarkStore<T> {
    /// Create an empty store over the given transport
    pub fn new(transport: T) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            bookmarks: Vec::new(),
            pinned: Vec::new(),
            criteria: ViewCriteria::default(),
            refresh_key: 0,
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    /// Take the event receiver (can only be called once)
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<StoreEvent>> {
        self.event_rx.take()
    }

    // ==================== Accessors ====================

    /// The full local collection, in insertion order
    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// The last-loaded pinned subset
    pub fn pinned_bookmarks(&self) -> &[Bookmark] {
        &self.pinned
    }

    /// The current view configuration
    pub fn criteria(&self) -> &ViewCriteria {
        &self.criteria
    }

    /// Monotonic reload counter for dependent views
    pub fn refresh_key(&self) -> u64 {
        self.refresh_key
    }

    /// Look up a bookmark by id
    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == id)
    }

    /// Number of currently pinned bookmarks in the collection
    pub fn pinned_count(&self) -> usize {
        self.bookmarks.iter().filter(|b| b.is_pinned).count()
    }

    // ==================== Loading ====================

    /// Fetch the full collection for the authenticated user
    ///
    /// On success the local collection is replaced wholesale (server
    /// field-name variants are normalized during deserialization). On
    /// failure the prior state is left untouched and the error reported.
    pub async fn load_bookmarks(&mut self) -> StoreResult<()> {
        self.load_bookmarks_by_tag(&[]).await
    }

    /// Fetch the subset carrying any of the given tags
    ///
    /// The filtering happens server-side; the tag names are passed to the
    /// transport as-is. An empty slice loads the full collection. Same
    /// replace-on-success semantics as `load_bookmarks`.
    pub async fn load_bookmarks_by_tag(&mut self, tags: &[String]) -> StoreResult<()> {
        match self.transport.list(tags).await {
            Ok(bookmarks) => {
                debug!("Loaded {} bookmarks", bookmarks.len());
                self.bookmarks = bookmarks;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch bookmarks: {}", e);
                self.notice(NoticeLevel::Error, "Failed to fetch bookmarks");
                Err(e.into())
            }
        }
    }

    /// Fetch the pinned subset into its own snapshot
    pub async fn load_pinned(&mut self) -> StoreResult<()> {
        match self.transport.list_pinned().await {
            Ok(pinned) => {
                self.pinned = pinned;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch pinned bookmarks: {}", e);
                self.notice(NoticeLevel::Error, "Failed to fetch pinned bookmarks");
                Err(e.into())
            }
        }
    }

    /// List tags with counts as the server sees them
    pub async fn remote_tags(&self) -> StoreResult<Vec<Tag>> {
        match self.transport.tags().await {
            Ok(tags) => Ok(tags),
            Err(e) => {
                warn!("Failed to fetch tags: {}", e);
                self.notice(NoticeLevel::Error, "Failed to fetch tags");
                Err(e.into())
            }
        }
    }

    // ==================== Mutations ====================

    /// Append a server-confirmed bookmark to the local collection
    ///
    /// Rejects when another bookmark already uses the same normalized URL.
    /// No network call is made; the record is expected to exist remotely.
    pub fn add_bookmark(&mut self, bookmark: Bookmark) -> StoreResult<()> {
        if self.url_taken(&bookmark.url, None) {
            self.notice(NoticeLevel::Error, "A bookmark with this link already exists.");
            return Err(StoreError::DuplicateUrl { url: bookmark.url });
        }
        self.bookmarks.push(bookmark);
        Ok(())
    }

    /// Create a bookmark remotely and append the server's record
    ///
    /// The duplicate-URL check runs before the POST is attempted.
    pub async fn create_bookmark(&mut self, draft: BookmarkDraft) -> StoreResult<Bookmark> {
        if self.url_taken(&draft.url, None) {
            self.notice(NoticeLevel::Error, "A bookmark with this link already exists.");
            return Err(StoreError::DuplicateUrl { url: draft.url });
        }

        match self.transport.create(&draft).await {
            Ok(created) => {
                self.bookmarks.push(created.clone());
                Ok(created)
            }
            Err(e) => {
                warn!("Failed to create bookmark: {}", e);
                self.notice(NoticeLevel::Error, "Failed to save bookmark");
                Err(e.into())
            }
        }
    }

    /// Merge partial fields into a bookmark and persist the result
    ///
    /// Rejects when the new URL (if present) collides with a different
    /// bookmark's normalized URL; the check runs before the PUT. The
    /// server's response replaces the local record.
    pub async fn update_bookmark(&mut self, id: &str, patch: &BookmarkPatch) -> StoreResult<()> {
        let Some(index) = self.bookmarks.iter().position(|b| b.id == id) else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };

        if let Some(ref new_url) = patch.url {
            if self.url_taken(new_url, Some(id)) {
                self.notice(NoticeLevel::Error, "A bookmark with this link already exists.");
                return Err(StoreError::DuplicateUrl {
                    url: new_url.clone(),
                });
            }
        }

        let mut updated = self.bookmarks[index].clone();
        updated.apply(patch);

        match self.transport.update(id, &updated).await {
            Ok(saved) => {
                self.bookmarks[index] = saved;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to update bookmark {}: {}", id, e);
                self.notice(NoticeLevel::Error, "Failed to update bookmark");
                Err(e.into())
            }
        }
    }

    /// Delete a bookmark remotely, then evict it locally
    pub async fn delete_bookmark(&mut self, id: &str) -> StoreResult<()> {
        match self.transport.delete(id).await {
            Ok(()) => {
                self.bookmarks.retain(|b| b.id != id);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete bookmark {}: {}", id, e);
                self.notice(NoticeLevel::Error, "Failed to delete bookmark");
                Err(e.into())
            }
        }
    }

    /// Toggle a bookmark's pin state
    ///
    /// No-op for an unknown id. Pinning a sixth bookmark is rejected
    /// before any network call; otherwise the server's response is the
    /// authoritative resulting state.
    pub async fn toggle_pin(&mut self, id: &str) -> StoreResult<()> {
        let Some(bookmark) = self.get(id) else {
            return Ok(());
        };

        if !bookmark.is_pinned && self.pinned_count() >= MAX_PINNED {
            self.notice(
                NoticeLevel::Error,
                format!("You can only pin up to {} bookmarks.", MAX_PINNED),
            );
            return Err(StoreError::pin_limit());
        }

        match self.transport.toggle_pin(id).await {
            Ok(updated) => {
                self.replace(updated);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to toggle pin on {}: {}", id, e);
                self.notice(NoticeLevel::Error, "Failed to update bookmark");
                Err(e.into())
            }
        }
    }

    /// Toggle a bookmark's archive state
    ///
    /// If the server's response is archived, the pin flag is forced off
    /// locally as well (the server enforces the same invariant). Bumps the
    /// refresh key so dependent views reload.
    pub async fn toggle_archive(&mut self, id: &str) -> StoreResult<()> {
        if self.get(id).is_none() {
            return Ok(());
        }

        match self.transport.toggle_archive(id).await {
            Ok(mut updated) => {
                if updated.is_archived {
                    updated.is_pinned = false;
                }
                let archived = updated.is_archived;
                self.replace(updated);

                if archived {
                    self.notice(NoticeLevel::Info, "Bookmark archived and unpinned");
                } else {
                    self.notice(NoticeLevel::Success, "Bookmark restored");
                }

                self.refresh_key += 1;
                self.emit(StoreEvent::Refreshed(self.refresh_key));
                Ok(())
            }
            Err(e) => {
                warn!("Failed to toggle archive on {}: {}", id, e);
                self.notice(NoticeLevel::Error, "Failed to update bookmark");
                Err(e.into())
            }
        }
    }

    /// Record that a bookmark was opened
    ///
    /// The local count and `last_visited` are bumped optimistically before
    /// the round-trip so opening feels instant. On success the server's
    /// canonical record wins (server clock included). On failure the
    /// optimistic values are retained uncorrected.
    pub async fn increment_view_count(&mut self, id: &str) -> StoreResult<()> {
        let Some(index) = self.bookmarks.iter().position(|b| b.id == id) else {
            return Ok(());
        };

        self.bookmarks[index].view_count += 1;
        self.bookmarks[index].last_visited = Some(Utc::now());

        match self.transport.increment_view(id).await {
            Ok(updated) => {
                self.bookmarks[index] = updated;
                Ok(())
            }
            Err(e) => {
                warn!("Failed to record view on {}: {}", id, e);
                self.notice(NoticeLevel::Error, "Failed to record visit");
                Err(e.into())
            }
        }
    }

    // ==================== View configuration ====================

    /// Set the sort mode
    pub fn set_sort_by(&mut self, sort_by: SortBy) {
        self.criteria.sort_by = sort_by;
    }

    /// Toggle a tag in the selected set
    pub fn toggle_tag(&mut self, tag: &str) {
        self.criteria.toggle_tag(tag);
    }

    /// Clear all selected tags
    pub fn clear_tags(&mut self) {
        self.criteria.clear_tags();
    }

    /// Switch between archived-only and non-archived views
    pub fn set_show_archived(&mut self, show: bool) {
        self.criteria.show_archived = show;
    }

    /// Set the free-text search query
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.criteria.search_query = query.into();
    }

    // ==================== Derivations ====================

    /// Bookmarks passing the current criteria (unsorted)
    ///
    /// Pure function of the collection and criteria; calling it twice with
    /// unchanged inputs yields identical output.
    pub fn filtered_bookmarks(&self) -> Vec<Bookmark> {
        self.bookmarks
            .iter()
            .filter(|b| self.criteria.matches(b))
            .cloned()
            .collect()
    }

    /// The full collection ordered by the current sort mode, pinned first
    pub fn sorted_bookmarks(&self) -> Vec<Bookmark> {
        let mut list = self.bookmarks.clone();
        sort_bookmarks(&mut list, self.criteria.sort_by);
        list
    }

    /// Filtered and sorted view, ready for display
    pub fn visible_bookmarks(&self) -> Vec<Bookmark> {
        let mut list = self.filtered_bookmarks();
        sort_bookmarks(&mut list, self.criteria.sort_by);
        list
    }

    /// Tag frequencies across the full collection (not the filtered view)
    ///
    /// Recomputed on every call; tag ids are positional indexes, so `name`
    /// is the only key that survives across calls.
    pub fn tags_with_count(&self) -> Vec<Tag> {
        let mut counts: Vec<(String, u64)> = Vec::new();
        for bookmark in &self.bookmarks {
            for tag in &bookmark.tags {
                match counts.iter_mut().find(|(name, _)| *name == tag.name) {
                    Some((_, count)) => *count += 1,
                    None => counts.push((tag.name.clone(), 1)),
                }
            }
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(index, (name, count))| Tag {
                id: index as u64,
                name,
                count: Some(count),
            })
            .collect()
    }

    // ==================== Internals ====================

    /// Whether a normalized URL is already used by another bookmark
    fn url_taken(&self, url: &str, excluding: Option<&str>) -> bool {
        let normalized = normalize_url(url);
        self.bookmarks
            .iter()
            .any(|b| excluding != Some(b.id.as_str()) && b.normalized_url() == normalized)
    }

    /// Replace the local record matching the given bookmark's id
    fn replace(&mut self, bookmark: Bookmark) {
        if let Some(existing) = self.bookmarks.iter_mut().find(|b| b.id == bookmark.id) {
            *existing = bookmark;
        }
    }

    fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        self.emit(StoreEvent::Notice {
            level,
            message: message.into(),
        });
    }

    fn emit(&self, event: StoreEvent) {
        let _ = self.event_tx.send(event);
    }
}

/// Order bookmarks pinned-first, then by the sort mode's key descending
///
/// `Vec::sort_by` is stable, so equal keys keep their relative order.
fn sort_bookmarks(list: &mut [Bookmark], sort_by: SortBy) {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    list.sort_by(|a, b| {
        b.is_pinned.cmp(&a.is_pinned).then_with(|| match sort_by {
            SortBy::RecentlyAdded => b.date_added.cmp(&a.date_added),
            SortBy::RecentlyVisited => b
                .last_visited
                .unwrap_or(epoch)
                .cmp(&a.last_visited.unwrap_or(epoch)),
            SortBy::MostVisited => b.view_count.cmp(&a.view_count),
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// In-memory transport that acts as a tiny bookmark server and
    /// records every call so tests can assert "no network call issued".
    #[derive(Default)]
    struct FakeTransport {
        server: Mutex<Vec<Bookmark>>,
        calls: Mutex<Vec<String>>,
        fail: AtomicBool,
    }

    impl FakeTransport {
        fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
            Self {
                server: Mutex::new(bookmarks),
                ..Default::default()
            }
        }

        fn set_offline(&self, offline: bool) {
            self.fail.store(offline, Ordering::SeqCst);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(call.to_string());
            if self.fail.load(Ordering::SeqCst) {
                Err(ApiError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    path: call.to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn list(&self, tags: &[String]) -> Result<Vec<Bookmark>, ApiError> {
            if tags.is_empty() {
                self.record("list")?;
                return Ok(self.server.lock().unwrap().clone());
            }
            self.record(&format!("list?tag={}", tags.join(",")))?;
            Ok(self
                .server
                .lock()
                .unwrap()
                .iter()
                .filter(|b| tags.iter().any(|t| b.has_tag(t)))
                .cloned()
                .collect())
        }

        async fn list_pinned(&self) -> Result<Vec<Bookmark>, ApiError> {
            self.record("list_pinned")?;
            Ok(self
                .server
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.is_pinned)
                .cloned()
                .collect())
        }

        async fn create(&self, draft: &BookmarkDraft) -> Result<Bookmark, ApiError> {
            self.record("create")?;
            let mut server = self.server.lock().unwrap();
            let created = Bookmark {
                id: format!("srv-{}", server.len() + 1),
                title: draft.title.clone(),
                url: draft.url.clone(),
                description: draft.description.clone(),
                favicon: draft.favicon.clone(),
                tags: draft.tags.clone(),
                is_pinned: false,
                is_archived: false,
                view_count: 0,
                last_visited: None,
                date_added: Utc::now(),
            };
            server.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: &str, bookmark: &Bookmark) -> Result<Bookmark, ApiError> {
            self.record("update")?;
            let mut server = self.server.lock().unwrap();
            let existing = server.iter_mut().find(|b| b.id == id).unwrap();
            *existing = bookmark.clone();
            Ok(existing.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ApiError> {
            self.record("delete")?;
            self.server.lock().unwrap().retain(|b| b.id != id);
            Ok(())
        }

        async fn toggle_pin(&self, id: &str) -> Result<Bookmark, ApiError> {
            self.record("toggle_pin")?;
            let mut server = self.server.lock().unwrap();
            let bookmark = server.iter_mut().find(|b| b.id == id).unwrap();
            bookmark.is_pinned = !bookmark.is_pinned;
            Ok(bookmark.clone())
        }

        async fn increment_view(&self, id: &str) -> Result<Bookmark, ApiError> {
            self.record("increment_view")?;
            let mut server = self.server.lock().unwrap();
            let bookmark = server.iter_mut().find(|b| b.id == id).unwrap();
            bookmark.view_count += 1;
            bookmark.last_visited = Some(Utc::now());
            Ok(bookmark.clone())
        }

        async fn toggle_archive(&self, id: &str) -> Result<Bookmark, ApiError> {
            self.record("toggle_archive")?;
            let mut server = self.server.lock().unwrap();
            let bookmark = server.iter_mut().find(|b| b.id == id).unwrap();
            // The fake leaves the pin flag alone so tests exercise the
            // client-side unpin enforcement.
            bookmark.is_archived = !bookmark.is_archived;
            Ok(bookmark.clone())
        }

        async fn tags(&self) -> Result<Vec<Tag>, ApiError> {
            self.record("tags")?;
            Ok(Vec::new())
        }
    }

    fn bookmark(id: &str, url: &str) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            title: id.to_string(),
            url: url.to_string(),
            description: String::new(),
            favicon: None,
            tags: Vec::new(),
            is_pinned: false,
            is_archived: false,
            view_count: 0,
            last_visited: None,
            date_added: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn tagged(id: &str, url: &str, tags: &[&str]) -> Bookmark {
        let mut b = bookmark(id, url);
        b.tags = tags.iter().map(|t| Tag::new(*t)).collect();
        b
    }

    fn store_with(bookmarks: Vec<Bookmark>) -> BookmarkStore<FakeTransport> {
        let mut store = BookmarkStore::new(FakeTransport::default());
        for b in bookmarks {
            store.add_bookmark(b).unwrap();
        }
        store
    }

    /// Drain all pending notices into (level, message) pairs
    fn drain_notices(
        rx: &mut mpsc::UnboundedReceiver<StoreEvent>,
    ) -> Vec<(NoticeLevel, String)> {
        let mut notices = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let StoreEvent::Notice { level, message } = event {
                notices.push((level, message));
            }
        }
        notices
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let transport =
            FakeTransport::with_bookmarks(vec![bookmark("a", "https://a.com"), bookmark("b", "https://b.com")]);
        let mut store = BookmarkStore::new(transport);
        store.add_bookmark(bookmark("stale", "https://stale.com")).unwrap();

        store.load_bookmarks().await.unwrap();

        assert_eq!(store.bookmarks().len(), 2);
        assert!(store.get("stale").is_none());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_prior_state() {
        let transport = FakeTransport::with_bookmarks(vec![bookmark("a", "https://a.com")]);
        transport.set_offline(true);
        let mut store = BookmarkStore::new(transport);
        store.add_bookmark(bookmark("kept", "https://kept.com")).unwrap();
        let mut events = store.take_events().unwrap();

        let result = store.load_bookmarks().await;

        assert!(result.is_err());
        assert_eq!(store.bookmarks().len(), 1);
        assert!(store.get("kept").is_some());

        let notices = drain_notices(&mut events);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn test_load_by_tag_passes_tags_to_transport() {
        let transport = FakeTransport::with_bookmarks(vec![
            tagged("a", "https://a.com", &["rust"]),
            tagged("b", "https://b.com", &["python"]),
        ]);
        let mut store = BookmarkStore::new(transport);

        store
            .load_bookmarks_by_tag(&["rust".to_string(), "web".to_string()])
            .await
            .unwrap();

        assert_eq!(store.transport.calls(), vec!["list?tag=rust,web"]);
        assert_eq!(store.bookmarks().len(), 1);
        assert_eq!(store.bookmarks()[0].id, "a");
    }

    #[tokio::test]
    async fn test_load_pinned_snapshot() {
        let mut pinned = bookmark("p", "https://p.com");
        pinned.is_pinned = true;
        let transport =
            FakeTransport::with_bookmarks(vec![pinned, bookmark("u", "https://u.com")]);
        let mut store = BookmarkStore::new(transport);

        store.load_pinned().await.unwrap();

        assert_eq!(store.pinned_bookmarks().len(), 1);
        assert_eq!(store.pinned_bookmarks()[0].id, "p");
    }

    #[test]
    fn test_add_rejects_duplicate_url_case_and_whitespace() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);
        let mut events = store.take_events().unwrap();

        let result = store.add_bookmark(bookmark("b", "HTTPS://A.COM "));

        assert!(matches!(result, Err(StoreError::DuplicateUrl { .. })));
        assert_eq!(store.bookmarks().len(), 1);

        let notices = drain_notices(&mut events);
        assert_eq!(notices[0].1, "A bookmark with this link already exists.");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_before_network() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);

        let result = store.create_bookmark(BookmarkDraft::new(" https://A.com")).await;

        assert!(matches!(result, Err(StoreError::DuplicateUrl { .. })));
        assert!(store.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_appends_server_record() {
        let mut store = BookmarkStore::new(FakeTransport::default());

        let mut draft = BookmarkDraft::new("https://a.com");
        draft.set_title("Site A");
        draft.add_tag("web");
        let created = store.create_bookmark(draft).await.unwrap();

        assert_eq!(created.id, "srv-1");
        assert_eq!(store.bookmarks().len(), 1);
        assert_eq!(store.get("srv-1").unwrap().title, "Site A");
    }

    #[tokio::test]
    async fn test_update_rejects_colliding_url_before_network() {
        let mut store =
            store_with(vec![bookmark("a", "https://a.com"), bookmark("b", "https://b.com")]);

        let patch = BookmarkPatch {
            url: Some("HTTPS://A.COM".to_string()),
            ..Default::default()
        };
        let result = store.update_bookmark("b", &patch).await;

        assert!(matches!(result, Err(StoreError::DuplicateUrl { .. })));
        assert_eq!(store.get("b").unwrap().url, "https://b.com");
        assert!(store.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_update_allows_keeping_own_url() {
        let transport = FakeTransport::with_bookmarks(vec![bookmark("a", "https://a.com")]);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();

        let patch = BookmarkPatch {
            url: Some("https://a.com".to_string()),
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        store.update_bookmark("a", &patch).await.unwrap();

        assert_eq!(store.get("a").unwrap().title, "Renamed");
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);

        let result = store.update_bookmark("nope", &BookmarkPatch::default()).await;

        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_evicts_locally() {
        let transport = FakeTransport::with_bookmarks(vec![bookmark("a", "https://a.com")]);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();

        store.delete_bookmark("a").await.unwrap();

        assert!(store.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_state() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);
        store.transport.set_offline(true);

        let result = store.delete_bookmark("a").await;

        assert!(result.is_err());
        assert_eq!(store.bookmarks().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_pin_unknown_id_is_noop() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);

        store.toggle_pin("nope").await.unwrap();

        assert!(store.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pin_limit_rejected_before_network() {
        let mut bookmarks: Vec<Bookmark> = (0..5)
            .map(|i| {
                let mut b = bookmark(&format!("p{}", i), &format!("https://p{}.com", i));
                b.is_pinned = true;
                b
            })
            .collect();
        bookmarks.push(bookmark("extra", "https://extra.com"));
        let mut store = store_with(bookmarks);
        let mut events = store.take_events().unwrap();

        let result = store.toggle_pin("extra").await;

        assert!(matches!(result, Err(StoreError::PinLimitReached { limit: 5 })));
        assert_eq!(store.pinned_count(), 5);
        assert!(store.transport.calls().is_empty());

        let notices = drain_notices(&mut events);
        assert_eq!(notices[0].1, "You can only pin up to 5 bookmarks.");
    }

    #[tokio::test]
    async fn test_unpin_allowed_at_limit() {
        let bookmarks: Vec<Bookmark> = (0..5)
            .map(|i| {
                let mut b = bookmark(&format!("p{}", i), &format!("https://p{}.com", i));
                b.is_pinned = true;
                b
            })
            .collect();
        let transport = FakeTransport::with_bookmarks(bookmarks);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();

        store.toggle_pin("p0").await.unwrap();

        assert_eq!(store.pinned_count(), 4);
        assert!(!store.get("p0").unwrap().is_pinned);
    }

    #[tokio::test]
    async fn test_toggle_pin_applies_server_state() {
        let transport = FakeTransport::with_bookmarks(vec![bookmark("a", "https://a.com")]);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();

        store.toggle_pin("a").await.unwrap();

        assert!(store.get("a").unwrap().is_pinned);
        assert_eq!(store.transport.calls(), vec!["list", "toggle_pin"]);
    }

    #[tokio::test]
    async fn test_toggle_archive_forces_unpin_and_bumps_refresh_key() {
        let mut pinned = bookmark("a", "https://a.com");
        pinned.is_pinned = true;
        let transport = FakeTransport::with_bookmarks(vec![pinned]);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();
        let mut events = store.take_events().unwrap();
        let key_before = store.refresh_key();

        store.toggle_archive("a").await.unwrap();

        let archived = store.get("a").unwrap();
        assert!(archived.is_archived);
        assert!(!archived.is_pinned);
        assert_eq!(store.refresh_key(), key_before + 1);

        let notices = drain_notices(&mut events);
        assert_eq!(notices[0].0, NoticeLevel::Info);
        assert_eq!(notices[0].1, "Bookmark archived and unpinned");
    }

    #[tokio::test]
    async fn test_toggle_archive_restore_notice() {
        let mut archived = bookmark("a", "https://a.com");
        archived.is_archived = true;
        let transport = FakeTransport::with_bookmarks(vec![archived]);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();
        let mut events = store.take_events().unwrap();

        store.toggle_archive("a").await.unwrap();

        assert!(!store.get("a").unwrap().is_archived);
        let notices = drain_notices(&mut events);
        assert_eq!(notices[0].0, NoticeLevel::Success);
        assert_eq!(notices[0].1, "Bookmark restored");
    }

    #[tokio::test]
    async fn test_toggle_archive_failure_keeps_state() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);
        store.transport.set_offline(true);
        let key_before = store.refresh_key();

        let result = store.toggle_archive("a").await;

        assert!(result.is_err());
        assert!(!store.get("a").unwrap().is_archived);
        assert_eq!(store.refresh_key(), key_before);
    }

    #[tokio::test]
    async fn test_increment_view_optimistic_update_without_rollback() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);
        store.transport.set_offline(true);

        let result = store.increment_view_count("a").await;

        // The network call failed, but the optimistic bump is retained.
        assert!(result.is_err());
        let b = store.get("a").unwrap();
        assert_eq!(b.view_count, 1);
        assert!(b.last_visited.is_some());
    }

    #[tokio::test]
    async fn test_increment_view_server_value_wins() {
        let mut seeded = bookmark("a", "https://a.com");
        seeded.view_count = 9;
        let transport = FakeTransport::with_bookmarks(vec![seeded]);
        let mut store = BookmarkStore::new(transport);
        store.load_bookmarks().await.unwrap();

        store.increment_view_count("a").await.unwrap();

        // Server canonical value (10), not a double-applied increment.
        assert_eq!(store.get("a").unwrap().view_count, 10);
    }

    #[tokio::test]
    async fn test_increment_view_unknown_id_is_noop() {
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);

        store.increment_view_count("nope").await.unwrap();

        assert!(store.transport.calls().is_empty());
    }

    #[test]
    fn test_filtered_is_pure_and_idempotent() {
        let mut store = store_with(vec![
            tagged("a", "https://a.com", &["rust"]),
            tagged("b", "https://b.com", &["web"]),
        ]);
        store.toggle_tag("rust");
        store.set_search_query("a");

        let first = store.filtered_bookmarks();
        let second = store.filtered_bookmarks();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, "a");
    }

    #[test]
    fn test_filtered_hides_archived_by_default() {
        let mut archived = bookmark("x", "https://x.com");
        archived.is_archived = true;
        let mut store = store_with(vec![bookmark("a", "https://a.com")]);
        store.add_bookmark(archived).unwrap();

        let visible = store.filtered_bookmarks();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "a");

        store.set_show_archived(true);
        let archived_view = store.filtered_bookmarks();
        assert_eq!(archived_view.len(), 1);
        assert_eq!(archived_view[0].id, "x");
    }

    #[test]
    fn test_sorted_pinned_first_in_every_mode() {
        let mut first = bookmark("a", "https://a.com");
        first.is_pinned = true;
        let second = bookmark("b", "https://b.com");
        let mut third = bookmark("c", "https://c.com");
        third.is_pinned = true;
        third.view_count = 100;
        let store = store_with(vec![first, second, third]);

        for mode in [SortBy::RecentlyAdded, SortBy::RecentlyVisited, SortBy::MostVisited] {
            let mut list = store.bookmarks().to_vec();
            sort_bookmarks(&mut list, mode);
            assert!(list[0].is_pinned, "mode {:?}", mode);
            assert!(list[1].is_pinned, "mode {:?}", mode);
            assert!(!list[2].is_pinned, "mode {:?}", mode);
        }
    }

    #[test]
    fn test_sorted_recently_added_descending() {
        let mut older = bookmark("old", "https://old.com");
        older.date_added = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut newer = bookmark("new", "https://new.com");
        newer.date_added = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let store = store_with(vec![older, newer]);

        let sorted = store.sorted_bookmarks();
        assert_eq!(sorted[0].id, "new");
        assert_eq!(sorted[1].id, "old");
    }

    #[test]
    fn test_sorted_recently_visited_missing_as_epoch() {
        let never = bookmark("never", "https://never.com");
        let mut visited = bookmark("visited", "https://visited.com");
        visited.last_visited = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let mut store = store_with(vec![never, visited]);
        store.set_sort_by(SortBy::RecentlyVisited);

        let sorted = store.sorted_bookmarks();
        assert_eq!(sorted[0].id, "visited");
        assert_eq!(sorted[1].id, "never");
    }

    #[test]
    fn test_sorted_most_visited_descending() {
        let mut quiet = bookmark("quiet", "https://quiet.com");
        quiet.view_count = 1;
        let mut popular = bookmark("popular", "https://popular.com");
        popular.view_count = 50;
        let mut store = store_with(vec![quiet, popular]);
        store.set_sort_by(SortBy::MostVisited);

        let sorted = store.sorted_bookmarks();
        assert_eq!(sorted[0].id, "popular");
    }

    #[test]
    fn test_tags_with_count_covers_full_collection() {
        let mut archived = tagged("x", "https://x.com", &["rust"]);
        archived.is_archived = true;
        let mut store = store_with(vec![
            tagged("a", "https://a.com", &["rust", "web"]),
            tagged("b", "https://b.com", &["rust"]),
        ]);
        store.add_bookmark(archived).unwrap();
        // Filtering must not affect the counts
        store.toggle_tag("web");
        store.set_search_query("nothing-matches");

        let tags = store.tags_with_count();

        let rust = tags.iter().find(|t| t.name == "rust").unwrap();
        assert_eq!(rust.count, Some(3));
        let web = tags.iter().find(|t| t.name == "web").unwrap();
        assert_eq!(web.count, Some(1));

        // Ids are positional indexes
        assert_eq!(tags[0].id, 0);
        assert_eq!(tags[1].id, 1);
    }
}
