//! View criteria
//!
//! The user-selected tag set, search text, archive-visibility flag, and
//! sort mode. These are pure local state; the store's derivation functions
//! consume them when producing filtered and sorted views.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::Bookmark;

/// Sort mode for bookmark listings
///
/// Pinned bookmarks always precede unpinned ones regardless of mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    /// Descending `date_added` (the default)
    #[default]
    RecentlyAdded,
    /// Descending `last_visited`, treating missing as epoch
    RecentlyVisited,
    /// Descending `view_count`
    MostVisited,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recently_added" => Ok(SortBy::RecentlyAdded),
            "recently_visited" => Ok(SortBy::RecentlyVisited),
            "most_visited" => Ok(SortBy::MostVisited),
            other => Err(format!(
                "unknown sort mode '{}' (expected recently_added, recently_visited, or most_visited)",
                other
            )),
        }
    }
}

/// The current view configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewCriteria {
    /// Selected tag names; empty means "all tags pass"
    pub selected_tags: Vec<String>,
    /// Free-text search over title, description, and URL
    pub search_query: String,
    /// When true, show only archived bookmarks; otherwise only non-archived
    pub show_archived: bool,
    /// Active sort mode
    pub sort_by: SortBy,
}

impl ViewCriteria {
    /// Toggle a tag in the selected set
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(pos) = self.selected_tags.iter().position(|t| t == tag) {
            self.selected_tags.remove(pos);
        } else {
            self.selected_tags.push(tag.to_string());
        }
    }

    /// Clear all selected tags
    pub fn clear_tags(&mut self) {
        self.selected_tags.clear();
    }

    /// Whether a bookmark passes all three AND-combined predicates:
    /// archive visibility, tag membership, and free-text search.
    pub fn matches(&self, bookmark: &Bookmark) -> bool {
        let archive_check = if self.show_archived {
            bookmark.is_archived
        } else {
            !bookmark.is_archived
        };

        let tag_check = self.selected_tags.is_empty()
            || bookmark
                .tags
                .iter()
                .any(|t| self.selected_tags.contains(&t.name));

        let query = self.search_query.trim().to_lowercase();
        let search_check = query.is_empty()
            || bookmark.title.to_lowercase().contains(&query)
            || bookmark.description.to_lowercase().contains(&query)
            || bookmark.url.to_lowercase().contains(&query);

        archive_check && tag_check && search_check
    }
}
