//! Bookmark command handlers

use anyhow::{bail, Context, Result};

use linkmark_core::{BookmarkDraft, BookmarkPatch, BookmarkStore, SortBy, Tag, Transport};

use crate::editor::{confirm, prompt_optional, prompt_with_default};
use crate::metadata::fetch_metadata;
use crate::output::Output;

/// Save a new bookmark
///
/// Page metadata is fetched to pre-fill title and description unless the
/// caller provides them or passes `--no-fetch`.
pub async fn add<T: Transport>(
    store: &mut BookmarkStore<T>,
    url: String,
    tags: Vec<String>,
    title: Option<String>,
    description: Option<String>,
    no_fetch: bool,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;

    let mut draft = BookmarkDraft::new(&url);

    let metadata = if no_fetch || (title.is_some() && description.is_some()) {
        Default::default()
    } else {
        fetch_metadata(&url).await
    };

    if let Some(title) = title.or(metadata.title) {
        draft.set_title(title);
    }
    if let Some(description) = description.or(metadata.description) {
        draft.set_description(description);
    }
    for tag in tags {
        draft.add_tag(tag);
    }

    let created = store
        .create_bookmark(draft)
        .await
        .context("Failed to save bookmark")?;

    output.success(&format!("Saved bookmark: {}", created.id));
    output.print_bookmark(&created);

    Ok(())
}

/// List bookmarks through the current view criteria
///
/// Tag filtering happens server-side; the same tags are mirrored into
/// the local criteria so derived views stay consistent.
pub async fn list<T: Transport>(
    store: &mut BookmarkStore<T>,
    tags: Vec<String>,
    archived: bool,
    search: Option<String>,
    sort: Option<String>,
    output: &Output,
) -> Result<()> {
    if tags.is_empty() {
        store.load_bookmarks().await?;
    } else {
        store.load_bookmarks_by_tag(&tags).await?;
    }

    for tag in &tags {
        store.toggle_tag(tag);
    }
    store.set_show_archived(archived);
    if let Some(query) = search {
        store.set_search_query(query);
    }
    if let Some(sort) = sort {
        let sort_by: SortBy = sort.parse().map_err(anyhow::Error::msg)?;
        store.set_sort_by(sort_by);
    }

    output.print_bookmarks(&store.visible_bookmarks());
    Ok(())
}

/// Show a single bookmark
pub async fn show<T: Transport>(
    store: &mut BookmarkStore<T>,
    id: String,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    let id = resolve_id(store, &id)?;

    let bookmark = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;

    output.print_bookmark(bookmark);
    Ok(())
}

/// Edit a bookmark interactively
pub async fn edit<T: Transport>(
    store: &mut BookmarkStore<T>,
    id: String,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    let id = resolve_id(store, &id)?;

    let current = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?
        .clone();

    println!("Editing bookmark: {}", current.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let mut patch = BookmarkPatch::default();

    if let Some(title) = prompt_with_default("Title", &current.title)? {
        patch.title = Some(title);
    }
    if let Some(url) = prompt_with_default("URL", &current.url)? {
        patch.url = Some(url);
    }
    if let Some(description) = prompt_with_default("Description", &current.description)? {
        patch.description = Some(description);
    }

    let current_tags: Vec<&str> = current.tags.iter().map(|t| t.name.as_str()).collect();
    println!(
        "Current tags: {}",
        if current_tags.is_empty() {
            "(none)".to_string()
        } else {
            current_tags.join(", ")
        }
    );
    if let Some(new_tags) = prompt_optional("New tags (comma-separated)")? {
        let tags: Vec<Tag> = new_tags
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(Tag::new)
            .collect();
        patch.tags = Some(tags);
    }

    if patch.is_empty() {
        output.message("No changes.");
        return Ok(());
    }

    store
        .update_bookmark(&id, &patch)
        .await
        .context("Failed to update bookmark")?;

    output.success("Bookmark updated");
    if let Some(updated) = store.get(&id) {
        output.print_bookmark(updated);
    }

    Ok(())
}

/// Delete a bookmark
pub async fn delete<T: Transport>(
    store: &mut BookmarkStore<T>,
    id: String,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    let id = resolve_id(store, &id)?;

    let bookmark = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;

    // Confirm deletion
    if output.should_prompt() {
        println!("Delete bookmark: {} - {}", bookmark.id, bookmark.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store
        .delete_bookmark(&id)
        .await
        .context("Failed to delete bookmark")?;

    output.success(&format!("Deleted bookmark: {}", id));
    Ok(())
}

/// Search bookmarks by free text
pub async fn search<T: Transport>(
    store: &mut BookmarkStore<T>,
    query: String,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    store.set_search_query(query);
    output.print_bookmarks(&store.visible_bookmarks());
    Ok(())
}

/// Toggle a bookmark's pin state
pub async fn pin<T: Transport>(
    store: &mut BookmarkStore<T>,
    id: String,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    let id = resolve_id(store, &id)?;

    store.toggle_pin(&id).await?;

    let bookmark = store
        .get(&id)
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;
    if bookmark.is_pinned {
        output.success(&format!("Pinned: {}", bookmark.title));
    } else {
        output.success(&format!("Unpinned: {}", bookmark.title));
    }
    Ok(())
}

/// Toggle a bookmark's archive state
pub async fn archive<T: Transport>(
    store: &mut BookmarkStore<T>,
    id: String,
    _output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    let id = resolve_id(store, &id)?;

    // The store emits the "archived and unpinned" / "restored" notice.
    store.toggle_archive(&id).await?;
    Ok(())
}

/// Open a bookmark in the system browser, recording the visit
pub async fn open_bookmark<T: Transport>(
    store: &mut BookmarkStore<T>,
    id: String,
    output: &Output,
) -> Result<()> {
    store.load_bookmarks().await?;
    let id = resolve_id(store, &id)?;

    let url = store
        .get(&id)
        .map(|b| b.url.clone())
        .ok_or_else(|| anyhow::anyhow!("Bookmark not found: {}", id))?;

    // A failed view-count update must not block opening the link; the
    // optimistic local bump is kept either way.
    if let Err(e) = store.increment_view_count(&id).await {
        tracing::warn!("Could not record visit for {}: {}", id, e);
    }

    open::that(&url).with_context(|| format!("Failed to open {}", url))?;
    output.success(&format!("Opened {}", url));
    Ok(())
}

/// Resolve a bookmark id (supports full id or unique prefix)
fn resolve_id<T: Transport>(store: &BookmarkStore<T>, id: &str) -> Result<String> {
    if store.get(id).is_some() {
        return Ok(id.to_string());
    }

    let matches: Vec<_> = store
        .bookmarks()
        .iter()
        .filter(|b| b.id.starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No bookmark found matching: {}", id),
        1 => Ok(matches[0].id.clone()),
        _ => {
            eprintln!("Multiple bookmarks match '{}':", id);
            for bookmark in &matches {
                eprintln!("  {} - {}", bookmark.id, bookmark.title);
            }
            bail!("Ambiguous id. Please provide more characters.");
        }
    }
}
