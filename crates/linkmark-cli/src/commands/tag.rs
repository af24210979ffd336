//! Tag command handlers

use anyhow::Result;

use linkmark_core::{BookmarkStore, Transport};

use crate::output::Output;

/// List tags with usage counts
///
/// By default counts are derived from the loaded collection; `--remote`
/// asks the bookmark service instead.
pub async fn list<T: Transport>(
    store: &mut BookmarkStore<T>,
    remote: bool,
    output: &Output,
) -> Result<()> {
    let tags = if remote {
        store.remote_tags().await?
    } else {
        store.load_bookmarks().await?;
        store.tags_with_count()
    };

    output.print_tags(&tags);
    Ok(())
}
