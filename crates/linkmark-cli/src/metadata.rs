//! URL metadata fetching
//!
//! Fetches page title and description when creating bookmarks, so `add`
//! can pre-fill fields the way the web UI does.

use anyhow::Result;
use scraper::{Html, Selector};
use std::time::Duration;

/// Metadata extracted from a URL
#[derive(Debug, Clone, Default)]
pub struct UrlMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Fetch metadata from a URL (async)
///
/// Returns empty metadata on failure (graceful degradation).
pub async fn fetch_metadata(url: &str) -> UrlMetadata {
    fetch_metadata_inner(url).await.unwrap_or_default()
}

async fn fetch_metadata_inner(url: &str) -> Result<UrlMetadata> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT))
        .user_agent("Mozilla/5.0 (compatible; linkmark/0.1)")
        .build()?;

    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Ok(UrlMetadata::default());
    }

    let html = response.text().await?;
    Ok(parse_metadata(&html))
}

/// Parse title and description from HTML content
fn parse_metadata(html: &str) -> UrlMetadata {
    let document = Html::parse_document(html);

    let title = meta_content(&document, "og:title").or_else(|| {
        let selector = Selector::parse("title").ok()?;
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    });

    let description = meta_content(&document, "og:description").or_else(|| {
        let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    });

    UrlMetadata { title, description }
}

/// Extract content from a meta tag by property or name attribute
fn meta_content(document: &Html, property: &str) -> Option<String> {
    for attr in ["property", "name"] {
        let selector = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, property)).ok()?;
        if let Some(content) = document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            let content = content.trim();
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }
    None
}
