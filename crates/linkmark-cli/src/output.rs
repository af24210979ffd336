//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use linkmark_core::{Bookmark, NoticeLevel, Tag};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single bookmark in full
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", bookmark.id);
                println!("Title:       {}", bookmark.title);
                println!("URL:         {}", bookmark.url);
                if !bookmark.description.is_empty() {
                    println!("Description: {}", bookmark.description);
                }
                if !bookmark.tags.is_empty() {
                    let names: Vec<&str> =
                        bookmark.tags.iter().map(|t| t.name.as_str()).collect();
                    println!("Tags:        {}", names.join(", "));
                }
                println!(
                    "Pinned:      {}",
                    if bookmark.is_pinned { "yes" } else { "no" }
                );
                println!(
                    "Archived:    {}",
                    if bookmark.is_archived { "yes" } else { "no" }
                );
                println!("Views:       {}", bookmark.view_count);
                if let Some(visited) = bookmark.last_visited {
                    println!("Visited:     {}", visited.format("%Y-%m-%d %H:%M"));
                }
                println!("Added:       {}", bookmark.date_added.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(bookmark).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", bookmark.id);
            }
        }
    }

    /// Print a list of bookmarks, one line each
    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    let mut markers = String::new();
                    if bookmark.is_pinned {
                        markers.push('*');
                    }
                    if bookmark.is_archived {
                        markers.push('A');
                    }
                    println!(
                        "{:<10} {:>2} | {} | {}",
                        short_id(&bookmark.id),
                        markers,
                        truncate(&bookmark.title, 35),
                        truncate(&bookmark.url, 45)
                    );
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(bookmarks).unwrap());
            }
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print a list of tags with counts
    pub fn print_tags(&self, tags: &[Tag]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for tag in tags {
                    match tag.count {
                        Some(count) => println!("{} ({})", tag.name, count),
                        None => println!("{}", tag.name),
                    }
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(tags).unwrap());
            }
            OutputFormat::Quiet => {
                for tag in tags {
                    println!("{}", tag.name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a store notice (the app's toasts)
    pub fn notice(&self, level: NoticeLevel, message: &str) {
        match self.format {
            OutputFormat::Human => match level {
                NoticeLevel::Success => println!("✓ {}", message),
                NoticeLevel::Info => println!("{}", message),
                NoticeLevel::Error => eprintln!("✗ {}", message),
            },
            OutputFormat::Json => {
                let level = match level {
                    NoticeLevel::Success => "success",
                    NoticeLevel::Info => "info",
                    NoticeLevel::Error => "error",
                };
                println!("{}", serde_json::json!({"level": level, "message": message}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// First characters of an opaque id, for compact listings
fn short_id(id: &str) -> &str {
    let end = id
        .char_indices()
        .nth(10)
        .map(|(i, _)| i)
        .unwrap_or(id.len());
    &id[..end]
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
