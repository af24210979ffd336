//! Status command handler

use anyhow::Result;

use linkmark_core::{BookmarkStore, Config, HttpTransport, Session};

use crate::output::{Output, OutputFormat};

/// Show status: API endpoint, session, and collection counts
pub async fn show(config: &Config, session: &Session, output: &Output) -> Result<()> {
    let user = session.current_user()?;

    // Counts are best-effort; an unreachable service still produces status
    let counts = match &user {
        Some(_) => match HttpTransport::new(config, session) {
            Ok(transport) => {
                let mut store = BookmarkStore::new(transport);
                match store.load_bookmarks().await {
                    Ok(()) => {
                        let archived =
                            store.bookmarks().iter().filter(|b| b.is_archived).count();
                        Some((store.bookmarks().len(), store.pinned_count(), archived))
                    }
                    Err(_) => None,
                }
            }
            Err(_) => None,
        },
        None => None,
    };

    match output.format {
        OutputFormat::Json => {
            let counts_json = counts.map(|(total, pinned, archived)| {
                serde_json::json!({
                    "bookmarks": total,
                    "pinned": pinned,
                    "archived": archived
                })
            });
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "data_dir": config.data_dir,
                    "user_id": user,
                    "counts": counts_json
                })
            );
        }
        OutputFormat::Quiet => {
            if let Some(user) = user {
                println!("{}", user);
            }
        }
        OutputFormat::Human => {
            println!("Linkmark Status");
            println!("===============");
            println!();
            println!("Service:");
            println!("  API: {}", config.api_url);
            println!();
            println!("Session:");
            match user {
                Some(ref user) => println!("  Logged in as: {}", user),
                None => println!("  Not logged in"),
            }
            println!("  File: {}", session.session_path().display());
            println!();
            match counts {
                Some((total, pinned, archived)) => {
                    println!("Bookmarks:");
                    println!("  Total:    {}", total);
                    println!("  Pinned:   {}", pinned);
                    println!("  Archived: {}", archived);
                }
                None => {
                    println!("Bookmarks: (unavailable)");
                }
            }
        }
    }

    Ok(())
}
