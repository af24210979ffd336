//! Linkmark CLI
//!
//! Command-line interface for linkmark - bookmark management against a
//! remote bookmark service.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use linkmark_core::{
    BookmarkStore, Config, HttpTransport, NoticeLevel, Session, StoreError, StoreEvent,
};

mod commands;
mod editor;
mod metadata;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "linkmark")]
#[command(about = "Linkmark - save, organize, and open bookmarks from the terminal")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Save a new bookmark
    #[command(alias = "create")]
    Add {
        /// URL to save
        url: String,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Title (fetched from the page when omitted)
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Description (fetched from the page when omitted)
        #[arg(short, long)]
        description: Option<String>,
        /// Skip fetching page metadata
        #[arg(long)]
        no_fetch: bool,
    },
    /// List bookmarks
    #[command(alias = "ls")]
    List {
        /// Filter by tag (repeatable)
        #[arg(short, long)]
        tag: Vec<String>,
        /// Show archived bookmarks instead of active ones
        #[arg(short, long)]
        archived: bool,
        /// Filter by free-text search
        #[arg(short, long)]
        search: Option<String>,
        /// Sort mode: recently_added, recently_visited, most_visited
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show bookmark details
    Show {
        /// Bookmark id (full id or prefix)
        id: String,
    },
    /// Edit a bookmark
    Edit {
        /// Bookmark id (full id or prefix)
        id: String,
    },
    /// Delete a bookmark
    #[command(alias = "rm")]
    Delete {
        /// Bookmark id (full id or prefix)
        id: String,
    },
    /// Search bookmarks
    Search {
        /// Search query
        query: String,
    },
    /// Toggle a bookmark's pin state (at most 5 pinned)
    Pin {
        /// Bookmark id (full id or prefix)
        id: String,
    },
    /// Toggle a bookmark's archive state
    Archive {
        /// Bookmark id (full id or prefix)
        id: String,
    },
    /// Open a bookmark in the browser and record the visit
    Open {
        /// Bookmark id (full id or prefix)
        id: String,
    },
    /// List tags with usage counts
    Tags {
        /// Ask the bookmark service instead of counting locally
        #[arg(long)]
        remote: bool,
    },
    /// Log in with the user id the bookmark service knows you by
    Login {
        /// User id (sent as the X-User-Id header)
        user_id: String,
    },
    /// Log out, forgetting the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show service, session, and collection status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, data_dir, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands manage the file directly, no session needed
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())?;
    init_logging(&config);

    let session = Session::with_config(config.clone());

    match cli.command {
        Commands::Config { .. } => unreachable!(), // Handled above
        Commands::Login { user_id } => commands::session::login(&session, user_id, &output),
        Commands::Logout => commands::session::logout(&session, &output),
        Commands::Whoami => commands::session::whoami(&session, &output),
        Commands::Status => commands::status::show(&config, &session, &output).await,
        command => run_store_command(command, &config, &session, &output).await,
    }
}

/// Run a command that operates on the bookmark store
async fn run_store_command(
    command: Commands,
    config: &Config,
    session: &Session,
    output: &Output,
) -> Result<()> {
    let transport = match HttpTransport::new(config, session) {
        Ok(transport) => transport,
        Err(StoreError::NotSignedIn) => {
            anyhow::bail!("You must be logged in. Run `linkmark login <user-id>` first.");
        }
        Err(e) => return Err(e.into()),
    };

    let mut store = BookmarkStore::new(transport);
    let mut events = store.take_events();

    let result = match command {
        Commands::Add {
            url,
            tag,
            title,
            description,
            no_fetch,
        } => commands::bookmark::add(&mut store, url, tag, title, description, no_fetch, output)
            .await,
        Commands::List {
            tag,
            archived,
            search,
            sort,
        } => commands::bookmark::list(&mut store, tag, archived, search, sort, output).await,
        Commands::Show { id } => commands::bookmark::show(&mut store, id, output).await,
        Commands::Edit { id } => commands::bookmark::edit(&mut store, id, output).await,
        Commands::Delete { id } => commands::bookmark::delete(&mut store, id, output).await,
        Commands::Search { query } => commands::bookmark::search(&mut store, query, output).await,
        Commands::Pin { id } => commands::bookmark::pin(&mut store, id, output).await,
        Commands::Archive { id } => commands::bookmark::archive(&mut store, id, output).await,
        Commands::Open { id } => commands::bookmark::open_bookmark(&mut store, id, output).await,
        Commands::Tags { remote } => commands::tag::list(&mut store, remote, output).await,
        _ => unreachable!(), // Handled in main
    };

    if let Some(events) = events.as_mut() {
        drain_notices(events, output);
    }

    result
}

/// Print pending informational store notices (the app's toasts)
///
/// Error-level notices are skipped here; those surface through the
/// command result instead.
fn drain_notices(events: &mut mpsc::UnboundedReceiver<StoreEvent>, output: &Output) {
    while let Ok(event) = events.try_recv() {
        if let StoreEvent::Notice { level, message } = event {
            if level != NoticeLevel::Error {
                output.notice(level, &message);
            }
        }
    }
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}

/// Initialize logging to the configured file, or stderr
///
/// The filter defaults to `warn` and can be overridden with LINKMARK_LOG.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_env("LINKMARK_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    match &config.log_file {
        Some(path) => match std::fs::File::create(path) {
            Ok(log_file) => {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(log_file)
                    .try_init();
            }
            Err(e) => {
                eprintln!("Warning: Could not create log file {:?}: {}", path, e);
            }
        },
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}
