//! Stash CLI
//!
//! Command-line interface for Stash - todos, notes, documents and
//! bookmarks kept per user in a local database.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stash_core::{Config, StorageError, Store, WebsitePatch};

mod commands;
mod editor;
mod output;

use output::{Output, OutputFormat};

/// Category given to records when none is specified
const DEFAULT_CATEGORY: &str = "general";

#[derive(Parser)]
#[command(name = "stash")]
#[command(about = "Stash - todos, notes, documents and bookmarks in one local store")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Accounts and sign-in
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage todos
    Todo {
        #[command(subcommand)]
        command: TodoCommands,
    },
    /// Manage markdown notes
    Note {
        #[command(subcommand)]
        command: NoteCommands,
    },
    /// Manage document folders
    Folder {
        #[command(subcommand)]
        command: FolderCommands,
    },
    /// Manage documents
    Doc {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Manage bookmarked websites
    Site {
        #[command(subcommand)]
        command: SiteCommands,
    },
    /// Show a summary of your data
    Stats,
    /// Delete all records of the signed-in user
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Create an account
    Register {
        username: String,
        email: String,
        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign in
    Login {
        username: String,
        /// Password (prompted for if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List registered users
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
enum TodoCommands {
    /// Create a todo
    #[command(alias = "create")]
    Add {
        title: String,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// List todos
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
        /// Only todos not yet done
        #[arg(long, conflicts_with = "done")]
        pending: bool,
        /// Only completed todos
        #[arg(long)]
        done: bool,
    },
    /// Show todo details
    Show {
        /// Todo ID (full or trailing digits)
        id: String,
    },
    /// Edit a todo (interactive when no flag is given)
    Edit {
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// New description; an empty value clears it
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Mark a todo as done
    Done { id: String },
    /// Mark a todo as not done
    Undo { id: String },
    /// Delete a todo
    #[command(alias = "delete")]
    Rm { id: String },
    /// List todo categories
    Categories,
}

#[derive(Subcommand)]
enum NoteCommands {
    /// Create a note
    #[command(alias = "create")]
    Add {
        title: String,
        /// Markdown body (opens editor if not provided)
        #[arg(short, long)]
        body: Option<String>,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        /// Comma-separated tags
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// List notes
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        tag: Option<String>,
    },
    /// Show a note
    Show { id: String },
    /// Edit a note (opens editor when no flag is given)
    Edit {
        id: String,
        #[arg(short = 'T', long)]
        title: Option<String>,
        #[arg(short, long)]
        body: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Delete a note
    #[command(alias = "delete")]
    Rm { id: String },
    /// List note categories
    Categories,
}

#[derive(Subcommand)]
enum FolderCommands {
    /// Create a folder
    #[command(alias = "add")]
    Create {
        name: String,
        /// Parent folder ID (root if omitted)
        #[arg(short, long)]
        parent: Option<String>,
    },
    /// Show the folder hierarchy
    Tree,
    /// Rename a folder
    Rename { id: String, name: String },
    /// Move a folder under another folder
    Move {
        id: String,
        /// New parent folder ID (root if omitted)
        parent: Option<String>,
    },
    /// Delete a folder and its direct subfolders
    #[command(alias = "delete")]
    Rm { id: String },
}

#[derive(Subcommand)]
enum DocCommands {
    /// Upload a file
    #[command(alias = "add")]
    Upload {
        path: PathBuf,
        /// Folder ID to file the document in
        #[arg(short, long)]
        folder: Option<String>,
        /// Category (defaults to the file type)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List documents
    #[command(alias = "ls")]
    List {
        /// Only documents in this folder
        #[arg(short, long, conflicts_with = "root")]
        folder: Option<String>,
        /// Only documents not filed in any folder
        #[arg(long)]
        root: bool,
    },
    /// Show document details and preview
    Show { id: String },
    /// Move a document to a folder
    Move {
        id: String,
        /// Target folder ID (root if omitted)
        folder: Option<String>,
    },
    /// Delete a document
    #[command(alias = "delete")]
    Rm { id: String },
    /// Write a document's file back to disk
    Export {
        id: String,
        /// Destination path (defaults to the document name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Search documents by name
    Search { query: String },
}

#[derive(Subcommand)]
enum SiteCommands {
    /// Bookmark a website
    #[command(alias = "create")]
    Add {
        name: String,
        url: String,
        #[arg(short, long, default_value = DEFAULT_CATEGORY)]
        category: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Icon URL (defaults to the site's favicon)
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// List websites in display order
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Edit a website
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        url: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// New description; an empty value clears it
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        icon: Option<String>,
    },
    /// Move a website to a position (0 is first)
    Move { id: String, position: usize },
    /// Set the display order from a comma-separated list of IDs
    Reorder { ids: String },
    /// Delete a website
    #[command(alias = "delete")]
    Rm { id: String },
    /// Open a website in the browser
    Open { id: String },
    /// List website categories
    Categories,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, log_level, log_file)
        key: String,
        /// Configuration value ("none" unsets optional keys)
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    if let Err(e) = run(cli, &output) {
        eprintln!("Error: {:#}", e);
        if let Some(hint) = e
            .downcast_ref::<StorageError>()
            .and_then(StorageError::recovery_suggestion)
        {
            eprintln!("Hint: {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, output: &Output) -> Result<()> {
    // Config commands work even when the store cannot be opened
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), output);
    }

    let config = Config::load().context("Failed to load configuration")?;
    init_logging(&config);

    let mut store = Store::open_with_config(config)?;

    match cli.command {
        Commands::User { command } => handle_user_command(command, &mut store, output),
        Commands::Todo { command } => handle_todo_command(command, &store, output),
        Commands::Note { command } => handle_note_command(command, &store, output),
        Commands::Folder { command } => handle_folder_command(command, &store, output),
        Commands::Doc { command } => handle_doc_command(command, &store, output),
        Commands::Site { command } => handle_site_command(command, &store, output),
        Commands::Stats => commands::stats::show(&store, output),
        Commands::Clear { yes } => commands::stats::clear(&store, yes, output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Install the tracing subscriber
///
/// Logs go to `log_file` when configured, otherwise to stderr, filtered by
/// `log_level` for the stash crates.
fn init_logging(config: &Config) {
    let level = config.log_level();
    let filter = EnvFilter::new(format!("stash_core={},stash_cli={}", level, level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let file = config.log_file.as_deref().and_then(open_log_file);

    let _ = match file {
        Some(file) => builder.with_ansi(false).with_writer(Mutex::new(file)).try_init(),
        None => builder.with_writer(std::io::stderr).try_init(),
    };
}

/// Open the log file for appending; on failure warn and log to stderr instead
fn open_log_file(path: &Path) -> Option<File> {
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Could not create log file {:?}: {}", path, e);
            None
        }
    }
}

fn handle_user_command(command: UserCommands, store: &mut Store, output: &Output) -> Result<()> {
    match command {
        UserCommands::Register {
            username,
            email,
            password,
        } => commands::user::register(store, username, email, password, output),
        UserCommands::Login { username, password } => {
            commands::user::login(store, username, password, output)
        }
        UserCommands::Logout => commands::user::logout(store, output),
        UserCommands::Whoami => commands::user::whoami(store, output),
        UserCommands::List => commands::user::list(store, output),
    }
}

fn handle_todo_command(command: TodoCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        TodoCommands::Add {
            title,
            category,
            description,
        } => commands::todo::add(store, title, category, description, output),
        TodoCommands::List {
            category,
            pending,
            done,
        } => commands::todo::list(store, category, pending, done, output),
        TodoCommands::Show { id } => commands::todo::show(store, id, output),
        TodoCommands::Edit {
            id,
            title,
            category,
            description,
        } => commands::todo::edit(store, id, title, category, description, output),
        TodoCommands::Done { id } => commands::todo::set_completed(store, id, true, output),
        TodoCommands::Undo { id } => commands::todo::set_completed(store, id, false, output),
        TodoCommands::Rm { id } => commands::todo::delete(store, id, output),
        TodoCommands::Categories => commands::todo::categories(store, output),
    }
}

fn handle_note_command(command: NoteCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        NoteCommands::Add {
            title,
            body,
            category,
            tags,
        } => commands::note::add(store, title, body, category, tags, output),
        NoteCommands::List { category, tag } => commands::note::list(store, category, tag, output),
        NoteCommands::Show { id } => commands::note::show(store, id, output),
        NoteCommands::Edit {
            id,
            title,
            body,
            category,
            tags,
        } => commands::note::edit(store, id, title, body, category, tags, output),
        NoteCommands::Rm { id } => commands::note::delete(store, id, output),
        NoteCommands::Categories => commands::note::categories(store, output),
    }
}

fn handle_folder_command(command: FolderCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        FolderCommands::Create { name, parent } => {
            commands::folder::create(store, name, parent, output)
        }
        FolderCommands::Tree => commands::folder::tree(store, output),
        FolderCommands::Rename { id, name } => commands::folder::rename(store, id, name, output),
        FolderCommands::Move { id, parent } => commands::folder::move_to(store, id, parent, output),
        FolderCommands::Rm { id } => commands::folder::delete(store, id, output),
    }
}

fn handle_doc_command(command: DocCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        DocCommands::Upload {
            path,
            folder,
            category,
        } => commands::doc::upload(store, path, folder, category, output),
        DocCommands::List { folder, root } => commands::doc::list(store, folder, root, output),
        DocCommands::Show { id } => commands::doc::show(store, id, output),
        DocCommands::Move { id, folder } => commands::doc::move_to(store, id, folder, output),
        DocCommands::Rm { id } => commands::doc::delete(store, id, output),
        DocCommands::Export { id, output: dest } => {
            commands::doc::export(store, id, dest, output)
        }
        DocCommands::Search { query } => commands::doc::search(store, query, output),
    }
}

fn handle_site_command(command: SiteCommands, store: &Store, output: &Output) -> Result<()> {
    match command {
        SiteCommands::Add {
            name,
            url,
            category,
            description,
            icon,
        } => commands::site::add(store, name, url, category, description, icon, output),
        SiteCommands::List { category } => commands::site::list(store, category, output),
        SiteCommands::Edit {
            id,
            name,
            url,
            category,
            description,
            icon,
        } => {
            let patch = WebsitePatch {
                name,
                url,
                icon,
                category,
                description: description.map(|d| if d.is_empty() { None } else { Some(d) }),
                position: None,
            };
            commands::site::edit(store, id, patch, output)
        }
        SiteCommands::Move { id, position } => {
            commands::site::move_to(store, id, position, output)
        }
        SiteCommands::Reorder { ids } => commands::site::reorder(store, ids, output),
        SiteCommands::Rm { id } => commands::site::delete(store, id, output),
        SiteCommands::Open { id } => commands::site::open(store, id, output),
        SiteCommands::Categories => commands::site::categories(store, output),
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}
