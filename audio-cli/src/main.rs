//! AudIO CLI - Command-line front end for an EPUB library

mod commands;

use anyhow::Result;
use audio_core::{Library, LibraryConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "audio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Library root directory (defaults to $AUDIO_LIBRARY_PATH or ./audio_data)
    #[arg(long, global = true)]
    library: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the books in the library
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import an EPUB file into the library
    Import {
        /// EPUB file to import
        input: PathBuf,

        /// Store under a numbered name if the file name is taken
        #[arg(long)]
        allow_duplicates: bool,
    },

    /// Set or clear a book's custom title
    Rename {
        /// Book id
        id: Uuid,

        /// New title (empty clears the custom title)
        title: String,
    },

    /// Set a book's cover image
    Cover {
        /// Book id
        id: Uuid,

        /// Image file (PNG, JPEG, GIF or WebP)
        image: PathBuf,
    },

    /// Delete a book, its EPUB file and its cover
    Delete {
        /// Book id
        id: Uuid,
    },

    /// Reconcile the catalog with the files on disk
    Reconcile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "audio_cli=debug,audio_core=debug"
    } else {
        "audio_cli=info,audio_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match cli.library {
        Some(root) => LibraryConfig::new(root),
        None => LibraryConfig::from_env(),
    };
    tracing::debug!(root = %config.root().display(), "Opening library");
    let mut library = Library::open(config);

    match cli.command {
        Commands::List { json } => commands::list(&library, json),

        Commands::Import {
            input,
            allow_duplicates,
        } => commands::import(&mut library, &input, allow_duplicates),

        Commands::Rename { id, title } => commands::rename(&mut library, id, &title),

        Commands::Cover { id, image } => commands::cover(&mut library, id, &image),

        Commands::Delete { id } => commands::delete(&mut library, id),

        Commands::Reconcile { json } => commands::reconcile(&library, json),
    }
}
