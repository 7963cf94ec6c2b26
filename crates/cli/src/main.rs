//! MetalAgent CLI, the main entry point.
//!
//! Commands:
//! - `chat`    Interactive chat or single-message mode
//! - `serve`   Start the HTTP gateway with the web UI
//! - `menu`    Print the genre menu the agent sees
//! - `recent`  Print recent releases for some genres
//! - `lookup`  Find the album id and embed for one album
//! - `parse`   Extract recommendations from bullet text
//! - `doctor`  Check config, API key, and data files
//! - `init`    Write a default config file

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "metalagent",
    about = "MetalAgent: recent metal release recommendations",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.metalagent/config.toml)
    #[arg(short, long, global = true, env = "METALAGENT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with MetalAgent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Start the HTTP gateway and web UI
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the genre menu and newest releases in a genre
    Menu {
        /// Genre substring; omit to list every genre
        genre: Option<String>,
    },

    /// Print releases from the recent window in any of the given genres
    Recent {
        /// Comma-separated genres, e.g. "black metal, doom"
        genres: String,

        /// End of the window (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Look up an album's streaming id and embed markup
    Lookup { artist: String, album: String },

    /// Extract recommendations from bullet text (file or stdin)
    Parse { file: Option<PathBuf> },

    /// Check config, API key, and data files
    Doctor,

    /// Write a default config file if none exists
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Chat { message } => commands::chat::run(config, message).await?,
        Commands::Serve { port } => commands::serve::run(config, port).await?,
        Commands::Menu { genre } => commands::catalog::menu(config, genre.as_deref())?,
        Commands::Recent { genres, date } => commands::catalog::recent(config, &genres, date)?,
        Commands::Lookup { artist, album } => commands::catalog::lookup(config, &artist, &album)?,
        Commands::Parse { file } => commands::catalog::parse(config, file.as_deref())?,
        Commands::Doctor => commands::doctor::run(config)?,
        Commands::Init => commands::init::run(config)?,
    }

    Ok(())
}
