//! Main entry point for the Content Explorer CLI.

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::ClientConfig;
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

mod commands;

use commands::{AppContext, history::HistoryArg};

/// Content Explorer CLI
#[derive(Parser)]
#[command(name = "explorer")]
#[command(about = "Command-line client for the AI Content Explorer", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., config.yaml or config.json). If not provided, defaults will be used."
    )]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the Content Explorer CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session locally
    Login {
        /// Account email; prompted for when omitted
        #[arg(long, short)]
        email: Option<String>,

        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Create an account
    Register {
        /// Account email; prompted for when omitted
        #[arg(long, short)]
        email: Option<String>,

        /// Read the password from the first line of stdin instead of prompting
        #[arg(long)]
        password_stdin: bool,
    },
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// Run a search
    Search {
        /// Text to search for
        query: String,
    },
    /// Generate an image from a prompt
    Image {
        /// Description of the image
        prompt: String,
    },
    /// List search or image history
    History {
        /// Which history to list
        #[arg(value_enum)]
        kind: HistoryArg,

        /// Write the list as CSV to this file instead of printing it
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Delete one history entry
    Delete {
        /// Which history the entry belongs to
        #[arg(value_enum)]
        kind: HistoryArg,

        /// Identifier of the entry
        id: i64,
    },
    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },
}

fn initialize_tracing(level: &str) {
    let default_level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::INFO);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::builder()
            .with_default_directive(default_level.into())
            .from_env_lossy()
    });

    fmt::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Completion { shell } = cli.command {
        commands::completion::generate_completion(shell);
        return Ok(());
    }

    let config = ClientConfig::load_config(cli.config)?;
    initialize_tracing(&config.log_level);

    let context = AppContext::open(&config);
    let mut signals = context.gateway.subscribe();

    let result = match cli.command {
        Commands::Login {
            email,
            password_stdin,
        } => commands::session::login(&context, email, password_stdin).await,
        Commands::Register {
            email,
            password_stdin,
        } => commands::session::register(&context, email, password_stdin).await,
        Commands::Logout => commands::session::logout(&context),
        Commands::Whoami => commands::session::whoami(&context),
        Commands::Search { query } => commands::search::search(&context, &query).await,
        Commands::Image { prompt } => commands::search::image(&context, &prompt).await,
        Commands::History { kind, export } => {
            commands::history::list(&context, kind.into(), export.as_deref()).await
        }
        Commands::Delete { kind, id } => commands::history::delete(&context, kind.into(), id).await,
        Commands::Completion { .. } => Ok(()),
    };

    commands::report_signals(&mut signals);
    result
}
