//! recite CLI: interactive sentence drill and bank tooling.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;
mod repl;

#[derive(Parser)]
#[command(name = "recite", version, about = "Korean to English sentence drill")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive drill
    Quiz {
        /// Quiz bank file (defaults to `bank_path` from the config)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Drill the incorrect set instead of the bank
        #[arg(long)]
        review: bool,

        /// Unit filter, e.g. "Tenses > Past"
        #[arg(long)]
        unit: Option<String>,

        /// Keep mastered sentences in the pool
        #[arg(long)]
        include_mastered: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check a quiz bank for authoring mistakes
    Validate {
        /// Quiz bank file
        #[arg(long)]
        bank: PathBuf,
    },

    /// List the units in a quiz bank
    Units {
        /// Quiz bank file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show the incorrect and mastered sets
    Progress {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available grading models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config and a sample quiz bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recite_core=info".parse().unwrap())
                .add_directive("recite_sheets=info".parse().unwrap())
                .add_directive("recite_providers=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Quiz {
            bank,
            review,
            unit,
            include_mastered,
            config,
        } => commands::quiz::execute(bank, review, unit, include_mastered, config).await,
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Units { bank } => commands::units::execute(bank),
        Commands::Progress { config } => commands::progress::execute(config).await,
        Commands::ListModels { provider, config } => commands::list_models::execute(provider, config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
