//! flashdrill CLI — play timed arithmetic drills in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use flashdrill_core::model::{CharacterKind, InputMethod, ProblemSet};

mod commands;

#[derive(Parser)]
#[command(name = "flashdrill", version, about = "Timed arithmetic flashcard drills")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session on stdin
    Play {
        /// Problem set: multiplication, addition, subtraction, mixed
        #[arg(long)]
        mode: Option<ProblemSet>,

        /// Input method: display or voice
        #[arg(long)]
        input: Option<InputMethod>,

        /// Problems in the deck (1-100)
        #[arg(long)]
        deck_size: Option<usize>,

        /// Seed for a reproducible deck
        #[arg(long)]
        seed: Option<u64>,

        /// Write the finished game's result as JSON
        #[arg(long)]
        save_result: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the player profile
    Stats {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create the player's avatar
    Avatar {
        /// Display name (blank means "Player")
        #[arg(long, default_value = "")]
        name: String,

        /// Character: cat, dog, rabbit, bear, fox, owl, panda, tiger, lion, elephant
        #[arg(long, default_value = "cat")]
        kind: CharacterKind,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List problem sets and input methods
    Modes,

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("flashdrill=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            mode,
            input,
            deck_size,
            seed,
            save_result,
            config,
        } => {
            commands::play::execute(commands::play::PlayArgs {
                mode,
                input,
                deck_size,
                seed,
                save_result,
                config,
            })
            .await
        }
        Commands::Stats { config } => commands::stats::execute(config),
        Commands::Avatar { name, kind, config } => commands::avatar::execute(name, kind, config),
        Commands::Modes => commands::modes::execute(),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
