//! qttt CLI - train, play and evaluate tic-tac-toe agents
//!
//! This CLI provides a unified interface for:
//! - Training the Q-learning agent against a random or minimax opponent
//! - Playing games between humans, random, minimax and Q-learning players
//! - Evaluating a saved value table

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qttt")]
#[command(version, about = "Tic-tac-toe with minimax and Q-learning agents", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the Q-learning agent
    Train(Box<qttt::cli::commands::train::TrainArgs>),

    /// Play games on the terminal
    Play(qttt::cli::commands::play::PlayArgs),

    /// Evaluate a trained value table
    Evaluate(qttt::cli::commands::evaluate::EvaluateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("qttt={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Train(args) => qttt::cli::commands::train::execute(*args),
        Commands::Play(args) => qttt::cli::commands::play::execute(args),
        Commands::Evaluate(args) => qttt::cli::commands::evaluate::execute(args),
    }
}
