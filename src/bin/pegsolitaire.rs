//! Peg solitaire CLI - Train, evaluate and replay Q-learning policies

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pegsolitaire")]
#[command(version, about = "Q-learning on triangular peg solitaire", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning agent and save its greedy policy
    Train(Box<pegsolitaire::cli::commands::train::TrainArgs>),

    /// Evaluate a saved policy
    Evaluate(pegsolitaire::cli::commands::evaluate::EvaluateArgs),

    /// Replay a saved policy move by move
    Replay(pegsolitaire::cli::commands::replay::ReplayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => pegsolitaire::cli::commands::train::execute(*args),
        Commands::Evaluate(args) => pegsolitaire::cli::commands::evaluate::execute(args),
        Commands::Replay(args) => pegsolitaire::cli::commands::replay::execute(args),
    }
}
