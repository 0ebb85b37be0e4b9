//! Replay command - Step a saved policy through one game

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    app::App,
    cli::{
        config::StartArgs,
        output::{print_kv, print_section},
    },
    pipeline::{Autopilot, AutopilotPhase, AutopilotStop},
    ports::Environment,
};

#[derive(Parser, Debug)]
#[command(about = "Replay a saved policy move by move")]
pub struct ReplayArgs {
    /// Path to the policy file
    pub policy: PathBuf,

    /// Start from this state string instead of a random one
    #[arg(long)]
    pub state: Option<String>,

    /// Board levels (defaults to the levels stored with the policy)
    #[arg(long, short = 'l')]
    pub levels: Option<usize>,

    /// Random seed for the starting position
    #[arg(long)]
    pub seed: Option<u64>,

    /// How the game starts when no state is given
    #[command(flatten)]
    pub start: StartArgs,
}

pub fn execute(args: ReplayArgs) -> Result<()> {
    let app = App::for_policy_path(&args.policy);
    let record = app
        .load_policy(&args.policy)
        .with_context(|| format!("Failed to load policy {}", args.policy.display()))?;

    let levels = args.levels.unwrap_or(record.metadata.levels);
    let mut env = app.create_environment(&args.start.board_config(levels))?;
    match &args.state {
        Some(state) => env
            .load_state(state)
            .with_context(|| format!("Invalid starting state '{state}'"))?,
        None => {
            let mut rng = match args.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_rng(&mut rand::rng()),
            };
            env.reset(&mut rng)?;
        }
    }

    print_section("Replay");
    print_kv("Policy states", &record.policy.len().to_string());
    print_kv("Start", env.current_state().as_str());
    println!();

    let autopilot = Autopilot::new(&record.policy);
    let mut phase = AutopilotPhase::SelectSource;
    let mut moves = 0;
    let stop = loop {
        let next = autopilot.step(&mut env, phase)?;
        match next {
            AutopilotPhase::Move { action } => {
                println!("  {}  select {}", env.current_state(), action.source);
            }
            AutopilotPhase::SelectSource => {
                if let AutopilotPhase::Move { action } = phase {
                    moves += 1;
                    println!("  {}  jump   {action} (move {moves})", env.current_state());
                }
            }
            AutopilotPhase::Finished(stop) => break stop,
        }
        phase = next;
    };

    println!();
    let outcome = match stop {
        AutopilotStop::Solved => "solved",
        AutopilotStop::Stuck => "stuck",
        AutopilotStop::Unmapped => "state not covered by the policy",
        AutopilotStop::Rejected => "policy action rejected",
    };
    print_kv("Outcome", outcome);
    print_kv("Moves", &moves.to_string());
    print_kv("Final", env.current_state().as_str());
    print_kv("Pegs left", &env.current_state().occupied_count().to_string());

    Ok(())
}
