//! Evaluate command - Play matches with a saved greedy policy

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::{App, BoardConfig},
    cli::{
        config::StartArgs,
        output::{format_number, format_percent, print_kv, print_section},
    },
    peg::board::checked_place_count,
    pipeline::{EvaluationConfig, EvaluationResult, Evaluator},
    policy::RunMetadata,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a saved policy")]
pub struct EvaluateArgs {
    /// Path to the policy file
    pub policy: PathBuf,

    /// Number of evaluation matches
    #[arg(long, short = 'm', default_value_t = 1000)]
    pub matches: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Board levels (defaults to the levels stored with the policy)
    #[arg(long, short = 'l')]
    pub levels: Option<usize>,

    /// Confidence level of the reported interval
    #[arg(long, default_value_t = 0.95)]
    pub confidence: f64,

    /// How matches start
    #[command(flatten)]
    pub start: StartArgs,

    /// Export results to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EvaluationExport<'a> {
    policy: String,
    policy_states: usize,
    trained: &'a RunMetadata,
    board: BoardConfig,
    seed: Option<u64>,
    result: &'a EvaluationResult,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    println!("Loading policy from: {}", args.policy.display());
    let app = App::for_policy_path(&args.policy);
    let record = app
        .load_policy(&args.policy)
        .with_context(|| format!("Failed to load policy {}", args.policy.display()))?;

    let levels = args.levels.unwrap_or(record.metadata.levels);
    let expected = checked_place_count(levels)
        .with_context(|| format!("Cannot evaluate on a {levels}-level board"))?;
    if let Some((state, _)) = record.policy.iter().find(|(s, _)| s.len() != expected) {
        bail!(
            "policy state '{state}' has {} places but a {levels}-level board has {expected}",
            state.len()
        );
    }

    print_section("Loaded Policy");
    print_kv("States", &format_number(record.policy.len()));
    print_kv("Levels", &record.metadata.levels.to_string());
    print_kv("Trained episodes", &format_number(record.metadata.episodes));
    print_kv(
        "Recorded success",
        &format!(
            "{} over {} matches",
            format_percent(record.metadata.success_rate),
            format_number(record.metadata.matches)
        ),
    );

    let board = args.start.board_config(levels);
    let mut env = app.create_environment(&board)?;
    let config = EvaluationConfig::default()
        .with_matches(args.matches)
        .with_seed(args.seed)
        .with_confidence_level(args.confidence);
    let result = Evaluator::new(config).run(&mut env, &record.policy)?;

    print_section("Evaluation");
    print_kv("Matches", &format_number(result.matches));
    print_kv("Solved", &format_number(result.solved));
    print_kv("Stuck", &format_number(result.stuck));
    print_kv("Unmapped", &format_number(result.unmapped));
    if result.rejected > 0 {
        print_kv("Rejected", &format_number(result.rejected));
    }
    print_kv("Rate of success", &format_percent(result.success_rate));
    let (low, high) = result.confidence_interval;
    print_kv(
        &format!("{:.0}% CI", result.confidence_level * 100.0),
        &format!("[{}, {}]", format_percent(low), format_percent(high)),
    );

    if let Some(path) = &args.export {
        let file = File::create(path)
            .with_context(|| format!("Failed to create export file {}", path.display()))?;
        to_writer_pretty(
            file,
            &EvaluationExport {
                policy: args.policy.display().to_string(),
                policy_states: record.policy.len(),
                trained: &record.metadata,
                board,
                seed: args.seed,
                result: &result,
            },
        )
        .context("Failed to write evaluation export")?;
        println!("\nResults exported to {}", path.display());
    }

    Ok(())
}
