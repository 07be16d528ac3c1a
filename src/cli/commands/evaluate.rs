//! Evaluate command - Play the greedy policy of a saved value table

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::JsonFileRepository,
    cli::{
        config::{OpponentArg, SymbolArg},
        output::{percent, print_kv, print_section},
    },
    config::QLearningConfig,
    pipeline::{EvaluationResult, OpponentKind, evaluate},
    q_learning::QLearningAgent,
    tictactoe::Player,
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a trained value table")]
pub struct EvaluateArgs {
    /// Opponent to evaluate against
    #[arg(long, short = 'o', value_enum, default_value = "minimax")]
    pub opponent: OpponentArg,

    /// Mark the evaluated agent plays
    #[arg(long, short = 's', value_enum, ignore_case = true, default_value = "x")]
    pub symbol: SymbolArg,

    /// Number of evaluation games
    #[arg(long, short = 'g', default_value_t = 100)]
    pub games: usize,

    /// Value table to evaluate
    #[arg(long, default_value = "q_table.json")]
    pub q_table: PathBuf,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let result = run(&args)?;

    print_section("Evaluation Results");
    print_kv("Games", &result.games.to_string());
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, percent(result.wins, result.games)),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", result.draws, percent(result.draws, result.games)),
    );
    print_kv(
        "Losses",
        &format!("{} ({:.1}%)", result.losses, percent(result.losses, result.games)),
    );
    print_kv("Not lost", &format!("{:.1}%", result.non_loss_rate() * 100.0));
    Ok(())
}

/// Evaluate and return the counts without printing them.
pub fn run(args: &EvaluateArgs) -> Result<EvaluationResult> {
    let repository = JsonFileRepository::new();
    let mut agent = QLearningAgent::load(QLearningConfig::default(), &repository, &args.q_table);
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }

    let opponent_kind = OpponentKind::from(args.opponent);
    let mut opponent = opponent_kind.build(args.seed.map(|s| s.wrapping_add(1)));
    let agent_player = Player::from(args.symbol);

    print_section("Evaluation");
    print_kv("Value table", &args.q_table.display().to_string());
    print_kv("Known states", &agent.q_table().state_count().to_string());
    print_kv("Opponent", &opponent_kind.to_string());
    print_kv("Agent plays", &agent_player.to_string());

    evaluate(&agent, opponent.as_mut(), agent_player, args.games).context("Evaluation failed")
}
