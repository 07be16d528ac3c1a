//! Play command - Watch or play games between any two agents

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::JsonFileRepository,
    cli::{
        config::AgentArg,
        output::{BoardPrinter, describe_outcome, print_kv, print_section},
    },
    pipeline::{AgentKind, play_match},
    ports::{Agent, Observer, ValueTableRepository},
    q_learning::QTable,
    tictactoe::{GameOutcome, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Play games on the terminal")]
pub struct PlayArgs {
    /// Who plays X (moves first)
    #[arg(long, value_enum, default_value = "human")]
    pub x: AgentArg,

    /// Who plays O
    #[arg(long, value_enum, default_value = "minimax")]
    pub o: AgentArg,

    /// Value table for Q-learning players
    #[arg(long, default_value = "q_table.json")]
    pub q_table: PathBuf,

    /// Number of games
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Tally across games
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub x: usize,
    pub o: usize,
    pub draws: usize,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let score = run(&args)?;

    print_section("Score");
    print_kv("X", &score.x.to_string());
    print_kv("O", &score.o.to_string());
    print_kv("Draws", &score.draws.to_string());
    Ok(())
}

pub fn run(args: &PlayArgs) -> Result<Score> {
    let table = if args.x == AgentArg::QLearning || args.o == AgentArg::QLearning {
        JsonFileRepository::new().load(&args.q_table)
    } else {
        QTable::new()
    };

    let mut x = AgentKind::from(args.x).build(&table, args.seed);
    let mut o = AgentKind::from(args.o).build(&table, args.seed.map(|s| s.wrapping_add(1)));
    let mut printer = BoardPrinter::stdout();
    let mut score = Score::default();

    for game in 1..=args.games {
        print_section(&format!("Game {game}: {} (X) vs {} (O)", x.name(), o.name()));
        let mut observers: [&mut dyn Observer; 1] = [&mut printer];
        let record = play_match(x.as_mut(), o.as_mut(), &mut observers)
            .with_context(|| format!("Game {game} failed"))?;

        println!("\n{}", describe_outcome(&record));
        match record.outcome {
            GameOutcome::Win(Player::X) => score.x += 1,
            GameOutcome::Win(Player::O) => score.o += 1,
            GameOutcome::Draw | GameOutcome::Ongoing => score.draws += 1,
        }
    }

    Ok(score)
}
