//! Train command - Train the Q-learning agent against an opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::JsonFileRepository,
    cli::{
        config::{HyperparameterArgs, OpponentArg, SymbolArg, load_settings},
        output::{percent, print_kv, print_section},
    },
    pipeline::{CsvHistoryObserver, ProgressObserver, Trainer, TrainingResult},
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Train the Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Opponent to train against
    #[arg(long, short = 'o', value_enum)]
    pub opponent: Option<OpponentArg>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Mark the learning agent plays
    #[arg(long, short = 's', value_enum, ignore_case = true)]
    pub symbol: Option<SymbolArg>,

    /// Value table to continue from and save to
    #[arg(long, default_value = "q_table.json")]
    pub q_table: PathBuf,

    /// Per-episode history CSV
    #[arg(long, default_value = "history/history.csv")]
    pub history: PathBuf,

    /// Do not write the history CSV
    #[arg(long)]
    pub no_history: bool,

    /// Append to an existing history CSV instead of replacing it
    #[arg(long)]
    pub append_history: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Save the value table every N episodes
    #[arg(long)]
    pub checkpoint_interval: Option<usize>,

    /// TOML settings file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not draw a progress bar; progress is still logged
    #[arg(long)]
    pub no_progress: bool,

    #[command(flatten)]
    pub hyperparameters: HyperparameterArgs,
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let result = run(args)?;

    println!(
        "Training complete: {} wins, {} draws, {} losses. Final epsilon: {}",
        result.wins, result.draws, result.losses, result.final_epsilon
    );
    Ok(())
}

/// Train and return the summary without printing it.
pub fn run(args: TrainArgs) -> Result<TrainingResult> {
    let mut settings = load_settings(args.config.as_deref())?;
    args.hyperparameters.apply(&mut settings);

    let training = &mut settings.training;
    if let Some(opponent) = args.opponent {
        training.opponent = opponent.into();
    }
    if let Some(episodes) = args.episodes {
        training.episodes = episodes;
    }
    if let Some(symbol) = args.symbol {
        training.agent_player = symbol.into();
    }
    if args.seed.is_some() {
        training.seed = args.seed;
    }
    if args.checkpoint_interval.is_some() {
        training.checkpoint_interval = args.checkpoint_interval;
    }
    settings.validate().context("Invalid training settings")?;

    let repository = JsonFileRepository::new();
    let agent = QLearningAgent::load(settings.agent, &repository, &args.q_table);
    let starting_states = agent.q_table().state_count();

    print_section("Training");
    print_kv("Opponent", &settings.training.opponent.to_string());
    print_kv("Agent plays", &settings.training.agent_player.to_string());
    print_kv("Episodes", &settings.training.episodes.to_string());
    print_kv("Known states", &starting_states.to_string());

    let mut trainer = Trainer::new(settings.training, agent)?
        .with_checkpoint(repository, args.q_table.clone());

    if !args.no_progress {
        trainer = trainer.with_observer(Box::new(ProgressObserver::new()));
    }

    if !args.no_history {
        let history = if args.append_history {
            CsvHistoryObserver::append(&args.history)
        } else {
            CsvHistoryObserver::create(&args.history)
        }
        .with_context(|| format!("Failed to open history file {}", args.history.display()))?;
        print_kv("History", &history.path().display().to_string());
        trainer = trainer.with_observer(Box::new(history));
    }

    let result = trainer.run().context("Training failed")?;

    print_section("Results");
    print_kv(
        "Wins",
        &format!("{} ({:.1}%)", result.wins, percent(result.wins, result.episodes)),
    );
    print_kv(
        "Draws",
        &format!("{} ({:.1}%)", result.draws, percent(result.draws, result.episodes)),
    );
    print_kv(
        "Losses",
        &format!("{} ({:.1}%)", result.losses, percent(result.losses, result.episodes)),
    );
    if result.anomalies > 0 {
        print_kv("Anomalous wins", &result.anomalies.to_string());
    }
    print_kv("Known states", &trainer.agent().q_table().state_count().to_string());
    print_kv("Value table", &args.q_table.display().to_string());

    if let Some(summary) = &args.summary {
        result
            .save(summary)
            .with_context(|| format!("Failed to write summary {}", summary.display()))?;
        print_kv("Summary", &summary.display().to_string());
    }

    Ok(result)
}
