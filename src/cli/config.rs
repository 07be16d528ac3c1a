//! Shared argument types for CLI commands

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use crate::{
    config::Settings,
    pipeline::{AgentKind, OpponentKind},
    tictactoe::Player,
};

/// Opponent choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OpponentArg {
    Random,
    Minimax,
}

impl From<OpponentArg> for OpponentKind {
    fn from(arg: OpponentArg) -> Self {
        match arg {
            OpponentArg::Random => OpponentKind::Random,
            OpponentArg::Minimax => OpponentKind::Minimax,
        }
    }
}

/// Mark choice on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SymbolArg {
    X,
    O,
}

impl From<SymbolArg> for Player {
    fn from(arg: SymbolArg) -> Self {
        match arg {
            SymbolArg::X => Player::X,
            SymbolArg::O => Player::O,
        }
    }
}

/// Player choice for `play`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentArg {
    Human,
    Random,
    Minimax,
    #[value(name = "qlearning", alias = "q-learning")]
    QLearning,
}

impl From<AgentArg> for AgentKind {
    fn from(arg: AgentArg) -> Self {
        match arg {
            AgentArg::Human => AgentKind::Human,
            AgentArg::Random => AgentKind::Random,
            AgentArg::Minimax => AgentKind::Minimax,
            AgentArg::QLearning => AgentKind::QLearning,
        }
    }
}

/// Hyperparameter overrides, applied on top of the settings file
#[derive(Args, Debug, Clone, Default)]
pub struct HyperparameterArgs {
    /// Learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Initial exploration rate ε
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Per-episode multiplicative decay of ε
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Floor for ε
    #[arg(long)]
    pub min_epsilon: Option<f64>,

    /// Terminal reward for a win
    #[arg(long)]
    pub win_reward: Option<f64>,

    /// Terminal reward for a draw
    #[arg(long)]
    pub draw_reward: Option<f64>,

    /// Terminal reward for a loss
    #[arg(long)]
    pub loss_reward: Option<f64>,
}

impl HyperparameterArgs {
    pub fn apply(&self, settings: &mut Settings) {
        let agent = &mut settings.agent;
        if let Some(alpha) = self.alpha {
            agent.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            agent.discount_factor = gamma;
        }
        if let Some(epsilon) = self.epsilon {
            agent.epsilon = epsilon;
        }
        if let Some(decay) = self.epsilon_decay {
            agent.epsilon_decay = decay;
        }
        if let Some(min_epsilon) = self.min_epsilon {
            agent.min_epsilon = min_epsilon;
        }

        let rewards = &mut settings.training.rewards;
        if let Some(win) = self.win_reward {
            rewards.win = win;
        }
        if let Some(draw) = self.draw_reward {
            rewards.draw = draw;
        }
        if let Some(loss) = self.loss_reward {
            rewards.loss = loss;
        }
    }
}

/// Read the settings file if one was given, defaults otherwise.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_toml_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(Settings::default()),
    }
}
