//! Training and evaluation pipeline
//!
//! This module provides:
//! - The episode-at-a-time Q-learning [`Trainer`]
//! - Single matches between any two agents, and greedy evaluation
//! - Observers that record or display training progress
//! - The random and human players, and the enums that choose agents

pub mod agents;
pub mod matches;
pub mod observers;
pub mod training;

pub use agents::{AgentKind, HumanAgent, OpponentKind, RandomAgent};
pub use matches::{EvaluationResult, MatchRecord, evaluate, play_match};
pub use observers::{
    CsvHistoryObserver, HistoryRow, MetricsObserver, MetricsSummary,
    ProgressObserver, SharedMetrics,
};
pub use training::{EpisodeRecord, EpisodeStats, Trainer, TrainingConfig, TrainingResult};

pub use crate::ports::{Agent, Observer};
