//! Tic-tac-toe with an exhaustive minimax player and a tabular Q-learning player
//!
//! This crate provides:
//! - The 3x3 board state machine with move legality and outcome detection
//! - A full-depth minimax agent, used as a strong opponent and as an oracle
//! - A Q-learning agent with ε-greedy exploration and a persisted value table
//! - A training loop that runs episodes against a random or minimax opponent
//! - Match play, evaluation and the `qttt` command line front end

pub mod adapters;
pub mod cli;
pub mod config;
pub mod error;
pub mod minimax;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use error::{Error, Result};
pub use types::StateKey;
