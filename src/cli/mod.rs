//! CLI infrastructure for the `qttt` binary
//!
//! This module provides the command-line interface for training, playing and
//! evaluating tic-tac-toe agents.

pub mod commands;
pub mod config;
pub mod output;
