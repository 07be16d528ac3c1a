//! Tabular Q-learning
//!
//! The learner keeps a sparse table from board [`StateKey`](crate::types::StateKey)
//! to per-move value estimates and improves it with the one-step update
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α · (r + γ · max_a' Q(s',a') − Q(s,a))
//! ```
//!
//! where the max term is 0.0 on terminal transitions.
//!
//! ## Usage Example
//!
//! ```no_run
//! use qttt::{
//!     adapters::JsonFileRepository, config::QLearningConfig, q_learning::QLearningAgent,
//! };
//! use std::path::Path;
//!
//! let repo = JsonFileRepository::new();
//! let path = Path::new("q_table.json");
//!
//! // Missing file: the agent starts with an empty table
//! let agent = QLearningAgent::load(QLearningConfig::default(), &repo, path);
//! agent.save(&repo, path)?;
//! # Ok::<(), qttt::Error>(())
//! ```

pub mod agent;
pub mod q_table;

pub use agent::QLearningAgent;
pub use q_table::QTable;
