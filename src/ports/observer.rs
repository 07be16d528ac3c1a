//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling training
//! logic to specific output formats or front ends.

use crate::{
    Result,
    pipeline::{EpisodeRecord, TrainingResult},
    tictactoe::{Board, Player},
};

/// A single move as seen by observers.
#[derive(Debug, Clone, Copy)]
pub struct MoveEvent {
    /// Episode index (1-based), 0 for a standalone match
    pub episode: usize,
    /// Move number within the episode (0-based)
    pub step: usize,
    /// Mark that was placed
    pub player: Player,
    /// Position that was played
    pub position: usize,
    /// Board after the move
    pub board: Board,
    /// Whether the learning agent made this move
    pub by_learner: bool,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once, before the first episode
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_move(...)` - for each move in the episode
///    - `on_anomaly(...)` - only if the learner beat the minimax opponent
///    - `on_episode_end(record)`
/// 3. `on_training_end(result)` - once, when the run completes
///
/// # Examples
///
/// ```no_run
/// use qttt::{pipeline::EpisodeRecord, ports::Observer};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(&mut self, _record: &EpisodeRecord) -> qttt::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts. Episodes are numbered from 1.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after every applied move, by either side.
    fn on_move(&mut self, _event: &MoveEvent) -> Result<()> {
        Ok(())
    }

    /// Called when the learner wins against an opponent that should never lose.
    ///
    /// `board` is the final position of the episode.
    fn on_anomaly(&mut self, _record: &EpisodeRecord, _board: &Board) -> Result<()> {
        Ok(())
    }

    /// Called once per completed episode, after the exploration rate decayed.
    fn on_episode_end(&mut self, _record: &EpisodeRecord) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self, _result: &TrainingResult) -> Result<()> {
        Ok(())
    }
}
