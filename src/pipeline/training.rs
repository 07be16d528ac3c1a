//! Q-learning training loop
//!
//! [`Trainer`] runs one episode per [`Trainer::step`] so a front end can
//! report progress between episodes, or drive the whole run with
//! [`Trainer::run`].
//!
//! Episode protocol, from the learning agent's point of view:
//!
//! 1. The learner moves first on an empty board, whatever its mark.
//! 2. If its move ends the game, the terminal reward is applied to that
//!    (state, move) with no bootstrapping.
//! 3. Otherwise the opponent replies. If the reply ends the game, the
//!    terminal reward is applied to the learner's last (state, move).
//! 4. Otherwise the learner's (state, move) is updated with reward 0.0
//!    toward the position after the reply, and play continues from there.
//!
//! Exploration decays once per completed episode.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::agents::OpponentKind;
use crate::{
    Error, Result,
    config::RewardScheme,
    ports::{Agent, MoveEvent, Observer, ValueTableRepository},
    q_learning::QLearningAgent,
    tictactoe::{Board, EpisodeResult, Player},
    types::StateKey,
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to play
    pub episodes: usize,

    /// Mark the learning agent plays
    pub agent_player: Player,

    /// Opponent type
    pub opponent: OpponentKind,

    /// Terminal rewards
    pub rewards: RewardScheme,

    /// Random seed for the learner; the opponent uses `seed + 1`
    pub seed: Option<u64>,

    /// Save the value table every N episodes (requires a checkpoint target)
    pub checkpoint_interval: Option<usize>,

    /// Episodes between progress reports, 10% of the run when unset
    pub log_interval: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 5000,
            agent_player: Player::X,
            opponent: OpponentKind::Random,
            rewards: RewardScheme::default(),
            seed: None,
            checkpoint_interval: None,
            log_interval: None,
        }
    }
}

impl TrainingConfig {
    /// Check intervals and rewards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for zero intervals or
    /// non-finite rewards.
    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_interval == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint_interval must be at least 1".to_string(),
            });
        }
        if self.log_interval == Some(0) {
            return Err(Error::InvalidConfiguration {
                message: "log_interval must be at least 1".to_string(),
            });
        }
        let RewardScheme { win, draw, loss } = self.rewards;
        if ![win, draw, loss].iter().all(|r| r.is_finite()) {
            return Err(Error::InvalidConfiguration {
                message: format!("rewards must be finite (win={win}, draw={draw}, loss={loss})"),
            });
        }
        Ok(())
    }

    /// Episodes between progress reports
    pub fn progress_interval(&self) -> usize {
        self.log_interval.unwrap_or(self.episodes / 10).max(1)
    }

    /// Whether `episode` gets a progress report. The last episode always does.
    pub fn is_progress_episode(&self, episode: usize) -> bool {
        episode.is_multiple_of(self.progress_interval()) || episode == self.episodes
    }
}

/// One completed episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Episode index (1-based)
    pub episode: usize,
    /// Result for the learning agent
    pub result: EpisodeResult,
    /// Moves played by both sides
    pub moves: usize,
    /// Exploration rate after this episode's decay
    pub epsilon: f64,
    /// Cumulative wins including this episode
    pub wins: usize,
    /// Cumulative draws including this episode
    pub draws: usize,
    /// Cumulative losses including this episode
    pub losses: usize,
    /// The learner beat an opponent that should never lose
    pub anomaly: bool,
}

/// Running tally owned by the trainer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeStats {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub anomalies: usize,
    pub epsilon: f64,
}

impl EpisodeStats {
    fn record(&mut self, result: EpisodeResult, anomaly: bool, epsilon: f64) {
        self.episodes += 1;
        match result {
            EpisodeResult::Win => self.wins += 1,
            EpisodeResult::Draw => self.draws += 1,
            EpisodeResult::Loss => self.losses += 1,
        }
        if anomaly {
            self.anomalies += 1;
        }
        self.epsilon = epsilon;
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episodes completed
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    /// Wins against an opponent that should never lose
    pub anomalies: usize,
    /// Exploration rate after the last episode
    pub final_epsilon: f64,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
}

impl TrainingResult {
    pub fn from_stats(stats: &EpisodeStats) -> Self {
        let rate = |count: usize| {
            if stats.episodes > 0 {
                count as f64 / stats.episodes as f64
            } else {
                0.0
            }
        };

        Self {
            episodes: stats.episodes,
            wins: stats.wins,
            draws: stats.draws,
            losses: stats.losses,
            anomalies: stats.anomalies,
            final_epsilon: stats.epsilon,
            win_rate: rate(stats.wins),
            draw_rate: rate(stats.draws),
            loss_rate: rate(stats.losses),
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open summary {}", path.display()),
            source,
        })?;
        let result = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(result)
    }
}

struct Checkpoint {
    repository: Box<dyn ValueTableRepository>,
    path: PathBuf,
    interval: Option<usize>,
}

/// Episode-at-a-time training of a [`QLearningAgent`] against one opponent.
///
/// # Examples
///
/// ```
/// use qttt::{
///     config::QLearningConfig,
///     pipeline::{Trainer, TrainingConfig},
///     q_learning::QLearningAgent,
/// };
///
/// let config = TrainingConfig {
///     episodes: 20,
///     seed: Some(1),
///     ..TrainingConfig::default()
/// };
/// let agent = QLearningAgent::new(QLearningConfig::default());
/// let mut trainer = Trainer::new(config, agent)?;
///
/// let first = trainer.step()?.expect("one episode");
/// assert_eq!(first.episode, 1);
///
/// let result = trainer.run()?;
/// assert_eq!(result.episodes, 20);
/// assert!(trainer.is_finished());
/// # Ok::<(), qttt::Error>(())
/// ```
pub struct Trainer {
    config: TrainingConfig,
    agent: QLearningAgent,
    opponent: Box<dyn Agent>,
    observers: Vec<Box<dyn Observer>>,
    checkpoint: Option<Checkpoint>,
    stats: EpisodeStats,
    board: Board,
    started: bool,
    finished: bool,
}

impl Trainer {
    /// Create a trainer with the opponent named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either configuration is
    /// out of range.
    pub fn new(config: TrainingConfig, agent: QLearningAgent) -> Result<Self> {
        let opponent = config.opponent.build(None);
        Self::with_opponent(config, agent, opponent)
    }

    /// Create a trainer with a caller-supplied opponent.
    ///
    /// `config.opponent` still decides whether a learner win is reported as
    /// an anomaly.
    pub fn with_opponent(
        config: TrainingConfig,
        mut agent: QLearningAgent,
        mut opponent: Box<dyn Agent>,
    ) -> Result<Self> {
        config.validate()?;
        agent.config().validate()?;

        if let Some(seed) = config.seed {
            agent.set_rng_seed(seed);
            opponent.set_rng_seed(seed.wrapping_add(1));
        }

        let epsilon = agent.epsilon();
        Ok(Self {
            config,
            agent,
            opponent,
            observers: Vec::new(),
            checkpoint: None,
            stats: EpisodeStats {
                epsilon,
                ..EpisodeStats::default()
            },
            board: Board::new(),
            started: false,
            finished: false,
        })
    }

    /// Add an observer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Persist the value table through `repository` at `path`.
    ///
    /// Saves every `config.checkpoint_interval` episodes when that is set,
    /// and always once the run finishes.
    pub fn with_checkpoint<R>(mut self, repository: R, path: impl Into<PathBuf>) -> Self
    where
        R: ValueTableRepository + 'static,
    {
        self.checkpoint = Some(Checkpoint {
            repository: Box::new(repository),
            path: path.into(),
            interval: self.config.checkpoint_interval,
        });
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn stats(&self) -> &EpisodeStats {
        &self.stats
    }

    /// Board of the episode in progress, or of the last completed one
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn agent(&self) -> &QLearningAgent {
        &self.agent
    }

    pub fn into_agent(self) -> QLearningAgent {
        self.agent
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Summary of the episodes completed so far
    pub fn result(&self) -> TrainingResult {
        TrainingResult::from_stats(&self.stats)
    }

    /// Play exactly one episode.
    ///
    /// Returns `Ok(None)` once the configured number of episodes is done.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalAgentMove`] if either side proposes an illegal
    /// move. That episode is abandoned without touching the statistics or
    /// the exploration rate. Observer and checkpoint failures are also
    /// returned.
    pub fn step(&mut self) -> Result<Option<EpisodeRecord>> {
        if !self.started {
            self.started = true;
            tracing::info!(
                episodes = self.config.episodes,
                opponent = %self.config.opponent,
                agent_player = %self.config.agent_player,
                epsilon = self.agent.epsilon(),
                "training started"
            );
            for observer in &mut self.observers {
                observer.on_training_start(self.config.episodes)?;
            }
        }

        if self.stats.episodes >= self.config.episodes {
            self.finish()?;
            return Ok(None);
        }

        let record = self.play_episode()?;

        if record.episode >= self.config.episodes {
            self.finish()?;
        }
        Ok(Some(record))
    }

    /// Play every remaining episode.
    pub fn run(&mut self) -> Result<TrainingResult> {
        while self.step()?.is_some() {}
        Ok(self.result())
    }

    fn play_episode(&mut self) -> Result<EpisodeRecord> {
        let episode = self.stats.episodes + 1;
        let learner = self.config.agent_player;
        let opponent = learner.opponent();

        self.board.reset();
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut step = 0;
        let mut state = self.board.state_key();
        let result = loop {
            let available = self.board.available_moves();
            let action = self.agent.choose_action(&state, &available);
            self.apply(episode, step, learner, action, true)?;
            step += 1;

            if let Some(result) = self.board.outcome().result_for(learner) {
                self.learn_terminal(&state, action, result);
                break result;
            }

            let reply = self.opponent.select_move(&self.board, opponent)?;
            self.apply(episode, step, opponent, reply, false)?;
            step += 1;

            if let Some(result) = self.board.outcome().result_for(learner) {
                self.learn_terminal(&state, action, result);
                break result;
            }

            let next_state = self.board.state_key();
            let next_available = self.board.available_moves();
            self.agent
                .update(&state, action, 0.0, &next_state, &next_available);
            state = next_state;
        };

        let epsilon = self.agent.decay_exploration();
        let anomaly = result == EpisodeResult::Win && self.config.opponent.is_optimal();
        self.stats.record(result, anomaly, epsilon);

        let record = EpisodeRecord {
            episode,
            result,
            moves: step,
            epsilon,
            wins: self.stats.wins,
            draws: self.stats.draws,
            losses: self.stats.losses,
            anomaly,
        };

        tracing::debug!(
            episode,
            result = ?result,
            moves = step,
            epsilon,
            "episode finished"
        );
        if self.config.is_progress_episode(episode) {
            tracing::info!(
                episode,
                total = self.config.episodes,
                wins = self.stats.wins,
                draws = self.stats.draws,
                losses = self.stats.losses,
                epsilon,
                "training progress"
            );
        }

        if anomaly {
            tracing::warn!(
                episode,
                board = %self.board.state_key(),
                opponent = %self.config.opponent,
                "learner beat an opponent that should never lose"
            );
            for observer in &mut self.observers {
                observer.on_anomaly(&record, &self.board)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_episode_end(&record)?;
        }

        if let Some(checkpoint) = &self.checkpoint {
            if checkpoint
                .interval
                .is_some_and(|interval| episode.is_multiple_of(interval))
            {
                self.agent
                    .save(&*checkpoint.repository, &checkpoint.path)?;
                tracing::debug!(episode, path = %checkpoint.path.display(), "checkpoint saved");
            }
        }

        Ok(record)
    }

    fn apply(
        &mut self,
        episode: usize,
        step: usize,
        player: Player,
        position: usize,
        by_learner: bool,
    ) -> Result<()> {
        if let Err(err) = self.board.apply_move(position, player) {
            let agent = if by_learner {
                self.agent.name().to_string()
            } else {
                self.opponent.name().to_string()
            };
            tracing::error!(
                episode,
                %agent,
                position,
                board = %self.board.state_key(),
                error = %err,
                "illegal move, abandoning episode"
            );
            return Err(Error::IllegalAgentMove {
                agent,
                position,
                episode,
            });
        }

        let event = MoveEvent {
            episode,
            step,
            player,
            position,
            board: self.board,
            by_learner,
        };
        for observer in &mut self.observers {
            observer.on_move(&event)?;
        }
        Ok(())
    }

    fn learn_terminal(&mut self, state: &StateKey, action: usize, result: EpisodeResult) {
        let reward = self.config.rewards.for_result(result);
        let final_state = self.board.state_key();
        self.agent.update(state, action, reward, &final_state, &[]);
    }

    fn finish(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;

        if let Some(checkpoint) = &self.checkpoint {
            self.agent
                .save(&*checkpoint.repository, &checkpoint.path)?;
        }

        let result = self.result();
        tracing::info!(
            episodes = result.episodes,
            wins = result.wins,
            draws = result.draws,
            losses = result.losses,
            anomalies = result.anomalies,
            final_epsilon = result.final_epsilon,
            "training complete"
        );
        for observer in &mut self.observers {
            observer.on_training_end(&result)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QLearningConfig;

    fn config(episodes: usize) -> TrainingConfig {
        TrainingConfig {
            episodes,
            seed: Some(42),
            ..TrainingConfig::default()
        }
    }

    #[test]
    fn test_run_counts_every_episode() {
        let agent = QLearningAgent::new(QLearningConfig::default());
        let mut trainer = Trainer::new(config(50), agent).unwrap();
        let result = trainer.run().unwrap();

        assert_eq!(result.episodes, 50);
        assert_eq!(result.wins + result.draws + result.losses, 50);
        assert!(trainer.is_finished());
        assert!(trainer.step().unwrap().is_none());
    }

    #[test]
    fn test_zero_episodes_finishes_immediately() {
        let agent = QLearningAgent::new(QLearningConfig::default());
        let mut trainer = Trainer::new(config(0), agent).unwrap();
        assert!(trainer.step().unwrap().is_none());
        assert!(trainer.is_finished());
        assert_eq!(trainer.result().win_rate, 0.0);
    }

    #[test]
    fn test_records_are_cumulative() {
        let agent = QLearningAgent::new(QLearningConfig::default());
        let mut trainer = Trainer::new(config(10), agent).unwrap();
        let mut last = None;
        while let Some(record) = trainer.step().unwrap() {
            assert_eq!(record.wins + record.draws + record.losses, record.episode);
            assert!(record.moves >= 5 && record.moves <= 9);
            last = Some(record);
        }
        assert_eq!(last.unwrap().episode, 10);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let agent = QLearningAgent::new(QLearningConfig::default().with_epsilon(0.3));
            let mut trainer = Trainer::new(config(100), agent).unwrap();
            let result = trainer.run().unwrap();
            (result, trainer.into_agent().into_table())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = config(5);
        config.log_interval = Some(0);
        let agent = QLearningAgent::new(QLearningConfig::default());
        assert!(matches!(
            Trainer::new(config, agent),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_progress_interval_defaults_to_a_tenth() {
        assert_eq!(config(5000).progress_interval(), 500);
        assert_eq!(config(7).progress_interval(), 1);
    }

    #[test]
    fn test_progress_episodes() {
        let run = config(25);
        let reported: Vec<usize> = (1..=25).filter(|&e| run.is_progress_episode(e)).collect();
        assert_eq!(reported, vec![2, 4, 6, 8, 10, 12, 14, 16, 18, 20, 22, 24, 25]);

        let run = TrainingConfig {
            log_interval: Some(10),
            ..config(30)
        };
        let reported: Vec<usize> = (1..=30).filter(|&e| run.is_progress_episode(e)).collect();
        assert_eq!(reported, vec![10, 20, 30]);
    }
}
