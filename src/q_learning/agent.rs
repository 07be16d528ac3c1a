//! Tabular Q-learning agent
//!
//! The agent owns its Q-table and exploration schedule. Rewards are supplied
//! by the caller; the agent only knows how to pick moves and apply the
//! temporal-difference update.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    config::QLearningConfig,
    error::{Error, Result},
    ports::{Agent, ValueTableRepository},
    q_learning::q_table::QTable,
    tictactoe::{Board, Player},
    types::StateKey,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// # Examples
///
/// ```
/// use qttt::{config::QLearningConfig, q_learning::QLearningAgent, types::StateKey};
///
/// let mut agent = QLearningAgent::new(QLearningConfig::default()).with_seed(7);
/// let state = StateKey::parse("XX-OO----").unwrap();
/// let after = StateKey::parse("XXXOO----").unwrap();
///
/// agent.update(&state, 2, 1.0, &after, &[]);
/// assert_eq!(agent.action_value(&state, 2), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    config: QLearningConfig,
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with an empty table
    pub fn new(config: QLearningConfig) -> Self {
        Self::with_table(config, QTable::new())
    }

    /// Create an agent that continues from an existing table
    pub fn with_table(config: QLearningConfig, q_table: QTable) -> Self {
        Self {
            q_table,
            epsilon: config.epsilon,
            config,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Load the table at `path` through `repository`.
    ///
    /// A missing or unreadable table starts the agent cold.
    pub fn load<R: ValueTableRepository + ?Sized>(
        config: QLearningConfig,
        repository: &R,
        path: &Path,
    ) -> Self {
        Self::with_table(config, repository.load(path))
    }

    /// Persist the table at `path` through `repository`.
    pub fn save<R: ValueTableRepository + ?Sized>(&self, repository: &R, path: &Path) -> Result<()> {
        repository.save(&self.q_table, path)
    }

    /// Stored estimate for (state, action), 0.0 if never updated
    pub fn action_value(&self, state: &StateKey, action: usize) -> f64 {
        self.q_table.get(state, action)
    }

    /// ε-greedy action selection.
    ///
    /// With probability ε returns a uniformly random element of
    /// `available_moves`; otherwise one of the highest-valued moves, ties
    /// broken uniformly at random.
    ///
    /// # Panics
    ///
    /// Panics if `available_moves` is empty. Callers must only ask for a move
    /// while the game is ongoing.
    pub fn choose_action(&mut self, state: &StateKey, available_moves: &[usize]) -> usize {
        assert!(
            !available_moves.is_empty(),
            "choose_action called with no available moves"
        );

        if self.rng.random::<f64>() < self.epsilon {
            // Explore
            available_moves[self.rng.random_range(0..available_moves.len())]
        } else {
            // Exploit
            let best = self.q_table.best_actions(state, available_moves);
            best.choose(&mut self.rng)
                .copied()
                .unwrap_or(available_moves[0])
        }
    }

    /// One-step Q-learning update.
    ///
    /// Pass an empty `next_available_moves` for terminal transitions.
    /// Returns the new estimate.
    pub fn update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        next_state: &StateKey,
        next_available_moves: &[usize],
    ) -> f64 {
        self.q_table.q_learning_update(
            state,
            action,
            reward,
            next_state,
            next_available_moves,
            self.config.learning_rate,
            self.config.discount_factor,
        )
    }

    /// Decay epsilon after an episode, floored at `min_epsilon`.
    pub fn decay_exploration(&mut self) -> f64 {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
        self.epsilon
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Copy of this agent that never explores, for evaluation.
    pub fn greedy(&self) -> Self {
        let mut agent = self.clone();
        agent.epsilon = 0.0;
        agent
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_table(self) -> QTable {
        self.q_table
    }

    /// Forget everything learned and restart the exploration schedule.
    pub fn reset(&mut self) {
        self.q_table.clear();
        self.epsilon = self.config.epsilon;
        self.rng = build_rng(self.rng_seed);
    }
}

impl Agent for QLearningAgent {
    fn select_move(&mut self, board: &Board, _mark: Player) -> Result<usize> {
        let legal_moves = board.available_moves();
        if legal_moves.is_empty() {
            return Err(Error::NoValidMoves);
        }
        Ok(self.choose_action(&board.state_key(), &legal_moves))
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    fn greedy_config() -> QLearningConfig {
        QLearningConfig::default()
            .with_epsilon(0.0)
            .with_min_epsilon(0.0)
    }

    #[test]
    fn test_terminal_update_from_zero_is_alpha_times_reward() {
        let config = greedy_config().with_learning_rate(0.3);
        let mut agent = QLearningAgent::new(config);
        let state = key("XX-OO----");
        agent.update(&state, 2, 1.0, &key("XXXOO----"), &[]);
        assert_eq!(agent.action_value(&state, 2), 0.3 * 1.0);
    }

    #[test]
    fn test_intermediate_update_bootstraps_from_next_state() {
        let config = greedy_config().with_learning_rate(0.5).with_discount_factor(0.9);
        let mut agent = QLearningAgent::new(config);
        let state = key("---------");
        let next = key("X---O----");

        agent.update(&next, 8, 1.0, &key("X---O---X"), &[]);
        let value = agent.update(&state, 0, 0.0, &next, &[1, 2, 3, 5, 6, 7, 8]);
        // Q(next, 8) = 0.5; Q(s, 0) = 0.5 * 0.9 * 0.5
        assert!((value - 0.225).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_choice_follows_table() {
        let mut agent = QLearningAgent::new(greedy_config()).with_seed(3);
        let state = key("---------");
        agent.update(&state, 6, 1.0, &key("------X--"), &[]);
        for _ in 0..20 {
            assert_eq!(agent.choose_action(&state, &[0, 3, 6, 8]), 6);
        }
    }

    #[test]
    fn test_ties_are_broken_among_best_moves_only() {
        let mut agent = QLearningAgent::new(greedy_config()).with_seed(11);
        let state = key("---------");
        agent.update(&state, 0, -1.0, &key("X--------"), &[]);
        agent.update(&state, 1, -1.0, &key("-X-------"), &[]);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(agent.choose_action(&state, &[0, 1, 2, 3]));
        }
        assert_eq!(seen, [2, 3].into_iter().collect());
    }

    #[test]
    fn test_full_exploration_covers_every_move() {
        let config = QLearningConfig::default().with_epsilon(1.0);
        let mut agent = QLearningAgent::new(config).with_seed(5);
        let state = key("---------");
        agent.update(&state, 4, 1.0, &key("----X----"), &[]);

        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            seen.insert(agent.choose_action(&state, &[0, 4, 8]));
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    #[should_panic(expected = "no available moves")]
    fn test_choose_action_requires_moves() {
        let mut agent = QLearningAgent::new(greedy_config());
        agent.choose_action(&key("XOXOXOOXO"), &[]);
    }

    #[test]
    fn test_decay_is_floored() {
        let config = QLearningConfig::default()
            .with_epsilon(0.5)
            .with_epsilon_decay(0.5)
            .with_min_epsilon(0.1);
        let mut agent = QLearningAgent::new(config);
        assert_eq!(agent.decay_exploration(), 0.25);
        assert_eq!(agent.decay_exploration(), 0.125);
        assert_eq!(agent.decay_exploration(), 0.1);
        assert_eq!(agent.decay_exploration(), 0.1);
    }

    #[test]
    fn test_select_move_on_full_board_errors() {
        let mut agent = QLearningAgent::new(greedy_config());
        let board = Board::from_string("XOXOXOOXO").unwrap();
        assert!(matches!(
            agent.select_move(&board, Player::X),
            Err(Error::NoValidMoves)
        ));
    }

    #[test]
    fn test_reset_restores_initial_epsilon() {
        let config = QLearningConfig::default().with_epsilon(0.8);
        let mut agent = QLearningAgent::new(config);
        agent.update(&key("---------"), 0, 1.0, &key("X--------"), &[]);
        agent.decay_exploration();
        agent.reset();
        assert_eq!(agent.epsilon(), 0.8);
        assert!(agent.q_table().is_empty());
    }
}
