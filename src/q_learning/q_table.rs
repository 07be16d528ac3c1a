//! Q-table implementation for temporal difference learning

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::StateKey;

/// Sparse Q-table: state key → (move → estimate).
///
/// Serializes as a plain map of maps, with moves written as strings:
///
/// ```json
/// { "XX-OO----": { "2": 0.5, "5": -0.25 } }
/// ```
///
/// Pairs that were never written read as 0.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QTable {
    q_values: BTreeMap<StateKey, BTreeMap<usize, f64>>,
}

impl QTable {
    /// Create an empty Q-table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &StateKey, action: usize) -> f64 {
        self.q_values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(0.0)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: &StateKey, action: usize, value: f64) {
        self.q_values
            .entry(state.clone())
            .or_default()
            .insert(action, value);
    }

    /// Maximum Q-value over `legal_actions`, or 0.0 when there are none
    pub fn max_q(&self, state: &StateKey, legal_actions: &[usize]) -> f64 {
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Every legal action whose Q-value equals the maximum, in input order
    pub fn best_actions(&self, state: &StateKey, legal_actions: &[usize]) -> Vec<usize> {
        let best = self.max_q(state, legal_actions);
        legal_actions
            .iter()
            .copied()
            .filter(|&action| self.get(state, action) == best)
            .collect()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    ///
    /// The max term is 0.0 when `next_legal_actions` is empty (terminal
    /// transition). Returns the new estimate.
    #[allow(clippy::too_many_arguments)]
    pub fn q_learning_update(
        &mut self,
        state: &StateKey,
        action: usize,
        reward: f64,
        next_state: &StateKey,
        next_legal_actions: &[usize],
        learning_rate: f64,
        discount_factor: f64,
    ) -> f64 {
        let current_q = self.get(state, action);
        let max_next_q = self.max_q(next_state, next_legal_actions);
        let td_target = reward + discount_factor * max_next_q;
        let td_error = td_target - current_q;
        let new_q = current_q + learning_rate * td_error;
        self.set(state, action, new_q);
        new_q
    }

    /// Iterate over every stored (state, action, value)
    pub fn iter(&self) -> impl Iterator<Item = (&StateKey, usize, f64)> {
        self.q_values.iter().flat_map(|(state, actions)| {
            actions
                .iter()
                .map(move |(&action, &value)| (state, action, value))
        })
    }

    /// Number of states with at least one stored estimate
    pub fn state_count(&self) -> usize {
        self.q_values.len()
    }

    /// Number of stored (state, action) estimates
    pub fn size(&self) -> usize {
        self.q_values.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.q_values.is_empty()
    }

    /// Reset all Q-values
    pub fn clear(&mut self) {
        self.q_values.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new();
        assert_eq!(qtable.get(&key("---------"), 0), 0.0);
        assert!(qtable.is_empty());
    }

    #[test]
    fn test_qtable_set_get() {
        let mut qtable = QTable::new();
        let state = key("---------");
        qtable.set(&state, 4, 1.5);
        assert_eq!(qtable.get(&state, 4), 1.5);
        assert_eq!(qtable.get(&state, 3), 0.0);
        assert_eq!(qtable.state_count(), 1);
        assert_eq!(qtable.size(), 1);
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new();
        let state = key("---------");
        qtable.set(&state, 0, 0.5);
        qtable.set(&state, 1, 1.5);
        qtable.set(&state, 2, 0.8);

        assert_eq!(qtable.max_q(&state, &[0, 1, 2]), 1.5);
        assert_eq!(qtable.max_q(&state, &[]), 0.0);
    }

    #[test]
    fn test_max_q_counts_unseen_as_zero() {
        let mut qtable = QTable::new();
        let state = key("---------");
        qtable.set(&state, 0, -0.5);
        assert_eq!(qtable.max_q(&state, &[0, 1]), 0.0);
    }

    #[test]
    fn test_best_actions_keeps_ties() {
        let mut qtable = QTable::new();
        let state = key("---------");
        qtable.set(&state, 0, 0.5);
        qtable.set(&state, 3, 1.5);
        qtable.set(&state, 7, 1.5);

        assert_eq!(qtable.best_actions(&state, &[0, 3, 5, 7]), vec![3, 7]);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new();
        let state = key("---------");
        let next_state = key("X---O----");

        qtable.set(&next_state, 1, 1.0);
        qtable.set(&next_state, 2, 2.0);

        let updated = qtable.q_learning_update(&state, 4, 0.0, &next_state, &[1, 2], 0.5, 0.99);

        // Q(s,4) = 0.0 + 0.5 * (0.0 + 0.99 * 2.0 - 0.0) = 0.99
        assert!((updated - 0.99).abs() < 1e-12);
        assert_eq!(qtable.get(&state, 4), updated);
    }

    #[test]
    fn test_terminal_update_does_not_bootstrap() {
        let mut qtable = QTable::new();
        let state = key("XX-OO----");
        let next_state = key("XXXOO----");
        qtable.set(&next_state, 5, 10.0);

        let updated = qtable.q_learning_update(&state, 2, 1.0, &next_state, &[], 0.5, 0.9);
        assert_eq!(updated, 0.5);
    }

    #[test]
    fn test_json_shape() {
        let mut qtable = QTable::new();
        qtable.set(&key("XX-OO----"), 2, 0.5);
        let json = serde_json::to_string(&qtable).unwrap();
        assert_eq!(json, r#"{"XX-OO----":{"2":0.5}}"#);

        let back: QTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, qtable);
    }
}
