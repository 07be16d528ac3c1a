//! Agent port - anything that can propose a move for a mark
//!
//! Implementations:
//! - [`RandomAgent`](crate::pipeline::RandomAgent): uniform random legal move
//! - [`MinimaxAgent`](crate::minimax::MinimaxAgent): exhaustive search
//! - [`QLearningAgent`](crate::q_learning::QLearningAgent): ε-greedy over its value table
//! - [`HumanAgent`](crate::pipeline::HumanAgent): reads moves from a terminal

use crate::{
    Result,
    tictactoe::{Board, Player},
};

/// Move-proposal capability.
///
/// The concrete agent for each mark is chosen once, when a training run or
/// match is set up, and then asked for moves through this trait.
///
/// # Examples
///
/// ```
/// use qttt::{
///     ports::Agent,
///     tictactoe::{Board, Player},
/// };
///
/// struct FirstFree;
///
/// impl Agent for FirstFree {
///     fn select_move(&mut self, board: &Board, _mark: Player) -> qttt::Result<usize> {
///         board
///             .available_moves()
///             .first()
///             .copied()
///             .ok_or(qttt::Error::NoValidMoves)
///     }
///
///     fn name(&self) -> &str {
///         "first-free"
///     }
/// }
///
/// let mut agent = FirstFree;
/// assert_eq!(agent.select_move(&Board::new(), Player::X).unwrap(), 0);
/// ```
pub trait Agent {
    /// Select a position (0-8) for `mark` on `board`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoValidMoves`] if the board has no empty cell.
    fn select_move(&mut self, board: &Board, mark: Player) -> Result<usize>;

    /// Name used in logs and error reports.
    fn name(&self) -> &str;

    /// Reseed the agent's random number generator, if it has one.
    ///
    /// Deterministic agents ignore this.
    fn set_rng_seed(&mut self, _seed: u64) {}
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn select_move(&mut self, board: &Board, mark: Player) -> Result<usize> {
        (**self).select_move(board, mark)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_rng_seed(&mut self, seed: u64) {
        (**self).set_rng_seed(seed)
    }
}
