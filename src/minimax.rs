//! Exhaustive minimax search
//!
//! Full-depth search with terminal scores of +10 / -10 / 0 from the
//! maximizing mark's point of view. Tic-tac-toe is small enough to expand
//! completely, so there is no depth limit and no pruning. Positions reached
//! through different move orders are scored once per query.

use std::collections::HashMap;

use crate::{
    Error, Result,
    ports::Agent,
    tictactoe::{Board, GameOutcome, Player},
};

/// Score of a position won by the maximizing mark
pub const WIN_SCORE: i32 = 10;
/// Score of a position won by the minimizing mark
pub const LOSS_SCORE: i32 = -10;
/// Score of a drawn position
pub const DRAW_SCORE: i32 = 0;

/// Deterministic optimal player.
///
/// Stateless between calls: every query searches a private copy of the board
/// with its own transposition table and leaves the caller's board untouched.
///
/// # Examples
///
/// ```
/// use qttt::{
///     minimax::MinimaxAgent,
///     tictactoe::{Board, Player},
/// };
///
/// let board = Board::from_string("XX-OO----").unwrap();
/// let best = MinimaxAgent::new().best_move(&board, Player::X, Player::O).unwrap();
/// assert_eq!(best, 2);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxAgent;

impl MinimaxAgent {
    pub fn new() -> Self {
        Self
    }

    /// Best move for `maximizing` to play now.
    ///
    /// Ties go to the lowest index among the moves sharing the best score.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMoves`] if the board has no empty cell or the
    /// game is already decided.
    pub fn best_move(&self, board: &Board, maximizing: Player, minimizing: Player) -> Result<usize> {
        let mut best: Option<(usize, i32)> = None;
        for (position, score) in self.evaluate_moves(board, maximizing, minimizing) {
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((position, score));
            }
        }
        best.map(|(position, _)| position).ok_or(Error::NoValidMoves)
    }

    /// Minimax score of every legal move for `maximizing`, in index order.
    ///
    /// Empty when the game is already over.
    pub fn evaluate_moves(
        &self,
        board: &Board,
        maximizing: Player,
        minimizing: Player,
    ) -> Vec<(usize, i32)> {
        if board.is_terminal() {
            return Vec::new();
        }

        let mut work = *board;
        let mut memo = Memo::new();
        board
            .available_moves()
            .into_iter()
            .map(|position| {
                work.place(position, maximizing);
                let score = search(&mut work, false, maximizing, minimizing, &mut memo);
                work.clear(position);
                (position, score)
            })
            .collect()
    }
}

/// Scores keyed by position and side to move, valid for one query
type Memo = HashMap<(Board, bool), i32>;

fn search(
    board: &mut Board,
    maximizing_turn: bool,
    maximizing: Player,
    minimizing: Player,
    memo: &mut Memo,
) -> i32 {
    if let Some(&score) = memo.get(&(*board, maximizing_turn)) {
        return score;
    }

    match board.outcome() {
        GameOutcome::Win(winner) if winner == maximizing => return WIN_SCORE,
        GameOutcome::Win(_) => return LOSS_SCORE,
        GameOutcome::Draw => return DRAW_SCORE,
        GameOutcome::Ongoing => {}
    }

    let mover = if maximizing_turn { maximizing } else { minimizing };
    let mut best = if maximizing_turn { i32::MIN } else { i32::MAX };

    for position in board.available_moves() {
        board.place(position, mover);
        let score = search(board, !maximizing_turn, maximizing, minimizing, memo);
        board.clear(position);

        best = if maximizing_turn {
            best.max(score)
        } else {
            best.min(score)
        };
    }
    memo.insert((*board, maximizing_turn), best);
    best
}

impl Agent for MinimaxAgent {
    fn select_move(&mut self, board: &Board, mark: Player) -> Result<usize> {
        self.best_move(board, mark, mark.opponent())
    }

    fn name(&self) -> &str {
        "Minimax"
    }
}
