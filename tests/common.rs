//! Common test utilities for the qttt test suite.
//!
//! Scripted agents and board enumeration shared by several test files.

#![allow(dead_code)]

use qttt::{
    Error, Result,
    ports::Agent,
    tictactoe::{Board, Player},
};

/// Agent that plays a fixed list of positions, in order.
pub struct ScriptedAgent {
    moves: Vec<usize>,
    next: usize,
}

impl ScriptedAgent {
    pub fn new(moves: &[usize]) -> Self {
        Self {
            moves: moves.to_vec(),
            next: 0,
        }
    }
}

impl Agent for ScriptedAgent {
    fn select_move(&mut self, _board: &Board, _mark: Player) -> Result<usize> {
        let position = self.moves.get(self.next).copied().ok_or(Error::NoValidMoves)?;
        self.next += 1;
        Ok(position)
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

/// Agent that always plays the lowest free cell.
pub struct FirstFreeAgent;

impl Agent for FirstFreeAgent {
    fn select_move(&mut self, board: &Board, _mark: Player) -> Result<usize> {
        board
            .available_moves()
            .first()
            .copied()
            .ok_or(Error::NoValidMoves)
    }

    fn name(&self) -> &str {
        "FirstFree"
    }
}

/// Every board reachable by legal play with X moving first, terminal ones
/// included. Each position appears once per distinct move order.
pub fn reachable_boards() -> Vec<Board> {
    fn walk(board: Board, to_move: Player, out: &mut Vec<Board>) {
        out.push(board);
        if board.is_terminal() {
            return;
        }
        for position in board.available_moves() {
            let mut next = board;
            next.apply_move(position, to_move).unwrap();
            walk(next, to_move.opponent(), out);
        }
    }

    let mut boards = Vec::new();
    walk(Board::new(), Player::X, &mut boards);
    boards
}
