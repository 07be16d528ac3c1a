//! Board representation and move legality

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{game::GameOutcome, lines::LineAnalyzer};
use crate::types::StateKey;

/// Number of cells on the board
pub const BOARD_CELLS: usize = 9;

/// A cell on the Tic-Tac-Toe board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    X,
    O,
}

impl Cell {
    /// Character used for this cell in state keys and board strings.
    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::X => 'X',
            Cell::O => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '-' | '.' | '_' => Some(Cell::Empty),
            'X' | 'x' => Some(Cell::X),
            'O' | 'o' | '0' => Some(Cell::O),
            _ => None,
        }
    }

    pub fn to_player(self) -> Option<Player> {
        match self {
            Cell::X => Some(Player::X),
            Cell::O => Some(Player::O),
            Cell::Empty => None,
        }
    }
}

/// A player mark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    X,
    O,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    /// Convert player to cell
    pub fn to_cell(self) -> Cell {
        match self {
            Player::X => Cell::X,
            Player::O => Cell::O,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cell().to_char())
    }
}

impl FromStr for Player {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            other => Err(crate::Error::InvalidMark {
                symbol: other.to_string(),
            }),
        }
    }
}

/// The 3x3 grid.
///
/// Cells are indexed row by row:
///
/// ```text
/// 0 | 1 | 2
/// 3 | 4 | 5
/// 6 | 7 | 8
/// ```
///
/// The board does not track whose turn it is. Callers decide which mark moves
/// next, which lets the learning agent open the game with either mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; BOARD_CELLS],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_CELLS]) -> Self {
        Self { cells }
    }

    /// Parse a board from 9 cell characters, ignoring whitespace and `|`.
    ///
    /// # Errors
    ///
    /// Returns error unless exactly 9 cells are present and every character is
    /// a valid cell representation.
    pub fn from_string(s: &str) -> Result<Self, crate::Error> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '|')
            .collect();
        if chars.len() != BOARD_CELLS {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_CELLS,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Cell::Empty; BOARD_CELLS];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Cell::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[Cell; BOARD_CELLS] {
        &self.cells
    }

    /// Get cell at position, `None` when out of range
    pub fn get(&self, pos: usize) -> Option<Cell> {
        self.cells.get(pos).copied()
    }

    /// Clear every cell
    pub fn reset(&mut self) {
        self.cells = [Cell::Empty; BOARD_CELLS];
    }

    /// Empty positions in ascending order
    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Place `player`'s mark at `pos`.
    ///
    /// # Errors
    ///
    /// [`crate::Error::PositionOutOfBounds`] if `pos` is not in `0..9`, and
    /// [`crate::Error::InvalidMove`] if the cell is already occupied. The board
    /// is left untouched on error.
    pub fn apply_move(&mut self, pos: usize, player: Player) -> Result<(), crate::Error> {
        match self.cells.get(pos) {
            None => Err(crate::Error::PositionOutOfBounds { position: pos }),
            Some(Cell::Empty) => {
                self.cells[pos] = player.to_cell();
                Ok(())
            }
            Some(_) => Err(crate::Error::InvalidMove { position: pos }),
        }
    }

    /// Unchecked placement for search, paired with [`Board::clear`].
    pub(crate) fn place(&mut self, pos: usize, player: Player) {
        if let Some(cell) = self.cells.get_mut(pos) {
            *cell = player.to_cell();
        }
    }

    /// Undo a move during search. Out-of-range positions are ignored.
    pub(crate) fn clear(&mut self, pos: usize) {
        if let Some(cell) = self.cells.get_mut(pos) {
            *cell = Cell::Empty;
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Cell::Empty)
    }

    /// Check if a player has won
    pub fn has_won(&self, player: Player) -> bool {
        LineAnalyzer::has_won(&self.cells, player)
    }

    /// Current outcome, recomputed from the cells
    pub fn outcome(&self) -> GameOutcome {
        if let Some((winner, _)) = LineAnalyzer::completed_line(&self.cells) {
            GameOutcome::Win(winner)
        } else if self.is_full() {
            GameOutcome::Draw
        } else {
            GameOutcome::Ongoing
        }
    }

    /// Check if the game is over (win or draw)
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }

    /// The decisive line.
    ///
    /// `Some` with three indices on a win, `Some` with an empty slice on a
    /// draw, `None` while the game is ongoing.
    pub fn winning_line(&self) -> Option<&'static [usize]> {
        match self.outcome() {
            GameOutcome::Win(_) => {
                LineAnalyzer::completed_line(&self.cells).map(|(_, line)| line.as_slice())
            }
            GameOutcome::Draw => Some(&[]),
            GameOutcome::Ongoing => None,
        }
    }

    /// Key used to index the value table
    pub fn state_key(&self) -> StateKey {
        StateKey::from(self)
    }

    /// Render with row separators, e.g. for terminal play
    pub fn pretty(&self) -> String {
        let rows: Vec<String> = (0..3)
            .map(|row| {
                (0..3)
                    .map(|col| match self.cells[row * 3 + col] {
                        Cell::Empty => ' ',
                        cell => cell.to_char(),
                    })
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect();
        rows.join("\n---------\n")
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.available_moves(), (0..9).collect::<Vec<_>>());
        assert_eq!(board.outcome(), GameOutcome::Ongoing);
        assert_eq!(board.winning_line(), None);
    }

    #[test]
    fn test_apply_move_sets_exactly_one_cell() {
        let mut board = Board::new();
        board.apply_move(4, Player::X).unwrap();
        assert_eq!(board.get(4), Some(Cell::X));
        assert_eq!(board.occupied_count(), 1);
        assert_eq!(board.available_moves(), vec![0, 1, 2, 3, 5, 6, 7, 8]);
    }

    #[test]
    fn test_apply_move_rejects_occupied_cell() {
        let mut board = Board::new();
        board.apply_move(4, Player::X).unwrap();
        let err = board.apply_move(4, Player::O).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidMove { position: 4 }));
        assert_eq!(board.get(4), Some(Cell::X));
    }

    #[test]
    fn test_apply_move_rejects_out_of_range() {
        let mut board = Board::new();
        let err = board.apply_move(9, Player::X).unwrap_err();
        assert!(matches!(err, crate::Error::PositionOutOfBounds { position: 9 }));
        assert!(err.is_invalid_move());
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_reset_clears_cells() {
        let mut board = Board::from_string("XOX OXO XOX").unwrap();
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_state_key_encoding() {
        let board = Board::from_string("X-- -O- --X").unwrap();
        assert_eq!(board.state_key().as_str(), "X---O---X");
        assert_eq!(Board::new().state_key().as_str(), "---------");
    }

    #[test]
    fn test_identical_boards_share_key() {
        let mut a = Board::new();
        a.apply_move(0, Player::X).unwrap();
        a.apply_move(8, Player::O).unwrap();
        let mut b = Board::new();
        b.apply_move(8, Player::O).unwrap();
        b.apply_move(0, Player::X).unwrap();
        assert_eq!(a.state_key(), b.state_key());
    }

    #[test]
    fn test_draw_has_empty_winning_line() {
        let board = Board::from_string("XOX XOO OXX").unwrap();
        assert_eq!(board.outcome(), GameOutcome::Draw);
        assert_eq!(board.winning_line(), Some(&[][..]));
    }

    #[test]
    fn test_win_on_full_board_is_a_win() {
        let board = Board::from_string("XXX OOX OXO").unwrap();
        assert_eq!(board.outcome(), GameOutcome::Win(Player::X));
        assert_eq!(board.winning_line(), Some(&[0, 1, 2][..]));
    }

    #[test]
    fn test_player_from_str() {
        assert_eq!("x".parse::<Player>().unwrap(), Player::X);
        assert_eq!("O".parse::<Player>().unwrap(), Player::O);
        let err = "Z".parse::<Player>().unwrap_err();
        assert!(err.is_invalid_move());
    }

    #[test]
    fn test_from_string_rejects_bad_input() {
        assert!(Board::from_string("XO").is_err());
        assert!(matches!(
            Board::from_string("XXXXXXXXXO"),
            Err(crate::Error::InvalidBoardLength { expected: 9, got: 10, .. })
        ));
        assert!(Board::from_string("XO?------").is_err());
    }

    #[test]
    fn test_pretty_rendering() {
        let board = Board::from_string("X-O ---  ---").unwrap();
        assert_eq!(
            board.pretty(),
            "X |   | O\n---------\n  |   |  \n---------\n  |   |  "
        );
    }
}
