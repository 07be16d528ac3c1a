//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tictactoe::{BOARD_CELLS, Board, Cell};

/// Value-table index for a board configuration.
///
/// One character per cell in index order: `X`, `O`, or `-` for empty.
/// Boards with identical cells always produce identical keys.
///
/// # Examples
///
/// ```
/// use qttt::tictactoe::{Board, Player};
/// use qttt::types::StateKey;
///
/// let mut board = Board::new();
/// board.apply_move(4, Player::X).unwrap();
/// assert_eq!(board.state_key().as_str(), "----X----");
/// assert_eq!(StateKey::parse("----X----").unwrap(), board.state_key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(String);

impl StateKey {
    /// Parse and validate a key.
    ///
    /// # Errors
    ///
    /// Returns an error unless the string is exactly 9 of `X`, `O`, `-`.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let count = s.chars().count();
        if count != BOARD_CELLS {
            return Err(crate::Error::InvalidBoardLength {
                expected: BOARD_CELLS,
                got: count,
                context: s.to_string(),
            });
        }
        for (position, character) in s.chars().enumerate() {
            if !matches!(character, 'X' | 'O' | '-') {
                return Err(crate::Error::InvalidCellCharacter {
                    character,
                    position,
                    context: s.to_string(),
                });
            }
        }
        Ok(StateKey(s.to_string()))
    }

    /// Rebuild the board this key was taken from.
    pub fn to_board(&self) -> Board {
        let mut cells = [Cell::Empty; BOARD_CELLS];
        for (cell, c) in cells.iter_mut().zip(self.0.chars()) {
            *cell = Cell::from_char(c).unwrap_or(Cell::Empty);
        }
        Board::from_cells(cells)
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl From<&Board> for StateKey {
    fn from(board: &Board) -> Self {
        StateKey(board.cells().iter().map(|c| c.to_char()).collect())
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(StateKey::parse("X--").is_err());
        assert!(StateKey::parse("----------").is_err());
    }

    #[test]
    fn test_parse_rejects_foreign_characters() {
        assert!(StateKey::parse("X--.-----").is_err());
    }

    #[test]
    fn test_to_board_inverts_encoding() {
        let mut board = Board::new();
        board.apply_move(0, Player::X).unwrap();
        board.apply_move(5, Player::O).unwrap();
        assert_eq!(board.state_key().to_board(), board);
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let key = StateKey::parse("XO-------").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"XO-------\"");
    }

    #[test]
    fn test_deserialize_validates_key() {
        let key: StateKey = serde_json::from_str("\"XO-------\"").unwrap();
        assert_eq!(key.as_str(), "XO-------");
        assert!(serde_json::from_str::<StateKey>("\"garbage\"").is_err());
        assert!(serde_json::from_str::<StateKey>("\"xo-------\"").is_err());
    }
}
