//! Game outcomes and move records

use serde::{Deserialize, Serialize};

use super::board::Player;

/// A move in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub position: usize,
    pub player: Player,
}

/// Outcome of a board, derived from its cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Ongoing,
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::Ongoing)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(player),
            _ => None,
        }
    }

    /// Result of a finished game from `player`'s perspective
    pub fn result_for(self, player: Player) -> Option<EpisodeResult> {
        match self {
            GameOutcome::Win(winner) if winner == player => Some(EpisodeResult::Win),
            GameOutcome::Win(_) => Some(EpisodeResult::Loss),
            GameOutcome::Draw => Some(EpisodeResult::Draw),
            GameOutcome::Ongoing => None,
        }
    }
}

/// Finished game seen from one side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeResult {
    Win,
    Draw,
    Loss,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_for_each_side() {
        let outcome = GameOutcome::Win(Player::O);
        assert_eq!(outcome.result_for(Player::O), Some(EpisodeResult::Win));
        assert_eq!(outcome.result_for(Player::X), Some(EpisodeResult::Loss));
        assert_eq!(
            GameOutcome::Draw.result_for(Player::X),
            Some(EpisodeResult::Draw)
        );
        assert_eq!(GameOutcome::Ongoing.result_for(Player::X), None);
    }

    #[test]
    fn test_terminal_flags() {
        assert!(!GameOutcome::Ongoing.is_terminal());
        assert!(GameOutcome::Draw.is_terminal());
        assert!(GameOutcome::Win(Player::X).is_terminal());
        assert_eq!(GameOutcome::Draw.winner(), None);
    }
}
