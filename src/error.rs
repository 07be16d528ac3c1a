//! Error types for the qttt crate

use thiserror::Error;

/// Main error type for the qttt crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid move: position {position} is out of bounds (must be 0-8)")]
    PositionOutOfBounds { position: usize },

    #[error("invalid move: position {position} is already occupied")]
    InvalidMove { position: usize },

    #[error("invalid mark '{symbol}' (expected 'X' or 'O')")]
    InvalidMark { symbol: String },

    #[error("{agent} proposed illegal move {position} in episode {episode}")]
    IllegalAgentMove {
        agent: String,
        position: usize,
        episode: usize,
    },

    #[error("no valid moves available")]
    NoValidMoves,

    #[error("wrong board length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to read settings: {message}")]
    Config { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

impl Error {
    /// True for every rejection raised by [`Board::apply_move`](crate::tictactoe::Board::apply_move)
    /// or by parsing a mark from text.
    pub fn is_invalid_move(&self) -> bool {
        matches!(
            self,
            Error::PositionOutOfBounds { .. } | Error::InvalidMove { .. } | Error::InvalidMark { .. }
        )
    }
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
