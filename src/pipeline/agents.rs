//! Concrete move-proposal strategies and the choice between them
//!
//! [`MinimaxAgent`] and [`QLearningAgent`] live with their algorithms; this
//! module adds the simple random and human players, and the enums used to
//! pick one strategy per mark when a run is set up.

use std::{
    fmt,
    io::{self, BufRead, Write},
    str::FromStr,
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    config::QLearningConfig,
    minimax::MinimaxAgent,
    ports::Agent,
    q_learning::{QLearningAgent, QTable},
    tictactoe::{Board, Player},
};

/// Uniformly random legal move
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a random agent with a deterministic seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    fn select_move(&mut self, board: &Board, _mark: Player) -> Result<usize> {
        let moves = board.available_moves();
        if moves.is_empty() {
            return Err(Error::NoValidMoves);
        }
        let index = self.rng.random_range(0..moves.len());
        Ok(moves[index])
    }

    fn name(&self) -> &str {
        "Random"
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

/// A person at a terminal.
///
/// Shows the board and a prompt on `output`, then reads a cell index from
/// `input`. Anything that is not an empty cell on the board is rejected and
/// the prompt repeats.
pub struct HumanAgent<R, W> {
    input: R,
    output: W,
}

impl HumanAgent<io::StdinLock<'static>, io::Stdout> {
    /// Human reading from stdin and writing to stdout
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> HumanAgent<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn io_error(source: io::Error) -> Error {
        Error::Io {
            operation: "interactive move".to_string(),
            source,
        }
    }
}

impl<R: BufRead, W: Write> Agent for HumanAgent<R, W> {
    fn select_move(&mut self, board: &Board, mark: Player) -> Result<usize> {
        let moves = board.available_moves();
        if moves.is_empty() {
            return Err(Error::NoValidMoves);
        }

        writeln!(self.output, "\n{}\n", board.pretty()).map_err(Self::io_error)?;
        loop {
            write!(self.output, "{mark} to move {moves:?}: ").map_err(Self::io_error)?;
            self.output.flush().map_err(Self::io_error)?;

            let mut line = String::new();
            if self.input.read_line(&mut line).map_err(Self::io_error)? == 0 {
                return Err(Self::io_error(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed before a move was entered",
                )));
            }

            match line.trim().parse::<usize>() {
                Ok(position) if moves.contains(&position) => return Ok(position),
                Ok(position) => {
                    writeln!(self.output, "Cell {position} is not available.")
                        .map_err(Self::io_error)?;
                }
                Err(_) => {
                    writeln!(self.output, "Enter a cell number between 0 and 8.")
                        .map_err(Self::io_error)?;
                }
            }
        }
    }

    fn name(&self) -> &str {
        "Human"
    }
}

/// Opponent of the learning agent during training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpponentKind {
    /// Uniformly random legal moves
    #[default]
    Random,
    /// Exhaustive minimax search
    Minimax,
}

impl OpponentKind {
    /// Build the opponent, seeded when `seed` is given.
    pub fn build(self, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            OpponentKind::Random => Box::new(seed.map_or_else(RandomAgent::new, RandomAgent::with_seed)),
            OpponentKind::Minimax => Box::new(MinimaxAgent::new()),
        }
    }

    /// Whether this opponent is expected never to lose
    pub fn is_optimal(self) -> bool {
        matches!(self, OpponentKind::Minimax)
    }
}

impl fmt::Display for OpponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OpponentKind::Random => "random",
            OpponentKind::Minimax => "minimax",
        })
    }
}

impl FromStr for OpponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(OpponentKind::Random),
            "minimax" | "optimal" => Ok(OpponentKind::Minimax),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown opponent '{other}' (expected random or minimax)"),
            }),
        }
    }
}

/// Who controls a mark in a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Human,
    Random,
    Minimax,
    #[serde(rename = "qlearning")]
    QLearning,
}

impl AgentKind {
    /// Resolve into a playing agent.
    ///
    /// A Q-learning player plays greedily from `table` and never explores.
    pub fn build(self, table: &QTable, seed: Option<u64>) -> Box<dyn Agent> {
        match self {
            AgentKind::Human => Box::new(HumanAgent::stdio()),
            AgentKind::Random => OpponentKind::Random.build(seed),
            AgentKind::Minimax => OpponentKind::Minimax.build(seed),
            AgentKind::QLearning => {
                let config = QLearningConfig::default()
                    .with_epsilon(0.0)
                    .with_min_epsilon(0.0);
                let agent = QLearningAgent::with_table(config, table.clone());
                Box::new(match seed {
                    Some(seed) => agent.with_seed(seed),
                    None => agent,
                })
            }
        }
    }
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AgentKind::Human => "human",
            AgentKind::Random => "random",
            AgentKind::Minimax => "minimax",
            AgentKind::QLearning => "qlearning",
        })
    }
}

impl FromStr for AgentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "human" => Ok(AgentKind::Human),
            "random" => Ok(AgentKind::Random),
            "minimax" | "optimal" => Ok(AgentKind::Minimax),
            "qlearning" | "q" => Ok(AgentKind::QLearning),
            other => Err(Error::InvalidConfiguration {
                message: format!("unknown agent '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_random_agent_only_picks_empty_cells() {
        let board = Board::from_string("XOX-O-XO-").unwrap();
        let mut agent = RandomAgent::with_seed(1);
        for _ in 0..50 {
            let position = agent.select_move(&board, Player::X).unwrap();
            assert!([3, 5, 8].contains(&position));
        }
    }

    #[test]
    fn test_random_agent_seed_is_reproducible() {
        let board = Board::new();
        let mut a = RandomAgent::with_seed(9);
        let mut b = RandomAgent::with_seed(9);
        for _ in 0..10 {
            assert_eq!(
                a.select_move(&board, Player::X).unwrap(),
                b.select_move(&board, Player::X).unwrap()
            );
        }
    }

    #[test]
    fn test_human_agent_reprompts_until_valid() {
        let board = Board::from_string("X--------").unwrap();
        let input = Cursor::new("abc\n0\n9\n4\n");
        let mut output = Vec::new();
        let position = HumanAgent::new(input, &mut output)
            .select_move(&board, Player::O)
            .unwrap();
        assert_eq!(position, 4);

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("between 0 and 8"));
        assert!(transcript.contains("Cell 0 is not available"));
        assert!(transcript.contains("Cell 9 is not available"));
    }

    #[test]
    fn test_human_agent_eof_is_an_error() {
        let mut agent = HumanAgent::new(Cursor::new(""), Vec::new());
        assert!(matches!(
            agent.select_move(&Board::new(), Player::X),
            Err(Error::Io { .. })
        ));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Minimax".parse::<OpponentKind>().unwrap(), OpponentKind::Minimax);
        assert!("perfect".parse::<OpponentKind>().is_err());
        assert_eq!("q-learning".parse::<AgentKind>().unwrap(), AgentKind::QLearning);
        assert_eq!("human".parse::<AgentKind>().unwrap(), AgentKind::Human);
    }

    #[test]
    fn test_qlearning_kind_plays_greedily_from_table() {
        let mut table = QTable::new();
        let board = Board::new();
        table.set(&board.state_key(), 7, 0.9);
        let mut agent = AgentKind::QLearning.build(&table, Some(3));
        for _ in 0..20 {
            assert_eq!(agent.select_move(&board, Player::X).unwrap(), 7);
        }
    }
}
