//! Single games between arbitrary agents, and greedy evaluation
//!
//! Nothing here learns. Matches drive two [`Agent`]s over a fresh board and
//! report every move to the observers.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{Agent, MoveEvent, Observer},
    q_learning::QLearningAgent,
    tictactoe::{Board, EpisodeResult, GameOutcome, Move, Player},
};

/// A finished game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Moves in play order
    pub moves: Vec<Move>,
    /// Final outcome, never `Ongoing`
    pub outcome: GameOutcome,
    /// Decisive line, empty on a draw
    pub winning_line: Vec<usize>,
    /// Final position
    pub board: Board,
}

/// Play one standard game, X moving first.
///
/// # Examples
///
/// ```
/// use qttt::{minimax::MinimaxAgent, pipeline::play_match, tictactoe::GameOutcome};
///
/// let record = play_match(&mut MinimaxAgent::new(), &mut MinimaxAgent::new(), &mut [])?;
/// assert_eq!(record.outcome, GameOutcome::Draw);
/// assert!(record.winning_line.is_empty());
/// # Ok::<(), qttt::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::IllegalAgentMove`] if either agent proposes a move that
/// is not legal, and any error raised by an agent or observer.
pub fn play_match(
    x: &mut dyn Agent,
    o: &mut dyn Agent,
    observers: &mut [&mut dyn Observer],
) -> Result<MatchRecord> {
    play_game(Player::X, x, o, 0, observers)
}

/// Play one game where `first` opens. `game` is reported in move events.
pub(crate) fn play_game(
    first: Player,
    x: &mut dyn Agent,
    o: &mut dyn Agent,
    game: usize,
    observers: &mut [&mut dyn Observer],
) -> Result<MatchRecord> {
    let mut board = Board::new();
    let mut moves = Vec::new();
    let mut to_move = first;

    while !board.is_terminal() {
        let agent: &mut dyn Agent = match to_move {
            Player::X => &mut *x,
            Player::O => &mut *o,
        };

        let position = agent.select_move(&board, to_move)?;
        if let Err(err) = board.apply_move(position, to_move) {
            tracing::error!(
                agent = agent.name(),
                position,
                board = %board.state_key(),
                error = %err,
                "illegal move in match"
            );
            return Err(Error::IllegalAgentMove {
                agent: agent.name().to_string(),
                position,
                episode: game,
            });
        }

        let event = MoveEvent {
            episode: game,
            step: moves.len(),
            player: to_move,
            position,
            board,
            by_learner: false,
        };
        for observer in observers.iter_mut() {
            observer.on_move(&event)?;
        }

        moves.push(Move {
            position,
            player: to_move,
        });
        to_move = to_move.opponent();
    }

    Ok(MatchRecord {
        moves,
        outcome: board.outcome(),
        winning_line: board.winning_line().unwrap_or_default().to_vec(),
        board,
    })
}

/// Win/draw/loss counts from one side's perspective
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub games: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl EvaluationResult {
    fn record(&mut self, result: EpisodeResult) {
        self.games += 1;
        match result {
            EpisodeResult::Win => self.wins += 1,
            EpisodeResult::Draw => self.draws += 1,
            EpisodeResult::Loss => self.losses += 1,
        }
    }

    /// Fraction of games not lost
    pub fn non_loss_rate(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            (self.wins + self.draws) as f64 / self.games as f64
        }
    }
}

/// Play `games` games of the greedy policy of `agent` against `opponent`.
///
/// The agent does not explore or learn. Games use the training move order:
/// the agent opens as `agent_player`.
pub fn evaluate(
    agent: &QLearningAgent,
    opponent: &mut dyn Agent,
    agent_player: Player,
    games: usize,
) -> Result<EvaluationResult> {
    let mut greedy = agent.greedy();
    let mut result = EvaluationResult::default();

    for game in 1..=games {
        let record = match agent_player {
            Player::X => play_game(agent_player, &mut greedy, opponent, game, &mut [])?,
            Player::O => play_game(agent_player, opponent, &mut greedy, game, &mut [])?,
        };
        if let Some(outcome) = record.outcome.result_for(agent_player) {
            result.record(outcome);
        }
    }

    tracing::info!(
        games = result.games,
        wins = result.wins,
        draws = result.draws,
        losses = result.losses,
        "evaluation complete"
    );
    Ok(result)
}
