//! Properties of the exhaustive minimax player

mod common;

use qttt::{
    minimax::MinimaxAgent,
    pipeline::play_match,
    ports::Agent,
    tictactoe::{Board, GameOutcome, Player},
};

/// Let the opponent try every legal reply at every turn and check that the
/// minimax side never ends up losing.
fn never_loses(board: Board, to_move: Player, minimax_mark: Player, agent: &mut MinimaxAgent) {
    match board.outcome() {
        GameOutcome::Win(winner) => {
            assert_eq!(winner, minimax_mark, "minimax lost on {board}");
            return;
        }
        GameOutcome::Draw => return,
        GameOutcome::Ongoing => {}
    }

    if to_move == minimax_mark {
        let position = agent.select_move(&board, to_move).unwrap();
        assert!(board.available_moves().contains(&position));
        let mut next = board;
        next.apply_move(position, to_move).unwrap();
        never_loses(next, to_move.opponent(), minimax_mark, agent);
    } else {
        for position in board.available_moves() {
            let mut next = board;
            next.apply_move(position, to_move).unwrap();
            never_loses(next, to_move.opponent(), minimax_mark, agent);
        }
    }
}

#[test]
fn minimax_as_x_never_loses_against_any_opponent() {
    never_loses(Board::new(), Player::X, Player::X, &mut MinimaxAgent::new());
}

#[test]
fn minimax_as_o_never_loses_against_any_opponent() {
    never_loses(Board::new(), Player::X, Player::O, &mut MinimaxAgent::new());
}

#[test]
fn minimax_as_x_never_loses_when_o_opens() {
    // During training the learner opens even when it plays O
    never_loses(Board::new(), Player::O, Player::X, &mut MinimaxAgent::new());
}

#[test]
fn minimax_self_play_is_a_draw() {
    let record = play_match(&mut MinimaxAgent::new(), &mut MinimaxAgent::new(), &mut []).unwrap();
    assert_eq!(record.outcome, GameOutcome::Draw);
    assert_eq!(record.moves.len(), 9);
    assert!(record.winning_line.is_empty());
}

#[test]
fn minimax_completes_top_row() {
    let mut board = Board::from_string("XX-OO----").unwrap();
    assert_eq!(board.available_moves(), vec![2, 5, 6, 7, 8]);

    let position = MinimaxAgent::new().best_move(&board, Player::X, Player::O).unwrap();
    assert_eq!(position, 2);

    board.apply_move(position, Player::X).unwrap();
    assert_eq!(board.outcome(), GameOutcome::Win(Player::X));
    assert_eq!(board.winning_line(), Some(&[0, 1, 2][..]));
}

#[test]
fn minimax_beats_a_naive_player() {
    let mut naive = common::FirstFreeAgent;
    let record = play_match(&mut MinimaxAgent::new(), &mut naive, &mut []).unwrap();
    assert_eq!(record.outcome, GameOutcome::Win(Player::X));
}

#[test]
fn minimax_is_deterministic() {
    let board = Board::from_string("X-------O").unwrap();
    let agent = MinimaxAgent::new();
    let first = agent.best_move(&board, Player::X, Player::O).unwrap();
    for _ in 0..5 {
        assert_eq!(agent.best_move(&board, Player::X, Player::O).unwrap(), first);
    }
}
