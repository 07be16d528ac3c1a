//! End-to-end runs of the train and evaluate commands

use clap::Parser;
use qttt::{
    cli::commands::{
        evaluate::{self, EvaluateArgs},
        play::{self, PlayArgs},
        train::{TrainArgs, run},
    },
    pipeline::{CsvHistoryObserver, TrainingResult},
};
use tempfile::tempdir;

#[test]
fn train_writes_table_history_and_summary() {
    let tmp = tempdir().unwrap();
    let q_table = tmp.path().join("q_table.json");
    let history = tmp.path().join("history").join("history.csv");
    let summary = tmp.path().join("summary.json");

    let args = TrainArgs::parse_from([
        "qttt-train",
        "--opponent",
        "random",
        "--episodes",
        "40",
        "--symbol",
        "O",
        "--seed",
        "7",
        "--epsilon",
        "0.5",
        "--no-progress",
        "--q-table",
        q_table.to_str().unwrap(),
        "--history",
        history.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
    ]);
    let result = run(args).expect("training should succeed");

    assert_eq!(result.episodes, 40);
    assert!(q_table.exists());
    assert_eq!(TrainingResult::load(&summary).unwrap(), result);

    let rows = CsvHistoryObserver::read(&history).unwrap();
    assert_eq!(rows.len(), 40);
    let last = rows.last().unwrap();
    assert_eq!(last.episode, 40);
    assert_eq!(last.wins + last.draws + last.losses, 40);
    assert_eq!(last.epsilon, result.final_epsilon);
}

#[test]
fn second_run_continues_from_saved_table() {
    let tmp = tempdir().unwrap();
    let q_table = tmp.path().join("q_table.json");
    let args = |seed: &str| {
        TrainArgs::parse_from([
            "qttt-train",
            "--episodes",
            "20",
            "--seed",
            seed,
            "--no-progress",
            "--no-history",
            "--q-table",
            q_table.to_str().unwrap(),
        ])
    };

    run(args("1")).unwrap();
    let first = std::fs::read_to_string(&q_table).unwrap();
    run(args("2")).unwrap();
    let second = std::fs::read_to_string(&q_table).unwrap();

    let first: serde_json::Value = serde_json::from_str(&first).unwrap();
    let second: serde_json::Value = serde_json::from_str(&second).unwrap();
    // States learned in the first run are still present
    for state in first.as_object().unwrap().keys() {
        assert!(second.get(state).is_some(), "lost state {state}");
    }
}

#[test]
fn settings_file_is_overridden_by_flags() {
    let tmp = tempdir().unwrap();
    let settings = tmp.path().join("settings.toml");
    std::fs::write(
        &settings,
        "[agent]\nepsilon = 1.0\nepsilon_decay = 0.5\nmin_epsilon = 0.0\n\n[training]\nepisodes = 3\n",
    )
    .unwrap();

    let args = TrainArgs::parse_from([
        "qttt-train",
        "--config",
        settings.to_str().unwrap(),
        "--episodes",
        "2",
        "--no-progress",
        "--no-history",
        "--q-table",
        tmp.path().join("q.json").to_str().unwrap(),
    ]);
    let result = run(args).unwrap();

    assert_eq!(result.episodes, 2);
    assert_eq!(result.final_epsilon, 0.25);
}

#[test]
fn invalid_hyperparameters_are_rejected() {
    let tmp = tempdir().unwrap();
    let args = TrainArgs::parse_from([
        "qttt-train",
        "--alpha",
        "-0.5",
        "--no-progress",
        "--no-history",
        "--q-table",
        tmp.path().join("q.json").to_str().unwrap(),
    ]);
    let err = run(args).unwrap_err();
    assert!(format!("{err:#}").contains("learning_rate"));
}

#[test]
fn evaluate_and_play_run_without_a_table() {
    let tmp = tempdir().unwrap();
    let q_table = tmp.path().join("missing.json");

    let args = EvaluateArgs::parse_from([
        "qttt-evaluate",
        "--opponent",
        "random",
        "--games",
        "5",
        "--seed",
        "3",
        "--q-table",
        q_table.to_str().unwrap(),
    ]);
    let result = evaluate::run(&args).unwrap();
    assert_eq!(result.games, 5);

    let args = PlayArgs::parse_from([
        "qttt-play",
        "--x",
        "minimax",
        "--o",
        "minimax",
        "--games",
        "2",
        "--q-table",
        q_table.to_str().unwrap(),
    ]);
    let score = play::run(&args).unwrap();
    assert_eq!(score.draws, 2);
}
