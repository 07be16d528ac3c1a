//! Output formatting for CLI

use std::io::{self, Write};

use crate::{
    Result,
    pipeline::{MatchRecord, Observer},
    ports::MoveEvent,
    tictactoe::GameOutcome,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(40));
    println!("{title}");
    println!("{}", "=".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Percentage of `part` in `total`, 0 when `total` is 0
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// One-line description of a finished match
pub fn describe_outcome(record: &MatchRecord) -> String {
    match record.outcome {
        GameOutcome::Win(winner) => {
            format!("{winner} wins along {:?}", record.winning_line)
        }
        GameOutcome::Draw => "Draw".to_string(),
        GameOutcome::Ongoing => "Unfinished".to_string(),
    }
}

/// Prints the board after every move of a match
pub struct BoardPrinter<W> {
    out: W,
}

impl BoardPrinter<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> BoardPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Observer for BoardPrinter<W> {
    fn on_move(&mut self, event: &MoveEvent) -> Result<()> {
        writeln!(
            self.out,
            "\n{} plays {}\n{}",
            event.player,
            event.position,
            event.board.pretty()
        )?;
        Ok(())
    }
}
