//! Observer implementations for training runs
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::{File, OpenOptions},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::{EpisodeRecord, TrainingResult};
use crate::{
    Error, Result,
    ports::{MoveEvent, Observer},
    tictactoe::{Board, EpisodeResult},
};

/// Progress bar observer - shows W/D/L and the exploration rate
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self { progress_bar: None }
    }

    fn message(record: &EpisodeRecord) -> String {
        format!(
            "W:{} D:{} L:{} ε:{:.4}",
            record.wins, record.draws, record.losses, record.epsilon
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(record.episode as u64);
            pb.set_message(Self::message(record));
        }
        Ok(())
    }

    fn on_training_end(&mut self, result: &TrainingResult) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "W:{} D:{} L:{} ε:{:.4}",
                result.wins, result.draws, result.losses, result.final_epsilon
            ));
        }
        Ok(())
    }
}

/// One row of the history file
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
    pub episode: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub epsilon: f64,
}

impl From<&EpisodeRecord> for HistoryRow {
    fn from(record: &EpisodeRecord) -> Self {
        Self {
            episode: record.episode,
            wins: record.wins,
            draws: record.draws,
            losses: record.losses,
            epsilon: record.epsilon,
        }
    }
}

/// CSV observer - one row per completed episode
///
/// Columns: `episode,wins,draws,losses,epsilon`. Each row is flushed as it is
/// written so external monitors can tail the file.
pub struct CsvHistoryObserver {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvHistoryObserver {
    /// Start a new history file, replacing any existing one.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Append to an existing history file.
    ///
    /// The header is only written when the file is new or empty.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                operation: format!("create directory {}", parent.display()),
                source,
            })?;
        }

        let io_error = |source| Error::Io {
            operation: format!("open history {}", path.display()),
            source,
        };
        let file = if append {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(io_error)?
        } else {
            File::create(path).map_err(io_error)?
        };
        let has_rows = file.metadata().map_err(io_error)?.len() > 0;

        let writer = csv::WriterBuilder::new()
            .has_headers(!has_rows)
            .from_writer(file);
        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read a history file back.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<HistoryRow>> {
        let mut reader = csv::Reader::from_path(path)?;
        let rows = reader.deserialize().collect::<std::result::Result<_, _>>()?;
        Ok(rows)
    }
}

impl Observer for CsvHistoryObserver {
    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.writer.serialize(HistoryRow::from(record))?;
        self.writer.flush().map_err(|source| Error::Io {
            operation: format!("flush history {}", self.path.display()),
            source,
        })?;
        Ok(())
    }
}

/// Metrics observer - keeps every episode record in memory
#[derive(Default)]
pub struct MetricsObserver {
    records: Vec<EpisodeRecord>,
    move_counts: Vec<usize>,
    anomalies: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap in a shared handle so the caller can inspect it after handing a
    /// clone to the trainer.
    pub fn shared() -> SharedMetrics {
        SharedMetrics(Arc::new(Mutex::new(Self::new())))
    }

    pub fn records(&self) -> &[EpisodeRecord] {
        &self.records
    }

    pub fn anomalies(&self) -> usize {
        self.anomalies
    }

    fn count(&self, result: EpisodeResult) -> usize {
        self.records.iter().filter(|r| r.result == result).count()
    }

    fn rate(&self, result: EpisodeResult) -> f64 {
        if self.records.is_empty() {
            0.0
        } else {
            self.count(result) as f64 / self.records.len() as f64
        }
    }

    /// Get current win rate
    pub fn win_rate(&self) -> f64 {
        self.rate(EpisodeResult::Win)
    }

    /// Get current draw rate
    pub fn draw_rate(&self) -> f64 {
        self.rate(EpisodeResult::Draw)
    }

    /// Get current loss rate
    pub fn loss_rate(&self) -> f64 {
        self.rate(EpisodeResult::Loss)
    }

    /// Get average game length
    pub fn avg_game_length(&self) -> f64 {
        if self.move_counts.is_empty() {
            0.0
        } else {
            self.move_counts.iter().sum::<usize>() as f64 / self.move_counts.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.records.len(),
            wins: self.count(EpisodeResult::Win),
            draws: self.count(EpisodeResult::Draw),
            losses: self.count(EpisodeResult::Loss),
            anomalies: self.anomalies,
            win_rate: self.win_rate(),
            draw_rate: self.draw_rate(),
            loss_rate: self.loss_rate(),
            avg_game_length: self.avg_game_length(),
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub anomalies: usize,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_game_length: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.move_counts.push(0);
        Ok(())
    }

    fn on_move(&mut self, _event: &MoveEvent) -> Result<()> {
        if let Some(last) = self.move_counts.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_anomaly(&mut self, _record: &EpisodeRecord, _board: &Board) -> Result<()> {
        self.anomalies += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Cloneable handle to a [`MetricsObserver`]
#[derive(Clone, Default)]
pub struct SharedMetrics(Arc<Mutex<MetricsObserver>>);

impl SharedMetrics {
    /// Lock the underlying observer for inspection
    pub fn lock(&self) -> MutexGuard<'_, MetricsObserver> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer for SharedMetrics {
    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        self.lock().on_episode_start(episode)
    }

    fn on_move(&mut self, event: &MoveEvent) -> Result<()> {
        self.lock().on_move(event)
    }

    fn on_anomaly(&mut self, record: &EpisodeRecord, board: &Board) -> Result<()> {
        self.lock().on_anomaly(record, board)
    }

    fn on_episode_end(&mut self, record: &EpisodeRecord) -> Result<()> {
        self.lock().on_episode_end(record)
    }
}
