//! Configuration types for agents and training runs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, pipeline::TrainingConfig, tictactoe::EpisodeResult};

/// Hyperparameters of the tabular Q-learning agent.
///
/// # Examples
///
/// ```
/// use qttt::config::QLearningConfig;
///
/// let config = QLearningConfig::default()
///     .with_learning_rate(0.3)
///     .with_epsilon(1.0)
///     .with_epsilon_decay(0.999)
///     .with_min_epsilon(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearningConfig {
    /// α, step size of the temporal-difference update
    pub learning_rate: f64,
    /// γ, weight of the bootstrapped next-state value
    pub discount_factor: f64,
    /// Starting exploration rate
    pub epsilon: f64,
    /// Multiplicative decay applied once per episode
    pub epsilon_decay: f64,
    /// Floor for the exploration rate
    pub min_epsilon: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount_factor: 0.9,
            epsilon: 0.01,
            epsilon_decay: 0.995,
            min_epsilon: 0.01,
        }
    }
}

impl QLearningConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    /// Check that every parameter lies in its meaningful range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        fn check(name: &str, value: f64, ok: bool) -> Result<()> {
            if value.is_finite() && ok {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration {
                    message: format!("{name} = {value} is out of range"),
                })
            }
        }

        check(
            "learning_rate",
            self.learning_rate,
            self.learning_rate > 0.0 && self.learning_rate <= 1.0,
        )?;
        check(
            "discount_factor",
            self.discount_factor,
            (0.0..=1.0).contains(&self.discount_factor),
        )?;
        check("epsilon", self.epsilon, (0.0..=1.0).contains(&self.epsilon))?;
        check(
            "epsilon_decay",
            self.epsilon_decay,
            self.epsilon_decay > 0.0 && self.epsilon_decay <= 1.0,
        )?;
        check(
            "min_epsilon",
            self.min_epsilon,
            (0.0..=1.0).contains(&self.min_epsilon),
        )
    }
}

/// Terminal rewards from the learning agent's perspective.
///
/// Non-terminal transitions always receive 0.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardScheme {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl Default for RewardScheme {
    fn default() -> Self {
        Self {
            win: 1.0,
            draw: 0.5,
            loss: -1.0,
        }
    }
}

impl RewardScheme {
    pub fn for_result(&self, result: EpisodeResult) -> f64 {
        match result {
            EpisodeResult::Win => self.win,
            EpisodeResult::Draw => self.draw,
            EpisodeResult::Loss => self.loss,
        }
    }
}

/// Settings file layout.
///
/// ```toml
/// [agent]
/// learning_rate = 0.5
/// epsilon = 1.0
///
/// [training]
/// episodes = 20000
/// opponent = "minimax"
/// agent_player = "O"
///
/// [training.rewards]
/// draw = 0.25
/// ```
///
/// Every key is optional; missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub agent: QLearningConfig,
    pub training: TrainingConfig,
}

impl Settings {
    /// Parse settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid settings TOML.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`]
    /// if it cannot be parsed.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read settings file {}", path.display()),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Validate agent and training sections.
    pub fn validate(&self) -> Result<()> {
        self.agent.validate()?;
        self.training.validate()
    }
}
