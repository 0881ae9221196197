//! hexgame MCTS - flat Monte Carlo move selection
//!
//! This crate provides the computer opponent:
//! - Random playouts to a full board (with simulated swap decisions)
//! - Per-option win-rate estimation on a rayon worker pool
//! - Highest-win-rate selection, swap included as a candidate

mod bot;
mod error;
mod rollout;

pub use bot::{Decision, MonteCarloBot, MoveStatistic};
pub use error::{BotError, RolloutError};
pub use rollout::{simulate, simulate_with_order, RolloutContext};

use serde::{Deserialize, Serialize};

/// Monte Carlo configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloConfig {
    /// Rollouts per candidate action
    pub trials_per_option: u32,
    /// Chance that a simulated second mover takes the swap
    pub swap_probability: f64,
    /// Spread the trials of each option over worker threads
    pub parallel: bool,
    /// Size of a dedicated worker pool (None = rayon's global pool)
    pub threads: Option<usize>,
    /// Random seed for reproducibility (None = from entropy)
    pub seed: Option<u64>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials_per_option: 750,
            swap_probability: 0.5,
            parallel: true,
            threads: None,
            seed: None,
        }
    }
}

impl MonteCarloConfig {
    /// Config with the given number of trials per option
    pub fn new(trials_per_option: u32) -> Self {
        Self {
            trials_per_option,
            ..Default::default()
        }
    }

    /// Single-threaded evaluation
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_swap_probability(mut self, probability: f64) -> Self {
        self.swap_probability = probability;
        self
    }

    pub fn validate(&self) -> Result<(), BotError> {
        if self.trials_per_option == 0 {
            return Err(BotError::InvalidConfig(
                "trials_per_option must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.swap_probability) {
            return Err(BotError::InvalidConfig(format!(
                "swap_probability {} is not within [0, 1]",
                self.swap_probability
            )));
        }
        if self.threads == Some(0) {
            return Err(BotError::InvalidConfig(
                "threads must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
