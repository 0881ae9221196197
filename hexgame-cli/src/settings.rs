//! Settings shared by every command
//!
//! A settings file holds an optional `game` section (`GameConfig`) and an
//! optional `bot` section (`MonteCarloConfig`). Command-line flags are
//! applied on top, then the result is validated.
//!
//! ```json
//! { "game": { "border_length": 9, "swap_rule": false },
//!   "bot": { "trials_per_option": 300, "seed": 7 } }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};

use hexgame_core::GameConfig;
use hexgame_mcts::MonteCarloConfig;

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args, Clone, Debug, Default)]
pub struct SharedArgs {
    /// JSON settings file with optional "game" and "bot" sections
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board border length
    #[arg(long)]
    pub size: Option<usize>,

    /// Rollouts per candidate move
    #[arg(long)]
    pub trials: Option<u32>,

    /// Random seed for reproducible bot play
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the swap rule
    #[arg(long)]
    pub no_swap: bool,

    /// Worker threads for rollouts (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,
}

impl SharedArgs {
    /// File settings (or defaults) with the flags applied
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };

        if let Some(size) = self.size {
            settings.game.border_length = size;
        }
        if self.no_swap {
            settings.game.swap_rule = false;
        }
        if let Some(trials) = self.trials {
            settings.bot.trials_per_option = trials;
        }
        if let Some(seed) = self.seed {
            settings.bot.seed = Some(seed);
        }
        if let Some(threads) = self.threads {
            settings.bot.threads = Some(threads);
        }

        settings.validate()?;
        Ok(settings)
    }
}

// ============================================================================
// SETTINGS FILE
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameConfig,
    pub bot: MonteCarloConfig,
}

impl Settings {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Malformed settings JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.game.validate().context("Invalid game settings")?;
        self.bot.validate().context("Invalid bot settings")?;
        Ok(())
    }
}
