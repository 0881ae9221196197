//! Error types for game play and configuration

use std::path::PathBuf;

use crate::board::Coord;
use crate::rules::Player;

/// A rejected move or decision. The board is never touched when one of
/// these is returned, so the caller can simply ask again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("coordinate {coord} is outside the {border_length}x{border_length} board")]
    OutOfBounds { coord: Coord, border_length: usize },

    #[error("cell {0} is already occupied")]
    Occupied(Coord),

    #[error("the game is over, {0} has won")]
    Finished(Player),

    #[error("{0} must decide whether to swap first")]
    SwapDecisionPending(Player),

    #[error("no swap decision is pending")]
    NoSwapDecision,

    #[error("the swap rule cannot be used now")]
    SwapUnavailable,
}

/// Invalid or unreadable game configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("border length {value} must be within {min}..={max}")]
    BorderLength { value: usize, min: usize, max: usize },

    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON")]
    Json(#[from] serde_json::Error),
}
