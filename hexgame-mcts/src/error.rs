//! Error types for rollouts and move selection

use hexgame_core::{Coord, GameError};

/// A rollout that could not produce exactly one winner.
///
/// These indicate a bookkeeping defect, never bad input from a player;
/// the trial is abandoned and only its private board copy is affected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RolloutError {
    #[error("forced move {0} is not an empty cell of the board")]
    IllegalForcedMove(Coord),

    #[error("swap requested but no opening move was recorded")]
    NoOpeningMove,

    #[error("rollout ended with {empty} empty cells")]
    BoardNotFull { empty: usize },

    #[error("rollout ended on a full board without a winner")]
    NoWinner,

    #[error("rollout ended with both players connected")]
    TwoWinners,
}

/// Errors from the Monte Carlo bot
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("no legal move to evaluate")]
    NoLegalMoves,

    #[error("the game is already over")]
    GameOver,

    #[error("move evaluation was cancelled")]
    Cancelled,

    #[error("invalid bot configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Rollout(#[from] RolloutError),

    #[error("engine rejected the bot's action: {0}")]
    Game(#[from] GameError),
}
