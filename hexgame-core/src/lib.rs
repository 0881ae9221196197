//! hexgame core - Hex rules engine
//!
//! This crate provides the game logic for Hex:
//! - Board geometry (N×N rhombus with hex adjacency)
//! - Tag-restricted border reachability
//! - Win detection per orientation
//! - Turn order and the swap rule
//! - Game configuration

pub mod board;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod game;
pub mod rules;

// Re-exports for convenient access
pub use board::{Board, Coord, Side, Tag, DIRECTIONS, MAX_BORDER_LENGTH, MIN_BORDER_LENGTH};
pub use config::GameConfig;
pub use connectivity::{exists_path, find_path, ReachabilityQuery, TagSet};
pub use error::{ConfigError, GameError};
pub use game::{Action, GameEngine, Move, Phase, Turn};
pub use rules::{has_won, winner, winning_path, Orientation, Player};
