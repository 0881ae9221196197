//! Players, orientations and win detection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord, Side, Tag};
use crate::connectivity::{exists_path, find_path, ReachabilityQuery, TagSet};

/// Player identity. `A` plays the vertical orientation and moves first by
/// default; `B` plays the lateral one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    A = 0,
    B = 1,
}

impl Player {
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    pub fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Player::A => Orientation::Vertical,
            Player::B => Orientation::Lateral,
        }
    }

    /// Board symbol
    pub fn symbol(self) -> char {
        match self {
            Player::A => 'X',
            Player::B => 'O',
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::A => write!(f, "Player A"),
            Player::B => write!(f, "Player B"),
        }
    }
}

/// Which pair of opposite borders a player must connect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// North to South
    Vertical,
    /// West to East
    Lateral,
}

impl Orientation {
    pub fn sides(self) -> (Side, Side) {
        match self {
            Orientation::Vertical => (Side::North, Side::South),
            Orientation::Lateral => (Side::West, Side::East),
        }
    }
}

/// Query that holds exactly when `player` has connected their borders
pub fn win_query(board: &Board, player: Player) -> ReachabilityQuery {
    let (from, to) = player.orientation().sides();
    let forbidden = TagSet::of(&[Tag::Empty, Tag::Owned(player.opponent())]);
    ReachabilityQuery::between_sides(board, from, to, forbidden)
}

pub fn has_won(board: &Board, player: Player) -> bool {
    exists_path(board, &win_query(board, player))
}

/// Chain of `player`'s cells joining their borders
pub fn winning_path(board: &Board, player: Player) -> Option<Vec<Coord>> {
    find_path(board, &win_query(board, player))
}

/// Check both players. On a legal position at most one can be connected.
pub fn winner(board: &Board) -> Option<Player> {
    Player::ALL.into_iter().find(|&player| has_won(board, player))
}
