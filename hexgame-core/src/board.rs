//! Hex board geometry with row/column coordinates
//!
//! Rows grow downwards and columns grow to the right. Every row is shifted
//! half a cell to the right of the row above it, which is what makes the
//! rhombus of cells a hex grid:
//!
//! ```text
//!  0,0   0,1   0,2
//!     1,0   1,1   1,2
//!        2,0   2,1   2,2
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::rules::Player;

/// Smallest board the game is played on
pub const MIN_BORDER_LENGTH: usize = 3;

/// Largest board accepted by the constructor
pub const MAX_BORDER_LENGTH: usize = 19;

/// Neighbour offsets (d_row, d_col) of an interior cell
/// Index: 0=N, 1=NE, 2=W, 3=E, 4=SW, 5=S
pub const DIRECTIONS: [(i8, i8); 6] = [
    (-1, 0), // N
    (-1, 1), // NE
    (0, -1), // W
    (0, 1),  // E
    (1, -1), // SW
    (1, 0),  // S
];

// ============================================================================
// COORDINATES AND TAGS
// ============================================================================

/// Cell coordinate on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Ownership tag of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    #[default]
    Empty,
    Owned(Player),
}

impl Tag {
    pub fn owner(self) -> Option<Player> {
        match self {
            Tag::Empty => None,
            Tag::Owned(player) => Some(player),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Tag::Empty
    }

    /// Bit used by `TagSet`
    pub(crate) fn bit(self) -> u8 {
        match self {
            Tag::Empty => 0b001,
            Tag::Owned(Player::A) => 0b010,
            Tag::Owned(Player::B) => 0b100,
        }
    }
}

impl From<Player> for Tag {
    fn from(player: Player) -> Self {
        Tag::Owned(player)
    }
}

/// One of the four board borders
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Row 0
    North,
    /// Last row
    South,
    /// Column 0
    West,
    /// Last column
    East,
}

// ============================================================================
// BOARD
// ============================================================================

/// N×N hex board: fixed adjacency plus one mutable tag per cell.
///
/// Cloning copies the tags; the adjacency lists never change after
/// construction and are shared between clones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    border_length: usize,
    adjacency: Arc<[Vec<usize>]>,
    tags: Vec<Tag>,
}

impl Board {
    /// Create an empty board.
    ///
    /// # Panics
    /// If `border_length` is zero or larger than `MAX_BORDER_LENGTH`.
    pub fn new(border_length: usize) -> Self {
        assert!(
            (1..=MAX_BORDER_LENGTH).contains(&border_length),
            "border length {} out of range 1..={}",
            border_length,
            MAX_BORDER_LENGTH
        );

        Self {
            border_length,
            adjacency: build_adjacency(border_length).into(),
            tags: vec![Tag::Empty; border_length * border_length],
        }
    }

    pub fn border_length(&self) -> usize {
        self.border_length
    }

    pub fn cell_count(&self) -> usize {
        self.tags.len()
    }

    /// Check if a coordinate lies on this board
    pub fn contains(&self, coord: Coord) -> bool {
        (coord.row as usize) < self.border_length && (coord.col as usize) < self.border_length
    }

    /// Row-major index of an on-board coordinate
    pub fn index_of(&self, coord: Coord) -> usize {
        debug_assert!(self.contains(coord), "{} is off the board", coord);
        coord.row as usize * self.border_length + coord.col as usize
    }

    pub fn coord_of(&self, index: usize) -> Coord {
        Coord::new(
            (index / self.border_length) as u8,
            (index % self.border_length) as u8,
        )
    }

    /// Neighbours of a cell, in `DIRECTIONS` order
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.adjacency[self.index_of(coord)]
            .iter()
            .map(move |&index| self.coord_of(index))
    }

    pub fn neighbor_indices(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    pub fn tag(&self, coord: Coord) -> Tag {
        self.tags[self.index_of(coord)]
    }

    pub fn tag_at(&self, index: usize) -> Tag {
        self.tags[index]
    }

    /// Overwrite a tag, returning the previous one. Legality is the caller's
    /// business.
    pub fn set_tag(&mut self, coord: Coord, tag: Tag) -> Tag {
        let index = self.index_of(coord);
        self.set_tag_at(index, tag)
    }

    pub fn set_tag_at(&mut self, index: usize, tag: Tag) -> Tag {
        std::mem::replace(&mut self.tags[index], tag)
    }

    /// Cells along one border, in row/column order
    pub fn side(&self, side: Side) -> impl Iterator<Item = Coord> {
        let n = self.border_length as u8;
        let last = n - 1;
        (0..n).map(move |i| match side {
            Side::North => Coord::new(0, i),
            Side::South => Coord::new(last, i),
            Side::West => Coord::new(i, 0),
            Side::East => Coord::new(i, last),
        })
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> Vec<Coord> {
        self.empty_indices()
            .into_iter()
            .map(|index| self.coord_of(index))
            .collect()
    }

    pub fn empty_indices(&self) -> Vec<usize> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(_, tag)| tag.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.tags.iter().all(|tag| !tag.is_empty())
    }

    pub fn count(&self, tag: Tag) -> usize {
        self.tags.iter().filter(|&&t| t == tag).count()
    }

    /// Every cell with its tag, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Coord, Tag)> + '_ {
        self.tags
            .iter()
            .enumerate()
            .map(move |(index, &tag)| (self.coord_of(index), tag))
    }
}

fn build_adjacency(border_length: usize) -> Vec<Vec<usize>> {
    let n = border_length as i32;
    let mut adjacency = Vec::with_capacity(border_length * border_length);

    for row in 0..n {
        for col in 0..n {
            let neighbors = DIRECTIONS
                .iter()
                .map(|&(dr, dc)| (row + dr as i32, col + dc as i32))
                .filter(|&(r, c)| (0..n).contains(&r) && (0..n).contains(&c))
                .map(|(r, c)| (r * n + c) as usize)
                .collect();
            adjacency.push(neighbors);
        }
    }

    adjacency
}
