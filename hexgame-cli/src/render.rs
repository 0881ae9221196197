//! ASCII board rendering
//!
//! The rhombus is drawn row by row, each row shifted right by one cell so
//! that the hex adjacency reads off the diagram:
//!
//! ```text
//!       x   x   x
//!       0   1   2
//! o  0  . - . - .  0  o
//!        \ / \ / \
//!   o  1  . - X - .  1  o
//!          \ / \ / \
//!     o  2  . - O - .  2  o
//!           0   1   2
//!           x   x   x
//! ```
//!
//! `x` marks the borders Player A joins, `o` those of Player B.

use std::fmt;

use hexgame_core::{Board, Coord, Tag};

const EMPTY_CELL: char = '.';
const PATH_CELL: char = '*';

/// Printable view of a board, optionally marking a set of cells
pub struct BoardView<'a> {
    board: &'a Board,
    highlight: &'a [Coord],
}

impl<'a> BoardView<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            highlight: &[],
        }
    }

    /// Draw `cells` (typically a winning chain) as `*`
    pub fn with_highlight(mut self, cells: &'a [Coord]) -> Self {
        self.highlight = cells;
        self
    }

    fn symbol(&self, coord: Coord, tag: Tag) -> char {
        if self.highlight.contains(&coord) {
            return PATH_CELL;
        }
        match tag {
            Tag::Empty => EMPTY_CELL,
            Tag::Owned(player) => player.symbol(),
        }
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.board.border_length();
        let marks = vec!["x"; n].join("   ");
        let numbers = (0..n)
            .map(|col| format!("{:2}", col))
            .collect::<Vec<_>>()
            .join("  ");

        writeln!(f, "      {}", marks)?;
        writeln!(f, "     {}", numbers)?;

        let symbols: Vec<String> = self
            .board
            .cells()
            .map(|(coord, tag)| self.symbol(coord, tag).to_string())
            .collect();

        for (row, line) in symbols.chunks(n).enumerate() {
            let cells = line.join(" - ");
            writeln!(f, "{}o {:2}  {} {:2}  o", "  ".repeat(row), row, cells, row)?;

            if row + 1 < n {
                writeln!(f, "{}     {}\\", "  ".repeat(row + 1), "\\ / ".repeat(n - 1))?;
            }
        }

        let indent = "  ".repeat(n - 1);
        writeln!(f, "{}     {}", indent, numbers)?;
        write!(f, "{}      {}", indent, marks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexgame_core::Player;

    #[test]
    fn test_line_count() {
        for n in 3..=9 {
            let board = Board::new(n);
            let text = BoardView::new(&board).to_string();
            // two header lines, n cell rows, n - 1 link rows, two footer lines
            assert_eq!(text.lines().count(), 2 * n + 3, "size {}", n);
        }
    }

    #[test]
    fn test_empty_board_has_only_dots() {
        let board = Board::new(4);
        let text = BoardView::new(&board).to_string();
        assert_eq!(text.matches(EMPTY_CELL).count(), 16);
        assert!(!text.contains('X'));
        assert!(!text.contains('O'));
    }

    #[test]
    fn test_cells_drawn_in_their_row() {
        let mut board = Board::new(3);
        board.set_tag(Coord::new(1, 1), Tag::Owned(Player::A));
        board.set_tag(Coord::new(2, 0), Tag::Owned(Player::B));
        let text = BoardView::new(&board).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[2], "o  0  . - . - .  0  o");
        assert_eq!(lines[4], "  o  1  . - X - .  1  o");
        assert_eq!(lines[6], "    o  2  O - . - .  2  o");
    }

    #[test]
    fn test_highlight_overrides_symbol() {
        let mut board = Board::new(3);
        let path = [Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 0)];
        for &coord in &path {
            board.set_tag(coord, Tag::Owned(Player::A));
        }
        let text = BoardView::new(&board).with_highlight(&path).to_string();
        assert_eq!(text.matches(PATH_CELL).count(), 3);
        assert!(!text.contains('X'));
    }
}
