//! Border-to-border reachability over tag-restricted cells

use std::collections::VecDeque;

use crate::board::{Board, Coord, Side, Tag};

/// Small set of tags, used as the forbidden set of a query
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TagSet(u8);

impl TagSet {
    pub const EMPTY: TagSet = TagSet(0);

    pub fn of(tags: &[Tag]) -> Self {
        tags.iter().fold(Self::EMPTY, |set, &tag| set.with(tag))
    }

    pub fn with(self, tag: Tag) -> Self {
        TagSet(self.0 | tag.bit())
    }

    pub fn contains(self, tag: Tag) -> bool {
        self.0 & tag.bit() != 0
    }
}

/// Does any source reach any destination without touching a forbidden tag?
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReachabilityQuery {
    pub sources: Vec<Coord>,
    pub destinations: Vec<Coord>,
    pub forbidden: TagSet,
}

impl ReachabilityQuery {
    pub fn new(sources: Vec<Coord>, destinations: Vec<Coord>, forbidden: TagSet) -> Self {
        Self {
            sources,
            destinations,
            forbidden,
        }
    }

    /// Query between every cell of two borders
    pub fn between_sides(board: &Board, from: Side, to: Side, forbidden: TagSet) -> Self {
        Self::new(
            board.side(from).collect(),
            board.side(to).collect(),
            forbidden,
        )
    }
}

/// Check whether the query is satisfied on the current tags
pub fn exists_path(board: &Board, query: &ReachabilityQuery) -> bool {
    search(board, query, false).is_some()
}

/// Find one source-to-destination chain (source first), if any exists.
///
/// The chain is a shortest one in cell count, though callers should only
/// rely on it being connected.
pub fn find_path(board: &Board, query: &ReachabilityQuery) -> Option<Vec<Coord>> {
    search(board, query, true)
}

/// Multi-source BFS. Query cells off the board are ignored. Returns the reached path when `track_path` is set,
/// otherwise an empty vector on success.
fn search(board: &Board, query: &ReachabilityQuery, track_path: bool) -> Option<Vec<Coord>> {
    let passable = |index: usize| !query.forbidden.contains(board.tag_at(index));

    let mut is_destination = vec![false; board.cell_count()];
    let mut any_destination = false;
    for &coord in query.destinations.iter().filter(|&&c| board.contains(c)) {
        let index = board.index_of(coord);
        if passable(index) {
            is_destination[index] = true;
            any_destination = true;
        }
    }
    if !any_destination {
        return None;
    }

    const UNVISITED: usize = usize::MAX;
    let mut parent = vec![UNVISITED; board.cell_count()];
    let mut queue = VecDeque::new();

    for &coord in query.sources.iter().filter(|&&c| board.contains(c)) {
        let index = board.index_of(coord);
        if passable(index) && parent[index] == UNVISITED {
            // Sources are their own parent
            parent[index] = index;
            queue.push_back(index);
        }
    }

    while let Some(current) = queue.pop_front() {
        if is_destination[current] {
            return Some(if track_path {
                trace_back(board, &parent, current)
            } else {
                Vec::new()
            });
        }

        for &next in board.neighbor_indices(current) {
            if parent[next] == UNVISITED && passable(next) {
                parent[next] = current;
                queue.push_back(next);
            }
        }
    }

    None
}

fn trace_back(board: &Board, parent: &[usize], end: usize) -> Vec<Coord> {
    let mut path = vec![board.coord_of(end)];
    let mut current = end;
    while parent[current] != current {
        current = parent[current];
        path.push(board.coord_of(current));
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Player;

    fn owned(player: Player) -> Tag {
        Tag::Owned(player)
    }

    #[test]
    fn test_empty_board_has_no_owned_path() {
        let board = Board::new(3);
        let query = ReachabilityQuery::between_sides(
            &board,
            Side::North,
            Side::South,
            TagSet::of(&[Tag::Empty]),
        );
        assert!(!exists_path(&board, &query));
    }

    #[test]
    fn test_column_of_owned_cells_connects() {
        let mut board = Board::new(3);
        for row in 0..3 {
            board.set_tag(Coord::new(row, 0), owned(Player::A));
        }
        let query = ReachabilityQuery::between_sides(
            &board,
            Side::North,
            Side::South,
            TagSet::of(&[Tag::Empty, owned(Player::B)]),
        );
        assert!(exists_path(&board, &query));
    }

    #[test]
    fn test_nothing_forbidden_connects_empty_board() {
        let board = Board::new(4);
        let query = ReachabilityQuery::between_sides(&board, Side::West, Side::East, TagSet::EMPTY);
        assert!(exists_path(&board, &query));
    }

    #[test]
    fn test_forbidden_endpoint_blocks() {
        let mut board = Board::new(3);
        board.set_tag(Coord::new(0, 0), owned(Player::B));
        let query = ReachabilityQuery::new(
            vec![Coord::new(0, 0)],
            vec![Coord::new(0, 0)],
            TagSet::of(&[owned(Player::B)]),
        );
        assert!(!exists_path(&board, &query));
    }

    #[test]
    fn test_diagonal_that_is_not_adjacent() {
        // (0,0) and (1,1) are not hex neighbours
        let mut board = Board::new(2);
        board.set_tag(Coord::new(0, 0), owned(Player::A));
        board.set_tag(Coord::new(1, 1), owned(Player::A));
        let forbidden = TagSet::of(&[Tag::Empty, owned(Player::B)]);
        let query = ReachabilityQuery::between_sides(&board, Side::North, Side::South, forbidden);
        assert!(!exists_path(&board, &query));

        // (0,1) and (1,0) are
        let mut board = Board::new(2);
        board.set_tag(Coord::new(0, 1), owned(Player::A));
        board.set_tag(Coord::new(1, 0), owned(Player::A));
        let query = ReachabilityQuery::between_sides(&board, Side::North, Side::South, forbidden);
        assert!(exists_path(&board, &query));
    }

    #[test]
    fn test_off_board_cells_are_ignored() {
        let mut board = Board::new(3);
        board.set_tag(Coord::new(1, 0), owned(Player::A));
        board.set_tag(Coord::new(2, 0), owned(Player::A));
        let forbidden = TagSet::of(&[Tag::Empty, owned(Player::B)]);

        // (0,3) would alias (1,0) in row-major order
        let from_outside = ReachabilityQuery::new(vec![Coord::new(0, 3)], vec![Coord::new(2, 0)], forbidden);
        assert!(!exists_path(&board, &from_outside));
        assert!(find_path(&board, &from_outside).is_none());

        let to_outside = ReachabilityQuery::new(vec![Coord::new(2, 0)], vec![Coord::new(5, 5)], forbidden);
        assert!(!exists_path(&board, &to_outside));

        let mixed = ReachabilityQuery::new(
            vec![Coord::new(0, 3), Coord::new(1, 0)],
            vec![Coord::new(2, 0)],
            forbidden,
        );
        assert!(exists_path(&board, &mixed));
    }

    #[test]
    fn test_find_path_is_connected_chain() {
        let mut board = Board::new(4);
        for &(r, c) in &[(0, 3), (1, 2), (2, 2), (2, 1), (3, 0)] {
            board.set_tag(Coord::new(r, c), owned(Player::A));
        }
        let forbidden = TagSet::of(&[Tag::Empty, owned(Player::B)]);
        let query = ReachabilityQuery::between_sides(&board, Side::North, Side::South, forbidden);
        let path = find_path(&board, &query).expect("chain should connect");

        assert_eq!(path.first().map(|c| c.row), Some(0));
        assert_eq!(path.last().map(|c| c.row), Some(3));
        for pair in path.windows(2) {
            assert!(board.neighbors(pair[0]).any(|n| n == pair[1]));
        }
    }

    #[test]
    fn test_tag_set_membership() {
        let set = TagSet::of(&[Tag::Empty, owned(Player::B)]);
        assert!(set.contains(Tag::Empty));
        assert!(set.contains(owned(Player::B)));
        assert!(!set.contains(owned(Player::A)));
        assert!(!TagSet::EMPTY.contains(Tag::Empty));
    }
}
