//! Random playouts from a fixed first action to a full board
//!
//! ## Architecture
//! - Level 2: `simulate` / `simulate_with_order`
//! - Level 3: forced action, completion, verdict
//! - Level 4: swap-rule context

use hexgame_core::{has_won, Action, Board, Coord, GameEngine, Player, Tag};
use rand::prelude::*;

use crate::error::RolloutError;

// ============================================================================
// ROLLOUT CONTEXT (Level 4)
// ============================================================================

/// Swap-rule state a rollout has to respect
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RolloutContext {
    pub swap_rule: bool,
    /// Number, in the real game, of the forced action
    pub move_number: u32,
    /// Cell of move 1, needed to simulate `Action::Swap`
    pub opening_move: Option<Coord>,
    /// Chance that the simulated second mover swaps when allowed
    pub swap_probability: f64,
}

impl RolloutContext {
    /// Context without any swap possibility
    pub fn without_swap(move_number: u32) -> Self {
        Self {
            swap_rule: false,
            move_number,
            opening_move: None,
            swap_probability: 0.0,
        }
    }

    /// Context for the action the engine is waiting for
    pub fn from_engine(engine: &GameEngine, swap_probability: f64) -> Self {
        Self {
            swap_rule: engine.config().swap_rule,
            move_number: engine.move_number(),
            opening_move: engine.opening_move(),
            swap_probability,
        }
    }
}

// ============================================================================
// SIMULATION (Level 2)
// ============================================================================

/// Play `forced` for `mover` on a copy of `snapshot`, complete the board in
/// a uniformly random order and report the winner.
pub fn simulate<R: Rng>(
    snapshot: &Board,
    forced: Action,
    mover: Player,
    ctx: &RolloutContext,
    rng: &mut R,
) -> Result<Player, RolloutError> {
    let mut board = snapshot.clone();
    apply_forced(&mut board, forced, mover, ctx)?;

    let mut order = board.empty_indices();
    order.shuffle(rng);

    complete(&mut board, &order, forced, mover, ctx, rng);
    verdict(&board)
}

/// Like `simulate`, with the completion order given explicitly. Cells of
/// `order` that are already occupied are passed over.
pub fn simulate_with_order<R: Rng>(
    snapshot: &Board,
    forced: Action,
    mover: Player,
    ctx: &RolloutContext,
    order: &[Coord],
    rng: &mut R,
) -> Result<Player, RolloutError> {
    let mut board = snapshot.clone();
    apply_forced(&mut board, forced, mover, ctx)?;

    let order: Vec<usize> = order
        .iter()
        .filter(|&&coord| board.contains(coord))
        .map(|&coord| board.index_of(coord))
        .collect();

    complete(&mut board, &order, forced, mover, ctx, rng);
    verdict(&board)
}

// ============================================================================
// PHASES (Level 3)
// ============================================================================

fn apply_forced(
    board: &mut Board,
    forced: Action,
    mover: Player,
    ctx: &RolloutContext,
) -> Result<(), RolloutError> {
    match forced {
        Action::Place(coord) => {
            if !board.contains(coord) || !board.tag(coord).is_empty() {
                return Err(RolloutError::IllegalForcedMove(coord));
            }
            board.set_tag(coord, Tag::Owned(mover));
        }
        Action::Swap => {
            let opening = ctx.opening_move.ok_or(RolloutError::NoOpeningMove)?;
            board.set_tag(opening, Tag::Owned(mover));
        }
    }
    Ok(())
}

/// Alternate the remaining cells of `order` between the players, starting
/// with the opponent of `mover`.
///
/// When the forced action was an opening placement under the swap rule,
/// the simulated move 2 is a swap with probability `swap_probability`: the
/// opening cell changes hands, no cell of `order` is used, and the turn
/// passes on. Each empty cell of `order` is claimed exactly once either way.
fn complete<R: Rng>(
    board: &mut Board,
    order: &[usize],
    forced: Action,
    mover: Player,
    ctx: &RolloutContext,
    rng: &mut R,
) {
    let swap_cell = match forced {
        Action::Place(coord) if ctx.swap_rule && ctx.move_number == 1 => Some(coord),
        _ => None,
    };

    let mut move_number = ctx.move_number + 1;
    let mut to_move = mover.opponent();
    let mut cursor = 0;

    while cursor < order.len() {
        let index = order[cursor];
        if !board.tag_at(index).is_empty() {
            cursor += 1;
            continue;
        }

        match swap_cell {
            Some(cell) if move_number == 2 && rng.gen_bool(ctx.swap_probability) => {
                board.set_tag(cell, Tag::Owned(to_move));
            }
            _ => {
                board.set_tag_at(index, Tag::Owned(to_move));
                cursor += 1;
            }
        }

        move_number += 1;
        to_move = to_move.opponent();
    }
}

/// Exactly one player is connected on a full board
fn verdict(board: &Board) -> Result<Player, RolloutError> {
    let empty = board.count(Tag::Empty);
    if empty > 0 {
        return Err(RolloutError::BoardNotFull { empty });
    }

    match (has_won(board, Player::A), has_won(board, Player::B)) {
        (true, false) => Ok(Player::A),
        (false, true) => Ok(Player::B),
        (false, false) => Err(RolloutError::NoWinner),
        (true, true) => Err(RolloutError::TwoWinners),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    fn opening_ctx(probability: f64) -> RolloutContext {
        RolloutContext {
            swap_rule: true,
            move_number: 1,
            opening_move: None,
            swap_probability: probability,
        }
    }

    fn all_cells(n: u8) -> Vec<Coord> {
        (0..n)
            .flat_map(|r| (0..n).map(move |c| Coord::new(r, c)))
            .collect()
    }

    #[test]
    fn test_fixed_order_rollout_fills_board() {
        let board = Board::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let order = vec![
            Coord::new(0, 0),
            Coord::new(2, 2),
            Coord::new(0, 1),
            Coord::new(1, 0),
            Coord::new(2, 1),
            Coord::new(0, 2),
            Coord::new(1, 2),
            Coord::new(2, 0),
        ];
        let ctx = RolloutContext::without_swap(1);
        let center = Action::Place(Coord::new(1, 1));

        let mut copy = board.clone();
        apply_forced(&mut copy, center, Player::A, &ctx).unwrap();
        let indices: Vec<_> = order.iter().map(|&c| copy.index_of(c)).collect();
        complete(&mut copy, &indices, center, Player::A, &ctx, &mut rng);
        assert!(copy.is_full());
        assert_eq!(copy.count(Tag::Owned(Player::A)), 5);

        let winner = simulate_with_order(&board, center, Player::A, &ctx, &order, &mut rng).unwrap();
        assert_eq!(Some(winner), hexgame_core::winner(&copy));
    }

    #[test]
    fn test_order_with_forced_cell_is_tolerated() {
        let board = Board::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let ctx = RolloutContext::without_swap(1);
        let result = simulate_with_order(
            &board,
            Action::Place(Coord::new(1, 1)),
            Player::B,
            &ctx,
            &all_cells(3),
            &mut rng,
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_simulated_swap_always() {
        let mut board = Board::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let forced = Action::Place(Coord::new(0, 0));
        let ctx = opening_ctx(1.0);

        apply_forced(&mut board, forced, Player::A, &ctx).unwrap();
        let order = board.empty_indices();
        complete(&mut board, &order, forced, Player::A, &ctx, &mut rng);

        assert!(board.is_full());
        assert_eq!(board.tag(Coord::new(0, 0)), Tag::Owned(Player::B));
        assert_eq!(board.count(Tag::Owned(Player::A)), 4);
        assert_eq!(board.count(Tag::Owned(Player::B)), 5);
    }

    #[test]
    fn test_simulated_swap_never() {
        let mut board = Board::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let forced = Action::Place(Coord::new(0, 0));
        let ctx = opening_ctx(0.0);

        apply_forced(&mut board, forced, Player::A, &ctx).unwrap();
        let order = board.empty_indices();
        complete(&mut board, &order, forced, Player::A, &ctx, &mut rng);

        assert_eq!(board.tag(Coord::new(0, 0)), Tag::Owned(Player::A));
        assert_eq!(board.count(Tag::Owned(Player::A)), 5);
        assert_eq!(board.count(Tag::Owned(Player::B)), 4);
    }

    #[test]
    fn test_no_simulated_swap_after_move_one() {
        let mut board = Board::new(3);
        board.set_tag(Coord::new(1, 1), Tag::Owned(Player::A));
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let forced = Action::Place(Coord::new(0, 0));
        let ctx = RolloutContext {
            move_number: 2,
            ..opening_ctx(1.0)
        };

        apply_forced(&mut board, forced, Player::B, &ctx).unwrap();
        let order = board.empty_indices();
        complete(&mut board, &order, forced, Player::B, &ctx, &mut rng);

        assert_eq!(board.tag(Coord::new(0, 0)), Tag::Owned(Player::B));
        assert_eq!(board.tag(Coord::new(1, 1)), Tag::Owned(Player::A));
    }

    #[test]
    fn test_forced_swap_action() {
        let mut board = Board::new(3);
        board.set_tag(Coord::new(1, 1), Tag::Owned(Player::A));
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let ctx = RolloutContext {
            swap_rule: true,
            move_number: 2,
            opening_move: Some(Coord::new(1, 1)),
            swap_probability: 0.5,
        };

        apply_forced(&mut board, Action::Swap, Player::B, &ctx).unwrap();
        let order = board.empty_indices();
        complete(&mut board, &order, Action::Swap, Player::B, &ctx, &mut rng);

        assert_eq!(board.tag(Coord::new(1, 1)), Tag::Owned(Player::B));
        assert_eq!(board.count(Tag::Owned(Player::A)), 4);
        assert_eq!(board.count(Tag::Owned(Player::B)), 5);
    }

    #[test]
    fn test_swap_without_opening_is_error() {
        let board = Board::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ctx = RolloutContext::without_swap(2);
        assert_eq!(
            simulate(&board, Action::Swap, Player::B, &ctx, &mut rng),
            Err(RolloutError::NoOpeningMove)
        );
    }

    #[test]
    fn test_occupied_forced_move_is_error() {
        let mut board = Board::new(3);
        board.set_tag(Coord::new(0, 0), Tag::Owned(Player::A));
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let ctx = RolloutContext::without_swap(2);
        assert_eq!(
            simulate(&board, Action::Place(Coord::new(0, 0)), Player::B, &ctx, &mut rng),
            Err(RolloutError::IllegalForcedMove(Coord::new(0, 0)))
        );
    }

    #[test]
    fn test_snapshot_untouched() {
        let mut board = Board::new(4);
        board.set_tag(Coord::new(2, 1), Tag::Owned(Player::B));
        let before = board.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let ctx = opening_ctx(0.5);

        for _ in 0..20 {
            simulate(&board, Action::Place(Coord::new(0, 3)), Player::A, &ctx, &mut rng).unwrap();
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_draws_across_many_rollouts() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        for n in 3..=7 {
            let board = Board::new(n);
            for _ in 0..40 {
                let ctx = opening_ctx(0.5);
                let forced = Action::Place(Coord::new(0, 0));
                assert!(simulate(&board, forced, Player::A, &ctx, &mut rng).is_ok());
            }
        }
    }

    #[test]
    fn test_same_seed_same_winner() {
        let board = Board::new(5);
        let ctx = RolloutContext::without_swap(1);
        let forced = Action::Place(Coord::new(2, 2));
        let a = simulate(&board, forced, Player::A, &ctx, &mut ChaCha8Rng::seed_from_u64(77));
        let b = simulate(&board, forced, Player::A, &ctx, &mut ChaCha8Rng::seed_from_u64(77));
        assert_eq!(a, b);
    }

    #[test]
    fn test_verdict_rejects_unfinished_board() {
        let board = Board::new(3);
        assert_eq!(verdict(&board), Err(RolloutError::BoardNotFull { empty: 9 }));
    }
}
