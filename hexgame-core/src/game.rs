//! Game engine: turn order, move application and the swap rule

use serde::{Deserialize, Serialize};

use crate::board::{Board, Coord, Tag};
use crate::config::GameConfig;
use crate::error::{ConfigError, GameError};
use crate::rules::{has_won, winning_path, Player};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Where the game stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingMove(Player),
    /// The second mover may take over move 1 before playing
    AwaitingSwapDecision(Player),
    Finished(Player),
}

/// Something a player can do on their turn
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place(Coord),
    /// Take over the opponent's opening move
    Swap,
}

/// A tag assignment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub coord: Coord,
    pub player: Player,
}

/// One entry of the game history
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Move number, starting at 1. A swap counts as a move.
    pub number: u32,
    pub player: Player,
    pub action: Action,
}

// ============================================================================
// GAME ENGINE
// ============================================================================

/// Owner of the authoritative board. Every mutation goes through here and
/// is validated before the board is touched.
#[derive(Clone, Debug)]
pub struct GameEngine {
    config: GameConfig,
    board: Board,
    phase: Phase,
    /// Number of the next move
    move_number: u32,
    moves: [Vec<Coord>; 2],
    history: Vec<Turn>,
    opening: Option<Move>,
    swapped: bool,
    swap_declined: bool,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            board: Board::new(config.border_length),
            phase: Phase::AwaitingMove(config.first_player),
            move_number: 1,
            moves: [Vec::new(), Vec::new()],
            history: Vec::new(),
            opening: None,
            swapped: false,
            swap_declined: false,
            config,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Cells currently credited to `player`, in the order they were claimed
    pub fn moves_of(&self, player: Player) -> &[Coord] {
        &self.moves[player.index()]
    }

    /// Cell of move 1, once it has been played
    pub fn opening_move(&self) -> Option<Coord> {
        self.opening.map(|mv| mv.coord)
    }

    pub fn swapped(&self) -> bool {
        self.swapped
    }

    /// Player who acts next (None once finished)
    pub fn to_move(&self) -> Option<Player> {
        match self.phase {
            Phase::AwaitingMove(p) | Phase::AwaitingSwapDecision(p) => Some(p),
            Phase::Finished(_) => None,
        }
    }

    pub fn winner(&self) -> Option<Player> {
        match self.phase {
            Phase::Finished(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.winner().is_some()
    }

    pub fn is_bot(&self, player: Player) -> bool {
        self.config.bot == Some(player)
    }

    /// Whether the player to move may swap right now
    pub fn swap_available(&self) -> bool {
        self.config.swap_rule
            && self.move_number == 2
            && !self.swapped
            && !self.swap_declined
            && self.opening.is_some()
            && !self.is_over()
    }

    /// Empty cells, row-major. Empty once the game is over.
    pub fn legal_cells(&self) -> Vec<Coord> {
        if self.is_over() {
            return Vec::new();
        }
        self.board.empty_cells()
    }

    /// Winning chain of the winner, for highlighting
    pub fn winning_path(&self) -> Option<Vec<Coord>> {
        self.winner().and_then(|p| winning_path(&self.board, p))
    }

    /// Check that `coord` could be claimed, without touching anything
    pub fn check_cell(&self, coord: Coord) -> Result<(), GameError> {
        if !self.board.contains(coord) {
            return Err(GameError::OutOfBounds {
                coord,
                border_length: self.board.border_length(),
            });
        }
        if !self.board.tag(coord).is_empty() {
            return Err(GameError::Occupied(coord));
        }
        Ok(())
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    pub fn apply(&mut self, action: Action) -> Result<Phase, GameError> {
        match action {
            Action::Place(coord) => self.play(coord),
            Action::Swap => self.swap(),
        }
    }

    /// Claim `coord` for the player to move
    pub fn play(&mut self, coord: Coord) -> Result<Phase, GameError> {
        let player = match self.phase {
            Phase::AwaitingMove(p) => p,
            Phase::AwaitingSwapDecision(p) => return Err(GameError::SwapDecisionPending(p)),
            Phase::Finished(w) => return Err(GameError::Finished(w)),
        };
        self.check_cell(coord)?;

        self.board.set_tag(coord, Tag::Owned(player));
        self.moves[player.index()].push(coord);
        self.record(player, Action::Place(coord));
        if self.move_number == 1 {
            self.opening = Some(Move { coord, player });
        }

        let next = player.opponent();
        self.phase = if has_won(&self.board, player) {
            Phase::Finished(player)
        } else if self.move_number == 1 && self.config.swap_rule && !self.is_bot(next) {
            Phase::AwaitingSwapDecision(next)
        } else {
            Phase::AwaitingMove(next)
        };
        self.move_number += 1;

        tracing::debug!("{} claimed {} -> {:?}", player, coord, self.phase);
        Ok(self.phase)
    }

    /// Take over the opening move. Valid while a swap decision is pending,
    /// or for a bot to move while `swap_available()` holds.
    pub fn swap(&mut self) -> Result<Phase, GameError> {
        let player = match self.phase {
            Phase::AwaitingSwapDecision(p) => p,
            Phase::AwaitingMove(p) if self.swap_available() => p,
            Phase::AwaitingMove(_) => return Err(GameError::SwapUnavailable),
            Phase::Finished(w) => return Err(GameError::Finished(w)),
        };
        let opening = self.opening.ok_or(GameError::SwapUnavailable)?;
        let other = player.opponent();

        self.board.set_tag(opening.coord, Tag::Owned(player));
        self.moves[other.index()].retain(|&c| c != opening.coord);
        self.moves[player.index()].push(opening.coord);
        self.record(player, Action::Swap);
        self.swapped = true;
        self.move_number += 1;

        self.phase = if has_won(&self.board, player) {
            Phase::Finished(player)
        } else {
            Phase::AwaitingMove(other)
        };

        tracing::debug!("{} swapped {}", player, opening.coord);
        Ok(self.phase)
    }

    /// Decline a pending swap; the same player then moves normally
    pub fn decline_swap(&mut self) -> Result<Phase, GameError> {
        match self.phase {
            Phase::AwaitingSwapDecision(p) => {
                self.phase = Phase::AwaitingMove(p);
                self.swap_declined = true;
                tracing::debug!("{} declined the swap", p);
                Ok(self.phase)
            }
            Phase::Finished(w) => Err(GameError::Finished(w)),
            Phase::AwaitingMove(_) => Err(GameError::NoSwapDecision),
        }
    }

    fn record(&mut self, player: Player, action: Action) {
        self.history.push(Turn {
            number: self.move_number,
            player,
            action,
        });
    }
}

// ============================================================================
// TESTS
// ============================================================================
