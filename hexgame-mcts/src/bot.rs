//! Flat Monte Carlo bot
//!
//! Every candidate action gets the same number of independent rollouts;
//! the action with the highest win rate is chosen.
//!
//! ## Architecture
//! - Level 2: `choose_action` / `choose_move`
//! - Level 3: per-option win counting (sequential or rayon)
//! - Level 4: seeding, selection

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hexgame_core::{Action, Board, Coord, GameEngine, Phase, Player};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{BotError, RolloutError};
use crate::rollout::{simulate, RolloutContext};
use crate::MonteCarloConfig;

// ============================================================================
// RESULTS
// ============================================================================

/// Win statistics of one candidate action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MoveStatistic {
    pub action: Action,
    /// Rollouts won by the bot's side
    pub wins: u32,
    pub trials: u32,
}

impl MoveStatistic {
    pub fn win_rate(&self) -> f64 {
        if self.trials == 0 {
            0.0
        } else {
            self.wins as f64 / self.trials as f64
        }
    }
}

/// Outcome of one bot turn
#[derive(Clone, Debug, Serialize)]
pub struct Decision {
    pub action: Action,
    pub win_rate: f64,
    /// One entry per evaluated option, in evaluation order
    pub statistics: Vec<MoveStatistic>,
    pub elapsed: Duration,
}

impl Decision {
    /// Statistics sorted by win rate, best first
    pub fn ranked(&self) -> Vec<MoveStatistic> {
        let mut ranked = self.statistics.clone();
        ranked.sort_by(|a, b| b.win_rate().total_cmp(&a.win_rate()));
        ranked
    }
}

// ============================================================================
// BOT
// ============================================================================

/// Computer opponent. Owns its random source; each decision draws one seed
/// from it and derives an independent generator per (option, trial), so
/// results do not depend on how trials are scheduled.
pub struct MonteCarloBot {
    config: MonteCarloConfig,
    rng: ChaCha8Rng,
    pool: Option<rayon::ThreadPool>,
    cancel: Arc<AtomicBool>,
}

impl MonteCarloBot {
    pub fn new(config: MonteCarloConfig) -> Result<Self, BotError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let pool = config
            .threads
            .map(|n| rayon::ThreadPoolBuilder::new().num_threads(n).build())
            .transpose()?;

        Ok(Self {
            config,
            rng,
            pool,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Flag that abandons the running evaluation at the next option
    /// boundary. It stays set until `clear_cancel` is called.
    ///
    /// For embedders that run `choose_action` on a worker thread and need
    /// to stop it from another one (a UI or a clock). The bundled CLI
    /// waits for every decision and never sets it.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn clear_cancel(&self) {
        self.cancel.store(false, Ordering::SeqCst);
    }

    /// Decide for whoever is to move in `engine`
    pub fn choose_action(&mut self, engine: &GameEngine) -> Result<Decision, BotError> {
        let mover = engine.to_move().ok_or(BotError::GameOver)?;
        let legal = engine.legal_cells();
        let ctx = RolloutContext::from_engine(engine, self.config.swap_probability);

        self.choose_move(engine.board(), mover, &legal, engine.swap_available(), &ctx)
    }

    /// Decide and apply the decision to `engine`. A pending swap decision
    /// is declined first when the bot prefers to place a stone.
    pub fn play_turn(&mut self, engine: &mut GameEngine) -> Result<Decision, BotError> {
        let decision = self.choose_action(engine)?;
        if matches!(decision.action, Action::Place(_))
            && matches!(engine.phase(), Phase::AwaitingSwapDecision(_))
        {
            engine.decline_swap()?;
        }
        engine.apply(decision.action)?;
        Ok(decision)
    }

    /// Evaluate every legal cell, plus the swap when `swap_eligible`, and
    /// pick the highest win rate. Ties go to the earlier option; the swap
    /// is evaluated last.
    pub fn choose_move(
        &mut self,
        board: &Board,
        mover: Player,
        legal: &[Coord],
        swap_eligible: bool,
        ctx: &RolloutContext,
    ) -> Result<Decision, BotError> {
        if legal.is_empty() {
            return Err(BotError::NoLegalMoves);
        }

        let start = Instant::now();
        let seed: u64 = self.rng.gen();
        let options: Vec<Action> = legal
            .iter()
            .map(|&coord| Action::Place(coord))
            .chain(swap_eligible.then_some(Action::Swap))
            .collect();

        let mut statistics = Vec::with_capacity(options.len());
        for (i, &action) in options.iter().enumerate() {
            if self.cancel.load(Ordering::SeqCst) {
                tracing::info!("evaluation cancelled after {} of {} options", i, options.len());
                return Err(BotError::Cancelled);
            }

            let wins = self.count_wins(board, action, mover, ctx, option_seed(seed, i))?;
            let stat = MoveStatistic {
                action,
                wins,
                trials: self.config.trials_per_option,
            };
            tracing::debug!("{:?}: {}/{} ({:.3})", action, wins, stat.trials, stat.win_rate());
            statistics.push(stat);
        }

        let best = select_best(&statistics).ok_or(BotError::NoLegalMoves)?;
        let decision = Decision {
            action: best.action,
            win_rate: best.win_rate(),
            elapsed: start.elapsed(),
            statistics,
        };

        tracing::info!(
            "{} chose {:?} (win rate {:.3}, {} options, {:.2?})",
            mover,
            decision.action,
            decision.win_rate,
            decision.statistics.len(),
            decision.elapsed
        );
        Ok(decision)
    }

    /// Rollouts won by `mover` out of `trials_per_option`
    fn count_wins(
        &self,
        board: &Board,
        action: Action,
        mover: Player,
        ctx: &RolloutContext,
        seed: u64,
    ) -> Result<u32, RolloutError> {
        let trials = self.config.trials_per_option;
        let run_trial = |trial: u32| -> Result<u32, RolloutError> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(trial as u64));
            let winner = simulate(board, action, mover, ctx, &mut rng)?;
            Ok(u32::from(winner == mover))
        };

        if !self.config.parallel {
            return (0..trials).map(run_trial).sum();
        }

        let run_parallel = || {
            (0..trials)
                .into_par_iter()
                .map(run_trial)
                .try_reduce(|| 0, |a, b| Ok(a + b))
        };
        match &self.pool {
            Some(pool) => pool.install(run_parallel),
            None => run_parallel(),
        }
    }
}

// ============================================================================
// UTILITIES (Level 4)
// ============================================================================

/// Spread option indices across the seed space
fn option_seed(seed: u64, option: usize) -> u64 {
    seed ^ (option as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// First option with the strictly highest win rate
fn select_best(statistics: &[MoveStatistic]) -> Option<&MoveStatistic> {
    statistics.iter().fold(None, |best, stat| match best {
        Some(b) if stat.win_rate() <= b.win_rate() => Some(b),
        _ => Some(stat),
    })
}

// ============================================================================
// TESTS
// ============================================================================
