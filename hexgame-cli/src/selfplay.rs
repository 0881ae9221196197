//! Selfplay command - the bot against itself
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_series(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::io::IsTerminal;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use hexgame_core::{Action, GameConfig, GameEngine, Player};
use hexgame_mcts::{MonteCarloBot, MonteCarloConfig};

use crate::settings::{Settings, SharedArgs};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args, Debug)]
pub struct SelfplayArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Number of games (the starting side alternates)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug, Serialize)]
pub struct GameRecord {
    pub game_number: usize,
    pub first_player: Player,
    pub winner: Player,
    /// Moves played, a swap included
    pub moves: u32,
    pub swapped: bool,
    pub duration_ms: u64,
}

/// Aggregated series results
#[derive(Clone, Debug, Serialize)]
pub struct SeriesResults {
    pub generated_at: DateTime<Utc>,
    pub border_length: usize,
    pub trials_per_option: u32,
    pub swap_rule: bool,
    pub wins_a: usize,
    pub wins_b: usize,
    pub first_mover_wins: usize,
    pub swaps: usize,
    pub avg_moves: f32,
    pub games: Vec<GameRecord>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run selfplay command
///
/// 1. Resolve settings
/// 2. Play the series
/// 3. Report results
pub fn run(args: SelfplayArgs) -> Result<()> {
    let settings = args.shared.resolve()?;

    tracing::info!(
        "Starting selfplay: {} games on {}x{} ({} trials per option)",
        args.games,
        settings.game.border_length,
        settings.game.border_length,
        settings.bot.trials_per_option
    );

    let progress = create_progress(args.games)?;
    let games = play_series(&settings, args.games, |record| {
        progress.inc(1);
        tracing::debug!(
            "Game {}: {} won in {} moves",
            record.game_number,
            record.winner,
            record.moves
        );
    })?;
    progress.finish_and_clear();

    let results = compute_statistics(&settings, games);
    report_results(&results, args.json)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play `games` games, calling `on_game` after each one
pub fn play_series(
    settings: &Settings,
    games: usize,
    mut on_game: impl FnMut(&GameRecord),
) -> Result<Vec<GameRecord>> {
    let mut bots = [
        create_bot(&settings.bot, 0)?,
        create_bot(&settings.bot, 1)?,
    ];
    let mut records = Vec::with_capacity(games);

    for game_num in 0..games {
        // Alternate the opening side for fairness
        let first = if game_num % 2 == 0 { Player::A } else { Player::B };
        let config = GameConfig {
            first_player: first,
            bot: None,
            ..settings.game.clone()
        };

        let record = play_single_game(config, game_num + 1, &mut bots)?;
        on_game(&record);
        records.push(record);
    }

    Ok(records)
}

fn report_results(results: &SeriesResults, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(results).context("Failed to serialize results")?;
        println!("{}", text);
    } else {
        print_text_results(results);
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// One bot-vs-bot game. `bots` is indexed by player.
pub fn play_single_game(
    config: GameConfig,
    game_number: usize,
    bots: &mut [MonteCarloBot; 2],
) -> Result<GameRecord> {
    let first_player = config.first_player;
    let mut engine = GameEngine::new(config).context("Invalid game settings")?;
    let start = Instant::now();

    // Each turn either fills a cell or swaps, so this bounds the game
    let max_turns = engine.board().cell_count() + 1;
    for _ in 0..max_turns {
        let Some(mover) = engine.to_move() else {
            break;
        };
        bots[mover.index()]
            .play_turn(&mut engine)
            .with_context(|| format!("Game {}: {} failed to move", game_number, mover))?;
    }

    let winner = engine
        .winner()
        .with_context(|| format!("Game {} ended without a winner", game_number))?;

    Ok(GameRecord {
        game_number,
        first_player,
        winner,
        moves: engine.history().len() as u32,
        swapped: engine.history().iter().any(|turn| turn.action == Action::Swap),
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Compute aggregate statistics from game records
pub fn compute_statistics(settings: &Settings, games: Vec<GameRecord>) -> SeriesResults {
    let wins_a = games.iter().filter(|g| g.winner == Player::A).count();
    let wins_b = games.len() - wins_a;
    let first_mover_wins = games.iter().filter(|g| g.winner == g.first_player).count();
    let swaps = games.iter().filter(|g| g.swapped).count();

    let total_moves: u32 = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    SeriesResults {
        generated_at: Utc::now(),
        border_length: settings.game.border_length,
        trials_per_option: settings.bot.trials_per_option,
        swap_rule: settings.game.swap_rule,
        wins_a,
        wins_b,
        first_mover_wins,
        swaps,
        avg_moves,
        games,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Bot for one side. A fixed seed is offset per side so the two bots do
/// not mirror each other.
fn create_bot(config: &MonteCarloConfig, side: u64) -> Result<MonteCarloBot> {
    let mut config = config.clone();
    config.seed = config.seed.map(|seed| seed.wrapping_add(side));
    MonteCarloBot::new(config).context("Failed to create bot")
}

/// Progress bar on stderr, hidden when stderr is not a terminal
fn create_progress(games: usize) -> Result<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(games as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} games ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(bar)
}

fn percent(count: usize, total: usize) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 * 100.0 / total as f32
    }
}

fn print_text_results(results: &SeriesResults) {
    let total = results.games.len();

    println!("\n=== SELFPLAY RESULTS ===");
    println!(
        "Board: {0}x{0}, {1} trials per option, swap rule {2}",
        results.border_length,
        results.trials_per_option,
        if results.swap_rule { "on" } else { "off" }
    );
    println!("Games played:     {}", total);
    println!(
        "Player A wins:    {} ({:.1}%)",
        results.wins_a,
        percent(results.wins_a, total)
    );
    println!(
        "Player B wins:    {} ({:.1}%)",
        results.wins_b,
        percent(results.wins_b, total)
    );
    println!(
        "First mover wins: {} ({:.1}%)",
        results.first_mover_wins,
        percent(results.first_mover_wins, total)
    );
    println!("Games with swap:  {}", results.swaps);
    println!("Average moves:    {:.1}", results.avg_moves);
}
