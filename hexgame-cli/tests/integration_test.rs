//! Integration tests for the hexgame CLI
//!
//! Tests the full stack: settings, engine, bot and the terminal front end

use std::io::Cursor;

use hexgame_cli::play::{play_game, Outcome};
use hexgame_cli::render::BoardView;
use hexgame_cli::selfplay::{compute_statistics, play_series};
use hexgame_cli::settings::{Settings, SharedArgs};
use hexgame_core::{GameConfig, GameEngine, Player};
use hexgame_mcts::{MonteCarloBot, MonteCarloConfig};

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn settings(json: &str) -> Settings {
    let settings = Settings::from_json(json).unwrap();
    settings.validate().unwrap();
    settings
}

// ============================================================================
// INTERACTIVE PLAY
// ============================================================================

#[test]
fn test_human_against_bot_until_quit() {
    let config = GameConfig::vs_bot(4, Player::B).with_swap_rule(false);
    let mut engine = GameEngine::new(config).unwrap();
    let mut bot = MonteCarloBot::new(MonteCarloConfig::new(10).with_seed(1)).unwrap();

    // Human plays down column 0 until blocked or done, then quits
    let script = "0 0\n1 0\n2 0\n3 0\nquit\n";
    let mut input = Cursor::new(script.as_bytes().to_vec());
    let mut out = Vec::new();

    let outcome = play_game(&mut engine, &mut bot, &mut input, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    match outcome {
        Outcome::Won(winner) => assert_eq!(engine.winner(), Some(winner)),
        Outcome::Quit => assert!(!engine.is_over()),
    }
    assert!(text.contains("Welcome to Hex"));
    assert!(text.contains("Player B is the computer"));
    for turn in engine.history() {
        assert!(turn.number >= 1);
    }
}

#[test]
fn test_rendered_board_tracks_engine() {
    let mut engine = GameEngine::new(GameConfig::hot_seat(5).with_swap_rule(false)).unwrap();
    engine.play(hexgame_core::Coord::new(0, 0)).unwrap();
    engine.play(hexgame_core::Coord::new(4, 4)).unwrap();

    let text = BoardView::new(engine.board()).to_string();
    assert_eq!(text.matches('X').count(), 1);
    assert_eq!(text.matches('O').count(), 1);
    assert_eq!(text.matches('.').count(), 23);
}

// ============================================================================
// SELFPLAY
// ============================================================================

#[test]
fn test_selfplay_from_settings_file_values() {
    let settings = settings(
        r#"{"game": {"border_length": 4}, "bot": {"trials_per_option": 6, "seed": 3, "parallel": false}}"#,
    );

    let games = play_series(&settings, 2, |_| {}).unwrap();
    let results = compute_statistics(&settings, games);

    assert_eq!(results.games.len(), 2);
    assert_eq!(results.wins_a + results.wins_b, 2);
    assert_eq!(results.border_length, 4);
    assert!(results.avg_moves >= 7.0);
}

#[test]
fn test_flags_without_file() {
    let args = SharedArgs {
        size: Some(3),
        trials: Some(5),
        no_swap: true,
        ..Default::default()
    };
    let settings = args.resolve().unwrap();
    let games = play_series(&settings, 2, |_| {}).unwrap();
    assert!(games.iter().all(|g| !g.swapped));
}
