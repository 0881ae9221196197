//! Play command - interactive game on the terminal
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_game() - turn loop over engine phases
//! - Level 3: human_move(), swap_decision(), bot_turn()
//! - Level 4: input parsing and prompts

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use hexgame_core::{Action, Coord, GameConfig, GameEngine, Phase, Player};
use hexgame_mcts::MonteCarloBot;

use crate::render::BoardView;
use crate::settings::SharedArgs;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

/// Player as written on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PlayerArg {
    /// Player A (X), joins top and bottom
    A,
    /// Player B (O), joins left and right
    B,
}

impl From<PlayerArg> for Player {
    fn from(arg: PlayerArg) -> Self {
        match arg {
            PlayerArg::A => Player::A,
            PlayerArg::B => Player::B,
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    #[command(flatten)]
    pub shared: SharedArgs,

    /// Player making the first move
    #[arg(long, value_enum)]
    pub first: Option<PlayerArg>,

    /// Side played by the computer
    #[arg(long, value_enum, conflicts_with = "hot_seat")]
    pub bot: Option<PlayerArg>,

    /// Two humans, no computer opponent
    #[arg(long)]
    pub hot_seat: bool,
}

impl PlayArgs {
    fn game_config(&self, mut config: GameConfig) -> GameConfig {
        if let Some(first) = self.first {
            config.first_player = first.into();
        }
        if let Some(bot) = self.bot {
            config.bot = Some(bot.into());
        }
        if self.hot_seat {
            config.bot = None;
        }
        config
    }
}

/// How an interactive game ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won(Player),
    Quit,
}

/// Parsed line of player input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Cell(Coord),
    Quit,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
///
/// 1. Resolve settings (file, then flags)
/// 2. Build engine and bot
/// 3. Run the turn loop on stdin/stdout
pub fn run(args: PlayArgs) -> Result<()> {
    let settings = args.shared.resolve()?;
    let config = args.game_config(settings.game);

    tracing::info!(
        "Starting {}x{} game (bot: {:?}, swap rule: {}, {} trials per option)",
        config.border_length,
        config.border_length,
        config.bot,
        config.swap_rule,
        settings.bot.trials_per_option
    );

    let mut engine = GameEngine::new(config).context("Invalid game settings")?;
    let mut bot = MonteCarloBot::new(settings.bot).context("Failed to create bot")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let outcome = play_game(&mut engine, &mut bot, &mut stdin.lock(), &mut stdout.lock())?;

    if outcome == Outcome::Quit {
        tracing::info!("Game abandoned after {} moves", engine.history().len());
    }
    Ok(())
}

// ============================================================================
// LEVEL 2 - TURN LOOP
// ============================================================================

/// Drive `engine` to the end, reading human moves from `input`
pub fn play_game<R: BufRead, W: Write>(
    engine: &mut GameEngine,
    bot: &mut MonteCarloBot,
    input: &mut R,
    out: &mut W,
) -> Result<Outcome> {
    print_intro(engine.config(), out)?;

    loop {
        writeln!(out, "\n{}\n", BoardView::new(engine.board()))?;

        match engine.phase() {
            Phase::Finished(winner) => {
                announce_winner(engine, winner, out)?;
                return Ok(Outcome::Won(winner));
            }
            Phase::AwaitingSwapDecision(player) => {
                if !swap_decision(engine, player, input, out)? {
                    return Ok(Outcome::Quit);
                }
            }
            Phase::AwaitingMove(player) if engine.is_bot(player) => {
                bot_turn(engine, bot, player, out)?;
            }
            Phase::AwaitingMove(player) => match human_move(engine, player, input, out)? {
                Some(coord) => {
                    engine.play(coord)?;
                }
                None => return Ok(Outcome::Quit),
            },
        }
    }
}

// ============================================================================
// LEVEL 3 - TURNS
// ============================================================================

/// Ask until a legal cell is entered. None when the player quits.
fn human_move<R: BufRead, W: Write>(
    engine: &GameEngine,
    player: Player,
    input: &mut R,
    out: &mut W,
) -> Result<Option<Coord>> {
    writeln!(
        out,
        ">>>> {} ({}), choose a cell as \"row col\" (or \"quit\").",
        player,
        player.symbol()
    )?;

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match parse_command(&line) {
            Ok(Command::Quit) => return Ok(None),
            Ok(Command::Cell(coord)) => match engine.check_cell(coord) {
                Ok(()) => return Ok(Some(coord)),
                Err(err) => writeln!(out, "-- Illegal move: {}. Choose another cell.", err)?,
            },
            Err(msg) => writeln!(out, "-- Invalid input: {}. Try again.", msg)?,
        }
    }
}

/// Ask whether `player` takes over the opening move. False when the
/// player quits.
fn swap_decision<R: BufRead, W: Write>(
    engine: &mut GameEngine,
    player: Player,
    input: &mut R,
    out: &mut W,
) -> Result<bool> {
    let question = format!(">>>> {}, do you want to use SWAP (y/n)?", player);
    match prompt_yes_no(&question, input, out)? {
        Some(true) => {
            engine.swap()?;
            writeln!(out, ">> {} is using SWAP.", player)?;
        }
        Some(false) => {
            engine.decline_swap()?;
            writeln!(out, ">> {} is NOT using SWAP.", player)?;
        }
        None => return Ok(false),
    }
    Ok(true)
}

fn bot_turn<W: Write>(
    engine: &mut GameEngine,
    bot: &mut MonteCarloBot,
    player: Player,
    out: &mut W,
) -> Result<()> {
    writeln!(out, ">>>> {} (computer) is choosing its move...", player)?;
    out.flush()?;

    let opening = engine.opening_move();
    let decision = bot.play_turn(engine).context("Bot failed to move")?;
    for stat in decision.ranked().iter().take(3) {
        tracing::debug!(
            "{} candidate {:?}: {}/{} rollouts won",
            player,
            stat.action,
            stat.wins,
            stat.trials
        );
    }

    match (decision.action, opening) {
        (Action::Swap, Some(cell)) => writeln!(
            out,
            ">> {} used SWAP and captured the opening move {}.",
            player, cell
        )?,
        (Action::Swap, None) => writeln!(out, ">> {} used SWAP.", player)?,
        (Action::Place(coord), _) => writeln!(
            out,
            ">> {} chose {} (estimated win rate {:.0}%).",
            player,
            coord,
            decision.win_rate * 100.0
        )?,
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - INPUT AND MESSAGES
// ============================================================================

/// Parse "row col", "row,col" or "quit"
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
        return Ok(Command::Quit);
    }

    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    let [row, col] = parts.as_slice() else {
        return Err(format!("expected two numbers, got \"{}\"", line));
    };

    let row = row
        .parse::<u8>()
        .map_err(|_| format!("\"{}\" is not a valid row", row))?;
    let col = col
        .parse::<u8>()
        .map_err(|_| format!("\"{}\" is not a valid column", col))?;
    Ok(Command::Cell(Coord::new(row, col)))
}

/// y/yes/n/no, asked again on anything else. None on quit or end of input.
fn prompt_yes_no<R: BufRead, W: Write>(
    question: &str,
    input: &mut R,
    out: &mut W,
) -> Result<Option<bool>> {
    loop {
        writeln!(out, "{}", question)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = read_line(input)? else {
            return Ok(None);
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(Some(true)),
            "n" | "no" => return Ok(Some(false)),
            "quit" | "q" => return Ok(None),
            _ => writeln!(out, "-- Please answer y or n.")?,
        }
    }
}

/// Next line of input, None at end of input
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("Failed to read input")?;
    Ok((read > 0).then_some(line))
}

fn print_intro<W: Write>(config: &GameConfig, out: &mut W) -> Result<()> {
    writeln!(out, "Welcome to Hex!")?;
    writeln!(out, "===============")?;
    writeln!(
        out,
        "Board: {0} x {0}. {1} plays 'X' (top/bottom), {2} plays 'O' (left/right).",
        config.border_length,
        Player::A,
        Player::B
    )?;
    writeln!(out, "{} makes the first move.", config.first_player)?;
    match config.bot {
        Some(bot) => writeln!(out, "{} is the computer.", bot)?,
        None => writeln!(out, "Both players are human.")?,
    }
    writeln!(
        out,
        "Swap rule is {}.",
        if config.swap_rule { "enabled" } else { "disabled" }
    )?;
    Ok(())
}

fn announce_winner<W: Write>(engine: &GameEngine, winner: Player, out: &mut W) -> Result<()> {
    if let Some(path) = engine.winning_path() {
        writeln!(out, "Winning chain:\n{}\n", BoardView::new(engine.board()).with_highlight(&path))?;
    }
    writeln!(out, "* - * - * - * - * - * - * - * - * -")?;
    if engine.is_bot(winner) {
        writeln!(out, "The computer ({}) wins!", winner)?;
    } else {
        writeln!(out, "Congratulations {}. You win!", winner)?;
    }
    writeln!(out, "* - * - * - * - * - * - * - * - * -")?;
    Ok(())
}
