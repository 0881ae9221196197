//! hexgame CLI - terminal front end
//!
//! Commands:
//! - play: interactive game against the bot or another human
//! - selfplay: bot against bot series with a summary

pub mod play;
pub mod render;
pub mod selfplay;
pub mod settings;
