//! Game configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{MAX_BORDER_LENGTH, MIN_BORDER_LENGTH};
use crate::error::ConfigError;
use crate::rules::Player;

/// Settings fixed for the duration of one game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Cells per board edge. Beyond 7 the bot gets slow.
    pub border_length: usize,
    /// Player making move 1
    pub first_player: Player,
    /// Side played by the computer (None = two humans)
    pub bot: Option<Player>,
    /// Whether the second mover may take over the first move
    pub swap_rule: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            border_length: 7,
            first_player: Player::A,
            bot: Some(Player::B),
            swap_rule: true,
        }
    }
}

impl GameConfig {
    /// Human against the computer playing `bot`
    pub fn vs_bot(border_length: usize, bot: Player) -> Self {
        Self {
            border_length,
            bot: Some(bot),
            ..Default::default()
        }
    }

    /// Two humans sharing the terminal
    pub fn hot_seat(border_length: usize) -> Self {
        Self {
            border_length,
            bot: None,
            ..Default::default()
        }
    }

    pub fn with_first_player(mut self, player: Player) -> Self {
        self.first_player = player;
        self
    }

    pub fn with_swap_rule(mut self, enabled: bool) -> Self {
        self.swap_rule = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BORDER_LENGTH..=MAX_BORDER_LENGTH).contains(&self.border_length) {
            return Err(ConfigError::BorderLength {
                value: self.border_length,
                min: MIN_BORDER_LENGTH,
                max: MAX_BORDER_LENGTH,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::default();
        assert_eq!(config.border_length, 7);
        assert_eq!(config.first_player, Player::A);
        assert_eq!(config.bot, Some(Player::B));
        assert!(config.swap_rule);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = GameConfig::hot_seat(5)
            .with_first_player(Player::B)
            .with_swap_rule(false);
        assert_eq!(config.bot, None);
        assert_eq!(config.first_player, Player::B);
        assert!(!config.swap_rule);

        assert_eq!(GameConfig::vs_bot(4, Player::A).bot, Some(Player::A));
    }

    #[test]
    fn test_border_length_bounds() {
        assert!(matches!(
            GameConfig::hot_seat(2).validate(),
            Err(ConfigError::BorderLength { value: 2, .. })
        ));
        assert!(GameConfig::hot_seat(3).validate().is_ok());
        assert!(GameConfig::hot_seat(MAX_BORDER_LENGTH + 1).validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "border_length": 5, "bot": null }"#).unwrap();
        assert_eq!(config.border_length, 5);
        assert_eq!(config.bot, None);
        assert!(config.swap_rule);
    }

    #[test]
    fn test_json_rejects_small_board() {
        assert!(GameConfig::from_json(r#"{ "border_length": 1 }"#).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load(Path::new("/nonexistent/hexgame.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
