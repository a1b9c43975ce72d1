use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::level::DEFAULT_LEVEL_SET_ID;
use crate::registry::keys;

/// Player piece color preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    #[default]
    Blue,
    Red,
}

impl PlayerColor {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerColor::Blue => "blue",
            PlayerColor::Red => "red",
        }
    }

    /// Parse a stored color label. Unrecognized labels (corrupted data
    /// included) fall back to the default.
    pub fn from_store(value: &str) -> Self {
        match value {
            "blue" => PlayerColor::Blue,
            "red" => PlayerColor::Red,
            _ => PlayerColor::default(),
        }
    }
}

/// Player-chosen settings persisted across sessions.
///
/// Every field always has a value; absent storage falls back to the built-in
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub sound_effects: bool,
    pub player_color: PlayerColor,
    pub level_set_id: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        GameSettings {
            sound_effects: true,
            player_color: PlayerColor::default(),
            level_set_id: DEFAULT_LEVEL_SET_ID.to_string(),
        }
    }
}

/// The closed set of settings fields, addressable by registry key name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsKey {
    SoundEffects,
    PlayerColor,
    LevelSetId,
}

impl SettingsKey {
    pub const ALL: [SettingsKey; 3] = [
        SettingsKey::SoundEffects,
        SettingsKey::PlayerColor,
        SettingsKey::LevelSetId,
    ];

    /// Registry cache key for this field.
    pub fn registry_key(self) -> &'static str {
        match self {
            SettingsKey::SoundEffects => keys::SOUND_EFFECTS_ENABLED,
            SettingsKey::PlayerColor => keys::PLAYER_COLOR,
            SettingsKey::LevelSetId => keys::LEVEL_SET_ID,
        }
    }

    /// Namespaced durable storage key for this field.
    pub fn storage_key(self) -> &'static str {
        match self {
            SettingsKey::SoundEffects => "dotsGame_soundEffects",
            SettingsKey::PlayerColor => "dotsGame_playerColor",
            SettingsKey::LevelSetId => "dotsGame_levelSetId",
        }
    }

    /// Human-readable value type, used in error messages.
    pub fn expected_type(self) -> &'static str {
        match self {
            SettingsKey::SoundEffects => "boolean",
            SettingsKey::PlayerColor => "player color",
            SettingsKey::LevelSetId => "level set id",
        }
    }

    /// Parse a registry key name. The schema is fixed, so an unknown name is
    /// a hard caller error.
    pub fn parse(key: &str) -> Result<Self, SettingsError> {
        match key {
            keys::SOUND_EFFECTS_ENABLED => Ok(SettingsKey::SoundEffects),
            keys::PLAYER_COLOR => Ok(SettingsKey::PlayerColor),
            keys::LEVEL_SET_ID => Ok(SettingsKey::LevelSetId),
            _ => Err(SettingsError::UnknownKey(key.to_string())),
        }
    }
}

/// A dynamically typed settings field value, used by the string-keyed
/// read/update surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Color(PlayerColor),
    Id(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::STORAGE_PREFIX;

    #[test]
    fn test_defaults() {
        let settings = GameSettings::default();
        assert!(settings.sound_effects);
        assert_eq!(settings.player_color, PlayerColor::Blue);
        assert_eq!(settings.level_set_id, "default");
    }

    #[test]
    fn test_player_color_labels() {
        assert_eq!(PlayerColor::Blue.as_str(), "blue");
        assert_eq!(PlayerColor::Red.as_str(), "red");
        assert_eq!(PlayerColor::from_store("red"), PlayerColor::Red);
        assert_eq!(PlayerColor::from_store("blue"), PlayerColor::Blue);
    }

    #[test]
    fn test_player_color_unknown_label_falls_back() {
        assert_eq!(PlayerColor::from_store("chartreuse"), PlayerColor::Blue);
        assert_eq!(PlayerColor::from_store(""), PlayerColor::Blue);
    }

    #[test]
    fn test_storage_keys_are_namespaced() {
        for key in SettingsKey::ALL {
            assert!(key.storage_key().starts_with(STORAGE_PREFIX));
        }
        assert_eq!(
            SettingsKey::SoundEffects.storage_key(),
            "dotsGame_soundEffects"
        );
    }

    #[test]
    fn test_parse_known_keys() {
        assert_eq!(
            SettingsKey::parse("soundEffectsEnabled").unwrap(),
            SettingsKey::SoundEffects
        );
        assert_eq!(
            SettingsKey::parse("playerColor").unwrap(),
            SettingsKey::PlayerColor
        );
        assert_eq!(
            SettingsKey::parse("levelSetId").unwrap(),
            SettingsKey::LevelSetId
        );
    }

    #[test]
    fn test_parse_unknown_key_is_hard_error() {
        let err = SettingsKey::parse("volume").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownKey(k) if k == "volume"));
    }
}
