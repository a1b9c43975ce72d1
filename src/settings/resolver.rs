//! Layered settings resolution: an ordered list of sources queried until the
//! first one yields a value. The precedence is data, not control flow, so it
//! can be tested and extended on its own.

use crate::registry::{Registry, Value};
use crate::storage::{bool_from_store, KeyValueStore};

use super::record::{GameSettings, PlayerColor, SettingValue, SettingsKey};

/// A single backend in the resolution chain.
pub trait SettingsSource {
    /// The value this source holds for `key`, if any.
    fn load(&self, key: SettingsKey) -> Option<SettingValue>;
}

/// Tier 1: the in-memory registry cache.
pub struct RegistrySource<'a> {
    pub registry: &'a Registry,
}

impl SettingsSource for RegistrySource<'_> {
    fn load(&self, key: SettingsKey) -> Option<SettingValue> {
        let value = self.registry.get(key.registry_key())?;
        match (key, value) {
            (SettingsKey::SoundEffects, Value::Bool(b)) => Some(SettingValue::Bool(*b)),
            (SettingsKey::PlayerColor, Value::Str(s)) => {
                Some(SettingValue::Color(PlayerColor::from_store(s)))
            }
            (SettingsKey::LevelSetId, Value::Str(s)) => Some(SettingValue::Id(s.clone())),
            // A mistyped cache entry is ignored so the lower tiers answer.
            _ => None,
        }
    }
}

/// Tier 2: the durable string store.
pub struct StoreSource<'a> {
    pub store: &'a dyn KeyValueStore,
}

impl SettingsSource for StoreSource<'_> {
    fn load(&self, key: SettingsKey) -> Option<SettingValue> {
        let raw = self.store.get_item(key.storage_key())?;
        Some(match key {
            SettingsKey::SoundEffects => SettingValue::Bool(bool_from_store(&raw)),
            SettingsKey::PlayerColor => SettingValue::Color(PlayerColor::from_store(&raw)),
            SettingsKey::LevelSetId => SettingValue::Id(raw),
        })
    }
}

/// Tier 3: built-in defaults. Always yields a value, which makes resolution
/// through a chain ending here total.
pub struct DefaultsSource;

impl SettingsSource for DefaultsSource {
    fn load(&self, key: SettingsKey) -> Option<SettingValue> {
        let defaults = GameSettings::default();
        Some(match key {
            SettingsKey::SoundEffects => SettingValue::Bool(defaults.sound_effects),
            SettingsKey::PlayerColor => SettingValue::Color(defaults.player_color),
            SettingsKey::LevelSetId => SettingValue::Id(defaults.level_set_id),
        })
    }
}

/// Ordered resolution chain; the first source with a defined value wins.
pub struct LayeredResolver<'a> {
    sources: Vec<&'a dyn SettingsSource>,
}

impl<'a> LayeredResolver<'a> {
    pub fn new(sources: Vec<&'a dyn SettingsSource>) -> Self {
        LayeredResolver { sources }
    }

    pub fn resolve(&self, key: SettingsKey) -> Option<SettingValue> {
        self.sources.iter().find_map(|source| source.load(key))
    }
}
