use crate::error::SettingsError;
use crate::registry::{keys, SharedRegistry, Value};
use crate::storage::{bool_to_store, KeyValueStore};

use super::record::{GameSettings, SettingValue, SettingsKey};
use super::resolver::{DefaultsSource, LayeredResolver, RegistrySource, StoreSource};

/// Persists player settings through a two-tier store (in-memory registry
/// cache, durable key-value storage) and raises the change signals other
/// components consume.
///
/// Both collaborators are passed in explicitly; the manager holds no global
/// state.
pub struct SettingsManager {
    registry: SharedRegistry,
    store: Box<dyn KeyValueStore>,
}

impl SettingsManager {
    /// Build the manager and eagerly resolve every field into the registry
    /// cache, so later reads are served from tier 1.
    pub fn new(registry: SharedRegistry, store: Box<dyn KeyValueStore>) -> Self {
        let manager = SettingsManager { registry, store };
        let settings = manager.resolve_settings();
        manager.cache_settings(&settings);
        manager
    }

    fn resolve_settings(&self) -> GameSettings {
        let registry = self.registry.borrow();
        let registry_source = RegistrySource {
            registry: &registry,
        };
        let store_source = StoreSource {
            store: self.store.as_ref(),
        };
        let resolver =
            LayeredResolver::new(vec![&registry_source, &store_source, &DefaultsSource]);

        let mut settings = GameSettings::default();
        for key in SettingsKey::ALL {
            match (key, resolver.resolve(key)) {
                (SettingsKey::SoundEffects, Some(SettingValue::Bool(b))) => {
                    settings.sound_effects = b;
                }
                (SettingsKey::PlayerColor, Some(SettingValue::Color(c))) => {
                    settings.player_color = c;
                }
                (SettingsKey::LevelSetId, Some(SettingValue::Id(id))) => {
                    settings.level_set_id = id;
                }
                _ => {}
            }
        }
        settings
    }

    fn cache_settings(&self, settings: &GameSettings) {
        let mut registry = self.registry.borrow_mut();
        registry.set(
            keys::SOUND_EFFECTS_ENABLED,
            Value::Bool(settings.sound_effects),
        );
        registry.set(
            keys::PLAYER_COLOR,
            Value::Str(settings.player_color.as_str().to_string()),
        );
        registry.set(
            keys::LEVEL_SET_ID,
            Value::Str(settings.level_set_id.clone()),
        );
    }

    /// Current settings record, every field resolved through the layered
    /// chain (registry cache, durable store, defaults).
    pub fn current_settings(&self) -> GameSettings {
        self.resolve_settings()
    }

    /// Persist `settings` durably, refresh the registry cache, and raise the
    /// change signals.
    ///
    /// The level-set dirty signal fires only when a current-set handle is
    /// cached and the active level-set id actually changed, so re-saving an
    /// unchanged record does not force a reload. The generic settings dirty
    /// signal fires on every save.
    pub fn save_settings(&mut self, settings: &GameSettings) -> Result<(), SettingsError> {
        let previous_id = self
            .registry
            .borrow()
            .get(keys::LEVEL_SET_ID)
            .and_then(|v| v.as_str().map(str::to_string));

        self.store.set_item(
            SettingsKey::SoundEffects.storage_key(),
            bool_to_store(settings.sound_effects),
        )?;
        self.store.set_item(
            SettingsKey::PlayerColor.storage_key(),
            settings.player_color.as_str(),
        )?;
        self.store
            .set_item(SettingsKey::LevelSetId.storage_key(), &settings.level_set_id)?;

        self.cache_settings(settings);

        let mut registry = self.registry.borrow_mut();
        let set_cached = registry
            .get(keys::CURRENT_LEVEL_SET)
            .and_then(Value::as_level_set)
            .is_some();
        if set_cached && previous_id.as_deref() != Some(settings.level_set_id.as_str()) {
            registry.raise(keys::LEVEL_SET_DIRTY);
        }
        registry.raise(keys::SETTINGS_DIRTY);
        Ok(())
    }

    /// Overwrite a single field and persist the whole record. `key` must be
    /// one of the fixed registry key names.
    pub fn update_setting(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let key = SettingsKey::parse(key)?;
        let mut settings = self.current_settings();
        match (key, value) {
            (SettingsKey::SoundEffects, SettingValue::Bool(b)) => settings.sound_effects = b,
            (SettingsKey::PlayerColor, SettingValue::Color(c)) => settings.player_color = c,
            (SettingsKey::LevelSetId, SettingValue::Id(id)) => settings.level_set_id = id,
            (key, _) => {
                return Err(SettingsError::InvalidValue {
                    key: key.registry_key().to_string(),
                    expected: key.expected_type(),
                })
            }
        }
        self.save_settings(&settings)
    }

    /// Read a single field. Unknown keys are a hard caller error.
    pub fn setting(&self, key: &str) -> Result<SettingValue, SettingsError> {
        let key = SettingsKey::parse(key)?;
        let settings = self.current_settings();
        Ok(match key {
            SettingsKey::SoundEffects => SettingValue::Bool(settings.sound_effects),
            SettingsKey::PlayerColor => SettingValue::Color(settings.player_color),
            SettingsKey::LevelSetId => SettingValue::Id(settings.level_set_id),
        })
    }
}
