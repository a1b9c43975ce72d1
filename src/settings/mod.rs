//! Persisted game settings: the settings record, the layered resolution
//! chain, and the manager owning the two-tier read/write path.

mod manager;
mod record;
mod resolver;

pub use manager::SettingsManager;
pub use record::{GameSettings, PlayerColor, SettingValue, SettingsKey};
pub use resolver::{
    DefaultsSource, LayeredResolver, RegistrySource, SettingsSource, StoreSource,
};
