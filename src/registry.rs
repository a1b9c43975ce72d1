use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::level::LevelSetHandle;

/// Well-known registry keys used by the progression and settings components.
pub mod keys {
    /// Handle of the active level set.
    pub const CURRENT_LEVEL_SET: &str = "currentLevelSet";
    /// Id of the active level set.
    pub const LEVEL_SET_ID: &str = "levelSetId";
    /// Consume-once flag: advance to the next level on the next load.
    pub const LOAD_NEXT_LEVEL: &str = "loadNextLevel";
    /// Consume-once flag: the active level set changed.
    pub const LEVEL_SET_DIRTY: &str = "levelSetDirty";
    /// Consume-once flag: some setting changed.
    pub const SETTINGS_DIRTY: &str = "settingsDirty";
    /// Cached sound-effects toggle.
    pub const SOUND_EFFECTS_ENABLED: &str = "soundEffectsEnabled";
    /// Cached player color label.
    pub const PLAYER_COLOR: &str = "playerColor";
}

/// A value stored in the registry blackboard.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Str(String),
    LevelSet(LevelSetHandle),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_level_set(&self) -> Option<&LevelSetHandle> {
        match self {
            Value::LevelSet(handle) => Some(handle),
            _ => None,
        }
    }
}

/// Shared in-memory key-value blackboard.
///
/// Any number of collaborators may read or write between calls into this
/// crate; execution is single-threaded and cooperative, so no locking is
/// involved. Boolean flags raised here are consume-once: reading through
/// [`Registry::take_flag`] clears the slot, so at most one consumer observes
/// a given transition.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<String, Value>,
}

/// Registry handle shared between the managers and the host application.
pub type SharedRegistry = Rc<RefCell<Registry>>;

impl Registry {
    pub fn new() -> Self {
        Registry {
            entries: HashMap::new(),
        }
    }

    /// New registry wrapped for sharing.
    pub fn shared() -> SharedRegistry {
        Rc::new(RefCell::new(Registry::new()))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Read a boolean flag without clearing it. Missing or non-boolean
    /// values read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Consume a flag: returns its state and clears the slot, whatever type
    /// was stored there. Missing or non-boolean values read as `false`.
    pub fn take_flag(&mut self, key: &str) -> bool {
        self.remove(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    /// Raise a consume-once flag.
    pub fn raise(&mut self, key: &str) {
        self.set(key, Value::Bool(true));
    }
}
