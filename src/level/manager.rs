use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::catalog::{LevelCatalog, LevelSetCatalog};
use crate::registry::{keys, SharedRegistry, Value};

use super::{AiDifficulty, Level, LevelSet, LevelSetHandle};

/// Id of the set selected when nothing else resolves.
pub const DEFAULT_LEVEL_SET_ID: &str = "default";

/// Per-difficulty level counts for one set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyBreakdown {
    pub easy: usize,
    pub medium: usize,
    pub hard: usize,
    pub expert: usize,
}

impl DifficultyBreakdown {
    fn record(&mut self, difficulty: AiDifficulty) {
        match difficulty {
            AiDifficulty::Easy => self.easy += 1,
            AiDifficulty::Medium => self.medium += 1,
            AiDifficulty::Hard => self.hard += 1,
            AiDifficulty::Expert => self.expert += 1,
        }
    }

    pub fn count(&self, difficulty: AiDifficulty) -> usize {
        match difficulty {
            AiDifficulty::Easy => self.easy,
            AiDifficulty::Medium => self.medium,
            AiDifficulty::Hard => self.hard,
            AiDifficulty::Expert => self.expert,
        }
    }
}

/// Statistics for one level set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSetStats {
    pub total_levels: usize,
    pub difficulties: DifficultyBreakdown,
}

/// Registry of all constructed level sets, in catalog order.
///
/// Resolves "the current set" through a layered fallback (cached handle,
/// cached id, default set) and owns the "which level loads next" decision
/// consumed by the game loop. Owns copies of both catalogs so the whole
/// mapping can be rebuilt on demand.
pub struct LevelSetManager {
    level_catalog: LevelCatalog,
    set_catalog: LevelSetCatalog,
    sets: Vec<LevelSetHandle>,
    registry: SharedRegistry,
}

impl LevelSetManager {
    pub fn new(
        level_catalog: LevelCatalog,
        set_catalog: LevelSetCatalog,
        registry: SharedRegistry,
    ) -> Self {
        let mut manager = LevelSetManager {
            level_catalog,
            set_catalog,
            sets: Vec::new(),
            registry,
        };
        manager.build();
        manager
    }

    fn build(&mut self) {
        self.sets = self
            .set_catalog
            .iter()
            .map(|definition| {
                Rc::new(RefCell::new(LevelSet::from_definition(
                    definition,
                    &self.level_catalog,
                )))
            })
            .collect();
    }

    /// Discard and reconstruct every set from the catalogs. All previously
    /// returned set and level handles become stale. The cached current-set
    /// handle is evicted so the next resolution re-runs the fallback chain;
    /// the cached id string survives, so the same set id is re-selected.
    pub fn reload_level_sets(&mut self) {
        self.build();
        self.registry.borrow_mut().remove(keys::CURRENT_LEVEL_SET);
    }

    pub fn level_set(&self, id: &str) -> Option<LevelSetHandle> {
        self.sets.iter().find(|s| s.borrow().id() == id).cloned()
    }

    pub fn all_level_sets(&self) -> Vec<LevelSetHandle> {
        self.sets.clone()
    }

    pub fn level_set_ids(&self) -> Vec<String> {
        self.sets.iter().map(|s| s.borrow().id().to_string()).collect()
    }

    pub fn has_level_set(&self, id: &str) -> bool {
        self.level_set(id).is_some()
    }

    fn default_level_set(&self) -> Option<LevelSetHandle> {
        self.level_set(DEFAULT_LEVEL_SET_ID)
            .or_else(|| self.sets.first().cloned())
    }

    /// Resolve the active set through the fallback chain: registry handle,
    /// then registry id string, then the default set. Each step caches its
    /// result into the registry for the next call. Returns `None` only when
    /// no sets exist at all.
    pub fn current_level_set(&self) -> Option<LevelSetHandle> {
        {
            let registry = self.registry.borrow();
            if let Some(handle) = registry.get(keys::CURRENT_LEVEL_SET).and_then(Value::as_level_set) {
                return Some(Rc::clone(handle));
            }
        }

        let cached_id = self
            .registry
            .borrow()
            .get(keys::LEVEL_SET_ID)
            .and_then(|v| v.as_str().map(str::to_string));
        if let Some(id) = cached_id {
            if let Some(handle) = self.level_set(&id) {
                self.cache_current(&handle);
                return Some(handle);
            }
        }

        let fallback = self.default_level_set()?;
        self.cache_current(&fallback);
        Some(fallback)
    }

    fn cache_current(&self, handle: &LevelSetHandle) {
        self.registry
            .borrow_mut()
            .set(keys::CURRENT_LEVEL_SET, Value::LevelSet(Rc::clone(handle)));
    }

    /// Make `set` the active set. Empty sets are rejected.
    pub fn set_current_level_set(&self, set: &LevelSetHandle) -> bool {
        if set.borrow().is_empty() {
            return false;
        }
        self.cache_current(set);
        true
    }

    /// Resolve `id` (unknown ids fall back to the default set) and make the
    /// result active.
    pub fn set_current_level_set_by_id(&self, id: &str) -> bool {
        match self.level_set(id).or_else(|| self.default_level_set()) {
            Some(set) => self.set_current_level_set(&set),
            None => false,
        }
    }

    /// Current level of the active set.
    pub fn current_level(&self) -> Option<Rc<Level>> {
        self.current_level_set()
            .and_then(|set| set.borrow().current_level())
    }

    /// Set the current level within the active set. Levels whose id is not
    /// present in that set (levels from another set included) are rejected.
    pub fn set_current_level(&self, level: &Level) -> bool {
        match self.current_level_set() {
            Some(set) => set.borrow_mut().set_current_level(level),
            None => false,
        }
    }

    /// Level the game loop should load next.
    ///
    /// Consumes the one-shot advance flag: when raised, the active set
    /// advances to its next level (at the end of the set a warning is logged
    /// and progression restarts from the first level). When not raised, the
    /// set rewinds to its first level and that level is returned, so a second
    /// call without re-raising the flag yields the first level again.
    pub fn level_to_load(&self) -> Option<Rc<Level>> {
        let advance = self.registry.borrow_mut().take_flag(keys::LOAD_NEXT_LEVEL);
        let set = self.current_level_set()?;
        let mut set = set.borrow_mut();

        if advance {
            if let Some(next) = set.next_level() {
                return Some(next);
            }
            warn!(set = %set.id(), "no next level to load, restarting from the first");
        }

        let first = set.first()?;
        set.set_current_level_strict(&first);
        Some(first)
    }

    /// Consume the level-set dirty flag raised by the settings layer.
    /// Non-boolean stored values read as `false`.
    pub fn has_level_set_changed(&self) -> bool {
        self.registry.borrow_mut().take_flag(keys::LEVEL_SET_DIRTY)
    }

    /// Level count and AI difficulty histogram for a set, or `None` for an
    /// unknown id.
    pub fn level_set_stats(&self, id: &str) -> Option<LevelSetStats> {
        let set = self.level_set(id)?;
        let set = set.borrow();
        let mut difficulties = DifficultyBreakdown::default();
        for level in set.all_levels() {
            difficulties.record(level.ai_difficulty());
        }
        Some(LevelSetStats {
            total_levels: set.len(),
            difficulties,
        })
    }
}
