use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::catalog::{LevelCatalog, LevelSetDefinition};

use super::Level;

/// Shared handle to a mutable level set.
pub type LevelSetHandle = Rc<RefCell<LevelSet>>;

/// An ordered, doubly linked sequence of levels built from a declarative
/// definition. Owns the "current position" state used by progression.
///
/// Reload semantics are rebuild-from-scratch: a set is never mutated in
/// place, so level handles obtained before a rebuild simply go stale.
#[derive(Debug)]
pub struct LevelSet {
    id: String,
    name: String,
    description: String,
    levels: Vec<Rc<Level>>,
    current: Option<Rc<Level>>,
}

impl LevelSet {
    /// Build a set from its definition, resolving each entry against the
    /// level catalog. Entries referencing an unknown level id are logged and
    /// skipped; the surviving levels receive contiguous indices in entry
    /// order, and `current` starts at the first level.
    pub fn from_definition(definition: &LevelSetDefinition, catalog: &LevelCatalog) -> Self {
        let mut levels: Vec<Rc<Level>> = Vec::with_capacity(definition.levels.len());
        for entry in &definition.levels {
            match catalog.get(&entry.level_id) {
                Some(def) => {
                    levels.push(Level::new(def.clone(), entry.ai_difficulty, levels.len()));
                }
                None => {
                    warn!(
                        set = %definition.id,
                        level = %entry.level_id,
                        "skipping unresolved level id"
                    );
                }
            }
        }

        for i in 0..levels.len() {
            levels[i].set_previous(if i == 0 { None } else { Some(&levels[i - 1]) });
            levels[i].set_next(levels.get(i + 1));
        }

        let current = levels.first().cloned();
        LevelSet {
            id: definition.id.clone(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            levels,
            current,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current level, falling back to the first level when unset
    pub fn current_level(&self) -> Option<Rc<Level>> {
        self.current.clone().or_else(|| self.first())
    }

    /// Set the current level by id equality.
    ///
    /// Succeeds only if a level with that id exists in this set; `current`
    /// then points at this set's own element. Note that a level object
    /// originating from another set, or a stale handle from before a rebuild,
    /// is accepted whenever its id matches. See
    /// [`set_current_level_strict`](LevelSet::set_current_level_strict) for
    /// the identity-checked variant.
    pub fn set_current_level(&mut self, level: &Level) -> bool {
        match self.level_by_id(level.id()) {
            Some(found) => {
                self.current = Some(found);
                true
            }
            None => false,
        }
    }

    /// Reference-identity variant of
    /// [`set_current_level`](LevelSet::set_current_level): only accepts a
    /// handle to one of this set's own levels.
    pub fn set_current_level_strict(&mut self, level: &Rc<Level>) -> bool {
        if self.levels.iter().any(|l| Rc::ptr_eq(l, level)) {
            self.current = Some(Rc::clone(level));
            true
        } else {
            false
        }
    }

    /// Advance to the next level and return it, or return `None` (leaving the
    /// current level unchanged) when already at the last level.
    pub fn next_level(&mut self) -> Option<Rc<Level>> {
        let next = self.current.as_ref().and_then(|current| current.next())?;
        self.current = Some(Rc::clone(&next));
        Some(next)
    }

    pub fn first(&self) -> Option<Rc<Level>> {
        self.levels.first().cloned()
    }

    pub fn last(&self) -> Option<Rc<Level>> {
        self.levels.last().cloned()
    }

    /// Bounds-checked positional access
    pub fn level(&self, index: usize) -> Option<Rc<Level>> {
        self.levels.get(index).cloned()
    }

    pub fn level_by_id(&self, id: &str) -> Option<Rc<Level>> {
        self.levels.iter().find(|l| l.id() == id).cloned()
    }

    /// Position of a level in this set, matched by id
    pub fn level_index(&self, level: &Level) -> Option<usize> {
        self.levels.iter().position(|l| l.id() == level.id())
    }

    /// Snapshot of the ordered level list; mutating the returned vector does
    /// not affect the set.
    pub fn all_levels(&self) -> Vec<Rc<Level>> {
        self.levels.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn has_level(&self, id: &str) -> bool {
        self.level_by_id(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LevelDefinition, LevelSetEntry};
    use crate::level::AiDifficulty;

    fn definition(id: &str) -> LevelDefinition {
        LevelDefinition {
            id: id.to_string(),
            name: format!("Level {id}"),
            description: String::new(),
            grid_size: 4,
            blocked_cells: Vec::new(),
        }
    }

    fn entry(id: &str, difficulty: AiDifficulty) -> LevelSetEntry {
        LevelSetEntry {
            level_id: id.to_string(),
            ai_difficulty: difficulty,
        }
    }

    fn catalog() -> LevelCatalog {
        LevelCatalog::new(vec![
            definition("l1"),
            definition("l2"),
            definition("l3"),
            definition("l4"),
        ])
    }

    fn set_definition(id: &str, entries: Vec<LevelSetEntry>) -> LevelSetDefinition {
        LevelSetDefinition {
            id: id.to_string(),
            name: format!("Set {id}"),
            description: String::new(),
            levels: entries,
        }
    }

    fn three_level_set() -> LevelSet {
        let definition = set_definition(
            "classic",
            vec![
                entry("l1", AiDifficulty::Easy),
                entry("l2", AiDifficulty::Medium),
                entry("l3", AiDifficulty::Hard),
            ],
        );
        LevelSet::from_definition(&definition, &catalog())
    }

    #[test]
    fn test_construction_indices_and_boundaries() {
        let set = three_level_set();
        assert_eq!(set.len(), 3);
        for i in 0..3 {
            assert_eq!(set.level(i).unwrap().index(), i);
        }
        assert!(Rc::ptr_eq(&set.level(0).unwrap(), &set.first().unwrap()));
        assert!(Rc::ptr_eq(&set.level(2).unwrap(), &set.last().unwrap()));
        assert!(set.first().unwrap().previous().is_none());
        assert!(set.last().unwrap().next().is_none());
    }

    #[test]
    fn test_links_are_bidirectional() {
        let set = three_level_set();
        for i in 0..2 {
            let here = set.level(i).unwrap();
            let there = set.level(i + 1).unwrap();
            assert!(Rc::ptr_eq(&here.next().unwrap(), &there));
            assert!(Rc::ptr_eq(&there.previous().unwrap(), &here));
        }
    }

    #[test]
    fn test_unresolved_entry_skipped_with_contiguous_indices() {
        let definition = set_definition(
            "classic",
            vec![
                entry("l1", AiDifficulty::Easy),
                entry("l2", AiDifficulty::Medium),
                entry("nope", AiDifficulty::Hard),
                entry("l3", AiDifficulty::Hard),
            ],
        );
        let set = LevelSet::from_definition(&definition, &catalog());

        assert_eq!(set.len(), 3);
        assert_eq!(set.level(0).unwrap().id(), "l1");
        assert_eq!(set.level(1).unwrap().id(), "l2");
        assert_eq!(set.level(2).unwrap().id(), "l3");
        // No gap despite the skipped entry.
        assert_eq!(set.level(2).unwrap().index(), 2);
        assert!(!set.has_level("nope"));
    }

    #[test]
    fn test_empty_definition_yields_empty_set() {
        let definition = set_definition("empty", Vec::new());
        let set = LevelSet::from_definition(&definition, &catalog());

        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert!(set.first().is_none());
        assert!(set.last().is_none());
        assert!(set.current_level().is_none());
    }

    #[test]
    fn test_singleton_set() {
        let definition = set_definition("solo", vec![entry("l1", AiDifficulty::Easy)]);
        let set = LevelSet::from_definition(&definition, &catalog());

        let only = set.first().unwrap();
        assert!(Rc::ptr_eq(&only, &set.last().unwrap()));
        assert!(only.is_first());
        assert!(only.is_last());
    }

    #[test]
    fn test_current_starts_at_first() {
        let set = three_level_set();
        assert!(Rc::ptr_eq(
            &set.current_level().unwrap(),
            &set.first().unwrap()
        ));
    }

    #[test]
    fn test_next_level_walks_once_then_stops() {
        let mut set = three_level_set();

        let mut visited = vec![set.current_level().unwrap().id().to_string()];
        while let Some(level) = set.next_level() {
            visited.push(level.id().to_string());
        }

        assert_eq!(visited, vec!["l1", "l2", "l3"]);
        // Exhausted: every further call returns None and current stays last.
        assert!(set.next_level().is_none());
        assert!(set.next_level().is_none());
        assert!(Rc::ptr_eq(
            &set.current_level().unwrap(),
            &set.last().unwrap()
        ));
    }

    #[test]
    fn test_next_level_on_empty_set() {
        let definition = set_definition("empty", Vec::new());
        let mut set = LevelSet::from_definition(&definition, &catalog());
        assert!(set.next_level().is_none());
    }

    #[test]
    fn test_set_current_level_by_present_id() {
        let mut set = three_level_set();
        let target = set.level_by_id("l3").unwrap();

        assert!(set.set_current_level(&target));
        assert!(Rc::ptr_eq(&set.current_level().unwrap(), &target));
    }

    #[test]
    fn test_set_current_level_rejects_absent_id() {
        let mut set = three_level_set();
        let before = set.current_level().unwrap();

        let foreign_definition = set_definition("other", vec![entry("l4", AiDifficulty::Easy)]);
        let foreign = LevelSet::from_definition(&foreign_definition, &catalog());
        let foreign_level = foreign.first().unwrap();

        assert!(!set.set_current_level(&foreign_level));
        assert!(Rc::ptr_eq(&set.current_level().unwrap(), &before));
    }

    #[test]
    fn test_set_current_level_accepts_foreign_level_with_matching_id() {
        // Id matching deliberately admits a level from a different set
        // instance; current ends up on this set's own element.
        let mut set = three_level_set();
        let rebuilt = three_level_set();
        let stale = rebuilt.level_by_id("l2").unwrap();

        assert!(set.set_current_level(&stale));
        let current = set.current_level().unwrap();
        assert_eq!(current.id(), "l2");
        assert!(!Rc::ptr_eq(&current, &stale));
        assert!(Rc::ptr_eq(&current, &set.level(1).unwrap()));
    }

    #[test]
    fn test_set_current_level_strict_rejects_foreign_level() {
        let mut set = three_level_set();
        let rebuilt = three_level_set();
        let stale = rebuilt.level_by_id("l2").unwrap();

        assert!(!set.set_current_level_strict(&stale));

        let own = set.level_by_id("l2").unwrap();
        assert!(set.set_current_level_strict(&own));
        assert!(Rc::ptr_eq(&set.current_level().unwrap(), &own));
    }

    #[test]
    fn test_level_lookup() {
        let set = three_level_set();
        assert!(set.level(3).is_none());
        assert!(set.level_by_id("nope").is_none());
        assert!(set.has_level("l2"));

        let l2 = set.level_by_id("l2").unwrap();
        assert_eq!(set.level_index(&l2), Some(1));

        let foreign_definition = set_definition("other", vec![entry("l4", AiDifficulty::Easy)]);
        let foreign = LevelSet::from_definition(&foreign_definition, &catalog());
        assert_eq!(set.level_index(&foreign.first().unwrap()), None);
    }

    #[test]
    fn test_all_levels_returns_fresh_snapshot() {
        let set = three_level_set();
        let a = set.all_levels();
        let mut b = set.all_levels();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert!(Rc::ptr_eq(x, y));
        }

        b.clear();
        assert_eq!(set.len(), 3);
        assert_eq!(set.all_levels().len(), 3);
    }
}
