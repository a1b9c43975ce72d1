use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::catalog::LevelDefinition;

use super::AiDifficulty;

/// A single playable level positioned within a [`LevelSet`](super::LevelSet).
///
/// Levels are created and linked exclusively by their owning set. Consumers
/// navigate through [`next`](Level::next) / [`previous`](Level::previous) and
/// the set's own operations; the links themselves are sealed inside the
/// crate. Forward links are strong, back links weak, so a chain never keeps
/// itself alive.
pub struct Level {
    definition: LevelDefinition,
    difficulty: AiDifficulty,
    index: usize,
    next: RefCell<Option<Rc<Level>>>,
    previous: RefCell<Option<Weak<Level>>>,
}

impl Level {
    pub(crate) fn new(
        definition: LevelDefinition,
        difficulty: AiDifficulty,
        index: usize,
    ) -> Rc<Self> {
        Rc::new(Level {
            definition,
            difficulty,
            index,
            next: RefCell::new(None),
            previous: RefCell::new(None),
        })
    }

    /// Unique id of the underlying level definition
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn description(&self) -> &str {
        &self.definition.description
    }

    pub fn grid_size(&self) -> u32 {
        self.definition.grid_size
    }

    /// Zero-indexed (row, col) cells excluded from play
    pub fn blocked_cells(&self) -> &[(u32, u32)] {
        &self.definition.blocked_cells
    }

    /// The wrapped definition
    pub fn definition(&self) -> &LevelDefinition {
        &self.definition
    }

    /// AI strength for this position in the set, fixed at construction
    pub fn ai_difficulty(&self) -> AiDifficulty {
        self.difficulty
    }

    /// Zero-based position within the owning set
    pub fn index(&self) -> usize {
        self.index
    }

    /// The following level in the set, or `None` for the last level
    pub fn next(&self) -> Option<Rc<Level>> {
        self.next.borrow().clone()
    }

    /// The preceding level in the set, or `None` for the first level
    pub fn previous(&self) -> Option<Rc<Level>> {
        self.previous.borrow().as_ref().and_then(Weak::upgrade)
    }

    pub fn is_first(&self) -> bool {
        self.previous().is_none()
    }

    pub fn is_last(&self) -> bool {
        self.next.borrow().is_none()
    }

    pub(crate) fn set_next(&self, next: Option<&Rc<Level>>) {
        *self.next.borrow_mut() = next.cloned();
    }

    pub(crate) fn set_previous(&self, previous: Option<&Rc<Level>>) {
        *self.previous.borrow_mut() = previous.map(Rc::downgrade);
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("id", &self.id())
            .field("difficulty", &self.difficulty)
            .field("index", &self.index)
            .finish()
    }
}
