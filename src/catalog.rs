use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CatalogError;
use crate::level::AiDifficulty;

/// Immutable description of a single puzzle level, authored externally.
///
/// Blocked-cell geometry (bounds, duplicates, grid connectivity) is an
/// authoring-time concern and is not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub grid_size: u32,
    /// Zero-indexed (row, col) cells excluded from play.
    #[serde(default)]
    pub blocked_cells: Vec<(u32, u32)>,
}

/// One entry of a level-set definition: which level to play, and how strong
/// the AI opponent is at that position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSetEntry {
    pub level_id: String,
    pub ai_difficulty: AiDifficulty,
}

/// Ordered, declarative description of a level set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSetDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub levels: Vec<LevelSetEntry>,
}

/// Lookup table from level id to definition.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    definitions: Vec<LevelDefinition>,
}

impl LevelCatalog {
    pub fn new(definitions: Vec<LevelDefinition>) -> Self {
        LevelCatalog { definitions }
    }

    /// Find a level definition by id.
    pub fn get(&self, id: &str) -> Option<&LevelDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Ordered list of level-set definitions, consumed once per manager build.
#[derive(Debug, Clone, Default)]
pub struct LevelSetCatalog {
    definitions: Vec<LevelSetDefinition>,
}

impl LevelSetCatalog {
    pub fn new(definitions: Vec<LevelSetDefinition>) -> Self {
        LevelSetCatalog { definitions }
    }

    /// Iterate definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &LevelSetDefinition> {
        self.definitions.iter()
    }

    pub fn get(&self, id: &str) -> Option<&LevelSetDefinition> {
        self.definitions.iter().find(|d| d.id == id)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// On-disk catalog format: one TOML file holding level definitions and the
/// level sets built from them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub levels: Vec<LevelDefinition>,
    pub level_sets: Vec<LevelSetDefinition>,
}

impl CatalogFile {
    /// Load a catalog from a TOML file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog: CatalogFile = toml::from_str(&content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a TOML file, falling back to an empty catalog if
    /// the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, CatalogError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "catalog file not found, starting empty");
            Ok(Self::default())
        }
    }

    /// Validate catalog contents: ids must be unique and grid sizes positive.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for (i, level) in self.levels.iter().enumerate() {
            if level.grid_size == 0 {
                return Err(CatalogError::Validation(format!(
                    "level '{}': grid_size must be > 0",
                    level.id
                )));
            }
            if self.levels[..i].iter().any(|other| other.id == level.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate level id '{}'",
                    level.id
                )));
            }
        }
        for (i, set) in self.level_sets.iter().enumerate() {
            if self.level_sets[..i].iter().any(|other| other.id == set.id) {
                return Err(CatalogError::Validation(format!(
                    "duplicate level set id '{}'",
                    set.id
                )));
            }
        }
        Ok(())
    }

    /// Split into the two catalogs the progression layer consumes.
    pub fn into_catalogs(self) -> (LevelCatalog, LevelSetCatalog) {
        (
            LevelCatalog::new(self.levels),
            LevelSetCatalog::new(self.level_sets),
        )
    }
}
