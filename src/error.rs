use std::path::PathBuf;

/// Errors that can occur while loading level content catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("catalog validation error: {0}")]
    Validation(String),
}

/// Errors raised by durable settings storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read store file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write store file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse store file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when reading or updating game settings.
///
/// `UnknownKey` and `InvalidValue` indicate caller bugs: the settings schema
/// is fixed, so these are never expected from valid calling code.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("unknown settings key: {0}")]
    UnknownKey(String),

    #[error("invalid value for settings key {key}: expected {expected}")]
    InvalidValue { key: String, expected: &'static str },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
