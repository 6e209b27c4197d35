/// File persistence for the character database and name tables.
///
/// The format follows the file extension: `.json` is read and written as
/// JSON, anything else as RON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonWrite(#[from] ron::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cached database is missing path '{0}'")]
    MissingPath(String),
    #[error("cached database has unknown path '{0}'")]
    UnknownPath(String),
    #[error("cached path '{path}' has tiers {found:?}, expected {expected:?}")]
    TierMismatch {
        path: String,
        expected: Vec<u32>,
        found: Vec<u32>,
    },
}

/// Serialization format of a persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Json,
}

impl Format {
    pub fn for_path(path: &Path) -> Format {
        match path.extension().and_then(|s| s.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
            _ => Format::Ron,
        }
    }
}

/// Read and deserialize `path` in the format implied by its extension.
pub fn read_file<T: DeserializeOwned>(path: &Path) -> Result<T, PersistenceError> {
    let contents = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match Format::for_path(path) {
        Format::Json => Ok(serde_json::from_str(&contents)?),
        Format::Ron => Ok(ron::from_str(&contents)?),
    }
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub fn write_file<T: Serialize>(value: &T, path: &Path) -> Result<(), PersistenceError> {
    let serialized = match Format::for_path(path) {
        Format::Json => serde_json::to_string(value)?,
        Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())?,
    };
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, serialized).map_err(io_err)
}
