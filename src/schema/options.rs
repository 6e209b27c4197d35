use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::path::PathCategory;
use crate::core::persist::PersistenceError;

/// Default location of the persisted character database.
pub const DEFAULT_CACHE_FILE: &str = "assets/Shadow_of_the_Demon_Lord.ron";

/// Options for one generation request.
///
/// Every field is optional; unset fields are drawn from the seeded RNG or
/// fall back to crate defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub level: Option<u32>,
    pub ancestry: Option<String>,
    pub novice_path: Option<String>,
    pub expert_path: Option<String>,
    pub master_path: Option<String>,
    /// Hex seed; a fresh one is synthesized when absent.
    pub seed: Option<String>,
    /// Source rulebook; supplying it forces the database to be rebuilt.
    #[serde(alias = "source_document")]
    pub data_file: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub names_file: Option<PathBuf>,
    pub force_rebuild: bool,
    pub log_level: Option<String>,
}

impl GeneratorOptions {
    /// Load options from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<GeneratorOptions, PersistenceError> {
        let contents = std::fs::read_to_string(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(ron::from_str(&contents)?)
    }

    /// Overlay `other` on top of `self`: any field set in `other` wins.
    pub fn merge(self, other: GeneratorOptions) -> GeneratorOptions {
        GeneratorOptions {
            name: other.name.or(self.name),
            gender: other.gender.or(self.gender),
            level: other.level.or(self.level),
            ancestry: other.ancestry.or(self.ancestry),
            novice_path: other.novice_path.or(self.novice_path),
            expert_path: other.expert_path.or(self.expert_path),
            master_path: other.master_path.or(self.master_path),
            seed: other.seed.or(self.seed),
            data_file: other.data_file.or(self.data_file),
            cache_file: other.cache_file.or(self.cache_file),
            names_file: other.names_file.or(self.names_file),
            force_rebuild: self.force_rebuild || other.force_rebuild,
            log_level: other.log_level.or(self.log_level),
        }
    }

    /// The explicitly requested path for a slot, if any.
    pub fn path_for(&self, category: PathCategory) -> Option<&str> {
        match category {
            PathCategory::Ancestry => self.ancestry.as_deref(),
            PathCategory::Novice => self.novice_path.as_deref(),
            PathCategory::Expert => self.expert_path.as_deref(),
            PathCategory::Master => self.master_path.as_deref(),
        }
        .filter(|p| !p.is_empty())
    }

    /// `tracing` filter directive for `log_level`; unrecognized or absent
    /// levels fall back to errors only.
    pub fn log_directive(&self) -> &'static str {
        match self.log_level.as_deref().map(str::to_ascii_uppercase).as_deref() {
            Some("DEBUG") => "debug",
            Some("INFO") => "info",
            Some("WARNING") | Some("WARN") => "warn",
            _ => "error",
        }
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE))
    }
}
