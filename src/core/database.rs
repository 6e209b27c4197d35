/// Character database: every path's tiers plus the name table.
///
/// Built once from the rulebook (or loaded from the cache file), then
/// shared read-only by every generation run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::core::extract::{self, ExtractionError};
use crate::core::names::NameTable;
use crate::core::persist::{self, PersistenceError};
use crate::core::textract::{CommandExtractor, SubprocessError, TextExtractor};
use crate::schema::options::{GeneratorOptions, DEFAULT_CACHE_FILE};
use crate::schema::path::{PathCategory, PathLevels, PathMap};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
    #[error("text extraction error: {0}")]
    Subprocess(#[from] SubprocessError),
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("cannot rebuild '{0}': no source document configured")]
    NoSourceDocument(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CharacterDatabase {
    pub paths: PathMap,
    #[serde(default)]
    pub names: NameTable,
}

impl CharacterDatabase {
    pub fn builder() -> DatabaseBuilder {
        DatabaseBuilder::default()
    }

    /// A database with every known path registered against its category's
    /// tier set, all tiers empty.
    pub fn empty() -> CharacterDatabase {
        let paths = PathCategory::ALL
            .iter()
            .flat_map(|category| {
                category
                    .path_names()
                    .iter()
                    .map(move |name| (name.to_string(), category.empty_levels()))
            })
            .collect();
        CharacterDatabase {
            paths,
            names: NameTable::default(),
        }
    }

    pub fn get(&self, path: &str) -> Option<&PathLevels> {
        self.paths.get(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Check that exactly the known paths are present, each with its
    /// category's tier set.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        for category in PathCategory::ALL {
            for &name in category.path_names() {
                let levels = self
                    .paths
                    .get(name)
                    .ok_or_else(|| PersistenceError::MissingPath(name.to_string()))?;
                let found: Vec<u32> = levels.keys().copied().collect();
                if found != category.unlock_levels() {
                    return Err(PersistenceError::TierMismatch {
                        path: name.to_string(),
                        expected: category.unlock_levels().to_vec(),
                        found,
                    });
                }
            }
        }
        let mut unknown: Vec<&String> = self
            .paths
            .keys()
            .filter(|name| PathCategory::of(name).is_none())
            .collect();
        unknown.sort();
        match unknown.first() {
            Some(name) => Err(PersistenceError::UnknownPath(name.to_string())),
            None => Ok(()),
        }
    }

    /// Load and validate a persisted database.
    pub fn load(path: &Path) -> Result<CharacterDatabase, PersistenceError> {
        let db: CharacterDatabase = persist::read_file(path)?;
        db.validate()?;
        tracing::info!(
            paths = db.len(),
            name_lists = db.names.lists.len(),
            path = %path.display(),
            "loaded character database"
        );
        Ok(db)
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persist::write_file(self, path)?;
        tracing::info!(paths = self.len(), path = %path.display(), "saved character database");
        Ok(())
    }

    /// Number of registered paths per category, in resolution order.
    pub fn summary(&self) -> Vec<(PathCategory, usize)> {
        PathCategory::ALL
            .iter()
            .map(|&category| {
                let count = category
                    .path_names()
                    .iter()
                    .filter(|name| self.paths.contains_key(**name))
                    .count();
                (category, count)
            })
            .collect()
    }
}

/// Builder deciding between loading the cache and rebuilding from source.
#[derive(Clone)]
pub struct DatabaseBuilder {
    cache_path: PathBuf,
    source_document: Option<PathBuf>,
    names_file: Option<PathBuf>,
    force_rebuild: bool,
    extractor: Arc<dyn TextExtractor>,
}

impl Default for DatabaseBuilder {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(DEFAULT_CACHE_FILE),
            source_document: None,
            names_file: None,
            force_rebuild: false,
            extractor: Arc::new(CommandExtractor::default()),
        }
    }
}

impl fmt::Debug for DatabaseBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseBuilder")
            .field("cache_path", &self.cache_path)
            .field("source_document", &self.source_document)
            .field("names_file", &self.names_file)
            .field("force_rebuild", &self.force_rebuild)
            .finish_non_exhaustive()
    }
}

impl DatabaseBuilder {
    /// Builder configured from the file-related generation options.
    pub fn from_options(opts: &GeneratorOptions) -> Self {
        let mut builder = Self::default()
            .cache_path(opts.cache_file())
            .force_rebuild(opts.force_rebuild);
        builder.source_document = opts.data_file.clone();
        builder.names_file = opts.names_file.clone();
        builder
    }

    pub fn cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Source rulebook; supplying one makes `open` rebuild.
    pub fn source_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_document = Some(path.into());
        self
    }

    pub fn names_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.names_file = Some(path.into());
        self
    }

    pub fn force_rebuild(mut self, force: bool) -> Self {
        self.force_rebuild = force;
        self
    }

    /// Replace the text-extraction collaborator.
    pub fn extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractor = Arc::new(extractor);
        self
    }

    pub fn cache_file(&self) -> &Path {
        &self.cache_path
    }

    /// Whether `open` will rebuild rather than load the cache.
    pub fn needs_rebuild(&self) -> bool {
        self.force_rebuild || self.source_document.is_some() || !self.cache_path.exists()
    }

    /// Load the cached database, or rebuild and persist it.
    pub fn open(&self) -> Result<CharacterDatabase, DatabaseError> {
        if !self.needs_rebuild() {
            return Ok(CharacterDatabase::load(&self.cache_path)?);
        }

        let source = self
            .source_document
            .as_deref()
            .ok_or_else(|| DatabaseError::NoSourceDocument(self.cache_path.clone()))?;
        tracing::info!(
            source = %source.display(),
            cache = %self.cache_path.display(),
            "rebuilding character database"
        );

        let text = self.extractor.extract_text(source)?;
        let db = self.build_from_text(&text)?;
        db.save(&self.cache_path)?;
        Ok(db)
    }

    /// Build a database from already-extracted rulebook text, without
    /// touching the cache.
    pub fn build_from_text(&self, doc: &str) -> Result<CharacterDatabase, DatabaseError> {
        let mut db = CharacterDatabase::empty();
        for category in PathCategory::ALL {
            extract::extract_category(doc, category, &mut db.paths)?;
        }
        match &self.names_file {
            Some(path) => {
                db.names = NameTable::load(path)?;
                if db.names.is_empty() {
                    tracing::warn!(path = %path.display(), "name table is empty");
                }
            }
            None => tracing::warn!("no name table configured; generated names will be empty"),
        }
        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::textract::StaticText;
    use crate::schema::path::LevelRecord;

    #[test]
    fn empty_registers_every_path() {
        let db = CharacterDatabase::empty();
        assert_eq!(db.len(), 90);
        assert_eq!(
            db.get("Wizard").unwrap().keys().copied().collect::<Vec<_>>(),
            vec![3, 6, 9]
        );
        assert!(db.validate().is_ok());
    }

    #[test]
    fn validate_reports_missing_path() {
        let mut db = CharacterDatabase::empty();
        db.paths.remove("Orc");
        assert!(matches!(
            db.validate(),
            Err(PersistenceError::MissingPath(name)) if name == "Orc"
        ));
    }

    #[test]
    fn validate_reports_tier_mismatch() {
        let mut db = CharacterDatabase::empty();
        db.paths
            .get_mut("Rogue")
            .unwrap()
            .insert(3, LevelRecord::default());
        match db.validate() {
            Err(PersistenceError::TierMismatch { path, expected, found }) => {
                assert_eq!(path, "Rogue");
                assert_eq!(expected, vec![1, 2, 5, 8]);
                assert_eq!(found, vec![1, 2, 3, 5, 8]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn validate_reports_unknown_path() {
        let mut db = CharacterDatabase::empty();
        db.paths
            .insert("Elf".to_string(), PathCategory::Ancestry.empty_levels());
        assert!(matches!(
            db.validate(),
            Err(PersistenceError::UnknownPath(name)) if name == "Elf"
        ));
    }

    #[test]
    fn summary_counts_each_category() {
        let summary = CharacterDatabase::empty().summary();
        let counts: Vec<usize> = summary.iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, vec![6, 4, 16, 64]);
    }

    #[test]
    fn rebuild_without_source_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let builder = CharacterDatabase::builder().cache_path(dir.path().join("db.ron"));
        assert!(builder.needs_rebuild());
        assert!(matches!(
            builder.open(),
            Err(DatabaseError::NoSourceDocument(_))
        ));
    }

    #[test]
    fn extraction_failure_aborts_build() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("db.ron");
        let builder = CharacterDatabase::builder()
            .cache_path(&cache)
            .source_document("core.pdf")
            .extractor(StaticText("nothing useful here".to_string()));
        assert!(matches!(
            builder.open(),
            Err(DatabaseError::Extraction(ExtractionError::PatternNotMatched { .. }))
        ));
        assert!(!cache.exists());
    }

    #[test]
    fn corrupt_cache_is_not_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let cache = dir.path().join("db.ron");
        std::fs::write(&cache, "(paths: {}, names: [])").unwrap();
        let builder = CharacterDatabase::builder().cache_path(&cache);
        assert!(!builder.needs_rebuild());
        assert!(matches!(
            builder.open(),
            Err(DatabaseError::Persistence(PersistenceError::MissingPath(_)))
        ));
    }

    #[test]
    fn from_options_copies_file_settings() {
        let opts = GeneratorOptions {
            data_file: Some(PathBuf::from("core.pdf")),
            cache_file: Some(PathBuf::from("cache.json")),
            names_file: Some(PathBuf::from("names.json")),
            ..Default::default()
        };
        let builder = DatabaseBuilder::from_options(&opts);
        assert_eq!(builder.cache_file(), Path::new("cache.json"));
        assert!(builder.needs_rebuild());
        assert_eq!(builder.names_file, Some(PathBuf::from("names.json")));
    }
}
