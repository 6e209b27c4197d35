/// Shared entry point for concurrent callers.
///
/// The database is built lazily on first use and shared as an
/// `Arc<CharacterDatabase>`. Generation goes through a single generator
/// behind a mutex, so each run's re-seed and draws are never interleaved.

use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

use crate::core::database::{CharacterDatabase, DatabaseBuilder, DatabaseError};
use crate::core::generator::{CharacterGenerator, GenerationError, GeneratorConfig};
use crate::schema::character::Character;
use crate::schema::options::GeneratorOptions;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
}

#[derive(Default)]
struct DatabaseSlot {
    database: Option<Arc<CharacterDatabase>>,
    /// Set by `invalidate`; the next open rebuilds from source.
    stale: bool,
}

pub struct CharacterService {
    builder: DatabaseBuilder,
    slot: Mutex<DatabaseSlot>,
    generator: Mutex<CharacterGenerator>,
}

impl CharacterService {
    pub fn new(builder: DatabaseBuilder, config: GeneratorConfig) -> Self {
        Self {
            builder,
            slot: Mutex::new(DatabaseSlot::default()),
            generator: Mutex::new(CharacterGenerator::new(config)),
        }
    }

    /// The shared database, opened on first call.
    pub fn database(&self) -> Result<Arc<CharacterDatabase>, ServiceError> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(db) = &slot.database {
            return Ok(Arc::clone(db));
        }

        let db = if slot.stale {
            self.builder.clone().force_rebuild(true).open()?
        } else {
            self.builder.open()?
        };
        let db = Arc::new(db);
        slot.database = Some(Arc::clone(&db));
        slot.stale = false;
        Ok(db)
    }

    pub fn generate(&self, opts: &GeneratorOptions) -> Result<Character, ServiceError> {
        let db = self.database()?;
        let mut generator = self.generator.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(generator.generate(&db, opts)?)
    }

    /// Drop the in-memory database; the next request rebuilds it from the
    /// source document.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.database = None;
        slot.stale = true;
        tracing::info!(cache = %self.builder.cache_file().display(), "invalidated character database");
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .database
            .is_some()
    }
}
