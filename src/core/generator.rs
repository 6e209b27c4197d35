/// Generation engine: walks a character through its path slots.
///
/// Slots are resolved in a fixed order (ancestry, novice, expert, master),
/// each gated by the character's level. Every draw comes from the
/// generator's own `SeededRng`, re-seeded once at the start of each run, so
/// a seed plus a database fully determines the result.

use thiserror::Error;

use crate::core::database::CharacterDatabase;
use crate::core::rng::{RngError, SeededRng};
use crate::schema::character::{Character, PrimaryAttribute};
use crate::schema::options::GeneratorOptions;
use crate::schema::path::{PathCategory, PathLevels};

/// Grant added at the first novice tier ahead of any extracted grant.
pub const NOVICE_GRANT: &str = "Two professions of your choice; trade one for a language.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("random source error: {0}")]
    Rng(#[from] RngError),
    #[error("'{name}' is not a known {category} path")]
    UnknownPath {
        category: PathCategory,
        name: String,
    },
    #[error("path '{0}' is missing from the character database")]
    MissingPath(String),
    #[error("unknown gender '{0}'")]
    UnknownGender(String),
    #[error("level {level} is above the maximum of {max}")]
    LevelOutOfRange { level: u32, max: u32 },
}

/// Rule-set parameters that are not part of the extracted database.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub genders: Vec<String>,
    /// Ancestry whose base tier grants an extra random attribute point.
    pub default_ancestry: String,
    pub max_level: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            genders: vec!["Male".to_string(), "Female".to_string(), "Other".to_string()],
            default_ancestry: "Human".to_string(),
            max_level: 10,
        }
    }
}

pub struct CharacterGenerator {
    rng: SeededRng,
    config: GeneratorConfig,
}

impl Default for CharacterGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}

impl CharacterGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            rng: SeededRng::fresh(),
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Seed used by the most recent run.
    pub fn seed(&self) -> &str {
        self.rng.seed()
    }

    /// Generate one character.
    ///
    /// Run order: re-seed, level, path slots, gender, name. Explicit options
    /// are validated rather than silently replaced.
    pub fn generate(
        &mut self,
        db: &CharacterDatabase,
        opts: &GeneratorOptions,
    ) -> Result<Character, GenerationError> {
        let seed = self
            .rng
            .reseed(opts.seed.as_deref().unwrap_or_default())?
            .to_string();

        let level = self.choose_level(opts.level)?;
        let mut character = Character {
            level,
            seed,
            ..Default::default()
        };

        for category in PathCategory::ALL {
            if level < category.entry_level() {
                continue;
            }
            let path = self.choose_path(category, opts.path_for(category))?;
            let levels = db
                .get(&path)
                .ok_or_else(|| GenerationError::MissingPath(path.clone()))?;
            self.fold_path(&mut character, category, &path, levels)?;
            character.attributes.recalculate();
            tracing::debug!(%category, path = %path, "resolved slot");

            match category {
                PathCategory::Ancestry => character.ancestry = path,
                PathCategory::Novice => character.novice_path = Some(path),
                PathCategory::Expert => character.expert_path = Some(path),
                PathCategory::Master => character.master_path = Some(path),
            }
        }

        character.gender = self.choose_gender(opts.gender.as_deref())?;
        character.name = match opts.name.as_deref().filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => db
                .names
                .sample_name(&mut self.rng, &character.ancestry, &character.gender)?,
        };

        tracing::info!(
            seed = %character.seed,
            level = character.level,
            ancestry = %character.ancestry,
            "generated character"
        );
        Ok(character)
    }

    fn choose_level(&mut self, requested: Option<u32>) -> Result<u32, GenerationError> {
        let max = self.config.max_level;
        match requested {
            Some(level) if level > max => Err(GenerationError::LevelOutOfRange { level, max }),
            Some(level) => Ok(level),
            None => Ok(self.rng.uniform_int(0, i64::from(max) + 1)? as u32),
        }
    }

    fn choose_path(
        &mut self,
        category: PathCategory,
        requested: Option<&str>,
    ) -> Result<String, GenerationError> {
        match requested {
            Some(name) if category.contains(name) => Ok(name.to_string()),
            Some(name) => Err(GenerationError::UnknownPath {
                category,
                name: name.to_string(),
            }),
            None => Ok(self.rng.choice(category.path_names())?.to_string()),
        }
    }

    fn choose_gender(&mut self, requested: Option<&str>) -> Result<String, GenerationError> {
        match requested.filter(|g| !g.is_empty()) {
            Some(gender) if self.config.genders.iter().any(|known| known == gender) => {
                Ok(gender.to_string())
            }
            Some(gender) => Err(GenerationError::UnknownGender(gender.to_string())),
            None => Ok(self.rng.choice(&self.config.genders)?.clone()),
        }
    }

    /// Fold every unlocked tier of one path, lowest level first.
    fn fold_path(
        &mut self,
        character: &mut Character,
        category: PathCategory,
        path: &str,
        levels: &PathLevels,
    ) -> Result<(), GenerationError> {
        for (&tier, record) in levels.range(..=character.level) {
            if category == PathCategory::Novice && tier == category.entry_level() {
                character.lang_and_prof.push(NOVICE_GRANT.to_string());
            }
            character.attributes.apply(record);
            character.talents.extend(record.talents.iter().cloned());
            character.lang_and_prof.extend(record.lang_and_prof.iter().cloned());

            for _ in 0..self.random_increments(tier, path) {
                let attr = *self.rng.choice(&PrimaryAttribute::ALL)?;
                character.attributes.increment(attr);
            }
        }
        Ok(())
    }

    /// Random +1s granted after folding the tier unlocked at `tier`.
    fn random_increments(&self, tier: u32, path: &str) -> usize {
        match tier {
            0 if path == self.config.default_ancestry => 1,
            1 | 3 => 2,
            7 => 3,
            _ => 0,
        }
    }
}
