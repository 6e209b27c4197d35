/// Name table and name sampling by ancestry, ethnicity and gender.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::persist::{self, PersistenceError};
use crate::core::rng::{RngError, SeededRng};

/// Name-list `type` marking family names rather than given names.
pub const SURNAME: &str = "Surname";

/// One list of names for an (ancestry, ethnicity, type) triple.
///
/// `type` is either a gender label or [`SURNAME`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameList {
    pub ancestry: String,
    pub ethnicity: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub names: Vec<String>,
}

/// All name lists, in file order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameTable {
    pub lists: Vec<NameList>,
}

impl NameTable {
    pub fn new(lists: Vec<NameList>) -> Self {
        Self { lists }
    }

    /// Load a standalone name table (`.json` or RON).
    pub fn load(path: &Path) -> Result<NameTable, PersistenceError> {
        let table: NameTable = persist::read_file(path)?;
        tracing::debug!(lists = table.lists.len(), path = %path.display(), "loaded name table");
        Ok(table)
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Distinct ethnicities recorded for `ancestry`, in table order.
    pub fn ethnicities_for(&self, ancestry: &str) -> Vec<&str> {
        let mut found: Vec<&str> = Vec::new();
        for list in self.lists.iter().filter(|l| l.ancestry == ancestry) {
            if !found.contains(&list.ethnicity.as_str()) {
                found.push(&list.ethnicity);
            }
        }
        found
    }

    /// Every name of `kind` within `ethnicity`, concatenated in table order.
    pub fn pool(&self, ethnicity: &str, kind: &str) -> Vec<&str> {
        self.lists
            .iter()
            .filter(|l| l.ethnicity == ethnicity && l.kind == kind)
            .flat_map(|l| l.names.iter().map(String::as_str))
            .collect()
    }

    /// Draw a "First Last" name for a character.
    ///
    /// The ethnicity is drawn from those recorded for `ancestry`, or from a
    /// random table entry when the ancestry has none. An empty pool leaves
    /// its half of the name out. An empty table yields an empty name without
    /// consuming any randomness.
    pub fn sample_name(
        &self,
        rng: &mut SeededRng,
        ancestry: &str,
        gender: &str,
    ) -> Result<String, RngError> {
        if self.is_empty() {
            return Ok(String::new());
        }

        let mut candidates = self.ethnicities_for(ancestry);
        if candidates.is_empty() {
            let fallback = rng.choice(&self.lists)?;
            tracing::debug!(
                ancestry,
                ethnicity = %fallback.ethnicity,
                "no names for ancestry, falling back to random ethnicity"
            );
            candidates.push(&fallback.ethnicity);
        }
        let ethnicity = *rng.choice(&candidates)?;

        let first = draw(rng, &self.pool(ethnicity, gender))?;
        let last = draw(rng, &self.pool(ethnicity, SURNAME))?;

        Ok([first, last]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" "))
    }
}

fn draw<'a>(rng: &mut SeededRng, pool: &[&'a str]) -> Result<&'a str, RngError> {
    if pool.is_empty() {
        return Ok("");
    }
    Ok(*rng.choice(pool)?)
}
