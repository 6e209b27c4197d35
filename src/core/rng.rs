/// Seeded randomness for character generation.
///
/// Every draw made while generating a character comes from one `SeededRng`,
/// re-seeded once per run from a hex string that is echoed back on the
/// character so the run can be reproduced.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RngError {
    #[error("invalid seed '{seed}': {source}")]
    InvalidSeed {
        seed: String,
        #[source]
        source: hex::FromHexError,
    },
    #[error("empty range [{min}, {max})")]
    EmptyRange { min: i64, max: i64 },
    #[error("cannot choose from an empty sequence")]
    EmptyChoice,
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("cannot sample {requested} items from {available}")]
    SampleTooLarge { requested: usize, available: usize },
}

fn wall_clock_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Hex seed derived from the current wall-clock time.
pub fn fresh_seed_hex() -> String {
    format!("{:016x}", wall_clock_nanos())
}

/// Resolve a hex seed string into its canonical form and numeric value.
///
/// An empty (or blank) input synthesizes a fresh seed. The decoded bytes
/// are read as a big-endian `u64`: only the first eight bytes count, and
/// shorter inputs are zero-extended on the left.
pub fn derive_seed(hex_seed: &str) -> Result<(String, u64), RngError> {
    let trimmed = hex_seed.trim();
    let canonical = if trimmed.is_empty() {
        fresh_seed_hex()
    } else {
        trimmed.to_ascii_lowercase()
    };

    let bytes = hex::decode(&canonical).map_err(|source| RngError::InvalidSeed {
        seed: canonical.clone(),
        source,
    })?;

    let mut buf = [0u8; 8];
    let take = bytes.len().min(8);
    buf[8 - take..].copy_from_slice(&bytes[..take]);
    Ok((canonical, u64::from_be_bytes(buf)))
}

/// A reproducible random source keyed by a hex seed.
#[derive(Debug, Clone)]
pub struct SeededRng {
    seed: String,
    value: u64,
    rng: StdRng,
}

impl SeededRng {
    /// Build a generator from a hex seed (empty for a fresh one).
    pub fn from_hex(hex_seed: &str) -> Result<SeededRng, RngError> {
        let (seed, value) = derive_seed(hex_seed)?;
        Ok(SeededRng {
            seed,
            value,
            rng: StdRng::seed_from_u64(value),
        })
    }

    /// A generator keyed by the current wall-clock time.
    pub fn fresh() -> SeededRng {
        let value = wall_clock_nanos();
        SeededRng {
            seed: format!("{:016x}", value),
            value,
            rng: StdRng::seed_from_u64(value),
        }
    }

    /// Re-initialize from a new hex seed and return its canonical form.
    ///
    /// On error the current state is left untouched.
    pub fn reseed(&mut self, hex_seed: &str) -> Result<&str, RngError> {
        *self = SeededRng::from_hex(hex_seed)?;
        tracing::info!(seed = %self.seed, value = self.value, "set new seed");
        Ok(&self.seed)
    }

    /// Canonical hex seed currently in effect.
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Numeric seed currently in effect.
    pub fn seed_value(&self) -> u64 {
        self.value
    }

    /// Integer in `[min, max)`.
    pub fn uniform_int(&mut self, min: i64, max: i64) -> Result<i64, RngError> {
        if min >= max {
            return Err(RngError::EmptyRange { min, max });
        }
        Ok(self.rng.gen_range(min..max))
    }

    /// Uniform pick over a non-empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        if items.is_empty() {
            return Err(RngError::EmptyChoice);
        }
        Ok(&items[self.rng.gen_range(0..items.len())])
    }

    /// Pick `items[i]` with probability proportional to `weights[i]`.
    pub fn weighted_choice<'a, T>(
        &mut self,
        items: &'a [T],
        weights: &[f64],
    ) -> Result<&'a T, RngError> {
        if items.len() != weights.len() {
            return Err(RngError::InvalidWeights(format!(
                "{} items but {} weights",
                items.len(),
                weights.len()
            )));
        }
        let dist =
            WeightedIndex::new(weights).map_err(|e| RngError::InvalidWeights(e.to_string()))?;
        Ok(&items[dist.sample(&mut self.rng)])
    }

    /// `n` distinct items drawn from a random permutation of `items`.
    pub fn sample_without_replacement<T: Clone>(
        &mut self,
        items: &[T],
        n: usize,
    ) -> Result<Vec<T>, RngError> {
        if n > items.len() {
            return Err(RngError::SampleTooLarge {
                requested: n,
                available: items.len(),
            });
        }
        Ok(index::sample(&mut self.rng, items.len(), n)
            .into_iter()
            .map(|i| items[i].clone())
            .collect())
    }
}
