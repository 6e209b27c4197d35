//! Shadow of the Demon Lord character generator.
//!
//! Extracts per-level advancement records for every ancestry and path from
//! the rulebook's plain text into a cached database, then generates
//! characters from it deterministically: the same hex seed and database
//! always yield the same character.

pub mod core;
pub mod schema;
