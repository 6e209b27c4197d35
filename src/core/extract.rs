/// Extraction engine: turns rulebook text into per-tier level records.
///
/// For every path of a category, each tier template is compiled with the
/// path name, matched once against the whole document, and the named
/// captures are folded into that tier's `LevelRecord`. The document layout
/// is assumed fixed: a tier that fails to match is an error, not a skip.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::core::patterns;
use crate::schema::path::{LevelRecord, PathCategory, PathLevels, PathMap};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no match for {path} level {level}")]
    PatternNotMatched { path: String, level: u32 },
    #[error("{path} level {level}: group {group} is not a number: '{value}'")]
    NotNumeric {
        path: String,
        level: u32,
        group: String,
        value: String,
    },
    #[error("path '{0}' was not registered before extraction")]
    UnregisteredPath(String),
    #[error("path '{path}' has no tier for level {level}")]
    MissingTier { path: String, level: u32 },
    #[error("pattern compile error: {0}")]
    Regex(#[from] regex::Error),
}

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));

static BONUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"score\s*\+\s*(\d+)").expect("bonus regex"));

static LANGUAGES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Languages and Professions (.*?\.)").expect("languages regex")
});

/// Stat a phrase inside an attribute or characteristic block adds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stat {
    Strength,
    Agility,
    Intellect,
    Will,
    Perception,
    Defense,
    Health,
    Power,
}

static STAT_PHRASES: Lazy<Vec<(Stat, Regex)>> = Lazy::new(|| {
    [
        (Stat::Strength, r"Strength (\d+)"),
        (Stat::Agility, r"Agility (\d+)"),
        (Stat::Intellect, r"Intellect (\d+)"),
        (Stat::Will, r"Will (\d+)"),
        (Stat::Perception, r"Perception\s*(?:by|\+)\s*(\d+)"),
        (Stat::Defense, r"Defense\s*(?:by|\+)\s*(\d+)"),
        (Stat::Health, r"Health\s*(?:by|\+)\s*(\d+)"),
        (Stat::Power, r"Power\s*(?:by|\+)\s*(\d+)"),
    ]
    .into_iter()
    .map(|(stat, pattern)| (stat, Regex::new(pattern).expect("stat phrase regex")))
    .collect()
});

/// Collapse whitespace runs to one space and trim.
pub fn normalize(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// A captured value that should have been an integer.
#[derive(Debug)]
struct BadNumber {
    group: String,
    value: String,
}

fn parse_int(group: &str, text: &str) -> Result<i32, BadNumber> {
    text.parse().map_err(|_| BadNumber {
        group: group.to_string(),
        value: text.to_string(),
    })
}

/// Add every stat phrase found in an `Attr` or `Char` block.
fn parse_primary(record: &mut LevelRecord, group: &str, text: &str) -> Result<(), BadNumber> {
    for (stat, re) in STAT_PHRASES.iter() {
        for caps in re.captures_iter(text) {
            let n = parse_int(group, &caps[1])?;
            let field = match stat {
                Stat::Strength => &mut record.strength,
                Stat::Agility => &mut record.agility,
                Stat::Intellect => &mut record.intellect,
                Stat::Will => &mut record.will,
                Stat::Perception => &mut record.perception_mod,
                Stat::Defense => &mut record.defense_mod,
                Stat::Health => &mut record.health_mod,
                Stat::Power => &mut record.power,
            };
            *field += n;
        }
    }
    Ok(())
}

/// Read an "equals your <Attribute> score + N" formula.
fn parse_derived(record: &mut LevelRecord, group: &str, text: &str) -> Result<(), BadNumber> {
    let bonus = match BONUS.captures(text) {
        Some(caps) => parse_int(group, &caps[1])?,
        None => 0,
    };
    if text.contains("equals your Strength") {
        record.health_mod += bonus;
    }
    if text.contains("equals your Agility") {
        record.defense_mod += bonus;
    }
    if text.contains("equals your Intellect") {
        record.perception_mod += bonus;
    }
    Ok(())
}

fn parse_healing_rate(record: &mut LevelRecord, text: &str) {
    if text.contains("one-quarter your Health") {
        record.healing_rate = 0.25;
    }
}

/// Split a `Desc` block into a languages grant and a talent.
fn parse_talents(record: &mut LevelRecord, text: &str) {
    let mut remainder = text.to_string();
    if let Some(caps) = LANGUAGES.captures(text) {
        record.lang_and_prof.push(caps[1].to_string());
        remainder = remainder.replacen(&caps[0], "", 1);
    }
    let remainder = normalize(&remainder);
    if !remainder.is_empty() {
        record.talents.push(remainder);
    }
}

/// Fold one named capture into a record. `Desc` is handled separately.
fn apply_group(record: &mut LevelRecord, group: &str, text: &str) -> Result<(), BadNumber> {
    match group {
        "Attr" | "Char" => parse_primary(record, group, text)?,
        "Perc" | "Def" | "Hlth" => parse_derived(record, group, text)?,
        "HR" => parse_healing_rate(record, text),
        "Sz" => record.size = text.to_string(),
        "Spd" => record.speed += parse_int(group, text)?,
        "Pwr" => record.power += parse_int(group, text)?,
        "Dmg" => record.damage += parse_int(group, text)?,
        "Ins" => record.insanity += parse_int(group, text)?,
        "Cor" => record.corruption += parse_int(group, text)?,
        _ => {}
    }
    Ok(())
}

/// Named captures of one match, normalized, in pattern order.
fn named_captures(re: &Regex, caps: &Captures<'_>) -> Vec<(String, String)> {
    re.capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|m| (name.to_string(), normalize(m.as_str()))))
        .collect()
}

/// Fold one tier's captures into `record`, `Desc` last.
pub fn fold_captures(
    record: &mut LevelRecord,
    path: &str,
    level: u32,
    captures: &[(String, String)],
) -> Result<(), ExtractionError> {
    for (group, text) in captures.iter().filter(|(g, _)| g != "Desc") {
        apply_group(record, group, text).map_err(|bad| ExtractionError::NotNumeric {
            path: path.to_string(),
            level,
            group: bad.group,
            value: bad.value,
        })?;
    }
    for (_, text) in captures.iter().filter(|(g, _)| g == "Desc") {
        parse_talents(record, text);
    }
    Ok(())
}

/// Populate the pre-registered tiers of one path from the document.
pub fn extract_path(
    doc: &str,
    category: PathCategory,
    path: &str,
    levels: &mut PathLevels,
) -> Result<(), ExtractionError> {
    for (level, re) in patterns::compile_for_path(category, path)? {
        let caps = re
            .captures(doc)
            .ok_or_else(|| ExtractionError::PatternNotMatched {
                path: path.to_string(),
                level,
            })?;
        let record = levels
            .get_mut(&level)
            .ok_or_else(|| ExtractionError::MissingTier {
                path: path.to_string(),
                level,
            })?;
        fold_captures(record, path, level, &named_captures(&re, &caps))?;
    }
    tracing::debug!(path, %category, "extracted path");
    Ok(())
}

/// Populate every path of `category` already registered in `paths`.
pub fn extract_category(
    doc: &str,
    category: PathCategory,
    paths: &mut PathMap,
) -> Result<(), ExtractionError> {
    for &name in category.path_names() {
        let levels = paths
            .get_mut(name)
            .ok_or_else(|| ExtractionError::UnregisteredPath(name.to_string()))?;
        extract_path(doc, category, name, levels)?;
    }
    tracing::info!(%category, paths = category.path_names().len(), "extracted category");
    Ok(())
}

/// Raw, normalized captures for one (path, tier) match.
#[derive(Debug, Clone, PartialEq)]
pub struct TierCapture {
    pub path: String,
    pub level: u32,
    /// `None` when the tier's pattern did not match.
    pub groups: Option<Vec<(String, String)>>,
}

/// Report what each template captures for every path of `category`,
/// without folding anything. Unmatched tiers are reported, not raised.
pub fn analyze(doc: &str, category: PathCategory) -> Result<Vec<TierCapture>, ExtractionError> {
    let mut report = Vec::new();
    for &path in category.path_names() {
        for (level, re) in patterns::compile_for_path(category, path)? {
            let groups = re.captures(doc).map(|caps| named_captures(&re, &caps));
            report.push(TierCapture {
                path: path.to_string(),
                level,
                groups,
            });
        }
    }
    Ok(report)
}
