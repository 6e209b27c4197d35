/// Per-tier regex templates locating advancement text in the rulebook.
///
/// Each template carries a `%s` placeholder for the path name and named
/// capture groups consumed by the extraction engine:
///
/// - `Attr` / `Char`: attribute and characteristic blocks
/// - `Perc` / `Def` / `Hlth`: derived-stat formulas
/// - `HR`: healing rate, `Sz`: size
/// - `Spd` / `Pwr` / `Dmg` / `Ins` / `Cor`: plain integers
/// - `Desc`: free talent text, optionally with a languages sentence

use regex::Regex;

use crate::schema::path::PathCategory;

/// Substitution point for the path name inside a template.
pub const PLACEHOLDER: &str = "%s";

/// One tier's template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierTemplate {
    pub level: u32,
    pub pattern: &'static str,
}

const ANCESTRY: &[TierTemplate] = &[
    TierTemplate {
        level: 0,
        pattern: concat!(
            r"(?s)\s*Creating An? %s.*?",
            r"Starting Attribute Scores (?P<Attr>.*?)",
            r"Perception (?P<Perc>.*?)\n",
            r"Defense (?P<Def>.*?)\n",
            r"Health (?P<Hlth>.*?)\n",
            r"Healing Rate (?P<HR>.*?)\n",
            r"Size (?P<Sz>.*?), Speed (?P<Spd>.*?), Power (?P<Pwr>.*?)\n",
            r"Damage (?P<Dmg>.*?), Insanity (?P<Ins>.*?), Corruption (?P<Cor>.*?)\n",
            r"(?P<Desc>.*?)\n\n",
        ),
    },
    TierTemplate {
        level: 4,
        pattern: r"(?s)Level 4 Expert %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
];

const NOVICE: &[TierTemplate] = &[
    TierTemplate {
        level: 1,
        pattern: r"(?s)\s*Level 1 %s.*?Attributes (?P<Attr>.*?)\nCharacteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
    TierTemplate {
        level: 2,
        pattern: r"(?s)Level 2 %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
    TierTemplate {
        level: 5,
        pattern: r"(?s)\s*Level 5 Expert %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
    TierTemplate {
        level: 8,
        pattern: r"(?s)\s*Level 8\s*Master %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
];

const EXPERT: &[TierTemplate] = &[
    TierTemplate {
        level: 3,
        pattern: r"(?s)Level 3 %s.*?Attributes (?P<Attr>.*?)\nCharacteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
    TierTemplate {
        level: 6,
        pattern: r"(?s)Level 6 %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
    TierTemplate {
        level: 9,
        pattern: r"(?sm)\s*Level 9\s*Master %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
];

const MASTER: &[TierTemplate] = &[
    TierTemplate {
        level: 7,
        pattern: r"(?s)Level 7 %s.*?Attributes (?P<Attr>.*?)\nCharacteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
    TierTemplate {
        level: 10,
        pattern: r"(?s)Level 10 %s.*?Characteristics (?P<Char>.*?)\n(?P<Desc>.*?)\n\n",
    },
];

/// Templates for every tier of a category, in ascending level order.
pub fn templates(category: PathCategory) -> &'static [TierTemplate] {
    match category {
        PathCategory::Ancestry => ANCESTRY,
        PathCategory::Novice => NOVICE,
        PathCategory::Expert => EXPERT,
        PathCategory::Master => MASTER,
    }
}

impl TierTemplate {
    /// Substitute the escaped path name and compile.
    pub fn compile(&self, path: &str) -> Result<Regex, regex::Error> {
        Regex::new(&self.pattern.replace(PLACEHOLDER, &regex::escape(path)))
    }
}

/// Compiled patterns for one path, keyed by tier level.
pub fn compile_for_path(
    category: PathCategory,
    path: &str,
) -> Result<Vec<(u32, Regex)>, regex::Error> {
    templates(category)
        .iter()
        .map(|t| t.compile(path).map(|re| (t.level, re)))
        .collect()
}
