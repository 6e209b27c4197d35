use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tiers of one path keyed by the character level that unlocks them.
///
/// Ordered so that folding always walks tiers in ascending level order.
pub type PathLevels = BTreeMap<u32, LevelRecord>;

/// Every path's tiers, keyed by path name.
pub type PathMap = FxHashMap<String, PathLevels>;

pub const ANCESTRIES: &[&str] = &[
    "Human", "Dwarf", "Goblin", "Orc", "Changeling", "Clockwork",
];

pub const NOVICE_PATHS: &[&str] = &["Priest", "Magician", "Warrior", "Rogue"];

pub const EXPERT_PATHS: &[&str] = &[
    "Artificer", "Assassin", "Berserker", "Cleric", "Druid", "Fighter", "Oracle", "Paladin",
    "Ranger", "Scout", "Sorcerer", "Spellbinder", "Thief", "Warlock", "Witch", "Wizard",
];

pub const MASTER_PATHS: &[&str] = &[
    "Abjurer", "Acrobat", "Aeromancer", "Apocalyptist", "Arcanist", "Astromancer",
    "Avenger", "Bard", "Beastmaster", "Blade", "Brute", "Cavalier", "Champion",
    "Chaplain", "Chronomancer", "Conjurer", "Conqueror", "Death Dealer", "Defender",
    "Dervish", "Destroyer", "Diplomat", "Diviner", "Dreadnaught", "Duelist",
    "Enchantment", "Engineer", "Executioner", "Exorcist", "Explorer", "Geomancer",
    "Gladiator", "Gunslinger", "Healer", "Hexer", "Hydromancer", "Illusionist",
    "Infiltrator", "Inquisitor", "Jack-of-all-Trades", "Mage Knight", "Magus",
    "Marauder", "Miracle Worker", "Myrmidon", "Necromancer", "Poisoner", "Pyromancer",
    "Runesmith", "Savant", "Sentinel", "Shapeshifter", "Sharpshooter", "Stormbringer",
    "Technomancer", "Templar", "Tenebrist", "Thaumaturge", "Theurge", "Transmuter",
    "Traveler", "Weapon Master", "Woodwose", "Zealot",
];

/// The four path slots a character advances through, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathCategory {
    Ancestry,
    Novice,
    Expert,
    Master,
}

impl PathCategory {
    /// All categories in the order the generator resolves them.
    pub const ALL: [PathCategory; 4] = [
        PathCategory::Ancestry,
        PathCategory::Novice,
        PathCategory::Expert,
        PathCategory::Master,
    ];

    /// Character levels at which this category's tiers unlock.
    pub fn unlock_levels(&self) -> &'static [u32] {
        match self {
            Self::Ancestry => &[0, 4],
            Self::Novice => &[1, 2, 5, 8],
            Self::Expert => &[3, 6, 9],
            Self::Master => &[7, 10],
        }
    }

    /// Lowest character level at which a path of this category is taken.
    pub fn entry_level(&self) -> u32 {
        self.unlock_levels()[0]
    }

    /// Static list of path names belonging to this category.
    pub fn path_names(&self) -> &'static [&'static str] {
        match self {
            Self::Ancestry => ANCESTRIES,
            Self::Novice => NOVICE_PATHS,
            Self::Expert => EXPERT_PATHS,
            Self::Master => MASTER_PATHS,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.path_names().contains(&path)
    }

    /// Category owning `path`, if it is a known path name.
    pub fn of(path: &str) -> Option<PathCategory> {
        Self::ALL.into_iter().find(|category| category.contains(path))
    }

    /// An empty tier map with one record per unlock level.
    pub fn empty_levels(&self) -> PathLevels {
        self.unlock_levels()
            .iter()
            .map(|&level| (level, LevelRecord::default()))
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ancestry => "ancestry",
            Self::Novice => "novice",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }
}

impl fmt::Display for PathCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Total number of paths in the reference rule set.
pub fn total_path_count() -> usize {
    PathCategory::ALL
        .iter()
        .map(|category| category.path_names().len())
        .sum()
}

/// Stat and talent payload granted by one tier of one path.
///
/// Numeric fields are deltas summed across every unlocked tier; `size` and
/// `healing_rate` replace the running value when set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelRecord {
    pub strength: i32,
    pub agility: i32,
    pub intellect: i32,
    pub will: i32,
    pub perception_mod: i32,
    pub defense_mod: i32,
    pub health_mod: i32,
    /// Healing-rate multiplier; zero means "not set by this tier".
    pub healing_rate: f64,
    pub speed: i32,
    pub power: i32,
    pub damage: i32,
    pub insanity: i32,
    pub corruption: i32,
    pub size: String,
    pub lang_and_prof: Vec<String>,
    pub talents: Vec<String>,
}

impl LevelRecord {
    /// Sum of the four primary attribute deltas.
    pub fn primary_total(&self) -> i32 {
        self.strength + self.agility + self.intellect + self.will
    }
}
