use serde::{Deserialize, Serialize};

use super::path::LevelRecord;

/// A generated character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub gender: String,
    pub ancestry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub novice_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_path: Option<String>,
    pub level: u32,
    #[serde(rename = "languages_and_professions")]
    pub lang_and_prof: Vec<String>,
    pub talents: Vec<String>,
    pub attributes: Attributes,
    /// Canonical hex seed; feeding it back reproduces this character.
    pub seed: String,
}

impl Character {
    /// Serialize as indented JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Short tab-delimited identity block.
    pub fn summary(&self) -> String {
        format!(
            "Name\t{}\nGender\t{}\nLevel\t{}\nSeed\t{}\n",
            self.name, self.gender, self.level, self.seed
        )
    }

    /// Serialize as pretty-printed RON.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

/// Primary scores, characteristics and derived values of a character.
///
/// The `*_mod` fields and the healing-rate multiplier are working state
/// accumulated while folding tiers. They are never serialized.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub strength: i32,
    pub agility: i32,
    pub intellect: i32,
    pub will: i32,
    pub speed: i32,
    pub power: i32,
    pub damage: i32,
    pub insanity: i32,
    pub corruption: i32,
    pub size: String,
    pub health: i32,
    pub defense: i32,
    pub perception: i32,
    pub healing_rate: i32,
    #[serde(skip)]
    health_mod: i32,
    #[serde(skip)]
    defense_mod: i32,
    #[serde(skip)]
    perception_mod: i32,
    #[serde(skip)]
    healing_rate_multiplier: f64,
}

/// One of the four primary scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimaryAttribute {
    Strength,
    Agility,
    Intellect,
    Will,
}

impl PrimaryAttribute {
    pub const ALL: [PrimaryAttribute; 4] = [
        PrimaryAttribute::Strength,
        PrimaryAttribute::Agility,
        PrimaryAttribute::Intellect,
        PrimaryAttribute::Will,
    ];
}

impl Attributes {
    pub fn health_mod(&self) -> i32 {
        self.health_mod
    }

    pub fn defense_mod(&self) -> i32 {
        self.defense_mod
    }

    pub fn perception_mod(&self) -> i32 {
        self.perception_mod
    }

    pub fn healing_rate_multiplier(&self) -> f64 {
        self.healing_rate_multiplier
    }

    pub fn primary_total(&self) -> i32 {
        self.strength + self.agility + self.intellect + self.will
    }

    /// Add one to a primary score.
    pub fn increment(&mut self, attr: PrimaryAttribute) {
        match attr {
            PrimaryAttribute::Strength => self.strength += 1,
            PrimaryAttribute::Agility => self.agility += 1,
            PrimaryAttribute::Intellect => self.intellect += 1,
            PrimaryAttribute::Will => self.will += 1,
        }
    }

    /// Fold one unlocked tier into the running totals.
    ///
    /// Numeric deltas add up; size and healing-rate multiplier are replaced
    /// only when the tier sets them.
    pub fn apply(&mut self, tier: &LevelRecord) {
        self.strength += tier.strength;
        self.agility += tier.agility;
        self.intellect += tier.intellect;
        self.will += tier.will;

        self.perception_mod += tier.perception_mod;
        self.defense_mod += tier.defense_mod;
        self.health_mod += tier.health_mod;

        self.speed += tier.speed;
        self.power += tier.power;
        self.damage += tier.damage;
        self.insanity += tier.insanity;
        self.corruption += tier.corruption;

        if !tier.size.is_empty() {
            self.size = tier.size.clone();
        }
        if tier.healing_rate != 0.0 {
            self.healing_rate_multiplier = tier.healing_rate;
        }
    }

    /// Recompute the derived values from primaries and modifiers.
    pub fn recalculate(&mut self) {
        self.perception = self.intellect + self.perception_mod;
        self.defense = self.agility + self.defense_mod;
        self.health = self.strength + self.health_mod;
        self.healing_rate = (self.health as f64 * self.healing_rate_multiplier).floor() as i32;
    }
}
