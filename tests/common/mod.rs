#![allow(dead_code)]

use std::fmt::Write;
use std::path::{Path, PathBuf};

use sotdl_gen::core::database::{CharacterDatabase, DatabaseBuilder};
use sotdl_gen::core::textract::StaticText;
use sotdl_gen::schema::path::{ANCESTRIES, EXPERT_PATHS, MASTER_PATHS, NOVICE_PATHS};

pub const SEED: &str = "1575d911f49e59ee";

pub fn names_fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/names.json")
}

fn article(name: &str) -> &'static str {
    match name.chars().next() {
        Some('A' | 'E' | 'I' | 'O' | 'U') => "An",
        _ => "A",
    }
}

fn ancestry_sections(doc: &mut String, i: i32, name: &str) {
    let size = if name == "Goblin" { "1/2" } else { "1" };
    write!(
        doc,
        "Creating {article} {name}\n\
         The {name} people are found across the Northern Reaches.\n\
         Starting Attribute Scores Strength {strength}, Agility {agi}, Intellect 10, Will {will}\n\
         Perception equals your Intellect score + {perc}\n\
         Defense equals your Agility score\n\
         Health equals your Strength score + {hlth}\n\
         Healing Rate one-quarter your Health, rounded down\n\
         Size {size}, Speed 10, Power 0\n\
         Damage 0, Insanity 0, Corruption {cor}\n\
         Languages and Professions You speak the Common Tongue. {name} Trait You have a trait.\n\
         \n\
         Level 4 Expert {name}\n\
         Characteristics Health +4\n\
         {name} Resilience You shrug off harm.\n\
         \n",
        article = article(name),
        strength = 8 + i % 3,
        agi = 9 + i % 2,
        will = 10 - i % 2,
        perc = i % 2,
        hlth = i,
        cor = i % 2,
    )
    .unwrap();
}

fn novice_sections(doc: &mut String, name: &str) {
    write!(
        doc,
        "Level 1 {name}\n\
         Attributes Increase two by 1\n\
         Characteristics Health +5, Power +1\n\
         Languages and Professions You add one language. {name} Training You learn your craft.\n\
         \n\
         Level 2 {name}\n\
         Characteristics Health +3\n\
         {name} Talent You gain a talent.\n\
         \n\
         Level 5 Expert {name}\n\
         Characteristics Health +3, Power +1\n\
         {name} Expertise You improve.\n\
         \n\
         Level 8 Master {name}\n\
         Characteristics Health +3\n\
         {name} Mastery You excel.\n\
         \n"
    )
    .unwrap();
}

fn expert_sections(doc: &mut String, name: &str) {
    write!(
        doc,
        "Level 3 {name}\n\
         Attributes Increase two by 1\n\
         Characteristics Health +3, Power +1\n\
         Languages and Professions You add one language or profession. {name} Path Talent You specialize.\n\
         \n\
         Level 6 {name}\n\
         Characteristics Health +3, Defense +1\n\
         {name} Advance You grow.\n\
         \n\
         Level 9 Master {name}\n\
         Characteristics Health +3, Perception +1\n\
         {name} Pinnacle You peak.\n\
         \n"
    )
    .unwrap();
}

fn master_sections(doc: &mut String, name: &str) {
    write!(
        doc,
        "Level 7 {name}\n\
         Attributes Increase three by 1\n\
         Characteristics Health +3\n\
         {name} Mastery Talent You master your art.\n\
         \n\
         Level 10 {name}\n\
         Characteristics Health +3, Power +1\n\
         {name} Apex You are legendary.\n\
         \n"
    )
    .unwrap();
}

/// Plain-text rulebook with one well-formed section per path and tier.
pub fn rulebook() -> String {
    let mut doc = String::from("SHADOW OF THE DEMON LORD\n\n");
    for (i, name) in ANCESTRIES.iter().enumerate() {
        ancestry_sections(&mut doc, i as i32, name);
    }
    for name in NOVICE_PATHS {
        novice_sections(&mut doc, name);
    }
    for name in EXPERT_PATHS {
        expert_sections(&mut doc, name);
    }
    for name in MASTER_PATHS {
        master_sections(&mut doc, name);
    }
    doc
}

/// Builder that rebuilds from the synthetic rulebook into `cache`.
pub fn builder(cache: &Path) -> DatabaseBuilder {
    CharacterDatabase::builder()
        .cache_path(cache)
        .source_document("core-rules.pdf")
        .names_file(names_fixture())
        .extractor(StaticText(rulebook()))
}

/// Fully built database, without touching the filesystem cache.
pub fn database() -> CharacterDatabase {
    builder(Path::new("unused.ron"))
        .build_from_text(&rulebook())
        .unwrap()
}
