//! chardb_builder: rebuild the character database from the rulebook.
//!
//! Usage: chardb_builder <source> [--cache-file <path>] [--names-file <path>]
//!                       [--text] [--analyze <category>]
//!
//! With `--analyze`, nothing is written; every tier pattern of the category
//! is matched and its raw captures are printed as JSON.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sotdl_gen::core::database::{CharacterDatabase, DatabaseBuilder};
use sotdl_gen::core::extract;
use sotdl_gen::core::textract::{CommandExtractor, TextExtractor};
use sotdl_gen::schema::options::{GeneratorOptions, DEFAULT_CACHE_FILE};
use sotdl_gen::schema::path::PathCategory;

#[derive(Parser, Debug)]
#[command(name = "chardb_builder", version)]
#[command(about = "Extract the SotDL character database from the core rulebook")]
struct Args {
    /// Rulebook PDF, or plain text with --text
    source: PathBuf,

    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache_file: PathBuf,

    #[arg(long)]
    names_file: Option<PathBuf>,

    /// Treat the source as already-extracted plain text
    #[arg(long)]
    text: bool,

    /// Seconds allowed for text extraction
    #[arg(long, default_value_t = 500)]
    timeout: u64,

    /// Print raw captures for one category (ancestry, novice, expert, master)
    #[arg(long)]
    analyze: Option<String>,

    /// One of ERROR, WARNING, INFO, DEBUG
    #[arg(long, default_value = "INFO")]
    log_level: String,
}

fn parse_category(name: &str) -> Option<PathCategory> {
    PathCategory::ALL
        .into_iter()
        .find(|c| c.name().eq_ignore_ascii_case(name))
}

fn read_source(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    if args.text {
        return Ok(std::fs::read_to_string(&args.source)?);
    }
    let extractor =
        CommandExtractor::pdftotext().timeout(std::time::Duration::from_secs(args.timeout));
    Ok(extractor.extract_text(&args.source)?)
}

fn analyze(args: &Args, category: &str) -> Result<(), Box<dyn std::error::Error>> {
    let category =
        parse_category(category).ok_or_else(|| format!("unknown category '{}'", category))?;
    let doc = read_source(args)?;
    let report = extract::analyze(&doc, category)?;

    let misses = report.iter().filter(|c| c.groups.is_none()).count();
    for capture in &report {
        let groups = capture.groups.as_ref().map(|groups| {
            groups
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect::<serde_json::Map<_, _>>()
        });
        let entry = serde_json::json!({
            "path": capture.path,
            "level": capture.level,
            "groups": groups,
        });
        println!("{}", serde_json::to_string_pretty(&entry)?);
    }
    eprintln!("{} tiers, {} unmatched", report.len(), misses);
    Ok(())
}

fn build(args: &Args) -> Result<CharacterDatabase, Box<dyn std::error::Error>> {
    let doc = read_source(args)?;
    let mut builder = DatabaseBuilder::default().cache_path(&args.cache_file);
    if let Some(names) = &args.names_file {
        builder = builder.names_file(names);
    }
    let db = builder.build_from_text(&doc)?;
    db.save(&args.cache_file)?;
    Ok(db)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log = GeneratorOptions {
        log_level: Some(args.log_level.clone()),
        ..Default::default()
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log.log_directive()))
        .with_writer(std::io::stderr)
        .init();

    let result = match &args.analyze {
        Some(category) => analyze(&args, category),
        None => build(&args).map(|db| {
            for (category, count) in db.summary() {
                println!("{:<10} {:>3} paths", category.name(), count);
            }
            println!("{:<10} {:>3} name lists", "names", db.names.lists.len());
            println!("saved to {}", args.cache_file.display());
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
