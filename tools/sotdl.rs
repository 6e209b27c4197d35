//! sotdl: generate a Shadow of the Demon Lord character.
//!
//! Options come from an optional RON file, overridden by flags. The
//! character is printed as pretty JSON, RON with `--ron`, or a short
//! identity block with `--summary`.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use sotdl_gen::core::database::DatabaseBuilder;
use sotdl_gen::core::generator::CharacterGenerator;
use sotdl_gen::schema::options::GeneratorOptions;

#[derive(Parser, Debug)]
#[command(name = "sotdl", version)]
#[command(about = "Shadow of the Demon Lord character generator")]
struct Args {
    /// RON file with generation options; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// The character's full name; random if not specified
    #[arg(short, long)]
    name: Option<String>,

    #[arg(short, long)]
    gender: Option<String>,

    /// Character level, 0 to 10; random if not specified
    #[arg(short, long)]
    level: Option<u32>,

    /// Level 0 path (e.g. Human)
    #[arg(short = 'A', long)]
    ancestry: Option<String>,

    /// Level 1 path (e.g. Rogue)
    #[arg(short = 'N', long)]
    novice_path: Option<String>,

    /// Level 3 path (e.g. Fighter)
    #[arg(short = 'E', long)]
    expert_path: Option<String>,

    /// Level 7 path (e.g. Myrmidon)
    #[arg(short = 'M', long)]
    master_path: Option<String>,

    /// Hex seed; reuse a printed seed to reproduce a character
    #[arg(short, long)]
    seed: Option<String>,

    /// Source rulebook; rebuilds the cached database
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Cached database file (.ron or .json)
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Name table used when rebuilding the database
    #[arg(long)]
    names_file: Option<PathBuf>,

    #[arg(long)]
    force_rebuild: bool,

    /// One of ERROR, WARNING, INFO, DEBUG
    #[arg(long)]
    log_level: Option<String>,

    /// Print RON instead of JSON
    #[arg(long)]
    ron: bool,

    /// Print only name, gender, level and seed
    #[arg(long, conflicts_with = "ron")]
    summary: bool,
}

impl Args {
    fn options(&self) -> GeneratorOptions {
        GeneratorOptions {
            name: self.name.clone(),
            gender: self.gender.clone(),
            level: self.level,
            ancestry: self.ancestry.clone(),
            novice_path: self.novice_path.clone(),
            expert_path: self.expert_path.clone(),
            master_path: self.master_path.clone(),
            seed: self.seed.clone(),
            data_file: self.data_file.clone(),
            cache_file: self.cache_file.clone(),
            names_file: self.names_file.clone(),
            force_rebuild: self.force_rebuild,
            log_level: self.log_level.clone(),
        }
    }
}

fn init_tracing(opts: &GeneratorOptions) {
    let filter = match opts.log_level {
        Some(_) => EnvFilter::new(opts.log_directive()),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(opts.log_directive())),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<String, Box<dyn std::error::Error>> {
    let base = match &args.config {
        Some(path) => GeneratorOptions::load_from_ron(path)?,
        None => GeneratorOptions::default(),
    };
    let opts = base.merge(args.options());
    init_tracing(&opts);

    let db = DatabaseBuilder::from_options(&opts).open()?;
    let character = CharacterGenerator::default().generate(&db, &opts)?;

    let out = if args.summary {
        character.summary()
    } else if args.ron {
        character.to_ron()?
    } else {
        character.to_json()?
    };
    Ok(out)
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(out) => {
            println!("{}", out);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
