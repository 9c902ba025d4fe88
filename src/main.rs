//! # Gemmaze Main Entry Point
//!
//! Command-line front end: generates map configuration documents and issues
//! the explicit session entry-point calls against the remote engine.

use clap::{Parser, Subcommand};
use gemmaze::generation::{utils, GenerationConfig, Generator, MapGenerator};
use gemmaze::{
    config, EngineApi, GameClient, GemmazeResult, MapLibrary, ProgressStore, SessionController,
};
use std::path::{Path, PathBuf};

/// Command line arguments for gemmaze.
#[derive(Parser, Debug)]
#[command(name = "gemmaze")]
#[command(about = "Procedural maze map generator and session driver for a remote gem-maze engine")]
#[command(version)]
struct Args {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate map configuration documents
    Generate {
        /// Number of documents to generate
        #[arg(short, long, default_value_t = config::DEFAULT_MAP_COUNT)]
        count: u32,

        /// Library directory for the documents
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_DIR)]
        out: PathBuf,

        /// Random seed; a fresh one is drawn and logged when omitted
        #[arg(short, long)]
        seed: Option<u64>,

        /// Generate single-level maps instead of multi-level ones
        #[arg(long)]
        single: bool,
    },

    /// Reset the remote engine with the currently active map
    Reset {
        /// Base URL of the remote engine
        #[arg(long, default_value = config::DEFAULT_BASE_URL)]
        base_url: String,

        /// Library directory holding the map documents
        #[arg(long, default_value = config::DEFAULT_CONFIG_DIR)]
        configs: PathBuf,

        /// Progression counter file
        #[arg(long, default_value = config::DEFAULT_PROGRESS_FILE)]
        progress: PathBuf,
    },

    /// Print the engine's current game state
    State {
        /// Base URL of the remote engine
        #[arg(long, default_value = config::DEFAULT_BASE_URL)]
        base_url: String,
    },
}

fn main() -> GemmazeResult<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&args.log_level),
    )
    .init();

    log::info!("gemmaze v{}", gemmaze::VERSION);

    match args.command {
        Command::Generate {
            count,
            out,
            seed,
            single,
        } => generate_maps(count, &out, seed, single),
        Command::Reset {
            base_url,
            configs,
            progress,
        } => reset_engine(&base_url, configs, progress),
        Command::State { base_url } => print_state(&base_url),
    }
}

/// Generates `count` map documents into the library directory, skipping
/// documents that already exist.
fn generate_maps(count: u32, out: &Path, seed: Option<u64>, single: bool) -> GemmazeResult<()> {
    let master_seed = seed.unwrap_or_else(rand::random);
    log::info!("generating {count} map documents with seed {master_seed}");

    let config = if single {
        GenerationConfig::single_level(master_seed)
    } else {
        GenerationConfig::multi_level(master_seed)
    };
    let mut rng = utils::create_rng(&config);
    let library = MapLibrary::new(out);

    for index in 1..=count {
        let generator = if single {
            MapGenerator::single_level(index)
        } else {
            MapGenerator::multi_level(index)
        };
        let map = generator.generate(&config, &mut rng)?;
        generator.validate(&map, &config)?;

        match library.save_new(index, &map)? {
            Some(path) => log::info!("wrote {}", path.display()),
            None => log::info!("map document {index:03} already exists, skipping"),
        }
    }
    Ok(())
}

/// Builds a session controller and issues the initial engine reset. This is
/// the explicit entry-point reset; constructing the controller alone never
/// touches the engine.
fn reset_engine(base_url: &str, configs: PathBuf, progress: PathBuf) -> GemmazeResult<()> {
    let controller = SessionController::new(
        GameClient::new(base_url),
        ProgressStore::new(progress),
        MapLibrary::new(configs),
    );
    let confirmation = controller.reset_game(None)?;
    log::info!("engine reset: {confirmation}");
    Ok(())
}

/// Fetches and prints the engine's current game state.
fn print_state(base_url: &str) -> GemmazeResult<()> {
    let state = GameClient::new(base_url).fetch_state()?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}
