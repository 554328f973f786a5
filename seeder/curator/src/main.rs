//! Curate community Q&A rows with a chat model into site-ready posts.

mod llm;
mod pipeline;
mod prompt;
mod rows;
mod schema;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use seeder::exit_codes;
use seeder::io::config::{SeederConfig, load_config};
use seeder::io::pacer::Pacer;
use seeder::io::response_cache::ResponseCache;
use seeder::logging;

use crate::llm::{CachedChatModel, OpenAiCompatClient, resolve_api_key};
use crate::pipeline::{CURATED_FILE, Pipeline, write_curated};
use crate::rows::{load_rows, sample_rows};

#[derive(Parser)]
#[command(
    name = "curator",
    version,
    about = "Filter, fact-check and restyle community Q&A with a chat model"
)]
struct Cli {
    /// Path to the TOML config file (missing file = defaults).
    #[arg(long, global = true, default_value = "seeder.toml")]
    config: PathBuf,

    /// Override the output directory from the config file.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Seed for view/like counts and author names.
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the relevance, fact-check and rewrite steps over every row.
    Run {
        /// JSON array of `{title, content}` rows (built-in samples when omitted).
        #[arg(long)]
        input: Option<PathBuf>,
        /// Ignore cached model replies.
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
        config.validate()?;
    }

    match cli.command {
        Command::Run { input, force } => cmd_run(&config, input, force, cli.seed),
    }
}

fn cmd_run(
    config: &SeederConfig,
    input: Option<PathBuf>,
    force: bool,
    seed: Option<u64>,
) -> Result<i32> {
    let rows = match &input {
        Some(path) => load_rows(path)?,
        None => {
            info!("no --input given; using built-in sample rows");
            sample_rows()
        }
    };
    if rows.is_empty() {
        warn!("no rows to curate");
        return Ok(exit_codes::EMPTY);
    }

    let api_key = resolve_api_key(|name| std::env::var(name).ok())?;
    let client = OpenAiCompatClient::new(&config.llm, api_key)?;
    let source = format!("Naver Kin via {}", client.model());
    let model = CachedChatModel::new(
        client,
        ResponseCache::new(&config.cache_dir),
        config.llm.model.clone(),
        force,
    );

    let pipeline = Pipeline::new(&model)?;
    let pause = Duration::from_millis(config.llm.pause_ms);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let document = pipeline.curate(&mut rng, &rows, &Pacer::new(pause, pause), &source, Local::now())?;

    if document.items.is_empty() {
        warn!(raw = document.total_raw, "every row was skipped; output left untouched");
        return Ok(exit_codes::EMPTY);
    }

    let path = config.output_path(CURATED_FILE);
    write_curated(&path, &document)?;
    println!(
        "curate: file={} processed={} skipped={} raw={}",
        path.display(),
        document.total_processed,
        document.total_skipped,
        document.total_raw
    );
    Ok(exit_codes::OK)
}
