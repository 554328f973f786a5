//! Seed-data generator and scraper CLI.
//!
//! Every subcommand writes JSON files into the configured output directory
//! (`src/constants` by default) and prints a one-line summary per file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use seeder::content::dynamic::{DEFAULT_POST_COUNT, DEFAULT_TIP_COUNT, DynamicPools, write_dynamic};
use seeder::content::encyclopedia::{ENCYCLOPEDIA_FILE, write_encyclopedia};
use seeder::content::starter::{StarterPools, write_starter};
use seeder::content::WrittenFile;
use seeder::exit_codes;
use seeder::io::browser::BrowserFetcher;
use seeder::io::config::{SeederConfig, load_config};
use seeder::io::fetch::{HttpFetcher, PageFetcher};
use seeder::io::pacer::Pacer;
use seeder::io::response_cache::ResponseCache;
use seeder::logging;
use seeder::merge::{MERGED_FILE, merge_files};
use seeder::scrape::blog::{BLOG_DATA_FILE, BLOG_URL, scrape_blog, write_blog_document};
use seeder::scrape::guide::{GUIDE_DATA_FILE, GUIDE_URL, scrape_guide, write_guide_document};
use seeder::scrape::morphpedia::{MORPH_DATA_FILE, MORPHPEDIA_URL, scrape_morphs, write_morph_document};
use seeder::translate::google::GoogleTranslator;
use seeder::translate::patch::{BLOG_KO_FILE, MORPH_KO_FILE, patch_blog_file, patch_morph_file};
use seeder::translate::{CachedTranslator, Dictionaries, TextTranslator};

#[derive(Parser)]
#[command(
    name = "seeder",
    version,
    about = "Seed-data generators and scrapers for the crested gecko site"
)]
struct Cli {
    /// Path to the TOML config file (missing file = defaults).
    #[arg(long, global = true, default_value = "seeder.toml")]
    config: PathBuf,

    /// Override the output directory from the config file.
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Seed for the random generators (reproducible output).
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate template-based seed content.
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },
    /// Scrape third-party care content.
    Scrape {
        #[command(subcommand)]
        target: ScrapeTarget,
    },
    /// Translate scraped morph and blog data to Korean.
    Translate {
        /// Limit the pass to one input.
        #[arg(long, value_enum)]
        only: Option<TranslateOnly>,
    },
    /// Join translated morphs with the encyclopedia.
    Merge,
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Starter Q&A feed and morph catalog list.
    Starter,
    /// Husbandry tips and community Q&A posts.
    Dynamic {
        /// Number of tip articles.
        #[arg(long, default_value_t = DEFAULT_TIP_COUNT)]
        tips: usize,
        /// Number of community posts.
        #[arg(long, default_value_t = DEFAULT_POST_COUNT)]
        posts: usize,
    },
    /// Hand-written morph encyclopedia.
    Encyclopedia,
    /// Every generator with default counts.
    All,
}

#[derive(Subcommand)]
enum ScrapeTarget {
    /// Morph wiki (headless browser by default).
    Morphs {
        /// Fetch the index with plain HTTP instead of the headless browser.
        #[arg(long)]
        http: bool,
    },
    /// Care blog articles.
    Blog,
    /// Care guide chapters.
    Guide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TranslateOnly {
    Morphs,
    Blog,
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
        Command::Generate { target } => cmd_generate(&config, target, cli.seed),
        Command::Scrape { target } => cmd_scrape(&config, target),
        Command::Translate { only } => cmd_translate(&config, only),
        Command::Merge => cmd_merge(&config),
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn print_written(command: &str, files: &[WrittenFile]) {
    for file in files {
        println!("{command}: file={} count={}", file.path.display(), file.count);
    }
}

fn cmd_generate(config: &SeederConfig, target: GenerateTarget, seed: Option<u64>) -> Result<i32> {
    let mut rng = rng_from(seed);
    let now = Local::now();
    let out = config.output_dir.as_path();

    let mut written = Vec::new();
    match target {
        GenerateTarget::Starter => {
            written.extend(write_starter(&StarterPools::embedded()?, &mut rng, now, out)?);
        }
        GenerateTarget::Dynamic { tips, posts } => {
            let pools = DynamicPools::embedded()?;
            written.extend(write_dynamic(&pools, &mut rng, now, out, tips, posts)?);
        }
        GenerateTarget::Encyclopedia => {
            written.push(write_encyclopedia(now, out)?);
        }
        GenerateTarget::All => {
            written.extend(write_starter(&StarterPools::embedded()?, &mut rng, now, out)?);
            let pools = DynamicPools::embedded()?;
            written.extend(write_dynamic(
                &pools,
                &mut rng,
                now,
                out,
                DEFAULT_TIP_COUNT,
                DEFAULT_POST_COUNT,
            )?);
            written.push(write_encyclopedia(now, out)?);
        }
    }
    print_written("generate", &written);
    Ok(exit_codes::OK)
}

fn cmd_scrape(config: &SeederConfig, target: ScrapeTarget) -> Result<i32> {
    let pacer = Pacer::from_config(&config.pacing);
    let http = HttpFetcher::new(&config.http.user_agent, config.http_timeout())?;
    let browser = BrowserFetcher::new(&config.browser, &config.http.user_agent);

    let (path, count) = match target {
        ScrapeTarget::Morphs { http: use_http } => {
            let fetcher: &dyn PageFetcher = if use_http { &http } else { &browser };
            let morphs = scrape_morphs(fetcher, &pacer, MORPHPEDIA_URL)?;
            if morphs.is_empty() {
                return Ok(report_empty("morphs"));
            }
            let path = config.output_path(MORPH_DATA_FILE);
            let count = morphs.len();
            write_morph_document(&path, MORPHPEDIA_URL, morphs)?;
            (path, count)
        }
        ScrapeTarget::Blog => {
            let articles = scrape_blog(&http, &pacer, BLOG_URL)?;
            if articles.is_empty() {
                return Ok(report_empty("blog"));
            }
            let path = config.output_path(BLOG_DATA_FILE);
            let count = articles.len();
            write_blog_document(&path, BLOG_URL, articles)?;
            (path, count)
        }
        ScrapeTarget::Guide => {
            let chapters = scrape_guide(&browser, &pacer, GUIDE_URL)?;
            if chapters.is_empty() {
                return Ok(report_empty("guide"));
            }
            let path = config.output_path(GUIDE_DATA_FILE);
            let count = chapters.len();
            write_guide_document(&path, GUIDE_URL, chapters)?;
            (path, count)
        }
    };
    info!(count, path = %path.display(), "scrape finished");
    println!("scrape: file={} count={}", path.display(), count);
    Ok(exit_codes::OK)
}

fn report_empty(target: &str) -> i32 {
    warn!(what = target, "nothing collected; no file written");
    println!("scrape: target={target} count=0");
    exit_codes::EMPTY
}

fn cmd_translate(config: &SeederConfig, only: Option<TranslateOnly>) -> Result<i32> {
    let dictionaries = Dictionaries::embedded()?;
    let google = GoogleTranslator::new(
        &config.http.user_agent,
        config.http_timeout(),
        &config.translate.source,
        &config.translate.target,
        Duration::from_millis(config.translate.pause_ms),
    )?;
    let namespace = google.cache_namespace();
    let cached = CachedTranslator::new(google, ResponseCache::new(&config.cache_dir), namespace);
    let translator = TextTranslator::new(&cached, &dictionaries.terms, config.translate.max_chunk_chars);

    let mut written = Vec::new();
    if only != Some(TranslateOnly::Blog) {
        let output = config.output_path(MORPH_KO_FILE);
        let count = patch_morph_file(
            &translator,
            &dictionaries,
            &config.output_path(MORPH_DATA_FILE),
            &output,
        )?;
        written.extend(count.map(|count| WrittenFile { path: output, count }));
    }
    if only != Some(TranslateOnly::Morphs) {
        let output = config.output_path(BLOG_KO_FILE);
        let count = patch_blog_file(&translator, &config.output_path(BLOG_DATA_FILE), &output)?;
        written.extend(count.map(|count| WrittenFile { path: output, count }));
    }

    if written.is_empty() {
        warn!("no translation input found; run `seeder scrape` first");
        return Ok(exit_codes::EMPTY);
    }
    print_written("translate", &written);
    Ok(exit_codes::OK)
}

fn cmd_merge(config: &SeederConfig) -> Result<i32> {
    let output = config.output_path(MERGED_FILE);
    let report = merge_files(
        &config.output_path(MORPH_KO_FILE),
        &config.output_path(ENCYCLOPEDIA_FILE),
        &output,
    )?;
    println!(
        "merge: file={} count={} matched={} unmatched={}",
        output.display(),
        report.document.total_morphs,
        report.document.encyclopedia_matched,
        report.unmatched.len()
    );
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn parse_generate_dynamic_with_counts() {
        let cli = Cli::parse_from(["seeder", "generate", "dynamic", "--tips", "3", "--posts", "4"]);
        assert!(matches!(
            cli.command,
            Command::Generate {
                target: GenerateTarget::Dynamic { tips: 3, posts: 4 }
            }
        ));
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["seeder", "merge", "--output-dir", "out", "--seed", "7"]);
        assert_eq!(cli.output_dir.as_deref(), Some(Path::new("out")));
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.config, PathBuf::from("seeder.toml"));
    }

    #[test]
    fn parse_translate_only() {
        let cli = Cli::parse_from(["seeder", "translate", "--only", "blog"]);
        assert!(matches!(
            cli.command,
            Command::Translate {
                only: Some(TranslateOnly::Blog)
            }
        ));
    }

    #[test]
    fn parse_scrape_morphs_http() {
        let cli = Cli::parse_from(["seeder", "scrape", "morphs", "--http"]);
        assert!(matches!(
            cli.command,
            Command::Scrape {
                target: ScrapeTarget::Morphs { http: true }
            }
        ));
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let a: u32 = rng_from(Some(42)).gen_range(0..1_000_000);
        let b: u32 = rng_from(Some(42)).gen_range(0..1_000_000);
        assert_eq!(a, b);
    }
}
