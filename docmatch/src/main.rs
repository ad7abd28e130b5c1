// docmatch/src/main.rs
//
// docmatch: pairwise document similarity and originality scoring
//
// Subcommands:
//   compare    score every pair of a set of files (archives expanded)
//   recompare  re-score two edited plain-text files
//   report     show a saved pair report by id
//   history    list or clear a user's saved batches
//
// Usage:
//   docmatch compare thesis_a.pdf thesis_b.docx drafts.zip --rule gost --rule titles
//   docmatch compare *.txt --settings settings.json --format markdown --no-persist
//   docmatch recompare draft_v1.txt draft_v2.txt --lemmatize
//   docmatch report 3F9A0C51D2E7
//   docmatch history --user alice --clear

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod engine;
mod error;
mod extract;
mod model;
mod render;
mod report;
mod state;
mod workers;

use config::{FilterConfig, Rule, UserSettings};
use engine::batch::BatchComparator;
use error::CompareError;
use extract::FileExtractor;
use model::RawInput;
use report::OutputFormat;
use state::reports::ReportStore;
use workers::detect::CompressionDetector;
use workers::embed::HashingEmbedder;
use workers::pool::{CpuPool, DEFAULT_WORKERS};
use workers::stem::SnowballLemmatizer;
use workers::Capabilities;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name    = "docmatch",
    about   = "Pairwise document similarity and originality scoring",
    version = env!("CARGO_PKG_VERSION"),
)]
struct Cli {
    #[arg(long, global = true, default_value = "./docmatch_output",
          help = "Report and history directory")]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare every pair of the given files.
    Compare {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value_t = DEFAULT_WORKERS, help = "CPU pool size")]
        workers: usize,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[arg(long, default_value = "local", help = "History owner")]
        user: String,

        #[arg(long, help = "Do not save reports or history")]
        no_persist: bool,
    },

    /// Re-score two edited plain-text files.
    Recompare {
        a: PathBuf,
        b: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a saved pair report.
    Report {
        id: String,

        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
    },

    /// List or clear saved batches.
    History {
        #[arg(long, default_value = "local")]
        user: String,

        #[arg(long)]
        clear: bool,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, help = "JSON user settings (active_rules, custom_regex, exclude_quotes)")]
    settings: Option<PathBuf>,

    #[arg(long = "rule", value_name = "RULE",
          help = "gost | apa | tables | titles | quotes (repeatable, applied in order)")]
    rules: Vec<Rule>,

    #[arg(long = "pattern", value_name = "REGEX", help = "Custom removal pattern (repeatable)")]
    patterns: Vec<String>,

    #[arg(long)]
    exclude_quotes: bool,

    #[arg(long, help = "Stem words (Russian/English Snowball) before comparing")]
    lemmatize: bool,
}

impl FilterArgs {
    /// Stored settings first, CLI flags appended after them.
    fn resolve(&self) -> Result<FilterConfig> {
        let base = match &self.settings {
            Some(path) => UserSettings::load(path)?.to_filter_config(),
            None => FilterConfig::default(),
        };
        let mut config = base
            .with_rules(self.rules.iter().copied())
            .with_patterns(self.patterns.iter().cloned());
        config.exclude_quotes |= self.exclude_quotes;
        Ok(config)
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

fn build_comparator(pool: CpuPool, lemmatize: bool) -> Result<BatchComparator> {
    let caps = Capabilities::probe(lemmatize);
    caps.log();

    let detector = CompressionDetector::new().context("initialising AI detector")?;
    let comparator = BatchComparator::new(
        Arc::new(HashingEmbedder::new()),
        Arc::new(detector),
        Arc::new(FileExtractor::new(caps)),
        pool,
    );
    Ok(if lemmatize {
        comparator.with_lemmatizer(Arc::new(SnowballLemmatizer::new()))
    } else {
        comparator
    })
}

fn log_pool(pool: &CpuPool) {
    let stats = pool.stats();
    info!(
        "pool workers={} completed={} failed={}",
        pool.size(),
        stats.completed.load(Ordering::Relaxed),
        stats.failed.load(Ordering::Relaxed)
    );
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_inputs(files: &[PathBuf]) -> Result<Vec<RawInput>> {
    let mut inputs = Vec::with_capacity(files.len());
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        inputs.push(RawInput::file(display_name(path), bytes));
    }
    Ok(inputs)
}

async fn read_text(path: &Path) -> Result<RawInput> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(RawInput::text(display_name(path), extract::decode_text(&bytes)))
}

/// Validation problems are the user's to fix: message and exit 2.
fn exit_on_validation(e: CompareError) -> anyhow::Error {
    if e.is_validation() {
        eprintln!("error: {}", e);
        std::process::exit(2);
    }
    e.into()
}

// ── Main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("docmatch=info".parse()?))
        .compact().init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compare { files, filters, workers, format, user, no_persist } => {
            let config     = filters.resolve()?;
            let pool       = CpuPool::new(workers);
            let comparator = build_comparator(pool.clone(), filters.lemmatize)?;
            let inputs     = read_inputs(&files).await?;
            info!("comparing {} inputs with rules={:?}", inputs.len(), config.effective_rules());

            let outcome = tokio::select! {
                res = comparator.compare_batch(inputs, &config) => res.map_err(exit_on_validation)?,
                _ = tokio::signal::ctrl_c() => {
                    warn!("interrupted, nothing saved");
                    std::process::exit(130);
                }
            };
            log_pool(&pool);

            print!("{}", report::render_batch(&outcome, format)?);

            if no_persist {
                return Ok(());
            }
            let store = ReportStore::open(&cli.output)?;
            store.save_batch(&user, &outcome, &config).await?;
            eprintln!("saved {} reports to {}", outcome.comparisons.len(), store.dir().display());
        }

        Command::Recompare { a, b, filters, format } => {
            let config     = filters.resolve()?;
            let pool       = CpuPool::new(DEFAULT_WORKERS);
            let comparator = build_comparator(pool.clone(), filters.lemmatize)?;
            let (a, b)     = (read_text(&a).await?, read_text(&b).await?);

            let result = comparator
                .recompare(a, b, &config)
                .await
                .map_err(exit_on_validation)?;
            log_pool(&pool);
            print!("{}", report::render_comparison(&result, format)?);
        }

        Command::Report { id, format } => {
            let store = ReportStore::open(&cli.output)?;
            match store.find_report(&id).await? {
                Some(record) => print!("{}", report::render_record(&record, format)?),
                None => {
                    eprintln!("error: report {} not found in {}", id, store.dir().display());
                    std::process::exit(1);
                }
            }
        }

        Command::History { user, clear, format } => {
            let store = ReportStore::open(&cli.output)?;
            if clear {
                let removed = store.clear_history(&user).await?;
                println!("removed {} entries for {}", removed, user);
            } else {
                let entries = store.list_history(&user).await?;
                print!("{}", report::render_history(&entries, format)?);
            }
        }
    }

    Ok(())
}
