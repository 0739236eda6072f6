use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use cambridge_scraper::{parser, Edition, Fetcher, Settings, Variant};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::sync::Semaphore;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "cambridge", about = "Structured entries from Cambridge Dictionary pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    request: RequestArgs,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Args)]
struct RequestArgs {
    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<f64>,
    /// Extra request header, e.g. -H 'Accept-Language: en-GB'
    #[arg(short = 'H', long = "header", global = true)]
    headers: Vec<String>,
    /// Max pages fetched at once
    #[arg(long, global = true)]
    concurrency: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up words in a monolingual dictionary
    Define {
        #[arg(required = true)]
        words: Vec<String>,
        #[arg(short, long, value_enum, default_value_t = Variant::English)]
        variant: Variant,
    },
    /// Look up words in a bilingual dictionary
    Translate {
        #[arg(required = true)]
        words: Vec<String>,
        /// Target language or full dictionary path (e.g. french, english-spanish)
        #[arg(short, long)]
        edition: Edition,
    },
    /// Extract entries from a saved dictionary page
    Extract {
        file: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Variant::English)]
        variant: Variant,
        /// Treat the page as bilingual and emit one record set per edition
        #[arg(short, long)]
        bilingual: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = load_settings(&cli.request)?;

    let output = match cli.command {
        Commands::Define { words, variant } => {
            let fetcher = Fetcher::new(&settings).context("failed to build http client")?;
            run_batch(words, settings.concurrency, move |word| {
                let fetcher = fetcher.clone();
                async move { cambridge_scraper::lookup(&fetcher, &word, variant).await }
            })
            .await?
        }
        Commands::Translate { words, edition } => {
            let fetcher = Fetcher::new(&settings).context("failed to build http client")?;
            run_batch(words, settings.concurrency, move |word| {
                let fetcher = fetcher.clone();
                let edition = edition.clone();
                async move { cambridge_scraper::lookup_bilingual(&fetcher, &word, &edition).await }
            })
            .await?
        }
        Commands::Extract { file, variant, bilingual } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let origin = settings.origin.trim_end_matches('/');
            if bilingual {
                serde_json::to_value(parser::extract_editions(&html, origin))?
            } else {
                let entries = parser::extract_entries(&html, variant, origin)
                    .with_context(|| format!("failed to extract {}", file.display()))?;
                serde_json::to_value(entries)?
            }
        }
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", rendered);

    eprintln!("Done in {}", format_duration(t0.elapsed()));

    Ok(())
}

/// File and environment settings, then command-line overrides on top.
fn load_settings(args: &RequestArgs) -> anyhow::Result<Settings> {
    let mut settings = Settings::load().context("failed to load settings")?;
    if let Some(timeout) = args.timeout {
        settings.timeout_secs = timeout;
    }
    if let Some(concurrency) = args.concurrency {
        settings.concurrency = concurrency;
    }
    for raw in &args.headers {
        settings.push_header(raw)?;
    }
    Ok(settings)
}

/// Run one lookup per word, at most `concurrency` at a time. A single word
/// yields its record set directly; several yield an object keyed by word,
/// where a failed word carries `{"error": ...}` instead.
async fn run_batch<T, F, Fut>(
    words: Vec<String>,
    concurrency: usize,
    lookup: F,
) -> anyhow::Result<Value>
where
    T: Serialize + Send + 'static,
    F: Fn(String) -> Fut,
    Fut: Future<Output = cambridge_scraper::Result<T>> + Send + 'static,
{
    if let [word] = words.as_slice() {
        let record = lookup(word.clone())
            .await
            .with_context(|| format!("lookup failed for '{}'", word))?;
        return Ok(serde_json::to_value(record)?);
    }

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let pb = ProgressBar::new(words.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    let mut tasks = Vec::with_capacity(words.len());
    for word in words {
        let sem = Arc::clone(&semaphore);
        let pb = pb.clone();
        let fut = lookup(word.clone());
        let handle = tokio::spawn(async move {
            let _permit = sem.acquire_owned().await?;
            let result = fut.await;
            pb.inc(1);
            Ok::<_, anyhow::Error>(result)
        });
        tasks.push((word, handle));
    }

    let mut ok = 0usize;
    let mut errors = 0usize;
    let mut out = Map::new();
    for (word, handle) in tasks {
        let value = match handle.await.context("lookup task panicked")?? {
            Ok(record) => {
                ok += 1;
                serde_json::to_value(record)?
            }
            Err(e) => {
                warn!("Lookup failed for {}: {}", word, e);
                errors += 1;
                json!({ "error": e.to_string() })
            }
        };
        out.insert(word, value);
    }

    pb.finish_and_clear();
    info!("Looked up {} words ({} ok, {} errors)", ok + errors, ok, errors);
    Ok(Value::Object(out))
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
