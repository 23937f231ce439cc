//! # Zeitsprung CLI Application
//!
//! Command-line interface for dating podcast episodes.
//!
//! ## Subcommands
//!
//! - `crawl`: run the full pipeline over a range of episodes
//! - `url`: print the canonical URL of an episode
//! - `extract`: read title and summary from one episode page
//! - `date`: run the date-extraction loop on free text
//! - `lookup`: look a term up on Wikipedia
//!
//! Settings come from the environment (and a `.env` file); flags override them.

mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use telemetry::{TelemetryGuard, TelemetryOptions};
use tokio::sync::mpsc;
use tracing::instrument;
use zeitsprung::crawler::{CrawlerConfig, EpisodeCrawler, extract_episode};
use zeitsprung::episode::episode_url;
use zeitsprung::extraction::{DateExtractor, ExtractionConfig};
use zeitsprung::gemini::Client;
use zeitsprung::knowledge::{LookupOutcome, WikipediaClient};
use zeitsprung::model::GeminiModel;
use zeitsprung::output::{Destination, ResultWriter};
use zeitsprung::pipeline::EpisodePipeline;
use zeitsprung::settings::{DEFAULT_HTTP_TIMEOUT, Settings};

#[derive(Parser)]
#[command(author, version, about = "Dates history podcast episodes with an LLM", long_about = None)]
struct Cli {
    /// Export traces over OTLP/HTTP
    #[arg(long, global = true)]
    otlp: bool,

    /// Also write logs to zeitsprung.log in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crawl a range of episodes and write the result files
    Crawl(CrawlArgs),

    /// Print the canonical URL of an episode
    Url(UrlArgs),

    /// Extract title and summary from an episode page
    Extract(ExtractArgs),

    /// Infer the time span discussed in a text
    Date(DateArgs),

    /// Look a term up on Wikipedia
    Lookup(LookupArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// First episode number
    #[arg(long, required = true)]
    from: u32,

    /// Last episode number (inclusive)
    #[arg(long, required = true)]
    to: u32,

    /// Retries after the first date-extraction attempt
    #[arg(long, default_value = "4")]
    max_attempts: usize,

    /// Skip the Wikipedia enrichment
    #[arg(long)]
    no_wikipedia: bool,

    /// Directory for the result files (default: GAG_OUTPUT_DIR or ./output)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Gemini model to use (default: GAG_MODEL or gemini-2.0-flash)
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
struct UrlArgs {
    /// Episode number
    #[arg(required = true)]
    episode: u32,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct ExtractArgs {
    /// Fetch the page from this URL
    #[arg(long)]
    url: Option<String>,

    /// Read the page from a local HTML file
    #[arg(long)]
    html: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct DateArgs {
    #[command(flatten)]
    source: TextSource,

    /// Retries after the first attempt
    #[arg(long, default_value = "4")]
    max_attempts: usize,

    /// Gemini model to use (default: GAG_MODEL or gemini-2.0-flash)
    #[arg(short, long)]
    model: Option<String>,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct TextSource {
    /// Episode text
    #[arg(long)]
    text: Option<String>,

    /// Read the episode text from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LookupArgs {
    /// Search term
    #[arg(required = true)]
    term: String,

    /// Wikipedia language edition (default: GAG_WIKIPEDIA_LANG or de)
    #[arg(short, long)]
    lang: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Settings first, so RUST_LOG from a .env file reaches the subscriber
    let settings = Settings::from_env().context("Failed to load settings")?;

    let _telemetry: TelemetryGuard = telemetry::init_tracing_subscriber(&TelemetryOptions {
        log_dir: cli.log_dir.clone(),
        otlp: cli.otlp,
    })?;

    // Execute the appropriate command
    match cli.command {
        Some(Commands::Crawl(args)) => crawl_command(args, &settings).await?,
        Some(Commands::Url(args)) => println!("{}", episode_url(args.episode)),
        Some(Commands::Extract(args)) => extract_command(args).await?,
        Some(Commands::Date(args)) => date_command(args, &settings).await?,
        Some(Commands::Lookup(args)) => lookup_command(args, &settings).await?,
        None => {
            // If no command is provided, show help
            let _ = Cli::parse_from(["zeitsprung", "--help"]);
        }
    }

    Ok(())
}

fn gemini_model(settings: &Settings, model: Option<String>) -> anyhow::Result<GeminiModel> {
    let api_key = settings.require_api_key()?;
    let client = Client::with_api_key_rate_limited(api_key, settings.requests_per_minute)
        .context("Failed to create Gemini client")?;
    Ok(GeminiModel::new(
        client,
        model.unwrap_or_else(|| settings.model.clone()),
    ))
}

#[instrument(skip(settings))]
async fn crawl_command(args: CrawlArgs, settings: &Settings) -> anyhow::Result<()> {
    if args.from > args.to {
        bail!("--from ({}) must not be greater than --to ({})", args.from, args.to);
    }

    let model = gemini_model(settings, args.model.clone())?;
    let crawler = EpisodeCrawler::new(CrawlerConfig::default())?;
    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir.clone());
    let writer = ResultWriter::new(&output_dir);
    let extraction = ExtractionConfig::builder()
        .max_attempts(args.max_attempts)
        .build();

    let mut pipeline = EpisodePipeline::new(crawler, model, writer).with_extraction_config(extraction);
    if !args.no_wikipedia {
        pipeline = pipeline.with_wikipedia(WikipediaClient::new(
            &settings.wikipedia_lang,
            DEFAULT_HTTP_TIMEOUT,
        )?);
    }

    println!(
        "Crawling episodes {} to {} with {} into {}...",
        args.from,
        args.to,
        pipeline.model().model_name(),
        output_dir.display()
    );

    // Create a channel for progress updates
    let (progress_sender, mut progress_receiver) = mpsc::channel(100);

    // Create progress bar
    let total = u64::from(args.to - args.from) + 1;
    let progress_bar = ProgressBar::new(total);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} ({eta}) {msg}")?
            .progress_chars("##-"),
    );
    progress_bar.set_message("Crawling episodes...");

    // Spawn a task to process progress updates
    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some((episode, destination)) = progress_receiver.recv().await {
                progress_bar.inc(1);
                let status = match destination {
                    Some(Destination::Dated) => "dated",
                    Some(Destination::Errors) => "undated",
                    None => "not written",
                };
                progress_bar.set_message(format!("Episode {} {}", episode, status));
            }
            progress_bar.finish_with_message("Crawl completed");
        }
    });

    let start_time = std::time::Instant::now();
    let summary = pipeline
        .run(args.from..=args.to, Some(progress_sender))
        .await;

    // Wait for progress task to complete (it will end when all senders are dropped)
    let _ = progress_handle.await;

    println!(
        "Processed {} episodes in {:.2?}: {} dated, {} failed",
        summary.processed,
        start_time.elapsed(),
        summary.dated,
        summary.failed
    );
    println!("Dated episodes: {}", pipeline.writer().dated_path().display());
    println!("Errors: {}", pipeline.writer().error_path().display());

    Ok(())
}

#[instrument]
async fn extract_command(args: ExtractArgs) -> anyhow::Result<()> {
    let config = CrawlerConfig::default();

    let page = match (args.url, args.html) {
        (Some(url), _) => EpisodeCrawler::new(config)?.fetch_episode(&url).await?,
        (None, Some(path)) => {
            let html = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            extract_episode(&html, &config)?
        }
        (None, None) => bail!("either --url or --html is required"),
    };

    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

#[instrument(skip(settings))]
async fn date_command(args: DateArgs, settings: &Settings) -> anyhow::Result<()> {
    let text = match (args.source.text, args.source.file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("either --text or --file is required"),
    };

    let model = gemini_model(settings, args.model)?;
    let extractor = DateExtractor::new(
        ExtractionConfig::builder()
            .max_attempts(args.max_attempts)
            .build(),
    );
    let extraction = extractor.run(&model, &text).await;

    let json_response = serde_json::json!({
        "start_date": extraction.range.start,
        "end_date": extraction.range.end,
        "attempts": extraction.attempts.iter().map(|a| {
            serde_json::json!({
                "temperature": a.temperature,
                "outcome": a.outcome.kind(),
            })
        }).collect::<Vec<_>>()
    });
    println!("{}", serde_json::to_string_pretty(&json_response)?);
    Ok(())
}

#[instrument(skip(settings))]
async fn lookup_command(args: LookupArgs, settings: &Settings) -> anyhow::Result<()> {
    let lang = args.lang.unwrap_or_else(|| settings.wikipedia_lang.clone());
    let client = WikipediaClient::new(&lang, DEFAULT_HTTP_TIMEOUT)?;

    let json_response = match client.lookup(&args.term).await? {
        LookupOutcome::Found(article) => serde_json::json!({
            "status": "found",
            "title": article.title,
            "summary": article.summary,
        }),
        LookupOutcome::Ambiguous(title) => serde_json::json!({
            "status": "ambiguous",
            "title": title,
        }),
        LookupOutcome::NotFound => serde_json::json!({ "status": "not_found" }),
    };
    println!("{}", serde_json::to_string_pretty(&json_response)?);
    Ok(())
}
