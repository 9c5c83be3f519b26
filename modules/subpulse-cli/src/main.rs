use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pushshift_client::PushshiftClient;
use subpulse_common::{Config, DailyAggregate, RecordKind, ScoredRecord, SearchFilters};
use subpulse_engine::{aggregate, Collector, ScorerFlavor, ScoringPipeline, WindowFetcher};

mod output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Download,
    Analysis,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Kind {
    Submission,
    Comment,
}

impl From<Kind> for RecordKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Submission => RecordKind::Submission,
            Kind::Comment => RecordKind::Comment,
        }
    }
}

/// Download historical subreddit data and analyze its sentiment.
#[derive(Debug, Parser)]
#[command(name = "subpulse")]
struct Args {
    /// What to run: collection, analysis of collected files, or both.
    #[arg(long, value_enum)]
    mode: Mode,

    /// Subreddits to collect from.
    #[arg(long = "subreddit", num_args = 1..)]
    subreddits: Vec<String>,

    /// Extra key=value query parameters forwarded to the search service.
    #[arg(long = "filters", num_args = 1..)]
    filters: Vec<String>,

    /// Collection start date (YYYY-MM-DD). Required for download modes.
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Collection end date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Record kind to collect.
    #[arg(long, value_enum, default_value_t = Kind::Submission)]
    kind: Kind,

    /// Sentiment scorer: 'lexicon' (fast) or 'weighted' (more accurate).
    #[arg(long, default_value = "lexicon")]
    flavor: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("subpulse=info".parse()?))
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    match args.mode {
        Mode::Download => run_download(&args, &config).await?,
        Mode::Analysis => run_analysis(&args, &config)?,
        Mode::All => {
            run_download(&args, &config).await?;
            run_analysis(&args, &config)?;
        }
    }

    info!("Done");
    Ok(())
}

async fn run_download(args: &Args, config: &Config) -> Result<()> {
    anyhow::ensure!(
        !args.subreddits.is_empty(),
        "at least one --subreddit is required for download"
    );
    let start_date = args
        .start_date
        .context("--start-date is required for download")?;
    let end_date = args.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = day_start(start_date);
    let end = day_start(end_date);
    let kind: RecordKind = args.kind.into();
    let filters = SearchFilters::parse(&args.filters)?;

    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

    let client = PushshiftClient::with_base_url(&config.pushshift_base_url)
        .with_page_size(config.page_size);
    let fetcher = WindowFetcher::new(client).with_max_attempts(config.max_attempts);
    let collector = Collector::new(fetcher).with_concurrency(config.fetch_concurrency);

    info!(
        subreddits = args.subreddits.len(),
        %start_date,
        %end_date,
        %kind,
        "starting download"
    );
    let collected = collector
        .collect(kind, &args.subreddits, start, end, None, &filters)
        .await?;

    for (entity, records) in &collected {
        let path = output::write_raw(
            &config.data_dir,
            kind,
            entity,
            start_date,
            end_date,
            records,
        )?;
        info!(entity, rows = records.len(), path = %path.display(), "wrote raw collection");
    }

    Ok(())
}

fn run_analysis(args: &Args, config: &Config) -> Result<()> {
    let flavor: ScorerFlavor = args.flavor.parse()?;
    let pipeline = ScoringPipeline::new(flavor.build());
    info!(flavor = flavor.as_str(), dir = %config.data_dir.display(), "running analysis");

    // Deterministic file order regardless of directory iteration order.
    let mut raw_files: Vec<_> = fs::read_dir(&config.data_dir)
        .with_context(|| format!("Failed to read {}", config.data_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| output::parse_raw_file_name(n).is_some())
        })
        .collect();
    raw_files.sort();

    if raw_files.is_empty() {
        info!("no raw collection files found, nothing to analyze");
        return Ok(());
    }

    let mut per_entity_scored: BTreeMap<String, Vec<ScoredRecord>> = BTreeMap::new();
    for path in &raw_files {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let entity = output::parse_raw_file_name(name)
            .with_context(|| format!("Unparseable raw file name '{name}'"))?;
        let records = output::read_raw(path)?;
        info!(file = name, rows = records.len(), "scoring raw file");
        per_entity_scored
            .entry(entity)
            .or_default()
            .extend(pipeline.score(records));
    }

    let mut per_entity: BTreeMap<String, Vec<DailyAggregate>> = BTreeMap::new();
    for (entity, scored) in &per_entity_scored {
        let aggregates = aggregate::aggregate(scored);
        let path = output::write_daily(&config.data_dir, entity, &aggregates)?;
        info!(entity, days = aggregates.len(), path = %path.display(), "wrote daily series");
        per_entity.insert(entity.clone(), aggregates);
    }

    let table = aggregate::merge(&per_entity);
    let path = output::write_merged(&config.data_dir, &table)?;
    info!(
        entities = table.entities.len(),
        days = table.rows.len(),
        path = %path.display(),
        "wrote merged daily table"
    );

    Ok(())
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}
