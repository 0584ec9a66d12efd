//! Command-line entry point for vacancy statistics.

mod report;
mod telemetry;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use vacancy_core::{Config, ProfessionFilter};
use vacancy_ingestion::{split_by_year, DatasetReader, ListingQuery, Normalizer, SortKey, SortOrder, VacancyFilter};
use vacancy_reducer::PartitionedReducer;
use vacancy_stats::{aggregate, AggregateResult};

#[derive(Parser, Debug)]
#[command(
    name = "vacancy-stats",
    about = "Salary and vacancy-count statistics over job-board CSV exports",
    version
)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter used when RUST_LOG is unset (e.g. "debug")
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate a single CSV export
    Stats(StatsArgs),
    /// Aggregate a directory of CSV shards in parallel
    Shards(ShardsArgs),
    /// Split an export into one CSV file per year
    Split(SplitArgs),
    /// Print a filtered, sorted listing of vacancies
    List(ListArgs),
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// CSV export to read
    #[arg(long)]
    file: PathBuf,
    /// Profession substring for the filtered dynamics
    #[arg(long)]
    profession: Option<String>,
    /// Also write the aggregate as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ShardsArgs {
    /// Directory of per-year CSV files
    #[arg(long)]
    dir: PathBuf,
    /// Profession substring for the filtered dynamics
    #[arg(long)]
    profession: Option<String>,
    /// Worker threads (defaults to half the available parallelism)
    #[arg(long)]
    workers: Option<usize>,
    /// Also write the aggregate as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// CSV export to split
    #[arg(long)]
    input: PathBuf,
    /// Directory receiving <YYYY>.csv files
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// CSV export to read
    #[arg(long)]
    file: PathBuf,
    /// Row filter, e.g. "Area: Москва" or "Published: 05.07.2022"
    #[arg(long, value_parser = parse_filter)]
    filter: Option<VacancyFilter>,
    /// Sort key: name, area, salary, published or currency
    #[arg(long, value_parser = parse_sort_key)]
    sort: Option<SortKey>,
    /// Sort in descending order
    #[arg(long, requires = "sort")]
    reverse: bool,
    /// First row to print, 1-based
    #[arg(long)]
    start: Option<usize>,
    /// Row to stop before, 1-based
    #[arg(long)]
    end: Option<usize>,
}

fn parse_filter(raw: &str) -> std::result::Result<VacancyFilter, String> {
    raw.parse().map_err(|err: vacancy_core::Error| err.to_string())
}

fn parse_sort_key(raw: &str) -> std::result::Result<SortKey, String> {
    raw.parse().map_err(|err: vacancy_core::Error| err.to_string())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(level) = &cli.log_level {
        config.telemetry.log_level = level.clone();
    }
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Stats(args) => run_stats(config, args),
        Command::Shards(args) => run_shards(config, args),
        Command::Split(args) => run_split(args),
        Command::List(args) => run_list(config, args),
    }
}

fn run_stats(mut config: Config, args: StatsArgs) -> Result<()> {
    if let Some(profession) = args.profession {
        config.stats.profession = ProfessionFilter::new(profession);
    }
    config.validate()?;

    let dataset = DatasetReader::new(&config.ingestion)
        .read_path(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let result = aggregate(&dataset.records, &config)?;

    info!(records = result.total_records(), "aggregation complete");
    print_result(&result, args.json.as_deref())
}

fn run_shards(mut config: Config, args: ShardsArgs) -> Result<()> {
    if let Some(profession) = args.profession {
        config.stats.profession = ProfessionFilter::new(profession);
    }
    if let Some(workers) = args.workers {
        config.reducer.workers = workers;
    }
    config.validate()?;

    let result = PartitionedReducer::new(config)
        .reduce_dir(&args.dir)
        .with_context(|| format!("failed to reduce shards in {}", args.dir.display()))?;

    info!(records = result.total_records(), "partitioned aggregation complete");
    print_result(&result, args.json.as_deref())
}

fn run_split(args: SplitArgs) -> Result<()> {
    let files = split_by_year(&args.input, &args.out_dir)
        .with_context(|| format!("failed to split {}", args.input.display()))?;
    for file in files {
        println!("{}", file.display());
    }
    Ok(())
}

fn run_list(config: Config, args: ListArgs) -> Result<()> {
    let dataset = DatasetReader::new(&config.ingestion)
        .read_path(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let order = if args.reverse {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let query = ListingQuery {
        filter: args.filter,
        sort: args.sort.map(|key| (key, order)),
        start: args.start,
        end: args.end,
    };
    let rows = query.apply(dataset.records, &Normalizer::new(config.currency))?;

    print!("{}", report::render_listing(&rows));
    Ok(())
}

fn print_result(result: &AggregateResult, json: Option<&Path>) -> Result<()> {
    print!("{}", report::render_summary(result));
    if let Some(path) = json {
        fs::write(path, serde_json::to_string_pretty(result)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "aggregate written");
    }
    Ok(())
}
