//! Fremantle CLI binary.
//!
//! Screens REITs on quarterly fundamentals stored in a local SQLite database.

mod config;
mod logging;
mod prices;

use clap::{Parser, Subcommand, ValueEnum};
use config::Settings;
use fremantle::universe::{ProfileUniverse, PropertyType};
use fremantle::{ScreenRequest, Screener, Universe};
use fremantle_data::SqliteStore;
use fremantle_data::import::{read_line_items_from_path, read_prices_from_path, read_profiles_from_path};
use fremantle_data::yahoo::YahooPriceProvider;
use fremantle_metrics::{MetricCategory, MetricRegistry};
use fremantle_output::{ExportFormat, Exporter, format_value, render_definitions, render_table, summarize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;

#[derive(Parser)]
#[command(name = "fremantle")]
#[command(about = "Fremantle: quarterly fundamentals screener for REITs", long_about = None)]
#[command(version)]
struct Cli {
    /// Database path (overrides FREMANTLE_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Screen REITs by descriptive fields and metric bounds
    Screen {
        /// Country or region, exact match
        #[arg(long)]
        country: Option<String>,

        /// Property type, case-insensitive substring
        #[arg(long)]
        property_type: Option<String>,

        /// Ticker, exact match
        #[arg(long)]
        ticker: Option<String>,

        /// Metric bound such as min_operating_margin=0.2 (repeatable)
        #[arg(long = "filter", value_parser = parse_key_value)]
        filters: Vec<(String, String)>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print coverage and range for each metric
        #[arg(long)]
        summary: bool,
    },

    /// List configured metrics
    Metrics {
        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Import CSV data into the database
    Import {
        #[command(subcommand)]
        kind: ImportKind,
    },

    /// Refresh latest closing prices from Yahoo Finance
    Prices {
        /// Tickers to refresh (default: every profiled or reporting ticker)
        #[arg(long = "ticker")]
        tickers: Vec<String>,
    },

    /// List property types with REIT counts
    Sectors,

    /// Show database statistics
    Stats,
}

#[derive(Subcommand)]
enum ImportKind {
    /// Long-format statement rows: ticker,statement,line_item,fiscal_year,fiscal_quarter,value
    LineItems {
        /// CSV file
        path: PathBuf,
    },

    /// Daily closes: ticker,date,close_price
    Prices {
        /// CSV file
        path: PathBuf,
    },

    /// REIT profiles: ticker,company_name,business_description,website,property_type,country_region
    Profiles {
        /// CSV file
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    PrettyJson,
    Csv,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in {:?}", raw));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let settings = Settings::from_env(cli.db.as_deref())?;
    logging::init(settings.log_format, cli.verbose);

    match cli.command {
        Commands::Screen {
            country,
            property_type,
            ticker,
            filters,
            format,
            output,
            summary,
        } => {
            let mut pairs: Vec<(String, String)> = [
                ("country", country),
                ("property_type", property_type),
                ("ticker", ticker),
            ]
            .into_iter()
            .filter_map(|(k, v)| v.map(|v| (k.to_string(), v)))
            .collect();
            pairs.extend(filters);

            let store = open_store(&settings.db_path)?;
            screen(store, ScreenRequest::from_query(pairs), format, output.as_deref(), summary)?;
        }
        Commands::Metrics { category } => list_metrics(category.as_deref())?,
        Commands::Import { kind } => {
            let store = open_store(&settings.db_path)?;
            import(&store, kind)?;
        }
        Commands::Prices { tickers } => {
            let store = open_store(&settings.db_path)?;
            refresh_prices(&store, &settings, tickers).await?;
        }
        Commands::Sectors => {
            let store = open_store(&settings.db_path)?;
            list_sectors(&store)?;
        }
        Commands::Stats => {
            let store = open_store(&settings.db_path)?;
            print_stats(&store, &settings.db_path)?;
        }
    }

    Ok(())
}

/// Open the database, creating its directory if needed.
fn open_store(path: &Path) -> Result<SqliteStore, Box<dyn Error>> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    info!(path = %path.display(), "opening database");
    Ok(SqliteStore::open(path)?)
}

fn screen(
    store: SqliteStore,
    request: ScreenRequest,
    format: OutputFormat,
    output: Option<&Path>,
    summary: bool,
) -> Result<(), Box<dyn Error>> {
    let screener = Screener::standard(store)?;
    let response = screener.screen(&request)?;

    let rendered = match format {
        OutputFormat::Text => format!(
            "{}\n\n{}",
            response.explanation,
            render_table(screener.registry(), &response.reits)
        ),
        OutputFormat::Json => response.export_to_string(ExportFormat::Json)?,
        OutputFormat::PrettyJson => response.export_to_string(ExportFormat::PrettyJson)?,
        OutputFormat::Csv => response.export_to_string(ExportFormat::Csv)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            println!("Wrote {} REITs to {}", response.len(), path.display());
        }
        None => print!("{}", rendered),
    }

    if summary && !response.is_empty() {
        println!("\nMetric coverage ({} REITs):", response.len());
        for s in summarize(&response.reits)? {
            let pct = screener
                .registry()
                .get(&s.name)
                .is_some_and(|d| d.percentage);
            println!(
                "  {:<26} {:>4}/{:<4} min {:>10}  median {:>10}  max {:>10}",
                s.name,
                s.available,
                s.total,
                format_value(s.min, pct),
                format_value(s.median, pct),
                format_value(s.max, pct),
            );
        }
    }

    Ok(())
}

fn list_metrics(category: Option<&str>) -> Result<(), Box<dyn Error>> {
    let registry = MetricRegistry::standard()?;

    let table = match category {
        Some(name) => {
            let category = MetricCategory::parse(name).ok_or_else(|| {
                let known: Vec<&str> = MetricCategory::all().iter().map(|c| c.name()).collect();
                format!("Unknown category: {} (expected one of {})", name, known.join(", "))
            })?;
            render_definitions(registry.by_category(category))
        }
        None => render_definitions(&registry),
    };

    print!("{}", table);
    Ok(())
}

fn import(store: &SqliteStore, kind: ImportKind) -> Result<(), Box<dyn Error>> {
    let (label, path, written, skipped) = match kind {
        ImportKind::LineItems { path } => {
            let batch = read_line_items_from_path(&path)?;
            let written = store.put_line_items_batch(&batch.records)?;
            ("statement rows", path, written, batch.skipped)
        }
        ImportKind::Prices { path } => {
            let batch = read_prices_from_path(&path)?;
            let written = store.put_prices_batch(&batch.records)?;
            ("prices", path, written, batch.skipped)
        }
        ImportKind::Profiles { path } => {
            let batch = read_profiles_from_path(&path)?;
            let written = store.put_profiles_batch(&batch.records)?;
            ("profiles", path, written, batch.skipped)
        }
    };

    println!(
        "Imported {} {} from {} ({} skipped)",
        written,
        label,
        path.display(),
        skipped
    );
    Ok(())
}

async fn refresh_prices(
    store: &SqliteStore,
    settings: &Settings,
    tickers: Vec<String>,
) -> Result<(), Box<dyn Error>> {
    let tickers: Vec<String> = if tickers.is_empty() {
        default_price_tickers(store)?
    } else {
        tickers.iter().map(|t| t.trim().to_uppercase()).collect()
    };

    if tickers.is_empty() {
        println!("No tickers to refresh. Import profiles or statement rows first.");
        return Ok(());
    }

    let provider = YahooPriceProvider::with_rate_limit(settings.price_delay)?;
    let provider = &provider;
    let pb = prices::progress_bar(tickers.len())?;

    let outcome = prices::fetch_all(tickers, settings.price_concurrency, &pb, |ticker| async move {
        provider.fetch_latest_close(&ticker).await
    })
    .await;

    let stored = store.put_prices_batch(&outcome.prices)?;
    pb.finish_with_message(format!(
        "Stored {} prices ({} failed)",
        stored,
        outcome.failed.len()
    ));

    for (ticker, e) in &outcome.failed {
        eprintln!("  {}: {}", ticker, e);
    }
    Ok(())
}

/// Every ticker with a profile or at least one statement row, sorted.
fn default_price_tickers(store: &SqliteStore) -> Result<Vec<String>, Box<dyn Error>> {
    let mut tickers = ProfileUniverse::load(store)?.symbols();
    tickers.extend(store.tickers_with_financials()?);
    tickers.sort();
    tickers.dedup();
    Ok(tickers)
}

fn list_sectors(store: &SqliteStore) -> Result<(), Box<dyn Error>> {
    let universe = ProfileUniverse::load(store)?;
    let counts = universe.property_type_counts();

    println!("Property Types ({} REITs):", universe.size());
    println!("=========================\n");
    for property_type in PropertyType::all() {
        let count = counts.get(&property_type).copied().unwrap_or_default();
        println!("  {:<28} {:>5}", property_type.name(), count);
    }

    let unclassified = universe.unclassified();
    if !unclassified.is_empty() {
        println!("  {:<28} {:>5}", "Unclassified", unclassified.len());
    }

    let countries = universe.countries();
    if !countries.is_empty() {
        println!("\nCountries: {}", countries.join(", "));
    }
    Ok(())
}

fn print_stats(store: &SqliteStore, path: &Path) -> Result<(), Box<dyn Error>> {
    let stats = store.stats()?;

    println!("Database: {}", path.display());
    println!("  Statement rows:          {:>8}", stats.line_items);
    println!("  Tickers with financials: {:>8}", stats.tickers_with_financials);
    println!("  Distinct line items:     {:>8}", stats.distinct_line_items);
    println!("  Price rows:              {:>8}", stats.prices);
    println!("  Profiles:                {:>8}", stats.profiles);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use fremantle_data::{LineItemObservation, ReitProfile, StatementKind};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("min_operating_margin = 0.2").unwrap(),
            ("min_operating_margin".to_string(), "0.2".to_string())
        );
        assert_eq!(parse_key_value("max_pe_ratio=").unwrap().1, "");
        assert!(parse_key_value("min_operating_margin").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn test_screen_args() {
        let cli = Cli::parse_from([
            "fremantle",
            "screen",
            "--country",
            "Canada",
            "--filter",
            "min_revenue_growth=0.05",
            "--filter",
            "max_pffo_ratio=20",
            "--format",
            "pretty-json",
        ]);
        let Commands::Screen {
            country,
            filters,
            format,
            ..
        } = cli.command
        else {
            panic!("expected screen command");
        };
        assert_eq!(country.as_deref(), Some("Canada"));
        assert_eq!(filters.len(), 2);
        assert_eq!(format, OutputFormat::PrettyJson);
    }

    #[test]
    fn test_default_price_tickers_include_unprofiled_reporters() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .put_profiles_batch(&[ReitProfile::new("PLD"), ReitProfile::new("AVB")])
            .unwrap();
        let revenue = |ticker: &str| {
            LineItemObservation::quarterly(
                ticker,
                StatementKind::IncomeStatement,
                "Total Revenue",
                2024,
                1,
                Some(100.0),
            )
        };
        store
            .put_line_items_batch(&[revenue("PLD"), revenue("EQR")])
            .unwrap();

        assert_eq!(default_price_tickers(&store).unwrap(), ["AVB", "EQR", "PLD"]);
    }

    #[test]
    fn test_default_price_tickers_empty_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert!(default_price_tickers(&store).unwrap().is_empty());
    }
}
