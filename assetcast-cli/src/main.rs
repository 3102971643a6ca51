//! Assetcast CLI — fetch, train, forecast, and cache management commands.
//!
//! Commands:
//! - `fetch crypto` — full crypto price history from CoinGecko
//! - `fetch fx` — daily exchange-rate history from Alpha Vantage
//! - `fetch bars` — Tiingo bars for a symbol and date range, cached as CSV
//! - `train` — fit a registry model on fetched bars and persist its state
//! - `forecast` — restore a trained model and print forward predictions
//! - `cache status` — list cached entries and row counts

use anyhow::{bail, Context, Result};
use assetcast_core::data::{ApiConfig, DataFetcher};
use assetcast_core::domain::{Frequency, PriceRecord};
use assetcast_core::models::{Forecaster, ModelRegistry, VALID_MODELS};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "assetcast",
    about = "Assetcast CLI — market data fetching and price forecasting"
)]
struct Cli {
    /// Path to a TOML config file with API base URLs and keys.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch market data from an upstream provider.
    Fetch {
        #[command(subcommand)]
        source: FetchSource,
    },
    /// Fit a model on Tiingo bars and persist its state.
    Train {
        /// Model identifier (e.g. arima, naive).
        model: String,

        /// Ticker symbol (e.g. SPY, btcusd with --crypto).
        #[arg(long)]
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 1 year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Bar frequency (daily, weekly, monthly, annually, 5min, 4hour).
        #[arg(long, default_value = "daily")]
        frequency: String,

        /// Treat the symbol as a crypto pair.
        #[arg(long, default_value_t = false)]
        crypto: bool,

        /// Master seed for deterministic model initialization.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,

        /// Model artifact directory. Defaults to ./models.
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,
    },
    /// Restore a trained model and print forward predictions.
    Forecast {
        /// Model identifier (e.g. arima, naive).
        model: String,

        /// Number of periods to forecast beyond the trained series.
        #[arg(long, default_value_t = 7)]
        steps: usize,

        /// Master seed for deterministic model initialization.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Model artifact directory. Defaults to ./models.
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,
    },
    /// Cache management commands.
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum FetchSource {
    /// Full crypto price history from CoinGecko.
    Crypto {
        /// CoinGecko coin id (e.g. bitcoin, ethereum).
        coin_id: String,
    },
    /// Daily exchange-rate history from Alpha Vantage.
    Fx {
        /// Base currency (e.g. EUR).
        from: String,

        /// Quote currency (e.g. USD).
        to: String,
    },
    /// Tiingo bars for a symbol and date range, cached as CSV.
    Bars {
        /// Ticker symbol (e.g. SPY, btcusd with --crypto).
        symbol: String,

        /// Start date (YYYY-MM-DD). Defaults to 1 year ago.
        #[arg(long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD). Defaults to today.
        #[arg(long)]
        end: Option<String>,

        /// Bar frequency (daily, weekly, monthly, annually, 5min, 4hour).
        #[arg(long, default_value = "daily")]
        frequency: String,

        /// Treat the symbol as a crypto pair.
        #[arg(long, default_value_t = false)]
        crypto: bool,

        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// List cached entries with row counts.
    Status {
        /// Cache directory. Defaults to ./data.
        #[arg(long, default_value = "data")]
        cache_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Fetch { source } => match source {
            FetchSource::Crypto { coin_id } => run_fetch_crypto(config, &coin_id),
            FetchSource::Fx { from, to } => run_fetch_fx(config, &from, &to),
            FetchSource::Bars {
                symbol,
                start,
                end,
                frequency,
                crypto,
                cache_dir,
            } => {
                let records =
                    fetch_bars(config, &symbol, &start, &end, &frequency, crypto, cache_dir)?;
                print_series(&symbol, &records);
                Ok(())
            }
        },
        Commands::Train {
            model,
            symbol,
            start,
            end,
            frequency,
            crypto,
            seed,
            cache_dir,
            models_dir,
        } => run_train(
            config, &model, &symbol, &start, &end, &frequency, crypto, seed, cache_dir, models_dir,
        ),
        Commands::Forecast {
            model,
            steps,
            seed,
            models_dir,
        } => run_forecast(&model, steps, seed, &models_dir),
        Commands::Cache { action } => match action {
            CacheAction::Status { cache_dir } => run_cache_status(config, cache_dir),
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<ApiConfig> {
    match path {
        Some(p) => Ok(ApiConfig::from_toml(p)?),
        None => Ok(ApiConfig::from_env()),
    }
}

fn parse_date_or(input: &Option<String>, fallback_days_ago: i64) -> Result<NaiveDate> {
    match input.as_deref() {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive() - chrono::Duration::days(fallback_days_ago)),
    }
}

fn run_fetch_crypto(config: ApiConfig, coin_id: &str) -> Result<()> {
    let fetcher = DataFetcher::new(config, "data");
    let records = fetcher.fetch_crypto_history(coin_id)?;
    print_series(coin_id, &records);
    Ok(())
}

fn run_fetch_fx(config: ApiConfig, from: &str, to: &str) -> Result<()> {
    let fetcher = DataFetcher::new(config, "data");
    let records = fetcher.fetch_fx_daily(from, to)?;
    print_series(&format!("{from}/{to}"), &records);
    Ok(())
}

fn fetch_bars(
    config: ApiConfig,
    symbol: &str,
    start: &Option<String>,
    end: &Option<String>,
    frequency: &str,
    crypto: bool,
    cache_dir: PathBuf,
) -> Result<Vec<PriceRecord>> {
    let start_date = parse_date_or(start, 365)?;
    let end_date = parse_date_or(end, 0)?;
    let frequency: Frequency = frequency.parse()?;

    let fetcher = DataFetcher::new(config, cache_dir);
    let records = if crypto {
        fetcher.fetch_crypto_bars(symbol, start_date, end_date, frequency)?
    } else {
        fetcher.fetch_stock_bars(symbol, start_date, end_date, frequency)?
    };
    Ok(records)
}

#[allow(clippy::too_many_arguments)]
fn run_train(
    config: ApiConfig,
    model_name: &str,
    symbol: &str,
    start: &Option<String>,
    end: &Option<String>,
    frequency: &str,
    crypto: bool,
    seed: u64,
    cache_dir: PathBuf,
    models_dir: PathBuf,
) -> Result<()> {
    let records = fetch_bars(config, symbol, start, end, frequency, crypto, cache_dir)?;
    if records.is_empty() {
        bail!("no data returned for {symbol}; nothing to train on");
    }

    let registry = ModelRegistry::new(seed, &models_dir);
    let mut model = registry.create(model_name)?;
    model.train(&records)?;

    println!("Trained model: {}", model.name());
    println!("Symbol:        {symbol}");
    println!("Rows:          {}", records.len());
    println!(
        "Period:        {} to {}",
        records.first().map(|r| r.date.to_string()).unwrap_or_default(),
        records.last().map(|r| r.date.to_string()).unwrap_or_default()
    );
    println!("Seed:          {seed}");
    println!(
        "Artifact:      {}",
        models_dir.join(model.name()).join("model.json").display()
    );
    Ok(())
}

fn run_forecast(model_name: &str, steps: usize, seed: u64, models_dir: &Path) -> Result<()> {
    let registry = ModelRegistry::new(seed, models_dir);
    if !registry.has_artifact(model_name) && VALID_MODELS.contains(&model_name) {
        bail!(
            "no trained artifact for '{model_name}' under {} — run `assetcast train {model_name}` first",
            models_dir.display()
        );
    }

    let model = registry.open(model_name)?;
    let predictions = model.forecast(steps)?;

    println!("Model:    {}", model.name());
    println!("Steps:    {steps}");
    println!();
    println!("{:<22} {:>14}", "Date", "Prediction");
    println!("{}", "-".repeat(37));
    for p in &predictions {
        println!("{:<22} {:>14.4}", p.date.to_string(), p.prediction);
    }
    Ok(())
}

fn run_cache_status(config: ApiConfig, cache_dir: PathBuf) -> Result<()> {
    let fetcher = DataFetcher::new(config, &cache_dir);
    let entries = fetcher.cache().status()?;

    if entries.is_empty() {
        println!("Cache is empty: {}", cache_dir.display());
        return Ok(());
    }

    println!("Cache: {}", cache_dir.display());
    println!("Entries: {}", entries.len());
    println!();
    println!("{:<50} {:>8}", "Entry", "Rows");
    println!("{}", "-".repeat(59));
    for entry in &entries {
        println!("{:<50} {:>8}", entry.file_name, entry.rows);
    }
    Ok(())
}

fn print_series(label: &str, records: &[PriceRecord]) {
    if records.is_empty() {
        println!("No data returned for {label}.");
        return;
    }

    println!("Series: {label}");
    println!("Rows:   {}", records.len());
    println!(
        "Range:  {} to {}",
        records.first().map(|r| r.date.to_string()).unwrap_or_default(),
        records.last().map(|r| r.date.to_string()).unwrap_or_default()
    );

    let shown = records.len().min(5);
    println!();
    println!(
        "{:<22} {:>10} {:>10} {:>10} {:>10} {:>12}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    println!("{}", "-".repeat(79));
    for r in &records[records.len() - shown..] {
        println!(
            "{:<22} {:>10.4} {:>10.4} {:>10.4} {:>10.4} {:>12.2}",
            r.date.to_string(),
            r.open,
            r.high,
            r.low,
            r.close,
            r.volume
        );
    }
    if records.len() > shown {
        println!("({} earlier rows not shown)", records.len() - shown);
    }
}
