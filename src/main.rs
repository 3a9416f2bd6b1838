//! tripcache - cached travel data from the command line
//!
//! Runs one command through the read-through cache and prints the result as
//! JSON on stdout. Logs go to stderr.

use clap::Parser;
use dotenv::dotenv;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tripcache::cache::{
    CacheError, Domain, Housekeeper, StoreError, SweepConfig, SweepMessage,
};
use tripcache::cli::{Cli, Command};
use tripcache::config::Config;
use tripcache::data::attractions::ATTRACTIONS_SOURCE;
use tripcache::data::countries::COUNTRIES_SOURCE;
use tripcache::data::weather::WEATHER_SOURCE;
use tripcache::data::{Envelope, TravelData};

/// Failure of a single command
#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("cache sweep failed: {0}")]
    Store(#[from] StoreError),

    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl RunError {
    fn kind(&self) -> &'static str {
        match self {
            RunError::Cache(err) => err.kind(),
            RunError::Store(_) => "store_error",
            RunError::Output(_) => "output_error",
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            RunError::Cache(err) => err.is_retryable(),
            RunError::Store(_) => true,
            RunError::Output(_) => false,
        }
    }
}

/// Sets up tracing on stderr; `--verbose` wins over `RUST_LOG`
fn init_logging(config: &Config) {
    let filter = if config.verbose {
        EnvFilter::new(config.log_filter())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter()))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), RunError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints a JSON error document on stderr and exits non-zero
fn exit_with_error(kind: &str, message: &str, retryable: bool) -> ! {
    let body = json!({
        "error": kind,
        "message": message,
        "retryable": retryable,
    });
    eprintln!("{}", body);
    std::process::exit(1);
}

async fn run(data: &TravelData, command: Command) -> Result<(), RunError> {
    match command {
        Command::Countries => {
            let served = data.countries.list().await?;
            print_json(&Envelope::new(served, COUNTRIES_SOURCE, |countries| {
                json!({ "total": countries.len(), "countries": countries })
            }))
        }
        Command::Country { code } => {
            let served = data.countries.get(&code).await?;
            print_json(&Envelope::new(served, COUNTRIES_SOURCE, |country| country))
        }
        Command::Attractions {
            country,
            city,
            limit,
        } => {
            let served = data
                .attractions
                .search(&country, city.as_deref(), limit)
                .await?;
            print_json(&Envelope::new(served, ATTRACTIONS_SOURCE, |page| page))
        }
        Command::Attraction { id } => {
            let served = data.attractions.details(&id).await?;
            print_json(&Envelope::new(served, ATTRACTIONS_SOURCE, |attraction| {
                json!({ "attraction": attraction })
            }))
        }
        Command::Weather { city, country } => {
            let served = data.weather.current(&city, country.as_deref()).await?;
            print_json(&Envelope::new(served, WEATHER_SOURCE, |weather| weather))
        }
        Command::Convert { amount, from, to } => {
            let conversion = data.currency.convert(amount, &from, &to).await?;
            print_json(&conversion)
        }
        Command::Sweep {
            watch: false, ..
        } => {
            let removed = data.cache().sweep(&Domain::ALL).await?;
            info!(removed, "swept expired cache entries");
            print_json(&json!({ "removed": removed }))
        }
        Command::Sweep {
            watch: true,
            interval_secs,
        } => {
            let config = SweepConfig {
                interval: std::time::Duration::from_secs(interval_secs),
                ..Default::default()
            };
            let mut housekeeper = Housekeeper::spawn(data.cache().clone(), config);
            info!(interval_secs, "sweeping expired entries until interrupted");

            loop {
                tokio::select! {
                    message = housekeeper.receiver.recv() => match message {
                        Some(SweepMessage::Swept(removed)) => {
                            print_json(&json!({ "removed": removed }))?;
                        }
                        Some(SweepMessage::SweepError(error)) => {
                            print_json(&json!({ "error": "store_error", "message": error }))?;
                        }
                        None => break,
                    },
                    _ = tokio::signal::ctrl_c() => break,
                }
            }

            housekeeper.shutdown().await;
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Keys in .env become env vars that clap reads
    dotenv().ok();

    let cli = Cli::parse();
    let config = match Config::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => exit_with_error("invalid_argument", &e.to_string(), false),
    };
    init_logging(&config);

    let data = TravelData::from_config(&config)?;

    if let Err(e) = run(&data, cli.command).await {
        exit_with_error(e.kind(), &e.to_string(), e.is_retryable());
    }

    Ok(())
}
