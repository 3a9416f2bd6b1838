//! Command-line interface parsing for tripcache
//!
//! Every command reads through the shared cache and prints one JSON document.
//! Global flags fall back to environment variables, which may come from a
//! `.env` file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::data::attractions::DEFAULT_LIMIT;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// Upstream and store operations need a non-zero bound
    #[error("Invalid timeout: {0}s. The timeout must be at least 1 second")]
    InvalidTimeout(u64),

    /// The sweep interval must be non-zero
    #[error("Invalid sweep interval: {0}s. The interval must be at least 1 second")]
    InvalidInterval(u64),
}

/// tripcache - cached travel data from the command line
#[derive(Parser, Debug)]
#[command(name = "tripcache")]
#[command(about = "Countries, attractions, weather and exchange rates through a read-through TTL cache")]
#[command(version)]
pub struct Cli {
    /// Directory for cache files (defaults to the platform cache directory)
    #[arg(long, global = true, env = "TRIPCACHE_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Bound in seconds on every upstream request and store operation
    #[arg(long, global = true, env = "TRIPCACHE_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// OpenWeatherMap API key
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub openweather_api_key: Option<String>,

    /// Foursquare Places API key
    #[arg(long, global = true, env = "FOURSQUARE_API_KEY", hide_env_values = true)]
    pub foursquare_api_key: Option<String>,

    /// Keep the cache in memory for this run only
    #[arg(long, global = true)]
    pub no_persist: bool,

    /// Log cache hits and misses to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List every country
    Countries,

    /// Show one country by ISO 3166-1 alpha-2 code
    Country {
        /// Two-letter country code, e.g. FR
        code: String,
    },

    /// Search top-rated attractions in a country or city
    ///
    /// Examples:
    ///   tripcache attractions France
    ///   tripcache attractions France Paris --limit 5
    Attractions {
        country: String,
        city: Option<String>,
        /// Number of attractions to show (1-50)
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },

    /// Show details for one attraction (never cached)
    Attraction {
        /// Foursquare place id
        id: String,
    },

    /// Current weather for a city
    Weather {
        city: String,
        /// Two-letter country code to disambiguate the city
        country: Option<String>,
    },

    /// Convert an amount between currencies
    Convert {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// Three-letter currency code, e.g. USD
        from: String,
        /// Three-letter currency code, e.g. EUR
        to: String,
    },

    /// Delete expired cache entries
    Sweep {
        /// Keep running and sweep on an interval until interrupted
        #[arg(long)]
        watch: bool,
        /// Seconds between sweeps with --watch
        #[arg(long, default_value_t = 3600)]
        interval_secs: u64,
    },
}

impl Cli {
    /// Checks values clap cannot express as types
    pub fn validate(&self) -> Result<(), CliError> {
        if self.timeout_secs == 0 {
            return Err(CliError::InvalidTimeout(self.timeout_secs));
        }
        if let Command::Sweep {
            watch: true,
            interval_secs: 0,
        } = self.command
        {
            return Err(CliError::InvalidInterval(0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_countries() {
        let cli = Cli::parse_from(["tripcache", "countries"]);
        assert_eq!(cli.command, Command::Countries);
        assert!(!cli.no_persist);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_attractions_defaults() {
        let cli = Cli::parse_from(["tripcache", "attractions", "France"]);
        assert_eq!(
            cli.command,
            Command::Attractions {
                country: "France".into(),
                city: None,
                limit: 20,
            }
        );
    }

    #[test]
    fn test_cli_parse_attractions_with_city_and_limit() {
        let cli = Cli::parse_from(["tripcache", "attractions", "France", "Paris", "--limit", "5"]);
        assert_eq!(
            cli.command,
            Command::Attractions {
                country: "France".into(),
                city: Some("Paris".into()),
                limit: 5,
            }
        );
    }

    #[test]
    fn test_cli_parse_weather_optional_country() {
        let cli = Cli::parse_from(["tripcache", "weather", "Paris"]);
        assert_eq!(
            cli.command,
            Command::Weather {
                city: "Paris".into(),
                country: None,
            }
        );
    }

    #[test]
    fn test_cli_parse_convert() {
        let cli = Cli::parse_from(["tripcache", "convert", "100", "usd", "eur"]);
        assert_eq!(
            cli.command,
            Command::Convert {
                amount: 100.0,
                from: "usd".into(),
                to: "eur".into(),
            }
        );
    }

    #[test]
    fn test_cli_parse_convert_negative_amount() {
        let cli = Cli::parse_from(["tripcache", "convert", "-5", "USD", "EUR"]);
        assert!(matches!(cli.command, Command::Convert { amount, .. } if amount == -5.0));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tripcache", "sweep", "--no-persist", "--timeout-secs", "3"]);
        assert!(cli.no_persist);
        assert_eq!(cli.timeout_secs, 3);
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let cli = Cli::parse_from(["tripcache", "--timeout-secs", "0", "countries"]);
        let err = cli.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid timeout"));
    }

    #[test]
    fn test_validate_rejects_zero_watch_interval() {
        let cli = Cli::parse_from(["tripcache", "sweep", "--watch", "--interval-secs", "0"]);
        assert!(matches!(cli.validate(), Err(CliError::InvalidInterval(0))));

        let cli = Cli::parse_from(["tripcache", "sweep", "--interval-secs", "0"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["tripcache"]).is_err());
    }
}
