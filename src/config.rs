//! Runtime configuration
//!
//! Resolved from CLI flags, which clap backs with environment variables.
//! `main` loads `.env` before parsing so keys kept there are picked up too.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::DEFAULT_TIMEOUT;
use crate::cli::{Cli, CliError};
use crate::data::ApiKeys;

/// Default log filter; `--verbose` raises it to debug
const DEFAULT_LOG_FILTER: &str = "tripcache=info";
const VERBOSE_LOG_FILTER: &str = "tripcache=debug";

#[derive(Debug, Clone)]
pub struct Config {
    /// Cache directory override; `None` uses the platform cache directory
    pub cache_dir: Option<PathBuf>,
    /// Bound on upstream requests and store operations
    pub timeout: Duration,
    pub openweather_api_key: Option<String>,
    pub foursquare_api_key: Option<String>,
    /// Cache in memory only, nothing written to disk
    pub in_memory: bool,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: None,
            timeout: DEFAULT_TIMEOUT,
            openweather_api_key: None,
            foursquare_api_key: None,
            in_memory: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Creates a Config from parsed CLI arguments
    ///
    /// Blank API keys are treated as unset.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        cli.validate()?;
        Ok(Self {
            cache_dir: cli.cache_dir.clone(),
            timeout: Duration::from_secs(cli.timeout_secs),
            openweather_api_key: non_blank(cli.openweather_api_key.as_deref()),
            foursquare_api_key: non_blank(cli.foursquare_api_key.as_deref()),
            in_memory: cli.no_persist,
            verbose: cli.verbose,
        })
    }

    pub fn api_keys(&self) -> ApiKeys {
        ApiKeys {
            openweather: self.openweather_api_key.clone(),
            foursquare: self.foursquare_api_key.clone(),
        }
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
