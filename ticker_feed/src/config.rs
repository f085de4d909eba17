//! Feed configuration.
//!
//! Values are resolved in this order, first hit wins:
//! 1. command-line flags,
//! 2. `TICKER_*` environment variables (read by `clap`, `.env` included),
//! 3. the TOML file named by `--config`,
//! 4. built-in defaults from `ticker_common::defaults`.
//!
//! The API key has no default.
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use serde::Deserialize;
use ticker_common::TickerError;
use ticker_common::args::normalize_port;
use ticker_common::defaults::{
    DEFAULT_BAUD_RATE, DEFAULT_MAX_BACKOFF_SECS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_REQUEST_TIMEOUT_SECS, default_serial_port,
};

use crate::args::Args;
use crate::model::environment::ApiEnvironment;
use crate::model::listing::PriceSelection;

/// Contents of the optional TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    /// `apiKey`
    pub api_key: Option<String>,
    /// `apiUrl`
    pub api_url: Option<String>,
    /// `environment`: `pro` or `sandbox`.
    pub environment: Option<ApiEnvironment>,
    /// `serialPort`
    pub serial_port: Option<String>,
    /// `baudRate`
    pub baud_rate: Option<u32>,
    /// `pollIntervalSeconds`
    pub poll_interval_seconds: Option<u64>,
    /// `maxBackoffSeconds`
    pub max_backoff_seconds: Option<u64>,
    /// `requestTimeoutSeconds`
    pub request_timeout_seconds: Option<u64>,
    /// `symbols`: exactly two, e.g. `["BTC", "ETH"]`.
    pub symbols: Option<Vec<String>>,
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TickerError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            TickerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config: FileConfig = toml::from_str(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Fully resolved settings for one run of the feed.
#[derive(Clone)]
pub struct FeedConfig {
    /// API key sent in the key header.
    pub api_key: String,
    /// Listing endpoint.
    pub api_url: String,
    /// Serial device name.
    pub serial_port: String,
    /// Serial baud rate.
    pub baud_rate: u32,
    /// Wait after a successful poll.
    pub poll_interval: Duration,
    /// Longest wait after consecutive failures.
    pub max_backoff: Duration,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Records shown on the display.
    pub selection: PriceSelection,
}

impl FeedConfig {
    /// Reads the file named in `args`, if any, and resolves against it.
    pub fn load(args: &Args) -> Result<Self, TickerError> {
        let file = match &args.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        Self::resolve(args, file)
    }

    /// Merges `args` over `file` over defaults and validates the result.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, TickerError> {
        let api_key = args
            .api_key
            .clone()
            .or(file.api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                TickerError::Config(
                    "API key is required (--api-key, TICKER_API_KEY or apiKey in the config file)"
                        .to_string(),
                )
            })?;

        let environment = args.environment.or(file.environment).unwrap_or_default();
        let api_url = args
            .api_url
            .clone()
            .or(file.api_url)
            .unwrap_or_else(|| environment.listing_url().to_string());
        debug!("API environment: {}, url: {}", environment, api_url);

        let serial_port = args
            .serial
            .port()
            .or_else(|| file.serial_port.as_deref().map(normalize_port))
            .unwrap_or_else(|| default_serial_port().to_string());

        let baud_rate = args
            .serial
            .baud_rate
            .or(file.baud_rate)
            .unwrap_or(DEFAULT_BAUD_RATE);
        if baud_rate == 0 {
            return Err(TickerError::Config("Baud rate must be positive".to_string()));
        }

        let poll_secs = args
            .poll_interval_seconds
            .or(file.poll_interval_seconds)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_secs == 0 {
            return Err(TickerError::Config(
                "Poll interval must be at least one second".to_string(),
            ));
        }
        let max_backoff_secs = args
            .max_backoff_seconds
            .or(file.max_backoff_seconds)
            .unwrap_or(DEFAULT_MAX_BACKOFF_SECS);
        let timeout_secs = args
            .request_timeout_seconds
            .or(file.request_timeout_seconds)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(TickerError::Config(
                "Request timeout must be at least one second".to_string(),
            ));
        }

        let symbols = if args.symbols.is_empty() {
            file.symbols.unwrap_or_default()
        } else {
            args.symbols.clone()
        };
        let symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        validate_symbols(&symbols)?;

        Ok(FeedConfig {
            api_key,
            api_url,
            serial_port,
            baud_rate,
            poll_interval: Duration::from_secs(poll_secs),
            max_backoff: Duration::from_secs(max_backoff_secs),
            request_timeout: Duration::from_secs(timeout_secs),
            selection: PriceSelection::from_symbols(symbols),
        })
    }
}

/// An explicit symbol list must fill every display slot exactly once.
fn validate_symbols(symbols: &[String]) -> Result<(), TickerError> {
    if symbols.is_empty() {
        return Ok(());
    }
    if symbols.len() != PriceSelection::DISPLAY_SLOTS {
        return Err(TickerError::Config(format!(
            "Expected {} symbols, got {}: {}",
            PriceSelection::DISPLAY_SLOTS,
            symbols.len(),
            symbols.join(",")
        )));
    }
    for (i, symbol) in symbols.iter().enumerate() {
        if symbols[..i].contains(symbol) {
            return Err(TickerError::Config(format!("Duplicate symbol: {}", symbol)));
        }
    }
    Ok(())
}

impl fmt::Debug for FeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedConfig")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("serial_port", &self.serial_port)
            .field("baud_rate", &self.baud_rate)
            .field("poll_interval", &self.poll_interval)
            .field("max_backoff", &self.max_backoff)
            .field("request_timeout", &self.request_timeout)
            .field("selection", &self.selection)
            .finish()
    }
}
