//! Command-line arguments for the price feed.
//!
//! Every option can also be given through a `TICKER_*` environment variable or
//! the TOML file passed with `--config`. See `config` for precedence.
use std::path::PathBuf;

use clap::Parser;
use ticker_common::args::SerialArgs;

use crate::model::environment::ApiEnvironment;

/// Parsed command-line arguments.
#[derive(Debug, Default, Parser)]
#[command(version, about = "Forwards live crypto prices to a serial display", long_about = None)]
pub struct Args {
    /// TOML file with camelCase keys (`apiKey`, `serialPort`, ...).
    #[clap(long, env = "TICKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// CoinMarketCap API key.
    #[clap(long, env = "TICKER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Listing endpoint. Overrides the URL implied by `--environment`.
    #[clap(long, env = "TICKER_API_URL")]
    pub api_url: Option<String>,

    /// API deployment to poll.
    #[clap(long, env = "TICKER_ENVIRONMENT", value_enum)]
    pub environment: Option<ApiEnvironment>,

    /// Seconds between successful polls.
    #[clap(long, env = "TICKER_POLL_INTERVAL_SECONDS")]
    pub poll_interval_seconds: Option<u64>,

    /// Longest wait between polls while the API keeps failing.
    #[clap(long, env = "TICKER_MAX_BACKOFF_SECONDS")]
    pub max_backoff_seconds: Option<u64>,

    /// HTTP request timeout in seconds.
    #[clap(long, env = "TICKER_REQUEST_TIMEOUT_SECONDS")]
    pub request_timeout_seconds: Option<u64>,

    /// Symbols to display, comma separated. Defaults to the two top-ranked assets.
    #[clap(long, env = "TICKER_SYMBOLS", value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Poll once, write one frame and exit.
    #[clap(long)]
    pub once: bool,

    /// Serial device options.
    #[command(flatten)]
    pub serial: SerialArgs,
}
