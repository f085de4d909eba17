//! Error types shared between the feed and the replay harness.
//!
//! The `TickerError` enum unifies configuration, HTTP, decoding, validation and
//! serial failures so both binaries propagate a single error type. Fetch
//! failures are told apart from fatal ones with [`TickerError::is_fetch_error`].
use std::io;

use thiserror::Error;

/// Workspace-wide `Result` alias with `TickerError` as the default error.
pub type Result<T, E = TickerError> = std::result::Result<T, E>;

/// Unified error type shared by the feed and the replay harness.
#[derive(Error, Debug)]
pub enum TickerError {
    /// I/O error originating from the standard library or the serial writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Missing or invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The TOML configuration file could not be parsed.
    #[error("TOML config error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The pricing API could not be reached.
    #[error("Connection error: {0}")]
    Connect(String),

    /// The request to the pricing API timed out.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The pricing API redirected too many times.
    #[error("Too many redirects: {0}")]
    Redirect(String),

    /// Any other HTTP client failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The pricing API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// `status.error_message` from the body, or the raw body.
        message: String,
    },

    /// The response body was not a listing.
    #[error("Malformed listing response: {0}")]
    Decode(String),

    /// The listing held fewer records than a frame needs.
    #[error("Listing has {found} record(s), {needed} required")]
    InsufficientListings {
        /// Records required to build a frame.
        needed: usize,
        /// Records present in the response.
        found: usize,
    },

    /// A selected record carried no usable price in the requested currency.
    #[error("No {currency} price for {symbol}")]
    MissingPrice {
        /// Asset symbol, e.g. `BTC`.
        symbol: String,
        /// Quote currency, e.g. `USD`.
        currency: String,
    },

    /// A configured symbol is absent from the listing.
    #[error("Symbol not found in listing: {0}")]
    SymbolNotFound(String),

    /// The serial device could not be opened or enumerated.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl TickerError {
    /// Returns `true` for failures of a single fetch that the poll loop retries
    /// after a backoff. Everything else ends the loop.
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            TickerError::Connect(_)
                | TickerError::Timeout(_)
                | TickerError::Redirect(_)
                | TickerError::Http(_)
                | TickerError::Api { .. }
                | TickerError::Decode(_)
                | TickerError::InsufficientListings { .. }
                | TickerError::MissingPrice { .. }
                | TickerError::SymbolNotFound(_)
        )
    }
}

impl From<reqwest::Error> for TickerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TickerError::Timeout(err.to_string())
        } else if err.is_connect() {
            TickerError::Connect(err.to_string())
        } else if err.is_redirect() {
            TickerError::Redirect(err.to_string())
        } else if err.is_decode() {
            TickerError::Decode(err.to_string())
        } else {
            TickerError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_errors_are_retryable() {
        assert!(TickerError::Connect("refused".into()).is_fetch_error());
        assert!(
            TickerError::InsufficientListings { needed: 2, found: 1 }.is_fetch_error()
        );
        assert!(
            TickerError::Api {
                status: 401,
                message: "bad key".into()
            }
            .is_fetch_error()
        );
    }

    #[test]
    fn serial_and_config_errors_are_fatal() {
        let io = io::Error::new(io::ErrorKind::BrokenPipe, "unplugged");
        assert!(!TickerError::Io(io).is_fetch_error());
        assert!(!TickerError::Config("missing key".into()).is_fetch_error());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = TickerError::InsufficientListings { needed: 2, found: 1 };
        assert_eq!(err.to_string(), "Listing has 1 record(s), 2 required");

        let err = TickerError::MissingPrice {
            symbol: "BTC".into(),
            currency: "USD".into(),
        };
        assert_eq!(err.to_string(), "No USD price for BTC");
    }
}
