//! Crypto price feed for a serial LCD display.
//!
//! The library half of the `ticker_feed` binary:
//! - `args` - `clap` command-line definition.
//! - `config` - merging flags, environment and the TOML file.
//! - `fetcher` - blocking HTTP client for the listing endpoint.
//! - `model` - listing payload, API environment, backoff.
//! - `poller` - fetch, format, write, wait; forever.
#![warn(missing_docs)]
pub mod args;
pub mod config;
pub mod fetcher;
pub mod model;
pub mod poller;
