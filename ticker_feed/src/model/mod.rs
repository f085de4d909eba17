//! Domain models for the price feed.
//!
//! - `listing` - the API's listing response and price selection.
//! - `environment` - pro vs sandbox deployment.
//! - `backoff` - wait-time tracker for the poll loop.

pub mod backoff;
pub mod environment;
pub mod listing;
