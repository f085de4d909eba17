//!
//! Common types and utilities shared by the ticker feed and the replay harness.
//!
//! This crate aggregates:
//! - `error` - unified error type `TickerError` and the `Result` alias built on it.
//! - `frame` - the newline-terminated price line understood by the display.
//! - `serial` - opening the serial device and writing frames to it.
//! - `args` - command-line options shared by both binaries.
//! - `defaults` - constants for endpoints, serial parameters and timings.
#![warn(missing_docs)]
pub mod args;
pub mod defaults;
pub mod error;
pub mod frame;
pub mod serial;

pub use error::TickerError;
pub use frame::Frame;
pub use error::Result;
