//! Serial link options shared by both binaries.
//!
//! Flattened into each binary's `clap` parser. Values may come from the command
//! line or from `TICKER_*` environment variables.
use clap::Args;
use log::info;

use crate::error::TickerError;
use crate::serial::available_ports;

/// Serial device options.
#[derive(Debug, Clone, Default, Args)]
pub struct SerialArgs {
    /// Serial device the display is attached to (e.g. `COM4`, `/dev/ttyACM0`).
    #[clap(long, env = "TICKER_SERIAL_PORT")]
    pub serial_port: Option<String>,

    /// Baud rate of the serial link.
    #[clap(long, env = "TICKER_BAUD_RATE")]
    pub baud_rate: Option<u32>,

    /// Print the available serial devices and exit.
    #[clap(long)]
    pub list_ports: bool,
}

impl SerialArgs {
    /// Port from the arguments with surrounding whitespace and quotes removed.
    pub fn port(&self) -> Option<String> {
        self.serial_port.as_deref().map(normalize_port)
    }
}

/// Normalize a port name by trimming whitespace and matching quotes.
///
/// This allows passing Windows device names in quotes without breaking parsing.
pub fn normalize_port(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Logs every serial device found, or a notice when there are none.
pub fn print_available_ports() -> Result<(), TickerError> {
    let ports = available_ports()?;
    if ports.is_empty() {
        info!("No serial ports found");
    }
    for port in ports {
        info!("Serial port: {}", port);
    }
    Ok(())
}
