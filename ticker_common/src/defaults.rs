//! Shared constants for the pricing endpoint and the serial link.
use std::time::Duration;

/// CoinMarketCap production listing endpoint.
pub const PRO_API_URL: &str = "https://pro-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
/// CoinMarketCap sandbox listing endpoint.
pub const SANDBOX_API_URL: &str =
    "https://sandbox-api.coinmarketcap.com/v1/cryptocurrency/listings/latest";
/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";
/// Quote currency requested from the API and looked up in each record.
pub const CONVERT_CURRENCY: &str = "USD";

/// Baud rate the display firmware configures its USART for.
pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Read timeout set on the port. The link is write-only, so it is never hit.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Pause after each write so the microcontroller can drain its receive buffer.
pub const WRITE_SETTLE: Duration = Duration::from_millis(50);

/// Seconds between successful polls.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
/// Upper bound on the wait after repeated failures.
pub const DEFAULT_MAX_BACKOFF_SECS: u64 = 300;
/// HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Pause between replayed frames in the test harness.
pub const DEFAULT_REPLAY_INTERVAL_SECS: u64 = 10;

/// Serial device used when none is configured.
pub fn default_serial_port() -> &'static str {
    if cfg!(windows) { "COM4" } else { "/dev/ttyACM0" }
}
