//! The line protocol spoken to the display.
//!
//! Each frame is a single line of comma-terminated fields ending in `\n`. The
//! firmware reads bytes until the newline, splits on `,` and shows one field
//! per asset. There is no header or checksum.
use std::fmt;

/// Field separator; also written after the last field.
pub const SEPARATOR: char = ',';
/// Line terminator the firmware waits for.
pub const TERMINATOR: char = '\n';

/// Rounds a price to two decimal places.
///
/// Rounds the exact binary value, so `2999.995` (stored just below the half
/// cent) becomes `2999.99`.
pub fn round_price(price: f64) -> f64 {
    format!("{:.2}", price).parse().unwrap_or(price)
}

/// One outbound line, e.g. `"55000.0,2999.99,\n"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(String);

impl Frame {
    /// Builds a frame from prices, rounding each to two decimals.
    ///
    /// Integral values keep a trailing `.0` (`55000.0`), other values print in
    /// their shortest form (`2999.99`).
    pub fn from_prices(prices: &[f64]) -> Self {
        let mut line = String::new();
        for price in prices {
            line.push_str(&format!("{:?}", round_price(*price)));
            line.push(SEPARATOR);
        }
        line.push(TERMINATOR);
        Frame(line)
    }

    /// Wraps an already formatted line. A missing terminator is appended.
    pub fn from_line(line: &str) -> Self {
        let mut line = line.to_string();
        if !line.ends_with(TERMINATOR) {
            line.push(TERMINATOR);
        }
        Frame(line)
    }

    /// UTF-8 bytes written to the serial port.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Line content.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.trim_end_matches(TERMINATOR))
    }
}
