//! Listing payload returned by the pricing API.
//!
//! Only the fields needed to build a frame and to report API errors are
//! modelled; everything else in the response is ignored by `serde`.
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use ticker_common::TickerError;

/// Response status block. Present on success and on error responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiStatus {
    /// Server time of the response.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// `0` on success.
    #[serde(default)]
    pub error_code: i64,
    /// Human-readable error, `null` on success.
    #[serde(default)]
    pub error_message: Option<String>,
    /// API credits consumed by the call.
    #[serde(default)]
    pub credit_count: Option<u64>,
}

/// Body of a non-success response. Only the status block is of interest.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    /// Status block carrying the error message.
    pub status: ApiStatus,
}

/// Price of one asset in one currency.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteEntry {
    /// Last price. May be `null` for thinly traded assets.
    #[serde(default)]
    pub price: Option<f64>,
    /// Change over the last 24 hours, in percent.
    #[serde(default)]
    pub percent_change_24h: Option<f64>,
    /// When the price was last refreshed upstream.
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// One asset in the listing.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetRecord {
    /// CoinMarketCap asset id.
    #[serde(default)]
    pub id: u64,
    /// Display name, e.g. `Bitcoin`.
    #[serde(default)]
    pub name: String,
    /// Ticker symbol, e.g. `BTC`.
    pub symbol: String,
    /// Market-cap rank.
    #[serde(default)]
    pub cmc_rank: Option<u32>,
    /// Quotes keyed by currency code.
    pub quote: HashMap<String, QuoteEntry>,
}

impl AssetRecord {
    /// Finite price of this asset in `currency`.
    pub fn price_in(&self, currency: &str) -> Result<PricePoint, TickerError> {
        let entry = self.quote.get(currency);
        match entry.and_then(|q| q.price).filter(|p| p.is_finite()) {
            Some(price) => Ok(PricePoint {
                symbol: self.symbol.clone(),
                price,
                percent_change_24h: entry.and_then(|q| q.percent_change_24h),
                last_updated: entry.and_then(|q| q.last_updated),
            }),
            None => Err(TickerError::MissingPrice {
                symbol: self.symbol.clone(),
                currency: currency.to_string(),
            }),
        }
    }
}

/// Full listing response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    /// Status block.
    #[serde(default)]
    pub status: ApiStatus,
    /// Records ordered by rank.
    pub data: Vec<AssetRecord>,
}

/// A price picked out of the listing for display.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    /// Asset symbol.
    pub symbol: String,
    /// Finite price in the quote currency.
    pub price: f64,
    /// Change over the last 24 hours, in percent.
    pub percent_change_24h: Option<f64>,
    /// When the price was last refreshed upstream.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Which records of a listing end up in the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceSelection {
    /// The first `n` records, in listing order.
    Leading(usize),
    /// Records with these symbols, in this order.
    Symbols(Vec<String>),
}

impl PriceSelection {
    /// Number of prices the display shows.
    pub const DISPLAY_SLOTS: usize = 2;

    /// Leading records when `symbols` is empty, otherwise those symbols.
    pub fn from_symbols(symbols: Vec<String>) -> Self {
        if symbols.is_empty() {
            PriceSelection::Leading(Self::DISPLAY_SLOTS)
        } else {
            PriceSelection::Symbols(symbols)
        }
    }
}

impl ListingResponse {
    /// Prices of the first `count` records.
    pub fn leading_prices(
        &self,
        count: usize,
        currency: &str,
    ) -> Result<Vec<PricePoint>, TickerError> {
        if self.data.len() < count {
            return Err(TickerError::InsufficientListings {
                needed: count,
                found: self.data.len(),
            });
        }
        self.data[..count]
            .iter()
            .map(|record| record.price_in(currency))
            .collect()
    }

    /// Prices of the records matching `symbols` (case-insensitive), in order.
    pub fn prices_for(
        &self,
        symbols: &[String],
        currency: &str,
    ) -> Result<Vec<PricePoint>, TickerError> {
        symbols
            .iter()
            .map(|symbol| {
                self.data
                    .iter()
                    .find(|record| record.symbol.eq_ignore_ascii_case(symbol))
                    .ok_or_else(|| TickerError::SymbolNotFound(symbol.clone()))
                    .and_then(|record| record.price_in(currency))
            })
            .collect()
    }

    /// Applies `selection` to this listing.
    pub fn select(
        &self,
        selection: &PriceSelection,
        currency: &str,
    ) -> Result<Vec<PricePoint>, TickerError> {
        match selection {
            PriceSelection::Leading(count) => self.leading_prices(*count, currency),
            PriceSelection::Symbols(symbols) => self.prices_for(symbols, currency),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "status": {
            "timestamp": "2021-04-27T22:35:02.000Z",
            "error_code": 0,
            "error_message": null,
            "elapsed": 10,
            "credit_count": 1
        },
        "data": [
            {
                "id": 1, "name": "Bitcoin", "symbol": "BTC", "cmc_rank": 1,
                "quote": { "USD": {
                    "price": 54999.999,
                    "percent_change_24h": -1.25,
                    "last_updated": "2021-04-27T22:34:02.000Z"
                } }
            },
            {
                "id": 1027, "name": "Ethereum", "symbol": "ETH", "cmc_rank": 2,
                "quote": { "USD": { "price": 2999.994 } }
            },
            {
                "id": 825, "name": "Tether", "symbol": "USDT", "cmc_rank": 3,
                "quote": { "USD": { "price": null } }
            }
        ]
    }"#;

    fn listing() -> ListingResponse {
        serde_json::from_str(BODY).unwrap()
    }

    #[test]
    fn parses_status_and_records() {
        let listing = listing();
        assert_eq!(listing.status.error_code, 0);
        assert_eq!(listing.status.credit_count, Some(1));
        assert!(listing.status.timestamp.is_some());
        assert_eq!(listing.data.len(), 3);
        assert_eq!(listing.data[1].name, "Ethereum");
    }

    #[test]
    fn leading_prices_take_first_two_records() {
        let prices = listing().leading_prices(2, "USD").unwrap();
        assert_eq!(prices[0].symbol, "BTC");
        assert_eq!(prices[0].price, 54999.999);
        assert_eq!(prices[0].percent_change_24h, Some(-1.25));
        assert_eq!(prices[1].symbol, "ETH");
        assert_eq!(prices[1].price, 2999.994);
    }

    #[test]
    fn single_record_is_rejected() {
        let mut listing = listing();
        listing.data.truncate(1);
        let err = listing.leading_prices(2, "USD").unwrap_err();
        assert!(matches!(
            err,
            TickerError::InsufficientListings { needed: 2, found: 1 }
        ));
    }

    #[test]
    fn empty_listing_is_rejected() {
        let listing: ListingResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        let err = listing
            .select(&PriceSelection::Leading(2), "USD")
            .unwrap_err();
        assert!(matches!(
            err,
            TickerError::InsufficientListings { needed: 2, found: 0 }
        ));
    }

    #[test]
    fn null_price_is_missing() {
        let err = listing()
            .prices_for(&["usdt".to_string()], "USD")
            .unwrap_err();
        assert!(matches!(err, TickerError::MissingPrice { ref symbol, .. } if symbol == "USDT"));
    }

    #[test]
    fn other_currency_is_missing() {
        let err = listing().leading_prices(2, "EUR").unwrap_err();
        assert!(matches!(err, TickerError::MissingPrice { ref currency, .. } if currency == "EUR"));
    }

    #[test]
    fn symbols_are_selected_in_requested_order() {
        let selection = PriceSelection::from_symbols(vec!["eth".into(), "BTC".into()]);
        let prices = listing().select(&selection, "USD").unwrap();
        let symbols: Vec<&str> = prices.iter().map(|p| p.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "BTC"]);
    }

    #[test]
    fn unknown_symbol_is_reported() {
        let err = listing()
            .prices_for(&["DOGE".to_string()], "USD")
            .unwrap_err();
        assert!(matches!(err, TickerError::SymbolNotFound(ref s) if s == "DOGE"));
    }

    #[test]
    fn no_symbols_means_two_leading_records() {
        assert_eq!(
            PriceSelection::from_symbols(Vec::new()),
            PriceSelection::Leading(2)
        );
    }

    #[test]
    fn body_without_data_fails_to_parse() {
        assert!(serde_json::from_str::<ListingResponse>(r#"{"status": {}}"#).is_err());
    }

    #[test]
    fn error_body_exposes_message() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"status": {"error_code": 1002, "error_message": "API key missing."}}"#,
        )
        .unwrap();
        assert_eq!(body.status.error_code, 1002);
        assert_eq!(body.status.error_message.as_deref(), Some("API key missing."));
    }
}
