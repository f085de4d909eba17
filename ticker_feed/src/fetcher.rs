//! Fetching the latest listing from the pricing API.
//!
//! One blocking `reqwest` client is built at startup with the API key and
//! accept headers installed as defaults; every poll is a single GET with the
//! fixed listing query.
use std::time::Duration;

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use ticker_common::TickerError;
use ticker_common::defaults::{API_KEY_HEADER, CONVERT_CURRENCY};

use crate::model::listing::{ErrorBody, ListingResponse};

/// Query sent with every listing request.
const LISTING_QUERY: [(&str, &str); 3] = [
    ("start", "1"),
    ("limit", "5000"),
    ("convert", CONVERT_CURRENCY),
];

/// Something that can produce a listing on demand.
pub trait PriceSource {
    /// Performs one fetch. No retries happen here.
    fn fetch(&mut self) -> Result<ListingResponse, TickerError>;
}

/// HTTP client for the listing endpoint.
pub struct PriceFetcher {
    client: Client,
    url: String,
}

impl PriceFetcher {
    /// Builds a client for `url` authenticating with `api_key`.
    pub fn new(url: &str, api_key: &str, timeout: Duration) -> Result<Self, TickerError> {
        let mut headers = HeaderMap::new();
        let key_name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
            .map_err(|e| TickerError::Config(format!("Invalid header name: {}", e)))?;
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|e| TickerError::Config(format!("API key is not a valid header value: {}", e)))?;
        key_value.set_sensitive(true);
        headers.insert(key_name, key_value);
        headers.insert(
            HeaderName::from_static("accepts"),
            HeaderValue::from_static("application/json"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        info!("Price fetcher targeting {}", url);
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl PriceSource for PriceFetcher {
    fn fetch(&mut self) -> Result<ListingResponse, TickerError> {
        debug!("GET {} {:?}", self.url, LISTING_QUERY);
        let response = self.client.get(&self.url).query(&LISTING_QUERY).send()?;
        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            return Err(TickerError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let listing: ListingResponse =
            serde_json::from_str(&body).map_err(|e| TickerError::Decode(e.to_string()))?;
        if listing.status.error_code != 0 {
            return Err(TickerError::Api {
                status: status.as_u16(),
                message: listing
                    .status
                    .error_message
                    .clone()
                    .unwrap_or_else(|| format!("error code {}", listing.status.error_code)),
            });
        }
        debug!(
            "Listing received: {} record(s), {} credit(s)",
            listing.data.len(),
            listing.status.credit_count.unwrap_or_default()
        );
        Ok(listing)
    }
}

/// Extracts `status.error_message` from an error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.status.error_message)
        .unwrap_or_else(|| body.trim().to_string())
}
