//! Which CoinMarketCap deployment to poll.
use clap::ValueEnum;
use serde::Deserialize;
use strum_macros::{Display, EnumString};
use ticker_common::defaults::{PRO_API_URL, SANDBOX_API_URL};

/// API deployment. The sandbox serves synthetic data and needs its own key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum, Display, EnumString,
)]
#[clap(rename_all = "lower")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApiEnvironment {
    /// `pro-api.coinmarketcap.com`
    #[default]
    Pro,
    /// `sandbox-api.coinmarketcap.com`
    Sandbox,
}

impl ApiEnvironment {
    /// Listing endpoint for this deployment.
    pub fn listing_url(&self) -> &'static str {
        match self {
            ApiEnvironment::Pro => PRO_API_URL,
            ApiEnvironment::Sandbox => SANDBOX_API_URL,
        }
    }
}
