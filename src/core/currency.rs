//! Price source abstractions

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Prices keyed by provider id, then by quote currency (lower-case).
pub type PriceTable = HashMap<String, HashMap<String, f64>>;

/// Exchange rates keyed by upper-case currency code.
pub type RateTable = HashMap<String, f64>;

#[async_trait]
pub trait CryptoPriceProvider: Send + Sync {
    /// Fetches the price of every asset in `ids` denominated in `vs_currency`
    /// using a single request.
    async fn simple_price(&self, ids: &[&str], vs_currency: &str) -> Result<PriceTable>;
}

#[async_trait]
pub trait FiatRateProvider: Send + Sync {
    /// Fetches the full rate table anchored at `base`.
    async fn latest_rates(&self, base: &str) -> Result<RateTable>;
}
