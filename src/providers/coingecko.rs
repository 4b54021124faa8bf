use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::instrument;

use super::util::get_json;
use crate::core::currency::{CryptoPriceProvider, PriceTable};

// CoinGeckoProvider implementation for CryptoPriceProvider
pub struct CoinGeckoProvider {
    base_url: String,
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        CoinGeckoProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl CryptoPriceProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoPriceFetch", skip(self))]
    async fn simple_price(&self, ids: &[&str], vs_currency: &str) -> Result<PriceTable> {
        let ids = ids.join(",");
        let url = Url::parse_with_params(
            &format!("{}/api/v3/simple/price", self.base_url),
            &[("ids", ids.as_str()), ("vs_currencies", vs_currency)],
        )
        .with_context(|| format!("Invalid CoinGecko base URL: {}", self.base_url))?;

        // Shape: { "bitcoin": { "usd": 12345.6 }, ... }
        get_json(
            &self.client,
            url.as_str(),
            &format!("crypto prices {ids}/{vs_currency}"),
        )
        .await
    }
}
