use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use super::util::get_json;
use crate::core::currency::{FiatRateProvider, RateTable};

// ExchangeRateApiProvider implementation for FiatRateProvider
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, client: Client) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    rates: RateTable,
}

#[async_trait]
impl FiatRateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn latest_rates(&self, base: &str) -> Result<RateTable> {
        let url = format!("{}/v4/latest/{}", self.base_url, base);
        let data: LatestRatesResponse =
            get_json(&self.client, &url, &format!("exchange rates for {base}")).await?;
        Ok(data.rates)
    }
}
