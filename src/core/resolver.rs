use anyhow::{Result, anyhow, ensure};
use tracing::{debug, instrument};

use crate::core::asset::{AssetRegistry, Route};
use crate::core::currency::{CryptoPriceProvider, FiatRateProvider, PriceTable};

const USD: &str = "usd";

fn quote(prices: &PriceTable, id: &str, vs_currency: &str) -> Result<f64> {
    let price = prices
        .get(id)
        .ok_or_else(|| anyhow!("No price data found for asset: {}", id))?
        .get(vs_currency)
        .copied()
        .ok_or_else(|| anyhow!("No {} price found for asset: {}", vs_currency, id))?;
    ensure!(
        price.is_finite() && price > 0.0,
        "Invalid {} price for asset {}: {}",
        vs_currency,
        id,
        price
    );
    Ok(price)
}

/// Picks the upstream for a currency pair and derives a single rate from it.
pub struct RateResolver<'a> {
    assets: &'a AssetRegistry,
    crypto: &'a dyn CryptoPriceProvider,
    fiat: &'a dyn FiatRateProvider,
}

impl<'a> RateResolver<'a> {
    pub fn new(
        assets: &'a AssetRegistry,
        crypto: &'a dyn CryptoPriceProvider,
        fiat: &'a dyn FiatRateProvider,
    ) -> Self {
        RateResolver {
            assets,
            crypto,
            fiat,
        }
    }

    /// Units of `to` per unit of `from`. `None` when the fiat table has no
    /// entry for `to`.
    #[instrument(name = "ResolveRate", skip(self))]
    pub async fn resolve(&self, from: &str, to: &str) -> Result<Option<f64>> {
        let route = self.assets.classify(from, to);
        debug!(?route, "Selected route");

        let rate = match route {
            Route::CryptoToCrypto => {
                let from_id = self.assets.provider_id(from);
                let to_id = self.assets.provider_id(to);
                let prices = self
                    .crypto
                    .simple_price(&[from_id.as_str(), to_id.as_str()], USD)
                    .await?;
                Some(quote(&prices, &from_id, USD)? / quote(&prices, &to_id, USD)?)
            }
            Route::CryptoToFiat => {
                let id = self.assets.provider_id(from);
                let vs_currency = to.to_lowercase();
                let prices = self.crypto.simple_price(&[id.as_str()], &vs_currency).await?;
                Some(quote(&prices, &id, &vs_currency)?)
            }
            Route::FiatToCrypto => {
                // Upstream quotes `from` units per `to`
                let id = self.assets.provider_id(to);
                let vs_currency = from.to_lowercase();
                let prices = self.crypto.simple_price(&[id.as_str()], &vs_currency).await?;
                Some(1.0 / quote(&prices, &id, &vs_currency)?)
            }
            Route::FiatToFiat => {
                let rates = self.fiat.latest_rates(from).await?;
                match rates.get(to).copied() {
                    Some(rate) => {
                        ensure!(
                            rate.is_finite() && rate > 0.0,
                            "Invalid exchange rate for {}: {}",
                            to,
                            rate
                        );
                        Some(rate)
                    }
                    None => {
                        debug!("No exchange rate for {} in {} table", to, from);
                        None
                    }
                }
            }
        };

        debug!(?rate, "Resolved rate");
        Ok(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CryptoConfig;
    use crate::core::currency::RateTable;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubCrypto {
        usd: HashMap<String, f64>,
        quotes: HashMap<(String, String), f64>,
        calls: Mutex<Vec<(Vec<String>, String)>>,
    }

    #[async_trait]
    impl CryptoPriceProvider for StubCrypto {
        async fn simple_price(&self, ids: &[&str], vs_currency: &str) -> Result<PriceTable> {
            self.calls.lock().unwrap().push((
                ids.iter().map(|s| s.to_string()).collect(),
                vs_currency.to_string(),
            ));
            let mut table = PriceTable::new();
            for id in ids {
                let price = if vs_currency == USD {
                    self.usd.get(*id).copied()
                } else {
                    self.quotes
                        .get(&(id.to_string(), vs_currency.to_string()))
                        .copied()
                };
                // Known assets come back even when unquoted in `vs_currency`
                let known =
                    self.usd.contains_key(*id) || self.quotes.keys().any(|(i, _)| i == id);
                if known {
                    let entry = table.entry(id.to_string()).or_default();
                    if let Some(price) = price {
                        entry.insert(vs_currency.to_string(), price);
                    }
                }
            }
            Ok(table)
        }
    }

    #[derive(Default)]
    struct StubFiat {
        tables: HashMap<String, RateTable>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FiatRateProvider for StubFiat {
        async fn latest_rates(&self, base: &str) -> Result<RateTable> {
            self.calls.lock().unwrap().push(base.to_string());
            self.tables
                .get(base)
                .cloned()
                .ok_or_else(|| anyhow!("unknown base {}", base))
        }
    }

    fn stub_crypto() -> StubCrypto {
        StubCrypto {
            usd: HashMap::from([
                ("bitcoin".to_string(), 60000.0),
                ("ethereum".to_string(), 3000.0),
                ("pepe".to_string(), 0.00001),
            ]),
            quotes: HashMap::from([
                (("bitcoin".to_string(), "eur".to_string()), 55000.0),
                (("ethereum".to_string(), "eur".to_string()), 2750.0),
            ]),
            ..Default::default()
        }
    }

    fn stub_fiat() -> StubFiat {
        StubFiat {
            tables: HashMap::from([(
                "USD".to_string(),
                RateTable::from([("EUR".to_string(), 0.92), ("JPY".to_string(), 150.0)]),
            )]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_crypto_to_crypto_uses_usd_ratio() {
        let assets = AssetRegistry::default();
        let crypto = stub_crypto();
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        let rate = resolver.resolve("BTC", "ETH").await.unwrap().unwrap();
        assert!((rate - 20.0).abs() < 1e-9);

        let inverse = resolver.resolve("ETH", "BTC").await.unwrap().unwrap();
        assert!((rate * inverse - 1.0).abs() < 1e-9);

        let calls = crypto.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            (
                vec!["bitcoin".to_string(), "ethereum".to_string()],
                "usd".to_string()
            )
        );
        assert!(fiat.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_crypto_fiat_paths_are_inverse() {
        let assets = AssetRegistry::default();
        let crypto = stub_crypto();
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        let forward = resolver.resolve("BTC", "EUR").await.unwrap().unwrap();
        assert_eq!(forward, 55000.0);

        let backward = resolver.resolve("EUR", "BTC").await.unwrap().unwrap();
        assert!((3.0 * forward * backward - 3.0).abs() < 1e-9);

        let calls = crypto.calls.lock().unwrap();
        assert_eq!(calls[0], (vec!["bitcoin".to_string()], "eur".to_string()));
        assert_eq!(calls[1], (vec!["bitcoin".to_string()], "eur".to_string()));
    }

    #[tokio::test]
    async fn test_fiat_to_fiat_table_lookup() {
        let assets = AssetRegistry::default();
        let crypto = stub_crypto();
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        assert_eq!(resolver.resolve("USD", "EUR").await.unwrap(), Some(0.92));
        assert_eq!(*fiat.calls.lock().unwrap(), vec!["USD".to_string()]);
        assert!(crypto.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fiat_missing_target_is_none() {
        let assets = AssetRegistry::default();
        let crypto = stub_crypto();
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        assert_eq!(resolver.resolve("USD", "XYZ").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_crypto_missing_quote_is_error() {
        let assets = AssetRegistry::default();
        let crypto = stub_crypto();
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        let err = resolver.resolve("SOL", "USD").await.unwrap_err();
        assert_eq!(err.to_string(), "No price data found for asset: solana");

        let err = resolver.resolve("BTC", "GBP").await.unwrap_err();
        assert_eq!(err.to_string(), "No gbp price found for asset: bitcoin");
    }

    #[tokio::test]
    async fn test_zero_price_is_rejected() {
        let assets = AssetRegistry::default();
        let mut crypto = stub_crypto();
        crypto.usd.insert("ethereum".to_string(), 0.0);
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        let err = resolver.resolve("BTC", "ETH").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid usd price for asset ethereum: 0");
    }

    #[tokio::test]
    async fn test_unmapped_ticker_uses_lowercase_id() {
        let assets = AssetRegistry::from_config(&CryptoConfig {
            tickers: vec!["PEPE".to_string()],
            ..Default::default()
        });
        let crypto = stub_crypto();
        let fiat = stub_fiat();
        let resolver = RateResolver::new(&assets, &crypto, &fiat);

        let rate = resolver.resolve("PEPE", "BTC").await.unwrap().unwrap();
        assert!((rate - 0.00001 / 60000.0).abs() < 1e-18);
        assert_eq!(
            crypto.calls.lock().unwrap()[0].0,
            vec!["pepe".to_string(), "bitcoin".to_string()]
        );
    }
}
