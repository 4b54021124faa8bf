//! Crypto asset classification

use std::collections::{HashMap, HashSet};

use crate::core::config::CryptoConfig;

/// Built-in crypto tickers with their CoinGecko ids.
const CRYPTO_IDS: [(&str, &str); 20] = [
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("USDT", "tether"),
    ("BNB", "binancecoin"),
    ("XRP", "ripple"),
    ("ADA", "cardano"),
    ("SOL", "solana"),
    ("DOT", "polkadot"),
    ("DOGE", "dogecoin"),
    ("AVAX", "avalanche-2"),
    ("MATIC", "matic-network"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("LTC", "litecoin"),
    ("BCH", "bitcoin-cash"),
    ("XLM", "stellar"),
    ("VET", "vechain"),
    ("ETC", "ethereum-classic"),
    ("FIL", "filecoin"),
    ("TRX", "tron"),
];

/// Upstream selected for a currency pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CryptoToCrypto,
    CryptoToFiat,
    FiatToCrypto,
    FiatToFiat,
}

#[derive(Debug, Clone)]
pub struct AssetRegistry {
    tickers: HashSet<String>,
    ids: HashMap<String, String>,
}

impl Default for AssetRegistry {
    fn default() -> Self {
        AssetRegistry {
            tickers: CRYPTO_IDS.iter().map(|(t, _)| t.to_string()).collect(),
            ids: CRYPTO_IDS
                .iter()
                .map(|(t, id)| (t.to_string(), id.to_string()))
                .collect(),
        }
    }
}

impl AssetRegistry {
    /// Built-in table extended with the configured tickers and ids.
    pub fn from_config(config: &CryptoConfig) -> Self {
        let mut registry = Self::default();
        for ticker in &config.tickers {
            registry.tickers.insert(ticker.to_uppercase());
        }
        for (ticker, id) in &config.ids {
            let ticker = ticker.to_uppercase();
            registry.tickers.insert(ticker.clone());
            registry.ids.insert(ticker, id.clone());
        }
        registry
    }

    pub fn is_crypto(&self, ticker: &str) -> bool {
        self.tickers.contains(&ticker.to_uppercase())
    }

    /// CoinGecko id for `ticker`, or the lower-cased ticker when unmapped.
    pub fn provider_id(&self, ticker: &str) -> String {
        self.ids
            .get(&ticker.to_uppercase())
            .cloned()
            .unwrap_or_else(|| ticker.to_lowercase())
    }

    pub fn classify(&self, from: &str, to: &str) -> Route {
        match (self.is_crypto(from), self.is_crypto(to)) {
            (true, true) => Route::CryptoToCrypto,
            (true, false) => Route::CryptoToFiat,
            (false, true) => Route::FiatToCrypto,
            (false, false) => Route::FiatToFiat,
        }
    }
}
