pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::conversion::{self, Conversion, ConversionRequest};
use crate::core::{AssetRegistry, RateResolver};
use crate::providers::{
    coingecko::CoinGeckoProvider, exchange_rate::ExchangeRateApiProvider, util::build_client,
};
use anyhow::Result;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Raw command line input for a single conversion.
#[derive(Debug, Clone)]
pub struct ConvertArgs<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub amount: &'a str,
    pub output: &'a Path,
}

/// Converts and writes the result to `args.output`. Any failure along the
/// way is written to the output file as an `Error: ...` line instead; an
/// `Err` is only returned when that line cannot be written either.
pub async fn run(args: &ConvertArgs<'_>, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    if let Err(e) = convert(args, config_path).await {
        warn!(error = %e, "Conversion failed");
        conversion::write_error(args.output, &e)?;
    }
    Ok(())
}

async fn convert(args: &ConvertArgs<'_>, config_path: Option<&str>) -> Result<()> {
    let config = AppConfig::load(config_path)?;
    debug!("Loaded config: {config:#?}");

    let request = ConversionRequest::parse(args.from, args.to, args.amount)?;

    let client = build_client(Duration::from_secs(config.timeout_secs))?;
    let assets = AssetRegistry::from_config(&config.crypto);
    let crypto = CoinGeckoProvider::new(config.providers.coingecko_url(), client.clone());
    let fiat = ExchangeRateApiProvider::new(config.providers.exchange_rate_url(), client);
    let resolver = RateResolver::new(&assets, &crypto, &fiat);

    let conversion = resolver
        .resolve(&request.from, &request.to)
        .await?
        .map(|rate| Conversion::new(request, rate));

    conversion::write_output(args.output, conversion.as_ref())
}
