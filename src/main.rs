use anyhow::Result;
use clap::Parser;
use fxconv::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Currency to convert from, e.g. BTC or USD
    from_currency: String,

    /// Currency to convert to, e.g. ETH or EUR
    to_currency: String,

    /// Amount of the source currency
    #[arg(allow_negative_numbers = true)]
    amount: String,

    /// File the result (or error) is written to
    output_file: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let args = fxconv::ConvertArgs {
        from: &cli.from_currency,
        to: &cli.to_currency,
        amount: &cli.amount,
        output: &cli.output_file,
    };
    let result = fxconv::run(&args, cli.config_path.as_deref()).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
