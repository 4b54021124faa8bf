pub mod coingecko;
pub mod exchange_rate;
pub mod util;
