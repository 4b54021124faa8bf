//! Core conversion logic and abstractions

pub mod asset;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod log;
pub mod resolver;

// Re-export main types for cleaner imports
pub use asset::{AssetRegistry, Route};
pub use conversion::{Conversion, ConversionRequest};
pub use currency::{CryptoPriceProvider, FiatRateProvider, PriceTable, RateTable};
pub use resolver::RateResolver;
