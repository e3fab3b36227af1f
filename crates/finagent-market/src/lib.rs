//! Market data tools for Finagent.
//!
//! Registers the three finance tools the model can call:
//! `get_company_info`, `get_historical_price` and
//! `calculate_technical_indicator`. Data comes from a pluggable
//! [`MarketDataSource`]; expected failures (unknown ticker, empty range,
//! unsupported indicator) are returned as `{"error": ...}` text so the
//! model can explain them.

pub mod file_source;
pub mod indicators;
pub mod source;
pub mod tools;

pub use file_source::FileDataSource;
pub use indicators::Indicator;
pub use source::{normalize_ticker, MarketDataSource, MarketError, PriceBar};
pub use tools::register_market_tools;

use std::sync::Arc;

use finagent_ai::{RegistryError, ToolRegistry};

/// Build a registry holding every market tool backed by `source`.
pub fn market_registry(source: Arc<dyn MarketDataSource>) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    register_market_tools(&mut registry, source)?;
    Ok(registry)
}
