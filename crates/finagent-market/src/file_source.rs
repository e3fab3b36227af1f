//! Market data read from a local directory tree.
//!
//! Layout, one directory per ticker:
//!
//! ```text
//! <root>/FPT/overview.json   company overview (any JSON value)
//! <root>/FPT/prices.json     [{"time": "2024-10-01", "open": .., "high": ..,
//!                              "low": .., "close": .., "volume": ..}, ...]
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::debug;

use crate::source::{normalize_ticker, MarketDataSource, MarketError, PriceBar};

const OVERVIEW_FILE: &str = "overview.json";
const PRICES_FILE: &str = "prices.json";

pub struct FileDataSource {
    root: PathBuf,
}

impl FileDataSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn file_for(&self, ticker: &str, name: &str) -> Result<PathBuf, MarketError> {
        let ticker = normalize_ticker(ticker)?;
        Ok(self.root.join(ticker).join(name))
    }
}

/// Read a file, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<String>, MarketError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "market data file not found");
            Ok(None)
        }
        Err(e) => Err(MarketError::Io(format!("{}: {e}", path.display()))),
    }
}

#[async_trait]
impl MarketDataSource for FileDataSource {
    async fn company_overview(
        &self,
        ticker: &str,
    ) -> Result<Option<serde_json::Value>, MarketError> {
        let path = self.file_for(ticker, OVERVIEW_FILE)?;
        let Some(content) = read_optional(&path).await? else {
            return Ok(None);
        };
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| MarketError::Parse(format!("{}: {e}", path.display())))?;
        Ok(Some(value))
    }

    async fn price_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketError> {
        let path = self.file_for(ticker, PRICES_FILE)?;
        let Some(content) = read_optional(&path).await? else {
            return Ok(Vec::new());
        };
        let mut bars: Vec<PriceBar> = serde_json::from_str(&content)
            .map_err(|e| MarketError::Parse(format!("{}: {e}", path.display())))?;

        bars.retain(|bar| bar.time >= start && bar.time <= end);
        bars.sort_by_key(|bar| bar.time);
        Ok(bars)
    }
}
