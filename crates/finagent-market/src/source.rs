//! Market data source abstraction.

use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error("invalid ticker '{0}'")]
    InvalidTicker(String),
    #[error("failed to read market data: {0}")]
    Io(String),
    #[error("malformed market data: {0}")]
    Parse(String),
}

/// One daily OHLCV row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub time: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Where company and price data come from.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Company overview, or `None` if the ticker is unknown.
    async fn company_overview(
        &self,
        ticker: &str,
    ) -> Result<Option<serde_json::Value>, MarketError>;

    /// Daily bars with `start <= time <= end`, oldest first. Empty when the
    /// ticker or range has no data.
    async fn price_history(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, MarketError>;
}

static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{1,10}$").expect("static ticker pattern must compile"));

/// Upper-case and check a ticker symbol (1-10 ASCII letters or digits).
pub fn normalize_ticker(raw: &str) -> Result<String, MarketError> {
    let ticker = raw.trim().to_ascii_uppercase();
    if TICKER_RE.is_match(&ticker) {
        Ok(ticker)
    } else {
        Err(MarketError::InvalidTicker(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickers_are_upper_cased() {
        assert_eq!(normalize_ticker("fpt").unwrap(), "FPT");
        assert_eq!(normalize_ticker(" vcb ").unwrap(), "VCB");
        assert_eq!(normalize_ticker("E1VFVN30").unwrap(), "E1VFVN30");
    }

    #[test]
    fn path_like_tickers_are_rejected() {
        assert!(normalize_ticker("../etc").is_err());
        assert!(normalize_ticker("").is_err());
        assert!(normalize_ticker("INVALID_TICKER").is_err());
        assert!(normalize_ticker("ABCDEFGHIJK").is_err());
    }

    #[test]
    fn price_bar_reads_iso_dates() {
        let bar: PriceBar = serde_json::from_str(
            r#"{"time":"2024-10-01","open":24.1,"high":24.6,"low":23.9,"close":24.5,"volume":1200300}"#,
        )
        .unwrap();
        assert_eq!(bar.time, NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        assert_eq!(bar.close, 24.5);
    }
}
