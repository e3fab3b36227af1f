//! The finance tools exposed to the model.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use finagent_ai::{
    error_envelope, ParamKind, ParamSpec, RegistryError, ToolArgs, ToolError, ToolHandler,
    ToolRegistry, ToolSpec,
};
use tracing::debug;

use crate::indicators::Indicator;
use crate::source::{normalize_ticker, MarketDataSource, MarketError, PriceBar};

pub const COMPANY_INFO: &str = "get_company_info";
pub const HISTORICAL_PRICE: &str = "get_historical_price";
pub const TECHNICAL_INDICATOR: &str = "calculate_technical_indicator";

const DATE_FORMAT: &str = "%Y-%m-%d";

fn ticker_param() -> ParamSpec {
    ParamSpec::required(
        "ticker",
        ParamKind::String,
        "Stock ticker symbol, e.g. 'FPT', 'VCB', 'HPG'",
    )
}

fn start_date_param() -> ParamSpec {
    ParamSpec::required("start_date", ParamKind::String, "Start date (format 'YYYY-MM-DD')")
}

fn end_date_param() -> ParamSpec {
    ParamSpec::required("end_date", ParamKind::String, "End date (format 'YYYY-MM-DD')")
}

pub fn company_info_spec() -> ToolSpec {
    ToolSpec::new(
        COMPANY_INFO,
        "Get an overview of a listed company: name, industry, exchange and key facts.",
    )
    .param(ticker_param())
}

pub fn historical_price_spec() -> ToolSpec {
    ToolSpec::new(
        HISTORICAL_PRICE,
        "Get daily historical prices (open, high, low, close, volume) of a stock over a date range.",
    )
    .param(ticker_param())
    .param(start_date_param())
    .param(end_date_param())
}

pub fn technical_indicator_spec() -> ToolSpec {
    ToolSpec::new(
        TECHNICAL_INDICATOR,
        "Calculate a technical indicator (SMA or RSI) for a stock from its closing prices over a date range.",
    )
    .param(ticker_param())
    .param(ParamSpec::required(
        "indicator_name",
        ParamKind::String,
        "Indicator name: 'SMA' or 'RSI'",
    ))
    .param(ParamSpec::required(
        "window_size",
        ParamKind::Integer,
        "Period length in trading days, e.g. 14, 20, 50",
    ))
    .param(start_date_param())
    .param(end_date_param())
}

/// Register every market tool on `registry`.
pub fn register_market_tools(
    registry: &mut ToolRegistry,
    source: Arc<dyn MarketDataSource>,
) -> Result<(), RegistryError> {
    registry.register(
        company_info_spec(),
        Arc::new(CompanyInfo {
            source: Arc::clone(&source),
        }),
    )?;
    registry.register(
        historical_price_spec(),
        Arc::new(HistoricalPrice {
            source: Arc::clone(&source),
        }),
    )?;
    registry.register(technical_indicator_spec(), Arc::new(TechnicalIndicator { source }))?;
    Ok(())
}

fn parse_date(args: &ToolArgs, name: &str) -> Result<NaiveDate, String> {
    let raw = args.str(name).map_err(|e| e.to_string())?;
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| format!("invalid {name} '{raw}', expected YYYY-MM-DD"))
}

fn date_range(args: &ToolArgs) -> Result<(NaiveDate, NaiveDate), String> {
    let start = parse_date(args, "start_date")?;
    let end = parse_date(args, "end_date")?;
    if start > end {
        return Err(format!("start_date {start} is after end_date {end}"));
    }
    Ok((start, end))
}

/// Split source failures: a bad ticker is the model's mistake and goes back
/// as an envelope; IO and parse errors fail the invocation.
fn source_error(err: MarketError) -> Result<String, ToolError> {
    match err {
        MarketError::InvalidTicker(_) => Ok(error_envelope(&err.to_string())),
        other => Err(ToolError::Execution(other.to_string())),
    }
}

/// Fetch bars for the validated range, or the envelope to return instead.
async fn load_bars(
    source: &dyn MarketDataSource,
    args: &ToolArgs,
) -> Result<Result<(String, Vec<PriceBar>), String>, ToolError> {
    let ticker = match normalize_ticker(args.str("ticker")?) {
        Ok(t) => t,
        Err(e) => return source_error(e).map(Err),
    };
    let (start, end) = match date_range(args) {
        Ok(range) => range,
        Err(msg) => return Ok(Err(error_envelope(&msg))),
    };
    let bars = match source.price_history(&ticker, start, end).await {
        Ok(bars) => bars,
        Err(e) => return source_error(e).map(Err),
    };
    debug!(%ticker, %start, %end, rows = bars.len(), "loaded price history");
    if bars.is_empty() {
        return Ok(Err(error_envelope(&format!(
            "no price data for {ticker} between {start} and {end}"
        ))));
    }
    Ok(Ok((ticker, bars)))
}

struct CompanyInfo {
    source: Arc<dyn MarketDataSource>,
}

#[async_trait]
impl ToolHandler for CompanyInfo {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        let ticker = match normalize_ticker(args.str("ticker")?) {
            Ok(t) => t,
            Err(e) => return source_error(e),
        };
        match self.source.company_overview(&ticker).await {
            Ok(Some(overview)) => Ok(overview.to_string()),
            Ok(None) => Ok(error_envelope(&format!(
                "no company information found for {ticker}"
            ))),
            Err(e) => source_error(e),
        }
    }
}

struct HistoricalPrice {
    source: Arc<dyn MarketDataSource>,
}

#[async_trait]
impl ToolHandler for HistoricalPrice {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        match load_bars(self.source.as_ref(), &args).await? {
            Ok((_, bars)) => serde_json::to_string(&bars)
                .map_err(|e| ToolError::Execution(format!("failed to encode prices: {e}"))),
            Err(envelope) => Ok(envelope),
        }
    }
}

struct TechnicalIndicator {
    source: Arc<dyn MarketDataSource>,
}

#[async_trait]
impl ToolHandler for TechnicalIndicator {
    async fn call(&self, args: ToolArgs) -> Result<String, ToolError> {
        let indicator: Indicator = match args.str("indicator_name")?.parse() {
            Ok(i) => i,
            Err(msg) => return Ok(error_envelope(&msg)),
        };
        let window = args.integer("window_size")?;
        if window <= 0 {
            return Ok(error_envelope(&format!(
                "window_size must be a positive number of days, got {window}"
            )));
        }
        let window = usize::try_from(window).unwrap_or(usize::MAX);

        let (ticker, bars) = match load_bars(self.source.as_ref(), &args).await? {
            Ok(loaded) => loaded,
            Err(envelope) => return Ok(envelope),
        };
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        Ok(match indicator.compute(&closes, window) {
            Some(value) => format!("The {window}-day {indicator} of {ticker} is {value:.2}"),
            None => format!(
                "Not enough data to calculate the {window}-day {indicator} for {ticker} ({} closing prices in range)",
                closes.len()
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::{json, Value};

    use super::*;
    use crate::market_registry;

    #[derive(Default)]
    struct MemorySource {
        overviews: HashMap<String, Value>,
        prices: HashMap<String, Vec<PriceBar>>,
        broken: bool,
    }

    #[async_trait]
    impl MarketDataSource for MemorySource {
        async fn company_overview(&self, ticker: &str) -> Result<Option<Value>, MarketError> {
            if self.broken {
                return Err(MarketError::Io("disk on fire".into()));
            }
            Ok(self.overviews.get(ticker).cloned())
        }

        async fn price_history(
            &self,
            ticker: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<PriceBar>, MarketError> {
            if self.broken {
                return Err(MarketError::Io("disk on fire".into()));
            }
            Ok(self
                .prices
                .get(ticker)
                .map(|bars| {
                    bars.iter()
                        .filter(|b| b.time >= start && b.time <= end)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn bar(day: u32, close: f64) -> PriceBar {
        PriceBar {
            time: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1_000,
        }
    }

    fn registry() -> ToolRegistry {
        let mut source = MemorySource::default();
        source.overviews.insert(
            "FPT".into(),
            json!({"symbol": "FPT", "company_name": "FPT Corporation"}),
        );
        source.prices.insert(
            "HPG".into(),
            vec![bar(1, 10.0), bar(2, 12.0), bar(3, 11.0), bar(4, 12.0), bar(7, 10.0)],
        );
        market_registry(Arc::new(source)).unwrap()
    }

    async fn call(registry: &ToolRegistry, name: &str, args: Value) -> Result<String, ToolError> {
        registry.resolve(name).unwrap().invoke(&args).await
    }

    fn error_of(result: &str) -> String {
        let value: Value = serde_json::from_str(result).unwrap();
        value["error"].as_str().unwrap().to_string()
    }

    #[test]
    fn registers_three_tools_in_order() {
        let registry = registry();
        assert_eq!(
            registry.names(),
            vec![COMPANY_INFO, HISTORICAL_PRICE, TECHNICAL_INDICATOR]
        );
        let decls = registry.declarations();
        let indicator = &decls[2];
        let params: Vec<&String> = indicator.parameters["properties"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(
            params,
            vec!["ticker", "indicator_name", "window_size", "start_date", "end_date"]
        );
        assert_eq!(
            indicator.parameters["properties"]["window_size"]["type"],
            "integer"
        );
    }

    #[tokio::test]
    async fn company_info_upper_cases_ticker() {
        let registry = registry();
        let out = call(&registry, COMPANY_INFO, json!({"ticker": "fpt"})).await.unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["company_name"], "FPT Corporation");
    }

    #[tokio::test]
    async fn unknown_company_is_envelope() {
        let registry = registry();
        let out = call(&registry, COMPANY_INFO, json!({"ticker": "VCB"})).await.unwrap();
        assert_eq!(error_of(&out), "no company information found for VCB");
    }

    #[tokio::test]
    async fn bad_ticker_is_envelope() {
        let registry = registry();
        let out = call(&registry, COMPANY_INFO, json!({"ticker": "../x"})).await.unwrap();
        assert!(error_of(&out).contains("invalid ticker"));
    }

    #[tokio::test]
    async fn historical_prices_as_records() {
        let registry = registry();
        let out = call(
            &registry,
            HISTORICAL_PRICE,
            json!({"ticker": "HPG", "start_date": "2024-10-02", "end_date": "2024-10-03"}),
        )
        .await
        .unwrap();
        let rows: Vec<Value> = serde_json::from_str(&out).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["time"], "2024-10-02");
        assert_eq!(rows[1]["close"], 11.0);
    }

    #[tokio::test]
    async fn empty_range_is_envelope() {
        let registry = registry();
        let out = call(
            &registry,
            HISTORICAL_PRICE,
            json!({"ticker": "HPG", "start_date": "2023-01-01", "end_date": "2023-02-01"}),
        )
        .await
        .unwrap();
        assert_eq!(
            error_of(&out),
            "no price data for HPG between 2023-01-01 and 2023-02-01"
        );
    }

    #[tokio::test]
    async fn bad_dates_are_envelopes() {
        let registry = registry();
        let out = call(
            &registry,
            HISTORICAL_PRICE,
            json!({"ticker": "HPG", "start_date": "01/10/2024", "end_date": "2024-10-31"}),
        )
        .await
        .unwrap();
        assert!(error_of(&out).contains("invalid start_date"));

        let out = call(
            &registry,
            HISTORICAL_PRICE,
            json!({"ticker": "HPG", "start_date": "2024-10-31", "end_date": "2024-10-01"}),
        )
        .await
        .unwrap();
        assert!(error_of(&out).contains("is after end_date"));
    }

    #[tokio::test]
    async fn rsi_and_sma_text() {
        let registry = registry();
        let args = |name: &str, window: i64| {
            json!({
                "ticker": "hpg",
                "indicator_name": name,
                "window_size": window,
                "start_date": "2024-10-01",
                "end_date": "2024-10-31",
            })
        };

        let out = call(&registry, TECHNICAL_INDICATOR, args("rsi", 4)).await.unwrap();
        assert_eq!(out, "The 4-day RSI of HPG is 50.00");

        let out = call(&registry, TECHNICAL_INDICATOR, args("SMA", 2)).await.unwrap();
        assert_eq!(out, "The 2-day SMA of HPG is 11.00");

        let out = call(&registry, TECHNICAL_INDICATOR, args("RSI", 14)).await.unwrap();
        assert!(out.starts_with("Not enough data to calculate the 14-day RSI for HPG"));
    }

    #[tokio::test]
    async fn unsupported_indicator_is_envelope() {
        let registry = registry();
        let out = call(
            &registry,
            TECHNICAL_INDICATOR,
            json!({
                "ticker": "HPG",
                "indicator_name": "MACD",
                "window_size": 14,
                "start_date": "2024-10-01",
                "end_date": "2024-10-31",
            }),
        )
        .await
        .unwrap();
        assert!(error_of(&out).contains("only 'SMA' and 'RSI' are supported"));
    }

    #[tokio::test]
    async fn non_positive_window_is_envelope() {
        let registry = registry();
        let out = call(
            &registry,
            TECHNICAL_INDICATOR,
            json!({
                "ticker": "HPG",
                "indicator_name": "SMA",
                "window_size": 0,
                "start_date": "2024-10-01",
                "end_date": "2024-10-31",
            }),
        )
        .await
        .unwrap();
        assert!(error_of(&out).contains("window_size must be a positive"));
    }

    #[tokio::test]
    async fn missing_argument_fails_validation() {
        let registry = registry();
        let err = call(&registry, HISTORICAL_PRICE, json!({"ticker": "HPG"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[tokio::test]
    async fn source_failure_is_execution_error() {
        let source = MemorySource {
            broken: true,
            ..Default::default()
        };
        let registry = market_registry(Arc::new(source)).unwrap();
        let err = call(&registry, COMPANY_INFO, json!({"ticker": "FPT"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Execution(ref m) if m.contains("disk on fire")));
    }
}
