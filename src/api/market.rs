//! Candle and ticker sources for the chart pages.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::chart::DataSource;
use crate::domain::{Candle, Interval, Pair};

use super::client::{ApiClient, read_json};
use super::error::{ApiError, ApiResult};
use super::models::{BackendMarket, BinanceTicker, MarketSnapshot, TickerStats};

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketFeed {
    // Candles plus 24h ticker, or an ApiError
    async fn snapshot(&self, pair: &Pair, interval: Interval, limit: u32)
    -> ApiResult<MarketSnapshot>;

    /// A unique identifier for this implementation (for logs).
    fn signature(&self) -> &'static str;
}

/// Backend `/klines`, which proxies and caches Binance.
pub struct BackendFeed {
    pub client: ApiClient,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketFeed for BackendFeed {
    fn signature(&self) -> &'static str {
        "Backend /klines"
    }

    async fn snapshot(
        &self,
        pair: &Pair,
        interval: Interval,
        limit: u32,
    ) -> ApiResult<MarketSnapshot> {
        let limit = limit.to_string();
        let resp = self
            .client
            .request(Method::GET, self.client.url("/klines"))
            .query(&[
                ("pair", pair.symbol.as_str()),
                ("interval", interval.api_code()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let market: BackendMarket = read_json(resp).await?;
        if let Some(error) = market.error {
            return Err(ApiError::Upstream(error));
        }
        Ok(market.into())
    }
}

/// Public Binance REST, no credentials.
pub struct BinanceFeed {
    pub client: ApiClient,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl MarketFeed for BinanceFeed {
    fn signature(&self) -> &'static str {
        "Binance REST"
    }

    async fn snapshot(
        &self,
        pair: &Pair,
        interval: Interval,
        limit: u32,
    ) -> ApiResult<MarketSnapshot> {
        let base = self.client.binance_base_url();
        let limit = limit.to_string();

        let resp = self
            .client
            .request(Method::GET, format!("{}/api/v3/klines", base))
            .query(&[
                ("symbol", pair.symbol.as_str()),
                ("interval", interval.api_code()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;
        let rows: Vec<Value> = read_json(resp).await?;

        let resp = self
            .client
            .request(Method::GET, format!("{}/api/v3/ticker/24hr", base))
            .query(&[("symbol", pair.symbol.as_str())])
            .send()
            .await?;
        let ticker: BinanceTicker = read_json(resp).await?;

        Ok(MarketSnapshot {
            candles: parse_binance_klines(&rows),
            ticker: TickerStats::from(ticker),
        })
    }
}

/// Dispatch on the chart's data source.
pub async fn fetch_market(
    client: ApiClient,
    source: DataSource,
    pair: Pair,
    interval: Interval,
    limit: u32,
) -> ApiResult<MarketSnapshot> {
    match source {
        DataSource::Backend => snapshot_from(&BackendFeed { client }, &pair, interval, limit).await,
        DataSource::Binance => snapshot_from(&BinanceFeed { client }, &pair, interval, limit).await,
    }
}

async fn snapshot_from<F: MarketFeed>(
    feed: &F,
    pair: &Pair,
    interval: Interval,
    limit: u32,
) -> ApiResult<MarketSnapshot> {
    let result = feed.snapshot(pair, interval, limit).await;
    if let Err(e) = &result {
        log::warn!("{}", failure_line(feed, pair, interval, e));
    }
    result
}

fn failure_line<F: MarketFeed>(
    feed: &F,
    pair: &Pair,
    interval: Interval,
    err: &ApiError,
) -> String {
    format!(
        "Market fetch for {} {} via {} failed: {}",
        pair,
        interval.label(),
        feed.signature(),
        err
    )
}

fn value_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn parse_row(row: &Value) -> Option<Candle> {
    let fields = row.as_array()?;
    let field = |i: usize| fields.get(i).and_then(value_f64);
    Some(Candle::new(
        field(0)?,
        field(1)?,
        field(2)?,
        field(3)?,
        field(4)?,
        field(5)?,
    ))
}

/// Binance kline rows: `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
/// Rows that do not parse are skipped.
pub fn parse_binance_klines(rows: &[Value]) -> Vec<Candle> {
    let candles: Vec<Candle> = rows.iter().filter_map(parse_row).collect();
    if candles.len() < rows.len() {
        log::warn!(
            "Skipped {} unparseable kline rows",
            rows.len() - candles.len()
        );
    }
    candles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_string_price_rows() {
        let rows: Vec<Value> = serde_json::from_str(
            r#"[[1700000000000,"100.5","102.0","99.0","101.25","12.5",1700003599999,"0",10,"0","0","0"]]"#,
        )
        .unwrap();
        let candles = parse_binance_klines(&rows);
        assert_eq!(
            candles,
            vec![Candle::new(1.7e12, 100.5, 102.0, 99.0, 101.25, 12.5)]
        );
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let rows: Vec<Value> = serde_json::from_str(
            r#"[[1,"1","2","0.5","1.5","3"],["bad"],{"open":1},[2,"x","2","1","1","1"]]"#,
        )
        .unwrap();
        let candles = parse_binance_klines(&rows);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].time, 1.0);
    }

    #[test]
    fn failures_name_the_feed() {
        let err = ApiError::Transport("connection refused".to_string());
        let pair = Pair::new("BTCUSDT");

        let binance = BinanceFeed {
            client: ApiClient::default(),
        };
        let line = failure_line(&binance, &pair, Interval::H1, &err);
        assert!(line.contains("BTCUSDT 1H"));
        assert!(line.contains("via Binance REST"));

        let backend = BackendFeed {
            client: ApiClient::default(),
        };
        assert!(failure_line(&backend, &pair, Interval::H1, &err).contains("via Backend /klines"));
    }

    #[test]
    fn empty_payload_yields_no_candles() {
        assert!(parse_binance_klines(&[]).is_empty());
    }
}
