//! Wire types for the bot backend and the public Binance endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::Candle;

/// Accepts `1.5`, `"1.5"` or null. Binance sends decimals as strings; the backend sends floats.
pub(crate) fn de_lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Null,
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(v) => Ok(v),
        Raw::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
        Raw::Null => Ok(0.0),
    }
}

fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(i64),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Num(v) => v.to_string(),
        Raw::Text(s) => s,
    })
}

// ---- Auth ----

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UserStatus {
    #[serde(alias = "active")]
    Active,
    #[default]
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "disabled")]
    Disabled,
    #[serde(alias = "inactive")]
    Inactive,
}

impl UserStatus {
    pub fn as_query(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Pending => "pending",
            UserStatus::Disabled => "disabled",
            UserStatus::Inactive => "inactive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserStatus::Active => "Active",
            UserStatus::Pending => "Pending",
            UserStatus::Disabled => "Disabled",
            UserStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub status: UserStatus,
}

// ---- Dashboard ----

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub total_profit: f64,
    pub win_rate: f64,
    pub active_trades: f64,
    pub avg_trade_duration: f64,
}

/// One closed trade on the profit/loss bar chart.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProfitBar {
    pub name: String,
    pub profit: f64,
    pub loss: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TradeHistoryRow {
    pub id: Option<i64>,
    pub pair: String,
    #[serde(rename = "type")]
    pub side: String,
    pub status: String,
    pub profit: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardData {
    pub stats: DashboardStats,
    pub chart_data: Vec<ProfitBar>,
    pub trade_history: Vec<TradeHistoryRow>,
}

// ---- Bot / strategies ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub strategy: String,
    pub risk_level: String,
    pub market: String,
    pub is_active: bool,
    pub amount: f64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            strategy: String::new(),
            risk_level: "medium".to_string(),
            market: "BTCUSDT".to_string(),
            is_active: false,
            amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Strategy {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub running: bool,
}

/// `GET /strategies` returns either a bare list or `{strategies: [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StrategiesResponse {
    List(Vec<Strategy>),
    Wrapped { strategies: Vec<Strategy> },
}

impl StrategiesResponse {
    pub fn into_vec(self) -> Vec<Strategy> {
        match self {
            StrategiesResponse::List(v) | StrategiesResponse::Wrapped { strategies: v } => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogType {
    Trade,
    Detail,
}

impl LogType {
    pub fn as_query(&self) -> &'static str {
        match self {
            LogType::Trade => "trade",
            LogType::Detail => "detail",
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub logs: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct StartStrategyRequest {
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct TestBuyRequest {
    pub symbol: String,
    pub amount: f64,
}

#[derive(Debug, Serialize)]
pub struct TestSellRequest {
    pub symbol: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderFill {
    #[serde(rename = "executedQty", default, deserialize_with = "de_lenient_f64")]
    pub executed_qty: f64,
    #[serde(default)]
    pub status: Option<String>,
}

/// Result of a test buy or sell. The backend nests the exchange order under `buy` or `sell`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OrderResponse {
    #[serde(default)]
    pub buy: Option<OrderFill>,
    #[serde(default)]
    pub sell: Option<OrderFill>,
}

impl OrderResponse {
    pub fn executed_qty(&self) -> Option<f64> {
        self.buy
            .as_ref()
            .or(self.sell.as_ref())
            .map(|fill| fill.executed_qty)
            .filter(|qty| *qty > 0.0)
    }
}

// ---- Assets / settings ----

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Balance {
    pub asset: String,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub free: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub locked: f64,
}

impl Balance {
    pub fn total(&self) -> f64 {
        self.free + self.locked
    }

    pub fn is_non_zero(&self) -> bool {
        self.free > 0.0 || self.locked > 0.0
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BalancesResponse {
    #[serde(default)]
    pub balances: Vec<Balance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub binance_api_key: String,
    pub binance_api_secret: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PortfolioValue {
    #[serde(default, deserialize_with = "de_lenient_f64")]
    pub total_usdt: f64,
}

// ---- Market data ----

/// 24h statistics shown above the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickerStats {
    pub price: f64,
    pub change_pct: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

/// Candles plus ticker for one pair/interval.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSnapshot {
    pub candles: Vec<Candle>,
    pub ticker: TickerStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendKline {
    pub time: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// `GET /klines`. A failed upstream call comes back as `{"error": "..."}` with status 200.
#[derive(Debug, Deserialize)]
pub struct BackendMarket {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub change: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub klines: Vec<BackendKline>,
}

impl From<BackendMarket> for MarketSnapshot {
    fn from(m: BackendMarket) -> Self {
        MarketSnapshot {
            candles: m
                .klines
                .into_iter()
                .map(|k| Candle::new(k.time, k.open, k.high, k.low, k.close, k.volume))
                .collect(),
            ticker: TickerStats {
                price: m.price,
                change_pct: m.change,
                high: m.high,
                low: m.low,
                volume: m.volume,
            },
        }
    }
}

/// Binance `/api/v3/ticker/24hr`, decimals as strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinanceTicker {
    #[serde(deserialize_with = "de_lenient_f64")]
    pub last_price: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub price_change_percent: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub high_price: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub low_price: f64,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub volume: f64,
}

impl From<BinanceTicker> for TickerStats {
    fn from(t: BinanceTicker) -> Self {
        TickerStats {
            price: t.last_price,
            change_pct: t.price_change_percent,
            high: t.high_price,
            low: t.low_price,
            volume: t.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_tolerates_missing_sections() {
        let data: DashboardData =
            serde_json::from_str(r#"{"stats":{"total_profit":12.5,"win_rate":50.0}}"#).unwrap();
        assert_eq!(data.stats.total_profit, 12.5);
        assert!(data.trade_history.is_empty());
    }

    #[test]
    fn trade_history_reads_type_field() {
        let row: TradeHistoryRow = serde_json::from_str(
            r#"{"id":3,"pair":"BTCUSDT","type":"SELL","status":"Closed","profit":-1.5}"#,
        )
        .unwrap();
        assert_eq!(row.side, "SELL");
        assert_eq!(row.profit, -1.5);
    }

    #[test]
    fn balances_accept_string_decimals() {
        let b: Balance =
            serde_json::from_str(r#"{"asset":"BTC","free":"0.00100000","locked":"0.0"}"#).unwrap();
        assert_eq!(b.free, 0.001);
        assert!(b.is_non_zero());
    }

    #[test]
    fn strategy_ids_may_be_numbers() {
        let list: StrategiesResponse =
            serde_json::from_str(r#"[{"id":7,"name":"Grid","running":true}]"#).unwrap();
        let list = list.into_vec();
        assert_eq!(list[0].id, "7");

        let wrapped: StrategiesResponse =
            serde_json::from_str(r#"{"strategies":[{"id":"rsi","name":"RSI"}]}"#).unwrap();
        assert!(!wrapped.into_vec()[0].running);
    }

    #[test]
    fn user_status_accepts_both_cases() {
        let u: User = serde_json::from_str(r#"{"id":1,"username":"a","status":"active"}"#).unwrap();
        assert_eq!(u.status, UserStatus::Active);
        let u: User = serde_json::from_str(r#"{"id":2,"username":"b","status":"Pending"}"#).unwrap();
        assert_eq!(u.status, UserStatus::Pending);
    }

    #[test]
    fn buy_response_exposes_executed_qty() {
        let r: OrderResponse =
            serde_json::from_str(r#"{"buy":{"executedQty":"0.25000000","status":"FILLED"}}"#)
                .unwrap();
        assert_eq!(r.executed_qty(), Some(0.25));
        assert_eq!(OrderResponse::default().executed_qty(), None);
    }

    #[test]
    fn backend_market_maps_to_snapshot() {
        let m: BackendMarket = serde_json::from_str(
            r#"{"price":101.0,"change":-2.5,"high":110,"low":90,"volume":1000,
                "klines":[{"time":1700000000000,"open":100,"high":102,"low":99,"close":101,"volume":5}]}"#,
        )
        .unwrap();
        let snap = MarketSnapshot::from(m);
        assert_eq!(snap.ticker.change_pct, -2.5);
        assert_eq!(snap.candles.len(), 1);
        assert_eq!(snap.candles[0].close_price, 101.0);
    }
}
