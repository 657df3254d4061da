//! Per-page state. Rebuilt whenever its page is mounted.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::logs::TradeSide;
use crate::api::models::{
    ApiSettings, Balance, BotConfig, DashboardData, LogType, Strategy, TickerStats, User,
    UserStatus,
};
use crate::chart::{ChartStyle, ChartVariant, ChartViewState};
use crate::domain::{Interval, Pair};

/// Persisted chart choices shared by all chart pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrefs {
    pub pair: Pair,
    pub interval: Interval,
    pub style: ChartStyle,
}

impl Default for MarketPrefs {
    fn default() -> Self {
        Self {
            pair: Pair::new("BTCUSDT"),
            interval: Interval::default(),
            style: ChartStyle::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    pub password: String,
    pub busy: bool,
    pub error: Option<String>,
}

impl AuthForm {
    /// Trimmed username and password, if both are present.
    pub fn credentials(&self) -> Option<(String, String)> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            return None;
        }
        Some((username.to_string(), self.password.clone()))
    }
}

#[derive(Debug, Default)]
pub struct DashboardState {
    pub data: DashboardData,
    pub bot: BotConfig,
    pub bot_loaded: bool,
    pub bot_saving: bool,
}

#[derive(Debug, Default)]
pub struct UsersState {
    pub users: Vec<User>,
    pub search: String,
    pub loaded: bool,
}

impl UsersState {
    /// `(pending, managed)` after applying the search filter.
    pub fn split(&self) -> (Vec<&User>, Vec<&User>) {
        let needle = self.search.trim().to_lowercase();
        self.users
            .iter()
            .filter(|u| needle.is_empty() || u.username.to_lowercase().contains(&needle))
            .partition(|u| u.status == UserStatus::Pending)
    }

    pub fn apply_status(&mut self, user_id: i64, status: UserStatus) {
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.status = status;
        }
    }
}

/// The buy-then-sell test form on the strategies page.
#[derive(Debug)]
pub struct StrategyTestForm {
    pub symbol: String,
    pub amount: String,
    pub side: TradeSide,
    pub busy: bool,
}

impl Default for StrategyTestForm {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            amount: String::new(),
            side: TradeSide::Buy,
            busy: false,
        }
    }
}

impl StrategyTestForm {
    /// Validated `(symbol, amount)`. Buys spend quote currency, sells spend base quantity.
    pub fn order(&self) -> Option<(String, f64)> {
        let symbol = Pair::new(&self.symbol).symbol;
        let amount = parse_positive(&self.amount)?;
        if symbol.is_empty() {
            return None;
        }
        Some((symbol, amount))
    }

    /// After a buy the form flips to sell the filled quantity; after a sell it resets.
    pub fn on_filled(&mut self, side: TradeSide, executed_qty: Option<f64>) {
        self.busy = false;
        match side {
            TradeSide::Buy => {
                if let Some(qty) = executed_qty {
                    self.amount = qty.to_string();
                }
                self.side = TradeSide::Sell;
            }
            TradeSide::Sell => {
                self.amount.clear();
                self.side = TradeSide::Buy;
            }
        }
    }

    pub fn amount_hint(&self) -> String {
        let pair = Pair::new(&self.symbol);
        match self.side {
            TradeSide::Buy => "Amount in USDT".to_string(),
            TradeSide::Sell => format!("Amount in {}", pair.base()),
        }
    }
}

#[derive(Debug, Default)]
pub struct StrategiesState {
    pub strategies: Vec<Strategy>,
    /// Start amount typed per strategy id
    pub amounts: HashMap<String, String>,
    pub test: StrategyTestForm,
    pub loaded: bool,
}

impl StrategiesState {
    pub fn set_running(&mut self, id: &str, running: bool) {
        if let Some(s) = self.strategies.iter_mut().find(|s| s.id == id) {
            s.running = running;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug)]
pub struct LogsState {
    pub strategy: Option<StrategyRef>,
    pub trade: Vec<String>,
    pub detail: Vec<String>,
    pub tab: LogType,
}

impl Default for LogsState {
    fn default() -> Self {
        Self {
            strategy: None,
            trade: Vec::new(),
            detail: Vec::new(),
            tab: LogType::Trade,
        }
    }
}

impl LogsState {
    pub fn for_strategy(strategy: StrategyRef) -> Self {
        Self {
            strategy: Some(strategy),
            ..Default::default()
        }
    }

    pub fn set(&mut self, log_type: LogType, lines: Vec<String>) {
        match log_type {
            LogType::Trade => self.trade = lines,
            LogType::Detail => self.detail = lines,
        }
    }
}

#[derive(Debug, Default)]
pub struct AssetsState {
    pub balances: Vec<Balance>,
    pub loaded: bool,
}

/// Manual trade ticket beside the chart. `amount` is in base currency.
#[derive(Debug)]
pub struct TicketState {
    pub side: TradeSide,
    pub amount: String,
    pub leverage: u32,
    pub busy: bool,
}

impl Default for TicketState {
    fn default() -> Self {
        Self {
            side: TradeSide::Buy,
            amount: String::new(),
            leverage: 1,
            busy: false,
        }
    }
}

impl TicketState {
    pub fn amount_value(&self) -> Option<f64> {
        parse_positive(&self.amount)
    }

    /// `(total, cost)` in quote currency; cost is total over leverage.
    pub fn totals(&self, price: Option<f64>) -> (f64, f64) {
        match (price, self.amount_value()) {
            (Some(p), Some(a)) if p.is_finite() && p > 0.0 => {
                let total = p * a;
                (total, total / self.leverage.max(1) as f64)
            }
            _ => (0.0, 0.0),
        }
    }
}

/// A chart page: variant, view state and the latest ticker.
#[derive(Debug)]
pub struct ChartPageState {
    pub variant: ChartVariant,
    pub view: ChartViewState,
    pub ticker: Option<TickerStats>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ChartPageState {
    pub fn new(variant: ChartVariant, style: ChartStyle) -> Self {
        Self {
            variant,
            view: ChartViewState::new(style),
            ticker: None,
            loading: true,
            error: None,
        }
    }

    /// Ticker price, else the last close.
    pub fn price(&self) -> Option<f64> {
        self.ticker
            .map(|t| t.price)
            .filter(|p| *p > 0.0)
            .or_else(|| self.view.last_price())
    }
}

#[derive(Debug, Default)]
pub struct SettingsModal {
    pub open: bool,
    pub settings: ApiSettings,
    pub saving: bool,
}

pub fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i64, name: &str, status: UserStatus) -> User {
        User {
            id,
            username: name.to_string(),
            status,
        }
    }

    #[test]
    fn users_split_by_status_and_filter() {
        let mut state = UsersState {
            users: vec![
                user(1, "alice", UserStatus::Pending),
                user(2, "bob", UserStatus::Active),
                user(3, "Alicia", UserStatus::Disabled),
            ],
            ..Default::default()
        };
        let (pending, managed) = state.split();
        assert_eq!(pending.len(), 1);
        assert_eq!(managed.len(), 2);

        state.search = "ALI".to_string();
        let (pending, managed) = state.split();
        assert_eq!(pending[0].id, 1);
        assert_eq!(managed.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3]);

        state.apply_status(1, UserStatus::Active);
        assert_eq!(state.users[0].status, UserStatus::Active);
    }

    #[test]
    fn test_form_flips_to_sell_with_filled_qty() {
        let mut form = StrategyTestForm {
            symbol: "xrpusdt".to_string(),
            amount: "25".to_string(),
            ..Default::default()
        };
        assert_eq!(form.order(), Some(("XRPUSDT".to_string(), 25.0)));

        form.on_filled(TradeSide::Buy, Some(41.5));
        assert_eq!(form.side, TradeSide::Sell);
        assert_eq!(form.amount, "41.5");
        assert_eq!(form.amount_hint(), "Amount in XRP");

        form.on_filled(TradeSide::Sell, None);
        assert_eq!(form.side, TradeSide::Buy);
        assert!(form.amount.is_empty());
    }

    #[test]
    fn buy_without_fill_keeps_amount() {
        let mut form = StrategyTestForm {
            symbol: "BTCUSDT".to_string(),
            amount: "10".to_string(),
            ..Default::default()
        };
        form.on_filled(TradeSide::Buy, None);
        assert_eq!(form.amount, "10");
        assert_eq!(form.side, TradeSide::Sell);
    }

    #[test]
    fn test_form_rejects_bad_amounts() {
        let mut form = StrategyTestForm {
            symbol: "BTCUSDT".to_string(),
            amount: "-1".to_string(),
            ..Default::default()
        };
        assert_eq!(form.order(), None);
        form.amount = "abc".to_string();
        assert_eq!(form.order(), None);
    }

    #[test]
    fn ticket_totals_apply_leverage() {
        let mut ticket = TicketState {
            amount: "0.5".to_string(),
            leverage: 10,
            ..Default::default()
        };
        assert_eq!(ticket.totals(Some(200.0)), (100.0, 10.0));
        assert_eq!(ticket.totals(None), (0.0, 0.0));

        ticket.amount.clear();
        assert_eq!(ticket.totals(Some(200.0)), (0.0, 0.0));
    }

    #[test]
    fn logs_are_stored_by_type() {
        let mut logs = LogsState::for_strategy(StrategyRef {
            id: "1".into(),
            name: "Grid".into(),
        });
        logs.set(LogType::Detail, vec!["started".into()]);
        assert_eq!(logs.detail.len(), 1);
        assert!(logs.trade.is_empty());
    }
}
