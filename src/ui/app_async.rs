use std::future::Future;

use poll_promise::Promise;

use crate::api::logs::TradeSide;
use crate::api::market::fetch_market;
use crate::api::models::{
    ApiSettings, Balance, BotConfig, DashboardData, LogType, MarketSnapshot, OrderResponse,
    Strategy, User, UserStatus,
};
use crate::api::{ApiError, ApiResult};
use crate::chart::Annotation;
use crate::config::{API, DEBUG_FLAGS};
use crate::domain::{Interval, Pair};
use crate::ui::app::TradexApp;
use crate::ui::app_state::{AuthMode, StrategyRef};
use crate::ui::config::UI_TEXT;
use crate::ui::router::{Feed, Page};
use crate::ui::toast::ToastKind;

/// Where an order was placed from; decides how the fill is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderOrigin {
    StrategyTest,
    Ticket,
}

/// Completed background work, applied on the UI thread.
#[derive(Debug)]
pub enum Fetched {
    Login(ApiResult<String>),
    Register(ApiResult<()>),
    CurrentUser(ApiResult<User>),
    Portfolio(ApiResult<f64>),
    Dashboard(ApiResult<DashboardData>),
    BotConfig(ApiResult<BotConfig>),
    BotSaved(ApiResult<BotConfig>),
    Users(ApiResult<Vec<User>>),
    UserStatus {
        user_id: i64,
        status: UserStatus,
        result: ApiResult<()>,
    },
    Strategies(ApiResult<Vec<Strategy>>),
    StrategyToggled {
        id: String,
        running: bool,
        result: ApiResult<()>,
    },
    Logs {
        log_type: LogType,
        result: ApiResult<Vec<String>>,
    },
    Order {
        origin: OrderOrigin,
        side: TradeSide,
        price: Option<f64>,
        result: ApiResult<OrderResponse>,
    },
    Assets(ApiResult<Vec<Balance>>),
    Settings(ApiResult<ApiSettings>),
    SettingsSaved(ApiResult<()>),
    Market {
        pair: Pair,
        interval: Interval,
        reset: bool,
        result: ApiResult<MarketSnapshot>,
    },
    Failed(ApiError),
}

struct Job<T: Send + 'static> {
    /// Router epoch of the page that spawned it. `None` outlives page changes.
    epoch: Option<u64>,
    promise: Promise<T>,
}

/// Promises still running, tagged with the page that wants their result.
pub struct InFlight<T: Send + 'static> {
    jobs: Vec<Job<T>>,
}

impl<T: Send + 'static> Default for InFlight<T> {
    fn default() -> Self {
        Self { jobs: Vec::new() }
    }
}

impl<T: Send + 'static> InFlight<T> {
    pub fn push(&mut self, epoch: Option<u64>, promise: Promise<T>) {
        self.jobs.push(Job { epoch, promise });
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Forget page-scoped work. The promises finish in the background unobserved.
    pub fn drop_page_jobs(&mut self) {
        let before = self.jobs.len();
        self.jobs.retain(|job| job.epoch.is_none());
        let dropped = before - self.jobs.len();
        if dropped > 0 && cfg!(debug_assertions) && DEBUG_FLAGS.print_stale_results {
            log::info!("[in-flight] Dropped {} page jobs", dropped);
        }
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    /// Move out every finished result. Page-scoped results from another epoch are discarded.
    pub fn take_ready(&mut self, current_epoch: u64) -> Vec<T> {
        let mut ready = Vec::new();
        let mut pending = Vec::with_capacity(self.jobs.len());

        for job in self.jobs.drain(..) {
            match job.promise.try_take() {
                Ok(value) => match job.epoch {
                    Some(epoch) if epoch != current_epoch => {
                        if cfg!(debug_assertions) && DEBUG_FLAGS.print_stale_results {
                            log::info!(
                                "[in-flight] Discarded result from epoch {} (now {})",
                                epoch,
                                current_epoch
                            );
                        }
                    }
                    _ => ready.push(value),
                },
                Err(promise) => pending.push(Job {
                    epoch: job.epoch,
                    promise,
                }),
            }
        }

        self.jobs = pending;
        ready
    }
}

/// Background work producing a [`Fetched`]. Native futures cross to a worker thread.
#[cfg(not(target_arch = "wasm32"))]
pub trait FetchFuture: Future<Output = Fetched> + Send + 'static {}
#[cfg(not(target_arch = "wasm32"))]
impl<F: Future<Output = Fetched> + Send + 'static> FetchFuture for F {}

#[cfg(target_arch = "wasm32")]
pub trait FetchFuture: Future<Output = Fetched> + 'static {}
#[cfg(target_arch = "wasm32")]
impl<F: Future<Output = Fetched> + 'static> FetchFuture for F {}

/// Run `future` off the UI thread on the ambient tokio runtime.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_fetch<F: FetchFuture>(label: &'static str, future: F) -> Promise<Fetched> {
    if cfg!(debug_assertions) && DEBUG_FLAGS.print_poll_events {
        log::info!("[fetch] {}", label);
    }
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Promise::spawn_thread(label, move || handle.block_on(future)),
        Err(_) => {
            log::error!("No tokio runtime available for '{}'", label);
            Promise::from_ready(Fetched::Failed(ApiError::NoRuntime))
        }
    }
}

/// Run `future` on the browser event loop.
#[cfg(target_arch = "wasm32")]
pub fn spawn_fetch<F: FetchFuture>(label: &'static str, future: F) -> Promise<Fetched> {
    if cfg!(debug_assertions) && DEBUG_FLAGS.print_poll_events {
        log::info!("[fetch] {}", label);
    }
    Promise::spawn_local(future)
}

impl TradexApp {
    fn spawn_page<F: FetchFuture>(&mut self, label: &'static str, future: F) {
        let epoch = self.router.epoch();
        self.in_flight.push(Some(epoch), spawn_fetch(label, future));
    }

    fn spawn_global<F: FetchFuture>(&mut self, label: &'static str, future: F) {
        self.in_flight.push(None, spawn_fetch(label, future));
    }

    /// Start the fetch behind a due subscription.
    pub(super) fn start_feed(&mut self, feed: Feed) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };

        match feed {
            Feed::CurrentUser => self.spawn_global("current_user", async move {
                Fetched::CurrentUser(auth.current_user().await)
            }),
            Feed::Portfolio => self.spawn_global("portfolio", async move {
                Fetched::Portfolio(auth.portfolio_value().await)
            }),
            Feed::Dashboard => self.spawn_page("dashboard", async move {
                Fetched::Dashboard(auth.dashboard().await)
            }),
            Feed::BotConfig => self.spawn_page("bot_config", async move {
                Fetched::BotConfig(auth.bot_config().await)
            }),
            Feed::Users => self.spawn_page("users", async move {
                Fetched::Users(auth.list_users().await)
            }),
            Feed::Strategies => self.spawn_page("strategies", async move {
                Fetched::Strategies(auth.strategies().await)
            }),
            Feed::Logs(log_type) => {
                let Some(strategy) = self.logs.strategy.clone() else {
                    return;
                };
                self.spawn_page("strategy_logs", async move {
                    let result = auth.strategy_logs(&strategy.id, log_type).await;
                    Fetched::Logs { log_type, result }
                });
            }
            Feed::Assets => self.spawn_page("assets", async move {
                Fetched::Assets(auth.assets().await)
            }),
            Feed::Market => self.request_market(false),
        }
    }

    /// Fetch candles for the current pair and interval. `reset` refits the view.
    pub(super) fn request_market(&mut self, reset: bool) {
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        if reset {
            chart.loading = true;
        }
        let source = chart.variant.data_source;
        let client = self.client.clone();
        let pair = self.market.pair.clone();
        let interval = self.market.interval;
        self.spawn_page("market", async move {
            let result = fetch_market(client, source, pair.clone(), interval, API.klines_limit).await;
            Fetched::Market {
                pair,
                interval,
                reset,
                result,
            }
        });
    }

    pub(super) fn submit_auth(&mut self) {
        let Some((username, password)) = self.auth_form.credentials() else {
            self.auth_form.error = Some(UI_TEXT.auth_missing_fields.to_string());
            return;
        };
        self.auth_form.busy = true;
        self.auth_form.error = None;
        let client = self.client.clone();
        match self.auth_form.mode {
            AuthMode::Login => self.spawn_global("login", async move {
                Fetched::Login(client.login(&username, &password).await)
            }),
            AuthMode::Register => self.spawn_global("register", async move {
                Fetched::Register(client.register(&username, &password).await)
            }),
        }
    }

    pub(super) fn save_bot_config(&mut self) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };
        self.dashboard.bot_saving = true;
        let config = self.dashboard.bot.clone();
        self.spawn_page("save_bot", async move {
            Fetched::BotSaved(auth.save_bot_config(&config).await)
        });
    }

    pub(super) fn set_user_status(&mut self, user_id: i64, status: UserStatus) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };
        self.spawn_global("user_status", async move {
            let result = auth.set_user_status(user_id, status).await;
            Fetched::UserStatus {
                user_id,
                status,
                result,
            }
        });
    }

    pub(super) fn toggle_strategy(&mut self, id: String, start_amount: Option<f64>) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };
        self.spawn_global("strategy_toggle", async move {
            let (running, result) = match start_amount {
                Some(amount) => (true, auth.start_strategy(&id, amount).await),
                None => (false, auth.stop_strategy(&id).await),
            };
            Fetched::StrategyToggled {
                id,
                running,
                result,
            }
        });
    }

    pub(super) fn open_logs(&mut self, strategy: StrategyRef) {
        self.logs.strategy = Some(strategy);
        if self.router.current() == Page::StrategyLogs {
            self.router.remount();
            self.mount_page();
        } else {
            self.navigate(Page::StrategyLogs);
        }
    }

    /// Buy spends quote currency, sell spends base quantity.
    pub(super) fn place_order(
        &mut self,
        origin: OrderOrigin,
        side: TradeSide,
        symbol: String,
        amount: f64,
        price: Option<f64>,
    ) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions {
            log::info!("[order] {:?} {} {} ({:?})", side, amount, symbol, origin);
        }
        self.spawn_global("order", async move {
            let result = match side {
                TradeSide::Buy => auth.test_buy(&symbol, amount).await,
                TradeSide::Sell => auth.test_sell(&symbol, amount).await,
            };
            Fetched::Order {
                origin,
                side,
                price,
                result,
            }
        });
    }

    pub(super) fn open_settings(&mut self) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };
        self.settings.open = true;
        self.spawn_global("settings", async move {
            Fetched::Settings(auth.settings().await)
        });
    }

    pub(super) fn save_settings(&mut self) {
        let Some(auth) = self.session.auth(&self.client) else {
            return;
        };
        self.settings.saving = true;
        let settings = self.settings.settings.clone();
        self.spawn_global("save_settings", async move {
            Fetched::SettingsSaved(auth.save_settings(&settings).await)
        });
    }

    /// Apply everything that finished since the last frame.
    pub(super) fn poll_in_flight(&mut self) {
        let epoch = self.router.epoch();
        for fetched in self.in_flight.take_ready(epoch) {
            self.apply_fetched(fetched);
        }
    }

    /// Ends the session on 401. Returns true if it did.
    fn handle_auth_error(&mut self, err: &ApiError) -> bool {
        if self.session.handle_error(err) {
            self.end_session();
            self.toast(ToastKind::Error, UI_TEXT.auth_session_expired);
            true
        } else {
            false
        }
    }

    /// Reads fall back to an empty value. `None` when the session ended.
    fn read_or_default<T: Default>(&mut self, what: &str, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) if self.handle_auth_error(&e) => None,
            Err(e) => {
                log::warn!("Failed to load {}: {}", what, e);
                Some(T::default())
            }
        }
    }

    /// Actions surface failures as a toast.
    fn action_result<T>(&mut self, result: ApiResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) if self.handle_auth_error(&e) => None,
            Err(e) => {
                self.toast(ToastKind::Error, e.to_string());
                None
            }
        }
    }

    pub(super) fn apply_fetched(&mut self, fetched: Fetched) {
        match fetched {
            Fetched::Login(result) => {
                self.auth_form.busy = false;
                match result {
                    Ok(token) => {
                        self.session.login(token);
                        self.auth_form = Default::default();
                        self.router.remount();
                        self.on_authenticated();
                    }
                    Err(ApiError::Unauthorized) => {
                        self.auth_form.error = Some("Incorrect username or password".to_string());
                    }
                    Err(e) => self.auth_form.error = Some(e.to_string()),
                }
            }
            Fetched::Register(result) => {
                self.auth_form.busy = false;
                match result {
                    Ok(()) => {
                        self.auth_form.mode = AuthMode::Login;
                        self.auth_form.password.clear();
                        self.toast(ToastKind::Success, UI_TEXT.auth_registered);
                    }
                    Err(e) => self.auth_form.error = Some(e.to_string()),
                }
            }
            Fetched::CurrentUser(result) => match result {
                Ok(user) => self.session.set_user(user),
                Err(e) => {
                    if !self.handle_auth_error(&e) {
                        log::warn!("Failed to load profile: {}", e);
                    }
                }
            },
            Fetched::Portfolio(result) => match result {
                Ok(value) => self.portfolio_value = Some(value),
                Err(e) => {
                    if !self.handle_auth_error(&e) {
                        log::warn!("Failed to load portfolio value: {}", e);
                        self.portfolio_value = None;
                    }
                }
            },
            Fetched::Dashboard(result) => {
                if let Some(data) = self.read_or_default("dashboard", result) {
                    self.dashboard.data = data;
                }
            }
            Fetched::BotConfig(result) => {
                if let Some(bot) = self.read_or_default("bot config", result) {
                    self.dashboard.bot = bot;
                    self.dashboard.bot_loaded = true;
                }
            }
            Fetched::BotSaved(result) => {
                self.dashboard.bot_saving = false;
                if let Some(bot) = self.action_result(result) {
                    self.dashboard.bot = bot;
                    self.toast(ToastKind::Success, UI_TEXT.bot_saved);
                }
            }
            Fetched::Users(result) => {
                if let Some(users) = self.read_or_default("users", result) {
                    self.users.users = users;
                    self.users.loaded = true;
                }
            }
            Fetched::UserStatus {
                user_id,
                status,
                result,
            } => {
                if self.action_result(result).is_some() {
                    self.users.apply_status(user_id, status);
                    self.toast(
                        ToastKind::Success,
                        format!("User {}", status.label().to_lowercase()),
                    );
                }
            }
            Fetched::Strategies(result) => {
                if let Some(strategies) = self.read_or_default("strategies", result) {
                    self.strategies.strategies = strategies;
                    self.strategies.loaded = true;
                }
            }
            Fetched::StrategyToggled {
                id,
                running,
                result,
            } => {
                if self.action_result(result).is_some() {
                    self.strategies.set_running(&id, running);
                    let verb = if running { "started" } else { "stopped" };
                    self.toast(ToastKind::Success, format!("Strategy {}", verb));
                }
            }
            Fetched::Logs { log_type, result } => {
                if let Some(lines) = self.read_or_default("strategy logs", result) {
                    self.logs.set(log_type, lines);
                }
            }
            Fetched::Order {
                origin,
                side,
                price,
                result,
            } => self.apply_order(origin, side, price, result),
            Fetched::Assets(result) => {
                if let Some(balances) = self.read_or_default("assets", result) {
                    self.assets.balances = balances;
                    self.assets.loaded = true;
                }
            }
            Fetched::Settings(result) => {
                if let Some(settings) = self.read_or_default("settings", result) {
                    self.settings.settings = settings;
                }
            }
            Fetched::SettingsSaved(result) => {
                self.settings.saving = false;
                if self.action_result(result).is_some() {
                    self.settings.open = false;
                    self.toast(ToastKind::Success, UI_TEXT.settings_saved);
                }
            }
            Fetched::Market {
                pair,
                interval,
                reset,
                result,
            } => self.apply_market(pair, interval, reset, result),
            Fetched::Failed(e) => {
                log::error!("Background task failed: {}", e);
                self.auth_form.busy = false;
                self.toast(ToastKind::Error, e.to_string());
            }
        }
    }

    fn apply_order(
        &mut self,
        origin: OrderOrigin,
        side: TradeSide,
        price: Option<f64>,
        result: ApiResult<OrderResponse>,
    ) {
        match origin {
            OrderOrigin::StrategyTest => self.strategies.test.busy = false,
            OrderOrigin::Ticket => self.ticket.busy = false,
        }

        let Some(response) = self.action_result(result) else {
            return;
        };
        let text = match side {
            TradeSide::Buy => UI_TEXT.order_bought,
            TradeSide::Sell => UI_TEXT.order_sold,
        };
        self.toast(ToastKind::Success, text);

        match origin {
            OrderOrigin::StrategyTest => {
                self.strategies.test.on_filled(side, response.executed_qty());
            }
            OrderOrigin::Ticket => {
                let Some(chart) = self.chart.as_mut() else {
                    return;
                };
                let (Some(price), Some(last)) = (price, chart.view.candles().last()) else {
                    return;
                };
                let time = last.time;
                let marker = match side {
                    TradeSide::Buy => Annotation::Buy { time, price },
                    TradeSide::Sell => Annotation::Sell { time, price },
                };
                chart.view.drawing.add_marker(marker);
            }
        }
    }

    /// Late results for a pair or interval the user has moved away from are dropped.
    fn apply_market(
        &mut self,
        pair: Pair,
        interval: Interval,
        reset: bool,
        result: ApiResult<MarketSnapshot>,
    ) {
        if pair != self.market.pair || interval != self.market.interval {
            if cfg!(debug_assertions) && DEBUG_FLAGS.print_stale_results {
                log::info!("[market] Discarded {} {} result", pair, interval.label());
            }
            return;
        }
        let result = match result {
            Err(e) if self.handle_auth_error(&e) => return,
            other => other,
        };
        let Some(chart) = self.chart.as_mut() else {
            return;
        };
        chart.loading = false;
        match result {
            Ok(snapshot) => {
                chart.view.set_candles(snapshot.candles, reset);
                chart.ticker = Some(snapshot.ticker);
                chart.error = None;
            }
            // Keep the last good series on screen
            Err(e) => chart.error = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Candle;
    use crate::utils::app_time::now;

    #[test]
    fn stale_page_results_are_discarded() {
        let mut in_flight: InFlight<u32> = InFlight::default();
        in_flight.push(Some(1), Promise::from_ready(10));
        in_flight.push(Some(2), Promise::from_ready(20));
        in_flight.push(None, Promise::from_ready(30));

        let ready = in_flight.take_ready(2);
        assert_eq!(ready, vec![20, 30]);
        assert!(in_flight.is_empty());
    }

    #[test]
    fn pending_jobs_stay_queued() {
        let mut in_flight: InFlight<u32> = InFlight::default();
        let (sender, promise) = Promise::new();
        in_flight.push(Some(0), promise);

        assert!(in_flight.take_ready(0).is_empty());
        assert_eq!(in_flight.len(), 1);

        sender.send(7);
        assert_eq!(in_flight.take_ready(0), vec![7]);
    }

    #[test]
    fn dropping_page_jobs_keeps_global_work() {
        let mut in_flight: InFlight<u32> = InFlight::default();
        in_flight.push(Some(0), Promise::from_ready(1));
        in_flight.push(None, Promise::from_ready(2));
        in_flight.drop_page_jobs();
        assert_eq!(in_flight.take_ready(0), vec![2]);
    }

    fn logged_in_app() -> TradexApp {
        let mut app = TradexApp::default();
        app.session.login("token".to_string());
        app
    }

    #[test]
    fn navigation_swaps_page_subscriptions() {
        let mut app = logged_in_app();
        app.on_authenticated();
        // CurrentUser + Portfolio, then Dashboard + BotConfig + Market
        assert_eq!(app.scheduler.len(), 5);

        app.navigate(Page::Assets);
        assert_eq!(app.scheduler.len(), 3);
        assert_eq!(app.page_polls.len(), 1);

        let mut due = app.scheduler.due(now());
        due.sort_by_key(|feed| format!("{:?}", feed));
        assert_eq!(due, vec![Feed::Assets, Feed::CurrentUser, Feed::Portfolio]);
    }

    #[test]
    fn unauthorized_read_ends_session() {
        let mut app = logged_in_app();
        app.apply_fetched(Fetched::Dashboard(Err(ApiError::Unauthorized)));
        assert!(!app.is_authenticated());
        assert!(app.page_polls.is_empty());
    }

    #[test]
    fn failed_read_falls_back_to_default() {
        let mut app = logged_in_app();
        app.users.users = vec![User {
            id: 1,
            username: "old".to_string(),
            status: UserStatus::Active,
        }];
        app.apply_fetched(Fetched::Users(Err(ApiError::Transport("down".to_string()))));
        assert!(app.is_authenticated());
        assert!(app.users.users.is_empty());
        assert!(app.users.loaded);
    }

    #[test]
    fn market_result_for_old_pair_is_ignored() {
        let mut app = logged_in_app();
        app.router = crate::ui::router::Router::new(Page::Charts);
        app.mount_page();
        app.market.pair = Pair::new("ETHUSDT");

        let snapshot = MarketSnapshot {
            candles: vec![Candle::new(0.0, 1.0, 2.0, 0.5, 1.5, 10.0)],
            ticker: Default::default(),
        };
        app.apply_fetched(Fetched::Market {
            pair: Pair::new("BTCUSDT"),
            interval: app.market.interval,
            reset: true,
            result: Ok(snapshot.clone()),
        });
        let chart = app.chart.as_ref().map(|c| c.view.candles().len());
        assert_eq!(chart, Some(0));

        app.apply_fetched(Fetched::Market {
            pair: Pair::new("ETHUSDT"),
            interval: app.market.interval,
            reset: true,
            result: Ok(snapshot),
        });
        let chart = app.chart.as_ref().map(|c| c.view.candles().len());
        assert_eq!(chart, Some(1));
    }

    #[test]
    fn ticket_fill_places_marker() {
        let mut app = logged_in_app();
        app.router = crate::ui::router::Router::new(Page::ManualTrade);
        app.mount_page();
        if let Some(chart) = app.chart.as_mut() {
            chart
                .view
                .set_candles(vec![Candle::new(60_000.0, 1.0, 2.0, 0.5, 1.5, 10.0)], true);
        }
        app.ticket.busy = true;
        app.apply_fetched(Fetched::Order {
            origin: OrderOrigin::Ticket,
            side: TradeSide::Buy,
            price: Some(1.5),
            result: Ok(OrderResponse::default()),
        });

        assert!(!app.ticket.busy);
        let annotations = app
            .chart
            .as_ref()
            .map(|c| c.view.drawing.annotations().to_vec())
            .unwrap_or_default();
        assert_eq!(
            annotations,
            vec![Annotation::Buy {
                time: 60_000.0,
                price: 1.5
            }]
        );
    }
}
