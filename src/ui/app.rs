use eframe::{Frame, egui};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::api::{ApiClient, Session};
use crate::chart::{ChartVariant, DataSource};
use crate::config::{API, DEBUG_FLAGS, TOKEN_STORAGE_KEY};
use crate::poll::{PollHandle, PollScheduler};
use crate::ui::app_async::{Fetched, InFlight};
use crate::ui::app_state::{
    AssetsState, AuthForm, ChartPageState, DashboardState, LogsState, MarketPrefs, SettingsModal,
    StrategiesState, TicketState, UsersState,
};
use crate::ui::router::{Feed, Page, Router, page_feeds, session_feeds};
use crate::ui::toast::{ToastKind, Toasts};
use crate::ui::utils::{Theme, setup_custom_visuals};
use crate::utils::app_time::now;

/// Startup options resolved from the command line (or defaults on the web).
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub api_base: String,
    pub binance_base: String,
    /// Charts page reads Binance directly instead of the backend proxy
    pub direct_market: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            api_base: API.default_base_url.to_string(),
            binance_base: API.binance_base_url.to_string(),
            direct_market: false,
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct TradexApp {
    // UI preferences
    pub(super) theme: Theme,
    pub(super) last_page: Page,
    pub(super) market: MarketPrefs,

    // Runtime-only state
    #[serde(skip)]
    pub(super) session: Session,
    #[serde(skip)]
    pub(super) client: ApiClient,
    #[serde(skip)]
    pub(super) direct_market: bool,
    #[serde(skip)]
    pub(super) router: Router,
    #[serde(skip)]
    pub(super) scheduler: PollScheduler<Feed>,
    #[serde(skip)]
    pub(super) session_polls: Vec<PollHandle>,
    #[serde(skip)]
    pub(super) page_polls: Vec<PollHandle>,
    #[serde(skip)]
    pub(super) in_flight: InFlight<Fetched>,
    #[serde(skip)]
    pub(super) toasts: Toasts,
    #[serde(skip)]
    pub(super) portfolio_value: Option<f64>,

    // Page state
    #[serde(skip)]
    pub(super) auth_form: AuthForm,
    #[serde(skip)]
    pub(super) dashboard: DashboardState,
    #[serde(skip)]
    pub(super) users: UsersState,
    #[serde(skip)]
    pub(super) strategies: StrategiesState,
    #[serde(skip)]
    pub(super) logs: LogsState,
    #[serde(skip)]
    pub(super) assets: AssetsState,
    #[serde(skip)]
    pub(super) chart: Option<ChartPageState>,
    #[serde(skip)]
    pub(super) ticket: TicketState,
    #[serde(skip)]
    pub(super) settings: SettingsModal,
}

impl Default for TradexApp {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            last_page: Page::default(),
            market: MarketPrefs::default(),
            session: Session::default(),
            client: ApiClient::default(),
            direct_market: false,
            router: Router::default(),
            scheduler: PollScheduler::new(),
            session_polls: Vec::new(),
            page_polls: Vec::new(),
            in_flight: InFlight::default(),
            toasts: Toasts::default(),
            portfolio_value: None,
            auth_form: AuthForm::default(),
            dashboard: DashboardState::default(),
            users: UsersState::default(),
            strategies: StrategiesState::default(),
            logs: LogsState::default(),
            assets: AssetsState::default(),
            chart: None,
            ticket: TicketState::default(),
            settings: SettingsModal::default(),
        }
    }
}

impl TradexApp {
    pub fn new(cc: &eframe::CreationContext<'_>, options: AppOptions) -> Self {
        let mut app: TradexApp;
        let mut token: Option<String> = None;

        // Attempt to load the persisted state
        if let Some(storage) = cc.storage {
            if let Some(value) = eframe::get_value(storage, eframe::APP_KEY) {
                if cfg!(debug_assertions) && DEBUG_FLAGS.print_state_serde {
                    log::info!("Successfully loaded persisted state");
                }
                app = value;
            } else {
                if cfg!(debug_assertions) && DEBUG_FLAGS.print_state_serde {
                    log::info!("No persisted app state found. Creating anew.");
                }
                app = TradexApp::default();
            }
            token = eframe::get_value(storage, TOKEN_STORAGE_KEY);
        } else {
            app = TradexApp::default();
        }

        app.configure(options);
        app.session = Session::with_token(token);
        if app.session.is_authenticated() {
            app.on_authenticated();
        }
        app
    }

    /// Apply startup options and restore the landing page.
    pub(super) fn configure(&mut self, options: AppOptions) {
        self.client = ApiClient::new(&options.api_base, &options.binance_base);
        self.direct_market = options.direct_market;

        // Logs need a strategy picked in this session
        let landing = match self.last_page {
            Page::StrategyLogs => Page::Strategies,
            page => page,
        };
        self.router = Router::new(landing);
        log::info!(
            "Backend {} (market data via {})",
            self.client.base_url(),
            if self.direct_market { "Binance" } else { "backend" }
        );
    }

    pub(super) fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Start session-wide feeds and mount the current page.
    pub(super) fn on_authenticated(&mut self) {
        self.session_polls = session_feeds()
            .into_iter()
            .map(|(feed, every)| self.scheduler.subscribe(feed, every))
            .collect();
        self.mount_page();
    }

    /// Drop everything tied to the session and fall back to the auth screen.
    pub(super) fn end_session(&mut self) {
        self.session.logout();
        self.session_polls.clear();
        self.page_polls.clear();
        self.in_flight.clear();
        self.portfolio_value = None;
        self.settings = SettingsModal::default();
        self.auth_form = AuthForm::default();
        self.router.remount();
    }

    pub(super) fn logout(&mut self) {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions {
            log::info!("[session] User logged out");
        }
        self.end_session();
    }

    pub(super) fn navigate(&mut self, page: Page) {
        if self.router.navigate(page) {
            if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions {
                log::info!("[nav] {}", page.label());
            }
            self.mount_page();
        }
    }

    /// Chart variant for `page`, with the market source override applied.
    pub(super) fn variant_for(&self, page: Page) -> Option<ChartVariant> {
        page.chart_variant().map(|variant| {
            if self.direct_market && variant.data_source == DataSource::Backend {
                variant.with_data_source(DataSource::Binance)
            } else {
                variant
            }
        })
    }

    /// Fresh state and subscriptions for the current page. Old subscriptions
    /// are cancelled by dropping their handles and old in-flight work is discarded.
    pub(super) fn mount_page(&mut self) {
        let page = self.router.current();
        self.last_page = page;
        self.in_flight.drop_page_jobs();

        match page {
            Page::Dashboard => self.dashboard = DashboardState::default(),
            Page::Users => self.users = UsersState::default(),
            Page::Strategies => self.strategies = StrategiesState::default(),
            Page::StrategyLogs => {
                let strategy = self.logs.strategy.take();
                self.logs = LogsState::default();
                self.logs.strategy = strategy;
            }
            Page::Assets => self.assets = AssetsState::default(),
            Page::Charts | Page::ManualTrade => self.ticket = TicketState::default(),
        }
        self.chart = self
            .variant_for(page)
            .map(|variant| ChartPageState::new(variant, self.market.style));

        self.page_polls = page_feeds(page)
            .into_iter()
            .map(|(feed, every)| self.scheduler.subscribe(feed, every))
            .collect();
    }

    pub(super) fn toast(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.toasts.push(kind, text, now());
    }

    /// Spawn fetches for every subscription that is due.
    fn run_due_polls(&mut self) {
        if !self.is_authenticated() {
            return;
        }
        for feed in self.scheduler.due(now()) {
            self.start_feed(feed);
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        if !self.in_flight.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else if let Some(deadline) = self.scheduler.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now()));
        }
    }
}

impl eframe::App for TradexApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Drop pending promises before the runtime goes away
        self.in_flight.clear();
        self.page_polls.clear();
        self.session_polls.clear();

        if cfg!(debug_assertions) && DEBUG_FLAGS.print_shutdown {
            log::info!("Application shutdown complete.");
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self);
        let token = self.session.token().map(str::to_string);
        eframe::set_value(storage, TOKEN_STORAGE_KEY, &token);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx, self.theme);

        self.poll_in_flight();
        self.run_due_polls();

        if self.is_authenticated() {
            self.render_header(ctx);
            self.render_central_panel(ctx);
            self.render_settings_modal(ctx);
        } else {
            self.render_auth(ctx);
        }

        self.toasts.show(ctx, now());
        self.schedule_repaint(ctx);
    }
}
