use eframe::egui::{
    Button, CentralPanel, Context, Frame, Grid, Margin, RichText, ScrollArea, TextEdit,
    TopBottomPanel, Ui, Window,
};
use strum::IntoEnumIterator;

use crate::api::logs::TradeSide;
use crate::config::DEBUG_FLAGS;
use crate::ui::app_async::OrderOrigin;
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::router::Page;
use crate::ui::styles::UiStyleExt;
use crate::ui::toast::ToastKind;
use crate::ui::ui_market::{MarketEvent, MarketPanel};
use crate::ui::ui_panels::{
    AssetsPanel, DashboardPanel, LogsPanel, PageAction, Panel, StrategiesPanel, UsersPanel,
};
use crate::ui::utils::{Theme, colored_heading};

use super::app::TradexApp;

impl TradexApp {
    pub(super) fn render_header(&mut self, ctx: &Context) {
        let header_frame = Frame::new()
            .fill(ctx.style().visuals.window_fill)
            .inner_margin(Margin::symmetric(10, 6));
        TopBottomPanel::top("header_panel")
            .frame(header_frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(colored_heading(UI_TEXT.app_title).strong());
                    ui.separator();

                    let current = self.router.current();
                    let mut target = None;
                    for page in Page::iter().filter(Page::in_nav) {
                        let selected = page == current
                            || (page == Page::Strategies && current == Page::StrategyLogs);
                        if ui.selectable_label(selected, page.label()).clicked() {
                            target = Some(page);
                        }
                        ui.add_space(UI_CONFIG.nav_spacing);
                    }
                    if let Some(page) = target {
                        self.navigate(page);
                    }

                    ui.with_layout(
                        eframe::egui::Layout::right_to_left(eframe::egui::Align::Center),
                        |ui| self.render_header_right(ui),
                    );
                });
            });
    }

    fn render_header_right(&mut self, ui: &mut Ui) {
        if ui.button(UI_TEXT.header_logout).clicked() {
            self.logout();
            return;
        }
        if ui.button(UI_TEXT.header_settings).clicked() {
            self.open_settings();
        }
        let theme_icon = match self.theme {
            Theme::Dark => UI_TEXT.header_theme_light,
            Theme::Light => UI_TEXT.header_theme_dark,
        };
        if ui.button(theme_icon).clicked() {
            self.theme = self.theme.toggled();
        }

        ui.separator();
        if let Some(user) = self.session.user() {
            ui.status_badge(user.status);
            ui.label(RichText::new(user.username.as_str()).strong());
            ui.separator();
        }
        let value = self
            .portfolio_value
            .map(|v| format!("{:.2} USDT", v))
            .unwrap_or_else(|| "-".to_string());
        ui.metric(UI_TEXT.header_portfolio, &value, UI_CONFIG.colors.accent);
    }

    pub(super) fn render_central_panel(&mut self, ctx: &Context) {
        let mut page_events = Vec::new();
        let mut market_events = Vec::new();

        CentralPanel::default().show(ctx, |ui| {
            ui.add_space(6.0);
            ui.label_header(self.router.current().label());
            ui.add_space(6.0);

            ScrollArea::vertical()
                .id_salt("page_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| match self.router.current() {
                    Page::Dashboard => {
                        let label = self.market.pair.display();
                        page_events =
                            DashboardPanel::new(&mut self.dashboard, self.chart.as_mut(), label)
                                .render(ui);
                    }
                    Page::Users => page_events = UsersPanel::new(&mut self.users).render(ui),
                    Page::Strategies => {
                        page_events = StrategiesPanel::new(&mut self.strategies).render(ui)
                    }
                    Page::StrategyLogs => page_events = LogsPanel::new(&mut self.logs).render(ui),
                    Page::Assets => page_events = AssetsPanel::new(&self.assets).render(ui),
                    Page::Charts | Page::ManualTrade => {
                        if let Some(chart) = self.chart.as_mut() {
                            market_events =
                                MarketPanel::new(chart, &mut self.ticket, &self.market).render(ui);
                        }
                    }
                });
        });

        for event in page_events {
            self.handle_page_action(event);
        }
        for event in market_events {
            self.handle_market_event(event);
        }
    }

    fn handle_page_action(&mut self, action: PageAction) {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions {
            log::info!("[action] {:?}", action);
        }
        match action {
            PageAction::SaveBot => self.save_bot_config(),
            PageAction::SetUserStatus { user_id, status } => self.set_user_status(user_id, status),
            PageAction::StartStrategy { id, amount } => self.toggle_strategy(id, Some(amount)),
            PageAction::StopStrategy { id } => self.toggle_strategy(id, None),
            PageAction::OpenLogs(strategy) => self.open_logs(strategy),
            PageAction::BackToStrategies => self.navigate(Page::Strategies),
            PageAction::TestOrder {
                side,
                symbol,
                amount,
            } => self.place_order(OrderOrigin::StrategyTest, side, symbol, amount, None),
            PageAction::Invalid(message) => self.toast(ToastKind::Error, message),
        }
    }

    pub(super) fn handle_market_event(&mut self, event: MarketEvent) {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions {
            log::info!("[market] {:?}", event);
        }
        match event {
            MarketEvent::SelectPair(pair) => {
                self.market.pair = pair;
                self.reload_market();
            }
            MarketEvent::SelectInterval(interval) => {
                self.market.interval = interval;
                self.reload_market();
            }
            MarketEvent::SelectStyle(style) => {
                self.market.style = style;
                if let Some(chart) = self.chart.as_mut() {
                    chart.view.set_style(style);
                }
            }
            MarketEvent::PlaceOrder {
                side,
                amount,
                price,
            } => {
                let symbol = self.market.pair.symbol.clone();
                // Buys are sized in quote currency
                let size = match side {
                    TradeSide::Buy => price * amount,
                    TradeSide::Sell => amount,
                };
                self.place_order(OrderOrigin::Ticket, side, symbol, size, Some(price));
            }
            MarketEvent::Invalid(message) => self.toast(ToastKind::Error, message),
        }
    }

    /// Pair or interval changed: drop the old series and fetch afresh.
    fn reload_market(&mut self) {
        if let Some(chart) = self.chart.as_mut() {
            chart.view.set_candles(Vec::new(), true);
            chart.ticker = None;
            chart.error = None;
        }
        self.request_market(true);
    }

    pub(super) fn render_settings_modal(&mut self, ctx: &Context) {
        if !self.settings.open {
            return;
        }
        let mut open = true;
        let mut save = false;
        let mut cancel = false;

        Window::new(UI_TEXT.settings_heading)
            .open(&mut open)
            .resizable(false)
            .collapsible(false)
            .default_width(380.0)
            .show(ctx, |ui| {
                let settings = &mut self.settings.settings;
                Grid::new("settings_grid").num_columns(2).show(ui, |ui| {
                    ui.label(UI_TEXT.settings_api_key);
                    ui.add(TextEdit::singleline(&mut settings.binance_api_key).desired_width(240.0));
                    ui.end_row();

                    ui.label(UI_TEXT.settings_api_secret);
                    ui.add(
                        TextEdit::singleline(&mut settings.binance_api_secret)
                            .password(true)
                            .desired_width(240.0),
                    );
                    ui.end_row();
                });

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(!self.settings.saving, Button::new(UI_TEXT.settings_save))
                        .clicked()
                    {
                        save = true;
                    }
                    if ui.button(UI_TEXT.settings_cancel).clicked() {
                        cancel = true;
                    }
                    if self.settings.saving {
                        ui.spinner();
                    }
                });
            });

        if !open || cancel {
            self.settings.open = false;
        } else if save {
            self.save_settings();
        }
    }
}
