use eframe::egui::{Button, ComboBox, DragValue, Grid, RichText, ScrollArea, TextEdit, Ui};
use egui_plot::{AxisHints, Bar, BarChart, Legend, Plot};

use crate::api::logs::{TradeSide, classify_detail, parse_trade_log};
use crate::api::models::{LogType, UserStatus};
use crate::ui::app_state::{
    AssetsState, ChartPageState, DashboardState, LogsState, StrategiesState, StrategyRef,
    UsersState, parse_positive,
};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_plot_view::show_chart;
use crate::ui::utils::{
    format_duration_minutes, format_signed_usdt, section_heading, spaced_separator,
};

use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

/// Requests raised by page panels, handled by the app after the frame's widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum PageAction {
    SaveBot,
    SetUserStatus { user_id: i64, status: UserStatus },
    StartStrategy { id: String, amount: f64 },
    StopStrategy { id: String },
    OpenLogs(StrategyRef),
    BackToStrategies,
    TestOrder { side: TradeSide, symbol: String, amount: f64 },
    Invalid(&'static str),
}

const RISK_LEVELS: [&str; 3] = ["low", "medium", "high"];

// ============================================================================
// DASHBOARD
// ============================================================================
pub struct DashboardPanel<'a> {
    state: &'a mut DashboardState,
    chart: Option<&'a mut ChartPageState>,
    market_label: String,
}

impl<'a> DashboardPanel<'a> {
    pub fn new(
        state: &'a mut DashboardState,
        chart: Option<&'a mut ChartPageState>,
        market_label: String,
    ) -> Self {
        Self {
            state,
            chart,
            market_label,
        }
    }

    fn render_stats(&self, ui: &mut Ui) {
        let stats = &self.state.data.stats;
        let profit_color = if stats.total_profit >= 0.0 {
            UI_CONFIG.colors.positive
        } else {
            UI_CONFIG.colors.negative
        };
        ui.horizontal_wrapped(|ui| {
            ui.stat_card(
                UI_TEXT.dash_total_profit,
                &format_signed_usdt(stats.total_profit),
                profit_color,
            );
            ui.stat_card(
                UI_TEXT.dash_win_rate,
                &format!("{:.1}%", stats.win_rate),
                UI_CONFIG.colors.accent,
            );
            ui.stat_card(
                UI_TEXT.dash_active_trades,
                &format!("{:.0}", stats.active_trades),
                UI_CONFIG.colors.accent,
            );
            ui.stat_card(
                UI_TEXT.dash_avg_duration,
                &format_duration_minutes(stats.avg_trade_duration),
                UI_CONFIG.colors.accent,
            );
        });
    }

    fn render_performance(&self, ui: &mut Ui) {
        section_heading(ui, UI_TEXT.dash_performance);
        let bars = &self.state.data.chart_data;
        let names: Vec<String> = bars.iter().map(|b| b.name.clone()).collect();

        let profit: Vec<Bar> = bars
            .iter()
            .enumerate()
            .map(|(i, b)| Bar::new(i as f64 - 0.2, b.profit).width(0.35).name(&b.name))
            .collect();
        let loss: Vec<Bar> = bars
            .iter()
            .enumerate()
            .map(|(i, b)| Bar::new(i as f64 + 0.2, -b.loss.abs()).width(0.35).name(&b.name))
            .collect();

        let x_axis = AxisHints::new_x().formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            names.get(idx as usize).cloned().unwrap_or_default()
        });

        Plot::new("dashboard_performance")
            .height(UI_CONFIG.mini_chart_height)
            .legend(Legend::default())
            .custom_x_axes(vec![x_axis])
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_boxed_zoom(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new("Profit", profit).color(UI_CONFIG.colors.positive));
                plot_ui.bar_chart(BarChart::new("Loss", loss).color(UI_CONFIG.colors.negative));
            });
    }

    fn render_history(&self, ui: &mut Ui) {
        section_heading(ui, UI_TEXT.dash_history);
        let rows = &self.state.data.trade_history;
        if rows.is_empty() {
            ui.label_subdued(UI_TEXT.dash_no_history);
            return;
        }
        ScrollArea::vertical()
            .max_height(220.0)
            .id_salt("trade_history")
            .show(ui, |ui| {
                Grid::new("trade_history_grid")
                    .striped(true)
                    .num_columns(5)
                    .show(ui, |ui| {
                        for header in ["#", "Pair", "Type", "Status", "Profit"] {
                            ui.label_subheader(header);
                        }
                        ui.end_row();

                        for row in rows {
                            ui.label(row.id.map(|id| id.to_string()).unwrap_or_default());
                            ui.label(row.pair.as_str());
                            ui.label(row.side.as_str());
                            ui.label(row.status.as_str());
                            let color = if row.profit >= 0.0 {
                                UI_CONFIG.colors.positive
                            } else {
                                UI_CONFIG.colors.negative
                            };
                            ui.label(RichText::new(format_signed_usdt(row.profit)).color(color));
                            ui.end_row();
                        }
                    });
            });
    }

    fn render_bot_config(&mut self, ui: &mut Ui) -> Option<PageAction> {
        section_heading(ui, UI_TEXT.bot_heading);
        if !self.state.bot_loaded {
            ui.spinner();
            return None;
        }
        let bot = &mut self.state.bot;
        Grid::new("bot_config_grid").num_columns(2).show(ui, |ui| {
            ui.label("Strategy");
            ui.text_edit_singleline(&mut bot.strategy);
            ui.end_row();

            ui.label("Risk Level");
            ComboBox::from_id_salt("risk_level")
                .selected_text(bot.risk_level.clone())
                .show_ui(ui, |ui| {
                    for level in RISK_LEVELS {
                        ui.selectable_value(&mut bot.risk_level, level.to_string(), level);
                    }
                });
            ui.end_row();

            ui.label("Market");
            ui.text_edit_singleline(&mut bot.market);
            ui.end_row();

            ui.label("Amount");
            ui.add(DragValue::new(&mut bot.amount).range(0.0..=f64::MAX).speed(1.0));
            ui.end_row();

            ui.label("Active");
            ui.checkbox(&mut bot.is_active, "");
            ui.end_row();
        });

        let save = ui.add_enabled(!self.state.bot_saving, Button::new("Save"));
        save.clicked().then_some(PageAction::SaveBot)
    }
}

impl<'a> Panel for DashboardPanel<'a> {
    type Event = PageAction;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        self.render_stats(ui);
        spaced_separator(ui);

        ui.columns(2, |cols| {
            self.render_performance(&mut cols[0]);
            if let Some(action) = self.render_bot_config(&mut cols[1]) {
                events.push(action);
            }
        });

        if let Some(chart) = self.chart.as_deref_mut() {
            section_heading(ui, format!("{} {}", UI_TEXT.dash_market, self.market_label));
            show_chart(ui, "dashboard_chart", chart, UI_CONFIG.mini_chart_height);
        }

        self.render_history(ui);
        events
    }
}

// ============================================================================
// USERS
// ============================================================================
pub struct UsersPanel<'a> {
    state: &'a mut UsersState,
}

impl<'a> UsersPanel<'a> {
    pub fn new(state: &'a mut UsersState) -> Self {
        Self { state }
    }
}

impl<'a> Panel for UsersPanel<'a> {
    type Event = PageAction;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        ui.add(TextEdit::singleline(&mut self.state.search).hint_text(UI_TEXT.users_search_hint));

        if !self.state.loaded {
            ui.spinner();
            return events;
        }

        let (pending, managed) = self.state.split();

        section_heading(ui, UI_TEXT.users_pending);
        if pending.is_empty() {
            ui.label_subdued(UI_TEXT.users_none);
        }
        for user in pending {
            ui.horizontal(|ui| {
                ui.label(user.username.as_str());
                ui.status_badge(user.status);
                if ui.button("Approve").clicked() {
                    events.push(PageAction::SetUserStatus {
                        user_id: user.id,
                        status: UserStatus::Active,
                    });
                }
                if ui.button("Reject").clicked() {
                    events.push(PageAction::SetUserStatus {
                        user_id: user.id,
                        status: UserStatus::Disabled,
                    });
                }
            });
        }

        section_heading(ui, UI_TEXT.users_managed);
        if managed.is_empty() {
            ui.label_subdued(UI_TEXT.users_none);
        }
        Grid::new("managed_users").striped(true).num_columns(3).show(ui, |ui| {
            for user in managed {
                ui.label(user.username.as_str());
                ui.status_badge(user.status);
                let (label, next) = if user.status == UserStatus::Active {
                    ("Disable", UserStatus::Disabled)
                } else {
                    ("Activate", UserStatus::Active)
                };
                if ui.button(label).clicked() {
                    events.push(PageAction::SetUserStatus {
                        user_id: user.id,
                        status: next,
                    });
                }
                ui.end_row();
            }
        });

        events
    }
}

// ============================================================================
// STRATEGIES
// ============================================================================
pub struct StrategiesPanel<'a> {
    state: &'a mut StrategiesState,
}

impl<'a> StrategiesPanel<'a> {
    pub fn new(state: &'a mut StrategiesState) -> Self {
        Self { state }
    }

    fn render_list(&mut self, ui: &mut Ui, events: &mut Vec<PageAction>) {
        section_heading(ui, UI_TEXT.strat_heading);
        if !self.state.loaded {
            ui.spinner();
            return;
        }
        if self.state.strategies.is_empty() {
            ui.label_subdued(UI_TEXT.strat_none);
            return;
        }

        let amounts = &mut self.state.amounts;
        Grid::new("strategies_grid").striped(true).num_columns(4).show(ui, |ui| {
            for strategy in &self.state.strategies {
                ui.label(RichText::new(&strategy.name).strong());
                let amount = amounts.entry(strategy.id.clone()).or_default();

                if strategy.running {
                    ui.label(RichText::new("Running").color(UI_CONFIG.colors.positive));
                    if ui.button("Stop").clicked() {
                        events.push(PageAction::StopStrategy {
                            id: strategy.id.clone(),
                        });
                    }
                } else {
                    ui.add(
                        TextEdit::singleline(amount)
                            .hint_text(UI_TEXT.strat_amount_quote_hint)
                            .desired_width(110.0),
                    );
                    if ui.button("Start").clicked() {
                        match parse_positive(amount) {
                            Some(value) => events.push(PageAction::StartStrategy {
                                id: strategy.id.clone(),
                                amount: value,
                            }),
                            None => events.push(PageAction::Invalid(UI_TEXT.invalid_amount)),
                        }
                    }
                }

                if ui.button(UI_TEXT.strat_logs_button).clicked() {
                    events.push(PageAction::OpenLogs(StrategyRef {
                        id: strategy.id.clone(),
                        name: strategy.name.clone(),
                    }));
                }
                ui.end_row();
            }
        });
    }

    fn render_test_form(&mut self, ui: &mut Ui, events: &mut Vec<PageAction>) {
        section_heading(ui, UI_TEXT.strat_test_heading);
        let form = &mut self.state.test;

        ui.horizontal(|ui| {
            ui.add(
                TextEdit::singleline(&mut form.symbol)
                    .hint_text(UI_TEXT.strat_pair_hint)
                    .desired_width(160.0),
            );
            let hint = form.amount_hint();
            ui.add(
                TextEdit::singleline(&mut form.amount)
                    .hint_text(hint)
                    .desired_width(140.0),
            );

            let label = match form.side {
                TradeSide::Buy => "Buy",
                TradeSide::Sell => "Sell",
            };
            if ui.add_enabled(!form.busy, Button::new(label)).clicked() {
                match form.order() {
                    Some((symbol, amount)) => {
                        form.busy = true;
                        events.push(PageAction::TestOrder {
                            side: form.side,
                            symbol,
                            amount,
                        });
                    }
                    None => events.push(PageAction::Invalid(UI_TEXT.invalid_amount)),
                }
            }
            if form.busy {
                ui.spinner();
            }
        });
    }
}

impl<'a> Panel for StrategiesPanel<'a> {
    type Event = PageAction;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        self.render_list(ui, &mut events);
        spaced_separator(ui);
        self.render_test_form(ui, &mut events);

        if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions && !events.is_empty() {
            log::info!("[strategies] {:?}", events);
        }
        events
    }
}

// ============================================================================
// STRATEGY LOGS
// ============================================================================
pub struct LogsPanel<'a> {
    state: &'a mut LogsState,
}

impl<'a> LogsPanel<'a> {
    pub fn new(state: &'a mut LogsState) -> Self {
        Self { state }
    }

    fn render_trades(&self, ui: &mut Ui) {
        if self.state.trade.is_empty() {
            ui.label_subdued(UI_TEXT.strat_no_logs);
            return;
        }
        for line in self.state.trade.iter().rev() {
            match parse_trade_log(line) {
                Some(entry) => {
                    let color = match entry.side {
                        TradeSide::Buy => UI_CONFIG.colors.positive,
                        TradeSide::Sell => UI_CONFIG.colors.negative,
                    };
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(entry.side.label()).strong().color(color));
                        ui.label(entry.pair.as_str());
                        ui.label_subdued(format!("qty {}", entry.qty));
                    });
                }
                None => {
                    ui.label(RichText::new(line).monospace().small());
                }
            }
        }
    }

    fn render_details(&self, ui: &mut Ui) {
        if self.state.detail.is_empty() {
            ui.label_subdued(UI_TEXT.strat_no_logs);
            return;
        }
        for line in self.state.detail.iter().rev() {
            ui.log_line(line, classify_detail(line));
        }
    }
}

impl<'a> Panel for LogsPanel<'a> {
    type Event = PageAction;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = Vec::new();
        if ui.button(UI_TEXT.strat_back).clicked() {
            events.push(PageAction::BackToStrategies);
        }

        let Some(strategy) = self.state.strategy.clone() else {
            ui.label_subdued(UI_TEXT.strat_none);
            return events;
        };
        section_heading(ui, &strategy.name);

        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.state.tab, LogType::Trade, UI_TEXT.strat_tab_trade);
            ui.selectable_value(&mut self.state.tab, LogType::Detail, UI_TEXT.strat_tab_detail);
        });
        ui.separator();

        ScrollArea::vertical()
            .id_salt("strategy_logs")
            .auto_shrink([false, false])
            .show(ui, |ui| match self.state.tab {
                LogType::Trade => self.render_trades(ui),
                LogType::Detail => self.render_details(ui),
            });

        events
    }
}

// ============================================================================
// ASSETS
// ============================================================================
pub struct AssetsPanel<'a> {
    state: &'a AssetsState,
}

impl<'a> AssetsPanel<'a> {
    pub fn new(state: &'a AssetsState) -> Self {
        Self { state }
    }
}

impl<'a> Panel for AssetsPanel<'a> {
    type Event = PageAction;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        section_heading(ui, UI_TEXT.assets_heading);
        if !self.state.loaded {
            ui.spinner();
            return Vec::new();
        }
        if self.state.balances.is_empty() {
            ui.label_subdued(UI_TEXT.assets_none);
            return Vec::new();
        }

        Grid::new("assets_grid").striped(true).num_columns(4).show(ui, |ui| {
            for header in ["Asset", "Free", "Locked", "Total"] {
                ui.label_subheader(header);
            }
            ui.end_row();
            for balance in &self.state.balances {
                ui.label(RichText::new(&balance.asset).strong());
                ui.label(format!("{:.8}", balance.free));
                ui.label(format!("{:.8}", balance.locked));
                ui.label(format!("{:.8}", balance.total()));
                ui.end_row();
            }
        });
        Vec::new()
    }
}
