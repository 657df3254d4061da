use eframe::egui::{Button, ComboBox, DragValue, RichText, Slider, TextEdit, Ui};
use strum::IntoEnumIterator;

use crate::api::logs::TradeSide;
use crate::chart::{ChartStyle, LevelKind};
use crate::config::{API, CHART, DEBUG_FLAGS};
use crate::domain::{Interval, Pair};
use crate::ui::app_state::{ChartPageState, MarketPrefs, TicketState};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::ui::ui_panels::Panel;
use crate::ui::ui_plot_view::show_chart;
use crate::ui::utils::{format_pct, format_price, format_volume, section_heading};
use crate::utils::time_utils::epoch_ms_to_chart_label;

#[derive(Debug, Clone, PartialEq)]
pub enum MarketEvent {
    SelectPair(Pair),
    SelectInterval(Interval),
    SelectStyle(ChartStyle),
    /// `amount` is in base currency at `price`
    PlaceOrder {
        side: TradeSide,
        amount: f64,
        price: f64,
    },
    Invalid(&'static str),
}

/// Charts and Manual Trading pages: one chart plus, for trading, the ticket.
pub struct MarketPanel<'a> {
    chart: &'a mut ChartPageState,
    ticket: &'a mut TicketState,
    prefs: &'a MarketPrefs,
}

impl<'a> MarketPanel<'a> {
    pub fn new(
        chart: &'a mut ChartPageState,
        ticket: &'a mut TicketState,
        prefs: &'a MarketPrefs,
    ) -> Self {
        Self {
            chart,
            ticket,
            prefs,
        }
    }

    fn render_selectors(&mut self, ui: &mut Ui) -> Vec<MarketEvent> {
        let mut events = Vec::new();
        ui.horizontal(|ui| {
            let current = self.prefs.pair.display();
            ComboBox::from_id_salt("market_pair")
                .selected_text(current)
                .show_ui(ui, |ui| {
                    for symbol in API.pairs {
                        let pair = Pair::new(symbol);
                        let selected = pair == self.prefs.pair;
                        if ui.selectable_label(selected, pair.display()).clicked() && !selected {
                            events.push(MarketEvent::SelectPair(pair));
                        }
                    }
                });

            ui.separator();
            for interval in Interval::iter() {
                let selected = interval == self.prefs.interval;
                if ui.selectable_label(selected, interval.label()).clicked() && !selected {
                    events.push(MarketEvent::SelectInterval(interval));
                }
            }

            ui.separator();
            for style in ChartStyle::iter() {
                let selected = style == self.chart.view.style();
                if ui.selectable_label(selected, style.label()).clicked() && !selected {
                    events.push(MarketEvent::SelectStyle(style));
                }
            }

            if self.chart.loading {
                ui.spinner();
            }
        });
        events
    }

    fn render_ticker(&self, ui: &mut Ui) {
        let Some(ticker) = self.chart.ticker else {
            return;
        };
        let change_color = if ticker.change_pct >= 0.0 {
            UI_CONFIG.colors.positive
        } else {
            UI_CONFIG.colors.negative
        };
        ui.horizontal(|ui| {
            ui.label(RichText::new(format_price(ticker.price)).size(20.0).strong());
            ui.label(RichText::new(format_pct(ticker.change_pct)).color(change_color));
            ui.separator();
            ui.metric("24h High", &format_price(ticker.high), UI_CONFIG.colors.positive);
            ui.metric("24h Low", &format_price(ticker.low), UI_CONFIG.colors.negative);
            ui.metric("24h Vol", &format_volume(ticker.volume), UI_CONFIG.colors.accent);
        });
        if let Some(err) = &self.chart.error {
            ui.label_warning(err);
        }
    }

    fn render_tools(&mut self, ui: &mut Ui) {
        let variant = self.chart.variant;
        let view = &mut self.chart.view;
        ui.horizontal(|ui| {
            let armed = view.drawing.state().tool();
            for tool in variant.tools {
                if ui.selectable_label(armed == Some(*tool), tool.label()).clicked() {
                    view.drawing.select_tool(*tool);
                    if cfg!(debug_assertions) && DEBUG_FLAGS.print_ui_interactions {
                        log::info!("[chart] Tool {:?}", view.drawing.state());
                    }
                }
            }
            if !variant.tools.is_empty() {
                ui.separator();
            }
            if ui.button(UI_TEXT.chart_reset_view).clicked() {
                view.reset_view();
            }
            if ui
                .add_enabled(!view.drawing.annotations().is_empty(), Button::new(UI_TEXT.chart_undo))
                .clicked()
            {
                view.drawing.undo_last();
            }
            if ui.button(UI_TEXT.chart_clear).clicked() {
                view.drawing.clear();
            }

            // OHLC readout under the crosshair
            if let Some(hover) = view.hovered() {
                if let Some(c) = view.nearest_candle(hover.time) {
                    ui.separator();
                    ui.label_subdued(format!(
                        "{}  O {}  H {}  L {}  C {}",
                        epoch_ms_to_chart_label(c.time),
                        format_price(c.open_price),
                        format_price(c.high_price),
                        format_price(c.low_price),
                        format_price(c.close_price),
                    ));
                }
            }
        });
    }

    fn render_ticket(&mut self, ui: &mut Ui) -> Option<MarketEvent> {
        let mut event = None;
        let price = self.chart.price();
        let base = self.prefs.pair.base().to_string();
        let ticket = &mut *self.ticket;

        section_heading(ui, self.prefs.pair.display());
        ui.horizontal(|ui| {
            ui.selectable_value(&mut ticket.side, TradeSide::Buy, "Buy");
            ui.selectable_value(&mut ticket.side, TradeSide::Sell, "Sell");
        });

        ui.metric(
            UI_TEXT.ticket_price,
            &price.map(format_price).unwrap_or_else(|| "-".to_string()),
            UI_CONFIG.colors.accent,
        );

        ui.label(format!("{} ({})", UI_TEXT.ticket_amount, base));
        ui.add(TextEdit::singleline(&mut ticket.amount).hint_text("0.00"));

        ui.label(UI_TEXT.ticket_leverage);
        ui.add(Slider::new(&mut ticket.leverage, 1..=UI_CONFIG.max_leverage).suffix("x"));

        let (total, cost) = ticket.totals(price);
        ui.metric(UI_TEXT.ticket_total, &format!("{:.2} USDT", total), UI_CONFIG.colors.subdued);
        ui.metric(UI_TEXT.ticket_cost, &format!("{:.2} USDT", cost), UI_CONFIG.colors.subdued);

        ui.add_space(6.0);
        let levels = &mut self.chart.view.levels;
        for (kind, label, color) in [
            (LevelKind::TakeProfit, UI_TEXT.ticket_take_profit, CHART.take_profit_color),
            (LevelKind::StopLoss, UI_TEXT.ticket_stop_loss, CHART.stop_loss_color),
        ] {
            ui.horizontal(|ui| {
                let mut shown = levels.get(kind).is_some();
                if ui.checkbox(&mut shown, RichText::new(label).color(color)).changed() {
                    if let Some(p) = price {
                        levels.toggle(kind, p);
                    }
                }
                if let Some(mut value) = levels.get(kind) {
                    let speed = (value * 0.0005).max(0.01);
                    if ui.add(DragValue::new(&mut value).speed(speed).max_decimals(2)).changed() {
                        levels.set(kind, value);
                    }
                }
            });
        }

        ui.add_space(8.0);
        let (verb, color) = match ticket.side {
            TradeSide::Buy => ("Buy", UI_CONFIG.colors.positive),
            TradeSide::Sell => ("Sell", UI_CONFIG.colors.negative),
        };
        let button = Button::new(RichText::new(format!("{} {}", verb, base)).strong())
            .fill(color.linear_multiply(0.4))
            .min_size([UI_CONFIG.ticket_width - 20.0, 28.0].into());
        if ui.add_enabled(!ticket.busy, button).clicked() {
            event = match (ticket.amount_value(), price) {
                (Some(amount), Some(price)) => {
                    ticket.busy = true;
                    Some(MarketEvent::PlaceOrder {
                        side: ticket.side,
                        amount,
                        price,
                    })
                }
                _ => Some(MarketEvent::Invalid(UI_TEXT.invalid_amount)),
            };
        }
        if ticket.busy {
            ui.spinner();
        }
        event
    }
}

impl<'a> Panel for MarketPanel<'a> {
    type Event = MarketEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event> {
        let mut events = self.render_selectors(ui);
        self.render_ticker(ui);
        if self.chart.variant.is_interactive() {
            self.render_tools(ui);
        }
        ui.separator();

        if !self.chart.variant.trade_overlay {
            show_chart(ui, "market_chart", self.chart, UI_CONFIG.chart_height);
            return events;
        }

        let chart_width = (ui.available_width() - UI_CONFIG.ticket_width).max(200.0);
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                ui.set_width(chart_width);
                show_chart(ui, "trade_chart", self.chart, UI_CONFIG.chart_height);
            });
            ui.vertical(|ui| {
                ui.set_width(UI_CONFIG.ticket_width);
                if let Some(event) = self.render_ticket(ui) {
                    events.push(event);
                }
            });
        });
        events
    }
}
