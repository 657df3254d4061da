use eframe::egui::{Color32, RichText, Stroke};
use egui_plot::{HLine, Line, LineStyle, MarkerShape, PlotPoint, PlotPoints, PlotUi, Points, Polygon, Text, VLine};

use crate::chart::{Annotation, ChartStyle, ChartVariant, ChartViewState, LevelKind};
use crate::config::CHART;
use crate::domain::CandleType;
use crate::ui::utils::{format_pct, format_price};
use crate::utils::time_utils::format_span_ms;

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub view: &'a ChartViewState,
    pub variant: &'a ChartVariant,
    /// Ticker price, else last close
    pub price: Option<f64>,
    pub x_min: f64,
    pub x_max: f64,
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. CANDLE LAYER
// ============================================================================
pub struct CandleLayer;

impl PlotLayer for CandleLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if ctx.view.style() != ChartStyle::Candle {
            return;
        }
        let half_body = body_half_width(ctx.view.bar_ms(), ctx.x_max - ctx.x_min);

        for candle in ctx.view.visible_candles() {
            let color = match candle.get_type() {
                CandleType::Bullish => CHART.bull_color,
                CandleType::Bearish => CHART.bear_color,
            };
            let label = match candle.get_type() {
                CandleType::Bullish => "Bullish",
                CandleType::Bearish => "Bearish",
            };

            plot_ui.line(
                Line::new(
                    label,
                    PlotPoints::new(vec![
                        [candle.time, candle.low_price],
                        [candle.time, candle.high_price],
                    ]),
                )
                .color(color)
                .width(CHART.wick_width),
            );

            let (body_low, body_high) = candle.body_range();
            // Doji still gets a visible sliver
            let body_high = if body_high - body_low < f64::EPSILON {
                body_low + (ctx.view.y_range().span() * 0.001)
            } else {
                body_high
            };
            let body = PlotPoints::new(vec![
                [candle.time - half_body, body_low],
                [candle.time + half_body, body_low],
                [candle.time + half_body, body_high],
                [candle.time - half_body, body_high],
            ]);
            plot_ui.polygon(
                Polygon::new(label, body)
                    .fill_color(color)
                    .stroke(Stroke::new(1.0, color)),
            );
        }
    }
}

/// Half the body width in ms. A lone candle has no neighbour gap, so it takes
/// a share of the visible window instead.
fn body_half_width(bar_ms: Option<f64>, window_ms: f64) -> f64 {
    let slot = bar_ms.unwrap_or(window_ms * CHART.single_candle_slot_fraction);
    slot * CHART.candle_body_width / 2.0
}

// ============================================================================
// 2. LINE LAYER (Close prices)
// ============================================================================
pub struct CloseLineLayer;

impl PlotLayer for CloseLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if ctx.view.style() != ChartStyle::Line {
            return;
        }
        let visible = ctx.view.visible_candles();
        let (Some(first), Some(last)) = (visible.first(), visible.last()) else {
            return;
        };
        let color = if last.close_price >= first.close_price {
            CHART.line_color_up
        } else {
            CHART.line_color_down
        };
        let points: PlotPoints = visible.iter().map(|c| [c.time, c.close_price]).collect();
        plot_ui.line(Line::new("Close", points).color(color).width(2.0));
    }
}

// ============================================================================
// 3. CURRENT PRICE LAYER
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some(price) = ctx.price {
            plot_ui.hline(
                HLine::new("Current Price", price)
                    .color(CHART.crosshair_color)
                    .width(1.0)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

// ============================================================================
// 4. ANNOTATION LAYER (Trend lines, H/V lines, trade markers)
// ============================================================================
pub struct AnnotationLayer;

impl PlotLayer for AnnotationLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let color = CHART.annotation_color;

        for annotation in ctx.view.drawing.annotations() {
            match *annotation {
                Annotation::TrendLine { x1, y1, x2, y2 } => {
                    plot_ui.line(
                        Line::new("Trend Line", PlotPoints::new(vec![[x1, y1], [x2, y2]]))
                            .color(color)
                            .width(1.5),
                    );
                }
                Annotation::HLine { price } => {
                    plot_ui.hline(HLine::new("Horizontal Line", price).color(color).width(1.0));
                }
                Annotation::VLine { time } => {
                    plot_ui.vline(VLine::new("Vertical Line", time).color(color).width(1.0));
                }
                Annotation::Buy { time, price } => {
                    if ctx.variant.trade_overlay {
                        draw_marker(plot_ui, "Buy", time, price, MarkerShape::Up, CHART.bull_color);
                    }
                }
                Annotation::Sell { time, price } => {
                    if ctx.variant.trade_overlay {
                        draw_marker(plot_ui, "Sell", time, price, MarkerShape::Down, CHART.bear_color);
                    }
                }
            }
        }

        // First click of a two-point tool
        if let Some(anchor) = ctx.view.drawing.pending_anchor() {
            plot_ui.points(
                Points::new("Anchor", vec![[anchor.time, anchor.price]])
                    .shape(MarkerShape::Circle)
                    .radius(4.0)
                    .color(color),
            );
            if let Some(hover) = ctx.view.hovered() {
                plot_ui.line(
                    Line::new(
                        "Trend Line",
                        PlotPoints::new(vec![[anchor.time, anchor.price], [hover.time, hover.price]]),
                    )
                    .color(color.linear_multiply(0.5))
                    .style(LineStyle::dashed_dense()),
                );
            }
        }
    }
}

fn draw_marker(plot_ui: &mut PlotUi, label: &str, time: f64, price: f64, shape: MarkerShape, color: Color32) {
    plot_ui.points(
        Points::new(label, vec![[time, price]])
            .shape(shape)
            .filled(true)
            .radius(7.0)
            .color(color),
    );
}

// ============================================================================
// 5. ORDER LEVEL LAYER (TP / SL)
// ============================================================================
pub struct OrderLevelLayer;

impl PlotLayer for OrderLevelLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if !ctx.variant.trade_overlay {
            return;
        }
        let levels = &ctx.view.levels;
        for kind in [LevelKind::TakeProfit, LevelKind::StopLoss] {
            let Some(price) = levels.get(kind) else {
                continue;
            };
            let color = match kind {
                LevelKind::TakeProfit => CHART.take_profit_color,
                LevelKind::StopLoss => CHART.stop_loss_color,
            };
            let width = if levels.dragging() == Some(kind) {
                CHART.level_line_width * 1.5
            } else {
                CHART.level_line_width
            };
            plot_ui.hline(
                HLine::new(kind.label(), price)
                    .color(color)
                    .width(width)
                    .style(LineStyle::dashed_dense()),
            );
            plot_ui.text(
                Text::new(
                    kind.label(),
                    PlotPoint::new(ctx.x_min, price),
                    RichText::new(format!("{} {}", kind.label(), format_price(price))).color(color),
                )
                .anchor(eframe::egui::Align2::LEFT_BOTTOM),
            );
        }
    }
}

// ============================================================================
// 6. SELECTION LAYER (Drag-to-zoom shading)
// ============================================================================
pub struct SelectionLayer;

impl PlotLayer for SelectionLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some((from, to)) = ctx.view.selection() else {
            return;
        };
        let y = ctx.view.y_range();
        let points = PlotPoints::new(vec![
            [from, y.low],
            [to, y.low],
            [to, y.high],
            [from, y.high],
        ]);
        plot_ui.polygon(
            Polygon::new("Selection", points)
                .fill_color(CHART.selection_fill)
                .stroke(Stroke::new(1.0, CHART.annotation_color)),
        );
    }
}

// ============================================================================
// 7. MEASURE LAYER
// ============================================================================
pub struct MeasureLayer;

impl PlotLayer for MeasureLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(m) = ctx.view.drawing.measurement() else {
            return;
        };
        let color = if m.price_delta >= 0.0 {
            CHART.bull_color
        } else {
            CHART.bear_color
        };
        let points = PlotPoints::new(vec![
            [m.from.time, m.from.price],
            [m.to.time, m.from.price],
            [m.to.time, m.to.price],
            [m.from.time, m.to.price],
        ]);
        plot_ui.polygon(
            Polygon::new("Measure", points)
                .fill_color(color.linear_multiply(0.15))
                .stroke(Stroke::new(1.0, color)),
        );

        let readout = format!(
            "{} ({})\n{} bars, {}",
            format_price(m.price_delta),
            format_pct(m.price_delta_pct),
            m.bars,
            format_span_ms(m.time_delta)
        );
        plot_ui.text(
            Text::new("Measure", PlotPoint::new(m.to.time, m.to.price), RichText::new(readout).color(color))
                .anchor(eframe::egui::Align2::LEFT_BOTTOM),
        );
    }
}

// ============================================================================
// 8. CROSSHAIR LAYER
// ============================================================================
pub struct CrosshairLayer;

impl PlotLayer for CrosshairLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(hover) = ctx.view.hovered() else {
            return;
        };
        let color = CHART.crosshair_color;
        plot_ui.vline(
            VLine::new("Crosshair", hover.time)
                .color(color)
                .width(0.5)
                .style(LineStyle::dashed_dense()),
        );
        plot_ui.hline(
            HLine::new("Crosshair", hover.price)
                .color(color)
                .width(0.5)
                .style(LineStyle::dashed_dense()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_width_uses_candle_gap() {
        let half = body_half_width(Some(60_000.0), 9_000_000.0);
        assert!((half - 60_000.0 * CHART.candle_body_width / 2.0).abs() < 1e-9);
    }

    #[test]
    fn lone_candle_still_gets_a_body() {
        let half = body_half_width(None, 1_000.0);
        assert!(half > 0.0);
        assert!(half < 1_000.0);
    }
}
