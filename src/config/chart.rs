//! Chart view-state and plot visualization configuration

use eframe::egui::Color32;

pub struct ChartConfig {
    /// Smallest visible span as a fraction of the full data range (prevents degenerate zoom)
    pub min_span_fraction: f64,
    /// Wheel scale factor when scrolling towards the user (zoom out)
    pub wheel_zoom_out: f64,
    /// Wheel scale factor when scrolling away from the user (zoom in)
    pub wheel_zoom_in: f64,
    /// Candles shown when a series is first loaded or the view is reset
    pub default_visible_candles: usize,
    /// How close (fraction of plot height) the pointer must be to grab a TP/SL line
    pub level_grab_fraction: f64,
    /// Take-profit default offset from the current price when first plotted
    pub take_profit_default_mult: f64,
    /// Stop-loss default offset from the current price when first plotted
    pub stop_loss_default_mult: f64,

    pub bull_color: Color32,
    pub bear_color: Color32,
    pub line_color_up: Color32,
    pub line_color_down: Color32,
    pub annotation_color: Color32,
    pub take_profit_color: Color32,
    pub stop_loss_color: Color32,
    pub crosshair_color: Color32,
    pub selection_fill: Color32,
    /// Body width as a fraction of the candle interval
    pub candle_body_width: f64,
    /// Share of the visible window treated as one interval when only one candle is loaded
    pub single_candle_slot_fraction: f64,
    pub wick_width: f32,
    pub level_line_width: f32,
}

pub const CHART: ChartConfig = ChartConfig {
    min_span_fraction: 0.01,
    wheel_zoom_out: 1.1,
    wheel_zoom_in: 0.9,
    default_visible_candles: 150,
    level_grab_fraction: 0.02,
    take_profit_default_mult: 1.01,
    stop_loss_default_mult: 0.99,

    bull_color: Color32::from_rgb(34, 197, 94),  // Green
    bear_color: Color32::from_rgb(239, 68, 68),  // Red
    line_color_up: Color32::from_rgb(34, 197, 94),
    line_color_down: Color32::from_rgb(239, 68, 68),
    annotation_color: Color32::from_rgb(6, 182, 212), // Cyan
    take_profit_color: Color32::from_rgb(34, 197, 94),
    stop_loss_color: Color32::from_rgb(239, 68, 68),
    crosshair_color: Color32::from_gray(140),
    selection_fill: Color32::from_rgba_premultiplied(6, 182, 212, 40),
    candle_body_width: 0.7,
    single_candle_slot_fraction: 0.5,
    wick_width: 1.0,
    level_line_width: 2.0,
};
