use crate::config::{CHART, DEBUG_FLAGS};
use crate::domain::{Candle, sanitize_series};
use crate::utils::maths_utils::{finite_min_max, fraction_of, lerp};

use super::drawing::{ChartPoint, DrawingBoard};
use super::levels::{LevelKind, OrderLevels};
use super::variant::ChartStyle;
use super::view_domain::{DataBounds, ViewDomain, YRange, clamp_domain};

/// Price window for the visible candles. Empty input yields `[0, 1]`.
pub fn compute_y_range(visible: &[Candle], style: ChartStyle) -> YRange {
    let extremes = match style {
        ChartStyle::Line => finite_min_max(visible.iter().map(|c| c.close_price)),
        ChartStyle::Candle => {
            let lows = finite_min_max(visible.iter().map(|c| c.low_price));
            let highs = finite_min_max(visible.iter().map(|c| c.high_price));
            match (lows, highs) {
                (Some((low, _)), Some((_, high))) => Some((low, high)),
                _ => None,
            }
        }
    };

    match extremes {
        Some((low, high)) => YRange::padded(low, high),
        None => YRange::default(),
    }
}

/// Drag-select in progress, in data time.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Selection {
    start: f64,
    current: f64,
}

/// Everything one chart instance remembers between frames.
#[derive(Debug)]
pub struct ChartViewState {
    candles: Vec<Candle>,
    bounds: Option<DataBounds>,
    domain: Option<ViewDomain>,
    y_range: YRange,
    style: ChartStyle,
    min_span_fraction: f64,
    selection: Option<Selection>,
    hover: Option<ChartPoint>,
    pub drawing: DrawingBoard,
    pub levels: OrderLevels,
}

impl Default for ChartViewState {
    fn default() -> Self {
        Self::new(ChartStyle::default())
    }
}

impl ChartViewState {
    pub fn new(style: ChartStyle) -> Self {
        Self {
            candles: Vec::new(),
            bounds: None,
            domain: None,
            y_range: YRange::default(),
            style,
            min_span_fraction: CHART.min_span_fraction,
            selection: None,
            hover: None,
            drawing: DrawingBoard::default(),
            levels: OrderLevels::default(),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn bounds(&self) -> Option<DataBounds> {
        self.bounds
    }

    pub fn domain(&self) -> Option<ViewDomain> {
        self.domain
    }

    pub fn y_range(&self) -> YRange {
        self.y_range
    }

    pub fn style(&self) -> ChartStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ChartStyle) {
        self.style = style;
        self.refresh_y_range();
    }

    pub fn last_price(&self) -> Option<f64> {
        self.candles.last().map(|c| c.close_price)
    }

    /// Smallest gap between consecutive candles, used as the bar width.
    pub fn bar_ms(&self) -> Option<f64> {
        finite_min_max(
            self.candles
                .windows(2)
                .map(|w| w[1].time - w[0].time)
                .filter(|gap| *gap > 0.0),
        )
        .map(|(min, _)| min)
    }

    /// Replace the series.
    ///
    /// The current window survives a refresh (re-clamped to the new bounds), and a
    /// window touching the newest candle keeps following it. `reset` (pair or
    /// interval change) drops the window, selection and annotations instead.
    pub fn set_candles(&mut self, series: Vec<Candle>, reset: bool) {
        let previous_bounds = self.bounds;
        let previous_domain = self.domain;

        self.candles = sanitize_series(series);
        self.bounds = DataBounds::from_candles(&self.candles);

        if reset {
            self.selection = None;
            self.hover = None;
            self.drawing.clear();
            self.levels = OrderLevels::default();
        }

        self.domain = match (self.bounds, previous_domain) {
            (None, _) => None,
            (Some(bounds), Some(domain)) if !reset => {
                let pinned_to_edge = previous_bounds.is_some_and(|pb| domain.right >= pb.max);
                if pinned_to_edge {
                    let span = domain.span();
                    Some(self.clamp(bounds.max - span, bounds.max, bounds))
                } else {
                    Some(self.clamp(domain.left, domain.right, bounds))
                }
            }
            (Some(bounds), _) => Some(self.default_domain(bounds)),
        };

        self.refresh_y_range();
    }

    /// Back to the last `CHART.default_visible_candles` candles.
    pub fn reset_view(&mut self) {
        self.selection = None;
        if let Some(bounds) = self.bounds {
            let domain = self.default_domain(bounds);
            self.apply_domain(domain);
        }
    }

    fn default_domain(&self, bounds: DataBounds) -> ViewDomain {
        let n = CHART.default_visible_candles;
        let left = if self.candles.len() > n {
            self.candles[self.candles.len() - n].time
        } else {
            bounds.min
        };
        self.clamp(left, bounds.max, bounds)
    }

    fn clamp(&self, left: f64, right: f64, bounds: DataBounds) -> ViewDomain {
        clamp_domain(left, right, bounds, self.min_span_fraction)
    }

    /// Clamp and store a requested window, then refit the y-range.
    pub fn set_domain(&mut self, left: f64, right: f64) {
        if let Some(bounds) = self.bounds {
            let domain = self.clamp(left, right, bounds);
            self.apply_domain(domain);
        }
    }

    fn apply_domain(&mut self, domain: ViewDomain) {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_chart_events && self.domain != Some(domain)
        {
            log::info!("Chart domain -> [{:.0}, {:.0}]", domain.left, domain.right);
        }
        self.domain = Some(domain);
        self.refresh_y_range();
    }

    fn refresh_y_range(&mut self) {
        self.y_range = compute_y_range(self.visible_candles(), self.style);
    }

    /// Candles whose time lies inside the current window.
    pub fn visible_candles(&self) -> &[Candle] {
        let Some(domain) = self.domain else {
            return &[];
        };
        let start = self.candles.partition_point(|c| c.time < domain.left);
        let end = self.candles.partition_point(|c| c.time <= domain.right);
        if start >= end {
            return &[];
        }
        &self.candles[start..end]
    }

    /// Shift the window by a pointer drag. Positive `delta_pixels` (drag right) reveals earlier data.
    pub fn pan(&mut self, delta_pixels: f64, plot_width_pixels: f64) {
        if !(plot_width_pixels > 0.0) || !delta_pixels.is_finite() {
            return;
        }
        let Some(domain) = self.domain else {
            return;
        };
        let delta_time = -delta_pixels * domain.span() / plot_width_pixels;
        self.set_domain(domain.left + delta_time, domain.right + delta_time);
    }

    /// Scale the span around `focal_time`. `scale_factor > 1` zooms out.
    pub fn zoom(&mut self, focal_time: f64, scale_factor: f64) {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return;
        }
        let Some(domain) = self.domain else {
            return;
        };
        let focal = if focal_time.is_finite() {
            focal_time
        } else {
            domain.center()
        };
        let left = focal - (focal - domain.left) * scale_factor;
        let right = focal + (domain.right - focal) * scale_factor;
        self.set_domain(left, right);
    }

    /// Wheel input. Positive `scroll_delta` (scrolling up) zooms in.
    pub fn wheel(&mut self, focal_time: f64, scroll_delta: f64) {
        if scroll_delta > 0.0 {
            self.zoom(focal_time, CHART.wheel_zoom_in);
        } else if scroll_delta < 0.0 {
            self.zoom(focal_time, CHART.wheel_zoom_out);
        }
    }

    /// Zoom to `[min, max]` of the two times if they are further apart than the minimum span.
    pub fn drag_select_zoom(&mut self, start_time: f64, end_time: f64) -> bool {
        let Some(bounds) = self.bounds else {
            return false;
        };
        if !start_time.is_finite() || !end_time.is_finite() {
            return false;
        }
        if (end_time - start_time).abs() <= bounds.min_span(self.min_span_fraction) {
            return false;
        }
        self.set_domain(start_time.min(end_time), start_time.max(end_time));
        true
    }

    pub fn begin_selection(&mut self, time: f64) {
        if time.is_finite() && self.bounds.is_some() {
            self.selection = Some(Selection {
                start: time,
                current: time,
            });
        }
    }

    pub fn update_selection(&mut self, time: f64) {
        if let Some(selection) = self.selection.as_mut() {
            if time.is_finite() {
                selection.current = time;
            }
        }
    }

    /// Complete the drag-select. Returns true if the view zoomed.
    pub fn finish_selection(&mut self) -> bool {
        match self.selection.take() {
            Some(selection) => self.drag_select_zoom(selection.start, selection.current),
            None => false,
        }
    }

    pub fn cancel_selection(&mut self) {
        self.selection = None;
    }

    /// Ordered `(from, to)` of the selection being dragged, for shading.
    pub fn selection(&self) -> Option<(f64, f64)> {
        self.selection
            .map(|s| (s.start.min(s.current), s.start.max(s.current)))
    }

    pub fn hover(&mut self, point: ChartPoint) {
        self.hover = (point.time.is_finite() && point.price.is_finite()).then_some(point);
    }

    pub fn clear_hover(&mut self) {
        self.hover = None;
    }

    pub fn hovered(&self) -> Option<ChartPoint> {
        self.hover
    }

    /// Candle closest in time to `time`.
    pub fn nearest_candle(&self, time: f64) -> Option<&Candle> {
        if !time.is_finite() {
            return None;
        }
        let idx = self.candles.partition_point(|c| c.time < time);
        let after = self.candles.get(idx);
        let before = idx.checked_sub(1).and_then(|i| self.candles.get(i));
        match (before, after) {
            (Some(b), Some(a)) => Some(if time - b.time <= a.time - time { b } else { a }),
            (b, a) => b.or(a),
        }
    }

    // Coordinate mapping. Fractions run 0..1 from left and from bottom.
    // egui_plot positions its own items; level grabbing uses `price_to_y_fraction`,
    // and the rest are public for library users drawing overlays of their own.

    fn time_window(&self) -> (f64, f64) {
        self.domain.map_or((0.0, 1.0), |d| (d.left, d.right))
    }

    pub fn time_to_x_fraction(&self, time: f64) -> f64 {
        let (left, right) = self.time_window();
        fraction_of(time, left, right)
    }

    pub fn x_fraction_to_time(&self, fraction: f64) -> f64 {
        let (left, right) = self.time_window();
        lerp(left, right, fraction)
    }

    pub fn price_to_y_fraction(&self, price: f64) -> f64 {
        fraction_of(price, self.y_range.low, self.y_range.high)
    }

    pub fn y_fraction_to_price(&self, fraction: f64) -> f64 {
        lerp(self.y_range.low, self.y_range.high, fraction)
    }

    /// Pick up the TP/SL line under the pointer, with the tolerance measured in plot height.
    pub fn grab_level(&mut self, pointer_price: f64) -> Option<LevelKind> {
        let mut levels = std::mem::take(&mut self.levels);
        let grabbed = levels.grab(pointer_price, |price| self.price_to_y_fraction(price));
        self.levels = levels;
        grabbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(i as f64, 10.0, 12.0, 9.0, 11.0, 1.0))
            .collect()
    }

    fn loaded(n: usize) -> ChartViewState {
        let mut state = ChartViewState::new(ChartStyle::Candle);
        state.set_candles(flat_series(n), true);
        state
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_slice_y_range_is_unit() {
        let r = compute_y_range(&[], ChartStyle::Candle);
        assert_eq!(r, YRange { low: 0.0, high: 1.0 });
        let r = compute_y_range(&[], ChartStyle::Line);
        assert!(r.low.is_finite() && r.high.is_finite());
    }

    #[test]
    fn candle_y_range_uses_lows_and_highs() {
        let mut state = ChartViewState::new(ChartStyle::Candle);
        state.set_candles(
            vec![
                Candle::new(0.0, 10.0, 12.0, 9.0, 11.0, 1.0),
                Candle::new(1.0, 11.0, 13.0, 10.0, 12.0, 1.0),
            ],
            true,
        );
        state.set_domain(0.0, 1.0);
        assert_eq!(state.y_range(), YRange { low: 9.0, high: 13.0 });

        state.set_style(ChartStyle::Line);
        assert_eq!(state.y_range(), YRange { low: 11.0, high: 12.0 });
    }

    #[test]
    fn drag_select_orders_reversed_endpoints() {
        let mut state = loaded(11); // bounds [0, 10]
        state.set_domain(0.0, 10.0);

        state.begin_selection(5.0);
        state.update_selection(2.0);
        assert_eq!(state.selection(), Some((2.0, 5.0)));
        assert!(state.finish_selection());

        assert_eq!(state.domain(), Some(ViewDomain::new(2.0, 5.0)));
        assert_eq!(state.selection(), None);
    }

    #[test]
    fn level_grab_tolerance_follows_plot_height() {
        let mut state = loaded(11); // y-range [9, 12]
        state.levels.toggle(LevelKind::TakeProfit, 11.0);
        assert_eq!(state.levels.take_profit, Some(11.11));

        assert_eq!(state.grab_level(11.5), None);
        assert_eq!(state.grab_level(11.13), Some(LevelKind::TakeProfit));
        assert_eq!(state.levels.dragging(), Some(LevelKind::TakeProfit));
        assert!(approx(state.price_to_y_fraction(10.5), 0.5));
    }

    #[test]
    fn tiny_drag_select_is_cancelled() {
        let mut state = loaded(11);
        let before = state.domain();
        assert!(!state.drag_select_zoom(5.0, 5.05));
        assert_eq!(state.domain(), before);
    }

    #[test]
    fn pan_there_and_back_restores_domain() {
        let mut state = loaded(1001);
        state.set_domain(400.0, 600.0);

        state.pan(50.0, 800.0);
        let moved = state.domain().expect("domain");
        assert!(approx(moved.left, 387.5) && approx(moved.right, 587.5));

        state.pan(-50.0, 800.0);
        let back = state.domain().expect("domain");
        assert!(approx(back.left, 400.0) && approx(back.right, 600.0));
    }

    #[test]
    fn pan_ignores_degenerate_width() {
        let mut state = loaded(1001);
        state.set_domain(400.0, 600.0);
        state.pan(50.0, 0.0);
        state.pan(50.0, -10.0);
        assert_eq!(state.domain(), Some(ViewDomain::new(400.0, 600.0)));
    }

    #[test]
    fn zoom_out_then_in_restores_domain() {
        let mut state = loaded(1001);
        state.set_domain(400.0, 600.0);

        state.zoom(450.0, 1.1);
        let out = state.domain().expect("domain");
        assert!(approx(out.left, 395.0) && approx(out.right, 615.0));

        state.zoom(450.0, 1.0 / 1.1);
        let back = state.domain().expect("domain");
        assert!(approx(back.left, 400.0) && approx(back.right, 600.0));
    }

    #[test]
    fn zoom_ignores_bad_factors() {
        let mut state = loaded(1001);
        state.set_domain(400.0, 600.0);
        state.zoom(500.0, 0.0);
        state.zoom(500.0, f64::NAN);
        state.zoom(500.0, -2.0);
        assert_eq!(state.domain(), Some(ViewDomain::new(400.0, 600.0)));
    }

    #[test]
    fn wheel_direction_picks_factor() {
        let mut state = loaded(1001);
        state.set_domain(400.0, 600.0);
        state.wheel(500.0, 1.0);
        assert!(state.domain().expect("domain").span() < 200.0);
        state.set_domain(400.0, 600.0);
        state.wheel(500.0, -1.0);
        assert!(state.domain().expect("domain").span() > 200.0);
    }

    #[test]
    fn default_domain_shows_latest_candles() {
        let state = loaded(1001);
        let n = CHART.default_visible_candles as f64;
        assert_eq!(state.domain(), Some(ViewDomain::new(1001.0 - n, 1000.0)));
        assert_eq!(state.visible_candles().len(), CHART.default_visible_candles);
    }

    #[test]
    fn refresh_keeps_user_window() {
        let mut state = loaded(1001);
        state.set_domain(100.0, 300.0);
        state.set_candles(flat_series(1001), false);
        assert_eq!(state.domain(), Some(ViewDomain::new(100.0, 300.0)));

        state.set_candles(flat_series(1001), true);
        assert_ne!(state.domain(), Some(ViewDomain::new(100.0, 300.0)));
    }

    #[test]
    fn window_at_live_edge_follows_new_candles() {
        let mut state = loaded(1001);
        state.set_domain(800.0, 1000.0);
        state.set_candles(flat_series(1011), false);
        assert_eq!(state.domain(), Some(ViewDomain::new(810.0, 1010.0)));
    }

    #[test]
    fn reset_view_restores_default() {
        let mut state = loaded(1001);
        let initial = state.domain();
        state.set_domain(10.0, 50.0);
        state.reset_view();
        assert_eq!(state.domain(), initial);
    }

    #[test]
    fn malformed_series_yields_empty_view() {
        let mut state = ChartViewState::default();
        state.set_candles(vec![Candle::new(0.0, 10.0, 5.0, 9.0, 11.0, 1.0)], true);
        assert!(state.visible_candles().is_empty());
        assert_eq!(state.domain(), None);
        assert_eq!(state.y_range(), YRange::default());
    }

    #[test]
    fn coordinate_mapping_round_trips() {
        let mut state = loaded(1001);
        state.set_domain(400.0, 600.0);
        assert!(approx(state.time_to_x_fraction(450.0), 0.25));
        assert!(approx(state.x_fraction_to_time(0.25), 450.0));

        let y = state.y_range();
        assert!(approx(state.price_to_y_fraction(y.low), 0.0));
        assert!(approx(state.y_fraction_to_price(1.0), y.high));
    }

    #[test]
    fn mapping_without_data_never_divides_by_zero() {
        let state = ChartViewState::default();
        assert!(state.time_to_x_fraction(5.0).is_finite());
        assert!(state.price_to_y_fraction(5.0).is_finite());
    }

    #[test]
    fn nearest_candle_picks_closest_time() {
        let state = loaded(5);
        assert_eq!(state.nearest_candle(2.4).map(|c| c.time), Some(2.0));
        assert_eq!(state.nearest_candle(2.6).map(|c| c.time), Some(3.0));
        assert_eq!(state.nearest_candle(99.0).map(|c| c.time), Some(4.0));
    }

    #[test]
    fn reset_clears_annotations() {
        let mut state = loaded(10);
        state
            .drawing
            .add_marker(crate::chart::Annotation::Buy { time: 1.0, price: 10.0 });
        state.set_candles(flat_series(10), false);
        assert_eq!(state.drawing.annotations().len(), 1);
        state.set_candles(flat_series(10), true);
        assert!(state.drawing.annotations().is_empty());
    }
}
