use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// The visible time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewDomain {
    pub left: f64,
    pub right: f64,
}

impl ViewDomain {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    pub fn span(&self) -> f64 {
        self.right - self.left
    }

    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.left && time <= self.right
    }
}

/// Time extent of the loaded series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub min: f64,
    pub max: f64,
}

impl DataBounds {
    /// A single-point extent is widened to one millisecond so every derived span stays positive.
    pub fn new(min: f64, max: f64) -> Self {
        if max > min {
            Self { min, max }
        } else {
            Self { min, max: min + 1.0 }
        }
    }

    /// Extent of a time-sorted series. `None` for an empty one.
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let first = candles.first()?;
        let last = candles.last()?;
        Some(Self::new(first.time, last.time))
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn min_span(&self, min_span_fraction: f64) -> f64 {
        let fraction = if min_span_fraction.is_finite() {
            min_span_fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.span() * fraction
    }

    pub fn full(&self) -> ViewDomain {
        ViewDomain::new(self.min, self.max)
    }
}

/// Vertical price window. Always `low < high` when built through [`YRange::padded`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YRange {
    pub low: f64,
    pub high: f64,
}

impl Default for YRange {
    fn default() -> Self {
        Self { low: 0.0, high: 1.0 }
    }
}

impl YRange {
    /// Builds a range from observed extremes, padding a flat range so it never collapses.
    pub fn padded(low: f64, high: f64) -> Self {
        if high > low {
            return Self { low, high };
        }
        let pad = (low.abs() * 0.01).max(0.5);
        Self {
            low: low - pad,
            high: low + pad,
        }
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }
}

/// Constrain a requested window to the data.
///
/// Applied in order:
/// 1. inverted or non-finite input resets to the full range
/// 2. a span at least as wide as the data collapses to the full range
/// 3. a span narrower than the minimum is re-centred at the minimum span
/// 4. a window hanging off either end is shifted back inside, keeping its span
pub fn clamp_domain(
    left: f64,
    right: f64,
    bounds: DataBounds,
    min_span_fraction: f64,
) -> ViewDomain {
    if !left.is_finite() || !right.is_finite() || left >= right {
        return bounds.full();
    }

    let requested = right - left;
    if requested >= bounds.span() {
        return bounds.full();
    }

    let min_span = bounds.min_span(min_span_fraction);
    let (mut left, mut right) = (left, right);
    if requested < min_span {
        let center = (left + right) / 2.0;
        left = center - min_span / 2.0;
        right = center + min_span / 2.0;
    }

    let span = right - left;
    if left < bounds.min {
        left = bounds.min;
        right = left + span;
    }
    if right > bounds.max {
        right = bounds.max;
        left = right - span;
    }

    ViewDomain::new(left, right)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRACTION: f64 = 0.01;

    fn bounds() -> DataBounds {
        DataBounds::new(0.0, 1000.0)
    }

    fn assert_invariants(d: ViewDomain, b: DataBounds) {
        assert!(d.left < d.right, "{:?} not ordered", d);
        assert!(d.left >= b.min && d.right <= b.max, "{:?} escapes {:?}", d, b);
        assert!(d.span() >= b.min_span(FRACTION) - 1e-9, "{:?} below min span", d);
    }

    #[test]
    fn clamp_output_always_satisfies_invariants() {
        let b = bounds();
        let requests = [
            (100.0, 200.0),
            (-50.0, 50.0),
            (950.0, 1100.0),
            (-10.0, 2000.0),
            (500.0, 500.5),
            (-5.0, -4.0),
            (2000.0, 2001.0),
            (300.0, 100.0),
            (f64::NAN, 10.0),
            (0.0, f64::INFINITY),
        ];
        for (l, r) in requests {
            assert_invariants(clamp_domain(l, r, b, FRACTION), b);
        }
    }

    #[test]
    fn clamp_is_idempotent() {
        let b = bounds();
        for (l, r) in [(100.0, 200.0), (-50.0, 50.0), (500.0, 500.5), (990.0, 1500.0)] {
            let once = clamp_domain(l, r, b, FRACTION);
            let twice = clamp_domain(once.left, once.right, b, FRACTION);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn overflow_on_one_side_preserves_span() {
        let d = clamp_domain(-50.0, 50.0, bounds(), FRACTION);
        assert_eq!(d, ViewDomain::new(0.0, 100.0));

        let d = clamp_domain(950.0, 1050.0, bounds(), FRACTION);
        assert_eq!(d, ViewDomain::new(900.0, 1000.0));
    }

    #[test]
    fn tiny_span_is_recentred_at_minimum() {
        let d = clamp_domain(500.0, 501.0, bounds(), FRACTION);
        assert_eq!(d, ViewDomain::new(495.5, 505.5));
    }

    #[test]
    fn inverted_or_oversized_request_resets_to_full_range() {
        assert_eq!(clamp_domain(300.0, 100.0, bounds(), FRACTION), bounds().full());
        assert_eq!(clamp_domain(5.0, 5.0, bounds(), FRACTION), bounds().full());
        assert_eq!(clamp_domain(-10.0, 2000.0, bounds(), FRACTION), bounds().full());
    }

    #[test]
    fn single_point_bounds_are_widened() {
        let b = DataBounds::new(42.0, 42.0);
        assert!(b.span() > 0.0);
        assert_invariants(clamp_domain(0.0, 100.0, b, FRACTION), b);
    }

    #[test]
    fn flat_y_range_is_padded() {
        let r = YRange::padded(100.0, 100.0);
        assert_eq!(r, YRange { low: 99.0, high: 101.0 });

        let r = YRange::padded(0.0, 0.0);
        assert_eq!(r, YRange { low: -0.5, high: 0.5 });
    }
}
