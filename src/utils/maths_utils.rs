use itertools::{Itertools, MinMaxResult};

/// Min and max of the finite values in `values`.
/// Returns `None` when nothing finite is left (empty or all NaN/inf).
pub fn finite_min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let finite = values.into_iter().filter(|v| v.is_finite());
    // Only finite values reach here, so total_cmp matches numeric order
    match finite.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

/// Linear map of `value` into [0, 1] relative to `lo..hi`.
/// Degenerate or non-finite ranges map to 0.0 instead of dividing by zero.
pub fn fraction_of(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value - lo) / span
}

/// Inverse of [`fraction_of`].
pub fn lerp(lo: f64, hi: f64, fraction: f64) -> f64 {
    lo + (hi - lo) * fraction
}

/// Round to cents, the precision the order forms work in.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_skips_non_finite_values() {
        let values = vec![3.0, f64::NAN, -1.0, f64::INFINITY, 7.5];
        assert_eq!(finite_min_max(values), Some((-1.0, 7.5)));
    }

    #[test]
    fn min_max_of_nothing_is_none() {
        assert_eq!(finite_min_max(Vec::<f64>::new()), None);
        assert_eq!(finite_min_max(vec![f64::NAN]), None);
    }

    #[test]
    fn fraction_handles_degenerate_range() {
        assert_eq!(fraction_of(5.0, 5.0, 5.0), 0.0);
        assert_eq!(fraction_of(7.5, 5.0, 10.0), 0.5);
        assert_eq!(lerp(5.0, 10.0, 0.5), 7.5);
    }

    #[test]
    fn rounds_to_cents() {
        assert_eq!(round_to_cents(101.006), 101.01);
        assert_eq!(round_to_cents(99.994), 99.99);
    }
}
