use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::utils::TimeUtils;

/// Candle widths offered by the chart pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, EnumIter)]
pub enum Interval {
    M15,
    #[default]
    H1,
    H4,
    D1,
    W1,
}

impl Interval {
    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Interval::M15 => "15M",
            Interval::H1 => "1H",
            Interval::H4 => "4H",
            Interval::D1 => "1D",
            Interval::W1 => "1W",
        }
    }

    /// Binance-style shorthand, accepted by both the backend `/klines` route and Binance itself.
    pub fn api_code(&self) -> &'static str {
        match self {
            Interval::M15 => "15m",
            Interval::H1 => "1h",
            Interval::H4 => "4h",
            Interval::D1 => "1d",
            Interval::W1 => "1w",
        }
    }

    pub fn to_ms(&self) -> i64 {
        match self {
            Interval::M15 => TimeUtils::MS_IN_15_MIN,
            Interval::H1 => TimeUtils::MS_IN_H,
            Interval::H4 => TimeUtils::MS_IN_4_H,
            Interval::D1 => TimeUtils::MS_IN_D,
            Interval::W1 => TimeUtils::MS_IN_W,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_interval_has_distinct_code() {
        let codes: Vec<&str> = Interval::iter().map(|i| i.api_code()).collect();
        assert_eq!(codes, vec!["15m", "1h", "4h", "1d", "1w"]);
        assert_eq!(Interval::H4.to_ms(), 4 * 60 * 60 * 1000);
    }
}
