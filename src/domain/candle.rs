use serde::{Deserialize, Serialize};

// Define the CandleType enum
#[derive(Debug, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One OHLCV bucket. `time` is the bucket open time in epoch milliseconds,
/// kept as f64 because the chart domain works in continuous time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: f64,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl Candle {
    // A constructor for convenience
    pub fn new(
        time: f64,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Candle {
            time,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close_price >= self.open_price {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open_price, self.close_price),
            CandleType::Bearish => (self.close_price, self.open_price),
        }
    }

    /// low <= min(open, close) <= max(open, close) <= high, all finite.
    pub fn is_valid(&self) -> bool {
        let fields = [
            self.time,
            self.open_price,
            self.high_price,
            self.low_price,
            self.close_price,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return false;
        }
        let (body_low, body_high) = self.body_range();
        self.low_price <= body_low && body_high <= self.high_price
    }
}

/// Drop malformed candles, order by time and keep the last candle for any duplicated time.
/// Upstream feeds repeat the still-open candle, so the newest copy wins.
pub fn sanitize_series(candles: Vec<Candle>) -> Vec<Candle> {
    let original_len = candles.len();
    let mut series: Vec<Candle> = candles.into_iter().filter(Candle::is_valid).collect();
    let dropped = original_len - series.len();
    if dropped > 0 {
        log::warn!("Dropped {} malformed candles out of {}", dropped, original_len);
    }

    // Stable sort keeps arrival order among equal times
    series.sort_by(|a, b| a.time.total_cmp(&b.time));

    let mut deduped: Vec<Candle> = Vec::with_capacity(series.len());
    for candle in series {
        match deduped.last_mut() {
            Some(last) if last.time == candle.time => *last = candle,
            _ => deduped.push(candle),
        }
    }
    deduped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_follows_ohlc_ordering() {
        assert!(Candle::new(0.0, 10.0, 12.0, 9.0, 11.0, 1.0).is_valid());
        // high below the body
        assert!(!Candle::new(0.0, 10.0, 10.5, 9.0, 11.0, 1.0).is_valid());
        // low above the body
        assert!(!Candle::new(0.0, 10.0, 12.0, 10.5, 11.0, 1.0).is_valid());
        assert!(!Candle::new(f64::NAN, 10.0, 12.0, 9.0, 11.0, 1.0).is_valid());
    }

    #[test]
    fn sanitize_sorts_filters_and_dedups() {
        let series = vec![
            Candle::new(2.0, 10.0, 12.0, 9.0, 11.0, 1.0),
            Candle::new(1.0, 10.0, 12.0, 9.0, 11.0, 1.0),
            Candle::new(3.0, 10.0, 1.0, 9.0, 11.0, 1.0), // malformed
            Candle::new(2.0, 11.0, 13.0, 10.0, 12.0, 2.0), // newer copy of t=2
        ];

        let clean = sanitize_series(series);

        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].time, 1.0);
        assert_eq!(clean[1].time, 2.0);
        assert_eq!(clean[1].close_price, 12.0);
    }

    #[test]
    fn body_range_orders_open_and_close() {
        let bear = Candle::new(0.0, 12.0, 13.0, 9.0, 10.0, 1.0);
        assert_eq!(bear.get_type(), CandleType::Bearish);
        assert_eq!(bear.body_range(), (10.0, 12.0));
    }
}
