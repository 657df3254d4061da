//! Remote API configuration constants and types.

use std::time::Duration;

/// Polling cadence per data feed. `None` means fetch once on mount.
pub struct PollIntervals {
    /// Strategy trade/detail logs
    pub logs_ms: u64,
    /// Klines + 24h ticker for the chart pages
    pub market_ms: u64,
    /// Dashboard stats are only fetched on mount
    pub dashboard_ms: Option<u64>,
    /// Portfolio value in the header
    pub portfolio_ms: Option<u64>,
}

impl PollIntervals {
    pub fn logs(&self) -> Option<Duration> {
        Some(Duration::from_millis(self.logs_ms))
    }

    pub fn market(&self) -> Option<Duration> {
        Some(Duration::from_millis(self.market_ms))
    }

    pub fn dashboard(&self) -> Option<Duration> {
        self.dashboard_ms.map(Duration::from_millis)
    }

    pub fn portfolio(&self) -> Option<Duration> {
        self.portfolio_ms.map(Duration::from_millis)
    }
}

/// The Master API Configuration Struct
pub struct ApiConfig {
    /// Base URL of the bot backend when none is given on the command line
    pub default_base_url: &'static str,
    /// Public Binance REST endpoint used by direct market-data variants
    pub binance_base_url: &'static str,
    /// Per-request timeout (native builds only; the browser owns fetch timeouts)
    pub timeout_ms: u64,
    /// Number of klines requested per chart load
    pub klines_limit: u32,
    pub polls: PollIntervals,
    /// Pairs offered by the chart pages
    pub pairs: &'static [&'static str],
}

pub const API: ApiConfig = ApiConfig {
    default_base_url: "http://localhost:8000",
    binance_base_url: "https://api.binance.com",
    timeout_ms: 10_000,
    klines_limit: 200,
    polls: PollIntervals {
        logs_ms: 2_000,
        market_ms: 60_000,
        dashboard_ms: None,
        portfolio_ms: Some(60_000),
    },
    pairs: &["BTCUSDT", "ETHUSDT", "SOLUSDT", "XRPUSDT"],
};
