#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

// Core modules
pub mod api;
pub mod chart;
pub mod config;
pub mod domain;
pub mod poll;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, Session};
pub use chart::{ChartVariant, ChartViewState};
pub use domain::{Candle, Interval, Pair};
pub use ui::{AppOptions, TradexApp};
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

use crate::config::API;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Base URL of the trading backend
    #[arg(long, default_value_t = API.default_base_url.to_string())]
    pub api_base: String,

    /// Base URL of the public Binance REST API
    #[arg(long, default_value_t = API.binance_base_url.to_string())]
    pub binance_base: String,

    /// Read chart candles straight from Binance instead of the backend proxy
    #[arg(long, default_value_t = false)]
    pub direct_market: bool,
}

impl Cli {
    pub fn into_options(self) -> AppOptions {
        AppOptions {
            api_base: self.api_base,
            binance_base: self.binance_base,
            direct_market: self.direct_market,
        }
    }
}

/// Main application entry point - creates the GUI app
pub fn run_app(cc: &eframe::CreationContext, options: AppOptions) -> Box<dyn eframe::App> {
    Box::new(TradexApp::new(cc, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_point_at_configured_hosts() {
        let cli = Cli::parse_from(["tradex-panel"]);
        let options = cli.into_options();
        assert_eq!(options.api_base, API.default_base_url);
        assert_eq!(options.binance_base, API.binance_base_url);
        assert!(!options.direct_market);
    }

    #[test]
    fn cli_overrides_backend() {
        let cli = Cli::parse_from([
            "tradex-panel",
            "--api-base",
            "http://10.0.0.5:9000",
            "--direct-market",
        ]);
        let options = cli.into_options();
        assert_eq!(options.api_base, "http://10.0.0.5:9000");
        assert!(options.direct_market);
    }
}
