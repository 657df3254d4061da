use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use super::drawing::DrawingTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter)]
pub enum ChartStyle {
    Line,
    #[default]
    Candle,
}

impl ChartStyle {
    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "Line",
            ChartStyle::Candle => "Candles",
        }
    }
}

/// Whether the plot reacts to the pointer at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSurface {
    Interactive,
    Static,
}

/// Where a chart page reads its candles and ticker from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    /// The bot backend `/klines` route
    Backend,
    /// Public Binance REST
    Binance,
}

/// Capabilities of one chart instance. Pages pick a preset instead of carrying their own chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartVariant {
    pub surface: ChartSurface,
    pub tools: &'static [DrawingTool],
    pub data_source: DataSource,
    /// Buy/sell markers and TP/SL lines
    pub trade_overlay: bool,
}

impl ChartVariant {
    /// Charts page
    pub fn market() -> Self {
        Self {
            surface: ChartSurface::Interactive,
            tools: &[DrawingTool::Measure],
            data_source: DataSource::Backend,
            trade_overlay: false,
        }
    }

    /// Manual Trading page
    pub fn manual_trade() -> Self {
        Self {
            surface: ChartSurface::Interactive,
            tools: &[
                DrawingTool::TrendLine,
                DrawingTool::HLine,
                DrawingTool::VLine,
                DrawingTool::Measure,
            ],
            data_source: DataSource::Binance,
            trade_overlay: true,
        }
    }

    /// Dashboard performance chart
    pub fn summary() -> Self {
        Self {
            surface: ChartSurface::Static,
            tools: &[],
            data_source: DataSource::Backend,
            trade_overlay: false,
        }
    }

    pub fn with_data_source(mut self, data_source: DataSource) -> Self {
        self.data_source = data_source;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.surface == ChartSurface::Interactive
    }

    pub fn allows(&self, tool: DrawingTool) -> bool {
        self.is_interactive() && self.tools.contains(&tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_expose_expected_tools() {
        assert!(ChartVariant::market().allows(DrawingTool::Measure));
        assert!(!ChartVariant::market().allows(DrawingTool::TrendLine));
        assert!(ChartVariant::manual_trade().allows(DrawingTool::TrendLine));
        assert!(!ChartVariant::summary().allows(DrawingTool::Measure));
    }

    #[test]
    fn data_source_can_be_overridden() {
        let v = ChartVariant::market().with_data_source(DataSource::Binance);
        assert_eq!(v.data_source, DataSource::Binance);
        assert!(v.is_interactive());
    }
}
