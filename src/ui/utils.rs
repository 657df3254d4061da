use eframe::egui::{Context, RichText, Ui, Visuals};
use serde::{Deserialize, Serialize};

use crate::ui::config::UI_CONFIG;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// Creates a colored heading with uppercase text and monospace font
pub fn colored_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into().to_uppercase())
        .color(UI_CONFIG.colors.heading)
        .monospace()
}

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context, theme: Theme) {
    let mut visuals = match theme {
        Theme::Dark => {
            let mut v = Visuals::dark();
            v.window_fill = UI_CONFIG.colors.dark_window;
            v.panel_fill = UI_CONFIG.colors.dark_panel;
            v
        }
        Theme::Light => {
            let mut v = Visuals::light();
            v.window_fill = UI_CONFIG.colors.light_window;
            v.panel_fill = UI_CONFIG.colors.light_panel;
            v
        }
    };

    visuals.hyperlink_color = UI_CONFIG.colors.accent;
    visuals.selection.bg_fill = UI_CONFIG.colors.accent.linear_multiply(0.6);

    ctx.set_visuals(visuals);
}

/// Creates a section heading with standard spacing
pub fn section_heading(ui: &mut Ui, text: impl Into<String>) {
    ui.add_space(10.0);
    ui.heading(colored_heading(text));
    ui.add_space(5.0);
}

/// Creates a separator with standard spacing
pub fn spaced_separator(ui: &mut Ui) {
    ui.add_space(10.0);
    ui.separator();
    ui.add_space(10.0);
}

/// Formats a price with "Trader Precision".
/// - Large (>1000): 2 decimals ($95,123.50)
/// - Medium (1-1000): 4 decimals ($12.4829)
/// - Small (<1): 6-8 decimals ($0.00000231)
pub fn format_price(price: f64) -> String {
    if price == 0.0 || !price.is_finite() {
        return "$0.00".to_string();
    }

    let abs_price = price.abs();

    if abs_price >= 1000.0 {
        format!("${:.2}", price)
    } else if abs_price >= 1.0 {
        format!("${:.4}", price)
    } else if abs_price >= 0.01 {
        format!("${:.5}", price)
    } else {
        format!("${:.8}", price)
    }
}

/// Signed percent, e.g. `+2.50%`.
pub fn format_pct(pct: f64) -> String {
    if !pct.is_finite() {
        return "0.00%".to_string();
    }
    format!("{:+.2}%", pct)
}

/// Signed USDT amount, e.g. `-12.30 USDT`.
pub fn format_signed_usdt(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value >= 0.0 {
        format!("+{:.2} USDT", value)
    } else {
        format!("{:.2} USDT", value)
    }
}

/// Compact volume: 1.2K, 3.4M, 5.6B.
pub fn format_volume(volume: f64) -> String {
    let abs = volume.abs();
    if !abs.is_finite() {
        return "0".to_string();
    }
    if abs >= 1e9 {
        format!("{:.2}B", volume / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", volume / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", volume / 1e3)
    } else {
        format!("{:.2}", volume)
    }
}

/// Average trade duration given in minutes.
pub fn format_duration_minutes(minutes: f64) -> String {
    if !minutes.is_finite() || minutes <= 0.0 {
        return "-".to_string();
    }
    crate::utils::time_utils::format_span_ms(
        minutes * crate::utils::TimeUtils::MS_IN_MIN as f64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_scales_with_magnitude() {
        assert_eq!(format_price(95123.5), "$95123.50");
        assert_eq!(format_price(12.48291), "$12.4829");
        assert_eq!(format_price(0.5), "$0.50000");
        assert_eq!(format_price(0.00000231), "$0.00000231");
        assert_eq!(format_price(f64::NAN), "$0.00");
    }

    #[test]
    fn pct_and_profit_carry_sign() {
        assert_eq!(format_pct(2.5), "+2.50%");
        assert_eq!(format_pct(-0.1), "-0.10%");
        assert_eq!(format_signed_usdt(12.3), "+12.30 USDT");
        assert_eq!(format_signed_usdt(-12.3), "-12.30 USDT");
    }

    #[test]
    fn volume_is_compacted() {
        assert_eq!(format_volume(1_234.0), "1.23K");
        assert_eq!(format_volume(5_600_000.0), "5.60M");
        assert_eq!(format_volume(12.0), "12.00");
    }

    #[test]
    fn zero_duration_shows_dash() {
        assert_eq!(format_duration_minutes(0.0), "-");
        assert_eq!(format_duration_minutes(90.0), "1h 30m");
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
    }
}
