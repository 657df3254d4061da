use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub heading: Color32,
    pub subsection_heading: Color32,
    pub accent: Color32,
    pub positive: Color32,
    pub negative: Color32,
    pub warning: Color32,
    pub subdued: Color32,
    pub dark_panel: Color32,
    pub dark_window: Color32,
    pub light_panel: Color32,
    pub light_window: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    pub toast_ttl_secs: u64,
    pub max_toasts: usize,
    pub nav_spacing: f32,
    pub stat_card_width: f32,
    pub chart_height: f32,
    pub mini_chart_height: f32,
    pub ticket_width: f32,
    pub max_leverage: u32,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        heading: Color32::from_rgb(6, 182, 212), // Cyan
        subsection_heading: Color32::from_rgb(148, 163, 184),
        accent: Color32::from_rgb(6, 182, 212),
        positive: Color32::from_rgb(34, 197, 94),
        negative: Color32::from_rgb(239, 68, 68),
        warning: Color32::from_rgb(250, 204, 21),
        subdued: Color32::GRAY,
        dark_panel: Color32::from_rgb(17, 24, 39),
        dark_window: Color32::from_rgb(31, 41, 55),
        light_panel: Color32::from_rgb(243, 244, 246),
        light_window: Color32::from_rgb(255, 255, 255),
    },
    toast_ttl_secs: 3,
    max_toasts: 5,
    nav_spacing: 6.0,
    stat_card_width: 180.0,
    chart_height: 420.0,
    mini_chart_height: 180.0,
    ticket_width: 280.0,
    max_leverage: 100,
};
