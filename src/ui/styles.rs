use eframe::egui::{Color32, Frame, Margin, RichText, Stroke, Ui};

use crate::api::logs::DetailKind;
use crate::api::models::UserStatus;
use crate::ui::config::UI_CONFIG;

/// Extension trait to add semantic styling methods directly to `egui::Ui`.
pub trait UiStyleExt {
    /// Renders small, gray text (good for labels like "Coverage:").
    fn label_subdued(&mut self, text: impl Into<String>);

    /// Renders a "Label: Value" pair with consistent spacing and styling.
    /// The label is subdued, the value is colored.
    fn metric(&mut self, label: &str, value: &str, color: Color32);

    /// Renders a section header using the configured global color.
    fn label_header(&mut self, text: impl Into<String>);

    /// Renders a sub-section header using the configured global color.
    fn label_subheader(&mut self, text: impl Into<String>);

    /// Renders an error message (Red).
    fn label_error(&mut self, text: impl Into<String>);

    /// Renders a warning/info message (Yellow/Gold).
    fn label_warning(&mut self, text: impl Into<String>);

    /// A framed card with a subdued caption and a large value.
    fn stat_card(&mut self, caption: &str, value: &str, color: Color32);

    /// Colored pill for a user status.
    fn status_badge(&mut self, status: UserStatus);

    /// One detail-log line, highlighted by kind.
    fn log_line(&mut self, line: &str, kind: DetailKind);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.subdued));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_header(&mut self, text: impl Into<String>) {
        let text = text.into().to_uppercase();
        self.heading(RichText::new(text).color(UI_CONFIG.colors.heading).monospace());
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.subsection_heading));
    }

    fn label_error(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).color(UI_CONFIG.colors.negative));
    }

    fn label_warning(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(UI_CONFIG.colors.warning));
    }

    fn stat_card(&mut self, caption: &str, value: &str, color: Color32) {
        Frame::group(self.style())
            .inner_margin(Margin::same(10))
            .show(self, |ui| {
                ui.set_width(UI_CONFIG.stat_card_width);
                ui.label_subdued(caption);
                ui.label(RichText::new(value).size(22.0).strong().color(color));
            });
    }

    fn status_badge(&mut self, status: UserStatus) {
        let color = match status {
            UserStatus::Active => UI_CONFIG.colors.positive,
            UserStatus::Pending => UI_CONFIG.colors.warning,
            UserStatus::Disabled => UI_CONFIG.colors.negative,
            UserStatus::Inactive => UI_CONFIG.colors.subdued,
        };
        Frame::new()
            .stroke(Stroke::new(1.0, color))
            .corner_radius(8.0)
            .inner_margin(Margin::symmetric(6, 1))
            .show(self, |ui| {
                ui.label(RichText::new(status.label()).small().color(color));
            });
    }

    fn log_line(&mut self, line: &str, kind: DetailKind) {
        let text = RichText::new(line).monospace().small();
        let text = match kind {
            DetailKind::Confirmed => text.color(UI_CONFIG.colors.positive),
            DetailKind::Error => text.color(UI_CONFIG.colors.negative),
            DetailKind::Started => text.color(UI_CONFIG.colors.accent),
            DetailKind::Plain => text,
        };
        self.label(text);
    }
}
