use std::time::Duration;

use eframe::egui::{self, Align2, RichText};

use crate::ui::config::UI_CONFIG;
use crate::utils::app_time::AppInstant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    created: AppInstant,
}

/// Transient notifications, newest last. Each one lives for `ttl`.
#[derive(Debug)]
pub struct Toasts {
    items: Vec<Toast>,
    ttl: Duration,
    max: usize,
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(UI_CONFIG.toast_ttl_secs),
            UI_CONFIG.max_toasts,
        )
    }
}

impl Toasts {
    pub fn new(ttl: Duration, max: usize) -> Self {
        Self {
            items: Vec::new(),
            ttl,
            max: max.max(1),
        }
    }

    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>, now: AppInstant) {
        self.items.push(Toast {
            kind,
            text: text.into(),
            created: now,
        });
        if self.items.len() > self.max {
            let excess = self.items.len() - self.max;
            self.items.drain(..excess);
        }
    }

    /// Drop expired toasts and return what is still visible.
    pub fn active(&mut self, now: AppInstant) -> &[Toast] {
        let ttl = self.ttl;
        self.items
            .retain(|t| now.saturating_duration_since(t.created) < ttl);
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn show(&mut self, ctx: &egui::Context, now: AppInstant) {
        let visible = self.active(now).to_vec();
        if visible.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &visible {
                    let color = match toast.kind {
                        ToastKind::Success => UI_CONFIG.colors.positive,
                        ToastKind::Error => UI_CONFIG.colors.negative,
                        ToastKind::Info => UI_CONFIG.colors.accent,
                    };
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(RichText::new(&toast.text).color(color));
                    });
                    ui.add_space(4.0);
                }
            });

        // Keep repainting so toasts disappear on time without input
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::app_time::now;

    #[test]
    fn toasts_expire_after_ttl() {
        let mut toasts = Toasts::new(Duration::from_secs(3), 5);
        let t0 = now();
        toasts.push(ToastKind::Success, "saved", t0);
        toasts.push(ToastKind::Error, "failed", t0 + Duration::from_secs(2));

        assert_eq!(toasts.active(t0 + Duration::from_secs(1)).len(), 2);
        let remaining = toasts.active(t0 + Duration::from_secs(3));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "failed");
        assert!(toasts.active(t0 + Duration::from_secs(6)).is_empty());
    }

    #[test]
    fn oldest_toasts_are_dropped_past_capacity() {
        let mut toasts = Toasts::new(Duration::from_secs(3), 2);
        let t0 = now();
        for i in 0..4 {
            toasts.push(ToastKind::Info, format!("t{}", i), t0);
        }
        let texts: Vec<&str> = toasts.active(t0).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["t2", "t3"]);
    }
}
