use crate::config::CHART;
use crate::utils::maths_utils::round_to_cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelKind {
    TakeProfit,
    StopLoss,
}

impl LevelKind {
    pub fn label(&self) -> &'static str {
        match self {
            LevelKind::TakeProfit => "TP",
            LevelKind::StopLoss => "SL",
        }
    }

    fn default_mult(&self) -> f64 {
        match self {
            LevelKind::TakeProfit => CHART.take_profit_default_mult,
            LevelKind::StopLoss => CHART.stop_loss_default_mult,
        }
    }
}

/// Take-profit / stop-loss reference lines for the manual trade ticket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderLevels {
    pub take_profit: Option<f64>,
    pub stop_loss: Option<f64>,
    dragging: Option<LevelKind>,
}

impl OrderLevels {
    pub fn get(&self, kind: LevelKind) -> Option<f64> {
        match kind {
            LevelKind::TakeProfit => self.take_profit,
            LevelKind::StopLoss => self.stop_loss,
        }
    }

    fn slot(&mut self, kind: LevelKind) -> &mut Option<f64> {
        match kind {
            LevelKind::TakeProfit => &mut self.take_profit,
            LevelKind::StopLoss => &mut self.stop_loss,
        }
    }

    /// Show the level at its default offset from `current_price`, or hide it if shown.
    pub fn toggle(&mut self, kind: LevelKind, current_price: f64) {
        let slot = self.slot(kind);
        if slot.is_some() {
            *slot = None;
        } else if current_price.is_finite() && current_price > 0.0 {
            *slot = Some(round_to_cents(current_price * kind.default_mult()));
        }
        if self.dragging == Some(kind) && self.get(kind).is_none() {
            self.dragging = None;
        }
    }

    /// Typed-in value from the ticket. Non-positive input clears the level.
    pub fn set(&mut self, kind: LevelKind, price: f64) {
        *self.slot(kind) = (price.is_finite() && price > 0.0).then(|| round_to_cents(price));
    }

    /// Try to pick up the level nearest the pointer. `to_fraction` maps a price to its
    /// height in the plot (0..1), so the grab tolerance is a share of plot height.
    pub fn grab(
        &mut self,
        pointer_price: f64,
        to_fraction: impl Fn(f64) -> f64,
    ) -> Option<LevelKind> {
        let pointer = to_fraction(pointer_price);
        let nearest = [LevelKind::TakeProfit, LevelKind::StopLoss]
            .into_iter()
            .filter_map(|kind| {
                self.get(kind)
                    .map(|p| (kind, (to_fraction(p) - pointer).abs()))
            })
            .filter(|(_, distance)| *distance <= CHART.level_grab_fraction)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(kind, _)| kind);
        self.dragging = nearest;
        nearest
    }

    pub fn drag_to(&mut self, price: f64) {
        if let Some(kind) = self.dragging {
            if price.is_finite() && price > 0.0 {
                *self.slot(kind) = Some(round_to_cents(price));
            }
        }
    }

    pub fn release(&mut self) {
        self.dragging = None;
    }

    pub fn dragging(&self) -> Option<LevelKind> {
        self.dragging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_places_default_offsets_then_hides() {
        let mut levels = OrderLevels::default();
        levels.toggle(LevelKind::TakeProfit, 100.0);
        levels.toggle(LevelKind::StopLoss, 100.0);
        assert_eq!(levels.take_profit, Some(101.0));
        assert_eq!(levels.stop_loss, Some(99.0));

        levels.toggle(LevelKind::TakeProfit, 100.0);
        assert_eq!(levels.take_profit, None);
    }

    #[test]
    fn toggle_without_price_does_nothing() {
        let mut levels = OrderLevels::default();
        levels.toggle(LevelKind::TakeProfit, 0.0);
        assert_eq!(levels.take_profit, None);
    }

    #[test]
    fn drag_moves_grabbed_level_in_cents() {
        let mut levels = OrderLevels::default();
        levels.toggle(LevelKind::TakeProfit, 100.0);
        levels.toggle(LevelKind::StopLoss, 100.0);

        // Plot spanning 95..105 => tolerance 0.2
        assert_eq!(levels.grab(100.95, |p| (p - 95.0) / 10.0), Some(LevelKind::TakeProfit));
        levels.drag_to(102.3456);
        assert_eq!(levels.take_profit, Some(102.35));
        levels.release();
        assert_eq!(levels.dragging(), None);
    }

    #[test]
    fn grab_outside_tolerance_misses() {
        let mut levels = OrderLevels::default();
        levels.toggle(LevelKind::StopLoss, 100.0);
        assert_eq!(levels.grab(100.0, |p| (p - 95.0) / 10.0), None);
        levels.drag_to(50.0);
        assert_eq!(levels.stop_loss, Some(99.0));
    }
}
