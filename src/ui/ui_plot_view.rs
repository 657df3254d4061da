use eframe::egui::{self, Key, PointerButton, Response, Vec2};
use egui_plot::{AxisHints, HPlacement, Plot, PlotPoint};

use crate::chart::{ChartPoint, ChartVariant, ChartViewState, DrawingTool};
use crate::config::DEBUG_FLAGS;
use crate::ui::app_state::ChartPageState;
use crate::ui::config::UI_TEXT;
use crate::ui::styles::UiStyleExt;
use crate::ui::utils::format_price;
use crate::utils::TimeUtils;
use crate::utils::time_utils::{epoch_ms_to_chart_label, epoch_ms_to_utc};

use crate::ui::plot_layers::{
    AnnotationLayer, CandleLayer, CloseLineLayer, CrosshairLayer, LayerContext, MeasureLayer,
    OrderLevelLayer, PlotLayer, PriceLineLayer, SelectionLayer,
};

/// What the primary drag is doing, decided when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gesture {
    Pan,
    Select,
    Measure,
    Level,
}

/// Draw the chart and route pointer input into its view state.
/// egui_plot's own navigation is off; the view state owns the window.
pub fn show_chart(ui: &mut egui::Ui, id: &str, chart: &mut ChartPageState, height: f32) {
    let Some(domain) = chart.view.domain() else {
        ui.add_space(height / 2.0);
        ui.vertical_centered(|ui| {
            if chart.loading {
                ui.spinner();
                ui.label_subdued(UI_TEXT.chart_loading);
            } else {
                ui.label_subdued(chart.error.as_deref().unwrap_or(UI_TEXT.chart_no_data));
            }
        });
        ui.add_space(height / 2.0);
        return;
    };

    let y = chart.view.y_range();
    let variant = chart.variant;
    let price = chart.price();
    let interactive = variant.is_interactive();

    let plot_response = Plot::new(id)
        .height(height)
        .custom_x_axes(vec![create_x_axis(domain.span())])
        .custom_y_axes(vec![create_y_axis()])
        // Suppress Defaults
        .label_formatter(|_, _| String::new())
        .show_x(false)
        .show_y(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_drag(false)
        .allow_boxed_zoom(false)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds_x(domain.left..=domain.right);
            plot_ui.set_plot_bounds_y(y.low..=y.high);

            let ctx = LayerContext {
                view: &chart.view,
                variant: &variant,
                price,
                x_min: domain.left,
                x_max: domain.right,
            };

            // Back to front
            let layers: Vec<Box<dyn PlotLayer>> = vec![
                Box::new(SelectionLayer),
                Box::new(CandleLayer),
                Box::new(CloseLineLayer),
                Box::new(PriceLineLayer),
                Box::new(OrderLevelLayer),
                Box::new(AnnotationLayer),
                Box::new(MeasureLayer),
                Box::new(CrosshairLayer),
            ];
            for layer in layers {
                layer.render(plot_ui, &ctx);
            }

            plot_ui.pointer_coordinate()
        });

    if !interactive {
        return;
    }

    let width = plot_response.transform.frame().width() as f64;
    let pointer = plot_response.inner;
    handle_input(ui, &plot_response.response, pointer, width, &mut chart.view, &variant);
}

fn handle_input(
    ui: &egui::Ui,
    response: &Response,
    pointer: Option<PlotPoint>,
    plot_width: f64,
    view: &mut ChartViewState,
    variant: &ChartVariant,
) {
    let point = pointer.map(|p| ChartPoint::new(p.x, p.y));

    match point {
        Some(p) if response.hovered() || response.dragged() => view.hover(p),
        _ => view.clear_hover(),
    }

    if ui.input(|i| i.key_pressed(Key::Escape)) {
        view.drawing.cancel();
        view.cancel_selection();
        view.levels.release();
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.raw_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(p) = point {
                view.wheel(p.time, scroll as f64);
            }
            // The wheel belongs to the chart, not to any enclosing ScrollArea
            consume_scroll(ui.ctx());
        }
    }

    if response.double_clicked() && !view.drawing.is_active() {
        view.reset_view();
        return;
    }

    let Some(p) = point else {
        return;
    };

    // Tool clicks (trend line, horizontal, vertical)
    if response.clicked_by(PointerButton::Primary) && view.drawing.is_active() {
        if let Some(annotation) = view.drawing.click(p) {
            if cfg!(debug_assertions) && DEBUG_FLAGS.print_chart_events {
                log::info!("[chart] Committed {:?}", annotation);
            }
        }
    }

    if response.drag_started_by(PointerButton::Primary) {
        let shift = ui.input(|i| i.modifiers.shift);
        if variant.trade_overlay && view.grab_level(p.price).is_some() {
            // Level picked up; drag_to follows
        } else if view.drawing.state().tool() == Some(DrawingTool::Measure) {
            view.drawing.pointer_down(p);
        } else if shift {
            view.begin_selection(p.time);
        }
    }
    if response.drag_started_by(PointerButton::Secondary) {
        view.begin_selection(p.time);
    }

    let gesture = current_gesture(view);

    if response.dragged_by(PointerButton::Primary) {
        match gesture {
            Gesture::Level => view.levels.drag_to(p.price),
            Gesture::Measure => {
                let bar_ms = view.bar_ms();
                view.drawing.pointer_move(p, bar_ms);
            }
            Gesture::Select => view.update_selection(p.time),
            Gesture::Pan => {
                // Armed click tools own the pointer
                if !view.drawing.is_active() {
                    view.pan(response.drag_delta().x as f64, plot_width);
                }
            }
        }
    }
    if response.dragged_by(PointerButton::Secondary) {
        view.update_selection(p.time);
    }

    if response.drag_stopped() {
        match gesture {
            Gesture::Level => view.levels.release(),
            Gesture::Measure => view.drawing.pointer_up(),
            Gesture::Select => {
                if view.finish_selection() && cfg!(debug_assertions) && DEBUG_FLAGS.print_chart_events {
                    log::info!("[chart] Zoomed to selection");
                }
            }
            Gesture::Pan => {}
        }
    }
}

fn consume_scroll(ctx: &egui::Context) {
    ctx.input_mut(|i| {
        i.raw_scroll_delta = Vec2::ZERO;
        i.smooth_scroll_delta = Vec2::ZERO;
    });
}

fn current_gesture(view: &ChartViewState) -> Gesture {
    if view.levels.dragging().is_some() {
        Gesture::Level
    } else if view.drawing.measurement().is_some() {
        Gesture::Measure
    } else if view.selection().is_some() {
        Gesture::Select
    } else {
        Gesture::Pan
    }
}

/// Time labels; date only once the window spans more than a month.
fn create_x_axis(span_ms: f64) -> AxisHints<'static> {
    let dates_only = span_ms > (TimeUtils::MS_IN_D * 30) as f64;
    AxisHints::new_x()
        .label(UI_TEXT.chart_x_axis)
        .formatter(move |grid_mark, _range| {
            if dates_only {
                epoch_ms_to_utc(grid_mark.value as i64)
            } else {
                epoch_ms_to_chart_label(grid_mark.value)
            }
        })
}

fn create_y_axis() -> AxisHints<'static> {
    AxisHints::new_y()
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_wheel_is_not_left_for_scroll_areas() {
        let ctx = egui::Context::default();
        ctx.input_mut(|i| {
            i.raw_scroll_delta = Vec2::new(0.0, 40.0);
            i.smooth_scroll_delta = Vec2::new(0.0, 40.0);
        });

        consume_scroll(&ctx);

        let (raw, smooth) = ctx.input(|i| (i.raw_scroll_delta, i.smooth_scroll_delta));
        assert_eq!(raw, Vec2::ZERO);
        assert_eq!(smooth, Vec2::ZERO);
    }
}
