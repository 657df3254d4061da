use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

use crate::config::DEBUG_FLAGS;

/// A point in data space: epoch ms on x, price on y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartPoint {
    pub time: f64,
    pub price: f64,
}

impl ChartPoint {
    pub fn new(time: f64, price: f64) -> Self {
        Self { time, price }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum DrawingTool {
    TrendLine,
    HLine,
    VLine,
    Measure,
}

impl DrawingTool {
    pub fn label(&self) -> &'static str {
        match self {
            DrawingTool::TrendLine => "Trend Line",
            DrawingTool::HLine => "H-Line",
            DrawingTool::VLine => "V-Line",
            DrawingTool::Measure => "Measure",
        }
    }

    pub fn is_single_point(&self) -> bool {
        matches!(self, DrawingTool::HLine | DrawingTool::VLine)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToolState {
    #[default]
    Idle,
    Armed(DrawingTool),
    AwaitingSecondPoint {
        tool: DrawingTool,
        anchor: ChartPoint,
    },
}

impl ToolState {
    pub fn tool(&self) -> Option<DrawingTool> {
        match self {
            ToolState::Idle => None,
            ToolState::Armed(tool) | ToolState::AwaitingSecondPoint { tool, .. } => Some(*tool),
        }
    }
}

/// User drawings and trade markers. Held in view memory only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Annotation {
    TrendLine { x1: f64, y1: f64, x2: f64, y2: f64 },
    HLine { price: f64 },
    VLine { time: f64 },
    Buy { time: f64, price: f64 },
    Sell { time: f64, price: f64 },
}

/// Readout of an in-progress measure drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub from: ChartPoint,
    pub to: ChartPoint,
    pub price_delta: f64,
    /// Percent change relative to the anchor price, 0 when the anchor is 0
    pub price_delta_pct: f64,
    pub time_delta: f64,
    /// Whole candles spanned, signed like `time_delta`
    pub bars: i64,
}

impl Measurement {
    pub fn between(from: ChartPoint, to: ChartPoint, bar_ms: Option<f64>) -> Self {
        let price_delta = to.price - from.price;
        let price_delta_pct = if from.price != 0.0 {
            price_delta / from.price * 100.0
        } else {
            0.0
        };
        let time_delta = to.time - from.time;
        let bars = match bar_ms {
            Some(ms) if ms > 0.0 => (time_delta / ms).round() as i64,
            _ => 0,
        };
        Self {
            from,
            to,
            price_delta,
            price_delta_pct,
            time_delta,
            bars,
        }
    }
}

fn single_point_annotation(tool: DrawingTool, point: ChartPoint) -> Option<Annotation> {
    match tool {
        DrawingTool::HLine => Some(Annotation::HLine { price: point.price }),
        DrawingTool::VLine => Some(Annotation::VLine { time: point.time }),
        DrawingTool::TrendLine | DrawingTool::Measure => None,
    }
}

/// Drawing-tool state machine plus the annotations it has committed.
///
/// Click tools go `Idle -> Armed -> AwaitingSecondPoint -> Idle`, single-point
/// tools commit on the first click. `Measure` is driven by pointer down/move/up
/// and never commits anything.
#[derive(Debug, Default)]
pub struct DrawingBoard {
    state: ToolState,
    annotations: Vec<Annotation>,
    measurement: Option<Measurement>,
}

impl DrawingBoard {
    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn measurement(&self) -> Option<&Measurement> {
        self.measurement.as_ref()
    }

    /// True while a tool owns the pointer, so the plot must not pan or drag-select.
    pub fn is_active(&self) -> bool {
        self.state != ToolState::Idle
    }

    /// Anchor of a half-drawn two-point annotation, for the preview line.
    pub fn pending_anchor(&self) -> Option<ChartPoint> {
        match self.state {
            ToolState::AwaitingSecondPoint { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    /// Arm `tool`. Selecting the armed tool again disarms it; selecting another
    /// tool drops whatever was in progress.
    pub fn select_tool(&mut self, tool: DrawingTool) {
        let next = match self.state.tool() {
            Some(current) if current == tool => ToolState::Idle,
            _ => ToolState::Armed(tool),
        };
        self.transition(next);
        self.measurement = None;
    }

    pub fn cancel(&mut self) {
        self.transition(ToolState::Idle);
        self.measurement = None;
    }

    /// Feed a click. Returns the annotation if this click completed one.
    pub fn click(&mut self, point: ChartPoint) -> Option<Annotation> {
        if !point.time.is_finite() || !point.price.is_finite() {
            return None;
        }

        let (next, committed) = match self.state {
            ToolState::Idle | ToolState::Armed(DrawingTool::Measure) => return None,
            ToolState::Armed(tool) if tool.is_single_point() => {
                (ToolState::Idle, single_point_annotation(tool, point))
            }
            ToolState::Armed(tool) => (
                ToolState::AwaitingSecondPoint {
                    tool,
                    anchor: point,
                },
                None,
            ),
            ToolState::AwaitingSecondPoint { tool, anchor } => match tool {
                DrawingTool::TrendLine => (
                    ToolState::Idle,
                    Some(Annotation::TrendLine {
                        x1: anchor.time,
                        y1: anchor.price,
                        x2: point.time,
                        y2: point.price,
                    }),
                ),
                // A measure drag in progress ignores clicks
                _ => return None,
            },
        };

        self.transition(next);
        if let Some(annotation) = committed {
            self.annotations.push(annotation);
        }
        committed
    }

    /// Start a measure drag. No-op unless `Measure` is armed.
    pub fn pointer_down(&mut self, point: ChartPoint) {
        if self.state == ToolState::Armed(DrawingTool::Measure) {
            self.transition(ToolState::AwaitingSecondPoint {
                tool: DrawingTool::Measure,
                anchor: point,
            });
            self.measurement = Some(Measurement::between(point, point, None));
        }
    }

    pub fn pointer_move(&mut self, point: ChartPoint, bar_ms: Option<f64>) {
        if let ToolState::AwaitingSecondPoint {
            tool: DrawingTool::Measure,
            anchor,
        } = self.state
        {
            self.measurement = Some(Measurement::between(anchor, point, bar_ms));
        }
    }

    /// End a measure drag; the readout is discarded.
    pub fn pointer_up(&mut self) {
        if let ToolState::AwaitingSecondPoint {
            tool: DrawingTool::Measure,
            ..
        } = self.state
        {
            self.measurement = None;
            self.transition(ToolState::Idle);
        }
    }

    /// Buy/Sell markers placed by order actions.
    pub fn add_marker(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    pub fn undo_last(&mut self) -> Option<Annotation> {
        self.annotations.pop()
    }

    pub fn clear(&mut self) {
        self.annotations.clear();
        self.measurement = None;
        self.transition(ToolState::Idle);
    }

    fn transition(&mut self, next: ToolState) {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_chart_events && self.state != next {
            log::info!("Drawing tool: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn trend_line_commits_on_second_click() {
        let mut board = DrawingBoard::default();
        board.select_tool(DrawingTool::TrendLine);
        assert_eq!(board.state(), ToolState::Armed(DrawingTool::TrendLine));

        assert_eq!(board.click(ChartPoint::new(1.0, 100.0)), None);
        assert_eq!(board.pending_anchor(), Some(ChartPoint::new(1.0, 100.0)));

        let committed = board.click(ChartPoint::new(5.0, 110.0));
        assert_eq!(
            committed,
            Some(Annotation::TrendLine {
                x1: 1.0,
                y1: 100.0,
                x2: 5.0,
                y2: 110.0
            })
        );
        assert_eq!(board.state(), ToolState::Idle);
        assert_eq!(board.pending_anchor(), None);
        assert_eq!(board.annotations().len(), 1);
    }

    #[test]
    fn single_point_tools_commit_immediately() {
        let mut board = DrawingBoard::default();
        board.select_tool(DrawingTool::HLine);
        assert_eq!(
            board.click(ChartPoint::new(3.0, 250.0)),
            Some(Annotation::HLine { price: 250.0 })
        );
        assert_eq!(board.state(), ToolState::Idle);

        board.select_tool(DrawingTool::VLine);
        assert_eq!(
            board.click(ChartPoint::new(3.0, 250.0)),
            Some(Annotation::VLine { time: 3.0 })
        );
        assert_eq!(board.annotations().len(), 2);
    }

    #[test]
    fn only_single_point_tools_commit_on_first_click() {
        for tool in DrawingTool::iter() {
            let mut board = DrawingBoard::default();
            board.select_tool(tool);
            let committed = board.click(ChartPoint::new(2.0, 50.0));
            assert_eq!(committed.is_some(), tool.is_single_point(), "{:?}", tool);
        }
    }

    #[test]
    fn reselecting_tool_disarms_and_switching_cancels() {
        let mut board = DrawingBoard::default();
        board.select_tool(DrawingTool::TrendLine);
        board.select_tool(DrawingTool::TrendLine);
        assert_eq!(board.state(), ToolState::Idle);

        board.select_tool(DrawingTool::TrendLine);
        board.click(ChartPoint::new(1.0, 1.0));
        board.select_tool(DrawingTool::HLine);
        assert_eq!(board.state(), ToolState::Armed(DrawingTool::HLine));
        assert!(board.annotations().is_empty());
    }

    #[test]
    fn clicks_while_idle_do_nothing() {
        let mut board = DrawingBoard::default();
        assert_eq!(board.click(ChartPoint::new(1.0, 1.0)), None);
        assert!(board.annotations().is_empty());
    }

    #[test]
    fn measure_is_transient() {
        let mut board = DrawingBoard::default();
        board.select_tool(DrawingTool::Measure);
        board.pointer_down(ChartPoint::new(0.0, 100.0));
        board.pointer_move(ChartPoint::new(7_200_000.0, 110.0), Some(3_600_000.0));

        let m = board.measurement().copied().expect("measurement while dragging");
        assert_eq!(m.price_delta, 10.0);
        assert!((m.price_delta_pct - 10.0).abs() < 1e-9);
        assert_eq!(m.bars, 2);

        board.pointer_up();
        assert_eq!(board.measurement(), None);
        assert_eq!(board.state(), ToolState::Idle);
        assert!(board.annotations().is_empty());
    }

    #[test]
    fn undo_and_clear_remove_annotations() {
        let mut board = DrawingBoard::default();
        board.add_marker(Annotation::Buy { time: 1.0, price: 10.0 });
        board.add_marker(Annotation::Sell { time: 2.0, price: 11.0 });
        assert_eq!(board.undo_last(), Some(Annotation::Sell { time: 2.0, price: 11.0 }));
        board.clear();
        assert!(board.annotations().is_empty());
    }
}
