//! Chart view-state engine.
//!
//! Everything here is UI independent: the plot widget feeds pointer and wheel
//! input in data coordinates and reads back the domain, y-range, annotations
//! and trade levels it should draw.

pub mod drawing;
pub mod levels;
pub mod variant;
pub mod view_domain;
pub mod view_state;

pub use drawing::{Annotation, ChartPoint, DrawingBoard, DrawingTool, Measurement, ToolState};
pub use levels::{LevelKind, OrderLevels};
pub use variant::{ChartStyle, ChartSurface, ChartVariant, DataSource};
pub use view_domain::{DataBounds, ViewDomain, YRange, clamp_domain};
pub use view_state::{ChartViewState, compute_y_range};
