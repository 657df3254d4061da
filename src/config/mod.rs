//! Configuration module for the control panel.

pub mod api;
pub mod chart;

mod debug; // Private: use crate::config::DEBUG_FLAGS, not crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;

// Re-export commonly used items
pub use api::{API, ApiConfig, PollIntervals};
pub use chart::{CHART, ChartConfig};
pub use persistence::{APP_STATE_PATH, TOKEN_STORAGE_KEY};
