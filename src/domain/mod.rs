// Domain types and value objects
pub mod candle;
pub mod interval;
pub mod pair;

// Re-export commonly used types
pub use candle::{Candle, CandleType, sanitize_series};
pub use interval::Interval;
pub use pair::Pair;
