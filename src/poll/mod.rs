pub mod scheduler;

pub use scheduler::{PollHandle, PollScheduler};
