//! Remote API access: typed HTTP client, market feeds, session and log helpers.

pub mod client;
pub mod error;
pub mod logs;
pub mod market;
pub mod models;
pub mod session;

pub use client::{ApiClient, AuthContext};
pub use error::{ApiError, ApiResult};
pub use session::Session;
