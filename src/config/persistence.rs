//! File persistence and serialization configuration

// App state persistence
/// Path for saving/loading application UI state (native builds only; WASM uses local storage)
pub const APP_STATE_PATH: &str = ".tradex_states.json";

/// Storage key the bearer token is persisted under, separate from the rest of the UI state
/// so a logout can wipe it without touching preferences.
pub const TOKEN_STORAGE_KEY: &str = "tradex_token";
