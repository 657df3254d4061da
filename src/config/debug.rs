//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit every request line (method + path) as it is dispatched.
    pub print_requests: bool,
    /// Emit poll scheduler subscribe/cancel/fire events.
    pub print_poll_events: bool,
    /// Emit chart view-state changes (domain, tool state transitions).
    pub print_chart_events: bool,
    /// Emit UI interaction logs (page switches, manual actions).
    pub print_ui_interactions: bool,
    /// Emit results discarded because their page was torn down.
    pub print_stale_results: bool,
    /// Emit details of UI state serialization/deserialization logs.
    pub print_state_serde: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_requests: false,
    print_poll_events: false,
    print_chart_events: false,
    print_ui_interactions: true,
    print_stale_results: false,
    print_state_serde: false,
    print_shutdown: false,
};
