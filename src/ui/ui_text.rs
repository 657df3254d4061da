/// All user-facing strings in one place
pub struct UiText {
    pub app_title: &'static str,

    // Auth
    pub auth_login_heading: &'static str,
    pub auth_register_heading: &'static str,
    pub auth_username: &'static str,
    pub auth_password: &'static str,
    pub auth_login_button: &'static str,
    pub auth_register_button: &'static str,
    pub auth_switch_to_register: &'static str,
    pub auth_switch_to_login: &'static str,
    pub auth_registered: &'static str,
    pub auth_missing_fields: &'static str,
    pub auth_session_expired: &'static str,

    // Header
    pub header_portfolio: &'static str,
    pub header_logout: &'static str,
    pub header_settings: &'static str,
    pub header_theme_dark: &'static str,
    pub header_theme_light: &'static str,

    // Dashboard
    pub dash_total_profit: &'static str,
    pub dash_win_rate: &'static str,
    pub dash_active_trades: &'static str,
    pub dash_avg_duration: &'static str,
    pub dash_performance: &'static str,
    pub dash_history: &'static str,
    pub dash_no_history: &'static str,
    pub dash_market: &'static str,

    // Bot
    pub bot_heading: &'static str,
    pub bot_saved: &'static str,

    // Users
    pub users_search_hint: &'static str,
    pub users_pending: &'static str,
    pub users_managed: &'static str,
    pub users_none: &'static str,

    // Strategies
    pub strat_heading: &'static str,
    pub strat_test_heading: &'static str,
    pub strat_pair_hint: &'static str,
    pub strat_amount_quote_hint: &'static str,
    pub strat_none: &'static str,
    pub strat_logs_button: &'static str,
    pub strat_back: &'static str,
    pub strat_tab_trade: &'static str,
    pub strat_tab_detail: &'static str,
    pub strat_no_logs: &'static str,

    // Assets
    pub assets_heading: &'static str,
    pub assets_none: &'static str,

    // Charts
    pub chart_reset_view: &'static str,
    pub chart_undo: &'static str,
    pub chart_clear: &'static str,
    pub chart_loading: &'static str,
    pub chart_no_data: &'static str,
    pub chart_x_axis: &'static str,

    // Ticket
    pub ticket_price: &'static str,
    pub ticket_amount: &'static str,
    pub ticket_leverage: &'static str,
    pub ticket_total: &'static str,
    pub ticket_cost: &'static str,
    pub ticket_take_profit: &'static str,
    pub ticket_stop_loss: &'static str,

    // Settings
    pub settings_heading: &'static str,
    pub settings_api_key: &'static str,
    pub settings_api_secret: &'static str,
    pub settings_save: &'static str,
    pub settings_saved: &'static str,
    pub settings_cancel: &'static str,

    pub order_bought: &'static str,
    pub order_sold: &'static str,
    pub order_failed: &'static str,
    pub invalid_amount: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Tradex",

    auth_login_heading: "Sign in",
    auth_register_heading: "Create account",
    auth_username: "Username",
    auth_password: "Password",
    auth_login_button: "Login",
    auth_register_button: "Register",
    auth_switch_to_register: "No account? Register",
    auth_switch_to_login: "Already registered? Login",
    auth_registered: "Registration successful. Please log in.",
    auth_missing_fields: "Username and password are required",
    auth_session_expired: "Session expired, please log in again",

    header_portfolio: "Portfolio",
    header_logout: "Logout",
    header_settings: "⚙ API Keys",
    header_theme_dark: "🌙",
    header_theme_light: "☀",

    dash_total_profit: "Total Profit",
    dash_win_rate: "Win Rate",
    dash_active_trades: "Active Trades",
    dash_avg_duration: "Avg Trade Duration",
    dash_performance: "Performance",
    dash_history: "Trade History",
    dash_no_history: "No trades yet",
    dash_market: "Market",

    bot_heading: "Bot Configuration",
    bot_saved: "Bot configuration saved",

    users_search_hint: "Search users...",
    users_pending: "Pending Approval",
    users_managed: "Managed Users",
    users_none: "No users",

    strat_heading: "Strategy Management",
    strat_test_heading: "Test Strategy",
    strat_pair_hint: "Trading pair e.g. XRPUSDT",
    strat_amount_quote_hint: "Amount in USDT",
    strat_none: "No strategies available",
    strat_logs_button: "Logs",
    strat_back: "⬅ Back to strategies",
    strat_tab_trade: "Trades",
    strat_tab_detail: "Details",
    strat_no_logs: "No log entries yet",

    assets_heading: "Assets",
    assets_none: "No balances",

    chart_reset_view: "Reset View",
    chart_undo: "Undo",
    chart_clear: "Clear",
    chart_loading: "Loading market data...",
    chart_no_data: "No market data",
    chart_x_axis: "Time (UTC)",

    ticket_price: "Price",
    ticket_amount: "Amount",
    ticket_leverage: "Leverage",
    ticket_total: "Total",
    ticket_cost: "Cost",
    ticket_take_profit: "Take Profit",
    ticket_stop_loss: "Stop Loss",

    settings_heading: "Binance API Settings",
    settings_api_key: "API Key",
    settings_api_secret: "API Secret",
    settings_save: "Save",
    settings_saved: "Settings saved",
    settings_cancel: "Cancel",

    order_bought: "Bought successfully",
    order_sold: "Sold successfully",
    order_failed: "Error executing order",
    invalid_amount: "Enter a positive amount",
};
