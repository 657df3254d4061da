//! HTTP client for the bot backend.
//!
//! Unauthenticated routes hang off [`ApiClient`]; everything behind login goes
//! through an [`AuthContext`], which carries the bearer token explicitly.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::DEBUG_FLAGS;

use super::error::{ApiResult, check_status};
use super::models::{
    ApiSettings, Balance, BalancesResponse, BotConfig, Credentials, DashboardData, LogType,
    LogsResponse, OrderResponse, PortfolioValue, StartStrategyRequest, StrategiesResponse,
    Strategy, TestBuyRequest, TestSellRequest, TokenResponse, User, UserStatus,
};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    binance_base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, binance_base_url: &str) -> Self {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_millis(
            crate::config::API.timeout_ms,
        ));

        let http = match builder.build() {
            Ok(client) => client,
            Err(e) => {
                log::warn!("HTTP client builder failed ({}), using defaults", e);
                reqwest::Client::new()
            }
        };

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            binance_base_url: binance_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn binance_base_url(&self) -> &str {
        &self.binance_base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, url: String) -> RequestBuilder {
        if cfg!(debug_assertions) && DEBUG_FLAGS.print_requests {
            log::info!("{} {}", method, url);
        }
        self.http.request(method, url)
    }

    pub fn authorize(&self, token: &str) -> AuthContext {
        AuthContext {
            client: self.clone(),
            token: token.to_string(),
        }
    }

    /// `POST /token` as an OAuth2 password form. Returns the access token.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let resp = self
            .request(Method::POST, self.url("/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let token: TokenResponse = read_json(resp).await?;
        Ok(token.access_token)
    }

    pub async fn register(&self, username: &str, password: &str) -> ApiResult<()> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        let resp = self
            .request(Method::POST, self.url("/register"))
            .json(&body)
            .send()
            .await?;
        read_empty(resp).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(
            crate::config::API.default_base_url,
            crate::config::API.binance_base_url,
        )
    }
}

/// Check the status, then decode the body as `T`.
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response) -> ApiResult<T> {
    let code = resp.status().as_u16();
    let body = resp.text().await?;
    check_status(code, &body)?;
    Ok(serde_json::from_str(&body)?)
}

/// Check the status and ignore the body.
pub(crate) async fn read_empty(resp: Response) -> ApiResult<()> {
    let code = resp.status().as_u16();
    let body = resp.text().await?;
    check_status(code, &body)
}

/// A client bound to one session token.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub client: ApiClient,
    token: String,
}

impl AuthContext {
    fn send(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.client.url(path))
            .bearer_auth(&self.token)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let resp = self.send(Method::GET, path).send().await?;
        read_json(resp).await
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.get("/users/me").await
    }

    pub async fn list_users(&self) -> ApiResult<Vec<User>> {
        self.get("/users").await
    }

    pub async fn set_user_status(&self, user_id: i64, status: UserStatus) -> ApiResult<()> {
        let resp = self
            .send(Method::PATCH, &format!("/users/{}/status", user_id))
            .query(&[("status", status.as_query())])
            .send()
            .await?;
        read_empty(resp).await
    }

    pub async fn dashboard(&self) -> ApiResult<DashboardData> {
        self.get("/dashboard").await
    }

    pub async fn bot_config(&self) -> ApiResult<BotConfig> {
        self.get("/bot").await
    }

    pub async fn save_bot_config(&self, config: &BotConfig) -> ApiResult<BotConfig> {
        let resp = self.send(Method::POST, "/bot").json(config).send().await?;
        read_json(resp).await
    }

    pub async fn strategies(&self) -> ApiResult<Vec<Strategy>> {
        let list: StrategiesResponse = self.get("/strategies").await?;
        Ok(list.into_vec())
    }

    pub async fn start_strategy(&self, id: &str, amount: f64) -> ApiResult<()> {
        let resp = self
            .send(Method::POST, &format!("/strategy/{}/start", id))
            .json(&StartStrategyRequest { amount })
            .send()
            .await?;
        read_empty(resp).await
    }

    pub async fn stop_strategy(&self, id: &str) -> ApiResult<()> {
        let resp = self
            .send(Method::POST, &format!("/strategy/{}/stop", id))
            .send()
            .await?;
        read_empty(resp).await
    }

    pub async fn strategy_logs(&self, id: &str, log_type: LogType) -> ApiResult<Vec<String>> {
        let resp = self
            .send(Method::GET, &format!("/strategy/{}/logs", id))
            .query(&[("log_type", log_type.as_query())])
            .send()
            .await?;
        let logs: LogsResponse = read_json(resp).await?;
        Ok(logs.logs)
    }

    /// Market buy of `amount` quote currency.
    pub async fn test_buy(&self, symbol: &str, amount: f64) -> ApiResult<OrderResponse> {
        let body = TestBuyRequest {
            symbol: symbol.to_string(),
            amount,
        };
        let resp = self
            .send(Method::POST, "/strategy/test/buy")
            .json(&body)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Market sell of `quantity` base currency.
    pub async fn test_sell(&self, symbol: &str, quantity: f64) -> ApiResult<OrderResponse> {
        let body = TestSellRequest {
            symbol: symbol.to_string(),
            quantity,
        };
        let resp = self
            .send(Method::POST, "/strategy/test/sell")
            .json(&body)
            .send()
            .await?;
        read_json(resp).await
    }

    /// Balances with something free or locked.
    pub async fn assets(&self) -> ApiResult<Vec<Balance>> {
        let resp: BalancesResponse = self.get("/assets").await?;
        Ok(resp
            .balances
            .into_iter()
            .filter(Balance::is_non_zero)
            .collect())
    }

    pub async fn settings(&self) -> ApiResult<ApiSettings> {
        self.get("/settings").await
    }

    pub async fn save_settings(&self, settings: &ApiSettings) -> ApiResult<()> {
        let resp = self
            .send(Method::POST, "/settings")
            .json(settings)
            .send()
            .await?;
        read_empty(resp).await
    }

    pub async fn portfolio_value(&self) -> ApiResult<f64> {
        let value: PortfolioValue = self.get("/portfolio_value").await?;
        Ok(value.total_usdt)
    }
}
