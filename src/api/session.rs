use serde::{Deserialize, Serialize};

use super::client::{ApiClient, AuthContext};
use super::error::ApiError;
use super::models::User;

/// Who is logged in. The token persists with the app state; the profile is refetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    token: Option<String>,
    #[serde(skip)]
    user: Option<User>,
}

impl Session {
    pub fn with_token(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            user: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login(&mut self, token: String) {
        self.token = Some(token).filter(|t| !t.is_empty());
        self.user = None;
    }

    pub fn set_user(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn logout(&mut self) {
        if self.token.is_some() {
            log::info!("Session cleared");
        }
        self.token = None;
        self.user = None;
    }

    /// Bind the token to `client`, if logged in.
    pub fn auth(&self, client: &ApiClient) -> Option<AuthContext> {
        self.token.as_deref().map(|t| client.authorize(t))
    }

    /// Logs out on 401. Returns true when the session ended.
    pub fn handle_error(&mut self, err: &ApiError) -> bool {
        if err.is_unauthorized() {
            log::warn!("Backend rejected the session token");
            self.logout();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::check_status;

    #[test]
    fn unauthorized_response_ends_session() {
        let mut session = Session::with_token(Some("abc".to_string()));
        session.set_user(User {
            id: 1,
            username: "trader".to_string(),
            status: Default::default(),
        });

        let err = check_status(401, r#"{"detail":"Not authenticated"}"#).unwrap_err();
        assert!(session.handle_error(&err));
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
    }

    #[test]
    fn other_errors_keep_session() {
        let mut session = Session::with_token(Some("abc".to_string()));
        let err = ApiError::Status {
            code: 500,
            detail: "boom".to_string(),
        };
        assert!(!session.handle_error(&err));
        assert_eq!(session.token(), Some("abc"));
    }

    #[test]
    fn empty_token_is_not_a_session() {
        assert!(!Session::with_token(Some(String::new())).is_authenticated());
        let mut session = Session::default();
        session.login("tok".to_string());
        assert!(session.is_authenticated());
        session.logout();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn auth_context_requires_token() {
        let client = ApiClient::new("http://localhost:8000", "https://api.binance.com");
        assert!(Session::default().auth(&client).is_none());
        assert!(Session::with_token(Some("t".into())).auth(&client).is_some());
    }
}
