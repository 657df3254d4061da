//! Error types for the remote API layer.
//!
//! Every network call returns [`ApiResult`]; callers decide whether a failure
//! becomes a toast, a silent default, or a forced logout.

use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Connection refused, DNS, timeout, TLS
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response other than 401
    #[error("HTTP {code}: {detail}")]
    Status { code: u16, detail: String },

    /// 401 from the backend; the session is no longer valid
    #[error("Session expired, please log in again")]
    Unauthorized,

    /// Body did not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// 2xx response carrying an `{"error": ...}` body
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A fetch was requested with no tokio runtime entered (native only)
    #[error("No async runtime available")]
    NoRuntime,
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Map a status code and raw body to success or the matching error.
pub fn check_status(code: u16, body: &str) -> ApiResult<()> {
    match code {
        200..=299 => Ok(()),
        401 => Err(ApiError::Unauthorized),
        _ => Err(ApiError::Status {
            code,
            detail: extract_detail(body).unwrap_or_else(|| fallback_detail(body)),
        }),
    }
}

/// `{"detail": ...}` bodies. FastAPI validation errors send a list; it is shown as JSON.
pub fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn fallback_detail(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no details".to_string()
    } else {
        trimmed.chars().take(MAX_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_codes_pass() {
        assert_eq!(check_status(200, ""), Ok(()));
        assert_eq!(check_status(204, ""), Ok(()));
    }

    #[test]
    fn unauthorized_is_distinct() {
        let err = check_status(401, r#"{"detail":"Could not validate credentials"}"#);
        assert_eq!(err, Err(ApiError::Unauthorized));
        assert!(ApiError::Unauthorized.is_unauthorized());
    }

    #[test]
    fn detail_text_is_surfaced() {
        let err = check_status(400, r#"{"detail":"Username already registered"}"#);
        assert_eq!(
            err,
            Err(ApiError::Status {
                code: 400,
                detail: "Username already registered".to_string()
            })
        );
    }

    #[test]
    fn non_json_body_falls_back_to_text() {
        match check_status(502, "Bad Gateway") {
            Err(ApiError::Status { code, detail }) => {
                assert_eq!(code, 502);
                assert_eq!(detail, "Bad Gateway");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(extract_detail("[1,2]"), None);
    }

    #[test]
    fn json_errors_become_decode() {
        let json_err = serde_json::from_str::<i32>("invalid").unwrap_err();
        let err: ApiError = json_err.into();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
