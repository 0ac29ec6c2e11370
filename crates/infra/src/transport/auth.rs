//! Authentication wire format

use erpbridge_domain::{BridgeError, Credentials, Result, TokenPair};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl<'a> From<&'a Credentials> for LoginRequest<'a> {
    fn from(credentials: &'a Credentials) -> Self {
        Self { username: &credentials.username, password: &credentials.password }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

/// Extract a token pair from a 2xx login/refresh body.
///
/// Accepts a bare token object or the standard envelope with the tokens under
/// `data`. A body without a non-empty access token is an authentication
/// failure.
pub(crate) fn parse_token_body(body: &str) -> Result<TokenPair> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| BridgeError::Auth(format!("authentication response is not JSON: {e}")))?;

    let tokens = match value.get("success").and_then(Value::as_bool) {
        Some(false) => {
            let message = value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("remote rejected the credentials");
            return Err(BridgeError::Auth(message.to_string()));
        }
        Some(true) => value.get("data").cloned().unwrap_or(Value::Null),
        None => value,
    };

    let pair: TokenPair = serde_json::from_value(tokens).map_err(|_| {
        BridgeError::Auth("authentication response carried no access token".into())
    })?;

    if pair.access_token.trim().is_empty() {
        return Err(BridgeError::Auth(
            "authentication response carried an empty access token".into(),
        ));
    }

    Ok(pair)
}
