//! Twitch app access tokens via the OAuth client-credentials grant.
//!
//! The viewer itself connects anonymously; the token is only needed for Helix
//! metadata lookups.

use serde_json::Value;
use std::error::Error as StdError;
use std::fmt;

pub const TWITCH_TOKEN_ENDPOINT: &str = "https://id.twitch.tv/oauth2/token";

#[derive(Debug)]
pub enum AuthError {
    Http(reqwest::Error),
    Decode {
        body: String,
        source: serde_json::Error,
    },
    MissingToken {
        body: String,
    },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Http(err) => write!(f, "token request failed: {err}"),
            AuthError::Decode { body, source } => {
                write!(f, "token response is not JSON ({source}): {body}")
            }
            AuthError::MissingToken { body } => write!(f, "failed to get access token: {body}"),
        }
    }
}

impl StdError for AuthError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AuthError::Http(err) => Some(err),
            AuthError::Decode { source, .. } => Some(source),
            AuthError::MissingToken { .. } => None,
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Http(err)
    }
}

pub async fn fetch_app_token(
    client: &reqwest::Client,
    endpoint: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<String, AuthError> {
    let form_fields = [
        ("client_id", client_id),
        ("client_secret", client_secret),
        ("grant_type", "client_credentials"),
    ];
    let body = client
        .post(endpoint)
        .form(&form_fields)
        .send()
        .await?
        .text()
        .await?;
    parse_token_response(&body)
}

/// Twitch answers errors with a JSON body too, so the status code is not
/// consulted: only a string `access_token` counts as success.
pub fn parse_token_response(body: &str) -> Result<String, AuthError> {
    let value: Value = serde_json::from_str(body).map_err(|source| AuthError::Decode {
        body: body.to_string(),
        source,
    })?;
    value
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AuthError::MissingToken {
            body: body.to_string(),
        })
}
