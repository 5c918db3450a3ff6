//! Token endpoint requests.
//!
//! Both grants POST an `application/x-www-form-urlencoded` body to the
//! configured access token endpoint and parse the JSON [`TokenResponse`].
//!
//! - [`exchange_code`]: redeems an authorization code (RFC 6749 section 4.1.3).
//! - [`refresh_access_token`]: redeems a refresh token (RFC 6749 section 6).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::auth::oauth::error::OAuthError;
use crate::config::RefreshTokenOptions;

const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";
const EXPIRATION_DATE_KEY: &str = "access_token_expiration_date";

/// A token endpoint response.
///
/// Fields a provider returns beyond the standard ones are kept in `extra`
/// and serialized back out unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// The token type, usually `Bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    /// Lifetime of the access token in seconds.
    #[serde(
        default,
        deserialize_with = "number_or_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub expires_in: Option<u64>,

    /// A refresh token, when the provider issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// The OpenID Connect ID token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,

    /// The granted scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// When the access token expires, computed on receipt from `expires_in`.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub access_token_expiration_date: Option<DateTime<Utc>>,

    /// Any other fields returned by the provider.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenResponse {
    /// Returns the access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::NoAccessToken`] when the response carries no
    /// non-blank access token.
    pub fn require_access_token(&self) -> Result<&str, OAuthError> {
        self.access_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or(OAuthError::NoAccessToken)
    }

    /// Returns `true` if the access token has expired at `now`.
    ///
    /// Tokens without a known lifetime never report as expired.
    #[must_use]
    pub fn expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expiration_date
            .is_some_and(|expires| expires <= now)
    }

    /// Computes `access_token_expiration_date` from `expires_in`.
    ///
    /// A lifetime too large to represent leaves the date unset. A provider
    /// field of the same name is discarded so it cannot shadow the computed
    /// one when serialized.
    fn stamp_expiration(mut self, issued_at: DateTime<Utc>) -> Self {
        self.extra.remove(EXPIRATION_DATE_KEY);
        self.access_token_expiration_date = self
            .expires_in
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime));
        self
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Request body for the authorization code grant.
#[derive(Debug, Serialize)]
struct CodeExchangeRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    redirect_uri: &'a str,
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

/// Request body for the refresh token grant.
#[derive(Debug, Serialize)]
struct TokenRefreshRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    refresh_token: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<&'a str>,
}

/// Parameters of an authorization code exchange.
#[derive(Clone, Copy, Debug)]
pub struct CodeExchange<'a> {
    /// The access token endpoint.
    pub token_endpoint: &'a str,
    /// The client id.
    pub client_id: &'a str,
    /// The redirect URL used in the authorization request.
    pub redirect_uri: &'a str,
    /// The authorization code from the redirect.
    pub code: &'a str,
    /// The PKCE verifier, when PKCE was used.
    pub code_verifier: Option<&'a str>,
    /// Whether to log the raw response body.
    pub logs_enabled: bool,
}

/// Exchanges an authorization code for tokens.
///
/// # Errors
///
/// - [`OAuthError::TokenExchangeFailed`] for network failures (status `0`),
///   non-2xx responses and unparseable bodies.
/// - [`OAuthError::NoAccessToken`] when the response carries no access token.
pub async fn exchange_code(
    http: &reqwest::Client,
    exchange: CodeExchange<'_>,
) -> Result<TokenResponse, OAuthError> {
    let request_body = CodeExchangeRequest {
        grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
        client_id: exchange.client_id,
        redirect_uri: exchange.redirect_uri,
        code: exchange.code,
        code_verifier: exchange.code_verifier,
    };

    tracing::debug!(endpoint = exchange.token_endpoint, "exchanging authorization code");

    let response = http
        .post(exchange.token_endpoint)
        .form(&request_body)
        .send()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| OAuthError::TokenExchangeFailed {
            status,
            message: format!("Failed to read token response: {e}"),
        })?;

    if exchange.logs_enabled {
        tracing::info!(status, body = %body, "access token response");
    }

    if !(200..300).contains(&status) {
        return Err(OAuthError::TokenExchangeFailed {
            status,
            message: body,
        });
    }

    let token_response: TokenResponse =
        serde_json::from_str(&body).map_err(|e| OAuthError::TokenExchangeFailed {
            status,
            message: format!("Failed to parse token response: {e}"),
        })?;
    token_response.require_access_token()?;

    Ok(token_response.stamp_expiration(Utc::now()))
}

/// Redeems a refresh token for a new access token.
///
/// # Errors
///
/// - [`OAuthError::TokenRefreshFailed`] for network failures (status `0`),
///   non-2xx responses and unparseable bodies. When the provider's error body
///   carries an OAuth `error` field it is surfaced in the error.
/// - [`OAuthError::NoAccessToken`] when the response carries no access token.
pub async fn refresh_access_token(
    http: &reqwest::Client,
    options: &RefreshTokenOptions,
) -> Result<TokenResponse, OAuthError> {
    let request_body = TokenRefreshRequest {
        grant_type: REFRESH_TOKEN_GRANT_TYPE,
        client_id: options.app_id(),
        refresh_token: options.refresh_token(),
        scope: options.scope(),
    };

    tracing::debug!(
        endpoint = options.access_token_endpoint(),
        "refreshing access token"
    );

    let response = http
        .post(options.access_token_endpoint())
        .form(&request_body)
        .send()
        .await
        .map_err(|e| OAuthError::TokenRefreshFailed {
            status: 0,
            error: None,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| OAuthError::TokenRefreshFailed {
            status,
            error: None,
            message: format!("Failed to read token response: {e}"),
        })?;

    if options.logs_enabled() {
        tracing::info!(status, body = %body, "refresh token response");
    }

    if !(200..300).contains(&status) {
        let error = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| json.get("error").and_then(Value::as_str).map(str::to_string));
        return Err(OAuthError::TokenRefreshFailed {
            status,
            error,
            message: body,
        });
    }

    let token_response: TokenResponse =
        serde_json::from_str(&body).map_err(|e| OAuthError::TokenRefreshFailed {
            status,
            error: None,
            message: format!("Failed to parse token response: {e}"),
        })?;
    token_response.require_access_token()?;

    Ok(token_response.stamp_expiration(Utc::now()))
}
