//! The authenticated call to the resource URL and result assembly.
//!
//! After an access token is obtained, the configured resource URL (typically
//! a user info endpoint) is fetched with the token. Its JSON object becomes
//! the body of the `authenticate` result.

use serde_json::{Map, Value};

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::redirect::AuthorizationResponse;
use crate::auth::oauth::token::TokenResponse;
use crate::config::ResourceOptions;

/// Fetches the resource URL with `access_token` as a bearer token.
///
/// Returns an empty object when no resource URL is configured.
///
/// # Errors
///
/// Returns [`OAuthError::ResourceRequestFailed`] for network failures
/// (status `0`), non-2xx responses and bodies that are not a JSON object.
pub async fn fetch_resource(
    http: &reqwest::Client,
    options: &ResourceOptions,
    access_token: &str,
) -> Result<Map<String, Value>, OAuthError> {
    let Some(url) = options.resource_url() else {
        return Ok(Map::new());
    };

    tracing::debug!(url, "requesting resource");

    let mut request = http.get(url).bearer_auth(access_token);
    for (name, value) in options.additional_headers() {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request
        .send()
        .await
        .map_err(|e| OAuthError::ResourceRequestFailed {
            status: 0,
            message: format!("Network error: {e}"),
        })?;

    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| OAuthError::ResourceRequestFailed {
            status,
            message: format!("Failed to read resource response: {e}"),
        })?;

    if options.logs_enabled() {
        tracing::info!(status, body = %body, "resource response");
    }

    if !(200..300).contains(&status) {
        tracing::warn!(status, "resource request failed");
        return Err(OAuthError::ResourceRequestFailed {
            status,
            message: body,
        });
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(OAuthError::ResourceRequestFailed {
            status,
            message: "Resource response is not a JSON object".to_string(),
        }),
        Err(e) => Err(OAuthError::ResourceRequestFailed {
            status,
            message: format!("Invalid JSON in resource response: {e}"),
        }),
    }
}

/// Builds the `authenticate` result from the resource body and whatever the
/// flow produced.
///
/// The `access_token`, `authorization_response` and `access_token_response`
/// keys are added when available and replace same-named resource fields.
#[must_use]
pub fn assemble_result(
    resource: Map<String, Value>,
    access_token: Option<&str>,
    authorization_response: Option<&AuthorizationResponse>,
    token_response: Option<&TokenResponse>,
) -> Value {
    let mut result = resource;

    if let Some(authorization_response) = authorization_response {
        result.insert(
            "authorization_response".to_string(),
            Value::Object(
                authorization_response
                    .params()
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        );
    }
    if let Some(token_response) = token_response.and_then(|t| serde_json::to_value(t).ok()) {
        result.insert("access_token_response".to_string(), token_response);
    }
    if let Some(access_token) = access_token {
        result.insert(
            "access_token".to_string(),
            Value::String(access_token.to_string()),
        );
    }

    Value::Object(result)
}
