//! Parsing of the provider's redirect back to the application.
//!
//! Providers return parameters either in the query string (code flow) or in
//! the fragment (implicit flow). [`parse_redirect`] reads whichever comes
//! first and turns a provider `error` into [`OAuthError::AuthorizationDenied`].
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::auth::oauth::{parse_redirect, StateParam};
//!
//! let response = parse_redirect("com.example.app:/callback?code=abc&state=xyz").unwrap();
//! assert_eq!(response.code(), Some("abc"));
//! assert!(response.verify_state(&StateParam::from_raw("xyz")).is_ok());
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::auth::oauth::error::OAuthError;
use crate::auth::oauth::state::StateParam;

/// Parameters returned by the provider on redirect.
///
/// Serializes as a flat JSON object of the returned parameters, which is what
/// `authorization_response` holds in an `authenticate` result.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AuthorizationResponse {
    params: BTreeMap<String, String>,
}

impl AuthorizationResponse {
    /// Returns a parameter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the authorization code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.get("code")
    }

    /// Returns the echoed state.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        self.get("state")
    }

    /// Returns the access token of an implicit flow response.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.get("access_token")
    }

    /// Returns the token type of an implicit flow response.
    #[must_use]
    pub fn token_type(&self) -> Option<&str> {
        self.get("token_type")
    }

    /// Returns the token lifetime in seconds, when present and numeric.
    #[must_use]
    pub fn expires_in(&self) -> Option<u64> {
        self.get("expires_in").and_then(|v| v.parse().ok())
    }

    /// Returns the OpenID Connect ID token.
    #[must_use]
    pub fn id_token(&self) -> Option<&str> {
        self.get("id_token")
    }

    /// Returns the granted scope.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.get("scope")
    }

    /// Returns all returned parameters.
    #[must_use]
    pub const fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    /// Checks the echoed state against the state sent with the request.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::StateMismatch`] when the state is missing or
    /// differs.
    pub fn verify_state(&self, expected: &StateParam) -> Result<(), OAuthError> {
        match self.state() {
            Some(received) if expected.matches(received) => Ok(()),
            received => Err(OAuthError::StateMismatch {
                expected: expected.to_string(),
                received: received.map(str::to_string),
            }),
        }
    }
}

/// Parses the redirect URL the user agent landed on.
///
/// Parameters are read from the fragment when it comes before the query or
/// when there is no query, otherwise from the query with any trailing
/// fragment dropped. Pairs with an empty name are skipped and values are
/// percent-decoded.
///
/// # Errors
///
/// - [`OAuthError::InvalidRedirect`] when the URL carries no parameters.
/// - [`OAuthError::AuthorizationDenied`] when the provider returned an
///   `error` parameter.
pub fn parse_redirect(url: &str) -> Result<AuthorizationResponse, OAuthError> {
    let params = redirect_params(url).ok_or_else(|| OAuthError::InvalidRedirect {
        reason: "redirect URL carries no parameters".to_string(),
    })?;
    let response = AuthorizationResponse { params };

    if let Some(error) = response.get("error") {
        return Err(OAuthError::AuthorizationDenied {
            error: error.to_string(),
            description: response.get("error_description").map(str::to_string),
        });
    }

    Ok(response)
}

fn redirect_params(url: &str) -> Option<BTreeMap<String, String>> {
    let url = url.trim();
    let raw = match (url.find('#'), url.find('?')) {
        (Some(hash), Some(query)) if hash < query => &url[hash + 1..],
        (Some(hash), None) => &url[hash + 1..],
        (_, Some(query)) => {
            let rest = &url[query + 1..];
            rest.split_once('#').map_or(rest, |(query, _)| query)
        }
        (None, None) => return None,
    };

    let params: BTreeMap<String, String> = raw
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((decode(key), decode(value)))
        })
        .collect();

    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(value).map_or_else(|_| value.to_string(), |v| v.into_owned())
}
