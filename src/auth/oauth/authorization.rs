//! Authorization request URL generation.
//!
//! This module provides [`build_authorization_request`], the first step of
//! every interactive flow. It turns validated [`AuthenticateOptions`] into the
//! URL the user agent opens, and returns the values needed later to verify
//! the redirect and redeem the code.
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::{AuthenticateOptions, ConfigDocument, Platform};
//! use generic_oauth2::auth::oauth::build_authorization_request;
//! use serde_json::json;
//!
//! let doc = ConfigDocument::try_from(json!({
//!     "appId": "client-id",
//!     "authorizationBaseUrl": "https://accounts.example.com/authorize",
//!     "responseType": "code",
//!     "redirectUrl": "com.example.app:/",
//!     "scope": "openid email",
//!     "state": "fixed-state"
//! }))
//! .unwrap();
//! let options = AuthenticateOptions::from_document(&doc, Platform::Web).unwrap();
//!
//! let request = build_authorization_request(&options);
//! assert_eq!(
//!     request.url,
//!     "https://accounts.example.com/authorize?client_id=client-id&response_type=code\
//!      &redirect_uri=com.example.app%3A%2F&scope=openid%20email&state=fixed-state"
//! );
//! ```

use crate::auth::oauth::state::StateParam;
use crate::config::AuthenticateOptions;

/// A prepared authorization request.
///
/// The `state` and `code_verifier` belong to this request only. They are
/// handed back to the caller instead of being stored on a client, so two
/// concurrent flows never see each other's values.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
    /// The full URL the user agent should open.
    pub url: String,

    /// The state sent with the request, compared against the redirect.
    pub state: StateParam,

    /// The redirect URL the provider returns to.
    pub redirect_url: String,

    /// The PKCE verifier to send with the token request, when PKCE is on.
    pub code_verifier: Option<String>,
}

// Verify AuthorizationRequest is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AuthorizationRequest>();
};

/// Builds the authorization URL for `options`.
///
/// Parameters are appended in a fixed order: `client_id`, `response_type`,
/// `redirect_uri`, `scope`, `state`, the OpenID Connect parameters, the PKCE
/// challenge, then any remaining extra parameters sorted by name. Keys and
/// values are percent-encoded.
#[must_use]
pub fn build_authorization_request(options: &AuthenticateOptions) -> AuthorizationRequest {
    let state = StateParam::from_raw(options.state());

    let mut params: Vec<(&str, String)> = vec![
        ("client_id", options.app_id().to_string()),
        ("response_type", options.response_type().to_string()),
        ("redirect_uri", options.redirect_url().to_string()),
    ];

    let optional = [
        ("scope", options.scope()),
        ("state", Some(state.as_ref())),
        ("display", options.display()),
        ("login_hint", options.login_hint()),
        ("prompt", options.prompt()),
        ("response_mode", options.response_mode()),
    ];
    params.extend(
        optional
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v.to_string()))),
    );

    if let Some(pkce) = options.pkce() {
        params.push(("code_challenge", pkce.challenge().to_string()));
        params.push(("code_challenge_method", pkce.method().to_string()));
    }

    params.extend(
        options
            .additional_parameters()
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone())),
    );

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let base = options.authorization_base_url();
    let separator = if base.contains('?') { '&' } else { '?' };

    AuthorizationRequest {
        url: format!("{base}{separator}{query_string}"),
        state,
        redirect_url: options.redirect_url().to_string(),
        code_verifier: options.pkce_code_verifier().map(str::to_string),
    }
}
