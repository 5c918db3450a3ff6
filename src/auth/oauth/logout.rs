//! OpenID Connect RP-initiated logout.

use crate::auth::oauth::state::StateParam;
use crate::config::LogoutOptions;

/// A prepared end session request.
#[derive(Clone, Debug)]
pub struct EndSessionRequest {
    /// The full URL the user agent should open.
    pub url: String,

    /// The state sent with the request.
    pub state: StateParam,

    /// Where the provider redirects after logging out, if configured.
    pub post_logout_redirect_url: Option<String>,
}

/// Builds the end session request for `options`.
///
/// Returns `None` when there is no provider session to end, i.e. no
/// `id_token` or no end session endpoint.
///
/// # Example
///
/// ```rust
/// use generic_oauth2::{ConfigDocument, LogoutOptions, Platform};
/// use generic_oauth2::auth::oauth::build_end_session_request;
/// use serde_json::json;
///
/// let doc = ConfigDocument::try_from(json!({
///     "id_token": "eyJ.token",
///     "logoutUrl": "https://accounts.example.com/logout",
///     "redirectUrl": "com.example.app:/"
/// }))
/// .unwrap();
/// let options = LogoutOptions::from_document(&doc, Platform::Ios).unwrap();
///
/// let request = build_end_session_request(&options).unwrap();
/// assert!(request.url.starts_with(
///     "https://accounts.example.com/logout?id_token_hint=eyJ.token\
///      &post_logout_redirect_uri=com.example.app%3A%2F&state="
/// ));
/// ```
#[must_use]
pub fn build_end_session_request(options: &LogoutOptions) -> Option<EndSessionRequest> {
    let id_token = options.id_token()?;
    let endpoint = options.end_session_endpoint()?;
    let state = StateParam::from_raw(options.state());

    let mut params = vec![("id_token_hint", id_token)];
    if let Some(redirect) = options.post_logout_redirect_url() {
        params.push(("post_logout_redirect_uri", redirect));
    }
    params.push(("state", state.as_ref()));

    let query_string = params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let separator = if endpoint.contains('?') { '&' } else { '?' };

    Some(EndSessionRequest {
        url: format!("{endpoint}{separator}{query_string}"),
        post_logout_redirect_url: options.post_logout_redirect_url().map(str::to_string),
        state,
    })
}
