//! OAuth 2.0 and OpenID Connect protocol steps.
//!
//! Each step of a browser-based flow is a separate function so hosts can
//! drive flows themselves; [`OAuth2Client`](crate::OAuth2Client) composes them.
//!
//! 1. **Authorization request** ([`build_authorization_request`]): build the
//!    URL to open, with a fresh [`StateParam`] and optional [`PkceChallenge`].
//! 2. **Redirect** ([`parse_redirect`]): read the parameters the provider
//!    returned in the query or fragment, then
//!    [`verify_state`](AuthorizationResponse::verify_state).
//! 3. **Token endpoint** ([`exchange_code`], [`refresh_access_token`]): redeem
//!    the code or a refresh token for a [`TokenResponse`].
//! 4. **Resource** ([`fetch_resource`], [`assemble_result`]): call the
//!    resource URL with the access token and build the result object.
//! 5. **Logout** ([`build_end_session_request`]): end the provider session.
//!
//! # Security Features
//!
//! - **CSRF Protection**: every request carries a random 20 character state
//!   that the redirect must echo.
//! - **Constant-Time Comparison**: state comparison does not leak how much of
//!   a guess was correct.
//! - **PKCE**: `S256` challenges bind the code to the client that asked for it.
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::{AuthenticateOptions, ConfigDocument, Platform};
//! use generic_oauth2::auth::oauth::{build_authorization_request, parse_redirect};
//! use serde_json::json;
//!
//! let doc = ConfigDocument::try_from(json!({
//!     "appId": "client-id",
//!     "authorizationBaseUrl": "https://accounts.example.com/authorize",
//!     "responseType": "token",
//!     "redirectUrl": "https://app.example.com/"
//! }))
//! .unwrap();
//! let options = AuthenticateOptions::from_document(&doc, Platform::Web).unwrap();
//! let request = build_authorization_request(&options);
//!
//! // ... the browser lands on the redirect URL ...
//! let redirect = format!("https://app.example.com/#access_token=at&state={}", request.state);
//!
//! let response = parse_redirect(&redirect).unwrap();
//! response.verify_state(&request.state).unwrap();
//! assert_eq!(response.access_token(), Some("at"));
//! ```

mod authorization;
mod error;
mod logout;
mod pkce;
mod redirect;
mod resource;
mod state;
mod token;

pub use authorization::{build_authorization_request, AuthorizationRequest};
pub use error::OAuthError;
pub use logout::{build_end_session_request, EndSessionRequest};
pub use pkce::{compute_code_challenge, PkceChallenge, CODE_CHALLENGE_METHOD};
pub use redirect::{parse_redirect, AuthorizationResponse};
pub use resource::{assemble_result, fetch_resource};
pub use state::{constant_time_compare, StateParam};
pub use token::{exchange_code, refresh_access_token, CodeExchange, TokenResponse};
