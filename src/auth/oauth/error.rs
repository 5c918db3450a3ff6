//! OAuth-specific error types.
//!
//! This module contains the error type for every failure an OAuth operation
//! can report: invalid configuration, user cancellation, state mismatches,
//! provider rejections and HTTP failures.
//!
//! # Error Codes
//!
//! Each variant maps to one of the fixed string codes the host reports to the
//! calling application, see [`OAuthError::code`].
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::auth::oauth::OAuthError;
//!
//! let error = OAuthError::UserCancelled;
//! assert_eq!(error.code(), "USER_CANCELLED");
//!
//! let error = OAuthError::StateMismatch {
//!     expected: "abc123".to_string(),
//!     received: Some("xyz789".to_string()),
//! };
//! assert_eq!(error.code(), "ERR_STATES_NOT_MATCH");
//! ```

use crate::error::ConfigError;
use thiserror::Error;

/// Errors that can occur during OAuth operations.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The configuration document is missing or has an invalid parameter.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The user closed the browser or cancelled the provider's flow.
    #[error("User cancelled the authorization flow")]
    UserCancelled,

    /// No browser was available to open the authorization request.
    #[error("No browser available to open the authorization request")]
    NoBrowser,

    /// The user agent finished without delivering a redirect.
    ///
    /// This happens when the provider redirects somewhere the host cannot
    /// intercept, usually because the redirect URL is misconfigured.
    #[error("The authorization flow finished without a redirect result")]
    NoRedirectResult,

    /// The redirect URL could not be parsed.
    #[error("Invalid redirect: {reason}")]
    InvalidRedirect {
        /// Description of what is wrong with the redirect.
        reason: String,
    },

    /// The `state` returned by the provider does not match the one sent.
    #[error("State parameter mismatch: expected '{expected}', received '{}'", .received.as_deref().unwrap_or(""))]
    StateMismatch {
        /// The state value sent with the authorization request.
        expected: String,
        /// The state value returned in the redirect, if any.
        received: Option<String>,
    },

    /// The provider redirected back with an OAuth `error` parameter.
    #[error("Authorization failed: {error}{}", .description.as_deref().map(|d| format!(" ({d})")).unwrap_or_default())]
    AuthorizationDenied {
        /// The OAuth `error` code returned by the provider.
        error: String,
        /// The optional `error_description`.
        description: Option<String>,
    },

    /// A code flow redirect carried no authorization code.
    #[error("The authorization response contains no authorization code")]
    NoAuthorizationCode,

    /// Exchanging the authorization code for tokens failed.
    #[error("Token exchange failed with status {status}: {message}")]
    TokenExchangeFailed {
        /// The HTTP status code returned, `0` for network failures.
        status: u16,
        /// The error message or response body.
        message: String,
    },

    /// Redeeming the refresh token failed.
    #[error("Token refresh failed with status {status}: {}", .error.as_deref().unwrap_or(.message.as_str()))]
    TokenRefreshFailed {
        /// The HTTP status code returned, `0` for network failures.
        status: u16,
        /// The OAuth `error` code returned by the provider, if any.
        error: Option<String>,
        /// The error message or response body.
        message: String,
    },

    /// A token response carried no access token.
    #[error("The token response contains no access token")]
    NoAccessToken,

    /// The resource URL request failed or returned a non-object body.
    #[error("Resource request failed with status {status}: {message}")]
    ResourceRequestFailed {
        /// The HTTP status code returned, `0` for network failures.
        status: u16,
        /// The error message or response body.
        message: String,
    },

    /// A custom handler could not obtain an access token.
    #[error("Custom handler '{handler}' login failed: {reason}")]
    CustomHandlerLogin {
        /// The configured handler name.
        handler: String,
        /// Why the handler failed.
        reason: String,
    },

    /// A custom handler could not log out.
    #[error("Custom handler '{handler}' logout failed: {reason}")]
    CustomHandlerLogout {
        /// The configured handler name.
        handler: String,
        /// Why the handler failed.
        reason: String,
    },

    /// The HTTP client could not be created.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl OAuthError {
    /// Returns the fixed error code reported to the host application.
    ///
    /// # Example
    ///
    /// ```rust
    /// use generic_oauth2::auth::oauth::OAuthError;
    /// use generic_oauth2::ConfigError;
    ///
    /// let error: OAuthError = ConfigError::MissingRedirectUrl.into();
    /// assert_eq!(error.code(), "ERR_PARAM_NO_REDIRECT_URL");
    /// ```
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(error) => error.code(),
            Self::UserCancelled => "USER_CANCELLED",
            Self::NoBrowser => "ERR_ANDROID_NO_BROWSER",
            Self::NoRedirectResult => "ERR_ANDROID_NO_INTENT",
            Self::StateMismatch { .. } => "ERR_STATES_NOT_MATCH",
            Self::AuthorizationDenied { .. } | Self::TokenExchangeFailed { .. } => {
                "ERR_AUTHORIZATION_FAILED"
            }
            Self::NoAuthorizationCode => "ERR_NO_AUTHORIZATION_CODE",
            Self::NoAccessToken => "ERR_NO_ACCESS_TOKEN",
            Self::CustomHandlerLogin { .. } => "ERR_CUSTOM_HANDLER_LOGIN",
            Self::CustomHandlerLogout { .. } => "ERR_CUSTOM_HANDLER_LOGOUT",
            Self::InvalidRedirect { .. }
            | Self::TokenRefreshFailed { .. }
            | Self::ResourceRequestFailed { .. }
            | Self::HttpClient(_) => "ERR_GENERAL",
        }
    }

    /// Returns the code to report to the calling application.
    ///
    /// Same as [`code`](Self::code), except that a rejected refresh reports
    /// the provider's OAuth `error` value (such as `invalid_grant`) when the
    /// provider sent one.
    ///
    /// # Example
    ///
    /// ```rust
    /// use generic_oauth2::auth::oauth::OAuthError;
    ///
    /// let error = OAuthError::TokenRefreshFailed {
    ///     status: 400,
    ///     error: Some("invalid_grant".to_string()),
    ///     message: String::new(),
    /// };
    /// assert_eq!(error.code(), "ERR_GENERAL");
    /// assert_eq!(error.reported_code(), "invalid_grant");
    /// ```
    #[must_use]
    pub fn reported_code(&self) -> &str {
        match self {
            Self::TokenRefreshFailed {
                error: Some(error), ..
            } => error,
            _ => self.code(),
        }
    }

    /// Returns the provider's OAuth `error` value, when one was returned.
    #[must_use]
    pub fn provider_error(&self) -> Option<&str> {
        match self {
            Self::AuthorizationDenied { error, .. } => Some(error),
            Self::TokenRefreshFailed { error, .. } => error.as_deref(),
            _ => None,
        }
    }
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
