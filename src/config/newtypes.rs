//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction so that the rest
//! of the crate can rely on them.

use crate::error::ConfigError;
use std::fmt;

/// A validated OAuth 2 / OIDC `response_type`.
///
/// The value is a space separated combination of `code`, `token` and
/// `id_token`, e.g. `"code"`, `"token"` or `"code id_token"`.
///
/// # Example
///
/// ```rust
/// use generic_oauth2::ResponseType;
///
/// let response_type = ResponseType::new("code").unwrap();
/// assert!(response_type.includes_code());
///
/// assert!(ResponseType::new("magic").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResponseType(String);

impl ResponseType {
    const ALLOWED: [&'static str; 3] = ["code", "token", "id_token"];

    /// Creates a validated response type.
    ///
    /// Surrounding whitespace is ignored and the inner separators are
    /// normalized to single spaces.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingResponseType`] for blank input and
    /// [`ConfigError::InvalidResponseType`] when any part is not supported.
    pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ConfigError::MissingResponseType);
        }
        if parts.iter().any(|part| !Self::ALLOWED.contains(part)) {
            return Err(ConfigError::InvalidResponseType { value });
        }
        Ok(Self(parts.join(" ")))
    }

    /// Returns `true` if an authorization code is requested.
    #[must_use]
    pub fn includes_code(&self) -> bool {
        self.0.split(' ').any(|part| part == "code")
    }

    /// Returns `true` if an access token is requested directly (implicit flow).
    #[must_use]
    pub fn includes_token(&self) -> bool {
        self.0.split(' ').any(|part| part == "token")
    }
}

impl AsRef<str> for ResponseType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
