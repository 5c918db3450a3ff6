//! Configuration error types.
//!
//! This module contains the errors raised when a configuration document is
//! missing a required parameter or carries an invalid one.
//!
//! # Error Codes
//!
//! Hosts report failures back to the calling application as fixed string
//! codes. Every variant maps to one through [`ConfigError::code`].
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::ConfigError;
//!
//! let error = ConfigError::MissingAppId;
//! assert_eq!(error.code(), "ERR_PARAM_NO_APP_ID");
//! ```

use thiserror::Error;

/// Errors raised while building request options from a configuration document.
///
/// The configuration resolver itself never fails; these errors only appear
/// once options are validated for a particular operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The `appId` parameter is missing or blank.
    #[error("Missing required parameter 'appId'. Provide the client id issued by the OAuth provider.")]
    MissingAppId,

    /// The `authorizationBaseUrl` parameter is missing or blank.
    #[error("Missing required parameter 'authorizationBaseUrl'.")]
    MissingAuthorizationBaseUrl,

    /// The `redirectUrl` parameter is missing or blank.
    #[error("Missing required parameter 'redirectUrl'.")]
    MissingRedirectUrl,

    /// The `responseType` parameter is missing or blank.
    #[error("Missing required parameter 'responseType'.")]
    MissingResponseType,

    /// The `responseType` parameter names an unsupported response type.
    #[error("Invalid response type '{value}'. Expected a space separated combination of 'code', 'token' and 'id_token'.")]
    InvalidResponseType {
        /// The response type that was provided.
        value: String,
    },

    /// The `accessTokenEndpoint` parameter is missing or blank.
    #[error("Missing required parameter 'accessTokenEndpoint'.")]
    MissingAccessTokenEndpoint,

    /// The `refreshToken` parameter is missing or blank.
    #[error("Missing required parameter 'refreshToken'.")]
    MissingRefreshToken,

    /// The `logoutUrl` parameter is missing while an `id_token` was given.
    #[error("Missing required parameter 'logoutUrl' for ending the provider session.")]
    MissingLogoutUrl,

    /// A platform name could not be parsed.
    #[error("Unknown platform '{platform}'. Expected 'android', 'ios' or 'web'.")]
    UnknownPlatform {
        /// The platform name that was provided.
        platform: String,
    },
}

impl ConfigError {
    /// Returns the fixed error code reported to the host application.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingAppId => "ERR_PARAM_NO_APP_ID",
            Self::MissingAuthorizationBaseUrl => "ERR_PARAM_NO_AUTHORIZATION_BASE_URL",
            Self::MissingRedirectUrl => "ERR_PARAM_NO_REDIRECT_URL",
            Self::MissingResponseType => "ERR_PARAM_NO_RESPONSE_TYPE",
            Self::InvalidResponseType { .. } => "ERR_PARAM_INVALID_RESPONSE_TYPE",
            Self::MissingAccessTokenEndpoint => "ERR_PARAM_NO_ACCESS_TOKEN_ENDPOINT",
            Self::MissingRefreshToken => "ERR_PARAM_NO_REFRESH_TOKEN",
            Self::MissingLogoutUrl => "ERR_PARAM_NO_LOGOUT_URL",
            Self::UnknownPlatform { .. } => "ERR_GENERAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_app_id_code_and_message() {
        let error = ConfigError::MissingAppId;
        assert_eq!(error.code(), "ERR_PARAM_NO_APP_ID");
        assert!(error.to_string().contains("appId"));
    }

    #[test]
    fn test_invalid_response_type_includes_value() {
        let error = ConfigError::InvalidResponseType {
            value: "magic".to_string(),
        };
        assert_eq!(error.code(), "ERR_PARAM_INVALID_RESPONSE_TYPE");
        assert!(error.to_string().contains("magic"));
    }

    #[test]
    fn test_codes_are_distinct_for_required_parameters() {
        let codes = [
            ConfigError::MissingAppId.code(),
            ConfigError::MissingAuthorizationBaseUrl.code(),
            ConfigError::MissingRedirectUrl.code(),
            ConfigError::MissingResponseType.code(),
            ConfigError::MissingAccessTokenEndpoint.code(),
            ConfigError::MissingRefreshToken.code(),
            ConfigError::MissingLogoutUrl.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::MissingRefreshToken;
        let _: &dyn std::error::Error = &error;
    }
}
