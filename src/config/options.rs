//! Typed request options resolved from a [`ConfigDocument`].
//!
//! Each host operation reads its parameters through the resolver, applying
//! the platform override rule and normalizing blank strings to absent, then
//! validates the parameters it cannot work without.
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::{AuthenticateOptions, ConfigDocument, Platform};
//! use serde_json::json;
//!
//! let doc = ConfigDocument::try_from(json!({
//!     "appId": "client-id",
//!     "authorizationBaseUrl": "https://accounts.example.com/authorize",
//!     "responseType": "code",
//!     "redirectUrl": "com.example.app:/",
//!     "pkceEnabled": true,
//!     "android": { "appId": "android-client-id" }
//! }))
//! .unwrap();
//!
//! let options = AuthenticateOptions::from_document(&doc, Platform::Android).unwrap();
//! assert_eq!(options.app_id(), "android-client-id");
//! assert_eq!(options.state().len(), 20);
//! assert_eq!(options.pkce_code_verifier().map(str::len), Some(64));
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::auth::oauth::PkceChallenge;
use crate::config::document::{random_string, trim_to_null, ConfigDocument};
use crate::config::{Platform, ResponseType};
use crate::error::ConfigError;

const PARAM_APP_ID: &str = "appId";
const PARAM_AUTHORIZATION_BASE_URL: &str = "authorizationBaseUrl";
const PARAM_RESPONSE_TYPE: &str = "responseType";
const PARAM_REDIRECT_URL: &str = "redirectUrl";
const PARAM_SCOPE: &str = "scope";
const PARAM_STATE: &str = "state";
const PARAM_ACCESS_TOKEN_ENDPOINT: &str = "accessTokenEndpoint";
const PARAM_PKCE_ENABLED: &str = "pkceEnabled";
const PARAM_RESOURCE_URL: &str = "resourceUrl";
const PARAM_ADDITIONAL_RESOURCE_HEADERS: &str = "additionalResourceHeaders";
const PARAM_ADDITIONAL_PARAMETERS: &str = "additionalParameters";
const PARAM_CUSTOM_HANDLER_CLASS: &str = "customHandlerClass";
const PARAM_LOGS_ENABLED: &str = "logsEnabled";
const PARAM_REFRESH_TOKEN: &str = "refreshToken";
const PARAM_LOGOUT_URL: &str = "logoutUrl";
const PARAM_POST_LOGOUT_REDIRECT_URL: &str = "postLogoutRedirectUrl";
const PARAM_ID_TOKEN: &str = "id_token";

// OpenID Connect parameters lifted out of `additionalParameters`
const PARAM_DISPLAY: &str = "display";
const PARAM_LOGIN_HINT: &str = "login_hint";
const PARAM_PROMPT: &str = "prompt";
const PARAM_RESPONSE_MODE: &str = "response_mode";

/// Length of generated `state` values.
pub const STATE_LENGTH: usize = 20;

/// Length of generated PKCE code verifiers.
pub const PKCE_VERIFIER_LENGTH: usize = 64;

fn overridden_string(doc: &ConfigDocument, platform: Platform, key: &str) -> Option<String> {
    doc.platform_param::<String>(platform, key)
        .and_then(trim_to_null)
}

fn overridden_flag(doc: &ConfigDocument, platform: Platform, key: &str) -> bool {
    doc.platform_param::<bool>(platform, key).unwrap_or(false)
}

/// Returns the custom handler configured in the platform block, if any.
///
/// Unlike other parameters the handler name is only read from
/// `<platform>.customHandlerClass`; a top-level value is ignored.
#[must_use]
pub fn custom_handler_name(doc: &ConfigDocument, platform: Platform) -> Option<String> {
    doc.param::<String>(&platform.override_key(PARAM_CUSTOM_HANDLER_CLASS))
        .and_then(trim_to_null)
}

/// Options for the follow-up call to the protected resource URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResourceOptions {
    resource_url: Option<String>,
    additional_headers: HashMap<String, String>,
    logs_enabled: bool,
}

impl ResourceOptions {
    /// Resolves resource options from a document.
    #[must_use]
    pub fn from_document(doc: &ConfigDocument, platform: Platform) -> Self {
        Self {
            resource_url: overridden_string(doc, platform, PARAM_RESOURCE_URL),
            additional_headers: doc.platform_param_map(platform, PARAM_ADDITIONAL_RESOURCE_HEADERS),
            logs_enabled: overridden_flag(doc, platform, PARAM_LOGS_ENABLED),
        }
    }

    /// Creates resource options for `resource_url` without extra headers.
    #[must_use]
    pub fn new(resource_url: Option<String>) -> Self {
        Self {
            resource_url,
            ..Self::default()
        }
    }

    /// Adds a header sent with the resource request.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_headers.insert(name.into(), value.into());
        self
    }

    /// Enables or disables verbose response logging.
    #[must_use]
    pub const fn with_logs_enabled(mut self, enabled: bool) -> Self {
        self.logs_enabled = enabled;
        self
    }

    /// Returns the resource URL, if configured.
    #[must_use]
    pub fn resource_url(&self) -> Option<&str> {
        self.resource_url.as_deref()
    }

    /// Returns the extra headers for the resource request.
    #[must_use]
    pub const fn additional_headers(&self) -> &HashMap<String, String> {
        &self.additional_headers
    }

    /// Returns whether response bodies are logged.
    #[must_use]
    pub const fn logs_enabled(&self) -> bool {
        self.logs_enabled
    }
}

/// Validated options for the `authenticate` operation.
///
/// A fresh `state` (and a PKCE verifier, when enabled) is generated every
/// time options are resolved, so each authorization attempt carries its own
/// values.
#[derive(Clone, Debug)]
pub struct AuthenticateOptions {
    app_id: String,
    authorization_base_url: String,
    response_type: ResponseType,
    redirect_url: String,
    access_token_endpoint: Option<String>,
    scope: Option<String>,
    state: String,
    pkce: Option<PkceChallenge>,
    display: Option<String>,
    login_hint: Option<String>,
    prompt: Option<String>,
    response_mode: Option<String>,
    additional_parameters: BTreeMap<String, String>,
    resource: ResourceOptions,
}

impl AuthenticateOptions {
    /// Resolves and validates authenticate options.
    ///
    /// # Errors
    ///
    /// Returns, in this order of precedence:
    /// - [`ConfigError::MissingAppId`]
    /// - [`ConfigError::MissingAuthorizationBaseUrl`]
    /// - [`ConfigError::MissingResponseType`] or [`ConfigError::InvalidResponseType`]
    /// - [`ConfigError::MissingRedirectUrl`]
    pub fn from_document(doc: &ConfigDocument, platform: Platform) -> Result<Self, ConfigError> {
        let app_id =
            overridden_string(doc, platform, PARAM_APP_ID).ok_or(ConfigError::MissingAppId)?;
        let authorization_base_url = overridden_string(doc, platform, PARAM_AUTHORIZATION_BASE_URL)
            .ok_or(ConfigError::MissingAuthorizationBaseUrl)?;
        let response_type = overridden_string(doc, platform, PARAM_RESPONSE_TYPE)
            .ok_or(ConfigError::MissingResponseType)
            .and_then(ResponseType::new)?;
        let redirect_url = overridden_string(doc, platform, PARAM_REDIRECT_URL)
            .ok_or(ConfigError::MissingRedirectUrl)?;

        let pkce = overridden_flag(doc, platform, PARAM_PKCE_ENABLED).then(PkceChallenge::generate);
        let state = overridden_string(doc, platform, PARAM_STATE)
            .unwrap_or_else(|| random_string(STATE_LENGTH));

        let mut options = Self {
            app_id,
            authorization_base_url,
            response_type,
            redirect_url,
            access_token_endpoint: overridden_string(doc, platform, PARAM_ACCESS_TOKEN_ENDPOINT),
            scope: overridden_string(doc, platform, PARAM_SCOPE),
            state,
            pkce,
            display: None,
            login_hint: None,
            prompt: None,
            response_mode: None,
            additional_parameters: BTreeMap::new(),
            resource: ResourceOptions::from_document(doc, platform),
        };

        for (key, value) in doc.platform_param_map(platform, PARAM_ADDITIONAL_PARAMETERS) {
            let Some(value) = trim_to_null(value) else {
                continue;
            };
            match key.as_str() {
                PARAM_DISPLAY => options.display = Some(value),
                PARAM_LOGIN_HINT => options.login_hint = Some(value),
                PARAM_PROMPT => options.prompt = Some(value),
                PARAM_RESPONSE_MODE => options.response_mode = Some(value),
                _ => {
                    options.additional_parameters.insert(key, value);
                }
            }
        }

        Ok(options)
    }

    /// Returns the client id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the provider's authorization endpoint.
    #[must_use]
    pub fn authorization_base_url(&self) -> &str {
        &self.authorization_base_url
    }

    /// Returns the requested response type.
    #[must_use]
    pub const fn response_type(&self) -> &ResponseType {
        &self.response_type
    }

    /// Returns the redirect URL registered with the provider.
    #[must_use]
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// Returns the token endpoint, if configured.
    #[must_use]
    pub fn access_token_endpoint(&self) -> Option<&str> {
        self.access_token_endpoint.as_deref()
    }

    /// Returns the requested scope, if configured.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns the anti-CSRF state sent with this request.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns the PKCE verifier and challenge when PKCE is enabled.
    #[must_use]
    pub const fn pkce(&self) -> Option<&PkceChallenge> {
        self.pkce.as_ref()
    }

    /// Returns the PKCE code verifier when PKCE is enabled.
    #[must_use]
    pub fn pkce_code_verifier(&self) -> Option<&str> {
        self.pkce.as_ref().map(PkceChallenge::verifier)
    }

    /// Returns the OIDC `display` parameter.
    #[must_use]
    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Returns the OIDC `login_hint` parameter.
    #[must_use]
    pub fn login_hint(&self) -> Option<&str> {
        self.login_hint.as_deref()
    }

    /// Returns the OIDC `prompt` parameter.
    #[must_use]
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Returns the OAuth `response_mode` parameter.
    #[must_use]
    pub fn response_mode(&self) -> Option<&str> {
        self.response_mode.as_deref()
    }

    /// Returns the remaining extra authorization parameters.
    #[must_use]
    pub const fn additional_parameters(&self) -> &BTreeMap<String, String> {
        &self.additional_parameters
    }

    /// Returns the resource call options.
    #[must_use]
    pub const fn resource(&self) -> &ResourceOptions {
        &self.resource
    }

    /// Returns whether response bodies are logged.
    #[must_use]
    pub const fn logs_enabled(&self) -> bool {
        self.resource.logs_enabled
    }
}

/// Validated options for the `refreshToken` operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshTokenOptions {
    app_id: String,
    access_token_endpoint: String,
    refresh_token: String,
    scope: Option<String>,
    logs_enabled: bool,
}

impl RefreshTokenOptions {
    /// Resolves and validates refresh options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingAppId`],
    /// [`ConfigError::MissingAccessTokenEndpoint`] or
    /// [`ConfigError::MissingRefreshToken`], checked in that order.
    pub fn from_document(doc: &ConfigDocument, platform: Platform) -> Result<Self, ConfigError> {
        let app_id =
            overridden_string(doc, platform, PARAM_APP_ID).ok_or(ConfigError::MissingAppId)?;
        let access_token_endpoint = overridden_string(doc, platform, PARAM_ACCESS_TOKEN_ENDPOINT)
            .ok_or(ConfigError::MissingAccessTokenEndpoint)?;
        let refresh_token = overridden_string(doc, platform, PARAM_REFRESH_TOKEN)
            .ok_or(ConfigError::MissingRefreshToken)?;

        Ok(Self {
            app_id,
            access_token_endpoint,
            refresh_token,
            scope: overridden_string(doc, platform, PARAM_SCOPE),
            logs_enabled: overridden_flag(doc, platform, PARAM_LOGS_ENABLED),
        })
    }

    /// Returns the client id.
    #[must_use]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Returns the token endpoint.
    #[must_use]
    pub fn access_token_endpoint(&self) -> &str {
        &self.access_token_endpoint
    }

    /// Returns the refresh token to redeem.
    #[must_use]
    pub fn refresh_token(&self) -> &str {
        &self.refresh_token
    }

    /// Returns the requested scope, if configured.
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Returns whether response bodies are logged.
    #[must_use]
    pub const fn logs_enabled(&self) -> bool {
        self.logs_enabled
    }
}

/// Options for the `logout` operation.
///
/// Without an `id_token` there is no provider session to end and logout
/// completes locally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogoutOptions {
    id_token: Option<String>,
    end_session_endpoint: Option<String>,
    post_logout_redirect_url: Option<String>,
    state: String,
    logs_enabled: bool,
}

impl LogoutOptions {
    /// Resolves logout options.
    ///
    /// `postLogoutRedirectUrl` falls back to `redirectUrl`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingLogoutUrl`] when an `id_token` is given
    /// but no `logoutUrl` is configured.
    pub fn from_document(doc: &ConfigDocument, platform: Platform) -> Result<Self, ConfigError> {
        let id_token = doc.param::<String>(PARAM_ID_TOKEN).and_then(trim_to_null);
        let end_session_endpoint = overridden_string(doc, platform, PARAM_LOGOUT_URL);
        if id_token.is_some() && end_session_endpoint.is_none() {
            return Err(ConfigError::MissingLogoutUrl);
        }

        Ok(Self {
            id_token,
            end_session_endpoint,
            post_logout_redirect_url: overridden_string(doc, platform, PARAM_POST_LOGOUT_REDIRECT_URL)
                .or_else(|| overridden_string(doc, platform, PARAM_REDIRECT_URL)),
            state: random_string(STATE_LENGTH),
            logs_enabled: overridden_flag(doc, platform, PARAM_LOGS_ENABLED),
        })
    }

    /// Returns the ID token hint, if given.
    #[must_use]
    pub fn id_token(&self) -> Option<&str> {
        self.id_token.as_deref()
    }

    /// Returns the provider's end session endpoint, if configured.
    #[must_use]
    pub fn end_session_endpoint(&self) -> Option<&str> {
        self.end_session_endpoint.as_deref()
    }

    /// Returns where the provider redirects after logout.
    #[must_use]
    pub fn post_logout_redirect_url(&self) -> Option<&str> {
        self.post_logout_redirect_url.as_deref()
    }

    /// Returns the state sent with the end session request.
    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Returns whether response bodies are logged.
    #[must_use]
    pub const fn logs_enabled(&self) -> bool {
        self.logs_enabled
    }
}
