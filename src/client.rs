//! The OAuth 2 client that drives complete flows.
//!
//! [`OAuth2Client`] ties the pieces of [`crate::auth`] together. It holds only
//! immutable collaborators: the HTTP client, the client-wide
//! [`ClientConfig`] and the [`HandlerRegistry`]. Everything belonging to a
//! single flow (state, PKCE verifier, redirect URL) lives in that call's
//! [`AuthorizationRequest`](crate::auth::oauth::AuthorizationRequest), so one
//! client can run any number of flows concurrently.
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use generic_oauth2::{ClientConfig, ConfigDocument, OAuth2Client, Platform};
//! use generic_oauth2::auth::{UserAgent, UserAgentOutcome};
//! use serde_json::json;
//!
//! struct Browser;
//!
//! #[async_trait]
//! impl UserAgent for Browser {
//!     async fn authorize(&self, url: &str, redirect_url: &str) -> UserAgentOutcome {
//!         // open `url` and wait for the browser to reach `redirect_url`
//!         UserAgentOutcome::Cancelled
//!     }
//! }
//!
//! # async fn run() -> Result<(), generic_oauth2::auth::oauth::OAuthError> {
//! let client = OAuth2Client::new(ClientConfig::builder().platform(Platform::Web).build())?;
//!
//! let doc = ConfigDocument::try_from(json!({
//!     "appId": "client-id",
//!     "authorizationBaseUrl": "https://accounts.example.com/authorize",
//!     "accessTokenEndpoint": "https://accounts.example.com/token",
//!     "responseType": "code",
//!     "redirectUrl": "https://app.example.com/callback",
//!     "pkceEnabled": true,
//!     "resourceUrl": "https://api.example.com/me"
//! }))
//! .unwrap();
//!
//! let result = client.authenticate(&doc, &Browser).await?;
//! println!("signed in as {}", result["email"]);
//! # Ok(())
//! # }
//! ```

use serde_json::{Map, Value};

use crate::auth::oauth::{
    assemble_result, build_authorization_request, build_end_session_request, exchange_code,
    fetch_resource, parse_redirect, refresh_access_token, AuthorizationResponse, CodeExchange,
    OAuthError,
};
use crate::auth::{HandlerOutcome, HandlerRegistry, UserAgent, UserAgentOutcome};
use crate::config::{
    custom_handler_name, AuthenticateOptions, ClientConfig, ConfigDocument, LogoutOptions,
    RefreshTokenOptions, ResourceOptions,
};

/// Runs authenticate, refresh and logout flows.
///
/// # Thread Safety
///
/// `OAuth2Client` is `Send + Sync`; share it behind an `Arc` or clone it.
#[derive(Clone, Debug)]
pub struct OAuth2Client {
    config: ClientConfig,
    http: reqwest::Client,
    handlers: HandlerRegistry,
}

// Verify OAuth2Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuth2Client>();
};

impl OAuth2Client {
    /// Creates a client without custom handlers.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::HttpClient`] if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, OAuthError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .build()?;

        Ok(Self {
            config,
            http,
            handlers: HandlerRegistry::new(),
        })
    }

    /// Replaces the custom handler registry.
    #[must_use]
    pub fn with_handlers(mut self, handlers: HandlerRegistry) -> Self {
        self.handlers = handlers;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the registered custom handlers.
    #[must_use]
    pub const fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Runs the authenticate flow described by `doc`.
    ///
    /// When the platform block names a custom handler, the handler supplies
    /// the access token. Otherwise the authorization request is opened with
    /// `agent`, the redirect is validated, and, with a token endpoint
    /// configured, the code is exchanged for tokens. A configured resource
    /// URL is then fetched with the access token.
    ///
    /// The result is the resource JSON object extended with `access_token`,
    /// `authorization_response` and `access_token_response` as available.
    ///
    /// # Errors
    ///
    /// Returns an [`OAuthError`] whose [`code`](OAuthError::code) is one of
    /// the fixed error codes.
    pub async fn authenticate(
        &self,
        doc: &ConfigDocument,
        agent: &dyn UserAgent,
    ) -> Result<Value, OAuthError> {
        let platform = self.config.platform();
        if let Some(name) = custom_handler_name(doc, platform) {
            return self.authenticate_with_handler(doc, &name).await;
        }

        let options = AuthenticateOptions::from_document(doc, platform)?;
        let request = build_authorization_request(&options);
        tracing::debug!(
            %platform,
            response_type = %options.response_type(),
            pkce = request.code_verifier.is_some(),
            "starting authorization"
        );

        let redirect = match agent.authorize(&request.url, &request.redirect_url).await {
            UserAgentOutcome::Redirect(url) => url,
            UserAgentOutcome::Cancelled => return Err(OAuthError::UserCancelled),
            UserAgentOutcome::NoBrowser => return Err(OAuthError::NoBrowser),
            UserAgentOutcome::NoResult => return Err(OAuthError::NoRedirectResult),
        };

        let response = parse_redirect(&redirect)?;
        if let Err(error) = response.verify_state(&request.state) {
            if options.logs_enabled() {
                tracing::warn!(
                    expected = %request.state,
                    received = response.state().unwrap_or_default(),
                    "state mismatch"
                );
            }
            return Err(error);
        }

        match options.access_token_endpoint() {
            Some(endpoint) if options.response_type().includes_code() => {
                let code = response.code().ok_or(OAuthError::NoAuthorizationCode)?;
                let token_response = exchange_code(
                    &self.http,
                    CodeExchange {
                        token_endpoint: endpoint,
                        client_id: options.app_id(),
                        redirect_uri: &request.redirect_url,
                        code,
                        code_verifier: request.code_verifier.as_deref(),
                        logs_enabled: options.logs_enabled(),
                    },
                )
                .await?;
                let access_token = token_response.require_access_token()?;
                let resource = fetch_resource(&self.http, options.resource(), access_token).await?;
                Ok(assemble_result(
                    resource,
                    Some(access_token),
                    Some(&response),
                    Some(&token_response),
                ))
            }
            _ => self.finish_without_exchange(&options, &response).await,
        }
    }

    async fn finish_without_exchange(
        &self,
        options: &AuthenticateOptions,
        response: &AuthorizationResponse,
    ) -> Result<Value, OAuthError> {
        let resource = match (response.access_token(), options.resource().resource_url()) {
            (Some(access_token), Some(_)) => {
                fetch_resource(&self.http, options.resource(), access_token).await?
            }
            _ => Map::new(),
        };
        Ok(assemble_result(
            resource,
            response.access_token(),
            Some(response),
            None,
        ))
    }

    async fn authenticate_with_handler(
        &self,
        doc: &ConfigDocument,
        name: &str,
    ) -> Result<Value, OAuthError> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| OAuthError::CustomHandlerLogin {
                handler: name.to_string(),
                reason: "no handler registered under this name".to_string(),
            })?;

        tracing::debug!(handler = name, "authenticating with custom handler");

        let access_token = match handler.get_access_token(doc).await {
            Ok(HandlerOutcome::Token(token)) => token,
            Ok(HandlerOutcome::Cancelled) => return Err(OAuthError::UserCancelled),
            Err(error) => {
                return Err(OAuthError::CustomHandlerLogin {
                    handler: name.to_string(),
                    reason: error.to_string(),
                })
            }
        };

        let resource_options = ResourceOptions::from_document(doc, self.config.platform());
        let resource = fetch_resource(&self.http, &resource_options, &access_token).await?;
        Ok(assemble_result(resource, Some(&access_token), None, None))
    }

    /// Redeems the configured refresh token and returns the token response.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Config`] for missing parameters,
    /// [`OAuthError::TokenRefreshFailed`] when the endpoint rejects the
    /// request and [`OAuthError::NoAccessToken`] when no token is returned.
    pub async fn refresh_token(&self, doc: &ConfigDocument) -> Result<Value, OAuthError> {
        let options = RefreshTokenOptions::from_document(doc, self.config.platform())?;
        let token_response = refresh_access_token(&self.http, &options).await?;

        serde_json::to_value(&token_response).map_err(|e| OAuthError::TokenRefreshFailed {
            status: 200,
            error: None,
            message: format!("Failed to serialize token response: {e}"),
        })
    }

    /// Logs the user out.
    ///
    /// With a custom handler configured the handler performs the logout.
    /// Otherwise, when an `id_token` is given, the provider's end session
    /// endpoint is opened with `agent`. Without an `id_token` there is no
    /// provider session and logout succeeds immediately.
    ///
    /// # Errors
    ///
    /// - [`OAuthError::CustomHandlerLogout`] when the handler is unknown or
    ///   reports failure.
    /// - [`OAuthError::Config`] when an `id_token` is given without a
    ///   `logoutUrl`.
    /// - [`OAuthError::UserCancelled`], [`OAuthError::NoBrowser`] or
    ///   [`OAuthError::NoRedirectResult`] from the user agent.
    /// - [`OAuthError::StateMismatch`] when the provider echoes a different
    ///   state.
    pub async fn logout(&self, doc: &ConfigDocument, agent: &dyn UserAgent) -> Result<(), OAuthError> {
        let platform = self.config.platform();
        if let Some(name) = custom_handler_name(doc, platform) {
            let handler = self
                .handlers
                .get(&name)
                .ok_or_else(|| OAuthError::CustomHandlerLogout {
                    handler: name.clone(),
                    reason: "no handler registered under this name".to_string(),
                })?;
            tracing::debug!(handler = %name, "logging out with custom handler");
            return if handler.logout(doc).await {
                Ok(())
            } else {
                Err(OAuthError::CustomHandlerLogout {
                    handler: name,
                    reason: "handler reported failure".to_string(),
                })
            };
        }

        let options = LogoutOptions::from_document(doc, platform)?;
        let Some(request) = build_end_session_request(&options) else {
            tracing::debug!("no id_token given, nothing to end at the provider");
            return Ok(());
        };

        let outcome = agent
            .end_session(&request.url, request.post_logout_redirect_url.as_deref())
            .await;
        match outcome {
            UserAgentOutcome::Redirect(url) => match parse_redirect(&url) {
                Ok(response) if response.state().is_some() => response.verify_state(&request.state),
                Err(error @ OAuthError::AuthorizationDenied { .. }) => Err(error),
                _ => Ok(()),
            },
            UserAgentOutcome::NoResult if request.post_logout_redirect_url.is_none() => Ok(()),
            UserAgentOutcome::NoResult => Err(OAuthError::NoRedirectResult),
            UserAgentOutcome::Cancelled => Err(OAuthError::UserCancelled),
            UserAgentOutcome::NoBrowser => Err(OAuthError::NoBrowser),
        }
    }
}
