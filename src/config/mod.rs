//! Configuration types for the OAuth 2 client.
//!
//! Two kinds of configuration exist:
//!
//! - The per-request [`ConfigDocument`] a host passes to every operation,
//!   read through the dotted-path resolver in [`document`] and turned into
//!   typed options by [`options`].
//! - The long-lived [`ClientConfig`], built once with [`ClientConfigBuilder`],
//!   holding settings that apply to every request a client sends.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use generic_oauth2::{ClientConfig, Platform};
//!
//! let config = ClientConfig::builder()
//!     .platform(Platform::Ios)
//!     .timeout(Duration::from_secs(10))
//!     .user_agent_prefix("MyApp/1.0")
//!     .build();
//!
//! assert_eq!(config.platform(), Platform::Ios);
//! ```

pub mod document;
mod newtypes;
pub mod options;
mod platform;

use std::time::Duration;

pub use document::{random_string, trim_to_null, ConfigDocument, FromConfigValue};
pub use newtypes::ResponseType;
pub use options::{
    custom_handler_name, AuthenticateOptions, LogoutOptions, RefreshTokenOptions, ResourceOptions,
};
pub use platform::Platform;

/// Default timeout applied to every HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-wide settings.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    platform: Platform,
    timeout: Duration,
    user_agent_prefix: Option<String>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the platform whose override block is applied.
    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns the HTTP request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the `User-Agent` header value sent with every request.
    #[must_use]
    pub fn user_agent(&self) -> String {
        let version = env!("CARGO_PKG_VERSION");
        self.user_agent_prefix.as_ref().map_or_else(
            || format!("generic-oauth2/{version}"),
            |prefix| format!("{prefix} | generic-oauth2/{version}"),
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfigBuilder::new().build()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// # Defaults
///
/// - `platform`: [`Platform::Android`]
/// - `timeout`: [`DEFAULT_TIMEOUT`]
/// - `user_agent_prefix`: `None`
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    platform: Option<Platform>,
    timeout: Option<Duration>,
    user_agent_prefix: Option<String>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the platform whose override block is applied.
    #[must_use]
    pub const fn platform(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the HTTP request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`ClientConfig`].
    #[must_use]
    pub fn build(self) -> ClientConfig {
        ClientConfig {
            platform: self.platform.unwrap_or_default(),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            user_agent_prefix: self.user_agent_prefix,
        }
    }
}
