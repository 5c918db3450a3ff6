//! # Generic OAuth 2 Client
//!
//! An OAuth 2.0 / OpenID Connect client driven by a JSON configuration
//! document, for hosts that sign users in through a browser on Android, iOS
//! or the web.
//!
//! ## Overview
//!
//! This crate provides:
//! - A dotted-path configuration resolver with per-platform overrides via
//!   [`ConfigDocument`]
//! - Validated per-operation options ([`AuthenticateOptions`],
//!   [`RefreshTokenOptions`], [`LogoutOptions`])
//! - Authorization code and implicit flows with state checking and PKCE via
//!   [`auth::oauth`]
//! - Token refresh, resource URL calls and OpenID Connect logout
//! - Custom handlers for providers that ship their own sign-in SDK via
//!   [`auth::HandlerRegistry`]
//! - A complete flow driver in [`OAuth2Client`]
//!
//! ## Configuration Document
//!
//! Every operation reads its parameters from a JSON document. Keys may be
//! dotted paths, and a platform block (`android`, `ios`, `web`) overrides
//! top-level values for that platform:
//!
//! ```rust
//! use generic_oauth2::{ConfigDocument, Platform};
//! use serde_json::json;
//!
//! let doc = ConfigDocument::try_from(json!({
//!     "appId": "shared-client",
//!     "ios": { "appId": "ios-client" },
//!     "nested": { "level": { "value": 42 } }
//! }))
//! .unwrap();
//!
//! assert_eq!(doc.param::<i32>("nested.level.value"), Some(42));
//! assert_eq!(doc.platform_param::<String>(Platform::Ios, "appId").as_deref(), Some("ios-client"));
//! assert_eq!(doc.platform_param::<String>(Platform::Web, "appId").as_deref(), Some("shared-client"));
//! assert_eq!(doc.param::<String>("missing.path"), None);
//! ```
//!
//! ## Error Codes
//!
//! Every failure carries one of a fixed set of string codes for the calling
//! application, available from [`ConfigError::code`] and
//! [`auth::oauth::OAuthError::code`].
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is passed explicitly to every call
//! - **Request-scoped flows**: state and PKCE verifiers never outlive the call
//!   that created them
//! - **Total lookups**: the resolver returns `Option` and never fails
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio async runtime

pub mod auth;
pub mod client;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use client::OAuth2Client;
pub use config::{
    AuthenticateOptions, ClientConfig, ClientConfigBuilder, ConfigDocument, FromConfigValue,
    LogoutOptions, Platform, RefreshTokenOptions, ResourceOptions, ResponseType,
};
pub use error::ConfigError;

// Re-export flow types for convenience
pub use auth::oauth::{OAuthError, StateParam, TokenResponse};
pub use auth::{CustomHandler, HandlerRegistry, UserAgent, UserAgentOutcome};
