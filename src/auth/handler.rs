//! Custom login handlers.
//!
//! Some providers ship their own SDK for signing in (Facebook, Google Sign-In
//! and the like). A host registers a [`CustomHandler`] for such a provider
//! under a name, and a configuration document selects it through
//! `<platform>.customHandlerClass`. The browser flow is then skipped
//! entirely.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use generic_oauth2::ConfigDocument;
//! use generic_oauth2::auth::{CustomHandler, HandlerError, HandlerOutcome, HandlerRegistry};
//!
//! struct StaticToken;
//!
//! #[async_trait]
//! impl CustomHandler for StaticToken {
//!     async fn get_access_token(&self, _doc: &ConfigDocument) -> Result<HandlerOutcome, HandlerError> {
//!         Ok(HandlerOutcome::Token("token-from-sdk".to_string()))
//!     }
//!
//!     async fn logout(&self, _doc: &ConfigDocument) -> bool {
//!         true
//!     }
//! }
//!
//! let registry = HandlerRegistry::new().with_handler("static", Arc::new(StaticToken));
//! assert!(registry.get("static").is_some());
//! assert!(registry.get("missing").is_none());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ConfigDocument;

/// What a custom handler produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// An access token; it goes through the resource call like any other.
    Token(String),
    /// The user cancelled the provider's sign-in.
    Cancelled,
}

/// A failure reported by a custom handler.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{reason}")]
pub struct HandlerError {
    reason: String,
}

impl HandlerError {
    /// Creates a handler error with a human readable reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A host-provided strategy that obtains tokens without the browser flow.
///
/// Handlers receive the full configuration document so they can read any
/// provider-specific parameters they need.
#[async_trait]
pub trait CustomHandler: Send + Sync {
    /// Signs the user in and returns an access token.
    ///
    /// # Errors
    ///
    /// Returns [`HandlerError`] when sign-in fails for any reason other than
    /// the user cancelling.
    async fn get_access_token(&self, doc: &ConfigDocument) -> Result<HandlerOutcome, HandlerError>;

    /// Signs the user out, returning `true` on success.
    async fn logout(&self, doc: &ConfigDocument) -> bool;
}

/// Named custom handlers.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn CustomHandler>>,
}

// Verify HandlerRegistry is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HandlerRegistry>();
};

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, replacing any previous handler.
    #[must_use]
    pub fn with_handler(mut self, name: impl Into<String>, handler: Arc<dyn CustomHandler>) -> Self {
        self.register(name, handler);
        self
    }

    /// Registers `handler` under `name`, returning the handler it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn CustomHandler>,
    ) -> Option<Arc<dyn CustomHandler>> {
        self.handlers.insert(name.into(), handler)
    }

    /// Looks up a handler by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn CustomHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("handlers", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Result<HandlerOutcome, HandlerError>);

    #[async_trait]
    impl CustomHandler for Fixed {
        async fn get_access_token(&self, _doc: &ConfigDocument) -> Result<HandlerOutcome, HandlerError> {
            self.0.clone()
        }

        async fn logout(&self, doc: &ConfigDocument) -> bool {
            doc.param::<bool>("logoutSucceeds").unwrap_or(false)
        }
    }

    #[test]
    fn test_registry_dispatches_by_name() {
        let registry = HandlerRegistry::new()
            .with_handler("a", Arc::new(Fixed(Ok(HandlerOutcome::Token("ta".to_string())))))
            .with_handler("b", Arc::new(Fixed(Ok(HandlerOutcome::Cancelled))));
        let doc = ConfigDocument::default();

        let a = registry.get("a").unwrap();
        let b = registry.get("b").unwrap();

        assert_eq!(
            tokio_test::block_on(a.get_access_token(&doc)),
            Ok(HandlerOutcome::Token("ta".to_string()))
        );
        assert_eq!(
            tokio_test::block_on(b.get_access_token(&doc)),
            Ok(HandlerOutcome::Cancelled)
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_replaces_existing_handler() {
        let mut registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry
            .register("a", Arc::new(Fixed(Err(HandlerError::new("first")))))
            .is_none());
        assert!(registry
            .register("a", Arc::new(Fixed(Err(HandlerError::new("second")))))
            .is_some());

        let result = tokio_test::block_on(
            registry
                .get("a")
                .unwrap()
                .get_access_token(&ConfigDocument::default()),
        );
        assert_eq!(result.unwrap_err().reason(), "second");
    }

    #[test]
    fn test_handler_logout_reads_document() {
        let handler = Fixed(Ok(HandlerOutcome::Cancelled));
        let doc = ConfigDocument::try_from(json!({ "logoutSucceeds": true })).unwrap();

        assert!(tokio_test::block_on(handler.logout(&doc)));
        assert!(!tokio_test::block_on(handler.logout(&ConfigDocument::default())));
    }

    #[test]
    fn test_debug_lists_handler_names() {
        let registry = HandlerRegistry::new()
            .with_handler("zeta", Arc::new(Fixed(Ok(HandlerOutcome::Cancelled))))
            .with_handler("alpha", Arc::new(Fixed(Ok(HandlerOutcome::Cancelled))));
        assert_eq!(
            format!("{registry:?}"),
            "HandlerRegistry { handlers: [\"alpha\", \"zeta\"] }"
        );
    }
}
