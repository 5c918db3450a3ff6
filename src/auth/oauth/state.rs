//! State parameter handling for OAuth CSRF protection.
//!
//! The state parameter is an opaque value sent with the authorization
//! request and echoed back by the provider in its redirect. Comparing the two
//! guards against cross-site request forgery.
//!
//! # Example
//!
//! ```rust
//! use generic_oauth2::auth::oauth::StateParam;
//!
//! let state = StateParam::new();
//! assert_eq!(state.as_ref().len(), 20);
//!
//! let configured = StateParam::from_raw("app-provided-state");
//! assert!(configured.matches("app-provided-state"));
//! assert!(!configured.matches("forged"));
//! ```

use std::fmt;

use subtle::ConstantTimeEq;

use crate::config::options::STATE_LENGTH;
use crate::config::random_string;

/// OAuth state parameter for CSRF protection.
///
/// # Thread Safety
///
/// `StateParam` is `Send + Sync`, making it safe to share across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateParam {
    value: String,
}

// Verify StateParam is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StateParam>();
};

impl StateParam {
    /// Creates a new state with a 20 character alphanumeric nonce.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: random_string(STATE_LENGTH),
        }
    }

    /// Wraps a state value supplied by the application.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { value: raw.into() }
    }

    /// Compares `received` against this state in constant time.
    #[must_use]
    pub fn matches(&self, received: &str) -> bool {
        constant_time_compare(&self.value, received)
    }
}

impl Default for StateParam {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl AsRef<str> for StateParam {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

/// Compares two strings in constant time.
///
/// The comparison does not short-circuit on the first differing byte, so the
/// time taken does not reveal how much of a guess was correct.
#[must_use]
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    // ConstantTimeEq handles different lengths securely
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
