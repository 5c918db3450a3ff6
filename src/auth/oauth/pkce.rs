//! Proof Key for Code Exchange (RFC 7636).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::config::options::PKCE_VERIFIER_LENGTH;
use crate::config::random_string;

/// The only challenge method this crate sends.
pub const CODE_CHALLENGE_METHOD: &str = "S256";

/// A PKCE verifier together with its derived `S256` challenge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PkceChallenge {
    verifier: String,
    challenge: String,
}

impl PkceChallenge {
    const MIN_VERIFIER_LENGTH: usize = 43;
    const MAX_VERIFIER_LENGTH: usize = 128;

    /// Generates a new 64 character verifier and its challenge.
    #[must_use]
    pub fn generate() -> Self {
        let verifier = random_string(PKCE_VERIFIER_LENGTH);
        let challenge = compute_code_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }

    /// Derives the challenge for an existing verifier.
    ///
    /// Returns `None` when the verifier is not 43 to 128 characters of
    /// `[A-Za-z0-9-._~]`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use generic_oauth2::auth::oauth::PkceChallenge;
    ///
    /// let pkce = PkceChallenge::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk").unwrap();
    /// assert_eq!(pkce.challenge(), "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    ///
    /// assert!(PkceChallenge::from_verifier("too-short").is_none());
    /// ```
    #[must_use]
    pub fn from_verifier(verifier: impl Into<String>) -> Option<Self> {
        let verifier = verifier.into();
        let valid_length =
            (Self::MIN_VERIFIER_LENGTH..=Self::MAX_VERIFIER_LENGTH).contains(&verifier.len());
        let valid_chars = verifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'));
        if !(valid_length && valid_chars) {
            return None;
        }

        let challenge = compute_code_challenge(&verifier);
        Some(Self {
            verifier,
            challenge,
        })
    }

    /// Returns the verifier sent with the token request.
    #[must_use]
    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    /// Returns the challenge sent with the authorization request.
    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }

    /// Returns the challenge method, always `S256`.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        CODE_CHALLENGE_METHOD
    }
}

/// Computes `BASE64URL-NOPAD(SHA256(verifier))`.
#[must_use]
pub fn compute_code_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}
