//! The seam to the host's browser.

use async_trait::async_trait;

/// How an interactive browser step ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserAgentOutcome {
    /// The browser landed on the redirect URL; holds the full URL.
    Redirect(String),
    /// The user closed the browser.
    Cancelled,
    /// No browser is available on the device.
    NoBrowser,
    /// The browser step finished without delivering a redirect.
    NoResult,
}

/// Opens URLs for the user and reports where the browser ended up.
///
/// Hosts implement this on top of a custom tab, an `ASWebAuthenticationSession`,
/// a popup window, or a loopback listener.
#[async_trait]
pub trait UserAgent: Send + Sync {
    /// Opens `url` and waits until the browser reaches `redirect_url` or the
    /// step ends otherwise.
    async fn authorize(&self, url: &str, redirect_url: &str) -> UserAgentOutcome;

    /// Opens an end session URL.
    ///
    /// The default waits for the redirect the same way [`authorize`] does.
    ///
    /// [`authorize`]: UserAgent::authorize
    async fn end_session(&self, url: &str, redirect_url: Option<&str>) -> UserAgentOutcome {
        self.authorize(url, redirect_url.unwrap_or_default()).await
    }
}
