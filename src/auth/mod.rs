//! Authentication flows.
//!
//! - [`oauth`]: the OAuth 2.0 / OpenID Connect protocol steps
//! - [`CustomHandler`] and [`HandlerRegistry`]: provider SDK sign-in that
//!   bypasses the browser
//! - [`UserAgent`]: the host's browser, which opens authorization and end
//!   session URLs
//!
//! Most hosts use [`OAuth2Client`](crate::OAuth2Client), which combines all
//! three.

mod handler;
pub mod oauth;
mod user_agent;

pub use handler::{CustomHandler, HandlerError, HandlerOutcome, HandlerRegistry};
pub use user_agent::{UserAgent, UserAgentOutcome};
