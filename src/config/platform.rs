//! Host platforms that may override base configuration values.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// The host platform a request is resolved for.
///
/// Each platform names the document block whose values supersede the
/// top-level ones, e.g. `{"appId": "a", "android": {"appId": "b"}}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Android hosts, reading the `android` block.
    #[default]
    Android,
    /// iOS hosts, reading the `ios` block.
    Ios,
    /// Browser hosts, reading the `web` block.
    Web,
}

impl Platform {
    /// Returns the name of the override block for this platform.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Android => "android",
            Self::Ios => "ios",
            Self::Web => "web",
        }
    }

    /// Returns the dotted key of `key` inside this platform's block.
    ///
    /// # Example
    ///
    /// ```rust
    /// use generic_oauth2::Platform;
    ///
    /// assert_eq!(Platform::Android.override_key("appId"), "android.appId");
    /// ```
    #[must_use]
    pub fn override_key(self, key: &str) -> String {
        format!("{}.{key}", self.key())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "android" => Ok(Self::Android),
            "ios" => Ok(Self::Ios),
            "web" => Ok(Self::Web),
            _ => Err(ConfigError::UnknownPlatform {
                platform: s.to_string(),
            }),
        }
    }
}
