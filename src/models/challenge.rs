use serde::{Deserialize, Serialize};

use crate::config::Config;

/// The verdict returned by the Turnstile `siteverify` endpoint.
///
/// A verdict that could not be obtained or parsed is the `Default` one,
/// which never passes.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct ChallengeVerdict {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub hostname: Option<String>,
    /// Member code embedded in the widget's custom data.
    #[serde(default)]
    pub cdata: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

impl ChallengeVerdict {
    /// Returns the member code if the verdict passed, carried a code, and
    /// (when the provider reported one) was solved on an allowed hostname.
    pub fn member_code(&self, config: &Config) -> Option<&str> {
        if !self.success {
            return None;
        }
        if let Some(hostname) = &self.hostname {
            if !config.is_allowed_hostname(hostname) {
                return None;
            }
        }
        self.cdata.as_deref()
    }
}
