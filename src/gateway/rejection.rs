use thiserror::Error;

use crate::upstream::onepass::ExchangeError;

/// Every way a lookup can be turned down. The `Display` text is what the
/// caller sees in the `error` field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    /// A credential is missing or the caller's origin is not allowed.
    #[error("Misconfigured keys or hostname.")]
    Misconfigured,
    #[error("Security challenge failed.")]
    ChallengeFailed,
    #[error(transparent)]
    Onepass(#[from] ExchangeError),
}

impl Rejection {
    /// Short label used for metrics and log fields.
    pub fn outcome(&self) -> &'static str {
        match self {
            Rejection::Misconfigured => "misconfigured",
            Rejection::ChallengeFailed => "challenge_failed",
            Rejection::Onepass(ExchangeError::NonJson(_)) => "onepass_non_json",
            Rejection::Onepass(ExchangeError::MissingToken) => "onepass_unauthorized",
        }
    }
}
