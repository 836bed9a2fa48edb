// ── Core error types ──
//
// User-facing errors from paydesk-core. Consumers never see reqwest or
// JSON parse failures directly; the `From<paydesk_api::Error>` impl folds
// them into the four failure classes the dashboard reports.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // ── Remote failures ──────────────────────────────────────────────
    /// The server answered with a non-2xx status, or with a body the
    /// dashboard cannot use.
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// No response at all (connection refused, DNS, timeout).
    #[error("Cannot reach the payroll server: {message}")]
    Transport { message: String },

    // ── Local failures ───────────────────────────────────────────────
    /// Form input rejected before any network call.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    /// The identity changed while the operation was in flight; its result
    /// was discarded.
    #[error("Session changed while the request was in flight")]
    StaleSession,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid access token: {message}")]
    InvalidToken { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.to_owned(),
            message: message.into(),
        }
    }

    /// HTTP status of a request error, if the server sent one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleSession)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<paydesk_api::Error> for CoreError {
    fn from(err: paydesk_api::Error) -> Self {
        match err {
            paydesk_api::Error::Request { status, message } => Self::Request { status, message },
            paydesk_api::Error::Transport(ref e) => match e.status() {
                // reqwest only reports a status here for body-read failures
                // after the server already answered.
                Some(status) => Self::Request {
                    status: Some(status.as_u16()),
                    message: e.to_string(),
                },
                None => Self::Transport {
                    message: e.to_string(),
                },
            },
            paydesk_api::Error::Deserialization { message, body: _ } => Self::Request {
                status: None,
                message: format!("Invalid response from server: {message}"),
            },
            paydesk_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            paydesk_api::Error::Client(message) => Self::Config { message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_keep_server_message() {
        let err = CoreError::from(paydesk_api::Error::Request {
            status: Some(400),
            message: "PayRun déjà approuvé".into(),
        });
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "PayRun déjà approuvé");
    }

    #[test]
    fn malformed_bodies_become_request_errors() {
        let err = CoreError::from(paydesk_api::Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        });
        assert!(matches!(err, CoreError::Request { status: None, .. }));
    }
}
