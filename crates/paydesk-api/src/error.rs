use thiserror::Error;

/// Top-level error type for the `paydesk-api` crate.
///
/// Every HTTP call resolves to exactly one of these. `paydesk-core`
/// folds them into its own user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Server responses ────────────────────────────────────────────
    /// Non-2xx status, or a 2xx body missing a field the call requires.
    ///
    /// `message` is the server-supplied `message` when present, otherwise
    /// a generic fallback.
    #[error("{message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// No usable response (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The HTTP client could not be constructed.
    #[error("HTTP client setup failed: {0}")]
    Client(String),

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx body that is not valid JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status carried by a request error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the bearer credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if no response was received at all.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport(e) => e.status().is_none(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_displays_server_message() {
        let err = Error::Request {
            status: Some(409),
            message: "PayRun déjà clôturé".into(),
        };
        assert_eq!(err.to_string(), "PayRun déjà clôturé");
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_transport());
    }

    #[test]
    fn unauthorized_is_detected_from_status() {
        let err = Error::Request {
            status: Some(401),
            message: "Token invalide".into(),
        };
        assert!(err.is_unauthorized());
        assert!(!err.is_not_found());
    }
}
