//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use paydesk_config::ConfigError;
use paydesk_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the payroll server")]
    #[diagnostic(
        code(paydesk::connection_failed),
        help(
            "Check that the server is running and reachable.\n\
             Reason: {reason}"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(paydesk::auth_failed),
        help(
            "Verify your email and password.\n\
             Run: paydesk config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(paydesk::no_credentials),
        help(
            "Pass --email and set PAYDESK_PASSWORD, or store a password with:\n\
             paydesk config set-password --profile {profile}"
        )
    )]
    NoCredentials { profile: String },

    #[error("Your role may not do this: {message}")]
    #[diagnostic(code(paydesk::forbidden))]
    Forbidden { message: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Not found: {message}")]
    #[diagnostic(code(paydesk::not_found))]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    #[diagnostic(code(paydesk::conflict))]
    Conflict { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Server rejected the request: {message}")]
    #[diagnostic(code(paydesk::api_error))]
    Rejected { status: Option<u16>, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(paydesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(paydesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: paydesk config set-profile {name} --url <URL>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(paydesk::no_config),
        help(
            "Pass --api-url, or create a profile with:\n\
             paydesk config set-profile default --url <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(paydesk::config))]
    Config(ConfigError),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(paydesk::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Forbidden { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Login failures name the profile in their help text.
    pub fn from_login(err: CoreError, profile: &str) -> Self {
        match err {
            CoreError::Request {
                status: None | Some(400 | 401),
                message,
            }
            | CoreError::InvalidToken { message } => Self::AuthFailed {
                profile: profile.into(),
                message,
            },
            other => other.into(),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => Self::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => Self::Config(other),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { message } => Self::ConnectionFailed { reason: message },

            CoreError::Request {
                status: Some(401),
                message,
            } => Self::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::Request {
                status: Some(403),
                message,
            } => Self::Forbidden { message },

            CoreError::Request {
                status: Some(404),
                message,
            } => Self::NotFound { message },

            CoreError::Request {
                status: Some(409),
                message,
            } => Self::Conflict { message },

            CoreError::Request { status, message } => Self::Rejected { status, message },

            CoreError::Validation { field, message } => Self::Validation {
                field,
                reason: message,
            },

            CoreError::NotAuthenticated => Self::AuthFailed {
                profile: "current".into(),
                message: "not logged in".into(),
            },

            CoreError::InvalidToken { message } => Self::AuthFailed {
                profile: "current".into(),
                message,
            },

            CoreError::StaleSession => Self::Rejected {
                status: None,
                message: "the session changed while the request was in flight".into(),
            },

            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
