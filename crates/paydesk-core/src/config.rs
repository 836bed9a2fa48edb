// ── Runtime dashboard configuration ──
//
// Describes how to reach the payroll API and how the store behaves.
// Never touches disk: the CLI builds one from its profile and hands it in.

use std::time::Duration;

use paydesk_api::TransportConfig;

/// Settings for one [`Dashboard`](crate::Dashboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// API base URL (e.g. `http://localhost:7000`).
    pub api_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// How long an error notice stays visible before clearing itself.
    pub error_ttl: Duration,
    /// Length of the trailing chart window, in months, ending today.
    pub chart_window_months: u32,
    /// Accept self-signed TLS certificates (local servers).
    pub accept_invalid_certs: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:7000".into(),
            timeout: Duration::from_secs(30),
            error_ttl: Duration::from_secs(5),
            chart_window_months: 6,
            accept_invalid_certs: false,
        }
    }
}

impl DashboardConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            timeout: self.timeout,
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}
