//! Data orchestration layer between `paydesk-api` and presentation code.
//!
//! This crate owns the domain model, the reactive dashboard store and the
//! refresh logic for the paydesk workspace:
//!
//! - **[`Dashboard`]**: the facade. [`login()`](Dashboard::login) installs a
//!   session identity, [`refresh_all()`](Dashboard::refresh_all) runs the
//!   role's fetch plan concurrently and waits for every fetch to settle,
//!   and [`execute()`](Dashboard::execute) applies a mutation then
//!   refreshes.
//!
//! - **[`DashboardStore`]**: one `tokio::sync::watch` channel per slice.
//!   Every commit is checked against the session generation, so responses
//!   that arrive after a logout never land.
//!
//! - **[`CrudDialog`]**: create/update dialog state, turned into a
//!   [`Command`] by [`CrudDialog::prepare()`] after client-side validation.
//!
//! - **Domain model** ([`model`]): companies, users, employees, pay runs,
//!   payslips and payments, plus KPI and chart aggregates.

pub mod command;
pub mod config;
pub mod convert;
pub mod dashboard;
pub mod dialog;
pub mod error;
pub mod model;
pub mod session;
pub mod store;
pub mod stream;
pub mod validation;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult, EntityForm};
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use dialog::{CrudDialog, DialogMode, EntityKind};
pub use error::CoreError;
pub use session::{Identity, decode_identity};
pub use store::{DashboardSnapshot, DashboardStore, ErrorNotice, FetchKind, RefreshReport, fetch_plan};
pub use stream::{SliceStream, SliceWatchStream};

pub use model::{
    ChartBundle, ChartKey, ChartPoint, ChartSeries, Company, Employee, EmployeeStatus, EntityId,
    KpiSnapshot, PayRun, PayRunStatus, Payment, PaymentMethod, Payslip, PayslipStatus, PeriodType,
    Role, User,
};

// Form payloads travel unchanged from the API crate.
pub use paydesk_api::{
    CompanyPayload, EmployeePayload, ListQuery, LogoUpload, PayRunPayload, PaymentPayload,
    PayslipPayload, UserPayload,
};
