// ── Role-scoped refresh plan ──
//
// Which fetches a full refresh issues is data, not control flow: one
// table row per role. `Dashboard::refresh_all` consumes the row and
// reports what happened in a `RefreshReport`.

use serde::Serialize;
use strum::{Display, EnumIter};

use crate::model::Role;

/// One per-slice fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FetchKind {
    Kpis,
    Charts,
    Companies,
    Users,
    Employees,
    PayRuns,
    Payslips,
    Payments,
}

const SUPER_ADMIN_PLAN: &[FetchKind] = &[
    FetchKind::Kpis,
    FetchKind::Charts,
    FetchKind::Companies,
    FetchKind::Users,
    FetchKind::Employees,
    FetchKind::PayRuns,
    FetchKind::Payslips,
    FetchKind::Payments,
];

const ADMIN_PLAN: &[FetchKind] = &[
    FetchKind::Kpis,
    FetchKind::Charts,
    FetchKind::Employees,
    FetchKind::PayRuns,
    FetchKind::Payslips,
    FetchKind::Payments,
];

const CASHIER_PLAN: &[FetchKind] = &[FetchKind::Kpis, FetchKind::Charts, FetchKind::Payments];

/// The fetch set a full refresh issues for `role`.
pub fn fetch_plan(role: Role) -> &'static [FetchKind] {
    match role {
        Role::SuperAdmin => SUPER_ADMIN_PLAN,
        Role::Admin => ADMIN_PLAN,
        Role::Caissier => CASHIER_PLAN,
    }
}

/// Outcome of one `refresh_all` cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    /// Fetches that committed their slice.
    pub succeeded: Vec<FetchKind>,
    /// Fetches the server or network rejected, with the reported message.
    pub failed: Vec<(FetchKind, String)>,
    /// Fetches whose result was discarded because the session changed.
    pub discarded: Vec<FetchKind>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty() && self.discarded.is_empty()
    }

    /// Every fetch that was issued, in plan order within each outcome.
    pub fn issued(&self) -> impl Iterator<Item = FetchKind> + '_ {
        self.succeeded
            .iter()
            .copied()
            .chain(self.failed.iter().map(|(kind, _)| *kind))
            .chain(self.discarded.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.discarded.len()
    }
}
