// ── Command API ──
//
// Every mutation flows through a `Command`. The dashboard routes each
// variant to exactly one API call, then re-fetches instead of patching
// the affected slice locally.

use serde::Serialize;

use paydesk_api::{
    CompanyPayload, EmployeePayload, EntityId, PayRunPayload, PaymentPayload, PayslipPayload,
    UserPayload,
};

use crate::dialog::EntityKind;
use crate::model::{Employee, PayRun};

/// Form data for a create or update, one variant per entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityForm {
    Company(CompanyPayload),
    User(UserPayload),
    Employee(EmployeePayload),
    PayRun(PayRunPayload),
    Payslip(PayslipPayload),
    Payment(PaymentPayload),
}

impl EntityForm {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Company(_) => EntityKind::Company,
            Self::User(_) => EntityKind::User,
            Self::Employee(_) => EntityKind::Employee,
            Self::PayRun(_) => EntityKind::PayRun,
            Self::Payslip(_) => EntityKind::Payslip,
            Self::Payment(_) => EntityKind::Payment,
        }
    }

    /// Pin the company reference of tenant-owned forms to `tenant`,
    /// replacing whatever the form carried.
    pub(crate) fn with_tenant(mut self, tenant: Option<&EntityId>) -> Self {
        let Some(tenant) = tenant else {
            return self;
        };
        let slot = match self {
            Self::User(ref mut p) => &mut p.entreprise_id,
            Self::Employee(ref mut p) => &mut p.entreprise_id,
            Self::PayRun(ref mut p) => &mut p.entreprise_id,
            Self::Company(_) | Self::Payslip(_) | Self::Payment(_) => return self,
        };
        *slot = Some(tenant.clone());
        self
    }
}

/// All write operations the dashboards perform.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // ── Generic CRUD ────────────────────────────────────────────────
    Create(EntityForm),
    Update { id: EntityId, form: EntityForm },
    Delete { kind: EntityKind, id: EntityId },

    // ── Employee status ─────────────────────────────────────────────
    ActivateEmployee { id: EntityId },
    DeactivateEmployee { id: EntityId },

    // ── Pay run lifecycle ───────────────────────────────────────────
    /// `BROUILLON -> APPROUVE`. Not pre-checked locally; the server
    /// rejects any other starting status.
    ApprovePayRun { id: EntityId },
    /// `APPROUVE -> CLOTURE`.
    ClosePayRun { id: EntityId },
}

impl Command {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Create(form) | Self::Update { form, .. } => form.kind(),
            Self::Delete { kind, .. } => *kind,
            Self::ActivateEmployee { .. } | Self::DeactivateEmployee { .. } => EntityKind::Employee,
            Self::ApprovePayRun { .. } | Self::ClosePayRun { .. } => EntityKind::PayRun,
        }
    }
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CommandResult {
    Saved { kind: EntityKind, id: EntityId },
    Deleted { kind: EntityKind, id: EntityId },
    Employee(Employee),
    PayRun(PayRun),
}
