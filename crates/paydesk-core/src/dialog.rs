// ── CRUD dialog state machine ──
//
// `Closed` or `Open(mode, kind, seed)`. Opening always replaces any prior
// open state. Submission turns the open state plus a form into a
// `Command`; execution and the follow-up refresh live in `Dashboard`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use paydesk_api::EntityId;

use crate::command::{Command, EntityForm};
use crate::error::CoreError;
use crate::validation;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DialogMode {
    Create,
    Update,
}

/// Entity types the dashboards edit, named as the UI names them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum EntityKind {
    #[serde(rename = "entreprise")]
    #[strum(serialize = "entreprise")]
    Company,
    #[serde(rename = "user")]
    #[strum(serialize = "user")]
    User,
    #[serde(rename = "employe")]
    #[strum(serialize = "employe")]
    Employee,
    #[serde(rename = "payrun")]
    #[strum(serialize = "payrun")]
    PayRun,
    #[serde(rename = "payslip")]
    #[strum(serialize = "payslip")]
    Payslip,
    #[serde(rename = "paiement")]
    #[strum(serialize = "paiement")]
    Payment,
}

/// The CRUD dialog. At most one is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CrudDialog {
    #[default]
    Closed,
    Open {
        mode: DialogMode,
        kind: EntityKind,
        /// Record being edited (update) or prefill values (create).
        seed: Option<Value>,
    },
}

impl CrudDialog {
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn mode(&self) -> Option<DialogMode> {
        match self {
            Self::Open { mode, .. } => Some(*mode),
            Self::Closed => None,
        }
    }

    pub fn kind(&self) -> Option<EntityKind> {
        match self {
            Self::Open { kind, .. } => Some(*kind),
            Self::Closed => None,
        }
    }

    /// Id of the seed record, if the seed carries one.
    pub fn seed_id(&self) -> Option<EntityId> {
        match self {
            Self::Open {
                seed: Some(seed), ..
            } => seed.get("id").and_then(EntityId::from_value),
            _ => None,
        }
    }

    /// Turn a submitted form into the command this dialog stands for.
    ///
    /// Fails with a validation error, before any network call, when no
    /// dialog is open, the form is for another entity kind, an update
    /// has no record id, or the form fails client-side validation.
    pub fn prepare(&self, form: EntityForm) -> Result<Command, CoreError> {
        let Self::Open { mode, kind, .. } = self else {
            return Err(CoreError::validation("dialog", "no dialog is open"));
        };

        if form.kind() != *kind {
            return Err(CoreError::validation(
                "kind",
                format!("the open dialog edits {kind}, not {}", form.kind()),
            ));
        }

        let id = match mode {
            DialogMode::Create => None,
            DialogMode::Update => Some(
                self.seed_id()
                    .ok_or_else(|| CoreError::validation("id", "the record to update has no id"))?,
            ),
        };

        validation::validate_form(&form, *mode)?;

        Ok(match id {
            Some(id) => Command::Update { id, form },
            None => Command::Create(form),
        })
    }
}
