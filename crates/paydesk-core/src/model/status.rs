// ── Roles and lifecycle enums ──
//
// Wire names are the server's SCREAMING_SNAKE_CASE strings. Values the
// client does not know parse to `Unknown` in `crate::convert`.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Dashboard role carried in the access token.
///
/// There is no `Unknown` variant: a token with any other role is
/// rejected at login.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    /// Cashier: records payments only.
    Caissier,
}

impl Role {
    /// The superuser sees every company; no tenant filter is applied.
    pub fn is_superuser(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

/// Pay run lifecycle: `BROUILLON -> APPROUVE -> CLOTURE`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PayRunStatus {
    Brouillon,
    Approuve,
    Cloture,
    Unknown,
}

impl PayRunStatus {
    /// The only status this one may move to, if any.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Brouillon => Some(Self::Approuve),
            Self::Approuve => Some(Self::Cloture),
            Self::Cloture | Self::Unknown => None,
        }
    }

    /// Transitions never skip a step and never go backwards.
    pub fn can_advance_to(self, target: Self) -> bool {
        self.next() == Some(target)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Cloture)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployeeStatus {
    Actif,
    Inactif,
    Unknown,
}

impl EmployeeStatus {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Actif)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PayslipStatus {
    EnAttente,
    Partiel,
    Paye,
    Unknown,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Especes,
    Virement,
    OrangeMoney,
    Wave,
    Unknown,
}

/// Pay period of a company or pay run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PeriodType {
    Mensuelle,
    Hebdomadaire,
    Journaliere,
    Unknown,
}
