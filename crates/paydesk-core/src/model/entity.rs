// ── Entity domain types ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::status::{EmployeeStatus, PayRunStatus, PaymentMethod, PayslipStatus, PeriodType, Role};
use paydesk_api::EntityId;

/// A company: the tenant boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    pub currency: String,
    pub address: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub period_type: Option<PeriodType>,
    pub admin_seats: u64,
    pub cashier_seats: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub email: String,
    /// `None` when the server reports a role this client does not know.
    pub role: Option<Role>,
    pub tenant_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EntityId,
    pub full_name: String,
    pub position: String,
    pub contract_type: String,
    pub pay_rate: f64,
    pub bank_account: Option<String>,
    pub status: EmployeeStatus,
    pub tenant_id: Option<EntityId>,
}

/// A payroll period. Generates payslips once approved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayRun {
    pub id: EntityId,
    pub period_type: PeriodType,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: PayRunStatus,
    pub tenant_id: Option<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payslip {
    pub id: EntityId,
    pub employee_id: Option<EntityId>,
    pub pay_run_id: Option<EntityId>,
    /// Denormalized from the nested employee, when the server embeds it.
    pub employee_name: Option<String>,
    pub gross_salary: f64,
    pub deductions: f64,
    pub net_salary: f64,
    pub status: PayslipStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Payslip {
    /// Net amount; derived from gross minus deductions when the server
    /// sent zero.
    pub fn effective_net(&self) -> f64 {
        if self.net_salary.abs() < f64::EPSILON {
            self.gross_salary - self.deductions
        } else {
            self.net_salary
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: EntityId,
    pub payslip_id: Option<EntityId>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub paid_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub employee_name: Option<String>,
}
