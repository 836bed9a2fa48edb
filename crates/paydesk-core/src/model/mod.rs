// ── Domain model ──
//
// Canonical types the dashboard store holds. Wire records from
// `paydesk_api` are converted into these in `crate::convert`.

mod entity;
mod metrics;
mod status;

pub use entity::{Company, Employee, PayRun, Payment, Payslip, User};
pub use metrics::{ChartBundle, ChartSeries, KpiSnapshot};
pub use status::{EmployeeStatus, PayRunStatus, PaymentMethod, PayslipStatus, PeriodType, Role};

pub use paydesk_api::{ChartKey, ChartPoint, EntityId};
