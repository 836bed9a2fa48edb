// paydesk-api: Async Rust client for the paydesk payroll REST API

pub mod charts;
pub mod client;
pub mod error;
pub mod query;
mod resources;
pub mod transport;
pub mod types;

pub use charts::{ChartKey, ChartPoint, normalize_chart};
pub use client::ApiClient;
pub use error::Error;
pub use query::{ChartQuery, ListQuery};
pub use transport::TransportConfig;
pub use types::{
    AuthTokens, CompanyPayload, CompanyRecord, EmployeePayload, EmployeeRecord, EntityId,
    KpiRecord, LogoUpload, Page, PayRunPayload, PayRunRecord, PaymentPayload, PaymentRecord,
    PayslipPayload, PayslipRecord, UserPayload, UserRecord,
};
