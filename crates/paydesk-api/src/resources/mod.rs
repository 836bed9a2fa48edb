// Resource endpoints, one module per API resource.
//
// Each module adds inherent methods to `ApiClient`. Every method maps to
// exactly one HTTP request.

mod auth;
mod companies;
mod dashboard;
mod employees;
mod pay_runs;
mod payments;
mod payslips;
mod users;
