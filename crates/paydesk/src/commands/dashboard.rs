//! Dashboard handler: one full refresh, then every slice the role sees.

use std::fmt::Write;

use serde::Serialize;
use tabled::Tabled;

use paydesk_core::{
    Company, Dashboard, DashboardSnapshot, FetchKind, Identity, KpiSnapshot, Payslip,
    RefreshReport, User, fetch_plan,
};

use crate::cli::{DashboardArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::employee::EmployeeRow;
use super::payment::PaymentRow;
use super::payrun::PayRunRow;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CompanyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Currency")]
    currency: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Admins")]
    admins: u64,
    #[tabled(rename = "Cashiers")]
    cashiers: u64,
}

impl From<&Company> for CompanyRow {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id.to_string(),
            name: c.name.clone(),
            currency: c.currency.clone(),
            period: c.period_type.map(|p| p.to_string()).unwrap_or_default(),
            admins: c.admin_seats,
            cashiers: c.cashier_seats,
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Company")]
    company: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            email: u.email.clone(),
            role: u.role.map(|r| r.to_string()).unwrap_or_default(),
            company: u
                .tenant_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct PayslipRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Employee")]
    employee: String,
    #[tabled(rename = "Gross")]
    gross: String,
    #[tabled(rename = "Deductions")]
    deductions: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl PayslipRow {
    fn new(p: &Payslip, color: bool) -> Self {
        Self {
            id: p.id.to_string(),
            employee: p.employee_name.clone().unwrap_or_default(),
            gross: output::amount(p.gross_salary),
            deductions: output::amount(p.deductions),
            net: output::amount(p.effective_net()),
            status: output::payslip_status(p.status, color),
        }
    }
}

// ── Rendering ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct DashboardView {
    identity: Identity,
    report: RefreshReport,
    #[serde(flatten)]
    snapshot: DashboardSnapshot,
}

fn kpi_summary(k: &KpiSnapshot) -> String {
    let mut s = String::new();
    let _ = writeln!(
        s,
        "Employees  {} ({} active)",
        k.total_employees, k.active_employees
    );
    let _ = writeln!(s, "Payroll    {}", output::amount(k.total_payroll));
    let _ = writeln!(
        s,
        "Pay runs   {} draft, {} approved, {} closed",
        k.pay_runs_draft, k.pay_runs_approved, k.pay_runs_closed
    );
    let _ = write!(
        s,
        "Payslips   {} pending, {} partial, {} paid",
        k.payslips_pending, k.payslips_partial, k.payslips_paid
    );
    s
}

fn section(out: &mut String, title: &str, table: &str, color: bool) {
    let _ = write!(out, "\n\n{}\n{table}", output::heading(title, color));
}

fn render_tables(view: &DashboardView, kpis_only: bool, color: bool) -> String {
    let snap = &view.snapshot;
    let mut out = String::new();

    let _ = writeln!(out, "{}", output::heading("Overview", color));
    out.push_str(&kpi_summary(&snap.kpis.clone().unwrap_or_default()));
    if kpis_only {
        return out;
    }

    for kind in fetch_plan(view.identity.role) {
        let table = match kind {
            FetchKind::Kpis | FetchKind::Charts => continue,
            FetchKind::Companies => {
                output::render_table(&snap.companies.iter().map(CompanyRow::from).collect::<Vec<_>>())
            }
            FetchKind::Users => {
                output::render_table(&snap.users.iter().map(UserRow::from).collect::<Vec<_>>())
            }
            FetchKind::Employees => output::render_table(
                &snap.employees.iter().map(|e| EmployeeRow::new(e, color)).collect::<Vec<_>>(),
            ),
            FetchKind::PayRuns => output::render_table(
                &snap.pay_runs.iter().map(|p| PayRunRow::new(p, color)).collect::<Vec<_>>(),
            ),
            FetchKind::Payslips => output::render_table(
                &snap.payslips.iter().map(|p| PayslipRow::new(p, color)).collect::<Vec<_>>(),
            ),
            FetchKind::Payments => {
                output::render_table(&snap.payments.iter().map(PaymentRow::new).collect::<Vec<_>>())
            }
        };
        section(&mut out, &title(*kind), &table, color);
    }
    out
}

fn title(kind: FetchKind) -> String {
    match kind {
        FetchKind::PayRuns => "Pay runs".into(),
        other => {
            let name = other.to_string();
            let mut chars = name.chars();
            chars
                .next()
                .map(|c| c.to_uppercase().chain(chars).collect())
                .unwrap_or_default()
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    dashboard: &Dashboard,
    args: &DashboardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let report = dashboard.refresh_all().await?;
    let identity = dashboard.identity().ok_or(paydesk_core::CoreError::NotAuthenticated)?;

    if !global.quiet {
        for (kind, message) in &report.failed {
            eprintln!("warning: {kind} could not be refreshed: {message}");
        }
    }

    let view = DashboardView {
        identity,
        report,
        snapshot: dashboard.snapshot(),
    };
    let color = output::should_color(&global.color);
    let out = output::render_single(&global.output, &view, |v| {
        render_tables(v, args.kpis_only, color)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
