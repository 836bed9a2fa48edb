// ── API-to-domain type conversions ──
//
// Bridges raw `paydesk_api` wire records into `crate::model` types.
// Each `From` impl renames the French wire fields, parses status strings
// into enums and dates into `chrono` types, and keeps unparseable values
// as `Unknown`/`None` rather than failing the whole list.

use chrono::{DateTime, NaiveDate, Utc};

use paydesk_api::{
    CompanyRecord, EmployeeRecord, EntityId, KpiRecord, PayRunRecord, PaymentRecord,
    PayslipRecord, UserRecord,
};

use crate::model::{
    Company, Employee, EmployeeStatus, KpiSnapshot, PayRun, PayRunStatus, Payment,
    PaymentMethod, Payslip, PayslipStatus, PeriodType, User,
};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse a date that may carry a time part (`2024-03-01T00:00:00.000Z`).
fn parse_date(raw: Option<&String>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Parse an RFC 3339 timestamp, falling back to midnight of a bare date.
fn parse_timestamp(raw: Option<&String>) -> Option<DateTime<Utc>> {
    let text = raw?;
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            parse_date(Some(text))
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

fn parse_or<T: std::str::FromStr>(raw: &str, fallback: T) -> T {
    raw.trim().parse().unwrap_or(fallback)
}

// ── Records ────────────────────────────────────────────────────────

impl From<CompanyRecord> for Company {
    fn from(r: CompanyRecord) -> Self {
        Self {
            id: r.id,
            name: r.nom,
            currency: r.devise,
            address: non_empty(r.adresse),
            logo: non_empty(r.logo),
            primary_color: non_empty(r.primary_color),
            secondary_color: non_empty(r.secondary_color),
            period_type: r
                .periode_type
                .as_deref()
                .map(|p| parse_or(p, PeriodType::Unknown)),
            admin_seats: r.nombre_admins,
            cashier_seats: r.nombre_caissiers,
        }
    }
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            role: r.role.trim().parse().ok(),
            email: r.email,
            tenant_id: r.entreprise_id,
        }
    }
}

impl From<EmployeeRecord> for Employee {
    fn from(r: EmployeeRecord) -> Self {
        Self {
            id: r.id,
            status: parse_or(&r.statut, EmployeeStatus::Unknown),
            full_name: r.nom_complet,
            position: r.poste,
            contract_type: r.type_contrat,
            pay_rate: r.taux_salaire,
            bank_account: non_empty(r.compte_bancaire),
            tenant_id: r.entreprise_id,
        }
    }
}

impl From<PayRunRecord> for PayRun {
    fn from(r: PayRunRecord) -> Self {
        Self {
            id: r.id,
            period_type: parse_or(&r.period_type, PeriodType::Unknown),
            start_date: parse_date(r.date_debut.as_ref()),
            end_date: parse_date(r.date_fin.as_ref()),
            status: parse_or(&r.statut, PayRunStatus::Unknown),
            tenant_id: r.entreprise_id,
        }
    }
}

impl From<PayslipRecord> for Payslip {
    fn from(r: PayslipRecord) -> Self {
        let employee_id = r
            .employe_id
            .or_else(|| r.employe.as_ref().map(|e| e.id.clone()));
        let pay_run_id = r
            .pay_run_id
            .or_else(|| r.pay_run.as_ref().map(|p| p.id.clone()));

        Self {
            id: r.id,
            employee_id,
            pay_run_id,
            employee_name: r
                .employe
                .map(|e| e.nom_complet)
                .filter(|n| !n.is_empty()),
            gross_salary: r.salaire_brut,
            deductions: r.deductions,
            net_salary: r.salaire_net,
            status: parse_or(&r.statut, PayslipStatus::Unknown),
            created_at: parse_timestamp(r.date_creation.as_ref()),
        }
    }
}

impl From<PaymentRecord> for Payment {
    fn from(r: PaymentRecord) -> Self {
        let employee_name = r
            .payslip
            .as_ref()
            .and_then(|p| p.employe.as_ref())
            .map(|e| e.nom_complet.clone())
            .filter(|n| !n.is_empty());
        let payslip_id: Option<EntityId> = r
            .payslip_id
            .or_else(|| r.payslip.as_ref().map(|p| p.id.clone()));

        Self {
            id: r.id,
            payslip_id,
            amount: r.montant,
            method: parse_or(&r.method, PaymentMethod::Unknown),
            paid_at: parse_timestamp(r.date_paiement.as_ref()),
            notes: non_empty(r.notes),
            employee_name,
        }
    }
}

impl From<KpiRecord> for KpiSnapshot {
    fn from(r: KpiRecord) -> Self {
        Self {
            total_employees: r.total_employes,
            active_employees: r.employes_actifs,
            total_payroll: r.masse_salariale_totale,
            pay_runs_draft: r.pay_runs_brouillon,
            pay_runs_approved: r.pay_runs_approuve,
            pay_runs_closed: r.pay_runs_cloture,
            payslips_pending: r.paiements_en_attente,
            payslips_partial: r.paiements_partiel,
            payslips_paid: r.paiements_paye,
        }
    }
}
