// ── KPI and chart types ──

use serde::{Deserialize, Serialize};

use paydesk_api::{ChartKey, ChartPoint};

/// Aggregate indicators, recomputed server-side and fetched as a unit.
///
/// `Default` is the all-zero snapshot used when the server sends no
/// payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub total_employees: u64,
    pub active_employees: u64,
    pub total_payroll: f64,
    pub pay_runs_draft: u64,
    pub pay_runs_approved: u64,
    pub pay_runs_closed: u64,
    pub payslips_pending: u64,
    pub payslips_partial: u64,
    pub payslips_paid: u64,
}

/// Ordered `(name, value)` points. Order is chart-semantic
/// (chronological for the monthly series).
pub type ChartSeries = Vec<ChartPoint>;

/// One series per dashboard chart. Each series is replaced on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartBundle {
    pub salary_distribution: ChartSeries,
    pub employees_by_position: ChartSeries,
    pub payments_by_month: ChartSeries,
    pub payments_by_type: ChartSeries,
}

impl ChartBundle {
    pub fn get(&self, key: ChartKey) -> &ChartSeries {
        match key {
            ChartKey::SalaryDistribution => &self.salary_distribution,
            ChartKey::EmployeesByPosition => &self.employees_by_position,
            ChartKey::PaymentsByMonth => &self.payments_by_month,
            ChartKey::PaymentsByType => &self.payments_by_type,
        }
    }

    pub fn set(&mut self, key: ChartKey, series: ChartSeries) {
        let slot = match key {
            ChartKey::SalaryDistribution => &mut self.salary_distribution,
            ChartKey::EmployeesByPosition => &mut self.employees_by_position,
            ChartKey::PaymentsByMonth => &mut self.payments_by_month,
            ChartKey::PaymentsByType => &mut self.payments_by_type,
        };
        *slot = series;
    }

    pub fn is_empty(&self) -> bool {
        ChartKey::ALL.iter().all(|key| self.get(*key).is_empty())
    }
}
