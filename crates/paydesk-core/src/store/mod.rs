// ── Dashboard store ──
//
// The canonical client-side snapshot: one slice per entity type, the KPI
// snapshot, the chart bundle, and transient UI state (loading flag,
// error notice, CRUD dialog). Every piece is a `watch` channel, so reads
// never block and always return the latest committed value.
//
// Commits are gated on the session generation. A fetch captures the
// generation when it starts; if the identity changed since, its result
// is dropped instead of written into the reset store.

mod refresh;
mod slice;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::dialog::CrudDialog;
use crate::model::{
    ChartBundle, Company, Employee, KpiSnapshot, PayRun, Payment, Payslip, User,
};
use crate::stream::SliceStream;

pub use refresh::{FetchKind, RefreshReport, fetch_plan};
use slice::Slice;

/// The displayable error, tagged so a delayed clear only removes the
/// notice it was armed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub seq: u64,
    pub message: String,
}

/// Point-in-time copy of everything the store holds, except timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub companies: Vec<Company>,
    pub users: Vec<User>,
    pub employees: Vec<Employee>,
    pub pay_runs: Vec<PayRun>,
    pub payslips: Vec<Payslip>,
    pub payments: Vec<Payment>,
    pub kpis: Option<KpiSnapshot>,
    pub charts: ChartBundle,
    pub loading: bool,
    pub error: Option<String>,
    pub dialog: CrudDialog,
}

/// Central reactive store for one dashboard session.
pub struct DashboardStore {
    pub(crate) companies: Slice<Company>,
    pub(crate) users: Slice<User>,
    pub(crate) employees: Slice<Employee>,
    pub(crate) pay_runs: Slice<PayRun>,
    pub(crate) payslips: Slice<Payslip>,
    pub(crate) payments: Slice<Payment>,
    pub(crate) kpis: watch::Sender<Option<KpiSnapshot>>,
    pub(crate) charts: watch::Sender<ChartBundle>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<ErrorNotice>>,
    dialog: watch::Sender<CrudDialog>,
    last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,

    /// Bumped on every identity change.
    generation: AtomicU64,
    /// Serializes generation checks with commits and resets.
    commit_gate: Mutex<()>,
    refreshes_in_flight: AtomicUsize,
    error_seq: AtomicU64,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        let (kpis, _) = watch::channel(None);
        let (charts, _) = watch::channel(ChartBundle::default());
        let (loading, _) = watch::channel(false);
        let (error, _) = watch::channel(None);
        let (dialog, _) = watch::channel(CrudDialog::Closed);
        let (last_full_refresh, _) = watch::channel(None);

        Self {
            companies: Slice::new(),
            users: Slice::new(),
            employees: Slice::new(),
            pay_runs: Slice::new(),
            payslips: Slice::new(),
            payments: Slice::new(),
            kpis,
            charts,
            loading,
            error,
            dialog,
            last_full_refresh,
            generation: AtomicU64::new(0),
            commit_gate: Mutex::new(()),
            refreshes_in_flight: AtomicUsize::new(0),
            error_seq: AtomicU64::new(0),
        }
    }

    // ── Session generation ───────────────────────────────────────────

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Start a new generation, discard everything the previous session
    /// fetched, and run `publish` before any reader can pair the new
    /// generation with old session state. In-flight fetches of the old
    /// generation will no longer commit.
    pub(crate) fn invalidate(&self, publish: impl FnOnce()) -> u64 {
        let _gate = self.commit_gate.lock().unwrap_or_else(PoisonError::into_inner);
        let next = self.generation.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        self.reset();
        publish();
        next
    }

    /// Read the current generation together with `read`, atomically with
    /// respect to [`invalidate`](Self::invalidate).
    pub(crate) fn at_generation<R>(&self, read: impl FnOnce() -> R) -> (u64, R) {
        let _gate = self.commit_gate.lock().unwrap_or_else(PoisonError::into_inner);
        (self.generation(), read())
    }

    /// Run `commit` only if `generation` is still current. Returns
    /// whether it ran.
    pub(crate) fn commit_if_current(&self, generation: u64, commit: impl FnOnce(&Self)) -> bool {
        let _gate = self.commit_gate.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation() != generation {
            return false;
        }
        commit(self);
        true
    }

    fn reset(&self) {
        self.companies.clear();
        self.users.clear();
        self.employees.clear();
        self.pay_runs.clear();
        self.payslips.clear();
        self.payments.clear();
        self.kpis.send_replace(None);
        self.charts.send_replace(ChartBundle::default());
        self.loading.send_replace(false);
        self.error.send_replace(None);
        self.dialog.send_replace(CrudDialog::Closed);
        self.last_full_refresh.send_replace(None);
    }

    // ── Loading ──────────────────────────────────────────────────────

    /// Overlapping refreshes are counted; `loading` drops to `false`
    /// only when the last one settles.
    pub(crate) fn begin_refresh(&self) {
        self.refreshes_in_flight.fetch_add(1, Ordering::AcqRel);
        self.loading.send_replace(true);
    }

    pub(crate) fn end_refresh(&self) {
        let previous = self
            .refreshes_in_flight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .unwrap_or(0);
        if previous <= 1 {
            self.loading.send_replace(false);
        }
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    // ── Error notice ─────────────────────────────────────────────────

    /// Show `message`, replacing any current notice. Returns the
    /// notice's sequence number for a later [`clear_error_if`](Self::clear_error_if).
    pub(crate) fn set_error(&self, message: impl Into<String>) -> u64 {
        let seq = self.error_seq.fetch_add(1, Ordering::AcqRel).wrapping_add(1);
        self.error.send_replace(Some(ErrorNotice {
            seq,
            message: message.into(),
        }));
        seq
    }

    pub fn clear_error(&self) {
        self.error.send_if_modified(|current| current.take().is_some());
    }

    /// Clear the notice only if it is still the one numbered `seq`.
    pub fn clear_error_if(&self, seq: u64) -> bool {
        self.error.send_if_modified(|current| {
            if current.as_ref().is_some_and(|notice| notice.seq == seq) {
                *current = None;
                true
            } else {
                false
            }
        })
    }

    pub fn error(&self) -> Option<ErrorNotice> {
        self.error.borrow().clone()
    }

    pub fn subscribe_error(&self) -> watch::Receiver<Option<ErrorNotice>> {
        self.error.subscribe()
    }

    // ── CRUD dialog ──────────────────────────────────────────────────

    pub(crate) fn set_dialog(&self, dialog: CrudDialog) {
        self.dialog.send_replace(dialog);
    }

    pub fn dialog(&self) -> CrudDialog {
        self.dialog.borrow().clone()
    }

    pub fn subscribe_dialog(&self) -> watch::Receiver<CrudDialog> {
        self.dialog.subscribe()
    }

    // ── Aggregates ───────────────────────────────────────────────────

    pub fn kpis(&self) -> Option<KpiSnapshot> {
        self.kpis.borrow().clone()
    }

    pub fn subscribe_kpis(&self) -> watch::Receiver<Option<KpiSnapshot>> {
        self.kpis.subscribe()
    }

    pub fn charts(&self) -> ChartBundle {
        self.charts.borrow().clone()
    }

    pub fn subscribe_charts(&self) -> watch::Receiver<ChartBundle> {
        self.charts.subscribe()
    }

    pub(crate) fn mark_full_refresh(&self) {
        self.last_full_refresh.send_replace(Some(Utc::now()));
    }

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    // ── Slice snapshots ──────────────────────────────────────────────

    pub fn companies_snapshot(&self) -> Arc<Vec<Arc<Company>>> {
        self.companies.snapshot()
    }

    pub fn users_snapshot(&self) -> Arc<Vec<Arc<User>>> {
        self.users.snapshot()
    }

    pub fn employees_snapshot(&self) -> Arc<Vec<Arc<Employee>>> {
        self.employees.snapshot()
    }

    pub fn pay_runs_snapshot(&self) -> Arc<Vec<Arc<PayRun>>> {
        self.pay_runs.snapshot()
    }

    pub fn payslips_snapshot(&self) -> Arc<Vec<Arc<Payslip>>> {
        self.payslips.snapshot()
    }

    pub fn payments_snapshot(&self) -> Arc<Vec<Arc<Payment>>> {
        self.payments.snapshot()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_companies(&self) -> SliceStream<Company> {
        self.companies.subscribe()
    }

    pub fn subscribe_users(&self) -> SliceStream<User> {
        self.users.subscribe()
    }

    pub fn subscribe_employees(&self) -> SliceStream<Employee> {
        self.employees.subscribe()
    }

    pub fn subscribe_pay_runs(&self) -> SliceStream<PayRun> {
        self.pay_runs.subscribe()
    }

    pub fn subscribe_payslips(&self) -> SliceStream<Payslip> {
        self.payslips.subscribe()
    }

    pub fn subscribe_payments(&self) -> SliceStream<Payment> {
        self.payments.subscribe()
    }

    // ── Counts ───────────────────────────────────────────────────────

    pub fn employee_count(&self) -> usize {
        self.employees.len()
    }

    pub fn payment_count(&self) -> usize {
        self.payments.len()
    }

    // ── Whole-store snapshot ─────────────────────────────────────────

    pub fn snapshot(&self) -> DashboardSnapshot {
        fn owned<T: Clone + Send + Sync + 'static>(slice: &Slice<T>) -> Vec<T> {
            slice.snapshot().iter().map(|item| (**item).clone()).collect()
        }

        DashboardSnapshot {
            companies: owned(&self.companies),
            users: owned(&self.users),
            employees: owned(&self.employees),
            pay_runs: owned(&self.pay_runs),
            payslips: owned(&self.payslips),
            payments: owned(&self.payments),
            kpis: self.kpis(),
            charts: self.charts(),
            loading: self.is_loading(),
            error: self.error().map(|notice| notice.message),
            dialog: self.dialog(),
        }
    }
}
