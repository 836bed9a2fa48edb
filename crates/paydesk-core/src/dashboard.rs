// ── Dashboard facade ──
//
// Owns the API client, the store and the session, and is the only way
// presentation code reads or mutates dashboard data. Cheaply cloneable.
//
// Fetches capture the session generation before their request and
// commit only if it still matches, so results that arrive after a
// logout or identity change are dropped.

use std::sync::Arc;

use bytes::Bytes;
use chrono::{Months, Utc};
use futures_util::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use paydesk_api::{ApiClient, ChartKey, ChartQuery, EntityId, ListQuery};

use crate::command::{Command, CommandResult, EntityForm};
use crate::config::DashboardConfig;
use crate::dialog::{CrudDialog, DialogMode, EntityKind};
use crate::error::CoreError;
use crate::model::{
    ChartBundle, Company, Employee, KpiSnapshot, PayRun, Payment, Payslip, User,
};
use crate::session::{self, Identity, Session};
use crate::store::{DashboardSnapshot, DashboardStore, FetchKind, RefreshReport, fetch_plan};
use crate::validation;

// ── Helpers ──────────────────────────────────────────────────────

fn convert_all<R, T: From<R>>(items: Vec<R>) -> Vec<T> {
    items.into_iter().map(T::from).collect()
}

/// What a fetch captured when it started.
struct FetchScope {
    generation: u64,
    tenant: Option<EntityId>,
}

impl FetchScope {
    /// Force the caller's tenant onto `filters` for non-superusers.
    fn apply(&self, mut filters: ListQuery) -> ListQuery {
        if let Some(ref tenant) = self.tenant {
            filters.tenant_id = Some(tenant.clone());
        }
        filters
    }
}

/// Ends one refresh on drop, so a refresh future dropped mid-way does
/// not leave `loading` stuck.
struct RefreshGuard<'a>(&'a DashboardStore);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.end_refresh();
    }
}

// ── Dashboard ────────────────────────────────────────────────────

/// Handle to one dashboard session.
///
/// Cheaply cloneable via `Arc<DashboardInner>`. Create it with
/// [`new()`](Self::new), authenticate with [`login()`](Self::login), then
/// either call [`refresh_all()`](Self::refresh_all) directly or
/// [`start()`](Self::start) the identity watcher to refresh on every
/// identity change.
#[derive(Clone)]
pub struct Dashboard {
    inner: Arc<DashboardInner>,
}

struct DashboardInner {
    config: DashboardConfig,
    api: ApiClient,
    store: Arc<DashboardStore>,
    session: Session,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl Dashboard {
    /// Build a dashboard for `config`. Does not contact the server.
    pub fn new(config: DashboardConfig) -> Result<Self, CoreError> {
        let api = ApiClient::new(&config.api_url, &config.transport())?;
        Ok(Self::with_api(config, api))
    }

    /// Build a dashboard around an existing API client.
    pub fn with_api(config: DashboardConfig, api: ApiClient) -> Self {
        Self {
            inner: Arc::new(DashboardInner {
                config,
                api,
                store: Arc::new(DashboardStore::new()),
                session: Session::new(),
                cancel: CancellationToken::new(),
                tasks: TaskTracker::new(),
            }),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.inner.config
    }

    /// Access the underlying store for snapshots and subscriptions.
    pub fn store(&self) -> &Arc<DashboardStore> {
        &self.inner.store
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.inner.store.snapshot()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.session.current()
    }

    pub fn subscribe_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.inner.session.subscribe()
    }

    // ── Session lifecycle ────────────────────────────────────────

    /// Validate the credentials, authenticate, and install the identity
    /// carried by the returned access token.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Identity, CoreError> {
        validation::validate_login(email, password.expose_secret())?;

        let tokens = self.inner.api.login(email, password.expose_secret()).await?;
        let access = tokens
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CoreError::InvalidToken {
                message: "the server returned no access token".into(),
            })?;

        let identity = self.adopt_token(SecretString::from(access))?;
        info!(role = %identity.role, user = %identity.user_id, "logged in");
        Ok(identity)
    }

    /// Resume a session from a previously issued access token.
    pub fn resume(&self, token: SecretString) -> Result<Identity, CoreError> {
        let identity = self.adopt_token(token)?;
        debug!(role = %identity.role, "session resumed from stored token");
        Ok(identity)
    }

    fn adopt_token(&self, token: SecretString) -> Result<Identity, CoreError> {
        let identity = session::decode_identity(token.expose_secret())?;
        self.inner.api.set_bearer(token);
        self.install_identity(Some(identity.clone()));
        Ok(identity)
    }

    /// Discard all local state, then end the server-side session.
    ///
    /// A failed server logout is logged and otherwise ignored: the local
    /// session is gone either way.
    pub async fn logout(&self) {
        self.install_identity(None);

        if self.inner.api.has_bearer() {
            if let Err(e) = self.inner.api.logout().await {
                warn!(error = %e, "server logout failed (non-fatal)");
            }
        }
        info!("logged out");
    }

    /// Publish a new identity. Any change resets the store and starts a
    /// new session generation before subscribers hear about it.
    fn install_identity(&self, identity: Option<Identity>) {
        if self.inner.session.current() == identity {
            return;
        }
        let session = &self.inner.session;
        let generation = self.inner.store.invalidate(|| {
            session.replace(identity);
        });
        debug!(generation, "session generation advanced");
    }

    // ── Background tasks ─────────────────────────────────────────

    /// Spawn the identity watcher: a full refresh runs whenever an
    /// identity becomes available or changes.
    pub fn start(&self) {
        let dashboard = self.clone();
        let cancel = self.inner.cancel.clone();
        let mut identity_rx = self.inner.session.subscribe();

        self.inner.tasks.spawn(async move {
            loop {
                let logged_in = identity_rx.borrow_and_update().is_some();
                if logged_in {
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        result = dashboard.refresh_all() => {
                            if let Err(e) = result {
                                debug!(error = %e, "identity-triggered refresh skipped");
                            }
                        }
                    }
                }

                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    changed = identity_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("identity watcher stopped");
        });
    }

    /// Stop background tasks (identity watcher, error timers) and wait
    /// for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        debug!("dashboard background tasks stopped");
    }

    // ── Fetches ──────────────────────────────────────────────────

    /// The generation and identity a fetch runs under.
    fn current(&self) -> Result<(u64, Identity), CoreError> {
        let (generation, identity) = self
            .inner
            .store
            .at_generation(|| self.inner.session.current());
        Ok((generation, identity.ok_or(CoreError::NotAuthenticated)?))
    }

    fn scope(&self) -> Result<FetchScope, CoreError> {
        let (generation, identity) = self.current()?;
        Ok(FetchScope {
            generation,
            tenant: identity.scoped_tenant().cloned(),
        })
    }

    /// Commit a fetch result, or report its failure, if the session that
    /// issued it is still current.
    fn settle<T>(
        &self,
        kind: FetchKind,
        scope: &FetchScope,
        result: Result<T, paydesk_api::Error>,
        commit: impl FnOnce(&DashboardStore, T),
    ) -> Result<(), CoreError> {
        let outcome = result.map_err(CoreError::from);
        let mut settled = Err(CoreError::StaleSession);
        let mut armed = None;

        let current = self.inner.store.commit_if_current(scope.generation, |store| {
            settled = match outcome {
                Ok(value) => {
                    commit(store, value);
                    Ok(())
                }
                Err(e) => {
                    armed = Some(store.set_error(e.to_string()));
                    Err(e)
                }
            };
        });

        if !current {
            debug!(fetch = %kind, generation = scope.generation, "discarding result from a previous session");
            return Err(CoreError::StaleSession);
        }

        match settled {
            Ok(()) => debug!(fetch = %kind, "slice committed"),
            Err(ref e) => warn!(fetch = %kind, error = %e, "fetch failed"),
        }
        if let Some(seq) = armed {
            self.arm_error_timer(seq);
        }
        settled
    }

    /// Fetch the KPI snapshot.
    pub async fn fetch_kpis(&self) -> Result<(), CoreError> {
        let scope = self.scope()?;
        let result = self.inner.api.kpis(scope.tenant.as_ref()).await;
        self.settle(FetchKind::Kpis, &scope, result, |store, record| {
            store.kpis.send_replace(Some(KpiSnapshot::from(record)));
        })
    }

    /// Fetch all four chart series concurrently over the trailing window.
    ///
    /// A series whose request fails degrades to empty; this never sets
    /// the error notice.
    pub async fn fetch_charts(&self) -> Result<(), CoreError> {
        let scope = self.scope()?;
        let query = self.chart_query(scope.tenant.clone());
        let api = &self.inner.api;

        let results = join_all(ChartKey::ALL.map(|key| {
            let query = &query;
            async move { (key, api.chart(key, query).await) }
        }))
        .await;

        let mut bundle = ChartBundle::default();
        for (key, result) in results {
            match result {
                Ok(points) => bundle.set(key, points),
                Err(e) => warn!(chart = %key, error = %e, "chart unavailable, showing empty series"),
            }
        }

        self.settle(
            FetchKind::Charts,
            &scope,
            Ok::<_, paydesk_api::Error>(bundle),
            |store, bundle| {
                store.charts.send_replace(bundle);
            },
        )
    }

    fn chart_query(&self, tenant: Option<EntityId>) -> ChartQuery {
        let to = Utc::now().date_naive();
        let from = to
            .checked_sub_months(Months::new(self.inner.config.chart_window_months))
            .unwrap_or(to);
        ChartQuery { from, to, tenant }
    }

    pub async fn fetch_companies(&self) -> Result<(), CoreError> {
        self.fetch_filtered(FetchKind::Companies, ListQuery::default())
            .await
    }

    pub async fn fetch_users(&self) -> Result<(), CoreError> {
        self.fetch_filtered(FetchKind::Users, ListQuery::default())
            .await
    }

    pub async fn fetch_employees(&self) -> Result<(), CoreError> {
        self.fetch_filtered(FetchKind::Employees, ListQuery::default())
            .await
    }

    pub async fn fetch_pay_runs(&self) -> Result<(), CoreError> {
        self.fetch_filtered(FetchKind::PayRuns, ListQuery::default())
            .await
    }

    pub async fn fetch_payslips(&self) -> Result<(), CoreError> {
        self.fetch_filtered(FetchKind::Payslips, ListQuery::default())
            .await
    }

    pub async fn fetch_payments(&self) -> Result<(), CoreError> {
        self.fetch_filtered(FetchKind::Payments, ListQuery::default())
            .await
    }

    /// Re-fetch one slice with extra list filters (status, date range,
    /// search, pagination). The caller's tenant always overrides any
    /// tenant in `filters` for non-superusers. Filters are ignored for
    /// KPIs and charts.
    pub async fn fetch_filtered(&self, kind: FetchKind, filters: ListQuery) -> Result<(), CoreError> {
        let scope = self.scope()?;
        let query = scope.apply(filters);
        let api = &self.inner.api;

        match kind {
            FetchKind::Kpis => self.fetch_kpis().await,
            FetchKind::Charts => self.fetch_charts().await,
            FetchKind::Companies => {
                let result = api.list_companies(&query).await;
                self.settle(kind, &scope, result, |store, page| {
                    store.companies.replace(convert_all::<_, Company>(page.items));
                })
            }
            FetchKind::Users => {
                let result = api.list_users(&query).await;
                self.settle(kind, &scope, result, |store, page| {
                    store.users.replace(convert_all::<_, User>(page.items));
                })
            }
            FetchKind::Employees => {
                let result = api.list_employees(&query).await;
                self.settle(kind, &scope, result, |store, page| {
                    store.employees.replace(convert_all::<_, Employee>(page.items));
                })
            }
            FetchKind::PayRuns => {
                let result = api.list_pay_runs(&query).await;
                self.settle(kind, &scope, result, |store, page| {
                    store.pay_runs.replace(convert_all::<_, PayRun>(page.items));
                })
            }
            FetchKind::Payslips => {
                let result = api.list_payslips(&query).await;
                self.settle(kind, &scope, result, |store, page| {
                    store.payslips.replace(convert_all::<_, Payslip>(page.items));
                })
            }
            FetchKind::Payments => {
                let result = api.list_payments(&query).await;
                self.settle(kind, &scope, result, |store, page| {
                    store.payments.replace(convert_all::<_, Payment>(page.items));
                })
            }
        }
    }

    async fn run_fetch(&self, kind: FetchKind) -> Result<(), CoreError> {
        match kind {
            FetchKind::Kpis => self.fetch_kpis().await,
            FetchKind::Charts => self.fetch_charts().await,
            _ => self.fetch_filtered(kind, ListQuery::default()).await,
        }
    }

    /// Run the role's whole fetch plan concurrently and wait for every
    /// fetch to settle.
    ///
    /// One failing fetch never aborts its siblings: it lands in the error
    /// notice and in the report's `failed` list while the other slices
    /// still update. Overlapping calls are not de-duplicated.
    pub async fn refresh_all(&self) -> Result<RefreshReport, CoreError> {
        let (generation, identity) = self.current()?;
        let plan = fetch_plan(identity.role);
        let store = &*self.inner.store;

        store.begin_refresh();
        let _guard = RefreshGuard(store);
        store.clear_error();
        debug!(role = %identity.role, fetches = plan.len(), "refreshing dashboard");

        let outcomes = join_all(
            plan.iter()
                .map(|&kind| async move { (kind, self.run_fetch(kind).await) }),
        )
        .await;

        let mut report = RefreshReport::default();
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(()) => report.succeeded.push(kind),
                Err(CoreError::StaleSession | CoreError::NotAuthenticated) => {
                    report.discarded.push(kind);
                }
                Err(e) => report.failed.push((kind, e.to_string())),
            }
        }

        if report.discarded.is_empty() {
            store.commit_if_current(generation, DashboardStore::mark_full_refresh);
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            discarded = report.discarded.len(),
            "dashboard refresh settled"
        );
        Ok(report)
    }

    // ── CRUD dialog ──────────────────────────────────────────────

    /// Open the dialog, replacing whatever was open.
    pub fn open_dialog(&self, mode: DialogMode, kind: EntityKind, seed: Option<Value>) {
        debug!(%mode, %kind, "opening dialog");
        self.inner
            .store
            .set_dialog(CrudDialog::Open { mode, kind, seed });
    }

    pub fn close_dialog(&self) {
        self.inner.store.set_dialog(CrudDialog::Closed);
    }

    /// Submit the open dialog.
    ///
    /// On success the dialog closes and one full refresh runs. On failure
    /// the error is reported and the dialog stays open with its seed, so
    /// the user can correct and resubmit.
    pub async fn submit_dialog(&self, form: EntityForm) -> Result<CommandResult, CoreError> {
        let dialog = self.inner.store.dialog();
        let command = dialog.prepare(form)?;

        match self.apply(command).await {
            Ok(result) => {
                // Leave a dialog opened during the request alone.
                if self.inner.store.dialog() == dialog {
                    self.close_dialog();
                }
                self.refresh_after_mutation().await;
                Ok(result)
            }
            Err(e) => {
                self.report_error(&e);
                Err(e)
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────

    /// Execute a mutation, then refresh. On failure the error is reported
    /// and local state is left unchanged.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        debug!(kind = %command.kind(), "executing command");
        match self.apply(command).await {
            Ok(result) => {
                self.refresh_after_mutation().await;
                Ok(result)
            }
            Err(e) => {
                self.report_error(&e);
                Err(e)
            }
        }
    }

    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.refresh_all().await {
            debug!(error = %e, "post-mutation refresh skipped");
        }
    }

    /// Route a command to its single API call.
    async fn apply(&self, command: Command) -> Result<CommandResult, CoreError> {
        let identity = self
            .inner
            .session
            .current()
            .ok_or(CoreError::NotAuthenticated)?;
        let tenant = identity.scoped_tenant();
        let api = &self.inner.api;

        let result = match command {
            Command::Create(form) => {
                let kind = form.kind();
                let id = match form.with_tenant(tenant) {
                    EntityForm::Company(p) => api.create_company(&p).await?.id,
                    EntityForm::User(p) => api.create_user(&p).await?.id,
                    EntityForm::Employee(p) => api.create_employee(&p).await?.id,
                    EntityForm::PayRun(p) => api.create_pay_run(&p).await?.id,
                    EntityForm::Payslip(p) => api.create_payslip(&p).await?.id,
                    EntityForm::Payment(p) => api.create_payment(&p).await?.id,
                };
                CommandResult::Saved { kind, id }
            }
            Command::Update { id, form } => {
                let kind = form.kind();
                match form.with_tenant(tenant) {
                    EntityForm::Company(p) => api.update_company(&id, &p).await.map(drop)?,
                    EntityForm::User(p) => api.update_user(&id, &p).await.map(drop)?,
                    EntityForm::Employee(p) => api.update_employee(&id, &p).await.map(drop)?,
                    EntityForm::PayRun(p) => api.update_pay_run(&id, &p).await.map(drop)?,
                    EntityForm::Payslip(p) => api.update_payslip(&id, &p).await.map(drop)?,
                    EntityForm::Payment(p) => api.update_payment(&id, &p).await.map(drop)?,
                }
                CommandResult::Saved { kind, id }
            }
            Command::Delete { kind, id } => {
                match kind {
                    EntityKind::Company => api.delete_company(&id).await?,
                    EntityKind::User => api.delete_user(&id).await?,
                    EntityKind::Employee => api.delete_employee(&id).await?,
                    EntityKind::PayRun => api.delete_pay_run(&id).await?,
                    EntityKind::Payslip => api.delete_payslip(&id).await?,
                    EntityKind::Payment => api.delete_payment(&id).await?,
                }
                CommandResult::Deleted { kind, id }
            }
            Command::ActivateEmployee { id } => {
                CommandResult::Employee(api.activate_employee(&id).await?.into())
            }
            Command::DeactivateEmployee { id } => {
                CommandResult::Employee(api.deactivate_employee(&id).await?.into())
            }
            Command::ApprovePayRun { id } => {
                CommandResult::PayRun(api.approve_pay_run(&id).await?.into())
            }
            Command::ClosePayRun { id } => {
                CommandResult::PayRun(api.close_pay_run(&id).await?.into())
            }
        };

        info!(?result, "command applied");
        Ok(result)
    }

    /// Download a payment's PDF receipt. Does not refresh.
    pub async fn payment_receipt(&self, id: &EntityId) -> Result<Bytes, CoreError> {
        if self.inner.session.current().is_none() {
            return Err(CoreError::NotAuthenticated);
        }
        match self.inner.api.payment_pdf(id).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                let err = CoreError::from(e);
                self.report_error(&err);
                Err(err)
            }
        }
    }

    // ── Error notice ─────────────────────────────────────────────

    pub fn clear_error(&self) {
        self.inner.store.clear_error();
    }

    fn report_error(&self, err: &CoreError) {
        if matches!(err, CoreError::StaleSession | CoreError::NotAuthenticated) {
            return;
        }
        let seq = self.inner.store.set_error(err.to_string());
        self.arm_error_timer(seq);
    }

    /// Clear notice `seq` after the configured TTL, unless a newer
    /// notice replaced it first.
    fn arm_error_timer(&self, seq: u64) {
        let store = Arc::clone(&self.inner.store);
        let ttl = self.inner.config.error_ttl;
        let cancel = self.inner.cancel.clone();

        self.inner.tasks.spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {}
                () = tokio::time::sleep(ttl) => {
                    if store.clear_error_if(seq) {
                        debug!(seq, "error notice expired");
                    }
                }
            }
        });
    }
}
