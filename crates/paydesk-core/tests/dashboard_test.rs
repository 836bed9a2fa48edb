#![allow(clippy::unwrap_used)]
// Integration tests for `Dashboard` against a wiremock payroll server.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paydesk_core::{
    Command, CoreError, CrudDialog, Dashboard, DashboardConfig, DialogMode, EmployeePayload,
    EntityForm, EntityId, EntityKind, FetchKind, ListQuery, PayRunStatus, Role,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn token(role: &str, tenant: Option<i64>) -> String {
    let mut claims = json!({
        "userId": 7,
        "role": role,
        "exp": Utc::now().timestamp() + 3600,
    });
    if let Some(tenant) = tenant {
        claims["entrepriseId"] = json!(tenant);
    }
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"server-side-secret"),
    )
    .unwrap()
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": body }))
}

async fn mount_login(server: &MockServer, role: &str, tenant: Option<i64>) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ok(json!({ "accessToken": token(role, tenant), "refreshToken": "r" })))
        .mount(server)
        .await;
}

async fn mount_logout(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

/// Aggregate endpoints every role hits.
async fn mount_aggregates(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/dashboard/kpis"))
        .respond_with(ok(json!({ "totalEmployes": 3, "employesActifs": 2, "masseSalarialeTotale": 900000 })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/dashboard/charts/[a-z-]+$"))
        .respond_with(ok(json!([{ "name": "Jan", "value": 4 }])))
        .mount(server)
        .await;
}

async fn mount_list(server: &MockServer, route: &str, items: Value, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ok(items))
        .expect(expected)
        .mount(server)
        .await;
}

fn employees() -> Value {
    json!([
        { "id": 1, "nomComplet": "Awa Ndiaye", "poste": "Comptable", "statut": "ACTIF" },
        { "id": 2, "nomComplet": "Moussa Diop", "poste": "Caissier", "statut": "INACTIF" }
    ])
}

fn payments() -> Value {
    json!([{ "id": 11, "montant": 150000, "type": "WAVE" }])
}

fn pay_runs() -> Value {
    json!([{ "id": 9, "type": "MENSUELLE", "statut": "CLOTURE" }])
}

async fn logged_in(server: &MockServer) -> Dashboard {
    let dashboard = Dashboard::new(DashboardConfig::new(server.uri())).unwrap();
    dashboard
        .login("admin@acme.sn", &SecretString::from("secret1".to_owned()))
        .await
        .unwrap();
    dashboard
}

// ── Role-aware refresh ──────────────────────────────────────────────

#[tokio::test]
async fn test_superadmin_refresh_issues_every_fetch() {
    let server = MockServer::start().await;
    mount_login(&server, "SUPER_ADMIN", None).await;
    mount_aggregates(&server).await;
    mount_list(&server, "/entreprises", json!([{ "id": 1, "nom": "Acme", "devise": "XOF" }]), 1).await;
    mount_list(&server, "/users", json!([{ "id": 7, "email": "root@acme.sn", "role": "SUPER_ADMIN" }]), 1).await;
    mount_list(&server, "/employes", employees(), 1).await;
    mount_list(&server, "/payruns", pay_runs(), 1).await;
    mount_list(&server, "/payslips", json!([]), 1).await;
    mount_list(&server, "/paiements", payments(), 1).await;

    let dashboard = logged_in(&server).await;
    let report = dashboard.refresh_all().await.unwrap();

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.succeeded.len(), 8);

    let store = dashboard.store();
    assert_eq!(store.companies_snapshot()[0].name, "Acme");
    assert_eq!(store.users_snapshot()[0].role, Some(Role::SuperAdmin));
    assert_eq!(store.employee_count(), 2);
    assert_eq!(store.payment_count(), 1);
    assert_eq!(store.kpis().unwrap().total_employees, 3);
    assert_eq!(store.charts().payments_by_month.len(), 1);
    assert!(store.last_full_refresh().is_some());
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_admin_refresh_is_tenant_scoped() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;

    Mock::given(method("GET"))
        .and(path("/dashboard/kpis"))
        .and(query_param("entrepriseId", "42"))
        .respond_with(ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/dashboard/charts/[a-z-]+$"))
        .and(query_param("entrepriseId", "42"))
        .respond_with(ok(json!({ "labels": ["CDI"], "data": [3] })))
        .expect(4)
        .mount(&server)
        .await;
    for route in ["/employes", "/payruns", "/payslips", "/paiements"] {
        Mock::given(method("GET"))
            .and(path(route))
            .and(query_param("entrepriseId", "42"))
            .respond_with(ok(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }
    mount_list(&server, "/entreprises", json!([]), 0).await;
    mount_list(&server, "/users", json!([]), 0).await;

    let dashboard = logged_in(&server).await;
    let report = dashboard.refresh_all().await.unwrap();

    assert!(report.is_clean(), "{report:?}");
    assert_eq!(report.succeeded.len(), 6);
    assert!(!report.succeeded.contains(&FetchKind::Companies));
    assert!(!report.succeeded.contains(&FetchKind::Users));
}

#[tokio::test]
async fn test_cashier_refresh_only_touches_payments() {
    let server = MockServer::start().await;
    mount_login(&server, "CAISSIER", Some(42)).await;
    mount_aggregates(&server).await;
    mount_list(&server, "/paiements", payments(), 1).await;
    mount_list(&server, "/employes", json!([]), 0).await;
    mount_list(&server, "/payruns", json!([]), 0).await;
    mount_list(&server, "/payslips", json!([]), 0).await;

    let dashboard = logged_in(&server).await;
    let report = dashboard.refresh_all().await.unwrap();

    assert_eq!(
        report.succeeded,
        vec![FetchKind::Kpis, FetchKind::Charts, FetchKind::Payments]
    );
}

#[tokio::test]
async fn test_filters_cannot_escape_tenant() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    Mock::given(method("GET"))
        .and(path("/employes"))
        .and(query_param("entrepriseId", "42"))
        .and(query_param("statut", "ACTIF"))
        .respond_with(ok(employees()))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = logged_in(&server).await;
    let filters = ListQuery::new().tenant(Some(EntityId::from(7))).status("ACTIF");
    dashboard
        .fetch_filtered(FetchKind::Employees, filters)
        .await
        .unwrap();

    assert_eq!(dashboard.store().employee_count(), 2);
}

#[tokio::test]
async fn test_refresh_requires_session() {
    let server = MockServer::start().await;
    let dashboard = Dashboard::new(DashboardConfig::new(server.uri())).unwrap();

    assert_eq!(dashboard.refresh_all().await, Err(CoreError::NotAuthenticated));
    assert_eq!(dashboard.fetch_employees().await, Err(CoreError::NotAuthenticated));
}

// ── Settle-all ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_partial_failure_keeps_other_slices_then_recovers() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    mount_aggregates(&server).await;
    Mock::given(method("GET"))
        .and(path("/employes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_list(&server, "/employes", employees(), 1).await;
    mount_list(&server, "/payruns", pay_runs(), 2).await;
    mount_list(&server, "/payslips", json!([]), 2).await;
    mount_list(&server, "/paiements", payments(), 2).await;

    let dashboard = logged_in(&server).await;

    let report = dashboard.refresh_all().await.unwrap();
    assert_eq!(report.failed, vec![(FetchKind::Employees, "boom".to_owned())]);
    assert_eq!(report.succeeded.len(), 5);
    assert_eq!(dashboard.store().payment_count(), 1);
    assert_eq!(dashboard.store().employee_count(), 0);
    assert_eq!(dashboard.store().error().unwrap().message, "boom");
    assert!(dashboard.store().last_full_refresh().is_none());

    let report = dashboard.refresh_all().await.unwrap();
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(dashboard.store().employee_count(), 2);
    assert_eq!(dashboard.store().error(), None);
}

#[tokio::test]
async fn test_repeated_refresh_yields_identical_snapshot() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    mount_aggregates(&server).await;
    mount_list(&server, "/employes", employees(), 2).await;
    mount_list(&server, "/payruns", pay_runs(), 2).await;
    mount_list(&server, "/payslips", json!([]), 2).await;
    mount_list(&server, "/paiements", payments(), 2).await;

    let dashboard = logged_in(&server).await;
    dashboard.refresh_all().await.unwrap();
    let first = dashboard.snapshot();
    dashboard.refresh_all().await.unwrap();

    assert_eq!(dashboard.snapshot(), first);
}

#[tokio::test]
async fn test_chart_failure_degrades_to_empty_series() {
    let server = MockServer::start().await;
    mount_login(&server, "CAISSIER", Some(42)).await;
    Mock::given(method("GET"))
        .and(path("/dashboard/charts/payments-by-type"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_aggregates(&server).await;
    mount_list(&server, "/paiements", json!([]), 1).await;

    let dashboard = logged_in(&server).await;
    let report = dashboard.refresh_all().await.unwrap();

    assert!(report.is_clean(), "{report:?}");
    let charts = dashboard.store().charts();
    assert!(charts.payments_by_type.is_empty());
    assert_eq!(charts.payments_by_month.len(), 1);
    assert_eq!(dashboard.store().error(), None);
}

#[tokio::test]
async fn test_error_notice_expires() {
    let server = MockServer::start().await;
    mount_login(&server, "CAISSIER", Some(42)).await;
    Mock::given(method("GET"))
        .and(path("/paiements"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = DashboardConfig {
        error_ttl: Duration::from_millis(50),
        ..DashboardConfig::new(server.uri())
    };
    let dashboard = Dashboard::new(config).unwrap();
    dashboard
        .login("admin@acme.sn", &SecretString::from("secret1".to_owned()))
        .await
        .unwrap();

    let err = dashboard.fetch_payments().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert!(dashboard.store().error().is_some());

    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(dashboard.store().error(), None);
}

// ── Session generation ──────────────────────────────────────────────

#[tokio::test]
async fn test_logout_discards_in_flight_results() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    mount_logout(&server).await;
    let slow = |body: Value| ok(body).set_delay(Duration::from_millis(300));
    Mock::given(method("GET"))
        .and(path("/dashboard/kpis"))
        .respond_with(slow(json!({ "totalEmployes": 3 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/dashboard/charts/[a-z-]+$"))
        .respond_with(slow(json!([{ "name": "Jan", "value": 4 }])))
        .mount(&server)
        .await;
    for (route, body) in [
        ("/employes", employees()),
        ("/payruns", pay_runs()),
        ("/payslips", json!([])),
        ("/paiements", payments()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(slow(body))
            .mount(&server)
            .await;
    }

    let dashboard = logged_in(&server).await;
    let refreshing = dashboard.clone();
    let handle = tokio::spawn(async move { refreshing.refresh_all().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    dashboard.logout().await;

    let report = handle.await.unwrap().unwrap();
    assert_eq!(report.discarded.len(), 6);
    assert!(report.succeeded.is_empty());

    let store = dashboard.store();
    assert_eq!(dashboard.identity(), None);
    assert_eq!(store.employee_count(), 0);
    assert_eq!(store.payment_count(), 0);
    assert_eq!(store.kpis(), None);
    assert!(store.charts().is_empty());
    assert_eq!(store.error(), None);
    assert!(!store.is_loading());
}

#[tokio::test]
async fn test_identity_watcher_refreshes_on_login() {
    let server = MockServer::start().await;
    mount_login(&server, "CAISSIER", Some(42)).await;
    mount_aggregates(&server).await;
    mount_list(&server, "/paiements", payments(), 1).await;

    let dashboard = Dashboard::new(DashboardConfig::new(server.uri())).unwrap();
    dashboard.start();
    dashboard
        .login("caisse@acme.sn", &SecretString::from("secret1".to_owned()))
        .await
        .unwrap();

    for _ in 0..100 {
        if dashboard.store().last_full_refresh().is_some() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    assert_eq!(dashboard.store().payment_count(), 1);
    dashboard.shutdown().await;
}

// ── CRUD dialog & commands ──────────────────────────────────────────

fn new_employee() -> EmployeePayload {
    EmployeePayload {
        nom_complet: "Fatou Sall".into(),
        poste: "Comptable".into(),
        type_contrat: "FIXE".into(),
        taux_salaire: 350_000.0,
        ..EmployeePayload::default()
    }
}

#[tokio::test]
async fn test_dialog_create_closes_and_refreshes_once() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    mount_aggregates(&server).await;
    Mock::given(method("POST"))
        .and(path("/employes"))
        .and(body_partial_json(json!({ "nomComplet": "Fatou Sall", "entrepriseId": 42 })))
        .respond_with(ok(json!({ "id": 3, "nomComplet": "Fatou Sall" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, "/employes", employees(), 1).await;
    mount_list(&server, "/payruns", json!([]), 1).await;
    mount_list(&server, "/payslips", json!([]), 1).await;
    mount_list(&server, "/paiements", json!([]), 1).await;

    let dashboard = logged_in(&server).await;
    dashboard.open_dialog(DialogMode::Create, EntityKind::Employee, None);

    let result = dashboard
        .submit_dialog(EntityForm::Employee(new_employee()))
        .await
        .unwrap();

    assert_eq!(
        result,
        paydesk_core::CommandResult::Saved {
            kind: EntityKind::Employee,
            id: EntityId::Number(3),
        }
    );
    assert_eq!(dashboard.store().dialog(), CrudDialog::Closed);
    assert_eq!(dashboard.store().employee_count(), 2);
}

#[tokio::test]
async fn test_admin_create_is_pinned_to_own_tenant() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    mount_aggregates(&server).await;
    Mock::given(method("POST"))
        .and(path("/employes"))
        .and(body_partial_json(json!({ "entrepriseId": 99 })))
        .respond_with(ok(json!({ "id": 4 })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/employes"))
        .and(body_partial_json(json!({ "nomComplet": "Fatou Sall", "entrepriseId": 42 })))
        .respond_with(ok(json!({ "id": 3 })))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, "/employes", employees(), 1).await;
    mount_list(&server, "/payruns", json!([]), 1).await;
    mount_list(&server, "/payslips", json!([]), 1).await;
    mount_list(&server, "/paiements", json!([]), 1).await;

    let dashboard = logged_in(&server).await;
    let foreign = EmployeePayload {
        entreprise_id: Some(EntityId::Number(99)),
        ..new_employee()
    };

    let result = dashboard
        .execute(Command::Create(EntityForm::Employee(foreign)))
        .await
        .unwrap();

    assert_eq!(
        result,
        paydesk_core::CommandResult::Saved {
            kind: EntityKind::Employee,
            id: EntityId::Number(3),
        }
    );
}

#[tokio::test]
async fn test_dialog_failure_stays_open() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    Mock::given(method("PUT"))
        .and(path("/employes/1"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({ "message": "Compte bancaire déjà utilisé" })))
        .expect(1)
        .mount(&server)
        .await;
    mount_list(&server, "/employes", json!([]), 0).await;

    let dashboard = logged_in(&server).await;
    let seed = json!({ "id": 1, "nomComplet": "Awa Ndiaye" });
    dashboard.open_dialog(DialogMode::Update, EntityKind::Employee, Some(seed));

    let err = dashboard
        .submit_dialog(EntityForm::Employee(new_employee()))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert!(dashboard.store().dialog().is_open());
    assert_eq!(dashboard.store().dialog().seed_id(), Some(EntityId::Number(1)));
    assert_eq!(
        dashboard.store().error().unwrap().message,
        "Compte bancaire déjà utilisé"
    );
}

#[tokio::test]
async fn test_invalid_dialog_form_never_reaches_server() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    Mock::given(method("POST"))
        .and(path("/employes"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = logged_in(&server).await;

    let err = dashboard
        .submit_dialog(EntityForm::Employee(new_employee()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "dialog"));

    dashboard.open_dialog(DialogMode::Create, EntityKind::Employee, None);
    let blank = EmployeePayload {
        poste: String::new(),
        ..new_employee()
    };
    let err = dashboard
        .submit_dialog(EntityForm::Employee(blank))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(dashboard.store().dialog().is_open());
    assert_eq!(dashboard.store().error(), None);
}

#[tokio::test]
async fn test_approving_closed_pay_run_leaves_store_untouched() {
    let server = MockServer::start().await;
    mount_login(&server, "ADMIN", Some(42)).await;
    mount_aggregates(&server).await;
    mount_list(&server, "/employes", json!([]), 1).await;
    mount_list(&server, "/payruns", pay_runs(), 1).await;
    mount_list(&server, "/payslips", json!([]), 1).await;
    mount_list(&server, "/paiements", json!([]), 1).await;
    Mock::given(method("PATCH"))
        .and(path("/payruns/9/approve"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Seul un pay run en brouillon peut être approuvé" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = logged_in(&server).await;
    dashboard.refresh_all().await.unwrap();
    let before = dashboard.store().pay_runs_snapshot();

    let err = dashboard
        .execute(Command::ApprovePayRun { id: EntityId::Number(9) })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::Request {
            status: Some(400),
            message: "Seul un pay run en brouillon peut être approuvé".into(),
        }
    );
    let after = dashboard.store().pay_runs_snapshot();
    assert_eq!(after, before);
    assert_eq!(after[0].status, PayRunStatus::Cloture);
}

#[tokio::test]
async fn test_login_validation_happens_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = Dashboard::new(DashboardConfig::new(server.uri())).unwrap();
    let err = dashboard
        .login("not-an-email", &SecretString::from("secret1".to_owned()))
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "email"));
    assert_eq!(dashboard.identity(), None);
}
