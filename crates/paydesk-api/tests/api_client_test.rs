#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use bytes::Bytes;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paydesk_api::{
    ApiClient, ChartKey, ChartPoint, ChartQuery, CompanyPayload, EntityId, Error, ListQuery,
    LogoUpload, PayRunPayload, TransportConfig,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(&server.uri(), &TransportConfig::default()).unwrap();
    (server, client)
}

async fn authed() -> (MockServer, ApiClient) {
    let (server, client) = setup().await;
    client.set_bearer(SecretString::from("test-token".to_owned()));
    (server, client)
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_login_returns_tokens() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "admin@acme.sn", "password": "secret1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "accessToken": "aaa.bbb.ccc", "refreshToken": "rrr" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client.login("admin@acme.sn", "secret1").await.unwrap();
    assert_eq!(tokens.access_token.as_deref(), Some("aaa.bbb.ccc"));
    assert_eq!(tokens.refresh_token.as_deref(), Some("rrr"));
    assert!(!client.has_bearer(), "login must not attach the token by itself");
}

#[tokio::test]
async fn test_login_without_tokens_is_request_error() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "ok": true } })))
        .mount(&server)
        .await;

    let result = client.login("admin@acme.sn", "secret1").await;
    assert!(
        matches!(result, Err(Error::Request { status: None, .. })),
        "expected Request error without status, got: {result:?}"
    );
}

#[tokio::test]
async fn test_login_rejection_carries_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Identifiants incorrects" })),
        )
        .mount(&server)
        .await;

    let err = client.login("admin@acme.sn", "bad-pass").await.unwrap_err();
    assert_eq!(err.to_string(), "Identifiants incorrects");
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_logout_clears_bearer_even_on_failure() {
    let (server, client) = authed().await;

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.logout().await;
    assert!(result.is_err());
    assert!(!client.has_bearer());
}

// ── Envelope and error handling ─────────────────────────────────────

#[tokio::test]
async fn test_bearer_is_attached_and_envelope_unwrapped() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/employes"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": 1, "nomComplet": "Awa Ndiaye", "statut": "ACTIF" },
                { "id": 2, "nomComplet": "Moussa Diop", "statut": "INACTIF" }
            ]
        })))
        .mount(&server)
        .await;

    let page = client.list_employees(&ListQuery::new()).await.unwrap();
    let names: Vec<&str> = page.items.iter().map(|e| e.nom_complet.as_str()).collect();
    assert_eq!(names, vec!["Awa Ndiaye", "Moussa Diop"]);
}

#[tokio::test]
async fn test_error_without_message_uses_status_fallback() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = client.list_users(&ListQuery::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
}

#[tokio::test]
async fn test_malformed_json_is_deserialization_error() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/paiements"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let result = client.list_payments(&ListQuery::new()).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_non_json_body_with_accents_is_deserialization_error() {
    let (server, client) = authed().await;

    let page = format!("{}é trailing", "x".repeat(199));
    Mock::given(method("GET"))
        .and(path("/paiements"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page.clone()))
        .mount(&server)
        .await;

    match client.list_payments(&ListQuery::new()).await {
        Err(Error::Deserialization { message, body }) => {
            assert_eq!(body, page);
            assert!(message.contains('é'), "preview should keep the whole char: {message}");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Port 9 (discard) on localhost is not expected to accept connections.
    let client = ApiClient::new("http://127.0.0.1:9", &TransportConfig::default()).unwrap();
    let err = client.list_payslips(&ListQuery::new()).await.unwrap_err();
    assert!(err.is_transport(), "expected transport error, got: {err:?}");
}

// ── Lists and queries ───────────────────────────────────────────────

#[tokio::test]
async fn test_list_query_is_sent_as_wire_pairs() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/payruns"))
        .and(query_param("entrepriseId", "42"))
        .and(query_param("statut", "BROUILLON"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": 7, "type": "MENSUELLE", "statut": "BROUILLON" }],
            "total": 31
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = ListQuery::new()
        .tenant(Some(EntityId::Number(42)))
        .status("BROUILLON");
    let page = client.list_pay_runs(&query).await.unwrap();

    assert_eq!(page.total, Some(31));
    assert_eq!(page.items[0].period_type, "MENSUELLE");
}

#[tokio::test]
async fn test_list_under_resource_key() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/entreprises"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "entreprises": [{ "id": 1, "nom": "Acme", "devise": "XOF" }] }
        })))
        .mount(&server)
        .await;

    let page = client.list_companies(&ListQuery::new()).await.unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].devise, "XOF");
}

// ── Dashboard ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_kpis_with_tenant() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/kpis"))
        .and(query_param("entrepriseId", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "totalEmployes": 12, "masseSalarialeTotale": "4500000" }
        })))
        .mount(&server)
        .await;

    let kpis = client.kpis(Some(&EntityId::Number(42))).await.unwrap();
    assert_eq!(kpis.total_employes, 12);
    assert!((kpis.masse_salariale_totale - 4_500_000.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_chart_labels_and_data_are_normalized() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/charts/payments-by-month"))
        .and(query_param("dateDebut", "2024-01-01"))
        .and(query_param("dateFin", "2024-06-30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "labels": ["Jan", "Feb"], "data": [100, 200] }
        })))
        .mount(&server)
        .await;

    let query = ChartQuery {
        from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        tenant: None,
    };
    let points = client.chart(ChartKey::PaymentsByMonth, &query).await.unwrap();

    assert_eq!(
        points,
        vec![ChartPoint::new("Jan", 100.0), ChartPoint::new("Feb", 200.0)]
    );
}

#[tokio::test]
async fn test_bare_labels_and_data_body_is_not_unwrapped() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/charts/payments-by-month"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "labels": ["Jan", "Feb"], "data": [100, 200]
        })))
        .mount(&server)
        .await;

    let query = ChartQuery {
        from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        tenant: None,
    };
    let points = client.chart(ChartKey::PaymentsByMonth, &query).await.unwrap();

    assert_eq!(
        points,
        vec![ChartPoint::new("Jan", 100.0), ChartPoint::new("Feb", 200.0)]
    );
}

#[tokio::test]
async fn test_enveloped_item_array_chart_is_unwrapped() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/charts/payments-by-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "name": "WAVE", "value": 3 }, { "label": "ESPECES", "count": "2" }]
        })))
        .mount(&server)
        .await;

    let query = ChartQuery {
        from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        tenant: None,
    };
    let points = client.chart(ChartKey::PaymentsByType, &query).await.unwrap();

    assert_eq!(
        points,
        vec![ChartPoint::new("WAVE", 3.0), ChartPoint::new("ESPECES", 2.0)]
    );
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_company_sends_multipart_logo() {
    let (server, client) = authed().await;

    Mock::given(method("POST"))
        .and(path("/entreprises"))
        .and(body_string_contains("name=\"logo\"; filename=\"logo.png\""))
        .and(body_string_contains("Acme SARL"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": { "id": 5, "nom": "Acme SARL", "devise": "XOF", "logo": "/uploads/logo.png" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CompanyPayload {
        nom: "Acme SARL".into(),
        devise: "XOF".into(),
        nombre_admins: Some(2),
        logo: Some(LogoUpload {
            file_name: "logo.png".into(),
            content_type: "image/png".into(),
            bytes: Bytes::from_static(b"\x89PNG"),
        }),
        ..CompanyPayload::default()
    };
    let company = client.create_company(&payload).await.unwrap();

    assert_eq!(company.id, EntityId::Number(5));
    assert_eq!(company.logo.as_deref(), Some("/uploads/logo.png"));
}

#[tokio::test]
async fn test_approve_closed_pay_run_is_rejected() {
    let (server, client) = authed().await;

    Mock::given(method("PATCH"))
        .and(path("/payruns/9/approve"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "message": "Seul un PayRun brouillon peut être approuvé" })),
        )
        .mount(&server)
        .await;

    let err = client.approve_pay_run(&EntityId::Number(9)).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert!(err.to_string().contains("brouillon"));
}

#[tokio::test]
async fn test_update_pay_run_with_empty_response() {
    let (server, client) = authed().await;

    Mock::given(method("PUT"))
        .and(path("/payruns/3"))
        .and(body_json(json!({
            "type": "MENSUELLE",
            "dateDebut": "2024-03-01",
            "dateFin": "2024-03-31"
        })))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let payload = PayRunPayload {
        period_type: "MENSUELLE".into(),
        date_debut: "2024-03-01".into(),
        date_fin: "2024-03-31".into(),
        entreprise_id: None,
    };
    let record = client
        .update_pay_run(&EntityId::Number(3), &payload)
        .await
        .unwrap();
    assert_eq!(record.statut, "");
}

#[tokio::test]
async fn test_payment_pdf_returns_raw_bytes() {
    let (server, client) = authed().await;

    Mock::given(method("GET"))
        .and(path("/paiements/11/generate-pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4 receipt".to_vec()),
        )
        .mount(&server)
        .await;

    let bytes = client.payment_pdf(&EntityId::Number(11)).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
