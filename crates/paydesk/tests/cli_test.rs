//! Integration tests for the `paydesk` CLI binary.
//!
//! Argument parsing, help output and error exit codes run without a
//! server; the session tests point the binary at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `paydesk` binary with env isolation.
///
/// Clears all `PAYDESK_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn paydesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("paydesk");
    cmd.env("HOME", "/tmp/paydesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/paydesk-cli-test-nonexistent")
        .env_remove("PAYDESK_PROFILE")
        .env_remove("PAYDESK_API_URL")
        .env_remove("PAYDESK_EMAIL")
        .env_remove("PAYDESK_PASSWORD")
        .env_remove("PAYDESK_OUTPUT")
        .env_remove("PAYDESK_INSECURE")
        .env_remove("PAYDESK_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn token(role: &str, tenant: Option<i64>) -> String {
    let mut claims = json!({ "userId": 7, "role": role, "exp": Utc::now().timestamp() + 3600 });
    if let Some(tenant) = tenant {
        claims["entrepriseId"] = json!(tenant);
    }
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"s3cret")).unwrap()
}

fn ok(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": body }))
}

async fn server_for(role: &str, tenant: Option<i64>) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ok(json!({ "accessToken": token(role, tenant) })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    server
}

fn session_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = paydesk_cmd();
    cmd.args(["--api-url", &server.uri(), "--email", "caisse@acme.sn"])
        .env("PAYDESK_PASSWORD", "secret1");
    cmd
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = paydesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    paydesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("dashboard")
            .and(predicate::str::contains("payrun"))
            .and(predicate::str::contains("employee"))
            .and(predicate::str::contains("payment")),
    );
}

#[test]
fn test_version_flag() {
    paydesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("paydesk"));
}

#[test]
fn test_invalid_output_format_is_usage_error() {
    paydesk_cmd()
        .args(["--output", "yaml", "login"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_chart_is_usage_error() {
    paydesk_cmd()
        .args(["charts", "headcount"])
        .assert()
        .code(2);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_points_at_toml() {
    paydesk_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_missing_config_is_reported() {
    let output = paydesk_cmd().arg("dashboard").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("Configuration file not found"), "{text}");
}

#[test]
fn test_missing_email_is_auth_error() {
    let output = paydesk_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "login"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("No credentials"));
}

#[test]
fn test_invalid_email_fails_before_network() {
    let output = paydesk_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "--email", "nope", "login"])
        .env("PAYDESK_PASSWORD", "secret1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("email"));
}

#[test]
fn test_unreachable_server_is_connection_error() {
    let output = paydesk_cmd()
        .args(["--api-url", "http://127.0.0.1:9", "--email", "admin@acme.sn", "login"])
        .env("PAYDESK_PASSWORD", "secret1")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

// ── Sessions against a mock server ──────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_login_prints_identity_as_json() {
    let server = server_for("ADMIN", Some(42)).await;

    let output = session_cmd(&server)
        .args(["--output", "json", "login"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let identity: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(identity["role"], "ADMIN");
    assert_eq!(identity["tenant_id"], 42);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cashier_dashboard_json() {
    let server = server_for("CAISSIER", Some(42)).await;
    Mock::given(method("GET"))
        .and(path("/dashboard/kpis"))
        .respond_with(ok(json!({ "totalEmployes": 12 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/dashboard/charts/[a-z-]+$"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/paiements"))
        .respond_with(ok(json!([{ "id": 11, "montant": 150000, "type": "WAVE" }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/employes"))
        .respond_with(ok(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let output = session_cmd(&server)
        .args(["--output", "json", "dashboard"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let view: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["kpis"]["total_employees"], 12);
    assert_eq!(view["payments"][0]["method"], "WAVE");
    assert_eq!(view["report"]["failed"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_approval_exits_nonzero() {
    let server = server_for("ADMIN", Some(42)).await;
    Mock::given(method("PATCH"))
        .and(path("/payruns/9/approve"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "message": "Pay run déjà clôturé" })),
        )
        .mount(&server)
        .await;

    let output = session_cmd(&server)
        .args(["payrun", "approve", "9"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("Pay run déjà clôturé"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_receipt_is_written_to_file() {
    let server = server_for("CAISSIER", Some(42)).await;
    Mock::given(method("GET"))
        .and(path("/paiements/11/generate-pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/pdf")
                .set_body_bytes(b"%PDF-1.4 receipt".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("receipt.pdf");

    session_cmd(&server)
        .args(["payment", "receipt", "11", "--out"])
        .arg(&out)
        .assert()
        .success();

    assert_eq!(std::fs::read(&out).unwrap(), b"%PDF-1.4 receipt");
}
