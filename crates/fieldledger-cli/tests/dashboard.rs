//! Integration tests for `fieldledger dashboard`.


use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{dashboard_body, mount_authed_get, seed_session};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_home() -> TempDir {
    TempDir::new().expect("create temp home")
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Test: the snapshot renders every section and the collection rate is
/// derived from outstanding vs collected debt.
#[tokio::test]
async fn test_dashboard_renders_sections() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;
    mount_authed_get(&mock_server, "/employees/dashboard", dashboard_body()).await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Quick stats"))
        .stdout(predicate::str::contains("Collection rate:   60.0%"))
        .stdout(predicate::str::contains("Daily totals (2026-03-09)"))
        .stdout(predicate::str::contains("Agents reporting: 9"))
        .stdout(predicate::str::contains(
            "Combined closing balance: UGX 2,400,000",
        ))
        .stdout(predicate::str::contains("High severity: 1"));
}

/// Test: a sparse snapshot body falls back to zeroed sections instead of
/// failing to decode.
#[tokio::test]
async fn test_dashboard_sparse_body_defaults_to_zero() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;
    mount_authed_get(&mock_server, "/employees/dashboard", json!({ "data": {} })).await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Collection rate:   0.0%"))
        .stdout(predicate::str::contains("Outstanding debt:  UGX 0"))
        .stdout(predicate::str::contains("Total:        0"));
}

/// Test: the configured currency code flows through to rendered amounts.
#[tokio::test]
async fn test_dashboard_uses_configured_currency() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    std::fs::write(home.path().join("config.toml"), "currency = \"KES\"\n").unwrap();
    let mock_server = MockServer::start().await;
    mount_authed_get(&mock_server, "/employees/dashboard", dashboard_body()).await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("Outstanding debt:  KES 400,000"))
        .stdout(predicate::str::contains("UGX").not());
}

#[tokio::test]
async fn test_dashboard_scoped_to_employee() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees/dashboard"))
        .and(query_param("employee_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dashboard_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["dashboard", "--employee", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dashboard (employee 7)"));
}

#[tokio::test]
async fn test_dashboard_daily_sends_date_param() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees/dashboard/daily"))
        .and(query_param("date", "2026-03-09"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "date": "2026-03-09",
                "total_opening": 1_000_000,
                "total_closing": 1_250_000,
                "transactions_recorded": 14,
                "agents_reporting": 9
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["dashboard", "--daily", "--date", "2026-03-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Daily totals (2026-03-09)"))
        .stdout(predicate::str::contains("Closing total:    UGX 1,250,000"));
}

#[test]
fn test_dashboard_daily_rejects_malformed_date() {
    let home = temp_home();
    seed_session(home.path());

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .args(["dashboard", "--daily", "--date", "tomorrow"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date 'tomorrow'"));
}
