//! Integration tests for `fieldledger agents`.


use assert_cmd::cargo::cargo_bin_cmd;
use fixtures::{agents_body, mount_authed_get, seed_session, transactions_body};
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_home() -> TempDir {
    TempDir::new().expect("create temp home")
}

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

/// Test: the agent table shows balances derived from the newest transaction
/// per agent, not whatever the agent record itself carries.
#[tokio::test]
async fn test_agents_list_shows_derived_balances() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;
    mount_authed_get(&mock_server, "/employees/agents", agents_body()).await;
    mount_authed_get(&mock_server, "/employees/transactions", transactions_body()).await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["agents", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Amina K."))
        .stdout(predicate::str::contains("UGX 620,000"))
        .stdout(predicate::str::contains("active"))
        .stdout(predicate::str::contains("Brian O."))
        .stdout(predicate::str::contains("needs update"));
}

#[tokio::test]
async fn test_agents_list_search_filters_rows() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;
    mount_authed_get(&mock_server, "/employees/agents", agents_body()).await;
    mount_authed_get(&mock_server, "/employees/transactions", transactions_body()).await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["agents", "list", "--search", "brian"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Brian O."))
        .stdout(predicate::str::contains("Amina K.").not());
}

#[tokio::test]
async fn test_agents_list_scopes_to_employee() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees/agents"))
        .and(query_param("employee_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(agents_body()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_authed_get(&mock_server, "/employees/transactions", transactions_body()).await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["agents", "list", "--employee", "7"])
        .assert()
        .success();
}

#[tokio::test]
async fn test_agents_list_empty() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;
    mount_authed_get(&mock_server, "/employees/agents", json!({ "agents": [] })).await;
    mount_authed_get(
        &mock_server,
        "/employees/transactions",
        json!({ "transactions": [] }),
    )
    .await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["agents", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No agents found."));
}

#[tokio::test]
async fn test_agents_create_posts_payload() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/employees/agents"))
        .and(body_partial_json(json!({
            "name": "Grace N.",
            "opening_balance": 250_000
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "agent": {
                "id": 31,
                "name": "Grace N.",
                "phone": "0700123456",
                "type_of_agent": "mobile_money",
                "opening_balance": 250_000
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args([
            "agents",
            "create",
            "--name",
            "Grace N.",
            "--phone",
            "0700123456",
            "--opening-balance",
            "250000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ Registered agent Grace N. (id 31) with opening balance UGX 250,000",
        ));
}

/// Test: name validation fires before any network traffic.
#[test]
fn test_agents_create_rejects_blank_name() {
    let home = temp_home();
    seed_session(home.path());

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .args(["agents", "create", "--name", "  ", "--phone", "0700"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Agent name cannot be empty"));
}

#[tokio::test]
async fn test_agents_balance_reports_latest_transaction() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let home = temp_home();
    seed_session(home.path());
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/employees/transactions"))
        .and(query_param("agent_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(transactions_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .env("FIELDLEDGER_BACKEND_URL", mock_server.uri())
        .args(["agents", "balance", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Opening: UGX 450,000"))
        .stdout(predicate::str::contains("Closing: UGX 620,000"))
        .stdout(predicate::str::contains("Status:  active"));
}

#[test]
fn test_agents_requires_login() {
    let home = temp_home();

    cargo_bin_cmd!("fieldledger")
        .env("FIELDLEDGER_HOME", home.path())
        .args(["agents", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}
