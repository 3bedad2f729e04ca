#![allow(deprecated)]
use assert_cmd::Command;
use mockito::{Matcher, Mock, ServerGuard};
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

/// A `gantt` command isolated from the caller's environment.
fn gantt() -> Command {
    let mut cmd = Command::cargo_bin("gantt").unwrap();
    for var in [
        "AIRTABLE_TOKEN",
        "AIRTABLE_BASE_ID",
        "AIRTABLE_API_URL",
        "GANTT_FIELD_MAP",
        "GANTT_DIRECTOR_VIEW",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn against(server: &ServerGuard) -> Command {
    let mut cmd = gantt();
    cmd.arg("--api-url")
        .arg(server.url())
        .args(["--token", "pat-test", "--base-id", "appTest"]);
    cmd
}

fn table(server: &mut ServerGuard, name: &str, records: Value) -> Mock {
    server
        .mock("GET", format!("/v0/appTest/{name}").as_str())
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "records": records }).to_string())
        .create()
}

fn missing(server: &mut ServerGuard, name: &str) -> Mock {
    server
        .mock("GET", format!("/v0/appTest/{name}").as_str())
        .match_query(Matcher::Any)
        .with_status(404)
        .create()
}

fn base(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        table(
            server,
            "Milestones",
            json!([
                { "id": "m1", "fields": { "Name": "Kickoff", "Deadline": "2025-01-15", "Priority": "Governance" } },
                { "id": "m2", "fields": { "Name": "Review", "Deadline": "2025-06-01", "Priority": "Grant making" } }
            ]),
        ),
        table(
            server,
            "Actions",
            json!([
                {
                    "id": "a1",
                    "fields": {
                        "Name": "Draft plan",
                        "Responsible": ["rec123"],
                        "Current Status (TPW Role)": "Current",
                        "Director View": true,
                        "Notes": "Budget agreed"
                    }
                },
                { "id": "a2", "fields": { "Name": "Hidden", "Current Status (TPW Role)": "Current" } }
            ]),
        ),
        table(
            server,
            "People",
            json!([{ "id": "rec123", "fields": { "Name": "Jane Doe" } }]),
        ),
        missing(server, "Config"),
        missing(server, "Priorities"),
        missing(server, "Notes"),
    ]
}

// ---------------------------------------------------------------------------
// gantt fields
// ---------------------------------------------------------------------------

#[test]
fn fields_json_needs_no_network() {
    gantt()
        .args(["fields", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""milestone_name_field": "Name""#))
        .stdout(predicate::str::contains(r#""people_table": "People""#));
}

#[test]
fn fields_reads_field_map_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fields.yaml");
    std::fs::write(&path, "action_deadline_field: Due date\n").unwrap();

    gantt()
        .args(["fields", "--field-map"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Due date"))
        .stdout(predicate::str::contains("file"));
}

#[test]
fn unknown_director_view_rule_is_rejected() {
    gantt()
        .args(["--director-view", "maybe", "fields"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown director view rule"));
}

// ---------------------------------------------------------------------------
// store-backed commands
// ---------------------------------------------------------------------------

#[test]
fn dashboard_without_credentials_fails() {
    gantt()
        .arg("dashboard")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing record store credentials: token, base id"));
}

#[test]
fn gantt_json_lays_out_timeline() {
    let mut server = mockito::Server::new();
    let _mocks = base(&mut server);

    let output = against(&server)
        .args(["gantt", "--json", "--sort-deadline", "--today", "2025-01-01"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let view: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["bounds"]["min_date"], "2024-10-01");
    assert_eq!(view["bounds"]["max_date"], "2025-06-30");
    assert_eq!(view["total"], 2);
    assert_eq!(view["groups"][0]["key"], "Governance");
    assert_eq!(view["groups"][1]["key"], "Grant making");
}

#[test]
fn gantt_filter_prints_table() {
    let mut server = mockito::Server::new();
    let _mocks = base(&mut server);

    against(&server)
        .args(["gantt", "--priority", "Grant making"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 of 2 milestones"))
        .stdout(predicate::str::contains("Review"))
        .stdout(predicate::str::contains("Kickoff").not());
}

#[test]
fn repeated_filter_flags_keep_whole_values() {
    let mut server = mockito::Server::new();
    let _mocks = base(&mut server);

    against(&server)
        .args(["gantt", "--priority", "Governance", "--priority", "Grant making"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 of 2 milestones"));

    against(&server)
        .args(["gantt", "--priority", "Governance, Grant making"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 of 2 milestones"));
}

#[test]
fn actions_lists_director_view_only() {
    let mut server = mockito::Server::new();
    let _mocks = base(&mut server);

    against(&server)
        .arg("actions")
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft plan"))
        .stdout(predicate::str::contains("Jane Doe"))
        .stdout(predicate::str::contains("Budget agreed"))
        .stdout(predicate::str::contains("Hidden").not());
}

#[test]
fn dashboard_summary_counts_tables() {
    let mut server = mockito::Server::new();
    let _mocks = base(&mut server);

    against(&server)
        .args(["dashboard", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""all_actions_count": 2"#));
}
