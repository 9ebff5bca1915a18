//! CLI integration tests

use advisor_lib::{recommend, Advice, SizingInput, WorkloadRole};
use std::path::Path;
use std::process::{Command, Output};

/// Run the binary with an isolated home directory and no service URL
fn pgadvisor(home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pgadvisor"))
        .args(args)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("PGADVISOR_API_URL")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let home = tempfile::tempdir().unwrap();
    let output = pgadvisor(home.path(), &["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("PostgreSQL Parameter Advisor"),
        "Should show app name"
    );
    assert!(stdout.contains("recommend"), "Should show recommend command");
    assert!(stdout.contains("catalog"), "Should show catalog command");
    assert!(stdout.contains("export"), "Should show export command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let home = tempfile::tempdir().unwrap();
    let output = pgadvisor(home.path(), &["--version"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("pgadvisor"), "Should show binary name");
}

/// Test recommend subcommand help
#[test]
fn test_recommend_help() {
    let home = tempfile::tempdir().unwrap();
    let output = pgadvisor(home.path(), &["recommend", "--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Recommend help should succeed");
    assert!(stdout.contains("--cpus"), "Should show cpus option");
    assert!(stdout.contains("--memory"), "Should show memory option");
    assert!(stdout.contains("--role"), "Should show role option");
    assert!(stdout.contains("--ticket"), "Should show ticket option");
}

#[test]
fn test_recommend_json_is_audited_locally() {
    let home = tempfile::tempdir().unwrap();
    let audit_log = home.path().join("audit.jsonl");

    let output = pgadvisor(
        home.path(),
        &[
            "--format",
            "json",
            "recommend",
            "--cpus",
            "32",
            "--memory",
            "128",
            "--role",
            "OLAP",
            "--ticket",
            "CHG-1042",
            "--audit-log",
            audit_log.to_str().unwrap(),
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let advice: Advice = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        advice.recommendation.conservative.value("shared_buffers"),
        Some("32768MB")
    );
    assert!(advice.warnings.is_empty());

    let log = std::fs::read_to_string(&audit_log).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("CHG-1042"));
}

#[test]
fn test_recommend_table_shows_banner() {
    let home = tempfile::tempdir().unwrap();
    let audit_log = home.path().join("audit.jsonl");

    let output = pgadvisor(
        home.path(),
        &[
            "recommend",
            "--cpus",
            "8",
            "--memory",
            "32",
            "--role",
            "oltp",
            "--audit-log",
            audit_log.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("under testing"));
    assert!(stdout.contains("shared_buffers"));
    assert!(stdout.contains("Aggressive"));
}

#[test]
fn test_small_olap_is_rejected_with_guidance() {
    let home = tempfile::tempdir().unwrap();
    let audit_log = home.path().join("audit.jsonl");

    let output = pgadvisor(
        home.path(),
        &[
            "recommend",
            "--cpus",
            "4",
            "--memory",
            "16",
            "--role",
            "OLAP",
            "--audit-log",
            audit_log.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Select a higher CPU value"), "stderr: {}", stderr);
    assert!(!audit_log.exists());
}

#[test]
fn test_invalid_email_is_rejected() {
    let home = tempfile::tempdir().unwrap();

    let output = pgadvisor(
        home.path(),
        &[
            "recommend",
            "--cpus",
            "8",
            "--memory",
            "32",
            "--role",
            "RAG",
            "--email",
            "not-an-address",
        ],
    );

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid email"));
}

#[test]
fn test_catalog_csv_for_olap() {
    let home = tempfile::tempdir().unwrap();

    let output = pgadvisor(home.path(), &["--format", "csv", "catalog", "--role", "OLAP"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("resource,value\ncpu_count,8\n"));
    assert!(!stdout.contains("memory_gb,2\n"));
}

#[test]
fn test_export_writes_file() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("out").join("recommendations.csv");

    let output = pgadvisor(
        home.path(),
        &[
            "export",
            "--cpus",
            "32",
            "--memory",
            "128",
            "--role",
            "OLAP",
            "--profile",
            "aggressive",
            "--output",
            path.to_str().unwrap(),
        ],
    );

    assert!(output.status.success());
    let csv = std::fs::read_to_string(&path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Parameter,Aggressive Profile,Apply Type"));
    assert_eq!(lines.next(), Some("shared_buffers,52428MB,static"));
}

#[test]
fn test_export_is_audited_locally() {
    let home = tempfile::tempdir().unwrap();
    let audit_log = home.path().join("audit.jsonl");

    let output = pgadvisor(
        home.path(),
        &[
            "export",
            "--cpus",
            "16",
            "--memory",
            "64",
            "--role",
            "Mixed",
            "--ticket",
            "CHG-2210",
            "--audit-log",
            audit_log.to_str().unwrap(),
        ],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Parameter,"));

    let log = std::fs::read_to_string(&audit_log).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("CHG-2210"));
}

#[test]
fn test_remote_export_forwards_requester_and_warning() {
    let home = tempfile::tempdir().unwrap();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/v1/recommendations/export")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("cpu_count".into(), "8".into()),
            mockito::Matcher::UrlEncoded("role".into(), "OLTP".into()),
            mockito::Matcher::UrlEncoded("ticket_id".into(), "INC 77".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/csv; charset=utf-8")
        .with_header(
            "x-audit-warning",
            "audit entry not recorded by blob:audit: upload returned 503",
        )
        .with_body("Parameter,Balanced Profile,Apply Type\nshared_buffers,8192MB,static\n")
        .create();

    let output = pgadvisor(
        home.path(),
        &[
            "--api-url",
            &server.url(),
            "export",
            "--cpus",
            "8",
            "--memory",
            "32",
            "--role",
            "OLTP",
            "--ticket",
            "INC 77",
        ],
    );

    mock.assert();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Parameter,Balanced Profile"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("upload returned 503"), "stderr: {}", stderr);
}

#[test]
fn test_remote_mode_uses_service() {
    let home = tempfile::tempdir().unwrap();
    let sizing = SizingInput::new(16, 64).unwrap();
    let advice = Advice {
        sizing,
        role: WorkloadRole::Mixed,
        recommendation: recommend(sizing, WorkloadRole::Mixed).unwrap(),
        warnings: Vec::new(),
    };

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/recommendations")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "cpu_count": 16,
            "memory_gb": 64,
            "role": "Mixed"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(serde_json::to_string(&advice).unwrap())
        .create();

    let output = pgadvisor(
        home.path(),
        &[
            "--api-url",
            &server.url(),
            "--format",
            "json",
            "recommend",
            "--cpus",
            "16",
            "--memory",
            "64",
            "--role",
            "mixed",
        ],
    );

    mock.assert();
    assert!(output.status.success());
    let returned: Advice = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(returned, advice);
    // Remote mode never writes the local audit log
    assert!(!home.path().join(".config/pgadvisor/audit.jsonl").exists());
}

#[test]
fn test_remote_rejection_is_reported() {
    let home = tempfile::tempdir().unwrap();

    let mut server = mockito::Server::new();
    let mock = server
        .mock("GET", "/api/v1/recommendations/export")
        .match_query(mockito::Matcher::Any)
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"error":"Invalid combination: OLAP requires more than 4 CPUs","code":"invalid_combination","details":"OLAP workloads need at least 8 CPUs. Select a higher CPU value."}"#,
        )
        .create();

    let output = pgadvisor(
        home.path(),
        &[
            "--api-url",
            &server.url(),
            "export",
            "--cpus",
            "2",
            "--memory",
            "8",
            "--role",
            "OLAP",
        ],
    );

    mock.assert();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("422"));
    assert!(stderr.contains("Select a higher CPU value"));
}
