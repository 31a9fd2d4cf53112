use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::Command;
use std::thread;
use tempfile::TempDir;

const UNREACHABLE_SOURCES: &str = r#"
[sources]
valuation_base_url = "http://127.0.0.1:9/js"
detail_base_url = "http://127.0.0.1:9"
timeout_secs = 2
"#;

const SNAPSHOT_110022: &str = r#"jsonpgz({"fundcode":"110022","name":"X","gszzl":"1.05","gsz":"2.000","dwjz":"1.980","gztime":"2024-01-01 15:00"});"#;
const DETAIL_110022: &str = include_str!("fixtures/eastmoney_110022.html");

/// Serve `requests` connections locally: `.js` paths get the snapshot,
/// anything else the detail page. Returns the base URL.
fn serve_fund_pages(requests: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind listener");
    let addr = listener.local_addr().expect("listener has no address");
    thread::spawn(move || {
        for stream in listener.incoming().take(requests) {
            let Ok(mut stream) = stream else { continue };
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]);
            let path = request.split_whitespace().nth(1).unwrap_or("");
            let body = if path.ends_with(".js") {
                SNAPSHOT_110022
            } else {
                DETAIL_110022
            };
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(body.as_bytes());
        }
    });
    format!("http://{}", addr)
}

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

fn write_config(home: &TempDir, content: &str) -> PathBuf {
    let path = home.path().join("fundwatch.toml");
    std::fs::write(&path, content).expect("failed to write config");
    path
}

/// Command isolated from the user's config dir and mail credentials
fn base_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("fundwatch"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("EMAIL_NAME")
        .env_remove("EMAIL_PASSWORD")
        .env("RUST_LOG", "warn")
        .arg("--no-color");
    cmd
}

#[test]
fn empty_registry_dry_run_succeeds() {
    let home = setup_temp_home();
    let config = write_config(&home, "funds = []\n");

    base_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 0 fund(s)"))
        .stdout(predicate::str::contains("Evaluated: 0"))
        .stdout(predicate::str::contains("No fund crossed the thresholds"))
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn empty_registry_sends_no_mail() {
    let home = setup_temp_home();
    let config = write_config(&home, "funds = []\n");

    base_cmd(&home)
        .env("EMAIL_NAME", "me@example.com")
        .env("EMAIL_PASSWORD", "token")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("no mail sent"))
        .stdout(predicate::str::contains("Mail sent").not());
}

#[test]
fn missing_credentials_fail_before_fetching() {
    let home = setup_temp_home();
    let config = write_config(&home, UNREACHABLE_SOURCES);

    base_cmd(&home)
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("EMAIL_NAME"))
        .stdout(predicate::str::contains("Checked").not());
}

#[test]
fn unreachable_provider_skips_funds_and_exits_cleanly() {
    let home = setup_temp_home();
    let content = format!(
        "{}\n[[funds]]\ncode = \"110022\"\nmemo = \"WT\"\n\n[[funds]]\ncode = \"161005\"\nmemo = \"成长投资\"\n",
        UNREACHABLE_SOURCES
    );
    let config = write_config(&home, &content);
    let output = home.path().join("report.html");

    base_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 2 fund(s)"))
        .stdout(predicate::str::contains("Skipped: 2"))
        .stdout(predicate::str::contains("110022 (WT) failed at fetch"))
        .stdout(predicate::str::contains("161005 (成长投资) failed at fetch"));

    assert!(!output.exists(), "empty report should not be written");
}

#[test]
fn invalid_thresholds_are_rejected() {
    let home = setup_temp_home();
    let config = write_config(&home, "funds = []\n[thresholds]\nrise = -1.0\n");

    base_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("thresholds.rise"));
}

#[test]
fn missing_config_file_is_reported() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("--config")
        .arg(home.path().join("absent.toml"))
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn qualifying_fund_is_previewed_and_written() {
    let home = setup_temp_home();
    let base = serve_fund_pages(2);
    let content = format!(
        "[sources]\nvaluation_base_url = \"{base}/js\"\ndetail_base_url = \"{base}\"\ntimeout_secs = 5\n\n[[funds]]\ncode = \"110022\"\nmemo = \"WT\"\n"
    );
    let config = write_config(&home, &content);
    let output = home.path().join("report.html");

    base_cmd(&home)
        .arg("--config")
        .arg(&config)
        .arg("--dry-run")
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Checked 1 fund(s)"))
        .stdout(predicate::str::contains("Evaluated: 1"))
        .stdout(predicate::str::contains("Qualifying: 1"))
        .stdout(predicate::str::contains("+1.05%"))
        .stdout(predicate::str::contains("As of: 2024-01-01 15:00"))
        .stdout(predicate::str::contains("Skipped").not());

    let html = std::fs::read_to_string(&output).expect("report should be written");
    assert!(html.contains("110022"));
    assert!(html.contains("+1.05%"));
    assert!(html.contains("+0.30%"));
    assert!(html.contains("+2.1%"));
}
