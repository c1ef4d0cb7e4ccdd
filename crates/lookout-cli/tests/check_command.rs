use assert_cmd::Command;
use predicates::prelude::*;

/// A `check` command isolated from the developer's environment, pointed at
/// a webhook that refuses connections immediately.
fn check_command() -> Command {
    let mut cmd = Command::cargo_bin("lookout").unwrap();
    cmd.env_remove("ABCDENT_USERNAME")
        .env_remove("ABCDENT_PASSWORD")
        .env_remove("LOOKOUT_ENV")
        .env_remove("CAPTURE_SCREENSHOT")
        .env_remove("LOOKOUT_KEYWORD_THRESHOLD")
        // Reserved port on loopback: the single delivery attempt fails fast.
        .env("LOOKOUT_WEBHOOK_URL", "http://127.0.0.1:9/webhook")
        .arg("check");
    cmd
}

#[test]
fn test_check_without_credentials_reports_ko_body_and_exits_zero() {
    // No credentials: the run fails before any browser action, but the
    // process still exits 0 - failure lives in the body.
    check_command()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"KO\""))
        .stdout(predicate::str::contains("credentials"))
        .stdout(predicate::str::contains("\"error_type\": \"ConfigError\""));
}

#[test]
fn test_check_reports_webhook_delivery_failure_independently() {
    check_command()
        .assert()
        .success()
        .stdout(predicate::str::contains("\"webhook_sent\": false"))
        .stdout(predicate::str::contains("\"success\": false"));
}

#[test]
fn test_check_rejects_unusable_webhook_url() {
    check_command()
        .env("LOOKOUT_WEBHOOK_URL", "not a url")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOOKOUT_WEBHOOK_URL"));
}

#[test]
fn test_check_rejects_bad_keyword_threshold() {
    check_command()
        .env("LOOKOUT_KEYWORD_THRESHOLD", "five")
        .assert()
        .failure()
        .stderr(predicate::str::contains("LOOKOUT_KEYWORD_THRESHOLD"));
}
