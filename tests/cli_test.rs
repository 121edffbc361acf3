#[path = "common/mod.rs"]
mod common;

use common::{HelpdeskTest, MockHost, http_response};
use serial_test::serial;

#[test]
#[serial]
fn test_config_set_and_show() {
    let helpdesk = HelpdeskTest::new();

    helpdesk.run_success(&["config", "set", "url", "https://support.example.com/wp-json/"]);
    helpdesk.run_success(&["config", "set", "timeout_secs", "20"]);

    let config = helpdesk.read_config();
    assert!(config.contains("url: https://support.example.com/wp-json/"));
    assert!(config.contains("timeout_secs: 20"));

    let stdout = helpdesk.run_success(&["config", "show", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["url"], "https://support.example.com/wp-json/");
    assert_eq!(json["timeout_secs"], 20);
    assert_eq!(json["auth"]["mode"], "anonymous");
}

#[test]
#[serial]
fn test_config_secrets_are_masked() {
    let helpdesk = HelpdeskTest::new();

    let stdout = helpdesk.run_success(&["config", "set", "auth.nonce", "a1b2c3d4e5"]);
    assert!(stdout.contains("a1...e5"));
    assert!(!stdout.contains("a1b2c3d4e5"));

    let stdout = helpdesk.run_success(&["config", "get", "auth.nonce", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["value"], "a1...e5");
    assert_eq!(json["masked"], true);

    let stdout = helpdesk.run_success(&["config", "show"]);
    assert!(!stdout.contains("a1b2c3d4e5"));
    assert!(stdout.contains("nonce"));
}

#[test]
#[serial]
fn test_config_app_password_wins_over_nonce() {
    let helpdesk = HelpdeskTest::new();
    helpdesk.write_config(
        "url: https://support.example.com/wp-json/\nauth:\n  nonce: abcdef\n  username: agent\n  app_password: wxyz 1234\n",
    );

    let stdout = helpdesk.run_success(&["config", "show", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["auth"]["mode"], "application_password");
    assert_eq!(json["auth"]["username"], "agent");
}

#[test]
#[serial]
fn test_config_env_override() {
    let helpdesk = HelpdeskTest::new();
    helpdesk.write_config("url: https://file.example.com/wp-json/\n");

    let output = helpdesk.run_with_env(
        &["config", "get", "url"],
        &[("HELPDESK_URL", "https://env.example.com/wp-json/")],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("https://env.example.com/wp-json/"));
}

#[test]
#[serial]
fn test_config_unknown_key() {
    let helpdesk = HelpdeskTest::new();
    let stderr = helpdesk.run_failure(&["config", "set", "github.token", "x"]);
    assert!(stderr.contains("unknown config key"));
}

#[test]
#[serial]
fn test_config_get_unset_key() {
    let helpdesk = HelpdeskTest::new();
    let stderr = helpdesk.run_failure(&["config", "get", "auth.username"]);
    assert!(stderr.contains("auth.username not set"));
}

#[test]
#[serial]
fn test_ls_requires_url() {
    let helpdesk = HelpdeskTest::new();
    let stderr = helpdesk.run_failure(&["ls"]);
    assert!(stderr.contains("not configured"));
}

#[test]
#[serial]
fn test_ls_rejects_page_zero() {
    let helpdesk = HelpdeskTest::new();
    let stderr = helpdesk.run_failure(&["ls", "--page", "0"]);
    assert!(stderr.contains("--page"));
}

#[test]
#[serial]
fn test_update_requires_a_property() {
    let helpdesk = HelpdeskTest::new();
    helpdesk.write_config("url: https://support.example.com/wp-json/\n");
    let stderr = helpdesk.run_failure(&["update", "42"]);
    assert!(stderr.contains("nothing to update"));
}

#[test]
#[serial]
fn test_delete_requires_force_when_not_interactive() {
    let helpdesk = HelpdeskTest::new();
    helpdesk.write_config("url: https://support.example.com/wp-json/\n");

    let stderr = helpdesk.run_failure(&["delete", "42"]);
    assert!(stderr.contains("--force"));

    let stderr = helpdesk.run_failure(&["delete", "42", "--json"]);
    assert!(stderr.contains("--force"));
}

const TICKETS_BODY: &str =
    r#"[{"id":31,"title":{"rendered":"Printer on fire"},"status":"open","category":"hardware","type":"incident","user":"sam"}]"#;

#[test]
#[serial]
fn test_ls_page_issues_single_request() {
    let helpdesk = HelpdeskTest::new();
    let host = MockHost::start(vec![http_response(
        "200 OK",
        &[("x-wp-totalpages", "4"), ("x-wp-total", "37")],
        TICKETS_BODY,
    )]);
    helpdesk.write_config(&format!("url: {}\n", host.url));

    let stdout = helpdesk.run_success(&["ls", "--page", "3", "--status", "open", "--json"]);
    let requests = host.finish();

    assert_eq!(requests.len(), 1);
    assert!(
        requests[0].starts_with("GET /wp-json/wp/v2/ticket/?page=3&ticket_status=open "),
        "unexpected request: {}",
        requests[0]
    );

    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["page"], 3);
    assert_eq!(json["total_pages"], 4);
    assert_eq!(json["total_items"], 37);
    assert_eq!(json["items"][0]["title"], "Printer on fire");
}

#[test]
#[serial]
fn test_update_sends_mutation_before_any_read() {
    let helpdesk = HelpdeskTest::new();
    let host = MockHost::start(vec![
        http_response("200 OK", &[], "{}"),
        http_response("200 OK", &[("x-wp-totalpages", "3")], TICKETS_BODY),
    ]);
    helpdesk.write_config(&format!(
        "url: {}\nauth:\n  nonce: n0nce-value\n",
        host.url
    ));

    helpdesk.run_success(&["update", "31", "--status", "closed", "--page", "2", "--json"]);
    let requests = host.finish();

    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("PUT /wp-json/helpdesk/v1/tickets "));
    assert!(requests[0].to_lowercase().contains("x-wp-nonce: n0nce-value"));
    assert!(requests[0].contains(r#"{"ticket":31,"properties":{"status":"closed"}}"#));
    assert!(requests[1].starts_with("GET /wp-json/wp/v2/ticket/?page=2 "));
}

#[test]
#[serial]
fn test_update_rejected_does_not_read() {
    let helpdesk = HelpdeskTest::new();
    let host = MockHost::start(vec![http_response(
        "403 Forbidden",
        &[],
        r#"{"code":"rest_forbidden","message":"Sorry, you are not allowed to do that."}"#,
    )]);
    helpdesk.write_config(&format!("url: {}\n", host.url));

    let output = helpdesk.run(&["update", "31", "--status", "closed", "--page", "2"]);
    let requests = host.finish();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Couldn't update the ticket."));
    assert!(stderr.contains("not authorized"));
    assert_eq!(requests.len(), 1);
}

#[test]
#[serial]
fn test_config_set_rejects_non_http_url() {
    let helpdesk = HelpdeskTest::new();
    let stderr = helpdesk.run_failure(&["config", "set", "url", "ftp://support.example.com/"]);
    assert!(stderr.contains("unsupported URL scheme"));
    assert!(!helpdesk.temp_dir.path().join(".helpdesk").exists());
}
