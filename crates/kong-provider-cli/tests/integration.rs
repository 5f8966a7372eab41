//! Integration tests for the Kong provider CLI

use clap::Parser;
use kong_provider_cli::{execute, CliError, ExitCode, ProviderCli};
use std::io::Write;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn cli(args: &[&str]) -> ProviderCli {
    let mut argv = vec!["kong-provider"];
    argv.extend_from_slice(args);
    ProviderCli::parse_from(argv)
}

fn json(text: &str) -> serde_json::Value {
    serde_json::from_str(text).unwrap()
}

#[tokio::test]
async fn test_resolve_defaults_without_environment() {
    let (text, code) = execute(cli(&["resolve", "--ignore-env", "--format", "json"]))
        .await
        .unwrap();
    assert_eq!(code, ExitCode::Success);

    let value = json(&text);
    let settings = value["settings"].as_array().unwrap();
    assert_eq!(settings[0]["name"], "kong_admin_uri");
    assert_eq!(settings[0]["value"], "http://localhost:8001");
    assert_eq!(settings[0]["source"], "default");
    assert_eq!(settings[3]["value"], false);
}

#[tokio::test]
async fn test_resolve_from_env_file_masks_secrets() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "KONG_ADMIN_ADDR=https://kong.internal:8444").unwrap();
    writeln!(file, "TLS_SKIP_VERIFY=true").unwrap();
    writeln!(file, "KONG_ADMIN_PASSWORD=hunter2").unwrap();

    let env_file = file.path().to_str().unwrap().to_string();
    let (text, _) = execute(cli(&[
        "resolve",
        "--ignore-env",
        "--env-file",
        &env_file,
        "--format",
        "json",
    ]))
    .await
    .unwrap();

    assert!(!text.contains("hunter2"));
    let value = json(&text);
    assert_eq!(value["settings"][0]["value"], "https://kong.internal:8444");
    assert_eq!(value["settings"][0]["source"], "env");
    assert_eq!(value["settings"][3]["value"], true);
}

#[tokio::test]
async fn test_invalid_boolean_is_user_error() {
    let err = execute(cli(&["resolve", "--ignore-env", "--set", "tls_skip_verify=maybe"]))
        .await
        .unwrap_err();
    assert_eq!(err.exit_code(), ExitCode::InvalidInput);
}

#[tokio::test]
async fn test_unknown_setting_is_user_error() {
    let err = execute(cli(&["resolve", "--ignore-env", "--set", "kong_admin_token=x"]))
        .await
        .unwrap_err();
    assert!(matches!(err, CliError::Provider(_)));
    assert_eq!(err.exit_code(), ExitCode::InvalidInput);
}

#[tokio::test]
async fn test_registry_lists_everything() {
    let (text, code) = execute(cli(&["registry", "--format", "json"])).await.unwrap();
    assert_eq!(code, ExitCode::Success);
    assert_eq!(json(&text)["entries"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_schema_yaml() {
    let (text, _) = execute(cli(&["schema", "--format", "yaml"])).await.unwrap();
    assert!(text.contains("KONG_ADMIN_ADDR"));
    assert!(text.contains("TLS_SKIP_VERIFY"));
}

#[tokio::test]
async fn test_check_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .and(header("apikey", "k"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "database": { "reachable": true },
            "server": { "total_requests": 1, "connections_active": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let uri = format!("kong_admin_uri={}", server.uri());
    let (text, code) = execute(cli(&[
        "check",
        "--ignore-env",
        "--set",
        &uri,
        "--set",
        "kong_api_key=k",
        "--format",
        "json",
    ]))
    .await
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let value = json(&text);
    assert_eq!(value["reachable"], true);
    assert_eq!(value["status"]["database"]["reachable"], true);
}

#[tokio::test]
async fn test_check_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let uri = format!("kong_admin_uri={}", server.uri());
    let (text, code) = execute(cli(&["check", "--ignore-env", "--set", &uri, "--format", "json"]))
        .await
        .unwrap();

    assert_eq!(code, ExitCode::ConnectionError);
    let value = json(&text);
    assert_eq!(value["reachable"], false);
    assert!(value["error"].as_str().unwrap().contains("403"));
}

#[tokio::test]
async fn test_explicit_boolean_literal_for_string_setting() {
    let (text, code) = execute(cli(&[
        "resolve",
        "--ignore-env",
        "--set",
        "kong_admin_password=true",
        "--set",
        "kong_api_key=false",
        "--set",
        "tls_skip_verify=true",
        "--format",
        "json",
    ]))
    .await
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let value = json(&text);
    assert_eq!(value["settings"][2]["name"], "kong_admin_password");
    assert_eq!(value["settings"][2]["value"], "<redacted>");
    assert_eq!(value["settings"][2]["source"], "override");
    assert_eq!(value["settings"][3]["value"], true);
}

#[tokio::test]
async fn test_check_against_non_kong_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy login</html>"))
        .mount(&server)
        .await;

    let uri = format!("kong_admin_uri={}", server.uri());
    let (text, code) = execute(cli(&["check", "--ignore-env", "--set", &uri, "--format", "json"]))
        .await
        .unwrap();

    assert_eq!(code, ExitCode::ConnectionError);
    let value = json(&text);
    assert_eq!(value["reachable"], false);
    assert!(value["error"].as_str().unwrap().starts_with("Decode error"));
}

#[test]
fn test_binary_exit_codes() {
    let bin = env!("CARGO_BIN_EXE_kong-provider");

    let output = std::process::Command::new(bin)
        .args(["registry", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(json(&String::from_utf8_lossy(&output.stdout))["entries"].as_array().unwrap().len(), 12);

    let output = std::process::Command::new(bin)
        .args(["resolve", "--ignore-env", "--set", "tls_skip_verify=maybe"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}
