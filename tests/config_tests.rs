use crystal_grimoire::{Error, config};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_load_full_config_file() {
    let file = write_config(
        r#"
gemini:
  api_key: "file-key"
  model: "gemini-1.5-pro"
  timeout_secs: 30
  persona_prompt: "You are a calm mineralogist."
server:
  host: "127.0.0.1"
  port: 8080
  environment: "production"
  debug: true
  allowed_origins:
    - "https://grimoire.example"
  rate_limit:
    requests: 10
    window_secs: 30
  logs:
    level: "debug"
identity:
  service_account: "/etc/identity/account.json"
"#,
    );

    let config = config::load_from_path(file.path().to_str().unwrap())
        .await
        .unwrap();

    assert_eq!(config.gemini.api_key, "file-key");
    assert_eq!(config.gemini.model, "gemini-1.5-pro");
    assert_eq!(config.gemini.timeout_secs, 30);
    assert_eq!(config.gemini.max_attempts, 3);
    assert_eq!(
        config.gemini.persona_prompt.as_deref(),
        Some("You are a calm mineralogist.")
    );
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8080);
    assert!(config.server.debug);
    assert!(!config.is_development());
    assert_eq!(
        config.server.allowed_origins,
        vec!["https://grimoire.example".to_string()]
    );
    assert_eq!(config.server.rate_limit.requests, 10);
    assert_eq!(config.server.logs.level, "debug");
    assert_eq!(
        config.identity.service_account.as_deref(),
        Some("/etc/identity/account.json")
    );
    assert!(config::validate(&config).is_ok());
}

#[tokio::test]
async fn test_partial_config_uses_defaults() {
    let file = write_config("server:\n  port: 9001\n");

    let config = config::load_from_path(file.path().to_str().unwrap())
        .await
        .unwrap();

    assert_eq!(config.server.port, 9001);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.environment, "development");
    assert_eq!(
        config.gemini.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert!(config::validate(&config).is_ok());
}

#[tokio::test]
async fn test_env_overrides_win_over_file() {
    let file = write_config("gemini:\n  api_key: \"file-key\"\nserver:\n  port: 8080\n");
    let mut config = config::load_from_path(file.path().to_str().unwrap())
        .await
        .unwrap();

    config::apply_env_overrides(&mut config, |key| match key {
        "GEMINI_API_KEY" => Some("env-key".to_string()),
        "PORT" => Some("8443".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.gemini.api_key, "env-key");
    assert_eq!(config.server.port, 8443);
}

#[tokio::test]
async fn test_malformed_yaml_is_rejected() {
    let file = write_config("server: [unterminated");

    let result = config::load_from_path(file.path().to_str().unwrap()).await;

    assert!(matches!(result, Err(Error::Yaml(_))));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");

    let result = config::load_from_path(missing.to_str().unwrap()).await;

    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_production_requires_api_key() {
    let mut config = config::Config::default();
    config.server.environment = "production".to_string();

    assert!(matches!(config::validate(&config), Err(Error::Config(_))));
}
