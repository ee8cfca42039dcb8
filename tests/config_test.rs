//! Integration tests for layered Settings loading.
//!
//! These tests only use explicit `--config` files in temp directories; the
//! env-var layer is covered with a variable no other test touches.

use std::fs;

use tempfile::TempDir;

use budgetctl::config::Settings;

#[test]
fn given_no_config_file_when_load_then_defaults() {
    // Act
    let settings = Settings::load(None).expect("load settings");

    // Assert
    assert_eq!(settings.root_id, 1);
    assert!(settings.server_url.starts_with("http"));
}

#[test]
fn given_config_file_when_load_then_values_override_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budgetctl.toml");
    fs::write(
        &path,
        r#"
server_url = "https://budget.example.org"
root_id = 7
username = "alice"
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.server_url, "https://budget.example.org");
    assert_eq!(settings.root_id, 7);
    assert_eq!(settings.username.as_deref(), Some("alice"));
    assert_eq!(settings.timeout_secs, Settings::default().timeout_secs);
}

#[test]
fn given_file_with_env_reference_when_load_then_url_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budgetctl.toml");
    std::env::set_var("BUDGETCTL_TEST_HOST", "budget.internal");
    fs::write(&path, "server_url = \"http://$BUDGETCTL_TEST_HOST:8080\"\n").unwrap();

    let settings = Settings::load(Some(&path)).expect("load settings");

    assert_eq!(settings.server_url, "http://budget.internal:8080");
}

#[test]
fn given_non_http_url_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budgetctl.toml");
    fs::write(&path, "server_url = \"ftp://budget\"\n").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("http"), "{err}");
}

#[test]
fn given_missing_config_file_when_load_then_error() {
    let dir = TempDir::new().unwrap();

    assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[test]
fn given_malformed_toml_when_load_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "root_id = [").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("broken.toml"), "{err}");
}

#[test]
fn given_server_flag_when_overriding_then_wins_and_is_validated() {
    let settings = Settings::default()
        .with_server(Some("https://other.example.org"))
        .expect("valid url");
    assert_eq!(settings.server_url, "https://other.example.org");

    assert!(Settings::default().with_server(Some("nonsense")).is_err());
}

#[test]
fn given_template_when_parsed_then_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budgetctl.toml");
    fs::write(&path, Settings::template()).unwrap();

    let settings = Settings::load(Some(&path)).expect("template parses");

    assert_eq!(settings.root_id, Settings::default().root_id);
}

#[test]
fn given_settings_when_serialized_then_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("budgetctl.toml");
    let original = Settings::default()
        .with_server(Some("https://budget.example.org"))
        .unwrap();
    fs::write(&path, original.to_toml().unwrap()).unwrap();

    let loaded = Settings::load(Some(&path)).unwrap();

    assert_eq!(loaded, original);
}
