//! Unit tests for configuration module

use attachment_management::config::{ApiVariant, Settings};
use std::io::Write;

fn write_config(dir: &tempfile::TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.database.path, "database.db");
    assert_eq!(settings.api.variant, ApiVariant::Portal);
    assert_eq!(settings.api.admin_email, "admin@example.com");
    assert_eq!(settings.api.recent_limit, 5);
    assert!(settings.cors.enabled);
    assert!(!settings.oauth.enabled);
    assert_eq!(settings.oauth.scopes.len(), 2);
}

#[test]
fn test_settings_validation_valid() {
    assert!(Settings::default().validate().is_ok());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_empty_database_path() {
    let mut settings = Settings::default();
    settings.database.path = "  ".to_string();
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_zero_recent_limit() {
    let mut settings = Settings::default();
    settings.api.recent_limit = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_oauth_without_credentials() {
    let mut settings = Settings::default();
    settings.oauth.enabled = true;
    assert!(settings.validate().is_err());

    settings.oauth.client_id = "id".to_string();
    settings.oauth.client_secret = "secret".to_string();
    assert!(settings.validate().is_ok());
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from_path(dir.path().join("absent.yaml")).unwrap();

    assert_eq!(settings.pages.template_dir, "templates");
    assert_eq!(settings.oauth.token_uri, "https://oauth2.googleapis.com/token");
}

#[test]
fn test_load_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "ams.yaml",
        r#"
database:
  path: /tmp/ams-test.db
  seed_sample_data: false
api:
  variant: classic
  admin_email: root@example.com
logging:
  format: pretty
"#,
    );

    let settings = Settings::load_from_path(&path).unwrap();

    assert_eq!(settings.database.path, "/tmp/ams-test.db");
    assert!(!settings.database.seed_sample_data);
    assert_eq!(settings.api.variant, ApiVariant::Classic);
    assert_eq!(settings.api.admin_email, "root@example.com");
    assert_eq!(settings.logging.format, "pretty");
    // Untouched keys keep their defaults
    assert_eq!(settings.database.max_connections, 5);
}

#[test]
fn test_load_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "ams.toml",
        r#"
[pages]
template_dir = "web/templates"

[oauth]
enabled = true
client_id = "abc"
client_secret = "def"
"#,
    );

    let settings = Settings::load_from_path(&path).unwrap();

    assert_eq!(settings.pages.template_dir, "web/templates");
    assert!(settings.oauth.enabled);
    assert_eq!(settings.oauth.client_id, "abc");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_environment_overrides_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "ams.yaml", "cors:\n  enabled: true\n");

    std::env::set_var("AMS__CORS__ENABLED", "false");
    let settings = Settings::load_from_path(&path);
    std::env::remove_var("AMS__CORS__ENABLED");

    assert!(!settings.unwrap().cors.enabled);
}
