//! Tests for configuration module.

use super::*;
use tempfile::TempDir;
use test_case::test_case;

const VALID_CONFIG: &str = r#"
[main]
enabled = true

[jira]
url = "https://jira.example.com"
username = "reindexer"
password = "secret"
reindex_type = "FOREGROUND"

[log]
level = "debug"
"#;

fn valid_config() -> AppConfig {
    AppConfig::parse(VALID_CONFIG).unwrap()
}

#[test]
fn test_parse_valid_config() {
    let config = valid_config();

    assert!(config.main.enabled);
    assert_eq!(config.jira.url, "https://jira.example.com");
    assert_eq!(config.jira.username, "reindexer");
    assert_eq!(config.jira.password, "secret");
    assert_eq!(config.effective_reindex_type(), ReindexType::Foreground);
    assert_eq!(config.effective_log_level(), LogLevel::Debug);
    assert_eq!(config.effective_log_perms(), 0o644);
    assert!(config.log_file().is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_bundled_sample_config_parses() {
    let config = AppConfig::parse(include_str!("../../../common/jira-reindex-runner.toml")).unwrap();

    assert!(!config.main.enabled);
    assert_eq!(config.effective_reindex_type(), ReindexType::BackgroundPreferred);
    assert_eq!(
        config.log_file(),
        Some(PathBuf::from(
            "/var/log/jira-reindex-runner/jira-reindex-runner.log"
        ))
    );
}

#[test]
fn test_missing_sections_use_defaults() {
    let config = AppConfig::parse("").unwrap();

    assert!(!config.main.enabled);
    assert_eq!(config.log.level, "info");
    assert_eq!(config.log.perms, "0644");
    assert_eq!(config.effective_reindex_type(), ReindexType::BackgroundPreferred);
}

#[test]
fn test_validation_collects_all_errors() {
    let config = AppConfig::parse(
        r#"
[jira]
reindex_type = "SOMETIMES"

[log]
level = "loud"
perms = "rw-r--r--"
"#,
    )
    .unwrap();

    let errors = config.validate().unwrap_err();
    let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();

    assert_eq!(errors.len(), 6, "{:#?}", messages);
    assert!(messages.contains(&"Property jira.url must be set".to_string()));
    assert!(messages.contains(&"Property jira.username must be set".to_string()));
    assert!(messages.contains(&"Property jira.password must be set".to_string()));
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidReindexType(t) if t == "SOMETIMES"))
    );
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidLogLevel(l) if l == "loud"))
    );
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidLogPerms(p) if p == "rw-r--r--"))
    );
}

#[test_case("" ; "empty selects default")]
#[test_case("FOREGROUND" ; "foreground")]
#[test_case("BACKGROUND" ; "background")]
#[test_case("BACKGROUND_PREFERRED" ; "background preferred")]
fn test_supported_reindex_types(reindex_type: &str) {
    let mut config = valid_config();
    config.jira.reindex_type = reindex_type.to_string();
    assert!(config.validate().is_ok());
}

#[test_case("DEBUG", LogLevel::Debug ; "upper case")]
#[test_case("Warn", LogLevel::Warn ; "mixed case")]
#[test_case("crit", LogLevel::Crit ; "critical")]
fn test_log_level_is_case_insensitive(level: &str, expected: LogLevel) {
    let mut config = valid_config();
    config.log.level = level.to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.effective_log_level(), expected);
}

#[test]
fn test_crit_level_filters_as_error() {
    assert_eq!(LogLevel::Crit.as_filter(), "error");
    assert_eq!(LogLevel::Crit.to_string(), "crit");
}

#[test_case("jira.example.com" ; "missing scheme")]
#[test_case("ftp://jira.example.com" ; "unsupported scheme")]
#[test_case("https://" ; "missing host")]
fn test_invalid_urls_are_rejected(url: &str) {
    let mut config = valid_config();
    config.jira.url = url.to_string();

    let errors = config.validate().unwrap_err();

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ConfigError::InvalidUrl { .. }));
}

#[test]
fn test_log_directory_must_exist() {
    let dir = TempDir::new().unwrap();
    let mut config = valid_config();

    config.log.file = Some(dir.path().join("runner.log").display().to_string());
    assert!(config.validate().is_ok());

    config.log.file = Some(
        dir.path()
            .join("missing")
            .join("runner.log")
            .display()
            .to_string(),
    );
    let errors = config.validate().unwrap_err();
    assert!(matches!(errors[0], ConfigError::InvalidLogDir(_)));
}

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("runner.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    let config = AppConfig::load(&path).unwrap();

    assert_eq!(config.jira.username, "reindexer");
    let client = config.client_config();
    assert_eq!(client.url, "https://jira.example.com");
    assert_eq!(client.password, "secret");
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = AppConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::ReadError { .. }));
}

#[test]
fn test_load_malformed_file() {
    let err = AppConfig::parse("[jira\nurl = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}

#[test]
fn test_expand_tilde_leaves_absolute_paths() {
    assert_eq!(
        expand_tilde("/var/log/runner.log"),
        PathBuf::from("/var/log/runner.log")
    );
}
