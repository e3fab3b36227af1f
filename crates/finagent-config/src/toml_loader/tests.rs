//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_finagent_config.toml"));
    assert!(matches!(
        result,
        Err(finagent_common::ConfigError::FileNotFound(_))
    ));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[model]
name = "gemini-1.5-pro"

[agent]
max_turns = 4
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.name, "gemini-1.5-pro");
    assert_eq!(config.agent.max_turns, 4);
    // Defaults preserved
    assert_eq!(config.agent.default_history_months, 3);
    assert_eq!(config.model.max_output_tokens, 4096);
    assert_eq!(config.logging.level, "finagent=info");
    assert!(config.model.api_key.is_none());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(
        result,
        Err(finagent_common::ConfigError::ParseError(_))
    ));
}

#[test]
fn out_of_range_values_are_loaded_as_is() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[agent]\nmax_turns = 500\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.agent.max_turns, 500);
    assert!(crate::validation::validate(&config).is_err());
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finagent").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.model.name, "gemini-2.0-flash");
    assert_eq!(config.agent.max_turns, 10);
}

#[test]
fn default_config_toml_is_valid() {
    use super::template::default_config_toml;
    use crate::schema::FinagentConfig;

    let config: FinagentConfig = toml::from_str(default_config_toml()).unwrap();
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn default_config_path_ends_with_finagent() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("finagent/config.toml"));
    }
}
