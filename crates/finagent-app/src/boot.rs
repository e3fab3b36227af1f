//! Wiring: turn a loaded config into a ready [`Agent`].

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use finagent_ai::{
    default_system_instruction, Agent, AgentSettings, GeminiConfig, GeminiSessionFactory,
    ToolRegistry,
};
use finagent_common::{FinagentError, Result};
use finagent_config::{AgentConfig, FinagentConfig, ModelConfig};
use finagent_market::{market_registry, FileDataSource};
use tracing::info;

/// Load the config named on the command line, or the default one.
///
/// Out-of-range values are an error here: the agent never runs with a
/// config that failed validation.
pub fn load_config(path: Option<&str>) -> Result<FinagentConfig> {
    let config = match path {
        Some(path) => finagent_config::load_from_path(Path::new(path))?,
        None => finagent_config::load_default()?,
    };
    finagent_config::validation::validate(&config)?;
    Ok(config)
}

pub fn gemini_config(model: &ModelConfig) -> GeminiConfig {
    GeminiConfig::new()
        .with_model(&model.name)
        .with_api_base(&model.api_base)
        .with_max_tokens(model.max_output_tokens)
        .with_temperature(model.temperature)
        .with_timeouts(
            Duration::from_secs(model.connect_timeout_secs),
            Duration::from_secs(model.request_timeout_secs),
        )
}

pub fn agent_settings(agent: &AgentConfig, today: NaiveDate) -> AgentSettings {
    let instruction = match &agent.system_prompt {
        Some(prompt) if !prompt.trim().is_empty() => prompt.clone(),
        _ => default_system_instruction(today, agent.default_history_months),
    };
    AgentSettings::default()
        .with_max_turns(agent.max_turns)
        .with_log_result_chars(agent.log_result_chars)
        .with_system_instruction(instruction)
}

/// Registry of market tools reading from the configured data directory.
pub fn build_registry(config: &FinagentConfig) -> Result<ToolRegistry> {
    let source = Arc::new(FileDataSource::new(&config.data.dir));
    market_registry(source).map_err(|e| FinagentError::Tools(e.to_string()))
}

/// Build the agent. A missing credential is not an error at this point;
/// queries report it instead.
pub fn build_agent(config: &FinagentConfig, credential: Option<String>) -> Result<Agent> {
    let registry = build_registry(config)?;
    let sessions = GeminiSessionFactory::new(gemini_config(&config.model))
        .map_err(|e| FinagentError::Ai(e.to_string()))?;
    let settings = agent_settings(&config.agent, chrono::Local::now().date_naive());

    info!(
        model = %config.model.name,
        tools = registry.len(),
        max_turns = settings.max_turns,
        data_dir = %config.data.dir.display(),
        "agent ready"
    );
    Ok(Agent::new(
        Arc::new(registry),
        Arc::new(sessions),
        credential,
        settings,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use finagent_ai::is_error_answer;

    #[test]
    fn model_settings_map_to_gemini() {
        let model = ModelConfig {
            name: "gemini-1.5-pro".into(),
            max_output_tokens: 2048,
            temperature: 0.2,
            request_timeout_secs: 30,
            connect_timeout_secs: 5,
            ..ModelConfig::default()
        };
        let gemini = gemini_config(&model);
        assert_eq!(gemini.model, "gemini-1.5-pro");
        assert_eq!(gemini.max_tokens, 2048);
        assert_eq!(gemini.temperature, 0.2);
        assert_eq!(gemini.request_timeout, Duration::from_secs(30));
        assert_eq!(gemini.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn config_defaults_match_client_defaults() {
        let from_config = gemini_config(&ModelConfig::default());
        let client_default = GeminiConfig::default();
        assert_eq!(from_config.model, client_default.model);
        assert_eq!(from_config.api_base, client_default.api_base);
        assert_eq!(
            from_config.api_base,
            finagent_common::provider::DEFAULT_API_BASE
        );
    }

    #[test]
    fn default_prompt_uses_history_window() {
        let agent = AgentConfig {
            default_history_months: 6,
            max_turns: 4,
            ..AgentConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        let settings = agent_settings(&agent, today);
        assert_eq!(settings.max_turns, 4);
        assert!(settings.system_instruction.contains("2024-11-01"));
        assert!(settings.system_instruction.contains("6 months"));
    }

    #[test]
    fn custom_prompt_wins() {
        let agent = AgentConfig {
            system_prompt: Some("Only talk about FPT.".into()),
            ..AgentConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2024, 11, 1).unwrap();
        assert_eq!(
            agent_settings(&agent, today).system_instruction,
            "Only talk about FPT."
        );
    }

    #[test]
    fn invalid_config_file_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[agent]\nmax_turns = 0\n").unwrap();
        let err = load_config(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("max_turns"));
    }

    #[test]
    fn missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(path.to_str()).is_err());
    }

    #[tokio::test]
    async fn agent_without_credential_reports_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FinagentConfig::default();
        config.data.dir = dir.path().to_path_buf();

        let agent = build_agent(&config, None).unwrap();
        assert!(!agent.is_configured());
        assert_eq!(agent.registry().len(), 3);

        let answer = agent.run_query("What is FPT?").await;
        assert!(is_error_answer(&answer));
        assert!(answer.contains("GEMINI_API_KEY"));
    }
}
