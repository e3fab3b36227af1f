//! Configuration validation.
//!
//! Collects every out-of-range value into a single error.

use crate::schema::FinagentConfig;
use finagent_common::ConfigError;

pub const MAX_TURNS_LIMIT: u32 = 50;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &FinagentConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.model.name.trim().is_empty() {
        errors.push("model.name must not be empty".into());
    }
    if config.model.api_base.trim().is_empty() {
        errors.push("model.api_base must not be empty".into());
    }
    validate_range(
        &mut errors,
        "model.max_output_tokens",
        config.model.max_output_tokens,
        1,
        65536,
    );
    validate_range_f64(&mut errors, "model.temperature", config.model.temperature, 0.0, 2.0);
    if config.model.request_timeout_secs == 0 {
        errors.push("model.request_timeout_secs must be at least 1".into());
    }
    if config.model.connect_timeout_secs == 0 {
        errors.push("model.connect_timeout_secs must be at least 1".into());
    }

    validate_range(&mut errors, "agent.max_turns", config.agent.max_turns, 1, MAX_TURNS_LIMIT);
    validate_range(
        &mut errors,
        "agent.default_history_months",
        config.agent.default_history_months,
        1,
        24,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range(errors: &mut Vec<String>, name: &str, value: u32, min: u32, max: u32) {
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

fn validate_range_f64(errors: &mut Vec<String>, name: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate(&FinagentConfig::default()).is_ok());
    }

    #[test]
    fn catches_zero_turn_budget() {
        let mut config = FinagentConfig::default();
        config.agent.max_turns = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("agent.max_turns"));
    }

    #[test]
    fn catches_temperature_out_of_range() {
        let mut config = FinagentConfig::default();
        config.model.temperature = 3.5;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.temperature"));
    }

    #[test]
    fn nan_temperature_rejected() {
        let mut config = FinagentConfig::default();
        config.model.temperature = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = FinagentConfig::default();
        config.model.name = "  ".into();
        config.agent.default_history_months = 0;
        config.model.request_timeout_secs = 0;
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("model.name"));
        assert!(err.contains("agent.default_history_months"));
        assert!(err.contains("model.request_timeout_secs"));
    }
}
