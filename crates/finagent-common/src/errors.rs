use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FinagentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("tool setup error: {0}")]
    Tools(String),
}
