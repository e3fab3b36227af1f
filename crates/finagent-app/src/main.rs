mod boot;
mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use finagent_ai::{is_error_answer, to_gemini_tool, Agent};
use finagent_config::FinagentConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::Command;

const DEFAULT_LOG_DIRECTIVE: &str = "finagent=info";

/// Load environment variables from a .env file (KEY=VALUE lines).
///
/// Must run while the process is still single-threaded. Variables already
/// set in the environment are left alone.
fn load_dotenv() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Current directory
        PathBuf::from(".env"),
        // Workspace root, two levels up from crates/finagent-app/
        manifest_dir.join("..").join("..").join(".env"),
    ];
    load_dotenv_from(&candidates);
}

/// Apply the first readable file among `candidates`; returns its path.
fn load_dotenv_from(candidates: &[PathBuf]) -> Option<&Path> {
    for path in candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in parse_dotenv(&contents) {
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
            return Some(path);
        }
    }
    None
}

fn parse_dotenv(contents: &str) -> Vec<(&str, &str)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| {
            let key = key.trim().trim_start_matches("export ").trim();
            (key, value.trim().trim_matches('"').trim_matches('\''))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

fn init_logging(directive: &str) {
    let directive: Directive = directive.parse().unwrap_or_else(|_| {
        DEFAULT_LOG_DIRECTIVE
            .parse()
            .expect("static directive parses")
    });
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .init();
}

fn main() -> ExitCode {
    // Load .env file before anything reads the environment or spawns threads
    load_dotenv();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("finagent: failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    runtime.block_on(run())
}

async fn run() -> ExitCode {
    let args = cli::parse();

    let config = match boot::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("finagent: {e}");
            return ExitCode::from(2);
        }
    };

    let directive = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_logging(directive);
    tracing::debug!("Finagent v{} starting", env!("CARGO_PKG_VERSION"));

    let credential = finagent_config::resolve_api_key(&config);
    let agent = match boot::build_agent(&config, credential) {
        Ok(agent) => agent,
        Err(e) => {
            tracing::error!("failed to start agent: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Command::Ask { question } => ask(&agent, &question.join(" ")).await,
        Command::Chat => chat(&agent).await,
        Command::Status { json } => status(&agent, &config, json),
        Command::Tools { gemini } => tools(&agent, gemini),
    }
}

async fn ask(agent: &Agent, question: &str) -> ExitCode {
    let question = question.trim();
    if question.is_empty() {
        eprintln!("finagent: question must not be empty");
        return ExitCode::from(2);
    }

    let answer = agent.run_query(question).await;
    println!("{answer}");
    if is_error_answer(&answer) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn chat(agent: &Agent) -> ExitCode {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                println!("{}\n", agent.run_query(question).await);
            }
            Ok(None) => return ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        }
    }
}

fn status(agent: &Agent, config: &FinagentConfig, json: bool) -> ExitCode {
    if json {
        println!("{}", finagent_config::config_to_json(config));
        return ExitCode::SUCCESS;
    }

    let credential = if agent.is_configured() {
        "configured"
    } else {
        "missing (set GEMINI_API_KEY)"
    };
    println!("credential: {credential}");
    println!("model:      {}", config.model.name);
    println!("max turns:  {}", agent.settings().max_turns);
    println!("data dir:   {}", config.data.dir.display());
    println!("tools:      {}", agent.registry().names().join(", "));
    ExitCode::SUCCESS
}

fn tools(agent: &Agent, gemini: bool) -> ExitCode {
    let declarations = agent.registry().declarations();
    let value = if gemini {
        serde_json::json!([{
            "functionDeclarations": declarations.iter().map(to_gemini_tool).collect::<Vec<_>>(),
        }])
    } else {
        serde_json::json!(declarations)
    };
    match serde_json::to_string_pretty(&value) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("finagent: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_first_readable_file_wins() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.env");
        let first = dir.path().join("first.env");
        let second = dir.path().join("second.env");
        std::fs::write(&first, "FINAGENT_DOTENV_TEST_A=from-first\n").unwrap();
        std::fs::write(&second, "FINAGENT_DOTENV_TEST_A=from-second\n").unwrap();

        let candidates = [missing, first.clone(), second];
        assert_eq!(load_dotenv_from(&candidates), Some(first.as_path()));
        assert_eq!(
            std::env::var("FINAGENT_DOTENV_TEST_A").as_deref(),
            Ok("from-first")
        );
    }

    #[test]
    fn dotenv_does_not_override_environment() {
        std::env::set_var("FINAGENT_DOTENV_TEST_B", "from-env");
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "FINAGENT_DOTENV_TEST_B=from-file\n").unwrap();

        load_dotenv_from(&[path]);
        assert_eq!(
            std::env::var("FINAGENT_DOTENV_TEST_B").as_deref(),
            Ok("from-env")
        );
    }

    #[test]
    fn dotenv_lines() {
        let parsed = parse_dotenv(
            "# comment\n\nGEMINI_API_KEY=\"abc\"\nexport LOG = 'debug'\nbroken line\n=orphan\n",
        );
        assert_eq!(parsed, vec![("GEMINI_API_KEY", "abc"), ("LOG", "debug")]);
    }
}
