use clap::{Parser, Subcommand};

/// Finagent: ask questions about listed companies, answered by a model
/// that calls market data tools.
#[derive(Parser, Debug)]
#[command(name = "finagent", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Answer a single question.
    Ask {
        /// The question, e.g. "What is the 14-day RSI of HPG?".
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Answer questions read from stdin, one per line.
    Chat,
    /// Show whether the agent is configured.
    Status {
        /// Print the effective config as JSON, secrets redacted.
        #[arg(long)]
        json: bool,
    },
    /// Print the tool declarations sent to the model.
    Tools {
        /// Print the Gemini wire format instead of JSON Schema.
        #[arg(long)]
        gemini: bool,
    },
}

pub fn parse() -> Args {
    Args::parse()
}
