//! Default TOML config template with documentation comments.

/// Generate the default TOML config content with comments.
pub(super) fn default_config_toml() -> &'static str {
    r##"# Finagent Configuration
# Only override what you want to change -- missing fields use defaults.
# The API key is read from the GEMINI_API_KEY environment variable first.

[model]
# name = "gemini-2.0-flash"
# api_base = "https://generativelanguage.googleapis.com/v1beta/models"
# max_output_tokens = 4096       # 1-65536
# temperature = 0.7              # 0.0-2.0
# request_timeout_secs = 120
# connect_timeout_secs = 10
# api_key = ""

[agent]
# max_turns = 10                 # 1-50, messages sent to the model per question
# default_history_months = 3     # 1-24, window used when no dates are given
# log_result_chars = 200
# system_prompt = ""

[data]
# dir = "/path/to/market-data"   # one sub-directory per ticker

[logging]
# level = "finagent=info"
"##
}
