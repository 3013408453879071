use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Provider API keys are optional here and only required once that provider is selected.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub ollama_base_url: String,
    pub results_dir: PathBuf,
    pub resumes_dir: PathBuf,
    pub latex_compiler: String,
    pub llm: LlmSettings,
    pub rust_log: String,
}

/// Transport and validation limits for every model call.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub timeout: Duration,
    pub max_tokens: u32,
    /// Retries on 429/5xx/network errors inside a single backend call.
    pub max_transport_retries: u32,
    /// Extra attempts after a schema validation failure, with corrective feedback.
    pub max_validation_retries: u32,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_tokens: 4096,
            max_transport_retries: 3,
            max_validation_retries: 2,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = LlmSettings::default();

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com"),
            anthropic_base_url: env_or("ANTHROPIC_BASE_URL", "https://api.anthropic.com"),
            ollama_base_url: env_or("OLLAMA_BASE_URL", "http://localhost:11434"),
            results_dir: PathBuf::from(env_or("RESULTS_DIR", "job_results")),
            resumes_dir: PathBuf::from(env_or("RESUMES_DIR", "resumes")),
            latex_compiler: env_or("LATEX_COMPILER", "pdflatex"),
            llm: LlmSettings {
                timeout: Duration::from_secs(parse_env(
                    "LLM_TIMEOUT_SECS",
                    defaults.timeout.as_secs(),
                )?),
                max_tokens: parse_env("LLM_MAX_TOKENS", defaults.max_tokens)?,
                max_transport_retries: parse_env(
                    "LLM_MAX_TRANSPORT_RETRIES",
                    defaults.max_transport_retries,
                )?,
                max_validation_retries: parse_env(
                    "LLM_MAX_VALIDATION_RETRIES",
                    defaults.max_validation_retries,
                )?,
            },
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
