/// LLM Client: the single point of entry for all model calls.
///
/// ARCHITECTURAL RULE: No other module may call a model backend directly.
/// Stages hand this module a schema and a conversation; it returns a record that satisfies
/// every constraint in that schema or a typed error.
///
/// Each provider variant has exactly one `LlmBackend` implementation. Adding a backend means
/// adding a variant and an implementation here, nothing elsewhere.
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::schema::{self, validate::summarize, ObjectSchema, StructuredRecord, Violation};

pub mod anthropic;
pub mod http;
pub mod ollama;
pub mod openai;
pub mod prompts;
#[cfg(test)]
pub mod stub;

// ────────────────────────────────────────────────────────────────────────────
// Provider / message types
// ────────────────────────────────────────────────────────────────────────────

/// Supported model backends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[value(name = "openai")]
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
    Ollama,
}

impl Provider {
    /// Model identifiers this provider accepts must start with this token, if any.
    pub fn required_model_prefix(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("gpt"),
            Provider::Anthropic | Provider::Ollama => None,
        }
    }

    /// Local precondition check, run before any network call.
    pub fn check_model(&self, model: &str) -> Result<(), AppError> {
        if model.trim().is_empty() {
            return Err(AppError::ProviderUnsupported {
                provider: *self,
                model: model.to_string(),
                reason: "model identifier is empty".to_string(),
            });
        }
        if let Some(prefix) = self.required_model_prefix() {
            if !model.starts_with(prefix) {
                return Err(AppError::ProviderUnsupported {
                    provider: *self,
                    model: model.to_string(),
                    reason: format!("only models starting with '{prefix}' are supported"),
                });
            }
        }
        Ok(())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One role-tagged prompt turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Backend trait
// ────────────────────────────────────────────────────────────────────────────

/// Transport-level failures inside a backend. Surfaced to callers as `UpstreamUnavailable`.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Model refused the request: {0}")]
    Refusal(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Everything a backend needs for one round-trip.
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub schema: &'a ObjectSchema,
    /// `schema` rendered as JSON Schema, computed once per `complete` call.
    pub json_schema: &'a Value,
}

/// Raw text of one completion. For tool-calling backends this is the serialized tool input.
#[derive(Debug, Clone)]
pub struct BackendReply {
    pub text: String,
    pub usage: Option<Usage>,
}

#[async_trait]
pub trait LlmBackend: Send + Sync {
    fn provider(&self) -> Provider;

    async fn send(&self, request: &CompletionRequest<'_>) -> Result<BackendReply, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Adapter
// ────────────────────────────────────────────────────────────────────────────

/// A schema-validated completion.
#[derive(Debug, Clone)]
pub struct Completion<T> {
    pub record: T,
    /// The raw completion text the record was parsed from.
    pub raw: String,
    /// Validation attempts used, starting at 1.
    pub attempts: u32,
}

/// The single model client used by every stage.
#[derive(Clone)]
pub struct LlmClient {
    backends: HashMap<Provider, Arc<dyn LlmBackend>>,
    max_validation_retries: u32,
}

impl LlmClient {
    pub fn new(max_validation_retries: u32) -> Self {
        Self {
            backends: HashMap::new(),
            max_validation_retries,
        }
    }

    /// Registers one backend per configured provider. Providers without credentials are
    /// left out and rejected with `ProviderUnsupported` when selected.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let http = http::build_client(config.llm.timeout)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {e}")))?;
        let settings = &config.llm;

        let mut client = Self::new(settings.max_validation_retries);

        if let Some(key) = &config.openai_api_key {
            client = client.with_backend(Arc::new(openai::OpenAiBackend::new(
                http.clone(),
                &config.openai_base_url,
                key,
                settings,
            )));
        }
        if let Some(key) = &config.anthropic_api_key {
            client = client.with_backend(Arc::new(anthropic::AnthropicBackend::new(
                http.clone(),
                &config.anthropic_base_url,
                key,
                settings,
            )));
        }
        client = client.with_backend(Arc::new(ollama::OllamaBackend::new(
            http,
            &config.ollama_base_url,
            settings,
        )));

        info!("LLM client initialized (providers: {:?})", client.providers());
        Ok(client)
    }

    pub fn with_backend(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.backends.insert(backend.provider(), backend);
        self
    }

    pub fn providers(&self) -> Vec<Provider> {
        let mut providers: Vec<_> = self.backends.keys().copied().collect();
        providers.sort_by_key(|p| p.as_str());
        providers
    }

    /// Sends `messages` to `provider`/`model` and returns a `T` guaranteed to satisfy
    /// `T::schema()`, together with the raw completion it was parsed from.
    pub async fn complete<T: StructuredRecord>(
        &self,
        provider: Provider,
        model: &str,
        messages: Vec<ChatMessage>,
    ) -> Result<Completion<T>, AppError> {
        let schema = T::schema();
        self.run(provider, model, messages, &schema, |value| {
            serde_json::from_value::<T>(value).map_err(|e| {
                vec![Violation {
                    path: "$".to_string(),
                    message: format!("does not deserialize: {e}"),
                }]
            })
        })
        .await
    }

    async fn run<T, F>(
        &self,
        provider: Provider,
        model: &str,
        messages: Vec<ChatMessage>,
        schema: &ObjectSchema,
        accept: F,
    ) -> Result<Completion<T>, AppError>
    where
        F: Fn(Value) -> Result<T, Vec<Violation>>,
    {
        provider.check_model(model)?;
        let backend = self.backend(provider, model)?;

        let json_schema = schema::to_json_schema(schema);
        let mut conversation = with_schema_instruction(messages, schema);
        let max_attempts = self.max_validation_retries + 1;
        let mut last_failure: Option<(String, Vec<Violation>)> = None;

        for attempt in 1..=max_attempts {
            let request = CompletionRequest {
                model,
                messages: &conversation,
                schema,
                json_schema: &json_schema,
            };

            let reply = backend.send(&request).await.map_err(|e| {
                AppError::UpstreamUnavailable(format!("{provider} ({model}): {e}"))
            })?;

            if let Some(usage) = reply.usage {
                debug!(
                    "LLM call succeeded: provider={provider}, input_tokens={}, output_tokens={}",
                    usage.input_tokens, usage.output_tokens
                );
            }

            match parse_and_validate(schema, &reply.text).and_then(&accept) {
                Ok(record) => {
                    if attempt > 1 {
                        info!("{} validated on attempt {attempt}/{max_attempts}", schema.name);
                    }
                    return Ok(Completion {
                        record,
                        raw: reply.text,
                        attempts: attempt,
                    });
                }
                Err(violations) => {
                    warn!(
                        "{} validation attempt {attempt}/{max_attempts} failed: {}",
                        schema.name,
                        summarize(&violations)
                    );
                    conversation.push(ChatMessage::assistant(reply.text.clone()));
                    conversation.push(ChatMessage::user(prompts::correction_prompt(
                        schema,
                        &violations,
                    )));
                    last_failure = Some((reply.text, violations));
                }
            }
        }

        let (last_payload, violations) = last_failure.unwrap_or_default();
        Err(AppError::SchemaValidationFailed {
            schema: schema.name.to_string(),
            attempts: max_attempts,
            violations: summarize(&violations),
            last_payload,
        })
    }

    fn backend(&self, provider: Provider, model: &str) -> Result<&Arc<dyn LlmBackend>, AppError> {
        self.backends
            .get(&provider)
            .ok_or_else(|| AppError::ProviderUnsupported {
                provider,
                model: model.to_string(),
                reason: "provider is not configured (missing API key?)".to_string(),
            })
    }
}

/// Folds the schema instruction into the first system turn, or prepends one.
fn with_schema_instruction(mut messages: Vec<ChatMessage>, schema: &ObjectSchema) -> Vec<ChatMessage> {
    let instruction = prompts::schema_instruction(schema);
    match messages.iter_mut().find(|m| m.role == Role::System) {
        Some(system) => {
            system.content = format!("{}\n\n{instruction}", system.content);
        }
        None => messages.insert(0, ChatMessage::system(instruction)),
    }
    messages
}

fn parse_and_validate(schema: &ObjectSchema, text: &str) -> Result<Value, Vec<Violation>> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(vec![Violation {
            path: "$".to_string(),
            message: "completion was empty".to_string(),
        }]);
    }
    let value: Value = serde_json::from_str(text).map_err(|e| {
        vec![Violation {
            path: "$".to_string(),
            message: format!("invalid JSON: {e}"),
        }]
    })?;
    schema::validate(schema, &value)?;
    Ok(value)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
