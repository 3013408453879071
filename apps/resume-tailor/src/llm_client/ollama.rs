//! Ollama `/api/chat` with a JSON Schema passed in `format`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::post_json;
use super::{BackendReply, ChatMessage, CompletionRequest, LlmBackend, LlmError, Provider, Usage};
use crate::config::LlmSettings;

const CHAT_PATH: &str = "/api/chat";

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    format: &'a Value,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    num_predict: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: Option<OllamaMessage>,
    prompt_eval_count: Option<u32>,
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    content: String,
}

pub struct OllamaBackend {
    client: Client,
    url: String,
    max_tokens: u32,
    max_retries: u32,
}

impl OllamaBackend {
    pub fn new(client: Client, base_url: &str, settings: &LlmSettings) -> Self {
        Self {
            client,
            url: format!("{}{CHAT_PATH}", base_url.trim_end_matches('/')),
            max_tokens: settings.max_tokens,
            max_retries: settings.max_transport_retries,
        }
    }

    fn build_request<'a>(&self, request: &'a CompletionRequest<'a>) -> OllamaRequest<'a> {
        OllamaRequest {
            model: request.model,
            messages: request.messages,
            format: request.json_schema,
            stream: false,
            options: OllamaOptions {
                num_predict: self.max_tokens,
                // Structured extraction, not creative writing.
                temperature: 0.0,
            },
        }
    }
}

fn into_reply(response: OllamaResponse) -> Result<BackendReply, LlmError> {
    let text = response
        .message
        .map(|m| m.content)
        .ok_or(LlmError::EmptyContent)?;
    let usage = match (response.prompt_eval_count, response.eval_count) {
        (Some(input_tokens), Some(output_tokens)) => Some(Usage {
            input_tokens,
            output_tokens,
        }),
        _ => None,
    };
    Ok(BackendReply { text, usage })
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    async fn send(&self, request: &CompletionRequest<'_>) -> Result<BackendReply, LlmError> {
        let body = self.build_request(request);
        let response: OllamaResponse =
            post_json(&self.client, &self.url, &[], &body, self.max_retries).await?;
        into_reply(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Resume;
    use crate::schema::{to_json_schema, StructuredRecord};

    #[test]
    fn test_request_passes_schema_as_format() {
        let backend = OllamaBackend::new(
            Client::new(),
            "http://localhost:11434",
            &LlmSettings::default(),
        );
        let schema = Resume::schema();
        let json_schema = to_json_schema(&schema);
        let messages = vec![ChatMessage::user("resume text")];
        let request = CompletionRequest {
            model: "llama3.1",
            messages: &messages,
            schema: &schema,
            json_schema: &json_schema,
        };

        let body = serde_json::to_value(backend.build_request(&request)).unwrap();
        assert_eq!(backend.url, "http://localhost:11434/api/chat");
        assert_eq!(body["stream"], false);
        assert_eq!(body["format"]["title"], "Resume");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["options"]["num_predict"], 4096);
    }

    #[test]
    fn test_reply_reads_message_and_counts() {
        let response: OllamaResponse = serde_json::from_str(
            r#"{"model":"llama3.1","message":{"role":"assistant","content":"{}"},"done":true,
                "prompt_eval_count": 321, "eval_count": 54}"#,
        )
        .unwrap();
        let reply = into_reply(response).unwrap();
        assert_eq!(reply.text, "{}");
        assert_eq!(
            reply.usage,
            Some(Usage {
                input_tokens: 321,
                output_tokens: 54
            })
        );
    }

    #[test]
    fn test_missing_message_is_empty_content() {
        let response: OllamaResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(matches!(into_reply(response), Err(LlmError::EmptyContent)));
    }
}
