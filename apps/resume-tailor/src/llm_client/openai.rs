//! OpenAI chat completions with `response_format: json_schema`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::http::post_json;
use super::{BackendReply, ChatMessage, CompletionRequest, LlmBackend, LlmError, Provider, Usage};
use crate::config::LlmSettings;

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: &'a [ChatMessage],
    response_format: Value,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<Choice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

pub struct OpenAiBackend {
    client: Client,
    url: String,
    authorization: String,
    max_tokens: u32,
    max_retries: u32,
}

impl OpenAiBackend {
    pub fn new(client: Client, base_url: &str, api_key: &str, settings: &LlmSettings) -> Self {
        Self {
            client,
            url: format!("{}{CHAT_COMPLETIONS_PATH}", base_url.trim_end_matches('/')),
            authorization: format!("Bearer {api_key}"),
            max_tokens: settings.max_tokens,
            max_retries: settings.max_transport_retries,
        }
    }

    fn build_request<'a>(&self, request: &'a CompletionRequest<'a>) -> OpenAiRequest<'a> {
        OpenAiRequest {
            model: request.model,
            max_tokens: self.max_tokens,
            messages: request.messages,
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema.name,
                    "description": request.schema.description,
                    "schema": request.json_schema,
                    "strict": false,
                }
            }),
        }
    }
}

fn into_reply(response: OpenAiResponse) -> Result<BackendReply, LlmError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or(LlmError::EmptyContent)?;

    if let Some(refusal) = message.refusal {
        return Err(LlmError::Refusal(refusal));
    }

    Ok(BackendReply {
        text: message.content.ok_or(LlmError::EmptyContent)?,
        usage: response.usage.map(|u| Usage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        }),
    })
}

#[async_trait]
impl LlmBackend for OpenAiBackend {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    async fn send(&self, request: &CompletionRequest<'_>) -> Result<BackendReply, LlmError> {
        let body = self.build_request(request);
        let response: OpenAiResponse = post_json(
            &self.client,
            &self.url,
            &[("authorization", self.authorization.as_str())],
            &body,
            self.max_retries,
        )
        .await?;
        into_reply(response)
    }
}
