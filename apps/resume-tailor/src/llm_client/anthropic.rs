//! Anthropic Messages API. Structured output is obtained by forcing a single tool call whose
//! `input_schema` is the record schema; the tool input is the completion.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::post_json;
use super::{BackendReply, CompletionRequest, LlmBackend, LlmError, Provider, Role, Usage};
use crate::config::LlmSettings;

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    system: String,
    messages: Vec<AnthropicMessage<'a>>,
    tools: Vec<Tool<'a>>,
    tool_choice: ToolChoice,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool<'a> {
    name: String,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: &'static str,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Option<AnthropicUsage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
    input: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u32,
    output_tokens: u32,
}

pub struct AnthropicBackend {
    client: Client,
    url: String,
    api_key: String,
    max_tokens: u32,
    max_retries: u32,
}

impl AnthropicBackend {
    pub fn new(client: Client, base_url: &str, api_key: &str, settings: &LlmSettings) -> Self {
        Self {
            client,
            url: format!("{}{MESSAGES_PATH}", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            max_tokens: settings.max_tokens,
            max_retries: settings.max_transport_retries,
        }
    }

    fn build_request<'a>(&self, request: &'a CompletionRequest<'a>) -> AnthropicRequest<'a> {
        // System turns travel in the top-level `system` field, not in `messages`.
        let system = request
            .messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let messages = request
            .messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| AnthropicMessage {
                role: if m.role == Role::Assistant {
                    "assistant"
                } else {
                    "user"
                },
                content: &m.content,
            })
            .collect();

        let tool_name = tool_name(request.schema.name);

        AnthropicRequest {
            model: request.model,
            max_tokens: self.max_tokens,
            system,
            messages,
            tools: vec![Tool {
                name: tool_name.clone(),
                description: request.schema.description,
                input_schema: request.json_schema,
            }],
            tool_choice: ToolChoice {
                choice_type: "tool",
                name: tool_name,
            },
        }
    }
}

fn tool_name(schema_name: &str) -> String {
    format!("record_{}", schema_name.to_lowercase())
}

fn into_reply(response: AnthropicResponse) -> Result<BackendReply, LlmError> {
    let usage = response.usage.map(|u| Usage {
        input_tokens: u.input_tokens,
        output_tokens: u.output_tokens,
    });

    // Prefer the forced tool call; fall back to a text block if the model answered in prose.
    let tool_input = response
        .content
        .iter()
        .find(|b| b.block_type == "tool_use")
        .and_then(|b| b.input.as_ref());

    let text = match tool_input {
        Some(input) => input.to_string(),
        None => response
            .content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.clone())
            .ok_or(LlmError::EmptyContent)?,
    };

    Ok(BackendReply { text, usage })
}

#[async_trait]
impl LlmBackend for AnthropicBackend {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    async fn send(&self, request: &CompletionRequest<'_>) -> Result<BackendReply, LlmError> {
        let body = self.build_request(request);
        let response: AnthropicResponse = post_json(
            &self.client,
            &self.url,
            &[
                ("x-api-key", self.api_key.as_str()),
                ("anthropic-version", ANTHROPIC_VERSION),
            ],
            &body,
            self.max_retries,
        )
        .await?;
        into_reply(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatMessage;
    use crate::models::TailoredResume;
    use crate::schema::{to_json_schema, StructuredRecord};

    fn backend() -> AnthropicBackend {
        AnthropicBackend::new(
            Client::new(),
            "https://api.anthropic.com",
            "sk-ant-test",
            &LlmSettings::default(),
        )
    }

    #[test]
    fn test_system_turns_lifted_and_tool_forced() {
        let schema = TailoredResume::schema();
        let json_schema = to_json_schema(&schema);
        let messages = vec![
            ChatMessage::system("Be precise."),
            ChatMessage::user("Tailor this."),
            ChatMessage::assistant("{}"),
            ChatMessage::user("Fix it."),
        ];
        let request = CompletionRequest {
            model: "claude-3-5-sonnet-20240620",
            messages: &messages,
            schema: &schema,
            json_schema: &json_schema,
        };

        let body = serde_json::to_value(backend().build_request(&request)).unwrap();
        assert_eq!(body["system"], "Be precise.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["role"], "assistant");
        assert_eq!(body["tools"][0]["name"], "record_tailoredresume");
        assert_eq!(body["tool_choice"]["type"], "tool");
        assert_eq!(body["tool_choice"]["name"], "record_tailoredresume");
        assert_eq!(body["tools"][0]["input_schema"]["type"], "object");
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn test_reply_prefers_tool_input() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "Here you go"},
                    {"type": "tool_use", "id": "t1", "name": "record_x", "input": {"a": [1, 2]}}
                ],
                "usage": {"input_tokens": 100, "output_tokens": 40}
            }"#,
        )
        .unwrap();
        let reply = into_reply(response).unwrap();
        let value: Value = serde_json::from_str(&reply.text).unwrap();
        assert_eq!(value["a"][1], 2);
        assert_eq!(reply.usage.unwrap().input_tokens, 100);
    }

    #[test]
    fn test_reply_falls_back_to_text_block() {
        let response: AnthropicResponse = serde_json::from_str(
            r#"{"content": [{"type": "text", "text": "{\"a\": 1}"}]}"#,
        )
        .unwrap();
        assert_eq!(into_reply(response).unwrap().text, "{\"a\": 1}");
    }

    #[test]
    fn test_reply_without_blocks_is_empty_content() {
        let response: AnthropicResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(into_reply(response), Err(LlmError::EmptyContent)));
    }
}
