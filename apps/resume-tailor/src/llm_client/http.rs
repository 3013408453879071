use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;

use super::LlmError;

/// Builds the shared HTTP client. Every backend request carries this timeout.
pub fn build_client(timeout: Duration) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(LlmError::Http)
}

/// POSTs `body` as JSON and deserializes the success response.
/// Retries on 429, 5xx and network errors with exponential backoff; fails fast on other 4xx.
/// Makes at most `max_retries + 1` attempts.
pub async fn post_json<B, R>(
    client: &Client,
    url: &str,
    headers: &[(&str, &str)],
    body: &B,
    max_retries: u32,
) -> Result<R, LlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut last_error: Option<LlmError> = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            // Exponential backoff: 1s, 2s, 4s, ...
            let delay = backoff_delay(attempt);
            warn!(
                "LLM call attempt {} failed, retrying after {}ms...",
                attempt,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }

        let mut request = client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = match request.send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(LlmError::Http(e));
                continue;
            }
        };

        let status = response.status();

        if is_retryable(status) {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            last_error = Some(LlmError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
            continue;
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        return response.json::<R>().await.map_err(LlmError::Http);
    }

    Err(match last_error {
        Some(LlmError::Api { status: 429, .. }) | None => LlmError::RateLimited {
            retries: max_retries,
        },
        Some(e) => e,
    })
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(1000 * (1 << (attempt - 1).min(5)))
}

/// Pulls a readable message out of the error envelopes the supported backends return:
/// `{"error": {"message": "..."}}` (OpenAI, Anthropic) or `{"error": "..."}` (Ollama).
fn extract_error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| match v.get("error") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Object(o)) => o
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        _ => None,
    });
    message.unwrap_or_else(|| body.to_string())
}
