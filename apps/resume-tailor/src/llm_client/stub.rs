//! Scripted backend for tests. Replays queued replies in order and records every conversation.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{BackendReply, ChatMessage, CompletionRequest, LlmBackend, LlmError, Provider, Usage};

pub struct ScriptedBackend {
    provider: Provider,
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    seen: Mutex<Vec<Vec<ChatMessage>>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(provider: Provider, replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            provider,
            replies: Mutex::new(replies.into()),
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Conversation sent on the `index`-th call (0-based).
    pub fn messages_for_call(&self, index: usize) -> Vec<ChatMessage> {
        self.seen.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl LlmBackend for ScriptedBackend {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn send(&self, request: &CompletionRequest<'_>) -> Result<BackendReply, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.messages.to_vec());
        let next = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent));
        next.map(|text| BackendReply {
            text,
            usage: Some(Usage {
                input_tokens: 10,
                output_tokens: 20,
            }),
        })
    }
}
