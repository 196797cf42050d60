use super::ChatService;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub struct MockChatClient {
    responses: Arc<Mutex<Vec<ChatCompletionResponse>>>,
    requests: Arc<Mutex<Vec<serde_json::Value>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockChatClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_content_response(self, content: String) -> Self {
        self.with_response(ChatCompletionResponse::with_content(content))
    }

    pub fn with_response(self, response: ChatCompletionResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Request bodies received so far, as JSON.
    pub fn get_requests(&self) -> Vec<serde_json::Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatService for MockChatClient {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request)?);

        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Io(std::io::Error::other("Mock failure")));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // Echo the last user text part
            let echo = request
                .messages
                .last()
                .and_then(|message| serde_json::to_value(&message.content).ok())
                .and_then(|content| content[0]["text"].as_str().map(str::to_string))
                .unwrap_or_default();
            Ok(ChatCompletionResponse::with_content(echo))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}
