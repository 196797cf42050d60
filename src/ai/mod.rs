//! Chat-completion transport
//!
//! [`ChatService`] is the seam between the node and the network; the real
//! implementation posts to an OpenAI-compatible endpoint, the mock replays
//! canned responses in tests.

pub mod client;
pub mod mock;

pub use client::CompletionClient;
pub use mock::MockChatClient;

use crate::models::{ChatCompletionRequest, ChatCompletionResponse};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ChatService: Send + Sync {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;
}
