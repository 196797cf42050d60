use super::ChatService;
use crate::models::{ChatCompletionRequest, ChatCompletionResponse, CompletionConfig};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Single-attempt client for an OpenAI-compatible chat-completion endpoint.
pub struct CompletionClient {
    client: Client,
    endpoint_url: String,
    authorization: HeaderValue,
}

impl CompletionClient {
    pub fn new(config: &CompletionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::HttpClient(format!("Failed to build HTTP client: {}", e)))?;

        Self::new_with_client(config, client)
    }

    pub fn new_with_client(config: &CompletionConfig, client: Client) -> Result<Self> {
        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| {
                Error::InvalidInput("API key contains characters not allowed in a header".into())
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            authorization,
        })
    }
}

#[async_trait]
impl ChatService for CompletionClient {
    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        let body = serde_json::to_vec(request)?;

        tracing::debug!(
            "Sending chat completion request to {} (model: {}, {} messages, image: {})",
            self.endpoint_url,
            request.model,
            request.messages.len(),
            request.has_image()
        );

        let response = self
            .client
            .post(&self.endpoint_url)
            .header(AUTHORIZATION, self.authorization.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send chat completion request: {}", e);
                e
            })?;

        let response = response.error_for_status().map_err(|e| {
            tracing::error!("Chat completion endpoint returned an error: {}", e);
            e
        })?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse chat completion response: {}\nBody: {}", e, body);
            Error::Serialization(e)
        })
    }
}
