//! Data models and structures
//!
//! Per-call configuration, the prompt pair, and the chat-completion
//! request/response payloads exchanged with the endpoint.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Endpoint settings for a single call. Built fresh on every invocation.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint_url: String,
    pub model: String,
    pub api_key: String,
    pub temperature: f64,
}

impl CompletionConfig {
    pub fn new(endpoint_url: String, model: String, api_key: String, temperature: f64) -> Self {
        Self {
            endpoint_url,
            model,
            api_key,
            temperature,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            user: user.into(),
        }
    }

    /// The system text with surrounding whitespace removed, or `None` when
    /// there is nothing left to send.
    pub fn trimmed_system(&self) -> Option<&str> {
        self.system
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Request body for chat completions.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

impl ChatCompletionRequest {
    pub fn has_image(&self) -> bool {
        self.messages.iter().any(|message| match &message.content {
            ChatMessageContent::Parts(parts) => parts
                .iter()
                .any(|part| matches!(part, MessagePart::ImageUrl { .. })),
            ChatMessageContent::Text(_) => false,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: ChatMessageContent,
}

/// Plain text for system messages, ordered parts for the user message.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatMessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Top-level chat completion response.
///
/// Every field is optional on the wire; provider shape drift decodes to an
/// empty value instead of failing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<AssistantMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// A response carrying a single assistant choice.
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: Some(AssistantMessage {
                    role: Some("assistant".to_string()),
                    content: Some(content.into()),
                }),
                finish_reason: Some("stop".to_string()),
            }],
        }
    }

    /// Content of the first choice. `None` only when there are no choices;
    /// a choice without content yields an empty string.
    pub fn first_content(&self) -> Option<String> {
        self.choices.first().map(|choice| {
            choice
                .message
                .as_ref()
                .and_then(|message| message.content.clone())
                .unwrap_or_default()
        })
    }
}

// Configuration for the command-line harness
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            base_url: std::env::var("OPENROUTER_BASE_URL").ok(),
            model: std::env::var("OPENROUTER_MODEL").ok(),
        }
    }
}
