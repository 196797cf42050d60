//! Chat-completion request body construction.

use crate::models::{
    ChatCompletionRequest, ChatMessage, ChatMessageContent, CompletionConfig, ImageUrl,
    MessagePart, Prompt, Role,
};

/// Assemble the request body: an optional system message followed by a
/// single user message whose parts are the prompt text and, when given, the
/// image data URI.
pub fn build_request(
    config: &CompletionConfig,
    prompt: &Prompt,
    image_data_uri: Option<String>,
) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(2);

    if let Some(system) = prompt.trimmed_system() {
        messages.push(ChatMessage {
            role: Role::System,
            content: ChatMessageContent::Text(system.to_string()),
        });
    }

    let mut parts = vec![MessagePart::Text {
        text: prompt.user.clone(),
    }];
    if let Some(url) = image_data_uri {
        parts.push(MessagePart::ImageUrl {
            image_url: ImageUrl { url },
        });
    }

    messages.push(ChatMessage {
        role: Role::User,
        content: ChatMessageContent::Parts(parts),
    });

    ChatCompletionRequest {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
    }
}
