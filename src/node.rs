//! The OpenRouter completion node
//!
//! Hosts call [`OpenRouterNode::get_completion`] (or the blocking variant)
//! with the node's inputs and always get a string back: either the model's
//! reply or a `"Request Error: ..."` / `"Error: ..."` message.

use crate::ai::{ChatService, CompletionClient};
use crate::image::{encode_data_uri, ImageInput};
use crate::models::{
    ChatCompletionRequest, CompletionConfig, Prompt, DEFAULT_BASE_URL, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE,
};
use crate::request::build_request;
use crate::think::trim_think_tags;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::json;

pub const NODE_CLASS_NAME: &str = "OpenrouterNode";
pub const NODE_DISPLAY_NAME: &str = "OpenRouter Node";
pub const NODE_CATEGORY: &str = "OpenRouter";
pub const NO_RESPONSE: &str = "No response from the model.";

/// Inputs of one node invocation.
#[derive(Clone)]
pub struct NodeInputs {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub prompt: String,
    pub system_prompt: String,
    pub temperature: f64,
    pub trim_think: bool,
    pub image_input: Option<ImageInput>,
}

impl Default for NodeInputs {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            prompt: String::new(),
            system_prompt: String::new(),
            temperature: DEFAULT_TEMPERATURE,
            trim_think: true,
            image_input: None,
        }
    }
}

impl NodeInputs {
    pub fn config(&self) -> CompletionConfig {
        CompletionConfig::new(
            self.base_url.clone(),
            self.model.clone(),
            self.api_key.clone(),
            self.temperature,
        )
    }

    pub fn prompt(&self) -> Prompt {
        Prompt::new(self.system_prompt.clone(), self.prompt.clone())
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputKind {
    String,
    Float,
    Boolean,
    Image,
}

/// Declaration of one node input as shown by the host.
#[derive(Debug, Clone, Serialize)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_round: Option<u32>,
}

impl InputSpec {
    fn new(name: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            multiline: None,
            default: None,
            min: None,
            max: None,
            step: None,
            display_round: None,
        }
    }

    fn string(name: &'static str, multiline: bool, default: &str) -> Self {
        Self {
            multiline: Some(multiline),
            default: Some(json!(default)),
            ..Self::new(name, InputKind::String)
        }
    }
}

/// Registration metadata handed to the host.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDefinition {
    pub class_name: &'static str,
    pub display_name: &'static str,
    pub category: &'static str,
    pub function: &'static str,
    pub return_types: Vec<&'static str>,
    pub inputs: Vec<InputSpec>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenRouterNode;

impl OpenRouterNode {
    pub fn new() -> Self {
        Self
    }

    pub fn definition(&self) -> NodeDefinition {
        NodeDefinition {
            class_name: NODE_CLASS_NAME,
            display_name: NODE_DISPLAY_NAME,
            category: NODE_CATEGORY,
            function: "get_completion",
            return_types: vec!["STRING"],
            inputs: vec![
                InputSpec::string("base_url", false, DEFAULT_BASE_URL),
                InputSpec::string("model", false, DEFAULT_MODEL),
                InputSpec::string("api_key", false, ""),
                InputSpec::string("prompt", true, ""),
                InputSpec::string("system_prompt", true, ""),
                InputSpec {
                    default: Some(json!(DEFAULT_TEMPERATURE)),
                    min: Some(0.0),
                    max: Some(1.0),
                    step: Some(0.01),
                    display_round: Some(2),
                    ..InputSpec::new("temperature", InputKind::Float)
                },
                InputSpec {
                    default: Some(json!(true)),
                    ..InputSpec::new("trim_think", InputKind::Boolean)
                },
                InputSpec {
                    required: false,
                    ..InputSpec::new("image_input", InputKind::Image)
                },
            ],
        }
    }

    /// Run one completion against `inputs.base_url`.
    pub async fn get_completion(&self, inputs: &NodeInputs) -> String {
        into_output(complete(inputs).await)
    }

    /// Same as [`get_completion`](Self::get_completion) but routed through an
    /// arbitrary transport.
    pub async fn get_completion_with(
        &self,
        service: &dyn ChatService,
        inputs: &NodeInputs,
    ) -> String {
        into_output(complete_with(service, inputs).await)
    }

    /// Synchronous entry point for hosts without an async runtime. Blocks the
    /// calling thread until the endpoint answers or the request times out.
    ///
    /// When the caller is already inside a tokio runtime the call runs on a
    /// scoped helper thread with its own runtime.
    pub fn get_completion_blocking(&self, inputs: &NodeInputs) -> String {
        if tokio::runtime::Handle::try_current().is_err() {
            return self.run_on_own_runtime(inputs);
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| self.run_on_own_runtime(inputs))
                .join()
                .unwrap_or_else(|_| {
                    into_output(Err(Error::InvalidInput(
                        "completion thread panicked".to_string(),
                    )))
                })
        })
    }

    fn run_on_own_runtime(&self, inputs: &NodeInputs) -> String {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => return into_output(Err(e.into())),
        };
        runtime.block_on(self.get_completion(inputs))
    }
}

fn into_output(result: Result<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::error!("Completion failed: {}", e);
        e.to_node_output()
    })
}

async fn complete(inputs: &NodeInputs) -> Result<String> {
    let request = prepare_request(inputs)?;
    let client = CompletionClient::new(&inputs.config())?;
    respond(&client, &request, inputs.trim_think).await
}

async fn complete_with(service: &dyn ChatService, inputs: &NodeInputs) -> Result<String> {
    let request = prepare_request(inputs)?;
    respond(service, &request, inputs.trim_think).await
}

fn prepare_request(inputs: &NodeInputs) -> Result<ChatCompletionRequest> {
    let temperature = inputs.temperature;
    if !(0.0..=1.0).contains(&temperature) {
        return Err(Error::InvalidInput(format!(
            "temperature must be between 0.0 and 1.0, got {}",
            temperature
        )));
    }

    let image_data_uri = inputs
        .image_input
        .as_ref()
        .map(encode_data_uri)
        .transpose()?;

    Ok(build_request(&inputs.config(), &inputs.prompt(), image_data_uri))
}

async fn respond(
    service: &dyn ChatService,
    request: &ChatCompletionRequest,
    trim_think: bool,
) -> Result<String> {
    let response = service.chat_completion(request).await?;

    match response.first_content() {
        Some(content) => Ok(trim_think_tags(&content, trim_think)),
        None => {
            tracing::warn!("Endpoint returned no choices");
            Ok(NO_RESPONSE.to_string())
        }
    }
}
