//! Chat-completion node for node-graph runtimes
//!
//! Sends a text prompt, optionally with an image, to an OpenAI-compatible
//! chat-completion endpoint such as OpenRouter and returns the reply text.
//! Failures never escape the node; they come back as error text.

pub mod ai;
pub mod error;
pub mod image;
pub mod models;
pub mod node;
pub mod request;
pub mod think;

pub use error::{Error, Result};
pub use node::{NodeInputs, OpenRouterNode};
