//! Error handling and custom error types
//!
//! Every failure inside the node is one of these kinds. None of them ever
//! reaches the host: [`Error::to_node_output`] turns each into the text the
//! node returns in place of a completion.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    ImageEncoding(String),

    #[error("Image processing error: {0}")]
    ImageCodec(#[from] image::ImageError),

    /// Transport failures and non-2xx statuses share this variant.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Text returned to the host when a call fails.
    pub fn to_node_output(&self) -> String {
        match self {
            Error::Request(e) => format!("Request Error: {}", e),
            other => format!("Error: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
