//! Image inputs and PNG data-URI encoding
//!
//! The host hands the node either a raw float pixel tensor or an already
//! decoded image. Both end up as a `data:image/png;base64,...` string that
//! can be embedded in a chat message.

pub mod encoder;

pub use encoder::encode_data_uri;

use crate::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Row-major float pixel buffer, `[height, width, channels]` or
/// `[batch, height, width, channels]`, with samples in `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl PixelTensor {
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> Result<Self> {
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
            .ok_or_else(|| {
                Error::InvalidInput(format!("tensor shape {:?} is too large", shape))
            })?;
        if data.len() != expected {
            return Err(Error::InvalidInput(format!(
                "tensor data has {} values but shape {:?} needs {}",
                data.len(),
                shape,
                expected
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }
}

#[derive(Clone)]
pub enum ImageInput {
    Tensor(PixelTensor),
    Decoded(image::DynamicImage),
}

impl std::fmt::Debug for ImageInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageInput::Tensor(tensor) => f
                .debug_tuple("Tensor")
                .field(&tensor.shape)
                .finish(),
            ImageInput::Decoded(image) => f
                .debug_tuple("Decoded")
                .field(&(image.width(), image.height()))
                .finish(),
        }
    }
}

#[derive(Deserialize)]
struct TensorFile {
    shape: Vec<usize>,
    data: Vec<f32>,
}

/// Load an image file (PNG, JPEG, ...) as a decoded image input.
pub fn load_image(path: &Path) -> Result<ImageInput> {
    let image = image::open(path)?;
    tracing::debug!(
        "Loaded image {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(ImageInput::Decoded(image))
}

/// Load a JSON `{"shape": [...], "data": [...]}` file as a raw tensor input.
pub fn load_tensor(path: &Path) -> Result<ImageInput> {
    let contents = std::fs::read_to_string(path)?;
    let file: TensorFile = serde_json::from_str(&contents)?;
    let tensor = PixelTensor::new(file.shape, file.data)?;
    tracing::debug!("Loaded tensor {} {:?}", path.display(), tensor.shape());
    Ok(ImageInput::Tensor(tensor))
}
