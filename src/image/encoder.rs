use super::{ImageInput, PixelTensor};
use crate::{Error, Result};
use base64::Engine as _;
use image::{DynamicImage, GrayImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode an image input as a base64 PNG data URI.
pub fn encode_data_uri(input: &ImageInput) -> Result<String> {
    let png = match input {
        ImageInput::Tensor(tensor) => encode_png(&tensor_to_image(tensor)?)?,
        ImageInput::Decoded(image) => encode_png(image)?,
    };

    tracing::debug!("Encoded image as PNG ({} bytes)", png.len());

    let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
    Ok(format!("{}{}", DATA_URI_PREFIX, encoded))
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// `[height, width, channels]` after dropping a singleton batch dimension.
fn squeezed_dims(shape: &[usize]) -> Result<(usize, usize, usize)> {
    let shape = match shape {
        [1, rest @ ..] if shape.len() == 4 => rest,
        _ => shape,
    };

    match *shape {
        [height, width, channels] => Ok((height, width, channels)),
        _ => Err(Error::ImageEncoding(
            "Image tensor must be 3D after squeezing.".to_string(),
        )),
    }
}

/// Split an HWC float buffer into one quantized plane per channel (CHW).
fn channel_planes(data: &[f32], height: usize, width: usize, channels: usize) -> Vec<Vec<u8>> {
    (0..channels)
        .map(|c| {
            (0..height * width)
                .map(|pixel| to_u8(data[pixel * channels + c]))
                .collect()
        })
        .collect()
}

fn to_u8(sample: f32) -> u8 {
    (sample * 255.0).clamp(0.0, 255.0) as u8
}

fn tensor_to_image(tensor: &PixelTensor) -> Result<DynamicImage> {
    let (height, width, channels) = squeezed_dims(tensor.shape())?;
    if !matches!(channels, 1 | 3 | 4) {
        return Err(Error::ImageEncoding(format!(
            "Invalid number of channels: {}.",
            channels
        )));
    }

    let planes = channel_planes(tensor.data(), height, width, channels);
    let w = u32::try_from(width)
        .map_err(|_| Error::InvalidInput(format!("image width {} is too large", width)))?;
    let h = u32::try_from(height)
        .map_err(|_| Error::InvalidInput(format!("image height {} is too large", height)))?;
    let at = |c: usize, x: u32, y: u32| planes[c][y as usize * width + x as usize];

    let image = match channels {
        1 => DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
            image::Luma([at(0, x, y)])
        })),
        3 => DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            image::Rgb([at(0, x, y), at(1, x, y), at(2, x, y)])
        })),
        _ => DynamicImage::ImageRgba8(RgbaImage::from_fn(w, h, |x, y| {
            image::Rgba([at(0, x, y), at(1, x, y), at(2, x, y), at(3, x, y)])
        })),
    };
    Ok(image)
}
