use std::path::Path;

use image::DynamicImage;

use crate::{error::SceneError, resources::load_binary};

/// Decoded pixels of one image file, bottom row first.
///
/// `pixels` holds `channels` bytes per pixel, which is always 3 (RGB) or
/// 4 (RGBA).
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Tightly packed RGBA8 pixels. RGB images get an opaque alpha channel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.channels {
            4 => self.pixels.clone(),
            _ => self
                .pixels
                .chunks_exact(3)
                .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], u8::MAX])
                .collect(),
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }
}

/// Decodes an image from file contents.
///
/// The image is flipped vertically so its first row is the bottom one, which
/// is where texture coordinate V = 0 samples from.
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, SceneError> {
    let img = image::load_from_memory(bytes)?;
    from_image(img.flipv())
}

/// Reads and decodes the image at `path`.
pub fn load_image(path: &Path) -> Result<DecodedImage, SceneError> {
    let data = load_binary(path)?;
    let decoded = decode_image(&data)?;
    log::info!(
        "Successfully loaded image: {}, width: {}, height: {}, channels: {}",
        path.display(),
        decoded.width,
        decoded.height,
        decoded.channels
    );
    Ok(decoded)
}

fn from_image(img: DynamicImage) -> Result<DecodedImage, SceneError> {
    let (width, height) = (img.width(), img.height());
    let channels = img.color().channel_count();
    let pixels = match channels {
        3 => img.to_rgb8().into_raw(),
        4 => img.to_rgba8().into_raw(),
        _ => return Err(SceneError::UnsupportedChannels { channels }),
    };
    Ok(DecodedImage {
        width,
        height,
        channels,
        pixels,
    })
}
