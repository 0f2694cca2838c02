//! Error types shared by the scene modules.

use std::path::PathBuf;

use crate::scene::meshes::Shape;

/// Everything that can go wrong while loading, preparing or drawing a scene.
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// Only RGB and RGBA images can be turned into textures.
    #[error("not implemented to handle image with {channels} channels")]
    UnsupportedChannels { channels: u8 },

    #[error("all {capacity} texture slots are in use, cannot register '{tag}'")]
    TextureSlotsExhausted { tag: String, capacity: usize },

    #[error("texture tag '{0}' is already registered")]
    DuplicateTexture(String),

    #[error("material tag '{0}' is already defined")]
    DuplicateMaterial(String),

    #[error("scene defines {count} light sources but at most {max} are supported")]
    TooManyLights { count: usize, max: usize },

    #[error("mesh for {0:?} was drawn before it was loaded")]
    MeshNotLoaded(Shape),

    #[error("could not upload texture '{tag}': {reason}")]
    Upload { tag: String, reason: String },

    #[error("invalid scene description: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
