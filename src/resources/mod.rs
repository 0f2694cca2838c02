use std::path::Path;

use crate::error::SceneError;

/**
 * This module contains all logic for loading scene data and images from external files.
 */
pub mod texture;

pub fn load_string(path: &Path) -> Result<String, SceneError> {
    std::fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_binary(path: &Path) -> Result<Vec<u8>, SceneError> {
    std::fs::read(path).map_err(|source| SceneError::Io {
        path: path.to_path_buf(),
        source,
    })
}
