//! Named material records for the lighting model.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// How a surface responds to the scene lights.
///
/// Fields left out of a scene file default to zero, which switches that term
/// of the lighting model off.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectMaterial {
    pub tag: String,
    #[serde(default)]
    pub ambient_color: [f32; 3],
    #[serde(default)]
    pub ambient_strength: f32,
    #[serde(default)]
    pub diffuse_color: [f32; 3],
    #[serde(default)]
    pub specular_color: [f32; 3],
    #[serde(default)]
    pub shininess: f32,
}

/// Ordered list of materials, looked up by tag.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: Vec<ObjectMaterial>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, material: ObjectMaterial) -> Result<(), SceneError> {
        if self.find(&material.tag).is_some() {
            return Err(SceneError::DuplicateMaterial(material.tag));
        }
        self.materials.push(material);
        Ok(())
    }

    pub fn find(&self, tag: &str) -> Option<&ObjectMaterial> {
        self.materials.iter().find(|material| material.tag == tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectMaterial> {
        self.materials.iter()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}
