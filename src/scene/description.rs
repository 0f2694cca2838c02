//! Scene files.
//!
//! A scene is plain data: the textures and materials it uses, its lights, and
//! the objects to draw in order. Scene files are RON; the savanna diorama ships
//! inside the binary.

use std::{collections::HashSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    data_structures::transform::Transform,
    error::SceneError,
    resources::load_string,
    scene::{
        lighting::Lighting,
        material::ObjectMaterial,
        meshes::Shape,
        texture_registry::MAX_TEXTURE_SLOTS,
    },
};

const SAVANNA: &str = include_str!("../../assets/savanna.ron");

/// An image file bound to a tag.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextureSource {
    pub tag: String,
    /// Relative to the asset directory.
    pub path: String,
    /// Flat colour drawn in place of the texture if the image is unavailable.
    #[serde(default)]
    pub fallback_color: Option<[f32; 4]>,
}

/// What an object's surface shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Surface {
    Texture(String),
    Color([f32; 4]),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub scale: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    pub position: [f32; 3],
    pub surface: Surface,
    #[serde(default)]
    pub uv_scale: Option<[f32; 2]>,
    #[serde(default)]
    pub material: Option<String>,
}

impl SceneObject {
    pub fn transform(&self) -> Transform {
        Transform::from_parts(self.scale, self.rotation, self.position)
    }
}

/// Objects that together make up one thing in the scene, like an animal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<SceneObject>,
}

/// A reference from an object to a texture or material the scene doesn't define.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DanglingReference {
    Texture { object: String, tag: String },
    Material { object: String, tag: String },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub textures: Vec<TextureSource>,
    #[serde(default)]
    pub materials: Vec<ObjectMaterial>,
    #[serde(default)]
    pub lighting: Lighting,
    #[serde(default)]
    pub groups: Vec<ObjectGroup>,
}

impl SceneDescription {
    /// The savanna diorama bundled with the crate.
    pub fn savanna() -> Result<Self, SceneError> {
        Self::from_ron(SAVANNA)
    }

    pub fn from_ron(text: &str) -> Result<Self, SceneError> {
        let description: Self = ron::from_str(text)?;
        description.validate()?;
        Ok(description)
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = load_string(path)?;
        let description = Self::from_ron(&text)?;
        log::info!(
            "Loaded scene {} with {} objects in {} groups",
            path.display(),
            description.object_count(),
            description.groups.len()
        );
        Ok(description)
    }

    /// Checks the limits and uniqueness rules the scene manager relies on.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.textures.len() > MAX_TEXTURE_SLOTS {
            let tag = self.textures[MAX_TEXTURE_SLOTS].tag.clone();
            return Err(SceneError::TextureSlotsExhausted {
                tag,
                capacity: MAX_TEXTURE_SLOTS,
            });
        }
        let mut texture_tags = HashSet::new();
        for texture in &self.textures {
            if !texture_tags.insert(texture.tag.as_str()) {
                return Err(SceneError::DuplicateTexture(texture.tag.clone()));
            }
        }
        let mut material_tags = HashSet::new();
        for material in &self.materials {
            if !material_tags.insert(material.tag.as_str()) {
                return Err(SceneError::DuplicateMaterial(material.tag.clone()));
            }
        }
        self.lighting.validate()
    }

    /// Objects whose texture or material tag is not defined in this scene.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for object in self.objects() {
            if let Surface::Texture(tag) = &object.surface {
                if self.texture_source(tag).is_none() {
                    dangling.push(DanglingReference::Texture {
                        object: object.name.clone(),
                        tag: tag.clone(),
                    });
                }
            }
            if let Some(tag) = &object.material {
                if !self.materials.iter().any(|material| &material.tag == tag) {
                    dangling.push(DanglingReference::Material {
                        object: object.name.clone(),
                        tag: tag.clone(),
                    });
                }
            }
        }
        dangling
    }

    pub fn texture_source(&self, tag: &str) -> Option<&TextureSource> {
        self.textures.iter().find(|texture| texture.tag == tag)
    }

    /// All objects in drawing order.
    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.groups.iter().flat_map(|group| group.objects.iter())
    }

    pub fn object_count(&self) -> usize {
        self.groups.iter().map(|group| group.objects.len()).sum()
    }

    pub fn group(&self, name: &str) -> Option<&ObjectGroup> {
        self.groups.iter().find(|group| group.name == name)
    }
}
