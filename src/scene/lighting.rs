//! Scene light sources.

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    error::SceneError,
    scene::uniforms::{self, LightField, ShaderUniforms, light_uniform},
};

/// Light sources the scene shader has room for.
pub const MAX_LIGHT_SOURCES: usize = 4;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    pub position: [f32; 3],
    #[serde(default)]
    pub ambient_color: [f32; 3],
    #[serde(default)]
    pub diffuse_color: [f32; 3],
    #[serde(default)]
    pub specular_color: [f32; 3],
    #[serde(default)]
    pub focal_strength: f32,
    #[serde(default)]
    pub specular_intensity: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    #[serde(default = "enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub global_ambient: [f32; 3],
    #[serde(default)]
    pub sources: Vec<LightSource>,
}

fn enabled() -> bool {
    true
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            enabled: true,
            global_ambient: [0.0; 3],
            sources: Vec::new(),
        }
    }
}

impl Lighting {
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.sources.len() > MAX_LIGHT_SOURCES {
            return Err(SceneError::TooManyLights {
                count: self.sources.len(),
                max: MAX_LIGHT_SOURCES,
            });
        }
        Ok(())
    }

    /// Pushes the lighting switch, the global ambient colour and every light
    /// slot. Slots without a source are zeroed so nothing stale stays lit.
    pub fn apply<S: ShaderUniforms + ?Sized>(&self, shader: &mut S) -> Result<(), SceneError> {
        self.validate()?;
        shader.set_bool(uniforms::USE_LIGHTING, self.enabled);
        shader.set_vec3(uniforms::GLOBAL_AMBIENT_COLOR, self.global_ambient.into());

        let unused = LightSource::default();
        for index in 0..MAX_LIGHT_SOURCES {
            let source = self.sources.get(index).unwrap_or(&unused);
            let vec3 = |v: [f32; 3]| Vector3::from(v);
            shader.set_vec3(&light_uniform(index, LightField::Position), vec3(source.position));
            shader.set_vec3(
                &light_uniform(index, LightField::AmbientColor),
                vec3(source.ambient_color),
            );
            shader.set_vec3(
                &light_uniform(index, LightField::DiffuseColor),
                vec3(source.diffuse_color),
            );
            shader.set_vec3(
                &light_uniform(index, LightField::SpecularColor),
                vec3(source.specular_color),
            );
            shader.set_float(
                &light_uniform(index, LightField::FocalStrength),
                source.focal_strength,
            );
            shader.set_float(
                &light_uniform(index, LightField::SpecularIntensity),
                source.specular_intensity,
            );
        }
        log::debug!(
            "Lighting {} with {} source(s)",
            if self.enabled { "enabled" } else { "disabled" },
            self.sources.len()
        );
        Ok(())
    }
}
