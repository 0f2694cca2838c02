//! The shader-uniform collaborator.
//!
//! Scene code never touches GPU buffers directly. It sets named values the
//! same way one would on a linked shader program, and the backend decides how
//! those values reach the GPU.

use cgmath::{Matrix4, Vector2, Vector3, Vector4};

pub const MODEL: &str = "model";
pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const VIEW_POSITION: &str = "viewPosition";
pub const OBJECT_COLOR: &str = "objectColor";
pub const OBJECT_TEXTURE: &str = "objectTexture";
pub const USE_TEXTURE: &str = "bUseTexture";
pub const USE_LIGHTING: &str = "bUseLighting";
pub const UV_SCALE: &str = "UVscale";
pub const GLOBAL_AMBIENT_COLOR: &str = "globalAmbientColor";

pub const MATERIAL_AMBIENT_COLOR: &str = "material.ambientColor";
pub const MATERIAL_AMBIENT_STRENGTH: &str = "material.ambientStrength";
pub const MATERIAL_DIFFUSE_COLOR: &str = "material.diffuseColor";
pub const MATERIAL_SPECULAR_COLOR: &str = "material.specularColor";
pub const MATERIAL_SHININESS: &str = "material.shininess";

/// Per-light fields, addressed as `lightSources[i].<field>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightField {
    Position,
    AmbientColor,
    DiffuseColor,
    SpecularColor,
    FocalStrength,
    SpecularIntensity,
}

impl LightField {
    pub const ALL: [LightField; 6] = [
        LightField::Position,
        LightField::AmbientColor,
        LightField::DiffuseColor,
        LightField::SpecularColor,
        LightField::FocalStrength,
        LightField::SpecularIntensity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LightField::Position => "position",
            LightField::AmbientColor => "ambientColor",
            LightField::DiffuseColor => "diffuseColor",
            LightField::SpecularColor => "specularColor",
            LightField::FocalStrength => "focalStrength",
            LightField::SpecularIntensity => "specularIntensity",
        }
    }
}

/// Uniform name of `field` on light source `index`.
pub fn light_uniform(index: usize, field: LightField) -> String {
    format!("lightSources[{}].{}", index, field.name())
}

/// Inverse of [`light_uniform`].
pub fn parse_light_uniform(name: &str) -> Option<(usize, LightField)> {
    let rest = name.strip_prefix("lightSources[")?;
    let (index, field) = rest.split_once("].")?;
    let index = index.parse().ok()?;
    let field = LightField::ALL.into_iter().find(|f| f.name() == field)?;
    Some((index, field))
}

/// A typed uniform value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Mat4(Matrix4<f32>),
    /// Texture unit a sampler reads from.
    Sampler2D(i32),
}

/// Sets named shader values for the next draw command.
///
/// Values persist until overwritten, so anything not set for an object is
/// inherited from the previously drawn one.
pub trait ShaderUniforms {
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec2(&mut self, name: &str, value: Vector2<f32>) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec4(&mut self, name: &str, value: Vector4<f32>) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    fn set_sampler2d(&mut self, name: &str, unit: i32) {
        self.set_uniform(name, UniformValue::Sampler2D(unit));
    }
}
