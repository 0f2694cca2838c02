//! The mesh-primitive collaborator.

use serde::{Deserialize, Serialize};

use crate::error::SceneError;

/// The primitive shapes a scene object can be drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Shape {
    Plane,
    Sphere,
    Cylinder,
    Cone,
    TaperedCylinder,
    Box,
    Prism,
}

impl Shape {
    /// Every shape, in the order the meshes are loaded.
    pub const ALL: [Shape; 7] = [
        Shape::Plane,
        Shape::Sphere,
        Shape::Cylinder,
        Shape::Cone,
        Shape::TaperedCylinder,
        Shape::Box,
        Shape::Prism,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Plane => "plane",
            Shape::Sphere => "sphere",
            Shape::Cylinder => "cylinder",
            Shape::Cone => "cone",
            Shape::TaperedCylinder => "tapered cylinder",
            Shape::Box => "box",
            Shape::Prism => "prism",
        }
    }
}

/// Loads primitive meshes once and draws them with whatever transform and
/// surface state was last pushed through [`ShaderUniforms`](super::uniforms::ShaderUniforms).
///
/// Only one copy of each mesh is needed no matter how often it is drawn.
pub trait ShapeMeshes {
    fn load_mesh(&mut self, shape: Shape) -> Result<(), SceneError>;

    /// Fails with [`SceneError::MeshNotLoaded`] if `shape` was never loaded.
    fn draw_mesh(&mut self, shape: Shape) -> Result<(), SceneError>;
}
