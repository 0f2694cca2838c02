//! Per-object model transforms.
//!
//! A scene object is placed with a non-uniform scale, three Euler rotations in
//! degrees and a translation. The rotations are applied X first, then Y, then
//! Z, so the composed model matrix is `T * Rz * Ry * Rx * S`.

use cgmath::{Deg, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3};

/// Scale, rotation (degrees about X, Y and Z) and position of one drawn mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub position: Vector3<f32>,
}

impl Transform {
    /// Identity transform: unit scale, no rotation, at the origin.
    pub fn new() -> Self {
        Self {
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            position: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn from_parts(scale: [f32; 3], rotation: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            scale: scale.into(),
            rotation: rotation.into(),
            position: position.into(),
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_z(Deg(self.rotation.z))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Inverse-transpose of the upper 3x3 block, used to transform normals
    /// under non-uniform scale.
    pub fn normal_matrix(&self) -> Matrix3<f32> {
        normal_matrix(&self.to_matrix())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Inverse-transpose of the upper 3x3 block of `model`.
///
/// A degenerate block (a zero scale axis) has no inverse; identity is returned
/// so lighting stays finite.
pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix3<f32> {
    let upper = Matrix3::from_cols(
        model.x.truncate(),
        model.y.truncate(),
        model.z.truncate(),
    );
    upper
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or_else(Matrix3::identity)
}
