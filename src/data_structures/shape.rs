//! Procedural geometry for the primitive shapes.
//!
//! Every scene object is one of a handful of unit primitives that the scene
//! data scales, rotates and positions. The conventions below are the ones the
//! savanna scene was authored against:
//!
//! - plane: XZ square from -1 to 1 facing +Y
//! - sphere: radius 1 around the origin
//! - cylinder: radius 1, from Y = 0 up to Y = 1, both caps
//! - cone: base radius 1 at Y = 0, apex at Y = 1, base cap only
//! - tapered cylinder: radius 1 at Y = 0 narrowing to 0.5 at Y = 1
//! - box: unit cube around the origin
//! - prism: triangle in XY (apex at Y = 0.5) extruded from Z = -0.5 to 0.5

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector3};

use crate::scene::meshes::Shape;

const SPHERE_STACKS: u32 = 24;
const ROUND_SECTORS: u32 = 36;
const TAPERED_TOP_RADIUS: f32 = 0.5;

/// Vertex layout shared by all primitives.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ShapeVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Indexed triangle list for one primitive.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<ShapeVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(ShapeVertex {
            position,
            normal,
            tex_coords,
        });
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Four corners in counter-clockwise order seen from the side `normal`
    /// points to, starting at the corner that maps to UV (0, 0).
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3]) {
        let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let first = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.push_vertex(corner, normal, uv);
        }
        self.push_triangle(first, first + 1, first + 2);
        self.push_triangle(first, first + 2, first + 3);
    }

    /// Axis-aligned bounds of all vertex positions as `(min, max)`.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for vertex in &self.vertices {
            for axis in 0..3 {
                min[axis] = min[axis].min(vertex.position[axis]);
                max[axis] = max[axis].max(vertex.position[axis]);
            }
        }
        (min, max)
    }
}

/// Builds the geometry for `shape`.
pub fn build(shape: Shape) -> MeshData {
    match shape {
        Shape::Plane => plane(),
        Shape::Sphere => sphere(SPHERE_STACKS, ROUND_SECTORS),
        Shape::Cylinder => frustum(1.0, 1.0, ROUND_SECTORS),
        Shape::Cone => frustum(1.0, 0.0, ROUND_SECTORS),
        Shape::TaperedCylinder => frustum(1.0, TAPERED_TOP_RADIUS, ROUND_SECTORS),
        Shape::Box => cube(),
        Shape::Prism => prism(),
    }
}

fn plane() -> MeshData {
    let mut mesh = MeshData::default();
    mesh.push_quad(
        [
            [-1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, -1.0],
            [-1.0, 0.0, -1.0],
        ],
        [0.0, 1.0, 0.0],
    );
    mesh
}

fn sphere(stacks: u32, sectors: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for stack in 0..=stacks {
        // polar angle, 0 at +Y
        let phi = PI * stack as f32 / stacks as f32;
        for sector in 0..=sectors {
            let theta = 2.0 * PI * sector as f32 / sectors as f32;
            let position = [
                phi.sin() * theta.cos(),
                phi.cos(),
                -phi.sin() * theta.sin(),
            ];
            let uv = [
                sector as f32 / sectors as f32,
                1.0 - stack as f32 / stacks as f32,
            ];
            mesh.push_vertex(position, normalized(position), uv);
        }
    }
    let row = sectors + 1;
    for stack in 0..stacks {
        for sector in 0..sectors {
            let top = stack * row + sector;
            let bottom = top + row;
            if stack != 0 {
                mesh.push_triangle(top, bottom, top + 1);
            }
            if stack != stacks - 1 {
                mesh.push_triangle(top + 1, bottom, bottom + 1);
            }
        }
    }
    mesh
}

/// Round solid between Y = 0 and Y = 1 whose radius goes from `bottom` to
/// `top`. A zero radius end is closed by the side itself and gets no cap.
fn frustum(bottom: f32, top: f32, sectors: u32) -> MeshData {
    let mut mesh = MeshData::default();
    // outward side normals lean up by the slope of the silhouette
    let slope = bottom - top;
    for sector in 0..=sectors {
        let theta = 2.0 * PI * sector as f32 / sectors as f32;
        let (sin, cos) = theta.sin_cos();
        let normal = normalized([cos, slope, -sin]);
        let u = sector as f32 / sectors as f32;
        mesh.push_vertex([bottom * cos, 0.0, -bottom * sin], normal, [u, 0.0]);
        mesh.push_vertex([top * cos, 1.0, -top * sin], normal, [u, 1.0]);
    }
    for sector in 0..sectors {
        let base = sector * 2;
        mesh.push_triangle(base, base + 2, base + 1);
        mesh.push_triangle(base + 1, base + 2, base + 3);
    }
    if bottom > 0.0 {
        push_cap(&mut mesh, bottom, 0.0, false, sectors);
    }
    if top > 0.0 {
        push_cap(&mut mesh, top, 1.0, true, sectors);
    }
    mesh
}

fn push_cap(mesh: &mut MeshData, radius: f32, height: f32, facing_up: bool, sectors: u32) {
    let normal = if facing_up {
        [0.0, 1.0, 0.0]
    } else {
        [0.0, -1.0, 0.0]
    };
    let center = mesh.push_vertex([0.0, height, 0.0], normal, [0.5, 0.5]);
    let first = center + 1;
    for sector in 0..=sectors {
        let theta = 2.0 * PI * sector as f32 / sectors as f32;
        let (sin, cos) = theta.sin_cos();
        mesh.push_vertex(
            [radius * cos, height, -radius * sin],
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        );
    }
    for sector in 0..sectors {
        let current = first + sector;
        if facing_up {
            mesh.push_triangle(center, current, current + 1);
        } else {
            mesh.push_triangle(center, current + 1, current);
        }
    }
}

fn cube() -> MeshData {
    let mut mesh = MeshData::default();
    let h = 0.5;
    // +Z, -Z, +X, -X, +Y, -Y
    mesh.push_quad(
        [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
        [0.0, 0.0, 1.0],
    );
    mesh.push_quad(
        [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
        [0.0, 0.0, -1.0],
    );
    mesh.push_quad(
        [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
        [1.0, 0.0, 0.0],
    );
    mesh.push_quad(
        [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        [-1.0, 0.0, 0.0],
    );
    mesh.push_quad(
        [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
        [0.0, 1.0, 0.0],
    );
    mesh.push_quad(
        [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        [0.0, -1.0, 0.0],
    );
    mesh
}

fn prism() -> MeshData {
    let mut mesh = MeshData::default();
    let h = 0.5;
    let left = [-h, -h];
    let right = [h, -h];
    let apex = [0.0, h];

    for (z, normal) in [(h, [0.0, 0.0, 1.0]), (-h, [0.0, 0.0, -1.0])] {
        let a = mesh.push_vertex([left[0], left[1], z], normal, [0.0, 0.0]);
        let b = mesh.push_vertex([right[0], right[1], z], normal, [1.0, 0.0]);
        let c = mesh.push_vertex([apex[0], apex[1], z], normal, [0.5, 1.0]);
        if z > 0.0 {
            mesh.push_triangle(a, b, c);
        } else {
            mesh.push_triangle(a, c, b);
        }
    }

    // bottom, right slope, left slope
    mesh.push_quad(
        [
            [left[0], left[1], -h],
            [right[0], right[1], -h],
            [right[0], right[1], h],
            [left[0], left[1], h],
        ],
        [0.0, -1.0, 0.0],
    );
    let right_normal = normalized([apex[1] - right[1], right[0] - apex[0], 0.0]);
    mesh.push_quad(
        [
            [right[0], right[1], h],
            [right[0], right[1], -h],
            [apex[0], apex[1], -h],
            [apex[0], apex[1], h],
        ],
        right_normal,
    );
    let left_normal = [-right_normal[0], right_normal[1], 0.0];
    mesh.push_quad(
        [
            [apex[0], apex[1], h],
            [apex[0], apex[1], -h],
            [left[0], left[1], -h],
            [left[0], left[1], h],
        ],
        left_normal,
    );
    mesh
}

fn normalized(v: [f32; 3]) -> [f32; 3] {
    let v = Vector3::from(v);
    if v.magnitude2() == 0.0 {
        return [0.0, 1.0, 0.0];
    }
    v.normalize().into()
}
