//! diorama
//!
//! Draws a static 3D diorama, by default a savanna scene, assembled from a
//! handful of primitive meshes. The scene itself is data: textures,
//! materials, lights and an ordered list of scaled, rotated and positioned
//! primitives. Each frame walks that list and issues one draw per object.
//!
//! High-level modules
//! - `scene`: scene files and the manager that prepares and draws them
//! - `camera`: camera, projection and keyboard controller
//! - `context`: window, surface, device and queue
//! - `data_structures`: transforms, primitive geometry and GPU textures
//! - `pipelines`: the WGSL scene pipeline and its uniform layouts
//! - `render`: the wgpu implementation of the scene's texture, uniform and mesh seams
//! - `resources`: image and file loading
//! - `flow`: the winit event loop
//! - `config`: application settings

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

pub use config::Config;
pub use error::SceneError;
pub use scene::{SceneDescription, SceneManager};
