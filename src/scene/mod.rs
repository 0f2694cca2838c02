//! Scene assembly.
//!
//! - `description` holds the serde model of a scene file and the bundled savanna scene
//! - `manager` prepares a scene and issues its per-frame draw commands
//! - `texture_registry`, `material` and `lighting` hold the tables the manager builds
//! - `uniforms` and `meshes` are the seams to whatever draws the scene

pub mod description;
pub mod lighting;
pub mod manager;
pub mod material;
pub mod meshes;
pub mod texture_registry;
pub mod uniforms;

pub use description::SceneDescription;
pub use manager::SceneManager;
