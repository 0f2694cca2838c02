//! Engine data structures: transforms, primitive geometry and GPU textures.
//!
//! - `transform` composes scale, rotation and translation into model matrices
//! - `shape` builds the vertex and index data of every primitive shape
//! - `texture` wraps GPU textures, depth buffers and their samplers

pub mod shape;
pub mod texture;
pub mod transform;
