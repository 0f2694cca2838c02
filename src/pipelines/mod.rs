//! Render pipeline definitions.
//!
//! The diorama draws every primitive with the single pipeline in `scene`.

pub mod scene;
