//! Scene data: meshes, procedural geometry, textures and instances.
//!
//! - `model` holds the vertex format and GPU meshes
//! - `primitives` generates spheres and boxes
//! - `texture` wraps depth and color textures
//! - `instance` holds per-instance transforms

pub mod instance;
pub mod model;
pub mod primitives;
pub mod texture;
