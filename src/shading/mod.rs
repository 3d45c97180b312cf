//! The toon shading model and its tunable parameters.
//!
//! - `toon` is the host-side reference of the per-fragment computation
//! - `params` holds [`ShadingParams`] and the GUI ranges it is clamped to
//! - `color` converts authored sRGB colors into the linear space the model uses

pub mod color;
pub mod params;
pub mod toon;

pub use params::ShadingParams;
pub use toon::{DirectionalLight, Fragment, ToonStyle, shade};
