//! toon-ngin
//!
//! A cross-platform toon shading demo built on wgpu, running natively and in
//! the browser through WASM. A single scene shows a cel shaded sphere with an
//! inverted-hull outline on a checkered floor. Every shading coefficient can
//! be tuned live from an egui panel.
//!
//! High-level modules
//! - `camera`: orbit camera, its controller and the view/projection uniform
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: meshes, procedural primitives, instances and textures
//! - `flow`: the app lifecycle and the [`GraphicsFlow`](flow::GraphicsFlow) hooks
//! - `gui`: egui overlay and frame statistics
//! - `pipelines`: toon, outline, standard and light helper pipelines
//! - `render`: render composition for efficient pipeline reuse
//! - `resources`: asset loading for native and web builds
//! - `scene`: the demo scene and its configuration
//! - `shading`: the toon shading model and its parameters
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod gui;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod shading;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

/// Browser entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    scene::run().map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{e:#}")))
}
