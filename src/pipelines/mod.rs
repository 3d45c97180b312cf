//! Render pipelines of the scene.
//!
//! All pipelines share the camera layout at group 0. The lit pipelines read the
//! lights at group 1 and their material at group 2; the outline pipeline only
//! needs the camera and its material at group 1.

pub mod basic;
pub mod light;
pub mod outline;
pub mod standard;
pub mod toon;

/// Material bind group layouts, handed to flows so they can build materials.
#[derive(Debug, Clone)]
pub struct MaterialLayouts {
    pub toon: wgpu::BindGroupLayout,
    pub standard: wgpu::BindGroupLayout,
    pub outline: wgpu::BindGroupLayout,
}

impl MaterialLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        Self {
            toon: toon::mk_bind_group_layout(device),
            standard: standard::mk_bind_group_layout(device),
            outline: outline::mk_bind_group_layout(device),
        }
    }
}

#[derive(Debug)]
pub struct Pipelines {
    pub toon: wgpu::RenderPipeline,
    pub standard: wgpu::RenderPipeline,
    pub outline: wgpu::RenderPipeline,
    pub light: wgpu::RenderPipeline,
    pub layouts: MaterialLayouts,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        camera_layout: &wgpu::BindGroupLayout,
        light_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let layouts = MaterialLayouts::new(device);
        Self {
            toon: toon::mk_toon_pipeline(device, format, camera_layout, light_layout, &layouts.toon),
            standard: standard::mk_standard_pipeline(device, format, camera_layout, light_layout, &layouts.standard),
            outline: outline::mk_outline_pipeline(device, format, camera_layout, &layouts.outline),
            light: light::mk_light_pipeline(device, format, camera_layout, light_layout),
            layouts,
        }
    }
}
