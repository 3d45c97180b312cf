//! GPU side of the toon material.
//!
//! [`ToonUniform`] mirrors the `ToonMaterial` struct in `toon.wgsl`. It is
//! rebuilt from [`ShadingParams`] whenever the scene uploads, so GUI edits
//! reach the shader on the next frame.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{self, PipelineSettings},
    shading::ShadingParams,
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ToonUniform {
    pub color: [f32; 3],
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub glossiness: f32,
    pub rim_amount: f32,
    pub rim_threshold: f32,
    pub banding: f32,
    pub style: u32,
    pub flat_shading: u32,
}

impl From<&ShadingParams> for ToonUniform {
    fn from(params: &ShadingParams) -> Self {
        let params = params.clamped();
        Self {
            color: params.color,
            ambient: params.ambient,
            diffuse: params.diffuse,
            specular: params.specular,
            glossiness: params.glossiness,
            rim_amount: params.rim_amount,
            rim_threshold: params.rim_threshold,
            banding: params.banding,
            style: params.style.as_raw(),
            flat_shading: params.flat_shading as u32,
        }
    }
}

/// Uniform buffer and bind group of one toon material instance.
#[derive(Debug)]
pub struct ToonMaterial {
    pub uniform: ToonUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl ToonMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, params: &ShadingParams) -> Self {
        let uniform = ToonUniform::from(params);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Toon Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = basic::mk_uniform_bind_group(device, layout, &buffer, "toon_material_bind_group");
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }

    /// Upload `params` if they differ from what the GPU already has.
    /// Returns whether a write happened.
    pub fn write(&mut self, queue: &wgpu::Queue, params: &ShadingParams) -> bool {
        let uniform = ToonUniform::from(params);
        if uniform == self.uniform {
            return false;
        }
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        true
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    basic::mk_uniform_layout(device, "toon_material_bind_group_layout", wgpu::ShaderStages::FRAGMENT)
}

pub fn mk_toon_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    light_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Toon Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("toon.wgsl").into()),
    };
    basic::mk_render_pipeline(
        device,
        &PipelineSettings {
            label: "Toon",
            color_format: format,
            depth_format: Some(Texture::DEPTH_FORMAT),
            cull_mode: Some(wgpu::Face::Back),
            bind_group_layouts: &[camera_layout, light_layout, material_layout],
        },
        &basic::instanced_vertex_layouts(),
        shader,
    )
}
