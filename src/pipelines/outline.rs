//! Inverted-hull outlines: the mesh is drawn again, slightly larger, with its
//! front faces culled so only the back side shows around the silhouette.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{self, PipelineSettings},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct OutlineUniform {
    pub color: [f32; 4],
}

#[derive(Debug)]
pub struct OutlineMaterial {
    pub uniform: OutlineUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl OutlineMaterial {
    pub fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, color: [f32; 3]) -> Self {
        let uniform = OutlineUniform {
            color: [color[0], color[1], color[2], 1.0],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Outline Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = basic::mk_uniform_bind_group(device, layout, &buffer, "outline_material_bind_group");
        Self {
            uniform,
            buffer,
            bind_group,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    basic::mk_uniform_layout(device, "outline_material_bind_group_layout", wgpu::ShaderStages::FRAGMENT)
}

pub fn mk_outline_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Outline Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("outline.wgsl").into()),
    };
    basic::mk_render_pipeline(
        device,
        &PipelineSettings {
            label: "Outline",
            color_format: format,
            depth_format: Some(Texture::DEPTH_FORMAT),
            cull_mode: Some(wgpu::Face::Front),
            bind_group_layouts: &[camera_layout, material_layout],
        },
        &basic::instanced_vertex_layouts(),
        shader,
    )
}
