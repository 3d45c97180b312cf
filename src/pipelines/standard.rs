//! Textured, diffuse-lit material used for the floor.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    pipelines::basic::{self, PipelineSettings},
};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StandardUniform {
    /// Linear base color, multiplied with the texture.
    color: [f32; 3],
    _padding: u32,
    /// Linear ambient light color.
    ambient: [f32; 3],
    _padding2: u32,
    /// Texture repeats across each face.
    uv_scale: [f32; 2],
    _padding3: [u32; 2],
}

impl StandardUniform {
    pub fn new(color: [f32; 3], ambient: [f32; 3], uv_scale: [f32; 2]) -> Self {
        Self {
            color,
            _padding: 0,
            ambient,
            _padding2: 0,
            uv_scale,
            _padding3: [0; 2],
        }
    }
}

#[derive(Debug)]
pub struct StandardMaterial {
    pub uniform: StandardUniform,
    pub buffer: wgpu::Buffer,
    pub texture: Texture,
    pub bind_group: wgpu::BindGroup,
}

impl StandardMaterial {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform: StandardUniform,
        texture: Texture,
    ) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Standard Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
            label: Some("standard_material_bind_group"),
        });
        Self {
            uniform,
            buffer,
            texture,
            bind_group,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
        label: Some("standard_material_bind_group_layout"),
    })
}

pub fn mk_standard_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    light_layout: &wgpu::BindGroupLayout,
    material_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Standard Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("standard.wgsl").into()),
    };
    basic::mk_render_pipeline(
        device,
        &PipelineSettings {
            label: "Standard",
            color_format: format,
            depth_format: Some(Texture::DEPTH_FORMAT),
            cull_mode: Some(wgpu::Face::Back),
            bind_group_layouts: &[camera_layout, light_layout, material_layout],
        },
        &basic::instanced_vertex_layouts(),
        shader,
    )
}
