use cgmath::{InnerSpace, Vector3};
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{Mesh, ModelVertex, Vertex},
        primitives::Geometry,
        texture::Texture,
    },
    pipelines::basic::{self, PipelineSettings},
    shading::DirectionalLight,
};

/// Number of directional lights the shaders loop over.
pub const MAX_LIGHTS: usize = 4;

/// Edge length of the helper cube drawn at each light.
pub const HELPER_SIZE: f32 = 0.5;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightRaw {
    /// Unit vector from the scene towards the light.
    direction: [f32; 3],
    intensity: f32,
    color: [f32; 3],
    // Uniforms require 16 byte (4 float) spacing
    _padding: u32,
    /// Where the helper is drawn.
    position: [f32; 3],
    _padding2: u32,
}

impl LightRaw {
    pub fn new(light: &DirectionalLight, position: Vector3<f32>) -> Self {
        let direction = if light.direction.magnitude2() > f32::EPSILON {
            light.direction.normalize()
        } else {
            Vector3::new(0.0, 0.0, 0.0)
        };
        Self {
            direction: direction.into(),
            intensity: light.intensity,
            color: light.color.into(),
            _padding: 0,
            position: position.into(),
            _padding2: 0,
        }
    }

    pub fn direction(&self) -> [f32; 3] {
        self.direction
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    lights: [LightRaw; MAX_LIGHTS],
    count: u32,
    _padding: [u32; 3],
}

impl LightUniform {
    /// Packs the first [`MAX_LIGHTS`] lights, the rest are dropped.
    pub fn new(lights: impl IntoIterator<Item = LightRaw>) -> Self {
        let mut uniform = Self::default();
        for (slot, light) in uniform.lights.iter_mut().zip(lights) {
            *slot = light;
            uniform.count += 1;
        }
        uniform
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn lights(&self) -> &[LightRaw] {
        &self.lights[..self.count as usize]
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        bytemuck::Zeroable::zeroed()
    }
}

/// The lights uniform plus the helper cube mesh drawn at every light.
#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub helper: Mesh,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = LightUniform::default();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Light Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = basic::mk_uniform_bind_group(device, &bind_group_layout, &buffer, "light_bind_group");
        let helper = Mesh::new(
            device,
            "light_helper",
            &Geometry::cuboid(HELPER_SIZE, HELPER_SIZE, HELPER_SIZE),
        );
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
            helper,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, uniform: LightUniform) {
        self.uniform = uniform;
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
    }

    /// Draw one helper cube per light slot. Slots past `count` collapse in the
    /// vertex shader, so the draw call does not depend on the light count.
    pub fn draw_helpers(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_vertex_buffer(0, self.helper.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.helper.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.helper.num_elements, 0, 0..MAX_LIGHTS as u32);
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    basic::mk_uniform_layout(
        device,
        "light_bind_group_layout",
        wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
    )
}

pub fn mk_light_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    light_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Light Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("light.wgsl").into()),
    };
    basic::mk_render_pipeline(
        device,
        &PipelineSettings {
            label: "Light",
            color_format: format,
            depth_format: Some(Texture::DEPTH_FORMAT),
            cull_mode: Some(wgpu::Face::Back),
            bind_group_layouts: &[camera_layout, light_layout],
        },
        &[ModelVertex::desc()],
        shader,
    )
}
