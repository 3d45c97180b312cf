//! Camera, projection and the damped orbit controller.
//!
//! The camera always looks at a target point. [`CameraController`] orbits the
//! camera around that target on a sphere: dragging changes azimuth and polar
//! angle, the mouse wheel changes the radius. Input is accumulated as a pending
//! delta and bled into the camera over several frames.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3, perspective};
use instant::Duration;
use winit::event::{MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Keeps the camera off the poles where `look_at` degenerates.
const POLAR_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>, T: Into<Point3<f32>>>(position: P, target: T) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width.max(1) as f32 / height.max(1) as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }

    pub fn view_position(&self) -> [f32; 4] {
        self.view_position
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Damped orbit controls around [`Camera::target`].
#[derive(Debug)]
pub struct CameraController {
    rotate_speed: f32,
    damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    azimuth_delta: f32,
    polar_delta: f32,
    zoom_delta: f32,
}

impl CameraController {
    /// `rotate_speed` is in radians per pixel of mouse motion, `damping` is the
    /// share of the pending motion applied per 60 Hz frame (`0..=1`).
    pub fn new(rotate_speed: f32, damping: f32) -> Self {
        Self {
            rotate_speed,
            damping: damping.clamp(0.01, 1.0),
            min_distance: 1.0,
            max_distance: 500.0,
            azimuth_delta: 0.0,
            polar_delta: 0.0,
            zoom_delta: 0.0,
        }
    }

    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.azimuth_delta -= dx as f32 * self.rotate_speed;
        self.polar_delta -= dy as f32 * self.rotate_speed;
    }

    pub fn handle_scroll(&mut self, delta: &MouseScrollDelta) {
        self.zoom_delta += match delta {
            MouseScrollDelta::LineDelta(_, y) => y * 0.1,
            MouseScrollDelta::PixelDelta(position) => position.y as f32 * 0.002,
        };
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            self.handle_scroll(delta);
        }
    }

    /// True while there is still motion to bleed into the camera.
    pub fn is_moving(&self) -> bool {
        self.azimuth_delta.abs() > 1e-5 || self.polar_delta.abs() > 1e-5 || self.zoom_delta.abs() > 1e-5
    }

    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude();
        if radius <= f32::EPSILON {
            return;
        }

        // Frame-rate independent version of "apply damping * delta per frame".
        let frames = dt.as_secs_f32() * 60.0;
        let blend = 1.0 - (1.0 - self.damping).powf(frames);

        let azimuth = offset.x.atan2(offset.z) + self.azimuth_delta * blend;
        let polar = ((offset.y / radius).clamp(-1.0, 1.0).acos() + self.polar_delta * blend)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let radius = (radius * (-self.zoom_delta * blend).exp()).clamp(self.min_distance, self.max_distance);

        self.azimuth_delta *= 1.0 - blend;
        self.polar_delta *= 1.0 - blend;
        self.zoom_delta *= 1.0 - blend;

        let (sin_polar, cos_polar) = polar.sin_cos();
        let (sin_azimuth, cos_azimuth) = azimuth.sin_cos();
        camera.position = camera.target
            + Vector3::new(
                radius * sin_polar * sin_azimuth,
                radius * cos_polar,
                radius * sin_polar * cos_azimuth,
            );
    }
}

/// GPU side of the camera plus the controller driving it.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: CameraController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue, projection: &Projection) {
        self.uniform.update_view_proj(&self.camera, projection);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("camera_bind_group_layout"),
    })
}
