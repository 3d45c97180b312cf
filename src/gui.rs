//! Debug GUI overlay: egui fed by winit events and drawn with egui-wgpu in its
//! own render pass on top of the scene.

use instant::Duration;
use winit::{event::WindowEvent, window::Window};

/// How often the displayed frame rate is refreshed.
pub const FPS_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Frame rate averaged over [`FPS_UPDATE_INTERVAL`].
#[derive(Debug, Default, Clone)]
pub struct FpsCounter {
    frame_count: u32,
    elapsed: Duration,
    fps: f32,
    frame_time: Duration,
}

impl FpsCounter {
    pub fn tick(&mut self, dt: Duration) {
        self.frame_count += 1;
        self.elapsed += dt;
        if self.elapsed >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.elapsed.as_secs_f32();
            self.frame_time = self.elapsed / self.frame_count;
            self.frame_count = 0;
            self.elapsed = Duration::ZERO;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }
}

pub struct Gui {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    pub fps: FpsCounter,
}

impl std::fmt::Debug for Gui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui").field("fps", &self.fps).finish_non_exhaustive()
    }
}

impl Gui {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, window: &Window) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());
        Self {
            ctx,
            state,
            renderer,
            fps: FpsCounter::default(),
        }
    }

    /// Feed a window event to egui. Returns true if egui consumed it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// True while the pointer hovers or drags a GUI element.
    pub fn wants_pointer(&self) -> bool {
        self.ctx.wants_pointer_input() || self.ctx.is_pointer_over_area()
    }

    fn stats_panel(ctx: &egui::Context, fps: &FpsCounter) {
        egui::Window::new("Stats")
            .title_bar(false)
            .resizable(false)
            .fixed_pos(egui::pos2(10.0, 10.0))
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(format!("{:.0} FPS", fps.fps()))
                        .size(20.0)
                        .color(egui::Color32::from_rgb(74, 158, 255)),
                );
                ui.label(
                    egui::RichText::new(format!("{:.2} ms", fps.frame_time().as_secs_f64() * 1000.0))
                        .size(12.0)
                        .color(egui::Color32::GRAY),
                );
            });
    }

    /// Run one GUI frame and record it into `encoder` on top of `view`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        window: &Window,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        mut run_ui: impl FnMut(&egui::Context),
    ) {
        let raw_input = self.state.take_egui_input(window);
        let fps = &self.fps;
        let full_output = self.ctx.run(raw_input, |ctx| {
            Self::stats_panel(ctx, fps);
            run_ui(ctx);
        });
        self.state.handle_platform_output(window, full_output.platform_output);

        let tris = self.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: full_output.pixels_per_point,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            // egui-wgpu wants a 'static pass; the encoder stays untouched until it is dropped
            let mut render_pass = render_pass.forget_lifetime();
            self.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
