//! Flow control and application event loop.
//!
//! A "flow" is a scene or state that handles input, updates itself and hands
//! renderables to the engine each frame. The engine owns the window, the GPU
//! context and the GUI overlay, and drives every flow through the same hooks.
//!
//! # Lifecycle
//!
//! Each frame:
//! 1. Window events go to the GUI first, unconsumed ones to the camera and flows
//! 2. The scene pass renders every flow's [`Render`] batched per pipeline
//! 3. The GUI pass draws the stats panel and each flow's [`GraphicsFlow::on_gui`]
//! 4. The frame is presented
//! 5. `on_tick` runs every `tick_duration_millis`, then the camera and
//!    `on_update` advance by the frame time

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use instant::{Duration, Instant};

#[cfg(feature = "integration-tests")]
use tokio::runtime::Runtime;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, InitContext, MouseButtonState},
    data_structures::texture::Texture,
    gui::Gui,
    render::{Batches, Render},
};

/// Output of every lifecycle hook.
///
/// `Out::Configure` modifies the [`Context`] at runtime, for instance to change
/// the tick speed, the clear colour or to upload to context owned buffers.
///
/// `Out::Empty` is the default when nothing needs to change.
#[derive(Default)]
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    #[default]
    Empty,
}

impl Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Out::Configure(_) => f.write_str("Configure(|&mut Context| {...})"),
            Out::Empty => f.write_str("Empty"),
        }
    }
}

#[cfg(feature = "integration-tests")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTestResult {
    Passed,
    Waiting,
    Failed,
}

/// A renderable scene or state driven by the engine.
///
/// 1. `on_init()` is called once after construction; configure the context here
/// 2. `on_window_events()` and `on_device_events()` are called for each input
///    event egui did not consume
/// 3. `on_gui()` is called each frame inside the GUI pass
/// 4. `on_render()` is called each frame and returns what to draw
/// 5. `on_tick()` is called every `tick_duration_millis`
/// 6. `on_update()` is called every frame with the frame time
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    fn on_init(&mut self, ctx: &mut Context, state: &mut S) -> Out;

    /// Update state every frame.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out;

    /// Update state periodically.
    fn on_tick(&mut self, _ctx: &Context, _state: &mut S) -> Out {
        Out::Empty
    }

    /// Handle raw device events.
    fn on_device_events(&mut self, _ctx: &Context, _state: &mut S, _event: &DeviceEvent) -> Out {
        Out::Empty
    }

    /// Handle window events egui did not consume.
    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    /// Build this flow's GUI controls.
    fn on_gui(&mut self, _gui: &egui::Context, _state: &mut S) -> Out {
        Out::Empty
    }

    /// Return renderable objects for this flow.
    fn on_render<'pass>(&self) -> Render<'_, 'pass>;

    /// Inspect the offscreen frame. Returning `Passed` from every flow ends the run.
    #[cfg(feature = "integration-tests")]
    fn render_to_texture(
        &self,
        _ctx: &Context,
        _state: &mut S,
        _texture: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> anyhow::Result<ImageTestResult> {
        Ok(ImageTestResult::Passed)
    }
}

impl<S> Debug for dyn GraphicsFlow<S> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Factory for a flow. Loading may fail, in which case the app logs the error
/// and exits.
pub type FlowConstructor<S> =
    Box<dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>>;

/// GPU context, GUI, app state and surface status.
#[derive(Debug)]
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    gui: Gui,
    state: State,
    is_surface_configured: bool,
}

impl<State: Default> AppState<State> {
    async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let ctx = Context::new(window).await?;
        let gui = Gui::new(&ctx.device, ctx.config.format, &ctx.window);
        Ok(Self {
            ctx,
            gui,
            state: State::default(),
            is_surface_configured: false,
        })
    }
}

impl<State> AppState<State> {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx.surface.configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    #[cfg(feature = "integration-tests")]
    fn get_test_texture(&self, extent3d: wgpu::Extent3d) -> wgpu::Texture {
        self.ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Golden Image Test Output Texture"),
            size: extent3d,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.ctx.config.format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
    }

    /// Copies need rows aligned to 256 bytes, so the test target is padded up.
    #[cfg(feature = "integration-tests")]
    fn get_test_extent(&self) -> wgpu::Extent3d {
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT / 4;
        let pad = |v: u32| v.div_ceil(align) * align;
        wgpu::Extent3d {
            width: pad(self.ctx.config.width),
            height: pad(self.ctx.config.height),
            depth_or_array_layers: 1,
        }
    }

    fn render(
        &mut self,
        graphics_flows: &mut [Box<dyn GraphicsFlow<State>>],
        #[cfg(feature = "integration-tests")] async_runtime: &Runtime,
        #[cfg(feature = "integration-tests")] proxy: &winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    ) -> Result<Vec<Out>, wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        if !self.is_surface_configured {
            return Ok(Vec::new());
        }

        let output = self.ctx.surface.get_current_texture()?;
        #[cfg_attr(feature = "integration-tests", allow(unused_variables))]
        let surface_view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "integration-tests")]
        let (test_texture, test_depth) = {
            let extent = self.get_test_extent();
            let depth = Texture::create_depth_texture(&self.ctx.device, [extent.width, extent.height], "test_depth");
            (self.get_test_texture(extent), depth)
        };
        #[cfg(feature = "integration-tests")]
        let test_view = test_texture.create_view(&wgpu::TextureViewDescriptor::default());

        #[cfg(feature = "integration-tests")]
        let (view, depth_view) = (&test_view, &test_depth.view);
        #[cfg(not(feature = "integration-tests"))]
        let (view, depth_view) = (&surface_view, &self.ctx.depth_texture.view);

        let mut encoder = self.ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut batches = Batches::default();
            graphics_flows.iter().for_each(|flow| {
                flow.on_render().set_pipelines(&self.ctx, &mut render_pass, &mut batches);
            });
            batches.draw(&self.ctx, &mut render_pass);
        }

        #[allow(unused_mut)]
        let mut outs = Vec::new();
        // The offscreen test target carries no GUI.
        #[cfg(not(feature = "integration-tests"))]
        {
            let state = &mut self.state;
            self.gui.draw(
                &self.ctx.device,
                &self.ctx.queue,
                &mut encoder,
                &self.ctx.window,
                &surface_view,
                [self.ctx.config.width, self.ctx.config.height],
                |gui| {
                    for flow in graphics_flows.iter_mut() {
                        outs.push(flow.on_gui(gui, state));
                    }
                },
            );
        }

        #[cfg(feature = "integration-tests")]
        let output_buffer = {
            let u32_size = std::mem::size_of::<u32>() as u32;
            let extent = self.get_test_extent();
            let output_buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
                size: (u32_size * extent.width * extent.height) as wgpu::BufferAddress,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                label: Some("Golden Image Test Output Buffer"),
                mapped_at_creation: false,
            });
            encoder.copy_texture_to_buffer(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &test_texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                },
                wgpu::TexelCopyBufferInfo {
                    buffer: &output_buffer,
                    layout: wgpu::TexelCopyBufferLayout {
                        offset: 0,
                        bytes_per_row: Some(u32_size * extent.width),
                        rows_per_image: Some(extent.height),
                    },
                },
                extent,
            );
            output_buffer
        };

        self.ctx.queue.submit(iter::once(encoder.finish()));

        #[cfg(feature = "integration-tests")]
        {
            let extent = self.get_test_extent();
            let buffer_slice = output_buffer.slice(..);
            let fut_img = async {
                let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
                buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
                    tx.send(result).ok();
                });
                self.ctx.device.poll(wgpu::PollType::Wait {
                    submission_index: None,
                    timeout: Some(Duration::from_secs(3)),
                })?;
                rx.receive().await.ok_or_else(|| anyhow::anyhow!("mapping was cancelled"))??;
                let data = buffer_slice.get_mapped_range();
                image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(extent.width, extent.height, data)
                    .ok_or_else(|| anyhow::anyhow!("mapped buffer is smaller than the test image"))
            };
            let mut img = match async_runtime.block_on(fut_img) {
                Ok(img) => img,
                Err(e) => panic!("reading back the test frame failed: {e:#}"),
            };
            let state = &mut self.state;
            let results: Vec<_> = graphics_flows
                .iter_mut()
                .map(|flow| flow.render_to_texture(&self.ctx, state, &mut img))
                .collect();
            drop(img);
            let mut all_passed = true;
            for result in results {
                match result {
                    Err(e) => panic!("{e:#}"),
                    Ok(ImageTestResult::Failed) => panic!("Assertion failed"),
                    Ok(ImageTestResult::Waiting) => all_passed = false,
                    Ok(ImageTestResult::Passed) => (),
                }
            }
            if all_passed && proxy.send_event(FlowEvent::Exit).is_err() {
                panic!("All assertions passed but the event loop could not be told to exit");
            }
        }

        output.present();
        Ok(outs)
    }
}

pub struct App<State: 'static> {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    // Web initialization and golden-image tests report back through events.
    #[cfg(any(target_arch = "wasm32", feature = "integration-tests"))]
    proxy: winit::event_loop::EventLoopProxy<FlowEvent<State>>,
    state: Option<AppState<State>>,
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // Taken on the first `resumed`.
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
    time_since_tick: Duration,
}

impl<State: 'static> App<State> {
    #[cfg_attr(not(any(target_arch = "wasm32", feature = "integration-tests")), allow(unused_variables))]
    fn new(event_loop: &EventLoop<FlowEvent<State>>, constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            #[cfg(any(target_arch = "wasm32", feature = "integration-tests"))]
            proxy: event_loop.create_proxy(),
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
            time_since_tick: Duration::ZERO,
        })
    }

    fn start(&mut self, mut app_state: AppState<State>, flows: Vec<Box<dyn GraphicsFlow<State>>>) {
        self.graphics_flows = flows;
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(&mut app_state.ctx, out);
        }
        app_state.ctx.window.request_redraw();
        self.last_time = Instant::now();
        self.state = Some(app_state);
    }
}

pub(crate) enum FlowEvent<State: 'static> {
    // Only the web build initializes asynchronously.
    #[allow(dead_code)]
    Initialized {
        state: AppState<State>,
        flows: Vec<Box<dyn GraphicsFlow<State>>>,
    },
    #[allow(dead_code)]
    Rejected(anyhow::Error),
    #[allow(dead_code)]
    Exit,
}

impl<State> Debug for FlowEvent<State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Initialized { state: _, flows } => f.debug_struct("Initialized").field("flows", flows).finish(),
            Self::Rejected(e) => f.debug_tuple("Rejected").field(e).finish(),
            Self::Exit => f.write_str("Exit"),
        }
    }
}

async fn initialize<State: Default + 'static>(
    window: Arc<Window>,
    constructors: Vec<FlowConstructor<State>>,
) -> anyhow::Result<(AppState<State>, Vec<Box<dyn GraphicsFlow<State>>>)> {
    let app_state = AppState::new(window).await?;
    let flow_futures: Vec<_> = constructors
        .into_iter()
        .map(|constructor| constructor((&app_state.ctx).into()))
        .collect();
    let flows = futures::future::join_all(flow_futures)
        .await
        .into_iter()
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok((app_state, flows))
}

impl<State: 'static + Default> ApplicationHandler<FlowEvent<State>> for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(constructors) = self.constructors.take() else {
            return;
        };

        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("toon-ngin");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes = window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("no element with id `{CANVAS_ID}`, winit creates its own canvas"),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Cannot create a window: {e}");
                event_loop.exit();
                return;
            }
        };

        let init_future = initialize::<State>(window, constructors);

        #[cfg(not(target_arch = "wasm32"))]
        match self.async_runtime.block_on(init_future) {
            Ok((app_state, flows)) => self.start(app_state, flows),
            Err(e) => {
                log::error!("Initialization rejected: {e:#}");
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let event = match init_future.await {
                    Ok((state, flows)) => FlowEvent::Initialized { state, flows },
                    Err(e) => FlowEvent::Rejected(e),
                };
                if proxy.send_event(event).is_err() {
                    log::error!("The event loop closed before initialization finished");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: FlowEvent<State>) {
        match event {
            FlowEvent::Initialized { state, flows } => self.start(state, flows),
            FlowEvent::Rejected(e) => {
                log::error!("Initialization rejected: {e:#}");
                event_loop.exit();
            }
            FlowEvent::Exit => event_loop.exit(),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(state) = &mut self.state else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if state.ctx.mouse.pressed == MouseButtonState::Left {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_device_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(&mut state.ctx, out);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: winit::window::WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        let consumed = state.gui.on_window_event(&state.ctx.window, &event);
        if !consumed {
            state.ctx.camera.controller.handle_window_events(&event);
            for flow in self.graphics_flows.iter_mut() {
                let out = flow.on_window_events(&state.ctx, &mut state.state, &event);
                handle_flow_output(&mut state.ctx, out);
            }
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::CursorMoved { position, .. } => state.ctx.mouse.coords = position,
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => state.ctx.mouse.pressed = MouseButtonState::None,
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } if !consumed && !state.gui.wants_pointer() => {
                state.ctx.mouse.pressed = match button {
                    MouseButton::Left => MouseButtonState::Left,
                    MouseButton::Right => MouseButtonState::Right,
                    _ => MouseButtonState::None,
                };
            }
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                self.time_since_tick += dt;
                state.gui.fps.tick(dt);

                match state.render(
                    &mut self.graphics_flows,
                    #[cfg(feature = "integration-tests")]
                    &self.async_runtime,
                    #[cfg(feature = "integration-tests")]
                    &self.proxy,
                ) {
                    Ok(outs) => {
                        outs.into_iter().for_each(|out| handle_flow_output(&mut state.ctx, out));
                        if self.time_since_tick >= Duration::from_millis(state.ctx.tick_duration_millis) {
                            for flow in self.graphics_flows.iter_mut() {
                                let out = flow.on_tick(&state.ctx, &mut state.state);
                                handle_flow_output(&mut state.ctx, out);
                            }
                            self.time_since_tick = Duration::ZERO;
                        }

                        let ctx = &mut state.ctx;
                        ctx.camera.controller.update(&mut ctx.camera.camera, dt);
                        ctx.camera.write_to_buffer(&ctx.queue, &ctx.projection);

                        for flow in self.graphics_flows.iter_mut() {
                            let out = flow.on_update(&state.ctx, &mut state.state, dt);
                            handle_flow_output(&mut state.ctx, out);
                        }
                    }
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {e}");
                    }
                }
            }
            _ => {}
        }
    }
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

/// Set up logging and run `constructors` until the window closes.
pub fn run<State: 'static + Default>(constructors: Vec<FlowConstructor<State>>) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            eprintln!("Warning: Could not initialize logger: {e}");
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    #[cfg(all(feature = "integration-tests", target_os = "linux"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::wayland::EventLoopBuilderExtWayland;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(all(feature = "integration-tests", target_os = "windows"))]
    let event_loop: EventLoop<FlowEvent<State>> = {
        use winit::platform::windows::EventLoopBuilderExtWindows;

        EventLoop::with_user_event().with_any_thread(true).build()?
    };

    #[cfg(not(all(feature = "integration-tests", any(target_os = "linux", target_os = "windows"))))]
    let event_loop: EventLoop<FlowEvent<State>> = EventLoop::with_user_event().build()?;

    let mut app: App<State> = App::new(&event_loop, constructors)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}
