#![allow(dead_code)]

#[cfg(feature = "integration-tests")]
use toon_ngin::{
    context::Context,
    flow::{GraphicsFlow, ImageTestResult, Out},
    render::Render,
};

/// Counts the lifecycle hooks a flow went through.
#[derive(Debug, Default)]
pub(crate) struct State {
    frame_counter: u32,
    init_invocations: u32,
    update_invocations: u32,
    tick_invocations: u32,
}

impl State {
    pub fn frame(&mut self) {
        self.frame_counter += 1;
    }

    pub fn init(&mut self) {
        self.init_invocations += 1;
    }

    pub fn update(&mut self) {
        self.update_invocations += 1;
    }

    pub fn tick(&mut self) {
        self.tick_invocations += 1;
    }

    pub fn frame_counter(&self) -> u32 {
        self.frame_counter
    }

    pub fn init_invocations(&self) -> u32 {
        self.init_invocations
    }

    pub fn update_invocations(&self) -> u32 {
        self.update_invocations
    }

    pub fn tick_invocations(&self) -> u32 {
        self.tick_invocations
    }
}

#[derive(Debug, Default)]
pub(crate) struct FrameCounter(pub(crate) u32);

impl FrameCounter {
    pub(crate) fn frame(&self) -> u32 {
        self.0
    }

    pub(crate) fn progress(&mut self) {
        self.0 += 1;
    }
}

/// Assert two floats are within `epsilon` of each other.
#[track_caller]
pub(crate) fn assert_close(actual: f32, expected: f32, epsilon: f32) {
    assert!(
        (actual - expected).abs() <= epsilon,
        "expected {expected} (+/- {epsilon}), got {actual}"
    );
}

#[cfg(feature = "integration-tests")]
pub(crate) type TestImage = image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>;

/// Pixel at `(x, y)` in RGBA order regardless of the surface format.
#[cfg(feature = "integration-tests")]
pub(crate) fn rgba_at(ctx: &Context, texture: &TestImage, x: u32, y: u32) -> [u8; 4] {
    let [a, b, c, d] = texture.get_pixel(x, y).0;
    match ctx.config.format {
        wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb => [c, b, a, d],
        _ => [a, b, c, d],
    }
}

/// A flow that draws nothing.
#[cfg(feature = "integration-tests")]
pub(crate) struct Empty;

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<FrameCounter> for Empty {
    fn on_init(&mut self, _: &mut Context, _: &mut FrameCounter) -> Out {
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, _: &mut FrameCounter, _: instant::Duration) -> Out {
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::None
    }
}

#[cfg(feature = "integration-tests")]
type Validate = Box<dyn Fn(&Context, &mut FrameCounter, &mut TestImage) -> anyhow::Result<ImageTestResult>>;

/// Wraps a flow: `setup` runs after the inner flow's `on_init`, `validate`
/// inspects every offscreen frame.
#[cfg(feature = "integration-tests")]
pub(crate) struct TestRender {
    inner: Box<dyn GraphicsFlow<FrameCounter>>,
    setup: Box<dyn Fn(&mut Context)>,
    validate: Validate,
}

#[cfg(feature = "integration-tests")]
impl TestRender {
    pub(crate) fn new(
        inner: impl GraphicsFlow<FrameCounter> + 'static,
        setup: impl Fn(&mut Context) + 'static,
        validate: impl Fn(&Context, &mut FrameCounter, &mut TestImage) -> anyhow::Result<ImageTestResult> + 'static,
    ) -> Self {
        Self {
            inner: Box::new(inner),
            setup: Box::new(setup),
            validate: Box::new(validate),
        }
    }
}

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<FrameCounter> for TestRender {
    fn on_init(&mut self, ctx: &mut Context, state: &mut FrameCounter) -> Out {
        if let Out::Configure(f) = self.inner.on_init(ctx, state) {
            f(ctx);
        }
        (self.setup)(ctx);
        Out::Empty
    }

    fn on_update(&mut self, ctx: &Context, state: &mut FrameCounter, dt: instant::Duration) -> Out {
        state.progress();
        self.inner.on_update(ctx, state, dt)
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        self.inner.on_render()
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut FrameCounter,
        texture: &mut TestImage,
    ) -> anyhow::Result<ImageTestResult> {
        (self.validate)(ctx, state, texture)
    }
}

/// Run an async `InitContext -> anyhow::Result<TestRender>` closure as the
/// only flow until every validation passes.
#[macro_export]
macro_rules! golden_image_test {
    ($graphics_elem:expr) => {{
        use crate::common::test_utils::FrameCounter;
        use toon_ngin::flow::{FlowConstructor, GraphicsFlow};
        let constructor: FlowConstructor<FrameCounter> = Box::new(|init| {
            Box::pin(async move {
                let g_flow: Box<dyn GraphicsFlow<FrameCounter>> = Box::new(($graphics_elem)(init).await?);
                Ok(g_flow)
            })
        });

        toon_ngin::flow::run(vec![constructor]).expect("Failed to run flow for integration test.");
    }};
}
