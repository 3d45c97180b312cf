#[cfg(feature = "integration-tests")]
use toon_ngin::{
    context::Context,
    flow::{FlowConstructor, GraphicsFlow, ImageTestResult, Out},
    render::Render,
};
#[cfg(feature = "integration-tests")]
use wgpu::Color;

#[cfg(feature = "integration-tests")]
use crate::common::test_utils::State;

#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
const CONFIGURED: Color = Color {
    r: 0.25,
    g: 0.5,
    b: 0.75,
    a: 1.0,
};

#[cfg(feature = "integration-tests")]
struct GraphicsElement;

#[cfg(feature = "integration-tests")]
impl GraphicsFlow<State> for GraphicsElement {
    fn on_init(&mut self, ctx: &mut Context, state: &mut State) -> Out {
        ctx.clear_colour = Color::TRANSPARENT;
        ctx.tick_duration_millis = 1;
        assert_eq!(state.frame_counter(), 0);
        assert_eq!(state.init_invocations(), 0);
        assert_eq!(state.update_invocations(), 0);

        state.init();
        Out::Empty
    }

    fn on_update(&mut self, _: &Context, state: &mut State, _: instant::Duration) -> Out {
        assert_eq!(state.frame_counter(), state.update_invocations());
        assert_eq!(state.init_invocations(), 1);
        state.frame();
        state.update();

        match state.frame_counter() {
            2 => Out::Configure(Box::new(|ctx: &mut Context| ctx.clear_colour = CONFIGURED)),
            _ => Out::Empty,
        }
    }

    fn on_tick(&mut self, _: &Context, state: &mut State) -> Out {
        state.tick();
        Out::Empty
    }

    fn on_render<'pass>(&self) -> Render<'_, 'pass> {
        Render::None
    }

    fn render_to_texture(
        &self,
        ctx: &Context,
        state: &mut State,
        _: &mut image::ImageBuffer<image::Rgba<u8>, wgpu::BufferView>,
    ) -> anyhow::Result<ImageTestResult> {
        if state.frame_counter() < 4 {
            return Ok(ImageTestResult::Waiting);
        }
        assert_eq!(ctx.clear_colour, CONFIGURED);
        assert_eq!(state.init_invocations(), 1);
        assert!(state.tick_invocations() > 0, "no tick after {} frames", state.frame_counter());
        Ok(ImageTestResult::Passed)
    }
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_run_lifecycle_hooks_in_order() {
    let constructor: FlowConstructor<State> = Box::new(|_| {
        Box::pin(async move {
            let flow: Box<dyn GraphicsFlow<State>> = Box::new(GraphicsElement);
            Ok(flow)
        })
    });
    toon_ngin::flow::run(vec![constructor]).expect("Failed to run flow for integration test.");
}
