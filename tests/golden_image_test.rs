#[cfg(feature = "integration-tests")]
use crate::common::test_utils::{Empty, TestRender, rgba_at};
#[cfg(feature = "integration-tests")]
use wgpu::Color;

#[cfg(feature = "integration-tests")]
mod common;

#[test]
#[cfg(feature = "integration-tests")]
fn should_render_clear_colour() {
    use toon_ngin::{
        context::{Context, InitContext},
        flow::ImageTestResult,
    };

    golden_image_test!(async move |_: InitContext| -> anyhow::Result<TestRender> {
        Ok(TestRender::new(
            Empty,
            |ctx: &mut Context| {
                ctx.clear_colour = Color::WHITE;
            },
            |_, state: &mut FrameCounter, texture| {
                if state.frame() == 0 {
                    return Ok(ImageTestResult::Waiting);
                }
                for pixel in texture.pixels() {
                    assert_eq!(pixel.0, [255; 4]);
                }
                Ok(ImageTestResult::Passed)
            },
        ))
    });
}

#[test]
#[cfg(feature = "integration-tests")]
fn should_shade_sphere_in_its_base_color() {
    use toon_ngin::{
        camera::Camera,
        context::{Context, InitContext},
        flow::ImageTestResult,
        scene::{SceneConfig, ToonScene},
    };

    golden_image_test!(async move |init: InitContext| -> anyhow::Result<TestRender> {
        let config = SceneConfig {
            show_light_helpers: false,
            ..SceneConfig::default()
        };
        let height = config.sphere_radius * config.line_weight;
        let scene = ToonScene::new(init, config).await?;
        Ok(TestRender::new(
            scene,
            move |ctx: &mut Context| {
                ctx.clear_colour = Color::WHITE;
                ctx.camera.camera = Camera::new((0.0, height, 10.0), (0.0, height, 0.0));
            },
            |ctx, state: &mut FrameCounter, texture| {
                if state.frame() < 2 {
                    return Ok(ImageTestResult::Waiting);
                }
                let (width, height) = texture.dimensions();
                let [r, g, b, _] = rgba_at(ctx, texture, width / 2, height / 2);
                assert!(b > r && b > g, "sphere center should be blue, got {:?}", [r, g, b]);
                assert!(b > 32, "sphere center is too dark: {:?}", [r, g, b]);
                Ok(ImageTestResult::Passed)
            },
        ))
    });
}
