use std::mem::size_of;

use toon_ngin::{
    camera::CameraUniform,
    data_structures::{instance::InstanceRaw, model::ModelVertex},
    pipelines::{
        light::{LightRaw, LightUniform, MAX_LIGHTS},
        outline::OutlineUniform,
        standard::StandardUniform,
        toon::ToonUniform,
    },
    shading::{DirectionalLight, ShadingParams, ToonStyle},
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn should_match_wgsl_struct_sizes() {
    assert_eq!(size_of::<CameraUniform>(), 80);
    assert_eq!(size_of::<LightRaw>(), 48);
    assert_eq!(size_of::<LightUniform>(), 208);
    assert_eq!(size_of::<ToonUniform>(), 48);
    assert_eq!(size_of::<StandardUniform>(), 48);
    assert_eq!(size_of::<OutlineUniform>(), 16);
}

#[test]
fn should_pad_uniforms_to_sixteen_bytes() {
    for size in [
        size_of::<CameraUniform>(),
        size_of::<LightUniform>(),
        size_of::<ToonUniform>(),
        size_of::<StandardUniform>(),
        size_of::<OutlineUniform>(),
    ] {
        assert_eq!(size % 16, 0, "size {size}");
    }
}

#[test]
fn should_match_vertex_strides() {
    assert_eq!(size_of::<ModelVertex>(), 32);
    assert_eq!(size_of::<InstanceRaw>(), 100);
}

#[test]
fn should_upload_clamped_toon_params() {
    let params = ShadingParams {
        glossiness: 99.0,
        banding: 3.7,
        style: ToonStyle::Alternate,
        flat_shading: false,
        ..ShadingParams::default()
    };
    let uniform = ToonUniform::from(&params);
    assert_eq!(uniform.glossiness, 20.0);
    assert_eq!(uniform.banding, 3.0);
    assert_eq!(uniform.style, 1);
    assert_eq!(uniform.flat_shading, 0);
    assert_eq!(uniform.color, params.color);

    let classic = ToonUniform::from(&ShadingParams::default());
    assert_eq!(classic.style, 0);
    assert_eq!(classic.flat_shading, 1);
}

#[test]
fn should_normalize_light_direction() {
    let light = DirectionalLight::new([5.0, 5.0, 5.0], [1.0, 1.0, 1.0], 0.5);
    let raw = LightRaw::new(&light, [5.0, 5.0, 5.0].into());
    for c in raw.direction() {
        assert_close(c, 1.0 / 3.0f32.sqrt(), 1e-6);
    }
    assert_eq!(raw.position(), [5.0, 5.0, 5.0]);

    let dark = LightRaw::new(&DirectionalLight::new([0.0; 3], [1.0; 3], 1.0), [0.0; 3].into());
    assert_eq!(dark.direction(), [0.0; 3]);
}

#[test]
fn should_drop_lights_beyond_capacity() {
    let light = DirectionalLight::new([0.0, 1.0, 0.0], [1.0; 3], 1.0);
    let raws = (0..MAX_LIGHTS + 2).map(|i| LightRaw::new(&light, [i as f32, 0.0, 0.0].into()));
    let uniform = LightUniform::new(raws);
    assert_eq!(uniform.count() as usize, MAX_LIGHTS);
    assert_eq!(uniform.lights().len(), MAX_LIGHTS);
    assert_eq!(uniform.lights()[MAX_LIGHTS - 1].position()[0], (MAX_LIGHTS - 1) as f32);
    assert_eq!(LightUniform::default().count(), 0);
}
