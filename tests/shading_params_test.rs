use toon_ngin::shading::{
    ShadingParams, ToonStyle,
    color::{hex_to_linear, hex_to_srgb, linear_to_srgb, linear_to_srgb8, srgb8_to_linear, srgb_to_linear},
    params::{BANDING_RANGE, DEFAULT_COLOR, GLOSSINESS_RANGE, RIM_AMOUNT_RANGE},
};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn should_default_to_the_demo_material() {
    let params = ShadingParams::default();
    assert_eq!(params.ambient, 0.5);
    assert_eq!(params.diffuse, 1.0);
    assert_eq!(params.specular, 0.5);
    assert_eq!(params.glossiness, 5.0);
    assert_eq!(params.rim_amount, 0.8);
    assert_eq!(params.rim_threshold, 0.5);
    assert_eq!(params.banding, 3.0);
    assert_eq!(params.style, ToonStyle::Classic);
    assert!(params.flat_shading);
    assert_eq!(params.color, hex_to_linear(DEFAULT_COLOR));
    assert_eq!(params, params.clamped());
}

#[test]
fn should_clamp_out_of_range_values() {
    let params = ShadingParams {
        ambient: -1.0,
        diffuse: 7.0,
        specular: f32::NAN,
        glossiness: 42.9,
        rim_amount: 0.1,
        rim_threshold: 1.0,
        banding: 2.9,
        color: [1.5, -0.2, 0.5],
        ..ShadingParams::default()
    }
    .clamped();
    assert_eq!(params.ambient, 0.0);
    assert_eq!(params.diffuse, 2.0);
    assert_eq!(params.specular, 0.0);
    assert_eq!(params.glossiness, *GLOSSINESS_RANGE.end());
    assert_eq!(params.rim_amount, *RIM_AMOUNT_RANGE.start());
    assert_eq!(params.rim_threshold, 0.95);
    assert_eq!(params.banding, 2.0);
    assert_eq!(params.color, [1.0, 0.0, 0.5]);
}

#[test]
fn should_keep_banding_at_least_one() {
    let mut params = ShadingParams {
        banding: 0.3,
        ..ShadingParams::default()
    };
    params.clamp_to_ranges();
    assert_eq!(params.banding, *BANDING_RANGE.start());
}

#[test]
fn should_split_hex_channels() {
    assert_eq!(hex_to_srgb(0xFF0080), [1.0, 0.0, 128.0 / 255.0]);
    for c in hex_to_linear(0xFFFFFF) {
        assert_close(c, 1.0, 1e-6);
    }
    assert_eq!(hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
}

#[test]
fn should_convert_mid_grey_to_linear() {
    // 0x80 is about 21.6% in linear light
    let [r, g, b] = hex_to_linear(0x808080);
    assert_close(r, 0.2159, 1e-3);
    assert_eq!(r, g);
    assert_eq!(g, b);
}

#[test]
fn should_invert_transfer_functions() {
    for i in 0..=20 {
        let c = i as f32 / 20.0;
        assert_close(linear_to_srgb(srgb_to_linear(c)), c, 1e-5);
    }
    for rgb in [[0, 0, 0], [100, 149, 237], [255, 255, 255], [1, 2, 3]] {
        assert_eq!(linear_to_srgb8(srgb8_to_linear(rgb)), rgb);
    }
}
