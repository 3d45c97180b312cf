use cgmath::Vector3;
use toon_ngin::shading::{
    DirectionalLight, Fragment, ShadingParams, ToonStyle, shade,
    toon::{band_count, lighting_terms, smoothstep, specular_step},
};

use crate::common::test_utils::assert_close;

mod common;

const BASE: [f32; 3] = [0.2, 0.4, 0.6];

fn flat_params() -> ShadingParams {
    ShadingParams {
        ambient: 1.0,
        diffuse: 1.0,
        specular: 0.0,
        rim_amount: 0.0,
        banding: 1.0,
        color: BASE,
        ..ShadingParams::default()
    }
}

fn white(direction: [f32; 3]) -> DirectionalLight {
    DirectionalLight::new(direction, [1.0, 1.0, 1.0], 1.0)
}

fn assert_vec_close(actual: Vector3<f32>, expected: [f32; 3]) {
    assert_close(actual.x, expected[0], 1e-5);
    assert_close(actual.y, expected[1], 1e-5);
    assert_close(actual.z, expected[2], 1e-5);
}

#[test]
fn should_add_full_band_for_light_along_normal() {
    let fragment = Fragment::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0]);
    let out = shade(&fragment, &[white([0.0, 1.0, 0.0])], &flat_params());
    assert_vec_close(out, BASE.map(|c| c * 2.0));
}

#[test]
fn should_be_ambient_only_for_light_from_behind() {
    let fragment = Fragment::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0]);
    let out = shade(&fragment, &[white([0.0, -1.0, 0.0])], &flat_params());
    assert_vec_close(out, BASE);
}

#[test]
fn should_gate_rim_without_lights() {
    // grazing view: the ungated rim would be at full strength
    let fragment = Fragment::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    let params = ShadingParams {
        ambient: 0.5,
        rim_amount: 1.0,
        color: BASE,
        ..ShadingParams::default()
    };
    let out = shade(&fragment, &[], &params);
    assert_vec_close(out, BASE.map(|c| c * 0.5));
}

#[test]
fn should_gate_rim_at_minimum_band() {
    let fragment = Fragment::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    let params = ShadingParams::default();
    for style in [ToonStyle::Classic, ToonStyle::Alternate] {
        let params = ShadingParams { style, ..params };
        // light perpendicular to the normal, lambert is zero
        let terms = lighting_terms(&fragment, &[white([0.0, 1.0, 0.0])], &params);
        assert_eq!(terms.rim, 0.0, "{style:?}");
    }
}

#[test]
fn should_gate_rim_on_lit_faces_below_first_band() {
    let fragment = Fragment::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    // lambert 0.2: the face is lit but sits in the lowest band
    let lights = [white([0.2, 0.96f32.sqrt(), 0.0])];
    for banding in 1..=4 {
        let params = ShadingParams {
            banding: banding as f32,
            ..ShadingParams::default()
        };
        let classic = lighting_terms(&fragment, &lights, &params);
        assert_eq!(classic.diffuse, Vector3::new(0.0, 0.0, 0.0), "banding {banding}");
        assert_eq!(classic.rim, 0.0, "banding {banding}");

        let alternate = ShadingParams {
            style: ToonStyle::Alternate,
            ..params
        };
        let alternate = lighting_terms(&fragment, &lights, &alternate);
        // rounding lifts 0.2 into the first band from three bands on
        let expected = match banding {
            1 | 2 => 0.0,
            3 => 0.8 * (1.0 - 0.5 / 3.0),
            _ => 0.8 * (1.0 - 0.5 / 4.0),
        };
        assert_close(alternate.rim, expected, 1e-5);
    }
}

#[test]
fn should_weight_rim_by_style() {
    let fragment = Fragment::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
    let lights = [white([1.0, 0.0, 0.0])];
    let classic = lighting_terms(&fragment, &lights, &ShadingParams::default());
    assert_close(classic.rim, 0.8, 1e-6);

    let alternate = ShadingParams {
        style: ToonStyle::Alternate,
        ..ShadingParams::default()
    };
    let alternate = lighting_terms(&fragment, &lights, &alternate);
    assert_close(alternate.rim, 0.4, 1e-6);
}

#[test]
fn should_have_exactly_n_levels_below_one() {
    for bands in 1..=4 {
        let n = bands as f32;
        let mut levels: Vec<f32> = (0..1000)
            .map(|i| ToonStyle::Classic.quantize(i as f32 / 1000.0, n))
            .collect();
        levels.dedup();
        assert_eq!(levels.len(), bands, "banding {bands}: {levels:?}");
        assert_eq!(ToonStyle::Classic.quantize(1.0, n), 1.0);
    }
}

#[test]
fn should_be_binary_with_one_band() {
    for i in 0..=100 {
        let band = ToonStyle::Classic.quantize(i as f32 / 100.0, 1.0);
        assert!(band == 0.0 || band == 1.0, "{band}");
    }
}

#[test]
fn should_keep_alternate_bands_in_unit_range() {
    for bands in 1..=4 {
        for i in 0..=100 {
            let band = ToonStyle::Alternate.quantize(i as f32 / 100.0, bands as f32);
            assert!((0.0..=1.0).contains(&band), "{band}");
        }
    }
    // rounding lights the upper half of the first band
    assert_eq!(ToonStyle::Alternate.quantize(0.2, 3.0), 1.0 / 3.0);
}

#[test]
fn should_floor_fractional_banding() {
    assert_eq!(band_count(2.7), 2.0);
    assert_eq!(band_count(0.0), 1.0);
    assert_eq!(band_count(f32::NAN), 1.0);
}

#[test]
fn should_never_produce_negative_components() {
    let normals = [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.577, 0.577, 0.577]];
    let directions = [[0.0, 1.0, 0.0], [-1.0, 0.2, 0.0], [0.3, -0.9, 0.1], [5.0, 5.0, 5.0]];
    for style in [ToonStyle::Classic, ToonStyle::Alternate] {
        let params = ShadingParams {
            style,
            specular: 2.0,
            ..ShadingParams::default()
        };
        for normal in normals {
            for direction in directions {
                let fragment = Fragment::new(normal, [0.0, 0.0, 1.0]);
                let out = shade(&fragment, &[white(direction)], &params);
                assert!(out.x >= 0.0 && out.y >= 0.0 && out.z >= 0.0, "{out:?}");
            }
        }
    }
}

#[test]
fn should_be_continuous_in_weights() {
    let fragment = Fragment::new([0.0, 1.0, 0.0], [0.0, 0.6, 0.8]);
    let lights = [white([0.2, 1.0, 0.1])];
    let params = ShadingParams::default();
    let nudged = ShadingParams {
        ambient: params.ambient + 1e-4,
        diffuse: params.diffuse + 1e-4,
        specular: params.specular + 1e-4,
        rim_amount: params.rim_amount + 1e-4,
        ..params
    };
    let a = shade(&fragment, &lights, &params);
    let b = shade(&fragment, &lights, &nudged);
    assert_close(a.x, b.x, 1e-3);
    assert_close(a.y, b.y, 1e-3);
    assert_close(a.z, b.z, 1e-3);
}

#[test]
fn should_be_bit_identical_for_identical_inputs() {
    let fragment = Fragment::new([0.6, 0.8, 0.0], [0.0, 0.0, 1.0]);
    let lights = [white([5.0, 5.0, 5.0]), DirectionalLight::new([-1.0, 0.5, 0.0], [1.0, 0.6, 0.3], 0.25)];
    let params = ShadingParams::default();
    let a = shade(&fragment, &lights, &params);
    let b = shade(&fragment, &lights, &params);
    assert_eq!(a.x.to_bits(), b.x.to_bits());
    assert_eq!(a.y.to_bits(), b.y.to_bits());
    assert_eq!(a.z.to_bits(), b.z.to_bits());
}

#[test]
fn should_tint_highlight_only_in_classic_style() {
    let fragment = Fragment::new([0.0, 0.0, 1.0], [0.0, 0.0, 1.0]);
    let lights = [white([0.0, 0.0, 1.0])];
    let params = ShadingParams {
        ambient: 0.0,
        diffuse: 0.0,
        specular: 1.0,
        rim_amount: 0.0,
        color: BASE,
        ..ShadingParams::default()
    };
    assert_vec_close(shade(&fragment, &lights, &params), BASE);

    let alternate = ShadingParams {
        style: ToonStyle::Alternate,
        ..params
    };
    assert_vec_close(shade(&fragment, &lights, &alternate), [1.0, 1.0, 1.0]);
}

#[test]
fn should_narrow_highlight_with_glossiness() {
    let normal = Vector3::new(0.0, 0.0, 1.0);
    let view = Vector3::new(0.0, 0.0, 1.0);
    // n·h = cos(~25.8°) = 0.9
    let half_angle = 0.9f32.acos();
    let light = Vector3::new((2.0 * half_angle).sin(), 0.0, (2.0 * half_angle).cos());
    assert_eq!(specular_step(normal, light, view, 5.0), 1.0);
    assert_eq!(specular_step(normal, light, view, 20.0), 0.0);
    assert_eq!(specular_step(normal, -view, view, 5.0), 0.0);
}

#[test]
fn should_match_wgsl_smoothstep() {
    assert_eq!(smoothstep(0.5, 1.0, 0.2), 0.0);
    assert_eq!(smoothstep(0.5, 1.0, 1.0), 1.0);
    assert_close(smoothstep(0.5, 1.0, 0.75), 0.5, 1e-6);
}
