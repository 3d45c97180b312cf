//! CPU reference of the toon shading model.
//!
//! [`shade`] is the definition the `toon.wgsl` fragment shader follows: the GPU
//! evaluates the same terms per pixel with the values uploaded from
//! [`ShadingParams`](super::params::ShadingParams). Keeping a host-side copy
//! makes the model testable without a device and documents the exact policy
//! for every term.
//!
//! The model per fragment:
//!
//! 1. Lambert term `max(n·l, 0)` per light, quantized into `banding` levels.
//! 2. The quantized term is scaled by `diffuse` and weighted by the light's
//!    color and intensity.
//! 3. A constant `ambient` weight.
//! 4. A hard-edged Blinn highlight: `pow(max(n·h, 0), glossiness)` compared
//!    against [`SPECULAR_EDGE`], scaled by `specular`.
//! 5. A rim term `smoothstep(rim_threshold, 1, 1 - n·v) * rim_amount`, only on
//!    surfaces that receive a non-zero diffuse band.
//! 6. The [`ToonStyle`] blends the terms with the base color.

use cgmath::{ElementWise, InnerSpace, Vector3, Zero};

use crate::shading::params::ShadingParams;

/// Threshold the specular falloff is stepped at.
pub const SPECULAR_EDGE: f32 = 0.5;

/// Minimum summed diffuse band for the rim light to show.
pub const RIM_EPSILON: f32 = 1e-3;

/// A directional light as seen by the shading model.
///
/// `direction` points from the surface towards the light and does not need to
/// be normalized. A zero direction contributes nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vector3<f32>,
    pub color: Vector3<f32>,
    pub intensity: f32,
}

impl DirectionalLight {
    pub fn new(direction: impl Into<Vector3<f32>>, color: impl Into<Vector3<f32>>, intensity: f32) -> Self {
        Self {
            direction: direction.into(),
            color: color.into(),
            intensity,
        }
    }
}

/// Per-pixel geometric input: unit surface normal and unit direction towards the eye.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub normal: Vector3<f32>,
    pub view: Vector3<f32>,
}

impl Fragment {
    pub fn new(normal: impl Into<Vector3<f32>>, view: impl Into<Vector3<f32>>) -> Self {
        Self {
            normal: normal.into(),
            view: view.into(),
        }
    }
}

/// Selects how the lighting terms are banded and blended.
///
/// `Classic` is the default cel look. `Alternate` rounds instead of floors the
/// diffuse bands, pushes the rim light towards the terminator and keeps the
/// highlight untinted by the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToonStyle {
    #[default]
    Classic,
    Alternate,
}

impl ToonStyle {
    /// Value uploaded to the `style` field of the material uniform.
    pub fn as_raw(self) -> u32 {
        match self {
            ToonStyle::Classic => 0,
            ToonStyle::Alternate => 1,
        }
    }

    /// Quantize a Lambert term in `[0, 1]` into `bands` levels.
    pub fn quantize(self, term: f32, bands: f32) -> f32 {
        let term = term.clamp(0.0, 1.0);
        match self {
            ToonStyle::Classic => (term * bands).floor() / bands,
            ToonStyle::Alternate => (term * bands + 0.5).floor().min(bands) / bands,
        }
    }

    /// Weight applied to the rim term given the brightest diffuse band.
    pub fn rim_weight(self, max_band: f32) -> f32 {
        match self {
            ToonStyle::Classic => 1.0,
            ToonStyle::Alternate => 1.0 - 0.5 * max_band,
        }
    }

    /// Combine the lighting terms with the base color.
    pub fn blend(self, base: Vector3<f32>, terms: &ToonTerms) -> Vector3<f32> {
        let scalar = |s: f32| Vector3::new(s, s, s);
        match self {
            ToonStyle::Classic => {
                let light = scalar(terms.ambient + terms.rim) + terms.diffuse + terms.specular;
                base.mul_element_wise(light)
            }
            ToonStyle::Alternate => {
                let light = scalar(terms.ambient + terms.rim) + terms.diffuse;
                base.mul_element_wise(light) + terms.specular
            }
        }
    }
}

/// The individual contributions of one fragment evaluation, before blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToonTerms {
    pub ambient: f32,
    pub diffuse: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub rim: f32,
}

/// Number of diffuse bands for a (possibly fractional) banding parameter.
pub fn band_count(banding: f32) -> f32 {
    // `max` also maps NaN to a single band
    banding.floor().max(1.0)
}

/// Hermite interpolation between `edge0` and `edge1`, matching WGSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Hard-edged Blinn specular factor: `1.0` inside the highlight, `0.0` outside.
pub fn specular_step(normal: Vector3<f32>, light: Vector3<f32>, view: Vector3<f32>, glossiness: f32) -> f32 {
    let half = light + view;
    if half.magnitude2() <= f32::EPSILON {
        return 0.0;
    }
    let n_dot_h = normal.dot(half.normalize());
    if n_dot_h <= 0.0 {
        return 0.0;
    }
    if n_dot_h.powf(glossiness.max(0.0)) > SPECULAR_EDGE {
        1.0
    } else {
        0.0
    }
}

/// Ungated rim intensity for a fragment.
pub fn rim_term(fragment: &Fragment, params: &ShadingParams) -> f32 {
    let grazing = 1.0 - fragment.normal.dot(fragment.view);
    smoothstep(params.rim_threshold, 1.0, grazing) * params.rim_amount
}

/// Evaluate every lighting term of the model for one fragment.
pub fn lighting_terms(fragment: &Fragment, lights: &[DirectionalLight], params: &ShadingParams) -> ToonTerms {
    let normal = fragment.normal;
    let bands = band_count(params.banding);
    let style = params.style;

    let mut diffuse = Vector3::zero();
    let mut specular = Vector3::zero();
    let mut lit = 0.0;
    let mut max_band: f32 = 0.0;
    for light in lights {
        if light.direction.magnitude2() <= f32::EPSILON {
            continue;
        }
        let direction = light.direction.normalize();
        let radiance = light.color * light.intensity;
        let lambert = normal.dot(direction).max(0.0);
        let band = style.quantize(lambert, bands);

        diffuse += radiance * (band * params.diffuse);
        lit += band * light.intensity;
        max_band = max_band.max(band);
        if lambert > 0.0 {
            let highlight = specular_step(normal, direction, fragment.view, params.glossiness);
            specular += radiance * (highlight * params.specular);
        }
    }

    let rim = if lit > RIM_EPSILON {
        rim_term(fragment, params) * style.rim_weight(max_band)
    } else {
        0.0
    };

    ToonTerms {
        ambient: params.ambient,
        diffuse,
        specular,
        rim,
    }
}

/// Final color of one fragment.
pub fn shade(fragment: &Fragment, lights: &[DirectionalLight], params: &ShadingParams) -> Vector3<f32> {
    let terms = lighting_terms(fragment, lights, params);
    params.style.blend(params.color.into(), &terms)
}
