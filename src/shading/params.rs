use std::ops::RangeInclusive;

use crate::shading::{color, toon::ToonStyle};

pub const AMBIENT_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const DIFFUSE_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const SPECULAR_RANGE: RangeInclusive<f32> = 0.0..=2.0;
pub const GLOSSINESS_RANGE: RangeInclusive<f32> = 0.0..=20.0;
pub const RIM_AMOUNT_RANGE: RangeInclusive<f32> = 0.7..=1.0;
/// The rim threshold is not exposed in the GUI, the range only guards `smoothstep`.
pub const RIM_THRESHOLD_RANGE: RangeInclusive<f32> = 0.0..=0.95;
pub const BANDING_RANGE: RangeInclusive<f32> = 1.0..=4.0;

/// Default base color, cornflower blue `#6495ED`.
pub const DEFAULT_COLOR: u32 = 0x6495ED;

/// The tunable coefficients of the toon material.
///
/// Owned by the scene and written directly by GUI callbacks. The struct is
/// passed by reference to [`shade`](super::toon::shade) and converted into a
/// GPU uniform once per frame. `color` is linear RGB.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingParams {
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
    pub glossiness: f32,
    pub rim_amount: f32,
    pub rim_threshold: f32,
    pub banding: f32,
    pub color: [f32; 3],
    pub style: ToonStyle,
    pub flat_shading: bool,
}

impl Default for ShadingParams {
    fn default() -> Self {
        Self {
            ambient: 0.5,
            diffuse: 1.0,
            specular: 0.5,
            glossiness: 5.0,
            rim_amount: 0.8,
            rim_threshold: 0.5,
            banding: 3.0,
            color: color::hex_to_linear(DEFAULT_COLOR),
            style: ToonStyle::Classic,
            flat_shading: true,
        }
    }
}

impl ShadingParams {
    /// Pull every field back into its documented range.
    ///
    /// Integer-stepped parameters (`glossiness`, `banding`) are rounded down and
    /// non-finite values fall back to the lower bound.
    pub fn clamp_to_ranges(&mut self) {
        self.ambient = clamp_finite(self.ambient, &AMBIENT_RANGE);
        self.diffuse = clamp_finite(self.diffuse, &DIFFUSE_RANGE);
        self.specular = clamp_finite(self.specular, &SPECULAR_RANGE);
        self.glossiness = clamp_finite(self.glossiness.floor(), &GLOSSINESS_RANGE);
        self.rim_amount = clamp_finite(self.rim_amount, &RIM_AMOUNT_RANGE);
        self.rim_threshold = clamp_finite(self.rim_threshold, &RIM_THRESHOLD_RANGE);
        self.banding = clamp_finite(self.banding.floor(), &BANDING_RANGE);
        for channel in self.color.iter_mut() {
            *channel = clamp_finite(*channel, &(0.0..=1.0));
        }
    }

    /// A copy with every field inside its range.
    pub fn clamped(mut self) -> Self {
        self.clamp_to_ranges();
        self
    }
}

fn clamp_finite(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        *range.start()
    }
}
