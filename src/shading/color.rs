//! sRGB / linear conversions for colors authored as hex codes.
//!
//! Colors are authored in sRGB (hex codes, GUI pickers) and converted once at
//! the boundary so all lighting math runs in linear space. The surface is an
//! sRGB format, so the GPU encodes the result again on write.

/// Decode a single sRGB channel in `[0, 1]` into linear space.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Split `0xRRGGBB` into sRGB channels in `[0, 1]`.
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    srgb_array_to_linear(hex_to_srgb(hex))
}

pub fn srgb_array_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_to_linear)
}

/// 8-bit sRGB (as edited by the GUI color pickers) to linear.
pub fn srgb8_to_linear(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| srgb_to_linear(c as f32 / 255.0))
}

pub fn linear_to_srgb8(rgb: [f32; 3]) -> [u8; 3] {
    rgb.map(|c| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u8)
}
