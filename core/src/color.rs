//! Packed 32-bit ARGB colors.
//!
//! Debug drawing calls carry colors as `0xAARRGGBB` integers. Vertex data
//! stores them unpacked as linear `[r, g, b, a]` floats in `0.0..=1.0`.

/// A color packed as `0xAARRGGBB`.
pub type PackedColor = u32;

pub const BLACK: PackedColor = 0xFF00_0000;
pub const WHITE: PackedColor = 0xFFFF_FFFF;
pub const RED: PackedColor = 0xFFFF_0000;
pub const GREEN: PackedColor = 0xFF00_FF00;
pub const BLUE: PackedColor = 0xFF00_00FF;
pub const YELLOW: PackedColor = 0xFFFF_FF00;
pub const CYAN: PackedColor = 0xFF00_FFFF;
pub const MAGENTA: PackedColor = 0xFFFF_00FF;
pub const ORANGE: PackedColor = 0xFFFF_A500;
pub const GRAY: PackedColor = 0xFF80_8080;
pub const DARK_GRAY: PackedColor = 0xFF40_4040;
pub const LIGHT_GRAY: PackedColor = 0xFFC0_C0C0;

/// Pack individual channels.
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> PackedColor {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Pack an opaque color.
pub const fn rgb(r: u8, g: u8, b: u8) -> PackedColor {
    argb(0xFF, r, g, b)
}

/// Unpack to `[r, g, b, a]` floats.
pub fn unpack_argb(color: PackedColor) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), channel(24)]
}

/// Pack `[r, g, b, a]` floats, clamping each channel to `0.0..=1.0`.
pub fn pack_rgba(rgba: [f32; 4]) -> PackedColor {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    argb(
        channel(rgba[3]),
        channel(rgba[0]),
        channel(rgba[1]),
        channel(rgba[2]),
    )
}

/// Scale the RGB channels by `brightness`, keeping alpha.
pub fn scale_brightness(color: PackedColor, brightness: f32) -> PackedColor {
    let [r, g, b, a] = unpack_argb(color);
    pack_rgba([r * brightness, g * brightness, b * brightness, a])
}
