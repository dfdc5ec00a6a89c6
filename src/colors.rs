//! Packed ARGB8888 colors and the float RGB triples used while shading.
//!
//! Every color that lands in a buffer is a `u32` laid out as `0xAARRGGBB`.
//! Lighting and interpolation work on [`Rgb`] triples in `[0.0, 1.0]`.

/// Linear RGB triple, each channel nominally in `[0.0, 1.0]`.
pub type Rgb = (f32, f32, f32);

pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;
pub const RED: u32 = 0xFFFF0000;
pub const GREEN: u32 = 0xFF00FF00;
pub const BLUE: u32 = 0xFF0000FF;

pub const BACKGROUND: u32 = 0xFF1E1E1E;
pub const FILL: u32 = 0xFFC8C8C8;
pub const WIREFRAME: u32 = 0xFF00FF00;
pub const VERTEX: u32 = 0xFFFF0000;

#[inline]
fn to_channel(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u32
}

/// Pack float channels into an ARGB8888 color. Channels are clamped and
/// rounded to the nearest 8-bit value.
#[inline]
pub fn pack_color(r: f32, g: f32, b: f32, a: f32) -> u32 {
    (to_channel(a) << 24) | (to_channel(r) << 16) | (to_channel(g) << 8) | to_channel(b)
}

#[inline]
pub fn pack_rgb(rgb: Rgb) -> u32 {
    pack_color(rgb.0, rgb.1, rgb.2, 1.0)
}

/// Unpack the RGB channels of an ARGB8888 color.
#[inline]
pub fn unpack_color(color: u32) -> Rgb {
    let (r, g, b, _) = unpack_rgba(color);
    (r, g, b)
}

/// Unpack all four channels of an ARGB8888 color, returned as `(r, g, b, a)`.
#[inline]
pub fn unpack_rgba(color: u32) -> (f32, f32, f32, f32) {
    let channel = |shift: u32| ((color >> shift) & 0xFF) as f32 / 255.0;
    (channel(16), channel(8), channel(0), channel(24))
}

#[inline]
pub fn lerp_color(c0: Rgb, c1: Rgb, t: f32) -> Rgb {
    (
        c0.0 + (c1.0 - c0.0) * t,
        c0.1 + (c1.1 - c0.1) * t,
        c0.2 + (c1.2 - c0.2) * t,
    )
}

/// Scale the RGB channels of a packed color by a scalar intensity, keeping alpha.
#[inline]
pub fn modulate(color: u32, intensity: f32) -> u32 {
    modulate_rgb(color, (intensity, intensity, intensity))
}

/// Multiply the RGB channels of a packed color channel-wise, keeping alpha.
#[inline]
pub fn modulate_rgb(color: u32, factor: Rgb) -> u32 {
    let (r, g, b, a) = unpack_rgba(color);
    pack_color(r * factor.0, g * factor.1, b * factor.2, a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_preserves_8bit_channels() {
        let color = 0x80FF4000;
        let (r, g, b, a) = unpack_rgba(color);
        assert_eq!(pack_color(r, g, b, a), color);
    }

    #[test]
    fn packing_rounds_near_one_up() {
        assert_eq!(pack_rgb((0.999_99, 0.0, 0.0)), RED);
    }

    #[test]
    fn modulate_rgb_is_channel_wise() {
        assert_eq!(modulate_rgb(WHITE, (1.0, 0.0, 0.5)), 0xFFFF0080);
        assert_eq!(modulate(0x40FFFFFF, 0.0), 0x40000000);
    }
}
