//! Conversions between floating point colours and packed `0xAARRGGBB` pixels.
//!
//! The window reads the low 24 bits as `0x00RRGGBB` and ignores the alpha byte.

use vek::{Rgb, Rgba};

/// Clamp a colour to `[0, 1]` and pack it as `0xAARRGGBB`.
#[inline]
pub fn to_argb(rgba: Rgba<f32>) -> u32 {
    let [r, g, b, a] = rgba
        .map(|e| (e.max(0.0).min(1.0) * 255.0 + 0.5) as u8)
        .into_array();
    // The window's framebuffer uses BGRA byte order
    u32::from_le_bytes([b, g, r, a])
}

/// Clamp a colour to `[0, 1]` and pack it as an opaque `0xFFRRGGBB`.
#[inline]
pub fn to_rgb_u32(rgb: Rgb<f32>) -> u32 {
    to_argb(Rgba::from_opaque(rgb))
}

/// Unpack a `0xAARRGGBB` pixel into a floating point colour.
#[inline]
pub fn from_argb(px: u32) -> Rgba<f32> {
    let [b, g, r, a] = px.to_le_bytes();
    Rgba::new(r, g, b, a).map(|e| e as f32 / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_as_argb() {
        assert_eq!(to_argb(Rgba::new(1.0, 0.0, 0.0, 1.0)), 0xFF_FF_00_00);
        assert_eq!(to_rgb_u32(Rgb::new(0.0, 1.0, 0.0)), 0xFF_00_FF_00);
        assert_eq!(to_rgb_u32(Rgb::new(0.0, 0.0, 2.0)), 0xFF_00_00_FF);
        assert_eq!(to_argb(Rgba::new(-1.0, 0.5, 0.0, 0.0)), 0x00_00_80_00);
    }

    #[test]
    fn opaque_pixels_keep_the_window_layout() {
        let px = to_rgb_u32(Rgb::new(0.2, 0.3, 0.3));
        assert_eq!(px >> 24, 0xFF);
        assert_eq!(px & 0x00FF_FFFF, 0x0033_4D4D);
    }

    #[test]
    fn unpacks_what_it_packs() {
        let c = from_argb(0xFF_33_66_99);
        assert_eq!(to_argb(c), 0xFF_33_66_99);
        assert_eq!(c.a, 1.0);
    }
}
