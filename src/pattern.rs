//! Procedural textures, used in place of image assets that could not be loaded.

use core::f32::consts::TAU;
use image::{Rgb as ImageRgb, RgbImage};
use vek::{Rgb, Vec3};

/// A `size` x `size` checkerboard with `cells` squares along each side, starting with `a` in the top left corner.
pub fn checkerboard(size: u32, cells: u32, a: Rgb<u8>, b: Rgb<u8>) -> RgbImage {
    let cell = (size / cells.max(1)).max(1);
    RgbImage::from_fn(size, size, |x, y| {
        let c = if (x / cell + y / cell) % 2 == 0 { a } else { b };
        ImageRgb(c.into_array())
    })
}

/// A tangent-space normal map of a `bumps` x `bumps` grid of smooth bumps and dents.
///
/// The map tiles seamlessly and follows the usual convention of `+y` pointing towards the top of the image.
pub fn bump_normal_map(size: u32, bumps: u32) -> RgbImage {
    let k = TAU * bumps as f32;
    RgbImage::from_fn(size, size, |x, y| {
        let u = (x as f32 + 0.5) / size as f32;
        let v = (y as f32 + 0.5) / size as f32;
        // Height is sin(ku) sin(kv) / k, so slopes stay within [-1, 1]
        let dh_du = (k * u).cos() * (k * v).sin();
        let dh_dv = (k * u).sin() * (k * v).cos();
        let n = Vec3::new(-dh_du, dh_dv, 1.0).normalized();
        ImageRgb(((n + 1.0) * 127.5).map(|e| e.round().clamp(0.0, 255.0) as u8).into_array())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_alternates() {
        let img = checkerboard(8, 4, Rgb::white(), Rgb::black());
        assert_eq!(img.dimensions(), (8, 8));
        assert_eq!(img.get_pixel(0, 0), &ImageRgb([255; 3]));
        assert_eq!(img.get_pixel(1, 1), &ImageRgb([255; 3]));
        assert_eq!(img.get_pixel(2, 0), &ImageRgb([0; 3]));
        assert_eq!(img.get_pixel(2, 2), &ImageRgb([255; 3]));
        assert_eq!(img.get_pixel(7, 0), &ImageRgb([0; 3]));
    }

    #[test]
    fn bump_map_points_outwards_and_tiles() {
        let img = bump_normal_map(64, 4);
        assert!(img.pixels().all(|p| p.0[2] > 127));
        // Opposite edges continue into each other
        for i in 0..64 {
            let (left, right) = (img.get_pixel(0, i).0, img.get_pixel(63, i).0);
            assert!(left.iter().zip(right.iter()).all(|(a, b)| (*a as i32 - *b as i32).abs() <= 64));
        }
        // The map is not flat
        assert!(img.pixels().any(|p| p.0[0] < 100));
    }
}
