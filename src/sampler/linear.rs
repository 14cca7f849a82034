use super::*;
use core::ops::{Add, Mul};

/// Bilinear filtering.
///
/// Texel centres sit at `(i + 0.5) / size`. Neighbouring texels are fetched with repeat addressing, so filtering
/// across the edge of the texture blends with the opposite edge.
#[derive(Clone, Debug)]
pub struct Linear<T>(T);

impl<T: Texture> Linear<T> {
    /// # Panics
    ///
    /// Panics if the texture has no texels.
    pub fn new(texture: T) -> Self {
        let [w, h] = texture.size();
        assert!(w > 0 && h > 0, "cannot filter a {}x{} texture", w, h);
        Self(texture)
    }
}

impl<T> Sampler for Linear<T>
where
    T: Texture,
    T::Texel: Mul<f32, Output = T::Texel> + Add<Output = T::Texel>,
{
    type Sample = T::Texel;

    type Texture = T;

    #[inline(always)]
    fn raw_texture(&self) -> &T {
        &self.0
    }

    #[inline(always)]
    fn sample(&self, [u, v]: [f32; 2]) -> Self::Sample {
        let [w, h] = self.0.size();
        // Shift so that texel centres land on whole numbers
        let x = wrap(u) * w as f32 - 0.5;
        let y = wrap(v) * h as f32 - 0.5;
        let (fx, fy) = (x - x.floor(), y - y.floor());

        let x0 = (x.floor() as isize).rem_euclid(w as isize) as usize;
        let y0 = (y.floor() as isize).rem_euclid(h as isize) as usize;
        let (x1, y1) = ((x0 + 1) % w, (y0 + 1) % h);

        // Safety: every index is reduced modulo the size, which `Linear::new` checked is non-zero
        let [t00, t10, t01, t11] = unsafe {
            [[x0, y0], [x1, y0], [x0, y1], [x1, y1]].map(|index| self.0.read_unchecked(index))
        };

        let top = t00 * (1.0 - fx) + t10 * fx;
        let bottom = t01 * (1.0 - fx) + t11 * fx;
        top * (1.0 - fy) + bottom * fy
    }
}
