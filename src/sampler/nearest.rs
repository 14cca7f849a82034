use super::*;

/// Unfiltered sampling: the texel under the coordinate.
#[derive(Clone, Debug)]
pub struct Nearest<T>(T);

impl<T> Nearest<T> {
    pub fn new(texture: T) -> Self {
        Self(texture)
    }
}

/// Map a coordinate in `[0, 1)` onto `0..len`.
#[inline(always)]
fn texel(coord: f32, len: usize) -> usize {
    ((coord * len as f32) as usize).min(len.saturating_sub(1))
}

impl<T: Texture> Sampler for Nearest<T> {
    type Sample = T::Texel;

    type Texture = T;

    #[inline(always)]
    fn raw_texture(&self) -> &T {
        &self.0
    }

    #[inline(always)]
    fn sample(&self, [u, v]: [f32; 2]) -> Self::Sample {
        let [w, h] = self.0.size();
        self.0.read([texel(wrap(u), w), texel(wrap(v), h)])
    }
}
