mod linear;
mod nearest;

pub use self::{linear::Linear, nearest::Nearest};

use crate::texture::Texture;

/// Reads a [`Texture`] at normalised coordinates, like a GLSL `sampler2D`.
///
/// `[0, 0]` is the top-left corner of the image and `[1, 1]` the bottom-right. Coordinates outside that range repeat
/// (`GL_REPEAT`), so a face with texture coordinates running from 0 to 2 shows the texture twice.
pub trait Sampler {
    type Sample: Clone;

    type Texture: Texture;

    fn raw_texture(&self) -> &Self::Texture;

    fn sample(&self, uv: [f32; 2]) -> Self::Sample;
}

/// Wrap a normalised coordinate into `[0, 1)`.
#[inline(always)]
pub(crate) fn wrap(x: f32) -> f32 {
    let w = x.rem_euclid(1.0);
    // `rem_euclid` can round up to exactly 1.0 for tiny negative inputs
    if w >= 1.0 {
        0.0
    } else {
        w
    }
}
