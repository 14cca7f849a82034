//! Two-dimensional textures and the render targets the pipeline draws into.

use crate::sampler::{Linear, Nearest};

/// Anything that can be read texel by texel, like a GL texture object.
///
/// Indices are `[x, y]` with `y` counting rows from the top of the image.
pub trait Texture {
    type Texel: Clone;

    /// Width and height in texels. Every index below this size must be readable.
    fn size(&self) -> [usize; 2];

    /// # Panics
    ///
    /// May panic, or return any texel, if `index` is out of bounds.
    fn read(&self, index: [usize; 2]) -> Self::Texel;

    /// # Safety
    ///
    /// `index` must be within [`Texture::size`].
    unsafe fn read_unchecked(&self, index: [usize; 2]) -> Self::Texel {
        self.read(index)
    }

    /// Sample with bilinear filtering (`GL_LINEAR`) and repeating coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the texture has no texels.
    fn linear(self) -> Linear<Self>
    where
        Self: Sized,
    {
        Linear::new(self)
    }

    /// Sample without filtering (`GL_NEAREST`) and with repeating coordinates.
    fn nearest(self) -> Nearest<Self>
    where
        Self: Sized,
    {
        Nearest::new(self)
    }

    /// Convert every texel with `f` as it is read.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Texel) -> U,
    {
        Map { tex: self, f }
    }
}

impl<T: Texture> Texture for &T {
    type Texel = T::Texel;

    #[inline(always)]
    fn size(&self) -> [usize; 2] {
        (**self).size()
    }

    #[inline(always)]
    fn read(&self, index: [usize; 2]) -> Self::Texel {
        (**self).read(index)
    }

    #[inline(always)]
    unsafe fn read_unchecked(&self, index: [usize; 2]) -> Self::Texel {
        (**self).read_unchecked(index)
    }
}

/// See [`Texture::map`].
#[derive(Clone, Debug)]
pub struct Map<T, F> {
    tex: T,
    f: F,
}

impl<T, F, U> Texture for Map<T, F>
where
    T: Texture,
    F: Fn(T::Texel) -> U,
    U: Clone,
{
    type Texel = U;

    #[inline(always)]
    fn size(&self) -> [usize; 2] {
        self.tex.size()
    }

    #[inline(always)]
    fn read(&self, index: [usize; 2]) -> U {
        (self.f)(self.tex.read(index))
    }

    #[inline(always)]
    unsafe fn read_unchecked(&self, index: [usize; 2]) -> U {
        (self.f)(self.tex.read_unchecked(index))
    }
}

/// A texture the pipeline can draw into: a colour buffer or a depth buffer.
///
/// The parallel renderer hands disjoint bands of rows to different threads, all sharing `&self`. Each texel must
/// therefore live at its own memory location so that writes to different texels never race.
pub trait Target: Texture {
    /// # Safety
    ///
    /// `(x, y)` must be in bounds and no other thread may access that texel during the call.
    unsafe fn read_exclusive_unchecked(&self, x: usize, y: usize) -> Self::Texel;

    /// # Safety
    ///
    /// `(x, y)` must be in bounds and no other thread may access that texel during the call.
    unsafe fn write_exclusive_unchecked(&self, x: usize, y: usize, texel: Self::Texel);

    /// Write one texel. Writes outside the target are dropped.
    fn write(&mut self, x: usize, y: usize, texel: Self::Texel) {
        let [w, h] = self.size();
        if x < w && y < h {
            // Safety: bounds checked above, and `&mut self` rules out other accessors
            unsafe { self.write_exclusive_unchecked(x, y, texel) }
        }
    }

    /// Fill the whole target, like `glClear`.
    fn clear(&mut self, texel: Self::Texel) {
        let [w, h] = self.size();
        for y in 0..h {
            for x in 0..w {
                self.write(x, y, texel.clone());
            }
        }
    }
}

/// A target with no texels, for pipelines that skip the depth test (or, with [`PixelMode::PASS`], the colour
/// buffer).
///
/// [`PixelMode::PASS`]: crate::PixelMode::PASS
#[derive(Copy, Clone, Debug, Default)]
pub struct Empty<T>(core::marker::PhantomData<T>);

impl<T> Empty<T> {
    pub const fn new() -> Self {
        Self(core::marker::PhantomData)
    }
}

impl<T: Clone> Texture for Empty<T> {
    type Texel = T;

    fn size(&self) -> [usize; 2] {
        [0, 0]
    }

    fn read(&self, index: [usize; 2]) -> T {
        panic!("read {:?} from an empty texture", index)
    }
}

impl<T: Clone + Default> Target for Empty<T> {
    #[inline(always)]
    unsafe fn read_exclusive_unchecked(&self, _: usize, _: usize) -> T {
        T::default()
    }

    #[inline(always)]
    unsafe fn write_exclusive_unchecked(&self, _: usize, _: usize, _: T) {}
}

#[cfg(feature = "image")]
impl<P, C> Texture for image::ImageBuffer<P, C>
where
    P: image::Pixel + 'static,
    C: core::ops::Deref<Target = [P::Subpixel]>,
{
    type Texel = P;

    #[inline(always)]
    fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    #[inline(always)]
    fn read(&self, [x, y]: [usize; 2]) -> P {
        *self.get_pixel(x as u32, y as u32)
    }
}

/// An 8-bit RGB image read as `[0, 1]` colours.
#[cfg(feature = "image")]
pub type RgbTexture<'a> = Map<&'a image::RgbImage, fn(image::Rgb<u8>) -> vek::Rgb<f32>>;

/// View an 8-bit RGB image as a texture of `[0, 1]` colours, converting texels as they are sampled.
#[cfg(feature = "image")]
pub fn rgb_texture(img: &image::RgbImage) -> RgbTexture<'_> {
    fn unorm(px: image::Rgb<u8>) -> vek::Rgb<f32> {
        vek::Rgb::from(px.0).map(|e: u8| e as f32 / 255.0)
    }
    Texture::map(img, unorm as fn(image::Rgb<u8>) -> vek::Rgb<f32>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer2d;

    #[test]
    fn map_converts_on_read() {
        let buf = Buffer2d::fill([2, 2], 3u8);
        let tex = (&buf).map(|t| t as f32 * 0.5);
        assert_eq!(tex.size(), [2, 2]);
        assert_eq!(tex.read([1, 1]), 1.5);
    }

    #[test]
    fn out_of_bounds_write_is_ignored() {
        let mut buf = Buffer2d::fill([2, 2], 0u32);
        buf.write(5, 0, 9);
        buf.write(1, 1, 7);
        assert_eq!(buf.raw(), &[0, 0, 0, 7]);
    }

    #[test]
    fn empty_target_reads_default() {
        let empty = Empty::<f32>::default();
        assert_eq!(empty.size(), [0, 0]);
        assert_eq!(unsafe { empty.read_exclusive_unchecked(3, 4) }, 0.0);
    }

    #[cfg(feature = "image")]
    #[test]
    fn image_buffers_are_textures() {
        let img = image::RgbImage::from_fn(4, 2, |x, y| image::Rgb([x as u8 * 85, y as u8 * 255, 0]));
        assert_eq!(Texture::size(&img), [4, 2]);
        assert_eq!(Texture::read(&img, [3, 1]), image::Rgb([255, 255, 0]));

        let tex = rgb_texture(&img);
        assert_eq!(tex.size(), [4, 2]);
        assert_eq!(tex.read([1, 0]), vek::Rgb::new(1.0 / 3.0, 0.0, 0.0));
        assert_eq!(tex.read([3, 1]), vek::Rgb::new(1.0, 1.0, 0.0));
    }
}
