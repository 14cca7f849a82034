mod triangles;

pub use self::triangles::Triangles;

use crate::{math::WeightedSum, pipeline::CoordinateMode};

/// The face culling strategy used during rendering.
///
/// Front faces are those whose vertices appear counter-clockwise on screen (with y pointing up), as in OpenGL.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// Do not cull triangles regardless of their winding order.
    None,
    /// Cull clockwise (i.e: back-facing) triangles.
    Back,
    /// Cull counter-clockwise (i.e: front-facing) triangles.
    Front,
}

impl Default for CullMode {
    fn default() -> Self {
        CullMode::Back
    }
}

/// The part of the pipeline a rasterizer hands fragments to.
///
/// The blitter owns the render targets and the shaders: it decides whether a fragment passes the depth test, shades
/// it and blends it into the pixel target.
pub trait Blitter<V>: Sized {
    fn target_size(&self) -> [usize; 2];
    fn target_min(&self) -> [usize; 2];
    fn target_max(&self) -> [usize; 2];

    fn begin_primitive(&mut self);

    /// Test whether a fragment at the given depth should be drawn.
    ///
    /// # Safety
    ///
    /// `x` and `y` must lie within `target_min()..target_max()`.
    unsafe fn test_fragment(&mut self, x: usize, y: usize, z: f32) -> bool;

    /// Shade and write a fragment. `get_v_data` yields the interpolated vertex data at a framebuffer position.
    ///
    /// # Safety
    ///
    /// `x` and `y` must lie within `target_min()..target_max()`.
    unsafe fn emit_fragment<F: FnMut(f32, f32) -> V>(&mut self, x: usize, y: usize, get_v_data: F, z: f32);
}

/// A trait for types that define an interface for rasterizing primitives.
pub trait Rasterizer: Default {
    type Config: Default;

    /// Rasterize the given vertices into the blitter's target region.
    ///
    /// # Safety
    ///
    /// The blitter's region must be within the bounds of its targets.
    unsafe fn rasterize<V, I, B>(
        &self,
        vertices: I,
        coords: CoordinateMode,
        config: Self::Config,
        blitter: B,
    ) where
        V: Clone + WeightedSum,
        I: Iterator<Item = ([f32; 4], V)>,
        B: Blitter<V>;
}
