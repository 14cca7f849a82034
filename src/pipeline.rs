use crate::{
    math::WeightedSum,
    primitives::PrimitiveKind,
    rasterizer::{Blitter, Rasterizer},
    texture::Target,
};
use std::{borrow::Borrow, cmp::Ordering, ops::Range};

/// How fragments interact with the depth buffer, like `glDepthFunc` plus `glDepthMask`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct DepthMode {
    /// How a fragment's depth must compare to the stored depth for the fragment to be kept. `None` keeps every
    /// fragment.
    pub test: Option<Ordering>,
    /// Whether kept fragments store their depth.
    pub write: bool,
}

impl DepthMode {
    /// Depth testing disabled: later triangles paint over earlier ones.
    pub const NONE: Self = Self {
        test: None,
        write: false,
    };

    /// `glEnable(GL_DEPTH_TEST)` with the default `GL_LESS`.
    pub const LESS_WRITE: Self = Self {
        test: Some(Ordering::Less),
        write: true,
    };

    /// `GL_GREATER`, for depth buffers cleared to the near plane.
    pub const GREATER_WRITE: Self = Self {
        test: Some(Ordering::Greater),
        write: true,
    };

    /// Test against the depth buffer without updating it (`glDepthMask(GL_FALSE)`).
    pub const LESS_PASS: Self = Self {
        test: Some(Ordering::Less),
        write: false,
    };

    pub const GREATER_PASS: Self = Self {
        test: Some(Ordering::Greater),
        write: false,
    };

    pub fn uses_depth(&self) -> bool {
        self.test.is_some() || self.write
    }

    /// Whether a fragment at depth `z` survives against the stored depth `old`. NaN depths never pass a test.
    pub fn passes(&self, z: f32, old: f32) -> bool {
        self.test.map_or(true, |test| z.partial_cmp(&old) == Some(test))
    }
}

/// Whether fragments are written to the colour buffer. `PASS` gives a depth-only pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct PixelMode {
    pub write: bool,
}

impl PixelMode {
    pub const WRITE: Self = Self { write: true };

    pub const PASS: Self = Self { write: false };
}

impl Default for PixelMode {
    fn default() -> Self {
        Self::WRITE
    }
}

/// The screen direction of +y in normalised device coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum YAxisDirection {
    Down,
    Up,
}

/// The normalised device coordinate conventions of a pipeline.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct CoordinateMode {
    pub y_axis_direction: YAxisDirection,
    /// Fragments whose NDC depth falls outside this range (bounds included) are discarded. `None` keeps them all.
    pub z_clip_range: Option<Range<f32>>,
}

impl CoordinateMode {
    /// +y up, depth in `[-1, 1]`.
    pub const OPENGL: Self = Self {
        y_axis_direction: YAxisDirection::Up,
        z_clip_range: Some(-1.0..1.0),
    };

    /// +y down, depth in `[0, 1]`.
    pub const VULKAN: Self = Self {
        y_axis_direction: YAxisDirection::Down,
        z_clip_range: Some(0.0..1.0),
    };

    pub fn without_z_clip(self) -> Self {
        Self {
            z_clip_range: None,
            ..self
        }
    }

    pub(crate) fn passes_z_clip(&self, z: f32) -> bool {
        match &self.z_clip_range {
            Some(range) => range.start <= z && z <= range.end,
            None => true,
        }
    }
}

impl Default for CoordinateMode {
    fn default() -> Self {
        Self::OPENGL
    }
}

type PrimitiveRasterizer<P> = <<P as Pipeline>::Primitives as PrimitiveKind<<P as Pipeline>::VertexData>>::Rasterizer;

pub type RasterizerConfig<P> = <PrimitiveRasterizer<P> as Rasterizer>::Config;

/// A shader program together with the fixed-function state around it.
///
/// [`Pipeline::vertex`] is the vertex shader and [`Pipeline::fragment`] the fragment shader. Uniforms are plain
/// fields of the implementing type, so "setting a uniform" is building the pipeline with a different value. The
/// remaining provided methods play the role of `glEnable`/`glDepthFunc`/`glCullFace` and may be overridden.
pub trait Pipeline: Sized {
    /// One element of the vertex buffer.
    type Vertex;
    /// Vertex shader outputs, interpolated across each primitive before reaching the fragment shader.
    type VertexData: Clone + WeightedSum + Send + Sync;
    type Primitives: PrimitiveKind<Self::VertexData>;
    type Fragment;
    type Pixel: Clone;

    #[inline]
    fn pixel_mode(&self) -> PixelMode {
        PixelMode::default()
    }

    #[inline]
    fn depth_mode(&self) -> DepthMode {
        DepthMode::NONE
    }

    #[inline]
    fn coordinate_mode(&self) -> CoordinateMode {
        CoordinateMode::default()
    }

    /// The face culling mode when drawing [`TriangleList`](crate::TriangleList)s.
    #[inline]
    fn rasterizer_config(&self) -> RasterizerConfig<Self> {
        Default::default()
    }

    /// Returns the clip-space position `[x, y, z, w]` of a vertex and the data to interpolate for it.
    fn vertex(&self, vertex: &Self::Vertex) -> ([f32; 4], Self::VertexData);

    /// Runs for every covered pixel that survives clipping and the depth test.
    fn fragment(&self, data: Self::VertexData) -> Self::Fragment;

    /// Combine a shaded fragment with the pixel already in the colour buffer.
    fn blend(&self, old: Self::Pixel, new: Self::Fragment) -> Self::Pixel;

    /// Draw a vertex stream into `pixel` and `depth`, the equivalent of `glDrawArrays`.
    ///
    /// Pass [`Empty`](crate::Empty) for a buffer the pipeline does not use.
    ///
    /// # Panics
    ///
    /// Panics if both buffers are in use and their sizes differ.
    fn render<S, V, P, D>(&self, vertices: S, pixel: &mut P, depth: &mut D)
    where
        Self: Send + Sync,
        S: IntoIterator<Item = V>,
        V: Borrow<Self::Vertex>,
        P: Target<Texel = Self::Pixel> + Send + Sync,
        D: Target<Texel = f32> + Send + Sync,
    {
        let size = match target_size(self.pixel_mode(), self.depth_mode(), &*pixel, &*depth) {
            Some(size) => size,
            None => return,
        };

        // Vertex shading and primitive assembly. Incomplete trailing primitives are dropped.
        let mut shaded = vertices.into_iter().map(|v| self.vertex(v.borrow()));
        let mut assembled = Vec::new();
        while let Some(prim) = Self::Primitives::collect_primitive(&mut shaded) {
            Self::Primitives::primitive_vertices(prim, |v| assembled.push(v));
        }

        render_bands(self, &assembled, size, pixel, depth);
    }
}

/// The size of the area to render, or `None` if the pipeline writes to neither buffer.
fn target_size<P, D>(pixels: PixelMode, depth_mode: DepthMode, pixel: &P, depth: &D) -> Option<[usize; 2]>
where
    P: Target,
    D: Target,
{
    match (pixels.write, depth_mode.uses_depth()) {
        (false, false) => None,
        (true, false) => Some(pixel.size()),
        (false, true) => Some(depth.size()),
        (true, true) => {
            assert_eq!(
                pixel.size(),
                depth.size(),
                "colour and depth buffers must have the same size"
            );
            Some(pixel.size())
        }
    }
}

/// Split the target into bands of rows and rasterize the bands on all cores.
#[cfg(feature = "par")]
fn render_bands<Pipe, P, D>(
    pipeline: &Pipe,
    vertices: &[([f32; 4], Pipe::VertexData)],
    size: [usize; 2],
    pixel: &mut P,
    depth: &mut D,
) where
    Pipe: Pipeline + Send + Sync,
    P: Target<Texel = Pipe::Pixel> + Send + Sync,
    D: Target<Texel = f32> + Send + Sync,
{
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
    };

    const FRAGMENTS_PER_BAND: usize = 20_000;
    let band_rows = (FRAGMENTS_PER_BAND / size[0].max(1)).max(1);
    let bands = (size[1] + band_rows - 1) / band_rows;
    let threads = num_cpus::get().min(bands);

    if threads <= 1 {
        // Safety: `&mut` on both targets means nothing else can touch them
        unsafe { rasterize_rows(pipeline, vertices, 0..size[1], size, &*pixel, &*depth) };
        return;
    }

    let next_row = AtomicUsize::new(0);
    let (pixel, depth, next_row) = (&*pixel, &*depth, &next_row);
    thread::scope(|s| {
        for _ in 0..threads {
            s.spawn(move || loop {
                let start = next_row.fetch_add(band_rows, Ordering::Relaxed);
                if start >= size[1] {
                    break;
                }
                let rows = start..(start + band_rows).min(size[1]);
                // Safety: each band is claimed by exactly one thread, and every thread writes only inside its band
                unsafe { rasterize_rows(pipeline, vertices, rows, size, pixel, depth) };
            });
        }
    });
}

#[cfg(not(feature = "par"))]
fn render_bands<Pipe, P, D>(
    pipeline: &Pipe,
    vertices: &[([f32; 4], Pipe::VertexData)],
    size: [usize; 2],
    pixel: &mut P,
    depth: &mut D,
) where
    Pipe: Pipeline + Send + Sync,
    P: Target<Texel = Pipe::Pixel> + Send + Sync,
    D: Target<Texel = f32> + Send + Sync,
{
    // Safety: `&mut` on both targets means nothing else can touch them
    unsafe { rasterize_rows(pipeline, vertices, 0..size[1], size, &*pixel, &*depth) }
}

/// Rasterize every primitive, keeping only the fragments that fall in `rows`.
///
/// # Safety
///
/// No other thread may access `rows` of either target during the call, and `rows` must lie inside every target the
/// pipeline writes to.
unsafe fn rasterize_rows<Pipe, P, D>(
    pipeline: &Pipe,
    vertices: &[([f32; 4], Pipe::VertexData)],
    rows: Range<usize>,
    size: [usize; 2],
    pixel: &P,
    depth: &D,
) where
    Pipe: Pipeline + Send + Sync,
    P: Target<Texel = Pipe::Pixel> + Send + Sync,
    D: Target<Texel = f32> + Send + Sync,
{
    let fragments = Fragments {
        pipeline,
        write_pixels: pipeline.pixel_mode().write,
        depth_mode: pipeline.depth_mode(),
        min: [0, rows.start],
        max: [size[0], rows.end],
        size,
        pixel,
        depth,
    };
    debug_assert!(!fragments.write_pixels || fragments.max[1] <= pixel.size()[1]);
    debug_assert!(!fragments.depth_mode.uses_depth() || fragments.max[1] <= depth.size()[1]);

    <Pipe::Primitives as PrimitiveKind<Pipe::VertexData>>::Rasterizer::default().rasterize(
        vertices.iter().cloned(),
        pipeline.coordinate_mode(),
        pipeline.rasterizer_config(),
        fragments,
    );
}

/// Depth testing, shading and blending for the fragments of one band of rows.
struct Fragments<'a, Pipe, P, D> {
    pipeline: &'a Pipe,
    write_pixels: bool,
    depth_mode: DepthMode,
    min: [usize; 2],
    max: [usize; 2],
    size: [usize; 2],
    pixel: &'a P,
    depth: &'a D,
}

impl<'a, Pipe, P, D> Blitter<Pipe::VertexData> for Fragments<'a, Pipe, P, D>
where
    Pipe: Pipeline,
    P: Target<Texel = Pipe::Pixel>,
    D: Target<Texel = f32>,
{
    fn target_size(&self) -> [usize; 2] {
        self.size
    }

    fn target_min(&self) -> [usize; 2] {
        self.min
    }

    fn target_max(&self) -> [usize; 2] {
        self.max
    }

    #[inline]
    fn begin_primitive(&mut self) {}

    #[inline]
    unsafe fn test_fragment(&mut self, x: usize, y: usize, z: f32) -> bool {
        self.depth_mode.test.is_none() || self.depth_mode.passes(z, self.depth.read_exclusive_unchecked(x, y))
    }

    #[inline]
    unsafe fn emit_fragment<F: FnMut(f32, f32) -> Pipe::VertexData>(
        &mut self,
        x: usize,
        y: usize,
        mut v_data: F,
        z: f32,
    ) {
        if self.depth_mode.write {
            self.depth.write_exclusive_unchecked(x, y, z);
        }
        if self.write_pixels {
            let fragment = self.pipeline.fragment(v_data(x as f32, y as f32));
            let old = self.pixel.read_exclusive_unchecked(x, y);
            self.pixel
                .write_exclusive_unchecked(x, y, self.pipeline.blend(old, fragment));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_comparisons() {
        assert!(DepthMode::NONE.passes(0.5, -0.5));
        assert!(DepthMode::LESS_WRITE.passes(-0.5, 0.5));
        assert!(!DepthMode::LESS_PASS.passes(0.5, 0.5));
        assert!(DepthMode::GREATER_WRITE.passes(0.5, -0.5));
        assert!(!DepthMode::GREATER_PASS.passes(-0.5, 0.5));
        assert!(!DepthMode::LESS_WRITE.passes(f32::NAN, 1.0));
        assert!(!DepthMode::NONE.uses_depth());
        assert!(DepthMode::LESS_PASS.uses_depth());
    }

    #[test]
    fn z_clip_is_inclusive() {
        let gl = CoordinateMode::OPENGL;
        assert!(gl.passes_z_clip(-1.0) && gl.passes_z_clip(1.0));
        assert!(!gl.passes_z_clip(1.0001));
        assert!(!CoordinateMode::VULKAN.passes_z_clip(-0.5));
        assert!(gl.without_z_clip().passes_z_clip(7.0));
    }
}
