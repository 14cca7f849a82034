//! Building blocks for a series of real-time graphics lessons.
//!
//! Rendering happens on the CPU: a [`Pipeline`] implementation is a vertex shader plus a fragment shader, and
//! [`Pipeline::render`] rasterizes a vertex stream into colour and depth [`Buffer2d`]s. The `window` feature presents
//! those buffers in a window and drives the per-frame loop.

pub mod buffer;
pub mod camera;
pub mod color;
pub mod index;
pub mod light;
pub mod math;
pub mod mesh;
pub mod obj;
#[cfg(feature = "image")]
pub mod pattern;
pub mod pipeline;
pub mod primitives;
pub mod rasterizer;
pub mod sampler;
pub mod texture;
#[cfg(feature = "window")]
pub mod window;

// Reexports
pub use crate::{
    buffer::Buffer2d,
    camera::{FlyCamera, Movement},
    color::{from_argb, to_argb, to_rgb_u32},
    index::IndexedVertices,
    light::{Material, PointLight},
    math::WeightedSum,
    mesh::{Mesh, MeshVertex},
    obj::{Obj, ObjError},
    pipeline::{CoordinateMode, DepthMode, Pipeline, PixelMode, YAxisDirection},
    primitives::TriangleList,
    rasterizer::CullMode,
    sampler::{Linear, Nearest, Sampler},
    texture::{Empty, Map, Target, Texture},
};
#[cfg(feature = "image")]
pub use crate::texture::{rgb_texture, RgbTexture};
#[cfg(feature = "window")]
pub use crate::window::{Frame, Input, Key, Settings, Window, WindowError};
