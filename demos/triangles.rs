//! Lecture 1: two coloured triangles drawn from a single vertex buffer.
//!
//! The vertex shader shifts everything half a unit to the left. There is no depth test, so the green triangle,
//! being drawn second, ends up on top even though it sits further away.

mod support;

use lectures::{to_rgb_u32, CullMode, Empty, Pipeline, TriangleList, Window};
use std::ops::ControlFlow;
use vek::*;

struct VertexColors {
    offset: Vec4<f32>,
}

impl Pipeline for VertexColors {
    type Vertex = (Vec3<f32>, Rgb<f32>);
    type VertexData = Rgb<f32>;
    type Primitives = TriangleList;
    type Fragment = Rgb<f32>;
    type Pixel = u32;

    fn rasterizer_config(&self) -> CullMode {
        CullMode::None
    }

    #[inline(always)]
    fn vertex(&self, (pos, color): &Self::Vertex) -> ([f32; 4], Self::VertexData) {
        ((Vec4::from_point(*pos) + self.offset).into_array(), *color)
    }

    #[inline(always)]
    fn fragment(&self, color: Self::VertexData) -> Self::Fragment {
        color
    }

    fn blend(&self, _: Self::Pixel, color: Self::Fragment) -> Self::Pixel {
        to_rgb_u32(color)
    }
}

const RED: Rgb<f32> = Rgb::new(1.0, 0.0, 0.0);
const GREEN: Rgb<f32> = Rgb::new(0.0, 1.0, 0.0);

const VERTICES: &[(Vec3<f32>, Rgb<f32>)] = &[
    (Vec3::new(-0.5, -0.5, 0.0), RED),
    (Vec3::new(0.5, -0.5, 0.0), RED),
    (Vec3::new(0.0, 0.5, 0.0), RED),
    // Second triangle
    (Vec3::new(-0.5, 0.5, 1.0), GREEN),
    (Vec3::new(0.0, 0.0, 1.0), GREEN),
    (Vec3::new(-0.8, -0.5, 1.0), GREEN),
];

fn main() -> anyhow::Result<()> {
    let args = support::init();
    let mut window = Window::new(args.settings("Lecture 1"))?;

    let pipeline = VertexColors {
        offset: Vec4::new(-0.5, 0.0, 0.0, 0.0),
    };
    window.run(|frame| {
        pipeline.render(VERTICES, frame.color, &mut Empty::default());
        ControlFlow::Continue(())
    })?;

    Ok(())
}
