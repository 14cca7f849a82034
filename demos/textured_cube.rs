//! Lecture 3: a textured cube under perspective projection.
//!
//! Pass `--texture <image>` to use your own texture, otherwise a checkerboard is generated.

mod support;

use lectures::{
    mesh::{self, MeshVertex},
    pattern, rgb_texture, to_rgb_u32, DepthMode, Linear, Pipeline, RgbTexture, Sampler, Texture, TriangleList, Window,
};
use std::ops::ControlFlow;
use vek::*;

struct TexturedCube<'a> {
    mvp: Mat4<f32>,
    texture: Linear<RgbTexture<'a>>,
}

impl<'a> Pipeline for TexturedCube<'a> {
    type Vertex = MeshVertex;
    type VertexData = Vec2<f32>; // Texture coordinate
    type Primitives = TriangleList;
    type Fragment = Rgb<f32>;
    type Pixel = u32;

    fn depth_mode(&self) -> DepthMode {
        DepthMode::LESS_WRITE
    }

    #[inline(always)]
    fn vertex(&self, v: &Self::Vertex) -> ([f32; 4], Self::VertexData) {
        ((self.mvp * Vec4::from_point(v.position)).into_array(), v.uv)
    }

    #[inline(always)]
    fn fragment(&self, uv: Self::VertexData) -> Self::Fragment {
        self.texture.sample(uv.into_array())
    }

    fn blend(&self, _: Self::Pixel, color: Self::Fragment) -> Self::Pixel {
        to_rgb_u32(color)
    }
}

fn main() -> anyhow::Result<()> {
    let args = support::init();
    let mut window = Window::new(args.settings("Lecture 3").clear_color(Rgb::new(0.2, 0.3, 0.3)))?;

    let cube = mesh::cube();
    let texture = support::load_texture(args.texture.as_deref(), || {
        pattern::checkerboard(256, 8, Rgb::new(230, 160, 60), Rgb::new(90, 50, 20))
    });

    window.run(|frame| {
        let t = frame.t.as_secs_f32();
        let model = Mat4::rotation_3d(t * 50f32.to_radians(), Vec3::new(0.5, 1.0, 0.0).normalized());
        let view = Mat4::translation_3d(Vec3::new(0.0, 0.0, -3.0));
        let projection = Mat4::perspective_rh_no(45f32.to_radians(), frame.aspect(), 0.1, 100.0);

        TexturedCube {
            mvp: projection * view * model,
            texture: rgb_texture(&texture).linear(),
        }
        .render(&cube.vertices, frame.color, frame.depth);
        ControlFlow::Continue(())
    })?;

    Ok(())
}
