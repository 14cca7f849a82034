//! Lecture 4: walking around a field of cubes with a fly camera.
//!
//! WASD moves, Space and LeftShift rise and sink, dragging with the left mouse button looks around and the scroll
//! wheel zooms.

mod support;

use lectures::{
    mesh::{self, MeshVertex},
    pattern, rgb_texture, to_rgb_u32, DepthMode, FlyCamera, Linear, Pipeline, RgbTexture, Sampler, Texture,
    TriangleList, Window,
};
use std::ops::ControlFlow;
use vek::*;

struct TexturedCube<'a> {
    mvp: Mat4<f32>,
    texture: Linear<RgbTexture<'a>>,
}

impl<'a> Pipeline for TexturedCube<'a> {
    type Vertex = MeshVertex;
    type VertexData = Vec2<f32>;
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

const CUBE_POSITIONS: [[f32; 3]; 10] = [
    [0.0, 0.0, 0.0],
    [2.0, 5.0, -15.0],
    [-1.5, -2.2, -2.5],
    [-3.8, -2.0, -12.3],
    [2.4, -0.4, -3.5],
    [-1.7, 3.0, -7.5],
    [1.3, -2.0, -2.5],
    [1.5, 2.0, -2.5],
    [1.5, 0.2, -1.5],
    [-1.3, 1.0, -1.5],
];

fn main() -> anyhow::Result<()> {
    let args = support::init();
    let mut window = Window::new(args.settings("Lecture 4").clear_color(Rgb::new(0.2, 0.3, 0.3)))?;

    let cube = mesh::cube();
    let texture = support::load_texture(args.texture.as_deref(), || {
        pattern::checkerboard(256, 8, Rgb::new(200, 200, 210), Rgb::new(60, 90, 140))
    });
    let mut camera = FlyCamera::default();

    window.run(|frame| {
        support::steer(&mut camera, frame.input, frame.dt.as_secs_f32());
        let view_projection = camera.projection(frame.aspect()) * camera.view();
        let t = frame.t.as_secs_f32();

        for (i, pos) in CUBE_POSITIONS.iter().enumerate() {
            // Every third cube spins, the rest keep their initial tilt
            let angle = 20f32.to_radians() * i as f32 + if i % 3 == 0 { t } else { 0.0 };
            let model: Mat4<f32> = Mat4::<f32>::translation_3d(Vec3::<f32>::from(*pos))
                * Mat4::<f32>::rotation_3d(angle, Vec3::new(1.0, 0.3, 0.5).normalized());

            TexturedCube {
                mvp: view_projection * model,
                texture: rgb_texture(&texture).linear(),
            }
            .render(&cube.vertices, frame.color, frame.depth);
        }
        ControlFlow::Continue(())
    })?;

    Ok(())
}
