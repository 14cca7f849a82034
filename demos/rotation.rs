//! Lecture 2: a triangle spun around the screen centre by an angle uniform.
//!
//! Up and Down change how fast the angle advances.

mod support;

use lectures::{to_rgb_u32, CullMode, Empty, Key, Pipeline, TriangleList, Window};
use log::info;
use std::ops::ControlFlow;
use vek::*;

struct Rotate {
    angle: f32,
}

impl Pipeline for Rotate {
    type Vertex = (Vec2<f32>, Rgb<f32>);
    type VertexData = Rgb<f32>;
    type Primitives = TriangleList;
    type Fragment = Rgb<f32>;
    type Pixel = u32;

    fn rasterizer_config(&self) -> CullMode {
        CullMode::None
    }

    #[inline(always)]
    fn vertex(&self, (pos, color): &Self::Vertex) -> ([f32; 4], Self::VertexData) {
        let (s, c) = self.angle.sin_cos();
        let rotated = Vec2::new(pos.x * c - pos.y * s, pos.x * s + pos.y * c);
        ([rotated.x, rotated.y, 0.0, 1.0], *color)
    }

    #[inline(always)]
    fn fragment(&self, color: Self::VertexData) -> Self::Fragment {
        color
    }

    fn blend(&self, _: Self::Pixel, color: Self::Fragment) -> Self::Pixel {
        to_rgb_u32(color)
    }
}

const VERTICES: &[(Vec2<f32>, Rgb<f32>)] = &[
    (Vec2::new(-0.5, -0.4), Rgb::new(1.0, 0.0, 0.0)),
    (Vec2::new(0.5, -0.4), Rgb::new(0.0, 1.0, 0.0)),
    (Vec2::new(0.0, 0.6), Rgb::new(0.0, 0.0, 1.0)),
];

/// Radians per second.
const SPEED_STEP: f32 = 0.5;

fn main() -> anyhow::Result<()> {
    let args = support::init();
    let mut window = Window::new(args.settings("Lecture 2"))?;

    let mut angle = 0.0f32;
    let mut speed = 1.0f32;
    window.run(|frame| {
        if frame.input.was_pressed(Key::Up) || frame.input.was_pressed(Key::Down) {
            speed += frame.input.axis(Key::Down, Key::Up) * SPEED_STEP;
            info!("rotation speed is now {:.1} rad/s", speed);
        }
        angle = (angle + speed * frame.dt.as_secs_f32()) % core::f32::consts::TAU;

        Rotate { angle }.render(VERTICES, frame.color, &mut Empty::default());
        ControlFlow::Continue(())
    })?;

    Ok(())
}
