//! Lecture 5: a cube lit by an orbiting point light, shaded per fragment with the Phong model.
//!
//! The small white cube marks the light. The camera controls are the same as in lecture 4.

mod support;

use derive_more::{Add, Mul};
use lectures::{
    light::{normal_matrix, phong},
    mesh::{self, MeshVertex},
    to_rgb_u32, DepthMode, FlyCamera, Material, Pipeline, PointLight, TriangleList, Window,
};
use std::ops::ControlFlow;
use vek::*;

#[derive(Add, Mul, Clone)]
struct Surface {
    world_pos: Vec3<f32>,
    normal: Vec3<f32>,
}

struct Lit {
    model: Mat4<f32>,
    normal_matrix: Mat3<f32>,
    view_projection: Mat4<f32>,
    view_pos: Vec3<f32>,
    light: PointLight,
    material: Material,
    albedo: Rgb<f32>,
}

impl Pipeline for Lit {
    type Vertex = MeshVertex;
    type VertexData = Surface;
    type Primitives = TriangleList;
    type Fragment = Rgb<f32>;
    type Pixel = u32;

    fn depth_mode(&self) -> DepthMode {
        DepthMode::LESS_WRITE
    }

    #[inline(always)]
    fn vertex(&self, v: &Self::Vertex) -> ([f32; 4], Self::VertexData) {
        let world_pos = self.model * Vec4::from_point(v.position);
        (
            (self.view_projection * world_pos).into_array(),
            Surface {
                world_pos: world_pos.xyz(),
                normal: self.normal_matrix * v.normal,
            },
        )
    }

    #[inline(always)]
    fn fragment(&self, s: Self::VertexData) -> Self::Fragment {
        phong(&self.light, &self.material, s.world_pos, s.normal, self.view_pos, self.albedo)
    }

    fn blend(&self, _: Self::Pixel, color: Self::Fragment) -> Self::Pixel {
        to_rgb_u32(color)
    }
}

/// Unlit, flat coloured geometry.
struct Lamp {
    mvp: Mat4<f32>,
    color: Rgb<f32>,
}

impl Pipeline for Lamp {
    type Vertex = MeshVertex;
    type VertexData = Rgb<f32>;
    type Primitives = TriangleList;
    type Fragment = Rgb<f32>;
    type Pixel = u32;

    fn depth_mode(&self) -> DepthMode {
        DepthMode::LESS_WRITE
    }

    #[inline(always)]
    fn vertex(&self, v: &Self::Vertex) -> ([f32; 4], Self::VertexData) {
        ((self.mvp * Vec4::from_point(v.position)).into_array(), self.color)
    }

    #[inline(always)]
    fn fragment(&self, color: Self::VertexData) -> Self::Fragment {
        color
    }

    fn blend(&self, _: Self::Pixel, color: Self::Fragment) -> Self::Pixel {
        to_rgb_u32(color)
    }
}

fn main() -> anyhow::Result<()> {
    let args = support::init();
    let mut window = Window::new(args.settings("Lecture 5").clear_color(Rgb::new(0.1, 0.1, 0.1)))?;

    let cube = mesh::cube();
    let mut camera = FlyCamera::new(Vec3::new(0.0, 0.5, 4.0)).looking_at(Vec3::zero());

    window.run(|frame| {
        support::steer(&mut camera, frame.input, frame.dt.as_secs_f32());
        let t = frame.t.as_secs_f32();
        let view_projection = camera.projection(frame.aspect()) * camera.view();

        let light = PointLight {
            position: Vec3::new(t.cos() * 1.5, 1.0, t.sin() * 1.5),
            ..PointLight::default()
        };

        let model = Mat4::rotation_y(t * 0.3);
        Lit {
            model,
            normal_matrix: normal_matrix(model),
            view_projection,
            view_pos: camera.position,
            light,
            material: Material::default(),
            albedo: Rgb::new(1.0, 0.5, 0.31),
        }
        .render(&cube.vertices, frame.color, frame.depth);

        Lamp {
            mvp: view_projection * Mat4::translation_3d(light.position) * Mat4::scaling_3d(0.2),
            color: light.color,
        }
        .render(&cube.vertices, frame.color, frame.depth);

        ControlFlow::Continue(())
    })?;

    Ok(())
}
