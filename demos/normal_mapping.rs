//! Lecture 6: a Wavefront OBJ model with a diffuse texture and a tangent-space normal map.
//!
//! Press N to toggle normal mapping. `--model`, `--texture` and `--normal-map` replace the default assets; missing
//! textures are generated.

mod support;

use anyhow::Context;
use derive_more::{Add, Mul};
use lectures::{
    light::{normal_matrix, perturb_normal, phong, tbn},
    pattern, rgb_texture, to_rgb_u32, DepthMode, FlyCamera, Key, Linear, Material, MeshVertex, Obj, Pipeline,
    PointLight, RgbTexture, Sampler, Texture, TriangleList, Window,
};
use log::info;
use std::{ops::ControlFlow, path::PathBuf};
use vek::*;

#[derive(Add, Mul, Clone)]
struct Surface {
    world_pos: Vec3<f32>,
    uv: Vec2<f32>,
    normal: Vec3<f32>,
    tangent: Vec3<f32>,
    bitangent: Vec3<f32>,
}

struct NormalMapped<'a> {
    model: Mat4<f32>,
    normal_matrix: Mat3<f32>,
    view_projection: Mat4<f32>,
    view_pos: Vec3<f32>,
    light: PointLight,
    material: Material,
    diffuse: Linear<RgbTexture<'a>>,
    normal_map: Linear<RgbTexture<'a>>,
    normal_mapping: bool,
}

impl<'a> Pipeline for NormalMapped<'a> {
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
                uv: v.uv,
                normal: self.normal_matrix * v.normal,
                // Tangents lie in the surface, so they transform like positions
                tangent: (self.model * Vec4::from_direction(v.tangent)).xyz(),
                bitangent: (self.model * Vec4::from_direction(v.bitangent)).xyz(),
            },
        )
    }

    #[inline(always)]
    fn fragment(&self, s: Self::VertexData) -> Self::Fragment {
        let uv = s.uv.into_array();
        let normal = if self.normal_mapping {
            perturb_normal(tbn(s.tangent, s.bitangent, s.normal), self.normal_map.sample(uv))
        } else {
            s.normal
        };
        phong(&self.light, &self.material, s.world_pos, normal, self.view_pos, self.diffuse.sample(uv))
    }

    fn blend(&self, _: Self::Pixel, color: Self::Fragment) -> Self::Pixel {
        to_rgb_u32(color)
    }
}

fn main() -> anyhow::Result<()> {
    let args = support::init();

    let model_path = args
        .model
        .clone()
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/data/crate.obj")));
    let mesh = Obj::from_file(&model_path)
        .with_context(|| format!("failed to load model {}", model_path.display()))?
        .to_mesh();
    anyhow::ensure!(!mesh.is_empty(), "model {} has no faces", model_path.display());
    let fit = mesh.normalizing_transform();

    let diffuse = support::load_texture(args.texture.as_deref(), || {
        pattern::checkerboard(512, 4, Rgb::new(181, 134, 84), Rgb::new(140, 98, 57))
    });
    let normal_map = support::load_texture(args.normal_map.as_deref(), || pattern::bump_normal_map(512, 6));

    let mut window = Window::new(args.settings("Lecture 6").clear_color(Rgb::new(0.1, 0.1, 0.1)))?;
    let mut camera = FlyCamera::new(Vec3::new(0.0, 1.0, 3.5)).looking_at(Vec3::zero());
    let mut normal_mapping = true;

    window.run(|frame| {
        if frame.input.was_pressed(Key::N) {
            normal_mapping = !normal_mapping;
            info!("normal mapping {}", if normal_mapping { "on" } else { "off" });
        }
        support::steer(&mut camera, frame.input, frame.dt.as_secs_f32());
        let t = frame.t.as_secs_f32();

        let model = Mat4::rotation_y(t * 0.2) * fit;
        NormalMapped {
            model,
            normal_matrix: normal_matrix(model),
            view_projection: camera.projection(frame.aspect()) * camera.view(),
            view_pos: camera.position,
            light: PointLight {
                position: Vec3::new(t.cos() * 2.0, 1.5, t.sin() * 2.0),
                ..PointLight::default()
            },
            material: Material::default(),
            diffuse: rgb_texture(&diffuse).linear(),
            normal_map: rgb_texture(&normal_map).linear(),
            normal_mapping,
        }
        .render(&mesh.vertices, frame.color, frame.depth);

        ControlFlow::Continue(())
    })?;

    Ok(())
}
