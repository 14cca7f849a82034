//! Phong lighting and tangent-space normal mapping helpers, for use inside fragment shaders.

use vek::{Mat3, Mat4, Rgb, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3<f32>,
    pub color: Rgb<f32>,
    pub ambient: f32,
    pub diffuse: f32,
    pub specular: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(1.2, 1.0, 2.0),
            color: Rgb::white(),
            ambient: 0.1,
            diffuse: 1.0,
            specular: 0.5,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Specular exponent. Higher values give smaller, sharper highlights.
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self { shininess: 32.0 }
    }
}

/// Shade a fragment with the Phong reflection model.
///
/// All positions and the normal are expected in the same (usually world) space. The result is clamped to `[0, 1]`.
pub fn phong(
    light: &PointLight,
    material: &Material,
    frag_pos: Vec3<f32>,
    normal: Vec3<f32>,
    view_pos: Vec3<f32>,
    albedo: Rgb<f32>,
) -> Rgb<f32> {
    let n = normal.normalized();
    let light_dir = (light.position - frag_pos).normalized();
    let view_dir = (view_pos - frag_pos).normalized();

    let diffuse = n.dot(light_dir).max(0.0) * light.diffuse;
    let reflect_dir = (-light_dir).reflected(n);
    let specular = view_dir.dot(reflect_dir).max(0.0).powf(material.shininess) * light.specular;

    ((albedo * (light.ambient + diffuse) + Rgb::broadcast(specular)) * light.color).map(|e| e.max(0.0).min(1.0))
}

/// Build the matrix taking tangent-space vectors to the space of `t`, `b` and `n`.
///
/// The tangent is re-orthogonalised against the normal first. The bitangent is rebuilt from the two, keeping the
/// handedness of the one passed in.
pub fn tbn(t: Vec3<f32>, b: Vec3<f32>, n: Vec3<f32>) -> Mat3<f32> {
    let n = n.normalized();
    let t = (t - n * n.dot(t)).normalized();
    let b_ortho = n.cross(t);
    let b = if b_ortho.dot(b) < 0.0 { -b_ortho } else { b_ortho };
    Mat3::from_col_arrays([t.into_array(), b.into_array(), n.into_array()])
}

/// Decode a normal map texel and take it out of tangent space.
///
/// Normal maps store `+y` pointing towards the top of the image while texture `v`, and therefore the bitangent, runs
/// towards the bottom, so the green channel is flipped.
pub fn perturb_normal(tbn: Mat3<f32>, sample: Rgb<f32>) -> Vec3<f32> {
    let s = Vec3::new(sample.r, sample.g, sample.b) * 2.0 - 1.0;
    (tbn * Vec3::new(s.x, -s.y, s.z)).normalized()
}

/// The matrix that transforms normals consistently with `model`, even under non-uniform scaling.
pub fn normal_matrix(model: Mat4<f32>) -> Mat3<f32> {
    Mat3::from(model.inverted().transposed())
}
