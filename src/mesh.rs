//! Non-indexed triangle meshes with a per-vertex tangent-space basis.

use log::debug;
use vek::{Mat4, Vec2, Vec3};

/// A single corner of a triangle, carrying everything the lit and normal-mapped pipelines need.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: Vec3<f32>,
    /// Texture coordinate, with `v` increasing towards the bottom of the image.
    pub uv: Vec2<f32>,
    pub normal: Vec3<f32>,
    /// Direction of increasing `u` in model space.
    pub tangent: Vec3<f32>,
    /// Direction of increasing `v` in model space.
    pub bitangent: Vec3<f32>,
}

/// A triangle list: every three consecutive vertices form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
}

impl Mesh {
    pub fn new(vertices: Vec<MeshVertex>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate over complete triangles. Trailing vertices that do not form a triangle are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = &[MeshVertex]> + '_ {
        self.vertices.chunks_exact(3)
    }

    /// The axis-aligned bounds of the mesh as `(min, max)`, or `None` if it has no vertices.
    pub fn bounds(&self) -> Option<(Vec3<f32>, Vec3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (Vec3::partial_min(min, v.position), Vec3::partial_max(max, v.position))
        }))
    }

    /// A model matrix that centres the mesh on the origin and scales it to fit the `[-1, 1]` cube.
    pub fn normalizing_transform(&self) -> Mat4<f32> {
        let (min, max) = match self.bounds() {
            Some(bounds) => bounds,
            None => return Mat4::identity(),
        };
        let centre = (min + max) * 0.5;
        let extent = (max - min).reduce_partial_max();
        let scale = if extent > 0.0 { 2.0 / extent } else { 1.0 };
        Mat4::scaling_3d(scale) * Mat4::translation_3d(-centre)
    }
}

fn normalized_or(v: Vec3<f32>, fallback: Vec3<f32>) -> Vec3<f32> {
    let len_sq = v.magnitude_squared();
    if len_sq > f32::EPSILON * f32::EPSILON && len_sq.is_finite() {
        v / len_sq.sqrt()
    } else {
        fallback
    }
}

/// An arbitrary tangent and bitangent perpendicular to `normal`.
fn basis_from_normal(normal: Vec3<f32>) -> (Vec3<f32>, Vec3<f32>) {
    let axis = if normal.x.abs() > 0.9 { Vec3::unit_y() } else { Vec3::unit_x() };
    let tangent = normalized_or(axis - normal * normal.dot(axis), Vec3::unit_x());
    (tangent, normal.cross(tangent))
}

/// Compute the tangent and bitangent of every triangle from its positions and texture coordinates and store them on
/// all three of its corners.
///
/// Triangles whose texture coordinates are degenerate (e.g. a model without any) get a basis built from their face
/// normal instead.
pub fn compute_tangents(vertices: &mut [MeshVertex]) {
    let mut degenerate = 0;
    for tri in vertices.chunks_exact_mut(3) {
        let e1 = tri[1].position - tri[0].position;
        let e2 = tri[2].position - tri[0].position;
        let d1 = tri[1].uv - tri[0].uv;
        let d2 = tri[2].uv - tri[0].uv;

        let face_normal = normalized_or(e1.cross(e2), Vec3::unit_z());
        let det = d1.x * d2.y - d2.x * d1.y;

        let (tangent, bitangent) = if det.abs() > 1.0e-12 {
            let r = 1.0 / det;
            let tangent = (e1 * d2.y - e2 * d1.y) * r;
            let bitangent = (e2 * d1.x - e1 * d2.x) * r;
            let (fallback_t, fallback_b) = basis_from_normal(face_normal);
            (normalized_or(tangent, fallback_t), normalized_or(bitangent, fallback_b))
        } else {
            degenerate += 1;
            basis_from_normal(face_normal)
        };

        for v in tri {
            v.tangent = tangent;
            v.bitangent = bitangent;
        }
    }

    if degenerate > 0 {
        debug!(
            "{} of {} triangles have degenerate texture coordinates, their tangents follow the face normal",
            degenerate,
            vertices.len() / 3
        );
    }
}

/// The 36-vertex cube spanning `[-0.5, 0.5]` on every axis, each face textured with the full `[0, 1]` range and
/// wound counter-clockwise when seen from outside.
pub fn cube() -> Mesh {
    // (normal, right, up) with right x up = normal
    const FACES: [[[f32; 3]; 3]; 6] = [
        [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        [[1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]],
        [[-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]],
        [[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]],
        [[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
    ];
    const CORNERS: [[f32; 2]; 6] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let mut vertices = Vec::with_capacity(36);
    for [normal, right, up] in FACES.map(|face| face.map(Vec3::from)) {
        for [s, t] in CORNERS {
            vertices.push(MeshVertex {
                position: normal * 0.5 + right * (s - 0.5) + up * (t - 0.5),
                uv: Vec2::new(s, 1.0 - t),
                normal,
                ..MeshVertex::default()
            });
        }
    }
    compute_tangents(&mut vertices);
    Mesh::new(vertices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3<f32>, b: Vec3<f32>) -> bool {
        (a - b).magnitude() < 1.0e-5
    }

    #[test]
    fn tangents_follow_texture_axes() {
        let mut tri = [
            MeshVertex {
                position: Vec3::new(0.0, 0.0, 0.0),
                uv: Vec2::new(0.0, 1.0),
                ..MeshVertex::default()
            },
            MeshVertex {
                position: Vec3::new(2.0, 0.0, 0.0),
                uv: Vec2::new(1.0, 1.0),
                ..MeshVertex::default()
            },
            MeshVertex {
                position: Vec3::new(0.0, 2.0, 0.0),
                uv: Vec2::new(0.0, 0.0),
                ..MeshVertex::default()
            },
        ];
        compute_tangents(&mut tri);
        for v in &tri {
            assert!(close(v.tangent, Vec3::unit_x()), "{:?}", v.tangent);
            // v grows towards the bottom of the image, i.e. down the triangle
            assert!(close(v.bitangent, -Vec3::unit_y()), "{:?}", v.bitangent);
        }
    }

    #[test]
    fn degenerate_uvs_fall_back_to_the_normal() {
        let mut tri = [
            MeshVertex {
                position: Vec3::new(0.0, 0.0, 0.0),
                ..MeshVertex::default()
            },
            MeshVertex {
                position: Vec3::new(1.0, 0.0, 0.0),
                ..MeshVertex::default()
            },
            MeshVertex {
                position: Vec3::new(0.0, 1.0, 0.0),
                ..MeshVertex::default()
            },
        ];
        compute_tangents(&mut tri);
        let n = Vec3::unit_z();
        assert!(tri[0].tangent.dot(n).abs() < 1.0e-5);
        assert!(tri[0].bitangent.dot(n).abs() < 1.0e-5);
        assert!((tri[0].tangent.magnitude() - 1.0).abs() < 1.0e-5);
        assert!(tri
            .iter()
            .all(|v| v.tangent.iter().chain(v.bitangent.iter()).all(|e| e.is_finite())));
    }

    #[test]
    fn cube_is_closed_and_wound_outwards() {
        let cube = cube();
        assert_eq!(cube.len(), 36);
        for tri in cube.triangles() {
            let n = (tri[1].position - tri[0].position).cross(tri[2].position - tri[0].position);
            assert!(n.dot(tri[0].normal) > 0.0, "face {:?} is wound inwards", tri[0].normal);
            // The tangent frame is right-handed relative to the flipped v axis
            assert!(close(tri[0].tangent.cross(-tri[0].bitangent), tri[0].normal));
        }
        assert_eq!(cube.bounds(), Some((Vec3::broadcast(-0.5), Vec3::broadcast(0.5))));
    }

    #[test]
    fn normalizing_transform_spans_minus_one_to_one() {
        let mesh = Mesh::new(
            [Vec3::new(2.0, 2.0, 2.0), Vec3::new(6.0, 4.0, 2.0), Vec3::new(2.0, 3.0, 3.0)]
                .iter()
                .map(|&position| MeshVertex {
                    position,
                    ..MeshVertex::default()
                })
                .collect(),
        );
        let m = mesh.normalizing_transform();
        let lo = Vec3::from(m * vek::Vec4::from_point(Vec3::new(2.0, 2.0, 2.0)));
        let hi = Vec3::from(m * vek::Vec4::from_point(Vec3::new(6.0, 4.0, 3.0)));
        assert!(close(lo, Vec3::new(-1.0, -0.5, -0.25)), "{:?}", lo);
        assert!(close(hi, Vec3::new(1.0, 0.5, 0.25)), "{:?}", hi);
        assert_eq!(Mesh::default().normalizing_transform(), Mat4::identity());
    }
}
