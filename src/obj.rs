//! A minimal Wavefront OBJ loader.
//!
//! Only geometry is read: positions (`v`), texture coordinates (`vt`), normals (`vn`) and faces (`f`). Faces with more
//! than three corners are split into a triangle fan. Grouping, smoothing and material statements are accepted and
//! ignored.

use crate::mesh::{compute_tangents, Mesh, MeshVertex};
use log::{debug, info};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};
use thiserror::Error;
use vek::{Vec2, Vec3};

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("failed to read OBJ data")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("`{statement}` needs at least {expected} components, found {found}")]
    MissingComponents {
        statement: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("face has {0} corners, at least 3 are required")]
    TooFewCorners(usize),
    #[error("malformed face corner `{0}`")]
    InvalidCorner(String),
    #[error("{attribute} index {index} is out of range, {len} are defined")]
    IndexOutOfRange {
        attribute: &'static str,
        index: i64,
        len: usize,
    },
}

/// One corner of a face: zero-based indices into the attribute lists of an [`Obj`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub tex_coord: Option<usize>,
    pub normal: Option<usize>,
}

/// The geometry of an OBJ file, with every face triangulated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Obj {
    pub positions: Vec<Vec3<f32>>,
    /// Texture coordinates with `v` flipped so that it runs down the image.
    pub tex_coords: Vec<Vec2<f32>>,
    pub normals: Vec<Vec3<f32>>,
    pub triangles: Vec<[Corner; 3]>,
}

impl Obj {
    pub fn parse(src: &str) -> Result<Self, ObjError> {
        let mut obj = Self::default();
        for (i, line) in src.lines().enumerate() {
            obj.parse_line(i + 1, line)?;
        }
        Ok(obj)
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, ObjError> {
        let mut obj = Self::default();
        for (i, line) in reader.lines().enumerate() {
            obj.parse_line(i + 1, &line?)?;
        }
        Ok(obj)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ObjError> {
        let path = path.as_ref();
        let obj = Self::from_reader(BufReader::new(File::open(path)?))?;
        info!(
            "loaded {}: {} positions, {} texture coordinates, {} normals, {} triangles",
            path.display(),
            obj.positions.len(),
            obj.tex_coords.len(),
            obj.normals.len(),
            obj.triangles.len(),
        );
        Ok(obj)
    }

    fn parse_line(&mut self, line_no: usize, line: &str) -> Result<(), ObjError> {
        let err = |kind| ObjError::Parse { line: line_no, kind };

        let line = line.split('#').next().unwrap_or_default();
        let mut words = line.split_whitespace();
        let keyword = match words.next() {
            Some(keyword) => keyword,
            None => return Ok(()),
        };
        let args = words.collect::<Vec<_>>();

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats::<3>("v", &args).map_err(err)?;
                self.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u] = parse_floats::<1>("vt", &args).map_err(err)?;
                let v = match args.get(1) {
                    Some(v) => parse_float(v).map_err(err)?,
                    None => 0.0,
                };
                self.tex_coords.push(Vec2::new(u, 1.0 - v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>("vn", &args).map_err(err)?;
                self.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                if args.len() < 3 {
                    return Err(err(ParseErrorKind::TooFewCorners(args.len())));
                }
                let corners = args
                    .iter()
                    .map(|corner| self.parse_corner(corner))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(err)?;
                for i in 1..corners.len() - 1 {
                    self.triangles.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            "o" | "g" | "s" | "usemtl" | "mtllib" | "l" | "p" => {
                debug!("line {}: ignoring `{}` statement", line_no, keyword);
            }
            _ => debug!("line {}: ignoring unsupported `{}` statement", line_no, keyword),
        }
        Ok(())
    }

    fn parse_corner(&self, corner: &str) -> Result<Corner, ParseErrorKind> {
        let invalid = || ParseErrorKind::InvalidCorner(corner.to_string());
        let mut parts = corner.split('/');

        let position = match parts.next() {
            Some(p) if !p.is_empty() => resolve_index("position", p, self.positions.len())?,
            _ => return Err(invalid()),
        };
        let tex_coord = match parts.next() {
            None | Some("") => None,
            Some(t) => Some(resolve_index("texture coordinate", t, self.tex_coords.len())?),
        };
        let normal = match parts.next() {
            None => None,
            Some("") => return Err(invalid()),
            Some(n) => Some(resolve_index("normal", n, self.normals.len())?),
        };
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Corner {
            position,
            tex_coord,
            normal,
        })
    }

    /// Flatten the triangles into a non-indexed mesh with tangents.
    ///
    /// Corners without texture coordinates get `(0, 0)` and corners without a normal get the normal of their face.
    pub fn to_mesh(&self) -> Mesh {
        let mut vertices = Vec::with_capacity(self.triangles.len() * 3);
        for &tri in &self.triangles {
            let [p0, p1, p2] = tri.map(|c| self.positions[c.position]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            let face_normal = if face_normal.magnitude_squared() > 0.0 {
                face_normal.normalized()
            } else {
                Vec3::unit_z()
            };

            vertices.extend(tri.iter().map(|c| MeshVertex {
                position: self.positions[c.position],
                uv: c.tex_coord.map_or(Vec2::zero(), |i| self.tex_coords[i]),
                normal: c.normal.map_or(face_normal, |i| self.normals[i]),
                ..MeshVertex::default()
            }));
        }
        compute_tangents(&mut vertices);
        Mesh::new(vertices)
    }
}

impl FromStr for Obj {
    type Err = ObjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_float(s: &str) -> Result<f32, ParseErrorKind> {
    s.parse().map_err(|_| ParseErrorKind::InvalidNumber(s.to_string()))
}

fn parse_floats<const N: usize>(statement: &'static str, args: &[&str]) -> Result<[f32; N], ParseErrorKind> {
    if args.len() < N {
        return Err(ParseErrorKind::MissingComponents {
            statement,
            expected: N,
            found: args.len(),
        });
    }
    let mut out = [0.0; N];
    for (o, a) in out.iter_mut().zip(args) {
        *o = parse_float(a)?;
    }
    Ok(out)
}

/// Turn a 1-based (or negative, relative) OBJ index into a zero-based one.
fn resolve_index(attribute: &'static str, s: &str, len: usize) -> Result<usize, ParseErrorKind> {
    let index = s
        .parse::<i64>()
        .map_err(|_| ParseErrorKind::InvalidNumber(s.to_string()))?;
    let resolved = match index {
        i if i > 0 => i - 1,
        i if i < 0 => len as i64 + i,
        _ => -1,
    };
    if resolved < 0 || resolved >= len as i64 {
        return Err(ParseErrorKind::IndexOutOfRange { attribute, index, len });
    }
    Ok(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD: &str = "\
# a unit quad
o quad
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
s off
f 1/1/1 2/2/1 3/3/1 4/4/1
";

    #[test]
    fn quad_is_fan_triangulated() {
        let obj = Obj::parse(QUAD).unwrap();
        assert_eq!(obj.positions.len(), 4);
        assert_eq!(obj.triangles.len(), 2);
        let positions = obj.triangles.iter().map(|tri| tri.map(|c| c.position)).collect::<Vec<_>>();
        assert_eq!(positions, vec![[0, 1, 2], [0, 2, 3]]);
        assert!(obj.triangles.iter().flatten().all(|c| c.normal == Some(0)));
        // v is flipped on load
        assert_eq!(obj.tex_coords[0], Vec2::new(0.0, 1.0));
    }

    #[test]
    fn corner_forms() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1 2/1 3//1\n";
        let obj: Obj = src.parse().unwrap();
        let [a, b, c] = obj.triangles[0];
        assert_eq!((a.tex_coord, a.normal), (None, None));
        assert_eq!((b.tex_coord, b.normal), (Some(0), None));
        assert_eq!((c.tex_coord, c.normal), (None, Some(0)));
    }

    #[test]
    fn negative_indices_are_relative() {
        let obj = Obj::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(obj.triangles[0].map(|c| c.position), [0, 1, 2]);
    }

    #[test]
    fn errors_carry_line_numbers() {
        match Obj::parse("v 0 0 0\nv 1 zero 0\n") {
            Err(ObjError::Parse { line: 2, kind }) => assert_eq!(kind, ParseErrorKind::InvalidNumber("zero".into())),
            other => panic!("unexpected result {:?}", other),
        }
        match Obj::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n") {
            Err(ObjError::Parse {
                line: 4,
                kind: ParseErrorKind::IndexOutOfRange { index: 4, len: 3, .. },
            }) => {}
            other => panic!("unexpected result {:?}", other),
        }
        assert!(matches!(
            Obj::parse("v 0 0 0\nf 1 1\n"),
            Err(ObjError::Parse {
                line: 2,
                kind: ParseErrorKind::TooFewCorners(2)
            })
        ));
        assert!(matches!(
            Obj::parse("v 0 0\n"),
            Err(ObjError::Parse {
                kind: ParseErrorKind::MissingComponents { found: 2, .. },
                ..
            })
        ));
        assert!(matches!(
            Obj::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 0\n"),
            Err(ObjError::Parse {
                kind: ParseErrorKind::IndexOutOfRange { index: 0, .. },
                ..
            })
        ));
    }

    #[test]
    fn mesh_fills_in_missing_attributes() {
        let mesh = Obj::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3 # trailing comment\n")
            .unwrap()
            .to_mesh();
        assert_eq!(mesh.len(), 3);
        for v in &mesh.vertices {
            assert_eq!(v.uv, Vec2::zero());
            assert_eq!(v.normal, Vec3::unit_z());
            assert!(v.tangent.dot(v.normal).abs() < 1.0e-5);
        }
    }

    #[test]
    fn textured_mesh_gets_tangents() {
        let mesh = Obj::parse(QUAD).unwrap().to_mesh();
        assert_eq!(mesh.len(), 6);
        for v in &mesh.vertices {
            assert!((v.tangent - Vec3::unit_x()).magnitude() < 1.0e-5);
            assert!((v.bitangent + Vec3::unit_y()).magnitude() < 1.0e-5);
        }
    }

    #[test]
    fn reader_and_missing_file() {
        let obj = Obj::from_reader(QUAD.as_bytes()).unwrap();
        assert_eq!(obj, Obj::parse(QUAD).unwrap());
        assert!(matches!(
            Obj::from_file("definitely/not/here.obj"),
            Err(ObjError::Io(_))
        ));
    }
}
