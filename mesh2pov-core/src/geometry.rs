//! Unified in-memory mesh representation.
//!
//! Both parsers populate a [`Mesh`]: append-only vertex/normal/UV sequences
//! plus indexed triangles. Parsing and the single repair pass are the only
//! stages that mutate it; everything downstream treats it as read-only.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::ValidationError;

/// A triangle as indices into the owning mesh's element sequences.
///
/// Vertex indices are always present; normal and UV indices are optional
/// per corner (`None` when the source file supplied no reference). Winding
/// order is preserved from the source file and is significant for shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle {
    /// Indices into [`Mesh::vertices`].
    pub vertices: [u32; 3],
    /// Per-corner indices into [`Mesh::normals`].
    pub normals: [Option<u32>; 3],
    /// Per-corner indices into [`Mesh::uvs`].
    pub uvs: [Option<u32>; 3],
}

impl Triangle {
    /// Triangle with vertex indices only.
    pub fn from_vertices(vertices: [u32; 3]) -> Self {
        Self {
            vertices,
            normals: [None; 3],
            uvs: [None; 3],
        }
    }
}

/// A named sub-object: a label over a contiguous run of triangles.
///
/// OBJ files may declare several via `o` records; STL input produces a
/// single implicit object. The `usemtl` name seen inside the object is
/// recorded verbatim but never resolved (MTL import is out of scope).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedObject {
    /// Object label from the source file.
    pub name: String,
    /// First triangle index belonging to this object.
    pub start: usize,
    /// One past the last triangle index.
    pub end: usize,
    /// Last material name declared inside this object, if any.
    pub material: Option<String>,
}

/// The unified mesh model shared by the OBJ and STL parsers.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions, in file order (STL input is deduplicated).
    pub vertices: Vec<Point3<f64>>,
    /// Normal directions. Not required unit-length until repair runs.
    pub normals: Vec<Vector3<f64>>,
    /// Texture coordinates; empty when the source has none.
    pub uvs: Vec<Point2<f64>>,
    /// Indexed triangles.
    pub triangles: Vec<Triangle>,
    /// Named sub-objects; empty means one implicit unnamed object.
    pub objects: Vec<NamedObject>,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::new(),
            uvs: Vec::new(),
            triangles: Vec::with_capacity(triangle_count),
            objects: Vec::new(),
        }
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Geometric normal of a triangle from its vertex positions.
    ///
    /// Cross product of the two edges leaving the first vertex, normalized.
    /// Collinear triangles have a zero cross product; those get the fixed
    /// `(0, 0, 1)` fallback so the result is never degenerate.
    pub fn face_normal(&self, triangle: &Triangle) -> Vector3<f64> {
        let [a, b, c] = triangle.vertices;
        let v0 = self.vertices[a as usize];
        let v1 = self.vertices[b as usize];
        let v2 = self.vertices[c as usize];
        let cross = (v1 - v0).cross(&(v2 - v0));
        let len = cross.norm();
        if len == 0.0 {
            Vector3::z()
        } else {
            cross / len
        }
    }

    /// Check that every triangle reference is inside its element list.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, tri) in self.triangles.iter().enumerate() {
            for &v in &tri.vertices {
                if v as usize >= self.vertices.len() {
                    return Err(ValidationError::IndexOutOfRange {
                        triangle: i,
                        kind: "vertex",
                        index: v,
                        len: self.vertices.len(),
                    });
                }
            }
            for n in tri.normals.iter().flatten() {
                if *n as usize >= self.normals.len() {
                    return Err(ValidationError::IndexOutOfRange {
                        triangle: i,
                        kind: "normal",
                        index: *n,
                        len: self.normals.len(),
                    });
                }
            }
            for t in tri.uvs.iter().flatten() {
                if *t as usize >= self.uvs.len() {
                    return Err(ValidationError::IndexOutOfRange {
                        triangle: i,
                        kind: "uv",
                        index: *t,
                        len: self.uvs.len(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_mesh() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
        mesh.triangles.push(Triangle::from_vertices([0, 1, 2]));
        mesh
    }

    #[test]
    fn face_normal_right_hand_rule() {
        let mesh = triangle_mesh();
        let n = mesh.face_normal(&mesh.triangles[0]);
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn face_normal_collinear_fallback() {
        let mut mesh = Mesh::new();
        mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
        mesh.vertices.push(Point3::new(2.0, 0.0, 0.0));
        mesh.triangles.push(Triangle::from_vertices([0, 1, 2]));
        let n = mesh.face_normal(&mesh.triangles[0]);
        assert_eq!(n, Vector3::z());
    }

    #[test]
    fn validate_accepts_in_range_indices() {
        let mesh = triangle_mesh();
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn validate_rejects_vertex_out_of_range() {
        let mut mesh = triangle_mesh();
        mesh.triangles.push(Triangle::from_vertices([0, 1, 3]));
        let err = mesh.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::IndexOutOfRange {
                kind: "vertex",
                index: 3,
                ..
            }
        ));
    }

    #[test]
    fn validate_rejects_normal_out_of_range() {
        let mut mesh = triangle_mesh();
        mesh.triangles[0].normals = [Some(0), Some(0), Some(0)];
        let err = mesh.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::IndexOutOfRange { kind: "normal", .. }
        ));
    }
}
