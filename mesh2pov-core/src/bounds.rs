//! Axis-aligned bounding box of the final mesh.

use nalgebra::{Point3, Vector3};

use crate::error::ValidationError;
use crate::geometry::Mesh;

/// An axis-aligned bounding box.
///
/// Computed from the post-repair vertex sequence; the camera planner is the
/// only consumer. A degenerate (zero-volume) box is legal — a single point
/// still has a well-defined center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Compute the bounding box of a mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyMesh`] when the mesh has no vertices;
    /// camera framing is undefined without at least one point.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, ValidationError> {
        let mut points = mesh.vertices.iter();
        let first = points.next().ok_or(ValidationError::EmptyMesh)?;
        let mut aabb = Self {
            min: *first,
            max: *first,
        };
        for p in points {
            aabb.expand_to_include(p);
        }
        Ok(aabb)
    }

    /// Grow the box to contain a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Center of the box (the mesh centroid used as the look-at point).
    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
            (self.min.z + self.max.z) * 0.5,
        )
    }

    /// Extent along each axis.
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }
}
