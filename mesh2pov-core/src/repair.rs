//! Post-parse geometry fixes.
//!
//! Runs once between parsing and bounding analysis. Both passes are
//! idempotent and mutate the mesh in place; afterwards the model is
//! read-only for the rest of the pipeline.

use tracing::debug;

use crate::geometry::Mesh;

/// Replace degenerate triangle normals with computed face normals.
///
/// A triangle corner needs fixing when it has no normal reference at all or
/// when the referenced normal has exactly zero magnitude. The replacement
/// is the triangle's geometric normal (edge cross product, normalized;
/// `(0, 0, 1)` for collinear triangles), appended to the normal sequence
/// and repointed — referenced normals are never edited in place because
/// OBJ normals may be shared across triangles.
pub fn fix_degenerate_normals(mesh: &mut Mesh) {
    let mut fixed = 0usize;

    for i in 0..mesh.triangles.len() {
        let mut degenerate = [false; 3];
        let mut any = false;
        for (corner, slot) in mesh.triangles[i].normals.iter().enumerate() {
            let bad = match slot {
                None => true,
                Some(n) => mesh.normals[*n as usize].norm_squared() == 0.0,
            };
            degenerate[corner] = bad;
            any |= bad;
        }
        if !any {
            continue;
        }

        let triangle = mesh.triangles[i];
        let normal = mesh.face_normal(&triangle);
        mesh.normals.push(normal);
        let new_index = (mesh.normals.len() - 1) as u32;
        for (corner, bad) in degenerate.iter().enumerate() {
            if *bad {
                mesh.triangles[i].normals[corner] = Some(new_index);
            }
        }
        fixed += 1;
    }

    if fixed > 0 {
        debug!(triangles = fixed, "replaced degenerate normals");
    }
}

/// Negate the x-component of every vertex and normal.
///
/// Triangle winding order is left unchanged, so shading that depends on
/// consistent winding may appear inverted after a flip; callers wanting
/// both must reverse winding themselves.
pub fn flip_x(mesh: &mut Mesh) {
    for vertex in &mut mesh.vertices {
        vertex.x = -vertex.x;
    }
    for normal in &mut mesh.normals {
        normal.x = -normal.x;
    }
}
