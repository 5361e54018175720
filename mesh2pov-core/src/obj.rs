//! Wavefront OBJ parser.
//!
//! Line-oriented streaming parse of the `v` / `vn` / `vt` / `f` / `o` /
//! `usemtl` record types. Faces with more than three vertices are
//! fan-triangulated from the first vertex — a known approximation that is
//! wrong for non-convex or non-planar polygons, carried over unchanged from
//! the original behavior. Comments, blank lines, and unrecognized record
//! types are skipped; everything else malformed is a fatal [`ParseError`]
//! with the 1-based line number.

use std::io::BufRead;

use nalgebra::{Point2, Point3, Vector3};
use tracing::warn;

use crate::error::{Error, ParseError, Result};
use crate::geometry::{Mesh, NamedObject, Triangle};
use crate::progress::Progress;

/// One corner of a face: vertex index plus optional UV/normal indices,
/// already resolved to 0-based.
#[derive(Clone, Copy)]
struct Corner {
    vertex: u32,
    uv: Option<u32>,
    normal: Option<u32>,
}

/// Parse OBJ text into a [`Mesh`].
///
/// Increments `progress` once per input line and once per emitted triangle.
///
/// # Errors
///
/// Fails on the first malformed record: wrong field count, non-numeric
/// field, unresolvable face index, or an `o` record without a name.
pub fn parse_obj<R: BufRead>(reader: R, progress: &Progress) -> Result<Mesh> {
    let mut mesh = Mesh::new();
    let mut current_material: Option<String> = None;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index as u64 + 1;
        progress.record_line();

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut fields = trimmed.split_whitespace();
        let Some(keyword) = fields.next() else {
            continue;
        };
        let rest: Vec<&str> = fields.collect();

        match keyword {
            "v" => {
                let [x, y, z] = parse_floats(&rest, line_no, "v")?;
                mesh.vertices.push(Point3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_floats(&rest, line_no, "vn")?;
                mesh.normals.push(Vector3::new(x, y, z));
            }
            "vt" => {
                // First two of up to three fields; the third (w) is ignored.
                if rest.len() < 2 {
                    return Err(ParseError::record(
                        line_no,
                        format!("vt record needs 2 fields, got {}", rest.len()),
                    )
                    .into());
                }
                let u = parse_float(rest[0], line_no)?;
                let v = parse_float(rest[1], line_no)?;
                mesh.uvs.push(Point2::new(u, v));
            }
            "f" => parse_face(&rest, line_no, &mut mesh, progress)?,
            "o" => {
                let name = rest.first().ok_or_else(|| {
                    ParseError::record(line_no, "o record needs an object name")
                })?;
                close_object(&mut mesh);
                // Triangles seen before the first `o` belong to an implicit
                // default object.
                if mesh.objects.is_empty() && !mesh.triangles.is_empty() {
                    mesh.objects.push(NamedObject {
                        name: "default".to_string(),
                        start: 0,
                        end: mesh.triangles.len(),
                        material: current_material.take(),
                    });
                }
                mesh.objects.push(NamedObject {
                    name: (*name).to_string(),
                    start: mesh.triangles.len(),
                    end: mesh.triangles.len(),
                    material: None,
                });
            }
            "usemtl" => {
                let name = rest.first().ok_or_else(|| {
                    ParseError::record(line_no, "usemtl record needs a material name")
                })?;
                match mesh.objects.last_mut() {
                    Some(object) => object.material = Some((*name).to_string()),
                    None => current_material = Some((*name).to_string()),
                }
            }
            other => {
                warn!(line = line_no, record = other, "skipping unrecognized OBJ record");
            }
        }
    }

    close_object(&mut mesh);
    if mesh.objects.is_empty() && !mesh.triangles.is_empty() {
        mesh.objects.push(NamedObject {
            name: "default".to_string(),
            start: 0,
            end: mesh.triangles.len(),
            material: current_material,
        });
    }

    Ok(mesh)
}

/// Extend the open object (if any) to cover the triangles parsed so far.
fn close_object(mesh: &mut Mesh) {
    let len = mesh.triangles.len();
    if let Some(object) = mesh.objects.last_mut() {
        object.end = len;
    }
}

/// Parse a face record and fan-triangulate it into the mesh.
fn parse_face(
    rest: &[&str],
    line_no: u64,
    mesh: &mut Mesh,
    progress: &Progress,
) -> Result<()> {
    if rest.len() < 3 {
        return Err(ParseError::record(
            line_no,
            format!("f record needs at least 3 vertex references, got {}", rest.len()),
        )
        .into());
    }

    let mut corners = Vec::with_capacity(rest.len());
    for part in rest {
        corners.push(parse_corner(part, line_no, mesh)?);
    }

    // Fan triangulation: (c0, c1, c2), (c0, c2, c3), ...
    for i in 1..corners.len() - 1 {
        let (a, b, c) = (corners[0], corners[i], corners[i + 1]);
        mesh.triangles.push(Triangle {
            vertices: [a.vertex, b.vertex, c.vertex],
            normals: [a.normal, b.normal, c.normal],
            uvs: [a.uv, b.uv, c.uv],
        });
        progress.record_triangle();
    }
    Ok(())
}

/// Parse a `v`, `v/vt`, `v/vt/vn`, or `v//vn` face reference.
fn parse_corner(part: &str, line_no: u64, mesh: &Mesh) -> Result<Corner> {
    let mut segments = part.split('/');

    let vertex_field = segments.next().unwrap_or("");
    let vertex = resolve_index(vertex_field, mesh.vertices.len(), "vertex", line_no)?;
    let uv = match segments.next() {
        None | Some("") => None,
        Some(field) => Some(resolve_index(field, mesh.uvs.len(), "uv", line_no)?),
    };
    let normal = match segments.next() {
        None | Some("") => None,
        Some(field) => Some(resolve_index(field, mesh.normals.len(), "normal", line_no)?),
    };
    if segments.next().is_some() {
        return Err(ParseError::record(
            line_no,
            format!("malformed face reference {part:?}"),
        )
        .into());
    }

    Ok(Corner { vertex, uv, normal })
}

/// Resolve a 1-based or negative OBJ index against the current list length.
fn resolve_index(field: &str, len: usize, kind: &'static str, line_no: u64) -> Result<u32> {
    let raw: i64 = field.parse().map_err(|_| ParseError::Number {
        line: line_no,
        token: field.to_string(),
    })?;

    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        -1 // index 0 is invalid in the 1-based scheme
    };

    if resolved < 0 || resolved >= len as i64 {
        return Err(ParseError::Index {
            line: line_no,
            kind,
            index: raw,
            len,
        }
        .into());
    }
    Ok(resolved as u32)
}

/// Parse exactly three leading floats; extra fields are ignored.
fn parse_floats(rest: &[&str], line_no: u64, record: &str) -> Result<[f64; 3]> {
    if rest.len() < 3 {
        return Err(ParseError::record(
            line_no,
            format!("{record} record needs 3 fields, got {}", rest.len()),
        )
        .into());
    }
    Ok([
        parse_float(rest[0], line_no)?,
        parse_float(rest[1], line_no)?,
        parse_float(rest[2], line_no)?,
    ])
}

fn parse_float(field: &str, line_no: u64) -> Result<f64> {
    field.parse().map_err(|_| {
        Error::from(ParseError::Number {
            line: line_no,
            token: field.to_string(),
        })
    })
}
