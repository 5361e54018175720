//! STL parser for ASCII and binary formats.
//!
//! Format detection keys on the `solid` header keyword: input starting with
//! it is decoded against the ASCII grammar, anything else as binary
//! (80-byte header, little-endian u32 triangle count, 50 bytes per
//! triangle). Vertex positions repeated across facets are deduplicated by
//! exact bit-pattern equality, so the vertex sequence mirrors the shared
//! vertices of an equivalent OBJ file; near-duplicates from numerical noise
//! stay distinct. Each facet appends one normal referenced only by its own
//! triangle.

use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::many0,
    number::complete::double,
    sequence::preceded,
    IResult,
};

use crate::error::{ParseError, Result};
use crate::geometry::{Mesh, Triangle};
use crate::progress::Progress;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one binary triangle record (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// A facet as read from the file, before deduplication.
struct RawFacet {
    normal: Vector3<f64>,
    vertices: [Point3<f64>; 3],
}

/// Exact-equality vertex lookup keyed by the bit patterns of the
/// coordinates.
#[derive(Default)]
struct VertexDedup {
    seen: HashMap<[u64; 3], u32>,
}

impl VertexDedup {
    /// Index of `point` in the mesh, appending it on first sight.
    fn intern(&mut self, mesh: &mut Mesh, point: Point3<f64>) -> u32 {
        let key = [point.x.to_bits(), point.y.to_bits(), point.z.to_bits()];
        *self.seen.entry(key).or_insert_with(|| {
            mesh.vertices.push(point);
            (mesh.vertices.len() - 1) as u32
        })
    }
}

/// Detect the STL flavor and parse it into a [`Mesh`].
///
/// # Errors
///
/// Fails on a grammar mismatch (ASCII), a truncated buffer, or a declared
/// triangle count that disagrees with the remaining payload length
/// (binary). No partial mesh is ever returned.
pub fn parse_stl(data: &[u8], progress: &Progress) -> Result<Mesh> {
    if data.starts_with(b"solid") {
        parse_ascii_stl(data, progress)
    } else {
        parse_binary_stl(data, progress)
    }
}

/// Parse ASCII STL text.
fn parse_ascii_stl(data: &[u8], progress: &Progress) -> Result<Mesh> {
    let text = std::str::from_utf8(data).map_err(|e| ParseError::Grammar {
        offset: e.valid_up_to(),
        message: "ASCII STL is not valid UTF-8".to_string(),
    })?;

    let facets = match solid_body(text) {
        Ok((_, facets)) => facets,
        Err(nom::Err::Error(e) | nom::Err::Failure(e)) => {
            return Err(ParseError::Grammar {
                offset: text.len() - e.input.len(),
                message: format!("ASCII STL grammar mismatch ({:?})", e.code),
            }
            .into());
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParseError::Grammar {
                offset: text.len(),
                message: "ASCII STL ended mid-record".to_string(),
            }
            .into());
        }
    };

    Ok(build_mesh(facets, progress))
}

/// `solid <name>` header, facets, `endsolid` trailer.
fn solid_body(input: &str) -> IResult<&str, Vec<RawFacet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?;
    let (input, facets) = many0(facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn facet(input: &str) -> IResult<&str, RawFacet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, (nx, ny, nz)) = vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v0) = vertex(input)?;
    let (input, v1) = vertex(input)?;
    let (input, v2) = vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        RawFacet {
            normal: Vector3::new(nx, ny, nz),
            vertices: [v0, v1, v2],
        },
    ))
}

fn vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = vector3(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn vector3(input: &str) -> IResult<&str, (f64, f64, f64)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = double(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = double(input)?;
    Ok((input, (x, y, z)))
}

/// Parse binary STL.
fn parse_binary_stl(data: &[u8], progress: &Progress) -> Result<Mesh> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(ParseError::Truncated { len: data.len() }.into());
    }

    let declared = u32::from_le_bytes([
        data[HEADER_SIZE],
        data[HEADER_SIZE + 1],
        data[HEADER_SIZE + 2],
        data[HEADER_SIZE + 3],
    ]);
    let payload = &data[HEADER_SIZE + 4..];
    let expected = declared as usize * TRIANGLE_SIZE;
    if payload.len() != expected {
        return Err(ParseError::TriangleCount {
            declared,
            actual: payload.len(),
            expected,
        }
        .into());
    }

    let facets = payload
        .chunks_exact(TRIANGLE_SIZE)
        .map(|record| RawFacet {
            normal: read_vector3(&record[0..12]),
            vertices: [
                read_point3(&record[12..24]),
                read_point3(&record[24..36]),
                read_point3(&record[36..48]),
            ],
            // Trailing 2 attribute bytes are ignored.
        })
        .collect();

    Ok(build_mesh(facets, progress))
}

/// Assemble the mesh: dedup vertices, one normal per facet.
fn build_mesh(facets: Vec<RawFacet>, progress: &Progress) -> Mesh {
    let mut mesh = Mesh::with_capacity(facets.len() * 3, facets.len());
    let mut dedup = VertexDedup::default();

    for facet in facets {
        mesh.normals.push(facet.normal);
        let normal_index = (mesh.normals.len() - 1) as u32;

        let mut vertices = [0u32; 3];
        for (slot, point) in vertices.iter_mut().zip(facet.vertices) {
            *slot = dedup.intern(&mut mesh, point);
        }

        mesh.triangles.push(Triangle {
            vertices,
            normals: [Some(normal_index); 3],
            uvs: [None; 3],
        });
        progress.record_triangle();
    }

    mesh
}

/// Three little-endian f32s widened to f64.
fn read_vector3(buf: &[u8]) -> Vector3<f64> {
    Vector3::new(read_f32(buf, 0), read_f32(buf, 4), read_f32(buf, 8))
}

fn read_point3(buf: &[u8]) -> Point3<f64> {
    Point3::new(read_f32(buf, 0), read_f32(buf, 4), read_f32(buf, 8))
}

fn read_f32(buf: &[u8], offset: usize) -> f64 {
    f64::from(f32::from_le_bytes([
        buf[offset],
        buf[offset + 1],
        buf[offset + 2],
        buf[offset + 3],
    ]))
}
