//! End-to-end pipeline tests over the sample fixtures.

use std::fs;
use std::io::BufReader;
use std::path::PathBuf;

use mesh2pov_core::{convert, parse_obj, parse_stl, Config, Progress};

fn sample(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../samples")
        .join(name)
}

#[test]
fn obj_triangle_round_trip() {
    let progress = Progress::new();
    let file = fs::File::open(sample("example_triangle.obj")).unwrap();
    let mut mesh = parse_obj(BufReader::new(file), &progress).unwrap();

    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);

    let mut out = Vec::new();
    convert(&mut mesh, &Config::default(), &progress, &mut out).unwrap();
    let scene = String::from_utf8(out).unwrap();

    assert_eq!(scene.matches("mesh2 {").count(), 1);
    assert!(scene.contains("vertex_vectors {\n        3,"));
    assert!(scene.contains("face_indices {\n        1,"));
}

#[test]
fn stl_triangle_matches_obj_triangle() {
    let progress = Progress::new();
    let data = fs::read(sample("example_triangle.stl")).unwrap();
    let stl_mesh = parse_stl(&data, &progress).unwrap();

    let file = fs::File::open(sample("example_triangle.obj")).unwrap();
    let obj_mesh = parse_obj(BufReader::new(file), &progress).unwrap();

    assert_eq!(stl_mesh.triangle_count(), obj_mesh.triangle_count());
    assert_eq!(stl_mesh.vertex_count(), obj_mesh.vertex_count());
    for (a, b) in stl_mesh.vertices.iter().zip(&obj_mesh.vertices) {
        assert!((a - b).norm() < 1e-6);
    }
}

#[test]
fn conversion_is_deterministic() {
    let data = fs::read(sample("example_triangle.stl")).unwrap();

    let mut first = Vec::new();
    let mut mesh = parse_stl(&data, &Progress::new()).unwrap();
    convert(&mut mesh, &Config::default(), &Progress::new(), &mut first).unwrap();

    let mut second = Vec::new();
    let mut mesh = parse_stl(&data, &Progress::new()).unwrap();
    convert(&mut mesh, &Config::default(), &Progress::new(), &mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn scene_file_written_to_disk_parses_back_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("triangle.pov");

    let data = fs::read(sample("example_triangle.stl")).unwrap();
    let mut mesh = parse_stl(&data, &Progress::new()).unwrap();
    let mut scene = Vec::new();
    convert(&mut mesh, &Config::default(), &Progress::new(), &mut scene).unwrap();
    fs::write(&out_path, &scene).unwrap();

    let text = fs::read_to_string(&out_path).unwrap();
    assert!(text.starts_with("// Generated by mesh2pov"));
    assert!(text.contains("#version 3.7;"));
}

#[test]
fn flip_x_round_trips_through_the_scene() {
    let data = fs::read(sample("example_triangle.stl")).unwrap();
    let mut mesh = parse_stl(&data, &Progress::new()).unwrap();

    let config = Config {
        flip_x: true,
        ..Config::default()
    };
    let mut out = Vec::new();
    convert(&mut mesh, &config, &Progress::new(), &mut out).unwrap();
    let scene = String::from_utf8(out).unwrap();

    // The second sample vertex (1, 0, 0) comes out mirrored.
    assert!(scene.contains("<-1.000000, 0.000000, 0.000000>"));
}
