//! POV-Ray scene emission.
//!
//! Pure serialization of the finalized mesh, camera plan, and lighting
//! plan. Output is deterministic: the same inputs always produce the same
//! bytes, whether or not the progress counters are being observed.

use std::io::{self, Write};

use crate::camera::CameraPlan;
use crate::config::Config;
use crate::geometry::{Mesh, NamedObject, Triangle};
use crate::lighting::{Light, LightKind, LightingPlan};
use crate::progress::Progress;

/// Write the complete scene description.
///
/// Emits the header and global settings, the camera, the lights, the
/// material block (unless suppressed), and one `mesh2` object per named
/// object. Every `mesh2` carries the full vertex/normal/UV vector lists so
/// that index lists reference exactly the indices of the Geometry Model —
/// nothing is renumbered across object boundaries.
pub fn write_scene<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    camera: &CameraPlan,
    lighting: &LightingPlan,
    config: &Config,
    progress: &Progress,
) -> io::Result<()> {
    write_header(out, config, lighting)?;
    write_camera(out, camera)?;
    write_lights(out, lighting)?;
    write_materials(out, config, lighting.ambient)?;

    let implicit;
    let objects: &[NamedObject] = if mesh.objects.is_empty() {
        implicit = [NamedObject {
            name: "mesh".to_string(),
            start: 0,
            end: mesh.triangles.len(),
            material: None,
        }];
        &implicit
    } else {
        &mesh.objects
    };

    for object in objects {
        if object.start == object.end {
            continue;
        }
        write_object(out, mesh, object, progress)?;
    }

    Ok(())
}

fn write_header<W: Write>(out: &mut W, config: &Config, lighting: &LightingPlan) -> io::Result<()> {
    writeln!(out, "// Generated by mesh2pov")?;
    writeln!(out)?;
    writeln!(out, "#version 3.7;")?;
    writeln!(out)?;
    writeln!(
        out,
        "// Render with: povray +W{} +H{} scene.pov",
        config.width, config.height
    )?;
    writeln!(out, "#declare ImageWidth = {};", config.width)?;
    writeln!(out, "#declare ImageHeight = {};", config.height)?;
    writeln!(out)?;

    writeln!(out, "global_settings {{")?;
    writeln!(out, "    assumed_gamma 1.0")?;
    writeln!(
        out,
        "    ambient_light rgb <{a:.2}, {a:.2}, {a:.2}>",
        a = lighting.ambient
    )?;
    if lighting.radiosity {
        writeln!(out, "    radiosity {{")?;
        writeln!(out, "        pretrace_start 0.08")?;
        writeln!(out, "        pretrace_end 0.01")?;
        writeln!(out, "        count 35")?;
        writeln!(out, "        nearest_count 5")?;
        writeln!(out, "        error_bound 0.5")?;
        writeln!(out, "        recursion_limit 3")?;
        writeln!(out, "        low_error_factor 0.8")?;
        writeln!(out, "        gray_threshold 0.0")?;
        writeln!(out, "        minimum_reuse 0.015")?;
        writeln!(out, "        brightness 1.0")?;
        writeln!(out, "        adc_bailout 0.01/2")?;
        writeln!(out, "        normal on")?;
        writeln!(out, "        media on")?;
        writeln!(out, "    }}")?;
    }
    if lighting.photon_mapping {
        writeln!(out, "    photons {{")?;
        writeln!(out, "        spacing 0.1")?;
        writeln!(out, "        max_trace_level 5")?;
        writeln!(out, "        autostop 0")?;
        writeln!(out, "        expand_thresholds 0.1, 0.1")?;
        writeln!(out, "        media 10")?;
        writeln!(out, "        jitter 0.4")?;
        writeln!(out, "        count 100000")?;
        writeln!(out, "        gather 20, 20")?;
        writeln!(out, "    }}")?;
    }
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_camera<W: Write>(out: &mut W, camera: &CameraPlan) -> io::Result<()> {
    writeln!(out, "// Camera framed from the mesh bounds")?;
    writeln!(out, "camera {{")?;
    writeln!(
        out,
        "    location <{:.3}, {:.3}, {:.3}>",
        camera.position.x, camera.position.y, camera.position.z
    )?;
    writeln!(
        out,
        "    sky <{:.3}, {:.3}, {:.3}>",
        camera.up.x, camera.up.y, camera.up.z
    )?;
    writeln!(
        out,
        "    right x*ImageWidth/ImageHeight  // Square pixels at any aspect ratio"
    )?;
    writeln!(out, "    up y")?;
    writeln!(out, "    angle {:.1}", camera.fov)?;
    writeln!(
        out,
        "    look_at <{:.3}, {:.3}, {:.3}>",
        camera.look_at.x, camera.look_at.y, camera.look_at.z
    )?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_lights<W: Write>(out: &mut W, lighting: &LightingPlan) -> io::Result<()> {
    writeln!(out, "// Lighting setup")?;
    for light in &lighting.lights {
        write_light(out, light)?;
    }
    Ok(())
}

fn write_light<W: Write>(out: &mut W, light: &Light) -> io::Result<()> {
    writeln!(out, "light_source {{")?;
    writeln!(
        out,
        "    <{:.3}, {:.3}, {:.3}>",
        light.position.x, light.position.y, light.position.z
    )?;
    writeln!(
        out,
        "    color rgb <{:.2}, {:.2}, {:.2}> * {:.2}",
        light.color[0], light.color[1], light.color[2], light.intensity
    )?;
    match light.kind {
        LightKind::Point => {}
        LightKind::Area { extent, samples } => {
            writeln!(
                out,
                "    area_light <{extent}, 0, 0>, <0, {extent}, 0>, {samples}, {samples}"
            )?;
            writeln!(out, "    adaptive 1")?;
            writeln!(out, "    jitter")?;
            writeln!(out, "    circular")?;
            writeln!(out, "    orient")?;
        }
        LightKind::Parallel { point_at } => {
            writeln!(out, "    parallel")?;
            writeln!(
                out,
                "    point_at <{:.3}, {:.3}, {:.3}>",
                point_at.x, point_at.y, point_at.z
            )?;
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_materials<W: Write>(out: &mut W, config: &Config, ambient: f64) -> io::Result<()> {
    if config.skip_materials {
        writeln!(out, "// Materials suppressed")?;
        writeln!(out, "#default {{")?;
        writeln!(out, "    finish {{ ambient {ambient:.2} diffuse 0.8 }}")?;
        writeln!(out, "}}")?;
        writeln!(out)?;
        return Ok(());
    }

    let material = &config.material;
    writeln!(out, "// Default bronze material")?;
    writeln!(out, "#declare DefaultMaterial = texture {{")?;
    writeln!(out, "    pigment {{")?;
    writeln!(
        out,
        "        color rgb <{:.2}, {:.2}, {:.2}>",
        material.diffuse[0], material.diffuse[1], material.diffuse[2]
    )?;
    writeln!(out, "    }}")?;
    writeln!(out, "    normal {{")?;
    writeln!(out, "        bumps {:.2}", material.bump)?;
    writeln!(out, "        scale 0.05")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    finish {{")?;
    writeln!(out, "        ambient {ambient:.2}")?;
    writeln!(out, "        diffuse 0.8")?;
    writeln!(out, "        specular {:.2}", material.specular)?;
    writeln!(out, "        roughness 0.1")?;
    writeln!(out, "        reflection {{")?;
    writeln!(out, "            {:.2}", material.reflection)?;
    writeln!(out, "            fresnel on")?;
    writeln!(out, "        }}")?;
    writeln!(out, "        metallic 1.0")?;
    writeln!(out, "        conserve_energy")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "#default {{")?;
    writeln!(out, "    texture {{ DefaultMaterial }}")?;
    writeln!(out, "}}")?;
    writeln!(out)
}

fn write_object<W: Write>(
    out: &mut W,
    mesh: &Mesh,
    object: &NamedObject,
    progress: &Progress,
) -> io::Result<()> {
    match &object.material {
        Some(material) => writeln!(
            out,
            "// Object \"{}\" (material \"{}\", unresolved)",
            object.name, material
        )?,
        None => writeln!(out, "// Object \"{}\"", object.name)?,
    }
    writeln!(out, "mesh2 {{")?;

    write_list(out, "vertex_vectors", &mesh.vertices, progress, |v| {
        format!("<{:.6}, {:.6}, {:.6}>", v.x, v.y, v.z)
    })?;

    if !mesh.normals.is_empty() {
        writeln!(out)?;
        write_list(out, "normal_vectors", &mesh.normals, progress, |n| {
            format!("<{:.6}, {:.6}, {:.6}>", n.x, n.y, n.z)
        })?;
    }

    if !mesh.uvs.is_empty() {
        writeln!(out)?;
        write_list(out, "uv_vectors", &mesh.uvs, progress, |uv| {
            format!("<{:.6}, {:.6}>", uv.x, uv.y)
        })?;
    }

    let triangles = &mesh.triangles[object.start..object.end];

    writeln!(out)?;
    write_list(out, "face_indices", triangles, progress, |t: &Triangle| {
        format!("<{}, {}, {}>", t.vertices[0], t.vertices[1], t.vertices[2])
    })?;

    if !mesh.normals.is_empty() {
        writeln!(out)?;
        write_list(out, "normal_indices", triangles, progress, |t: &Triangle| {
            let [a, b, c] = t.normals.map(|n| n.unwrap_or(0));
            format!("<{a}, {b}, {c}>")
        })?;
    }

    if !mesh.uvs.is_empty() {
        writeln!(out)?;
        write_list(out, "uv_indices", triangles, progress, |t: &Triangle| {
            let [a, b, c] = t.uvs.map(|n| n.unwrap_or(0));
            format!("<{a}, {b}, {c}>")
        })?;
    }

    writeln!(out, "}}")?;
    writeln!(out)
}

/// Emit one `mesh2` element list: count line, then one element per line,
/// comma-separated except the last.
fn write_list<W: Write, T>(
    out: &mut W,
    name: &str,
    items: &[T],
    progress: &Progress,
    render: impl Fn(&T) -> String,
) -> io::Result<()> {
    writeln!(out, "    {name} {{")?;
    writeln!(out, "        {},", items.len())?;
    for (i, item) in items.iter().enumerate() {
        let separator = if i + 1 < items.len() { "," } else { "" };
        writeln!(out, "        {}{}", render(item), separator)?;
        progress.record_emitted();
    }
    writeln!(out, "    }}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::Aabb;
    use crate::camera::plan_camera;
    use crate::config::LightingConfig;
    use crate::lighting::{plan_lighting, LightingPreset};
    use crate::obj::parse_obj;
    use crate::repair;

    const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    fn emit_with(obj_text: &str, config: &Config) -> String {
        let progress = Progress::new();
        let mut mesh = parse_obj(obj_text.as_bytes(), &progress).unwrap();
        repair::fix_degenerate_normals(&mut mesh);
        if config.flip_x {
            repair::flip_x(&mut mesh);
        }
        let bounds = Aabb::from_mesh(&mesh).unwrap();
        let camera = plan_camera(&bounds, &config.camera).unwrap();
        let lighting = plan_lighting(&camera, &config.lighting);

        let mut out = Vec::new();
        write_scene(&mut out, &mesh, &camera, &lighting, config, &progress).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn triangle_scene_has_one_mesh_object() {
        let scene = emit_with(TRIANGLE_OBJ, &Config::default());

        assert_eq!(scene.matches("mesh2 {").count(), 1);
        assert!(scene.contains("vertex_vectors {\n        3,"));
        assert!(scene.contains("face_indices {\n        1,\n        <0, 1, 2>"));
        assert!(scene.contains("camera {"));
        assert!(scene.contains("angle 35.0"));
        assert!(scene.contains("light_source {"));
        assert!(scene.contains("#declare ImageWidth = 800;"));
        assert!(scene.contains("povray +W800 +H600"));
    }

    #[test]
    fn repaired_normals_are_emitted_with_indices() {
        let scene = emit_with(TRIANGLE_OBJ, &Config::default());
        assert!(scene.contains("normal_vectors {\n        1,"));
        assert!(scene.contains("normal_indices {\n        1,\n        <0, 0, 0>"));
    }

    #[test]
    fn uv_blocks_only_appear_when_uvs_exist() {
        let scene = emit_with(TRIANGLE_OBJ, &Config::default());
        assert!(!scene.contains("uv_vectors"));
        assert!(!scene.contains("uv_indices"));

        let with_uvs = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nf 1/1 2/2 3/3\n";
        let scene = emit_with(with_uvs, &Config::default());
        assert!(scene.contains("uv_vectors {\n        3,"));
        assert!(scene.contains("uv_indices {\n        1,\n        <0, 1, 2>"));
    }

    #[test]
    fn materials_block_is_bronze_by_default() {
        let scene = emit_with(TRIANGLE_OBJ, &Config::default());
        assert!(scene.contains("// Default bronze material"));
        assert!(scene.contains("#declare DefaultMaterial"));
        assert!(scene.contains("color rgb <0.80, 0.50, 0.20>"));
    }

    #[test]
    fn skip_materials_drops_the_bronze_block() {
        let config = Config {
            skip_materials: true,
            ..Config::default()
        };
        let scene = emit_with(TRIANGLE_OBJ, &config);
        assert!(!scene.contains("bronze"));
        assert!(!scene.contains("DefaultMaterial"));
        assert!(scene.contains("// Materials suppressed"));
        assert!(scene.contains("#default {"));
    }

    #[test]
    fn radiosity_and_photon_blocks_follow_their_flags() {
        let plain = emit_with(TRIANGLE_OBJ, &Config::default());
        assert!(!plain.contains("radiosity {"));
        assert!(!plain.contains("photons {"));

        let config = Config {
            lighting: LightingConfig {
                radiosity: true,
                photon_mapping: true,
                ..LightingConfig::default()
            },
            ..Config::default()
        };
        let scene = emit_with(TRIANGLE_OBJ, &config);
        assert!(scene.contains("radiosity {"));
        assert!(scene.contains("photons {"));
    }

    #[test]
    fn area_lights_emit_area_directives() {
        let config = Config {
            lighting: LightingConfig {
                preset: Some(LightingPreset::Studio),
                area_lights: true,
                ..LightingConfig::default()
            },
            ..Config::default()
        };
        let scene = emit_with(TRIANGLE_OBJ, &config);
        assert_eq!(scene.matches("area_light <2, 0, 0>, <0, 2, 0>, 4, 4").count(), 3);
        assert_eq!(scene.matches("orient").count(), 3);
    }

    #[test]
    fn outdoor_preset_emits_parallel_lights() {
        let config = Config {
            lighting: LightingConfig {
                preset: Some(LightingPreset::Outdoor),
                ..LightingConfig::default()
            },
            ..Config::default()
        };
        let scene = emit_with(TRIANGLE_OBJ, &config);
        assert_eq!(scene.matches("parallel").count(), 2);
        assert!(scene.contains("point_at <0.000, 0.000, 0.000>"));
    }

    #[test]
    fn named_objects_emit_separate_meshes_with_shared_indices() {
        let obj = "o first\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
                   o second\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n";
        let scene = emit_with(obj, &Config::default());

        assert_eq!(scene.matches("mesh2 {").count(), 2);
        assert!(scene.contains("// Object \"first\""));
        assert!(scene.contains("// Object \"second\""));
        // Both objects carry the full 6-entry vertex list; the second
        // object's face references the model-global indices.
        assert_eq!(scene.matches("vertex_vectors {\n        6,").count(), 2);
        assert!(scene.contains("<3, 4, 5>"));
    }

    #[test]
    fn output_is_independent_of_observation() {
        let progress = Progress::new();
        let mut mesh = parse_obj(TRIANGLE_OBJ.as_bytes(), &progress).unwrap();
        repair::fix_degenerate_normals(&mut mesh);
        let config = Config::default();
        let bounds = Aabb::from_mesh(&mesh).unwrap();
        let camera = plan_camera(&bounds, &config.camera).unwrap();
        let lighting = plan_lighting(&camera, &config.lighting);

        let mut first = Vec::new();
        write_scene(&mut first, &mesh, &camera, &lighting, &config, &progress).unwrap();
        let mut second = Vec::new();
        write_scene(&mut second, &mesh, &camera, &lighting, &config, &Progress::new()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn emitted_element_counter_advances() {
        let progress = Progress::new();
        let mut mesh = parse_obj(TRIANGLE_OBJ.as_bytes(), &Progress::new()).unwrap();
        repair::fix_degenerate_normals(&mut mesh);
        let config = Config::default();
        let bounds = Aabb::from_mesh(&mesh).unwrap();
        let camera = plan_camera(&bounds, &config.camera).unwrap();
        let lighting = plan_lighting(&camera, &config.lighting);

        let mut out = Vec::new();
        write_scene(&mut out, &mesh, &camera, &lighting, &config, &progress).unwrap();
        // 3 vertices + 1 normal + 1 face index + 1 normal index.
        assert_eq!(progress.elements_emitted(), 6);
    }
}
