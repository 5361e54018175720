//! mesh2pov core library.
//!
//! Converts OBJ and STL mesh geometry into POV-Ray scene descriptions.
//! The pipeline is a single-threaded sequence of stages, each fully
//! consuming its input before the next begins:
//!
//! parse → repair → bounding analysis → camera + lighting planning → emit
//!
//! Parsing produces the unified [`Mesh`]; the repair pass fixes degenerate
//! normals and applies the optional X-flip; everything after treats the
//! mesh as read-only. A fatal error at any stage aborts the conversion —
//! no partial scene is ever produced.

pub mod bounds;
pub mod camera;
pub mod config;
pub mod error;
pub mod geometry;
pub mod lighting;
pub mod obj;
pub mod progress;
pub mod repair;
pub mod scene;
pub mod stl;

// Re-export commonly used types
pub use bounds::Aabb;
pub use camera::{plan_camera, CameraPlan, FIELD_OF_VIEW_DEG};
pub use config::{CameraConfig, Config, LightingConfig, Material};
pub use error::{Error, ParseError, Result, ValidationError};
pub use geometry::{Mesh, NamedObject, Triangle};
pub use lighting::{plan_lighting, Light, LightKind, LightRole, LightingPlan, LightingPreset};
pub use obj::parse_obj;
pub use progress::Progress;
pub use stl::parse_stl;

use std::io::Write;

/// Run the full pipeline on an already-parsed mesh and write the scene.
///
/// Validates the mesh, repairs it (degenerate normals, optional X-flip),
/// frames the camera from the repaired bounds, expands the lighting plan,
/// and emits the POV-Ray scene to `out`.
///
/// # Errors
///
/// Propagates the first [`ValidationError`] (empty mesh, bad camera
/// configuration) or I/O error encountered; nothing is written after a
/// failure is detected.
pub fn convert<W: Write>(
    mesh: &mut Mesh,
    config: &Config,
    progress: &Progress,
    out: &mut W,
) -> Result<()> {
    mesh.validate()?;

    repair::fix_degenerate_normals(mesh);
    if config.flip_x {
        repair::flip_x(mesh);
    }

    let bounds = Aabb::from_mesh(mesh)?;
    let camera = plan_camera(&bounds, &config.camera)?;
    let lighting = plan_lighting(&camera, &config.lighting);

    scene::write_scene(out, mesh, &camera, &lighting, config, progress)?;
    Ok(())
}
