//! Conversion configuration surface.
//!
//! The CLI (or any other front end) builds one [`Config`] and hands it to
//! the pipeline. Everything here is plain data with the documented
//! defaults; nothing is read from hidden global state — including the
//! default bronze material, which is injected explicitly.

use crate::lighting::LightingPreset;

/// Camera orientation and framing parameters, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    /// Rotation about the horizontal axis through the centroid.
    pub pitch: f64,
    /// Rotation about the vertical axis.
    pub yaw: f64,
    /// Rotation of the camera's up vector about its view direction.
    pub roll: f64,
    /// Distance multiplier applied to the framing distance. Must be > 0.
    pub distance: f64,
    /// Legacy single-axis rotation; composes additively with yaw.
    pub rotation: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            yaw: 0.0,
            roll: 0.0,
            distance: 1.0,
            rotation: 0.0,
        }
    }
}

/// Lighting preset selection and the overrides applied after expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingConfig {
    /// Named preset; `None` expands to a single basic key light.
    pub preset: Option<LightingPreset>,
    /// Scene-wide ambient term.
    pub ambient: f64,
    /// Multiplier applied to every light's base intensity.
    pub intensity: f64,
    /// Area-light extent factor used when converting point lights.
    pub softness: f64,
    /// Convert every point light in the plan into an area light.
    pub area_lights: bool,
    /// Emit radiosity settings in the scene header.
    pub radiosity: bool,
    /// Emit photon-mapping settings in the scene header.
    pub photon_mapping: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            preset: None,
            ambient: 0.1,
            intensity: 1.0,
            softness: 0.5,
            area_lights: false,
            radiosity: false,
            photon_mapping: false,
        }
    }
}

/// A fixed PBR-like surface description for the emitted default material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse color, rgb in `[0, 1]`.
    pub diffuse: [f64; 3],
    /// Reflection amount.
    pub reflection: f64,
    /// Specular highlight amount.
    pub specular: f64,
    /// Bump normal amplitude.
    pub bump: f64,
}

impl Material {
    /// The bronze default carried over from the original tool.
    pub fn bronze() -> Self {
        Self {
            diffuse: [0.8, 0.5, 0.2],
            reflection: 0.8,
            specular: 0.9,
            bump: 0.2,
        }
    }
}

/// Full configuration consumed by the conversion pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Render image width, embedded in the scene header.
    pub width: u32,
    /// Render image height, embedded in the scene header.
    pub height: u32,
    /// Negate the x-component of every vertex and normal during repair.
    pub flip_x: bool,
    /// Suppress the default material block.
    pub skip_materials: bool,
    /// Camera parameters.
    pub camera: CameraConfig,
    /// Lighting parameters.
    pub lighting: LightingConfig,
    /// Material emitted unless `skip_materials` is set.
    pub material: Material,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            flip_x: false,
            skip_materials: false,
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            material: Material::bronze(),
        }
    }
}
