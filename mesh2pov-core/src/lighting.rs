//! Lighting preset expansion.
//!
//! A preset names a fixed arrangement of light roles; each role's offset is
//! a fraction of the planned light distance, relative to the final camera
//! position, so the arrangement stays framed at any camera angle.
//! Overrides (intensity multiplier, ambient term, area conversion) are
//! applied uniformly after expansion.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Point3, Vector3};

use crate::camera::CameraPlan;
use crate::config::LightingConfig;
use crate::error::ValidationError;

/// The closed set of lighting presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingPreset {
    /// Three-point studio setup: key, fill, rim.
    Studio,
    /// Parallel sun plus a sky fill.
    Outdoor,
    /// Single hard key light.
    Dramatic,
    /// Single large area light.
    Soft,
    /// Two even, low-contrast fills.
    Architectural,
}

impl LightingPreset {
    /// Name as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Studio => "studio",
            Self::Outdoor => "outdoor",
            Self::Dramatic => "dramatic",
            Self::Soft => "soft",
            Self::Architectural => "architectural",
        }
    }
}

impl fmt::Display for LightingPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightingPreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "studio" => Ok(Self::Studio),
            "outdoor" => Ok(Self::Outdoor),
            "dramatic" => Ok(Self::Dramatic),
            "soft" => Ok(Self::Soft),
            "architectural" => Ok(Self::Architectural),
            other => Err(ValidationError::UnknownPreset {
                name: other.to_string(),
            }),
        }
    }
}

/// Role a light plays in the arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightRole {
    Key,
    Fill,
    Rim,
    Sun,
    Sky,
}

/// Point light, area light, or parallel (directional) light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Hard-shadow point light.
    Point,
    /// Square area light with the given edge extent and per-axis samples.
    Area { extent: f64, samples: u32 },
    /// Parallel light aimed at a point.
    Parallel { point_at: Point3<f64> },
}

/// One planned light definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub role: LightRole,
    pub position: Point3<f64>,
    /// Base color, rgb in `[0, 1]`.
    pub color: [f64; 3],
    /// Intensity scalar the emitter multiplies into the color.
    pub intensity: f64,
    pub kind: LightKind,
}

/// The fully expanded lighting arrangement plus scene-wide toggles.
#[derive(Debug, Clone, PartialEq)]
pub struct LightingPlan {
    /// Ordered light definitions.
    pub lights: Vec<Light>,
    /// Scene-wide ambient term.
    pub ambient: f64,
    /// Emit radiosity settings.
    pub radiosity: bool,
    /// Emit photon-mapping settings.
    pub photon_mapping: bool,
}

/// When the area-lights override converts a point light, the extent is the
/// configured softness scaled by this factor (softness 0.5 gives the
/// classic 2-unit studio key).
const AREA_EXTENT_PER_SOFTNESS: f64 = 4.0;

/// Samples per axis for converted area lights.
const AREA_SAMPLES: u32 = 4;

/// Expand the configured preset into concrete lights around the camera.
pub fn plan_lighting(camera: &CameraPlan, config: &LightingConfig) -> LightingPlan {
    let camera_pos = camera.position;
    let distance = camera.light_distance;
    let at = |offset: Vector3<f64>| camera_pos + offset * distance;

    let mut lights = match config.preset {
        Some(LightingPreset::Studio) => vec![
            Light {
                role: LightRole::Key,
                position: at(Vector3::new(0.7, 0.5, -0.3)),
                color: [1.0, 0.95, 0.8],
                intensity: 1.0,
                kind: LightKind::Point,
            },
            Light {
                role: LightRole::Fill,
                position: at(Vector3::new(-0.5, 0.2, -0.4)),
                color: [0.8, 0.9, 1.0],
                intensity: 0.6,
                kind: LightKind::Point,
            },
            Light {
                role: LightRole::Rim,
                position: at(Vector3::new(0.2, 0.8, 0.6)),
                color: [1.0, 0.9, 0.7],
                intensity: 0.4,
                kind: LightKind::Point,
            },
        ],
        Some(LightingPreset::Outdoor) => vec![
            Light {
                role: LightRole::Sun,
                position: Point3::new(0.0, 1000.0, 0.0),
                color: [1.0, 0.95, 0.8],
                intensity: 1.0,
                kind: LightKind::Parallel {
                    point_at: Point3::origin(),
                },
            },
            Light {
                role: LightRole::Sky,
                position: Point3::origin(),
                color: [0.6, 0.8, 1.0],
                intensity: 0.3,
                kind: LightKind::Parallel {
                    point_at: Point3::new(0.0, -1.0, 0.0),
                },
            },
        ],
        Some(LightingPreset::Dramatic) => vec![Light {
            role: LightRole::Key,
            position: at(Vector3::new(0.8, 0.9, -0.2)),
            color: [1.0, 0.8, 0.6],
            intensity: 1.0,
            kind: LightKind::Point,
        }],
        Some(LightingPreset::Soft) => vec![Light {
            role: LightRole::Key,
            position: at(Vector3::new(0.6, 0.4, -0.4)),
            color: [1.0, 0.98, 0.9],
            intensity: 1.0,
            kind: LightKind::Area {
                extent: 4.0,
                samples: 8,
            },
        }],
        Some(LightingPreset::Architectural) => vec![
            Light {
                role: LightRole::Key,
                position: at(Vector3::new(0.5, 0.8, -0.3)),
                color: [1.0, 1.0, 0.95],
                intensity: 1.0,
                kind: LightKind::Point,
            },
            Light {
                role: LightRole::Fill,
                position: at(Vector3::new(-0.3, 0.6, 0.4)),
                color: [0.95, 0.98, 1.0],
                intensity: 0.7,
                kind: LightKind::Point,
            },
        ],
        // No preset: one plain white key so the scene is never unlit.
        None => vec![Light {
            role: LightRole::Key,
            position: at(Vector3::new(0.7, 0.5, -0.3)),
            color: [1.0, 1.0, 1.0],
            intensity: 1.0,
            kind: LightKind::Point,
        }],
    };

    for light in &mut lights {
        light.intensity *= config.intensity;
        if config.area_lights {
            if let LightKind::Point = light.kind {
                light.kind = LightKind::Area {
                    extent: AREA_EXTENT_PER_SOFTNESS * config.softness,
                    samples: AREA_SAMPLES,
                };
            }
        }
    }

    LightingPlan {
        lights,
        ambient: config.ambient,
        radiosity: config.radiosity,
        photon_mapping: config.photon_mapping,
    }
}
